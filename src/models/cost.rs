//! Iteration cost abstraction.
//!
//! Costs are the execution time of one loop iteration in abstract time
//! units. Integer cost types give exact arithmetic; floating types are
//! compared with plain `PartialOrd` (no tolerance).

use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Add, Sub};

/// Numeric type usable as an iteration cost.
pub trait Cost:
    Copy + PartialOrd + Debug + Add<Output = Self> + Sub<Output = Self> + Send + Sync + 'static
{
    /// Additive identity (idle resource).
    const ZERO: Self;

    /// Lossy conversion for ratios and reporting.
    fn to_f64(self) -> f64;

    /// Total order over validated (positive, non-NaN) costs.
    #[inline]
    fn compare(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }

    /// `|self - other|` without requiring signed arithmetic.
    #[inline]
    fn distance(self, other: Self) -> Self {
        if self >= other {
            self - other
        } else {
            other - self
        }
    }
}

macro_rules! impl_cost {
    ($($t:ty => $zero:expr),* $(,)?) => {
        $(
            impl Cost for $t {
                const ZERO: Self = $zero;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_cost!(
    u32 => 0,
    u64 => 0,
    usize => 0,
    i32 => 0,
    i64 => 0,
    f32 => 0.0,
    f64 => 0.0,
);

/// Sums a sequence of costs starting from `ZERO`.
pub fn sum_costs<C: Cost>(costs: impl IntoIterator<Item = C>) -> C {
    costs.into_iter().fold(C::ZERO, |acc, c| acc + c)
}
