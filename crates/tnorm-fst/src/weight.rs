// Tropical semiring weight with fixed-point storage.
//
// Weights are stored as signed ten-thousandths. Sums of finitely many weights
// are exact, so two paths whose costs agree on paper compare equal here and
// the output-string tie-break takes over.

use std::fmt;
use std::ops::Add;

/// Ticks per unit weight.
pub const SCALE: i64 = 10_000;

/// Tropical weight: `times` is addition, `plus` is minimum, lower is better.
///
/// `Weight::zero()` is the semiring zero (infinity, "no path") and
/// `Weight::one()` the semiring one (cost 0).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight(i64);

impl Weight {
    /// Semiring one: cost zero.
    pub const fn one() -> Self {
        Weight(0)
    }

    /// Semiring zero: infinite cost.
    pub const fn zero() -> Self {
        Weight(i64::MAX)
    }

    /// Weight from a real-valued cost, rounded to the nearest tick.
    pub fn new(value: f32) -> Self {
        Weight((f64::from(value) * SCALE as f64).round() as i64)
    }

    pub const fn from_ticks(ticks: i64) -> Self {
        Weight(ticks)
    }

    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Real-valued cost. Infinity for the semiring zero.
    pub fn value(self) -> f64 {
        if self.is_zero() {
            f64::INFINITY
        } else {
            self.0 as f64 / SCALE as f64
        }
    }

    /// Whether this is the semiring zero (no path).
    pub const fn is_zero(self) -> bool {
        self.0 == i64::MAX
    }

    /// Semiring product: sum of costs, absorbing on zero.
    #[inline]
    pub fn times(self, other: Weight) -> Weight {
        if self.is_zero() || other.is_zero() {
            return Weight::zero();
        }
        Weight(self.0.saturating_add(other.0).min(i64::MAX - 1))
    }

    /// Semiring sum: the better of two costs.
    #[inline]
    pub fn plus(self, other: Weight) -> Weight {
        self.min(other)
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::one()
    }
}

impl Add for Weight {
    type Output = Weight;

    fn add(self, rhs: Weight) -> Weight {
        self.times(rhs)
    }
}

impl From<f32> for Weight {
    fn from(value: f32) -> Self {
        Weight::new(value)
    }
}

impl fmt::Debug for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Weight({self})")
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("inf");
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / SCALE as u64;
        let frac = abs % SCALE as u64;
        if frac == 0 {
            write!(f, "{sign}{whole}")
        } else {
            let digits = format!("{frac:04}");
            write!(f, "{sign}{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}
