use std::fmt;
use std::str::FromStr;

use crate::error::ParseOperatorError;

/// Associative combine operator of a [`SegmentTree`](super::SegmentTree).
///
/// Arithmetic wraps on `i64` overflow instead of panicking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    #[default]
    Sum,
    Min,
    Max,
    Gcd,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Sum, Operator::Min, Operator::Max, Operator::Gcd];

    /// `combine(identity, x) == x` for every `x`.
    pub fn identity(self) -> i64 {
        match self {
            Operator::Sum => 0,
            Operator::Min => i64::MAX,
            Operator::Max => i64::MIN,
            Operator::Gcd => 0,
        }
    }

    pub fn combine(self, a: i64, b: i64) -> i64 {
        match self {
            Operator::Sum => a.wrapping_add(b),
            Operator::Min => a.min(b),
            Operator::Max => a.max(b),
            Operator::Gcd => gcd(a, b),
        }
    }

    /// Folds an additive `delta` applied to all `len` elements of a range
    /// into that range's aggregate.
    ///
    /// `None` when additive shifts do not commute with the operator.
    pub fn apply_delta(self, aggregate: i64, delta: i64, len: usize) -> Option<i64> {
        match self {
            Operator::Sum => Some(aggregate.wrapping_add(delta.wrapping_mul(len as i64))),
            Operator::Min | Operator::Max => Some(aggregate.wrapping_add(delta)),
            Operator::Gcd => None,
        }
    }

    /// Canonical form of an aggregate, `combine(identity, x)`.
    ///
    /// Only `Gcd` changes anything: it maps `x` to `|x|`.
    pub fn normalize(self, x: i64) -> i64 {
        self.combine(self.identity(), x)
    }

    pub fn supports_range_update(self) -> bool {
        self != Operator::Gcd
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Sum => "sum",
            Operator::Min => "min",
            Operator::Max => "max",
            Operator::Gcd => "gcd",
        }
    }
}

/// Euclid on absolute values; `gcd(0, x) == |x|`.
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a as i64
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = ParseOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Operator::Sum),
            "min" => Ok(Operator::Min),
            "max" => Ok(Operator::Max),
            "gcd" => Ok(Operator::Gcd),
            _ => Err(ParseOperatorError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities_are_neutral() {
        for op in Operator::ALL {
            for x in [-7i64, 0, 1, 12, 1_000_000] {
                let expected = if op == Operator::Gcd { x.abs() } else { x };
                assert_eq!(op.combine(op.identity(), x), expected, "{op}");
                assert_eq!(op.combine(x, op.identity()), expected, "{op}");
            }
        }
    }

    #[test]
    fn normalize_only_touches_gcd() {
        assert_eq!(Operator::Gcd.normalize(-9), 9);
        assert_eq!(Operator::Sum.normalize(-9), -9);
        assert_eq!(Operator::Min.normalize(-9), -9);
        assert_eq!(Operator::Max.normalize(-9), -9);
    }

    #[test]
    fn gcd_values() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(-12, 18), 6);
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(gcd(7, 0), 7);
    }

    #[test]
    fn parse_round_trips_names() {
        for op in Operator::ALL {
            assert_eq!(op.name().parse::<Operator>(), Ok(op));
        }
        assert_eq!(" MAX ".parse::<Operator>(), Ok(Operator::Max));
        assert_eq!(
            "lcm".parse::<Operator>(),
            Err(ParseOperatorError("lcm".to_string()))
        );
    }

    #[test]
    fn gcd_has_no_additive_delta() {
        assert_eq!(Operator::Sum.apply_delta(10, 2, 3), Some(16));
        assert_eq!(Operator::Min.apply_delta(10, 2, 3), Some(12));
        assert_eq!(Operator::Gcd.apply_delta(10, 2, 3), None);
        assert!(!Operator::Gcd.supports_range_update());
    }
}
