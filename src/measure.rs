//! Simple zero-overhead unit of measure types
//!
//! A poor man's version of F#'s units of measure, in order to keep kilometers
//! and miles from being mixed up by construction.

use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

use approx::{AbsDiffEq, RelativeEq, relative_eq};
use num_traits::{Float, Num};

/// Kilometers in one international mile.
pub const KM_PER_MILE: f64 = 1.609344;

/// Anything that stores a bare numeric value in some unit.
pub trait UnitOfMeasure<N>
where
    N: Num + Copy,
{
    fn value(&self) -> N;
}

macro_rules! unit_of_measure {
    ($u:ident) => {
        #[derive(Clone, Copy, Default, PartialEq, PartialOrd, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
        pub struct $u<N: Num>(pub N);

        impl<N> UnitOfMeasure<N> for $u<N>
        where
            N: Num + Copy,
        {
            fn value(&self) -> N {
                self.0
            }
        }

        impl<N> Add for $u<N>
        where
            N: Num + Add,
        {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl<N> Sub for $u<N>
        where
            N: Num + Sub,
        {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl<N> AddAssign for $u<N>
        where
            N: Num + AddAssign,
        {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl<N> Div<N> for $u<N>
        where
            N: Num + Div,
        {
            type Output = Self;

            fn div(self, rhs: N) -> Self {
                Self(self.0 / rhs)
            }
        }

        impl<N> Mul<N> for $u<N>
        where
            N: Num + Mul,
        {
            type Output = Self;

            fn mul(self, rhs: N) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl<N> Sum for $u<N>
        where
            N: Num,
        {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self(N::zero()), |acc, x| acc + x)
            }
        }

        // Relative equality traits for appox support

        impl<N> AbsDiffEq for $u<N>
        where
            N: Num + Float + AbsDiffEq<N, Epsilon = N>,
        {
            type Epsilon = N;

            fn default_epsilon() -> Self::Epsilon {
                N::epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
                self.0.abs_diff_eq(&other.0, epsilon)
            }
        }

        impl<N> RelativeEq for $u<N>
        where
            N: Num + Float + AbsDiffEq<N, Epsilon = N> + RelativeEq<N>,
        {
            fn default_max_relative() -> Self::Epsilon {
                N::epsilon()
            }

            fn relative_eq(
                &self,
                other: &Self,
                epsilon: Self::Epsilon,
                max_relative: Self::Epsilon,
            ) -> bool {
                relative_eq!(
                    self.0,
                    other.0,
                    epsilon = epsilon,
                    max_relative = max_relative
                )
            }
        }
    };
}

// Angular units:
unit_of_measure![Degrees];

// Distance units:
unit_of_measure![Kilometers];
unit_of_measure![Miles];

impl From<Kilometers<f64>> for Miles<f64> {
    fn from(value: Kilometers<f64>) -> Self {
        Miles(value.0 / KM_PER_MILE)
    }
}

impl From<Miles<f64>> for Kilometers<f64> {
    fn from(value: Miles<f64>) -> Self {
        Kilometers(value.0 * KM_PER_MILE)
    }
}

impl Degrees<f64> {
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

impl<T> Display for Degrees<T>
where
    T: Num + Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// Distances are displayed compactly: whole units below 1000, thousands with
/// one decimal and a `k` suffix from there on.
impl Display for Kilometers<f64> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} km", compact_distance(self.0))
    }
}

impl Display for Miles<f64> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} mi", compact_distance(self.0))
    }
}

/// Format a distance value for display without its unit.
///
/// Values that round to less than 1000 are shown as that integer; anything
/// larger is shown in thousands with a single decimal, e.g. `15928.2` becomes
/// `15.9k`.
pub fn compact_distance(value: f64) -> String {
    let rounded = value.round();
    if rounded >= 1000.0 {
        format!("{:.1}k", value / 1000.0)
    } else {
        format!("{}", rounded)
    }
}

/// Convert a distance in kilometers into miles.
pub fn km_to_miles(km: Kilometers<f64>) -> Miles<f64> {
    km.into()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn unit_addition() {
        let a = Kilometers(2);
        let b = Kilometers(3);
        assert_eq!(a + b, Kilometers(5));
    }

    #[test]
    fn unit_sum() {
        let total: Kilometers<f64> = vec![Kilometers(1.5), Kilometers(2.0), Kilometers(0.5)]
            .into_iter()
            .sum();
        assert_eq!(total, Kilometers(4.0));

        let empty: Kilometers<f64> = Vec::<Kilometers<f64>>::new().into_iter().sum();
        assert_eq!(empty, Kilometers(0.0));
    }

    #[test]
    fn convert_km_to_miles() {
        assert_relative_eq!(km_to_miles(Kilometers(KM_PER_MILE)), Miles(1.0));
        assert_relative_eq!(
            Miles::from(Kilometers(100.0)),
            Miles(62.137_119),
            max_relative = 0.000_001
        );
    }

    #[test]
    fn convert_miles_to_km() {
        assert_relative_eq!(
            Kilometers::from(Miles(10.0)),
            Kilometers(16.09344),
            max_relative = 0.000_000_001
        );
    }

    #[test]
    fn compact_below_thousand() {
        assert_eq!(compact_distance(0.0), "0");
        assert_eq!(compact_distance(12.4), "12");
        assert_eq!(compact_distance(12.5), "13");
        assert_eq!(compact_distance(999.4), "999");
        assert_eq!(compact_distance(999.49), "999");
    }

    #[test]
    fn compact_thousands() {
        assert_eq!(compact_distance(1000.0), "1.0k");
        assert_eq!(compact_distance(999.5), "1.0k");
        assert_eq!(compact_distance(999.6), "1.0k");
        assert_eq!(compact_distance(1234.0), "1.2k");
        assert_eq!(compact_distance(15928.24), "15.9k");
    }

    #[test]
    fn display_with_unit() {
        assert_eq!(Miles(7312.43).to_string(), "7.3k mi");
        assert_eq!(Kilometers(42.0).to_string(), "42 km");
    }
}
