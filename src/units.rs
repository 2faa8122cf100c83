//! This module defines various unit types and their conversions.
//!
//! Power on the consumer side is measured in kW ([`Power`]), while the utility markets work in MW
//! ([`Capacity`]). Money is in the scenario's currency (e.g. €).
use serde::{Deserialize, Serialize};
use std::iter::Sum;

/// The number of kW in one MW
const KW_PER_MW: f64 = 1000.0;

/// Represents a dimensionless quantity (ratios, proportions, counts used as multipliers).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Default,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
)]
pub struct Dimensionless(pub f64);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 / rhs.0)
    }
}

impl Dimensionless {
    /// Creates a new dimensionless quantity from a f64 value.
    pub fn new(val: f64) -> Self {
        Self(val)
    }

    /// Returns the value as a f64.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the value is finite (i.e. not infinite or NaN)
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl From<u64> for Dimensionless {
    fn from(val: u64) -> Self {
        Self(val as f64)
    }
}

macro_rules! unit_struct {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the value is finite (i.e. not infinite or NaN)
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                $name(iter.map(|x| x.0).sum())
            }
        }

        impl float_cmp::ApproxEq for $name {
            type Margin = float_cmp::F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                float_cmp::ApproxEq::approx_eq(self.0, other.0, margin)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 / rhs.0)
            }
        }
    };
}

impl float_cmp::ApproxEq for Dimensionless {
    type Margin = float_cmp::F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        float_cmp::ApproxEq::approx_eq(self.0, other.0, margin)
    }
}

// Base quantities
unit_struct!(
    /// An amount of money
    Money
);
unit_struct!(
    /// An amount of money, in millions
    MoneyMillions
);
unit_struct!(
    /// Flexible power in kW
    Power
);
unit_struct!(
    /// Flexible capacity in MW
    Capacity
);

// Derived quantities
unit_struct!(
    /// A cash flow occurring every year
    MoneyPerYear
);
unit_struct!(
    /// A yearly amount of money per kW of flexibility
    MoneyPerPowerPerYear
);
unit_struct!(
    /// The price of a market product, in whatever unit the product is traded in
    MarketPrice
);

// Division rules
impl_div!(Capacity, Capacity, Dimensionless);

// Multiplication rules
impl_mul!(Power, MoneyPerPowerPerYear, MoneyPerYear);

impl Power {
    /// Convert from kW to MW
    pub fn to_capacity(self) -> Capacity {
        Capacity(self.0 / KW_PER_MW)
    }
}

impl Money {
    /// Express in millions
    pub fn to_millions(self) -> MoneyMillions {
        MoneyMillions(self.0 / 1e6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_power_capacity_conversion() {
        let power = Power(300_000.0);
        assert_eq!(power.to_capacity(), Capacity(300.0));
        assert_eq!(Power(0.0).to_capacity(), Capacity(0.0));
    }

    #[test]
    fn test_revenue_from_power() {
        let revenue = Power(2.0) * MoneyPerPowerPerYear(50.0);
        assert_eq!(revenue, MoneyPerYear(100.0));
        assert_eq!(MoneyPerPowerPerYear(50.0) * Power(2.0), revenue);
    }

    #[test]
    fn test_sum() {
        let total: Power = [Power(1.0), Power(2.5), Power(0.5)].into_iter().sum();
        assert_approx_eq!(Power, total, Power(4.0));
        assert_eq!(std::iter::empty::<Money>().sum::<Money>(), Money(0.0));
    }

    #[test]
    fn test_supply_ratio_units() {
        assert_eq!(Capacity(150.0) / Capacity(100.0), Dimensionless(1.5));
    }

    #[test]
    fn test_to_millions() {
        assert_approx_eq!(MoneyMillions, Money(2.5e6).to_millions(), MoneyMillions(2.5));
    }
}
