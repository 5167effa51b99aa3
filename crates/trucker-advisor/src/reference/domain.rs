use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! reference_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

reference_id!(
    /// Identifier of a city/garage site.
    LocationId
);
reference_id!(
    /// Identifier of a depot category.
    CompanyId
);
reference_id!(CargoId);
reference_id!(TrailerId);

/// A city that can host a garage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub country: String,
}

/// A depot category such as a logistics hub or a quarry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyType {
    pub id: CompanyId,
    pub name: String,
}

/// A job category with its base payout per kilometre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoType {
    pub id: CargoId,
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub fragile: bool,
    #[serde(default, rename = "high_value", alias = "highValue")]
    pub high_value: bool,
    #[serde(default)]
    pub excluded: bool,
}

impl CargoType {
    pub const FRAGILE_BONUS: f64 = 0.3;
    pub const HIGH_VALUE_BONUS: f64 = 0.3;

    /// Base value with the fragile and high-value bonuses stacked additively.
    pub fn adjusted_value(&self) -> f64 {
        let mut multiplier = 1.0;
        if self.fragile {
            multiplier += Self::FRAGILE_BONUS;
        }
        if self.high_value {
            multiplier += Self::HIGH_VALUE_BONUS;
        }
        self.value * multiplier
    }
}

/// A trailer model; only ownable trailers can be parked in a garage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailerType {
    pub id: TrailerId,
    pub name: String,
    #[serde(default)]
    pub ownable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCompanyLink {
    #[serde(alias = "cityId")]
    pub location_id: LocationId,
    pub company_id: CompanyId,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCargoLink {
    pub company_id: CompanyId,
    pub cargo_id: CargoId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoTrailerLink {
    pub cargo_id: CargoId,
    pub trailer_id: TrailerId,
}
