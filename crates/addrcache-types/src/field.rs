use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// An address granularity level that participates in lookup keys.
///
/// Variants are declared coarsest first. The declaration order is the
/// hierarchy order and never changes at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    /// CLDR region code (e.g. `US`, `CH`).
    Country,
    /// Top-level administrative area: state, province, prefecture.
    AdminArea,
    /// City or town.
    Locality,
    /// District or suburb within a locality.
    DependentLocality,
}

impl AddressField {
    /// The lookup hierarchy, most general level first.
    pub const HIERARCHY: [AddressField; 4] = [
        Self::Country,
        Self::AdminArea,
        Self::Locality,
        Self::DependentLocality,
    ];

    /// Position of this field within [`AddressField::HIERARCHY`].
    pub const fn level(self) -> usize {
        match self {
            Self::Country => 0,
            Self::AdminArea => 1,
            Self::Locality => 2,
            Self::DependentLocality => 3,
        }
    }

    /// Stable snake_case name used in config files and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::AdminArea => "admin_area",
            Self::Locality => "locality",
            Self::DependentLocality => "dependent_locality",
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AddressField {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::HIERARCHY
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| TypeError::UnknownField(s.to_string()))
    }
}
