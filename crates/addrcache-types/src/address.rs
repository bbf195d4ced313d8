use serde::{Deserialize, Serialize};

use crate::field::AddressField;

/// A (possibly partial) postal address.
///
/// Only the fields that take part in lookup keys are modelled here. Unset
/// fields are empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressData {
    pub region_code: String,
    pub administrative_area: String,
    pub locality: String,
    pub dependent_locality: String,
}

impl AddressData {
    /// Create an address with only the region code set.
    pub fn new(region_code: impl Into<String>) -> Self {
        Self {
            region_code: region_code.into(),
            ..Default::default()
        }
    }

    pub fn with_admin_area(mut self, value: impl Into<String>) -> Self {
        self.administrative_area = value.into();
        self
    }

    pub fn with_locality(mut self, value: impl Into<String>) -> Self {
        self.locality = value.into();
        self
    }

    pub fn with_dependent_locality(mut self, value: impl Into<String>) -> Self {
        self.dependent_locality = value.into();
        self
    }

    /// Value of `field`, or `""` when unset.
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::Country => &self.region_code,
            AddressField::AdminArea => &self.administrative_area,
            AddressField::Locality => &self.locality,
            AddressField::DependentLocality => &self.dependent_locality,
        }
    }

    /// Returns `true` if `field` has a non-empty value.
    pub fn has(&self, field: AddressField) -> bool {
        !self.get(field).is_empty()
    }
}
