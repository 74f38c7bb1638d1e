use core::fmt;

use serde::{Deserialize, Serialize};

/// Delivery details collected in the shipping step.
///
/// Every field is required. Nothing beyond presence is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// A shipping form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShippingField {
    FirstName,
    LastName,
    Email,
    Address,
    City,
    State,
    ZipCode,
    Country,
}

impl ShippingField {
    /// All fields in form order.
    pub const ALL: [Self; 8] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Address,
        Self::City,
        Self::State,
        Self::ZipCode,
        Self::Country,
    ];

    /// Form label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "Email",
            Self::Address => "Address",
            Self::City => "City",
            Self::State => "State",
            Self::ZipCode => "ZIP Code",
            Self::Country => "Country",
        }
    }
}

impl fmt::Display for ShippingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl ShippingDetails {
    /// Value of a single field.
    #[must_use]
    pub fn value(&self, field: ShippingField) -> &str {
        match field {
            ShippingField::FirstName => &self.first_name,
            ShippingField::LastName => &self.last_name,
            ShippingField::Email => &self.email,
            ShippingField::Address => &self.address,
            ShippingField::City => &self.city,
            ShippingField::State => &self.state,
            ShippingField::ZipCode => &self.zip_code,
            ShippingField::Country => &self.country,
        }
    }

    /// Fields that are empty or whitespace-only, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<ShippingField> {
        ShippingField::ALL
            .into_iter()
            .filter(|field| self.value(*field).trim().is_empty())
            .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn complete() -> ShippingDetails {
        ShippingDetails {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 St James's Square".to_string(),
            city: "London".to_string(),
            state: "Greater London".to_string(),
            zip_code: "SW1Y 4JH".to_string(),
            country: "United Kingdom".to_string(),
        }
    }

    #[test]
    fn test_complete_details_have_no_missing_fields() {
        assert!(complete().is_complete());
    }

    #[test]
    fn test_each_blank_field_is_reported() {
        for field in ShippingField::ALL {
            let mut details = complete();
            match field {
                ShippingField::FirstName => details.first_name.clear(),
                ShippingField::LastName => details.last_name.clear(),
                ShippingField::Email => details.email.clear(),
                ShippingField::Address => details.address.clear(),
                ShippingField::City => details.city.clear(),
                ShippingField::State => details.state = "   ".to_string(),
                ShippingField::ZipCode => details.zip_code.clear(),
                ShippingField::Country => details.country.clear(),
            }
            assert_eq!(details.missing_fields(), vec![field]);
        }
    }

    #[test]
    fn test_default_is_missing_everything() {
        assert_eq!(
            ShippingDetails::default().missing_fields(),
            ShippingField::ALL.to_vec()
        );
    }
}
