//! Customer details collected on the checkout form.

use serde::{Deserialize, Serialize};

use crate::forms::FieldErrors;
use crate::types::Email;

/// Checkout form state. Transient: never persisted by the storefront.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// Customer details that passed validation, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
}

impl CustomerInfo {
    /// Check that every field is filled in and the email is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] keyed by field name.
    pub fn validate(&self) -> Result<Customer, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.require("name", &self.name, "Name is required");
        let email = errors.require_email("email", &self.email);
        let phone = errors.require("phone", &self.phone, "Phone is required");
        let address = errors.require("address", &self.address, "Delivery address is required");

        match email {
            Some(email) if errors.is_empty() => Ok(Customer {
                name: name.to_owned(),
                email,
                phone: phone.to_owned(),
                address: address.to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> CustomerInfo {
        CustomerInfo {
            name: "Robin".into(),
            email: "robin@example.com".into(),
            phone: "+32 123 456 789".into(),
            address: "Grote Markt 1, Brussels".into(),
        }
    }

    #[test]
    fn test_valid_customer_is_trimmed() {
        let mut info = filled();
        info.address = "  Grote Markt 1, Brussels \n".into();
        let customer = info.validate().unwrap();
        assert_eq!(customer.address, "Grote Markt 1, Brussels");
        assert_eq!(customer.email.as_str(), "robin@example.com");
    }

    #[test]
    fn test_each_blank_field_is_rejected() {
        for field in ["name", "email", "phone", "address"] {
            let mut info = filled();
            let slot = match field {
                "name" => &mut info.name,
                "email" => &mut info.email,
                "phone" => &mut info.phone,
                _ => &mut info.address,
            };
            *slot = "   ".into();

            let errors = info.validate().unwrap_err();
            assert!(errors.get(field).is_some(), "{field} should be required");
            assert_eq!(errors.iter().count(), 1);
        }
    }
}
