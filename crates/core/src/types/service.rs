//! How an order reaches the customer.

use serde::{Deserialize, Serialize};

/// Error parsing a [`ServiceMethod`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid service method '{0}', use 'Delivery' or 'Carryout'")]
pub struct ServiceMethodError(pub String);

/// Order service method.
///
/// Serialized with the vendor's capitalized names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ServiceMethod {
    #[default]
    Delivery,
    Carryout,
}

impl ServiceMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delivery => "Delivery",
            Self::Carryout => "Carryout",
        }
    }
}

impl std::fmt::Display for ServiceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceMethod {
    type Err = ServiceMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delivery" => Ok(Self::Delivery),
            "carryout" | "pickup" => Ok(Self::Carryout),
            _ => Err(ServiceMethodError(s.to_owned())),
        }
    }
}
