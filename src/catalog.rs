use crate::error::{BookingError, ConfigError};
use lazy_static::lazy_static;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, str::FromStr};

lazy_static! {
    /// Upper bound for service and appointment prices. A full day of
    /// appointments at this price still sums without overflow.
    pub static ref MAX_PRICE: Decimal = dec!(1_000_000);

    /// The services offered by the business.
    pub static ref DEFAULT_CATALOG: ServiceCatalog = ServiceCatalog {
        services: vec![
            Service {
                id: ServiceId::Hands,
                display_name: "Hands".into(),
                duration_slots: 1,
                price: dec!(35.00),
            },
            Service {
                id: ServiceId::Feet,
                display_name: "Feet".into(),
                duration_slots: 1,
                price: dec!(35.00),
            },
            Service {
                id: ServiceId::HandsAndFeet,
                display_name: "Hands + Feet".into(),
                duration_slots: 2,
                price: dec!(60.00),
            },
        ],
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceId {
    Hands,
    Feet,
    HandsAndFeet,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::Hands => "HANDS",
            ServiceId::Feet => "FEET",
            ServiceId::HandsAndFeet => "HANDS_AND_FEET",
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceId {
    type Err = BookingError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        match id {
            "HANDS" => Ok(ServiceId::Hands),
            "FEET" => Ok(ServiceId::Feet),
            "HANDS_AND_FEET" => Ok(ServiceId::HandsAndFeet),
            _ => Err(BookingError::UnknownService(id.into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    pub display_name: String,
    pub duration_slots: u32,
    pub price: Decimal,
}

/// Closed, immutable set of bookable services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<Service>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for service in &services {
            if !(1..=2).contains(&service.duration_slots) {
                return Err(ConfigError::InvalidDuration(service.id.to_string()));
            }
            if service.price.is_sign_negative() && !service.price.is_zero() {
                return Err(ConfigError::NegativePrice(service.id.to_string()));
            }
            if service.price > *MAX_PRICE {
                return Err(ConfigError::PriceTooHigh(service.id.to_string()));
            }
            if !seen.insert(service.id) {
                return Err(ConfigError::DuplicateService(service.id.to_string()));
            }
        }
        Ok(Self { services })
    }

    pub fn lookup(&self, service_id: &str) -> Result<&Service, BookingError> {
        let id = service_id.parse::<ServiceId>()?;
        self.services
            .iter()
            .find(|service| service.id == id)
            .ok_or_else(|| BookingError::UnknownService(service_id.into()))
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        DEFAULT_CATALOG.clone()
    }
}
