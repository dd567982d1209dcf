use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a booking request is rejected.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown service `{0}`")]
    UnknownService(String),

    #[error("the business is closed on the requested day")]
    ClosedDay,

    #[error("the requested slot is outside business hours")]
    OutOfHours,

    #[error("the requested slot is already taken")]
    SlotTaken,

    #[error("the service needs the following slot, which is not available")]
    SuccessorUnavailable,

    #[error("the requested date has already passed")]
    PastDate,

    #[error("booking could not be stored: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = match &self {
            BookingError::SlotTaken | BookingError::SuccessorUnavailable => StatusCode::CONFLICT,
            BookingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, self.to_string()).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("data file is not a valid appointment list: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("appointment `{0}` is stored more than once")]
    DuplicateId(String),

    #[error("appointments `{first}` and `{second}` overlap")]
    Overlap { first: String, second: String },

    #[error("appointment `{0}` refers to a service that is not offered")]
    UnknownService(String),

    #[error("appointment `{0}` does not span its service duration")]
    DurationMismatch(String),

    #[error("appointment `{0}` has a price out of range")]
    PriceOutOfRange(String),

    #[error("revenue for {0} does not fit in a decimal")]
    RevenueOverflow(NaiveDate),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("business hours {open_hour}..{close_hour} are not a valid day range")]
    InvalidBusinessHours { open_hour: u32, close_hour: u32 },

    #[error("service `{0}` must last one or two slots")]
    InvalidDuration(String),

    #[error("service `{0}` has a negative price")]
    NegativePrice(String),

    #[error("service `{0}` costs more than the maximum price")]
    PriceTooHigh(String),

    #[error("service `{0}` is listed twice")]
    DuplicateService(String),
}
