use crate::{
    error::{BookingError, StoreError},
    types::{Appointment, BookingRequest},
};
use tokio_stream::wrappers::WatchStream;

pub trait AppointmentBackend: Clone + Send + Sync + 'static {
    fn appointments(&self) -> Vec<Appointment>;
    fn appointment_stream(&self) -> WatchStream<Vec<Appointment>>;
    fn book(&self, request: BookingRequest) -> Result<Appointment, BookingError>;
    fn cancel(&self, id: &str) -> Result<(), StoreError>;
}
