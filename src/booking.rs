//! Turns booking requests into appointments.
//!
//! The validator decides against the snapshot it is given and stores
//! nothing. Its no-overlap guarantee only holds if callers serialize
//! validate-then-commit against one authoritative snapshot (see
//! `LocalAppointments::book`); two writers validating against the same stale
//! snapshot could both succeed.

use crate::{
    availability::{is_slot_free, successors_free},
    calendar::{slot_after, BusinessHours},
    catalog::ServiceCatalog,
    error::BookingError,
    types::{Appointment, AppointmentStatus, BookingRequest},
};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct BookingValidator {
    catalog: ServiceCatalog,
    hours: BusinessHours,
}

impl BookingValidator {
    pub fn new(catalog: ServiceCatalog, hours: BusinessHours) -> Self {
        Self { catalog, hours }
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub fn hours(&self) -> &BusinessHours {
        &self.hours
    }

    /// Checks, in order: service, weekday, business hours, start slot, and
    /// every further slot the service needs. The first failure wins.
    pub fn validate(
        &self,
        request: &BookingRequest,
        appointments: &[Appointment],
    ) -> Result<Appointment, BookingError> {
        let service = self.catalog.lookup(&request.service_id)?;

        if self.hours.is_closed_day(request.date) {
            return Err(BookingError::ClosedDay);
        }
        if !self.hours.contains(request.start_slot) {
            return Err(BookingError::OutOfHours);
        }
        if !is_slot_free(request.date, request.start_slot, appointments) {
            return Err(BookingError::SlotTaken);
        }

        if !successors_free(
            request.date,
            request.start_slot,
            service.duration_slots.saturating_sub(1),
            appointments,
            self.hours.close_hour(),
        ) {
            return Err(BookingError::SuccessorUnavailable);
        }

        Ok(Appointment {
            id: Uuid::new_v4().to_string(),
            actor_id: request.actor.id.clone(),
            actor_name: request.actor.name.clone(),
            actor_contact: request.actor.contact.clone(),
            date: request.date,
            start_slot: request.start_slot,
            end_slot: slot_after(request.start_slot, service.duration_slots),
            service_id: service.id,
            total_price: service.price,
            status: AppointmentStatus::Occupied,
        })
    }
}

/// The collection without `appointment_id`. Unknown ids leave it unchanged.
pub fn cancel(appointment_id: &str, appointments: &[Appointment]) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|appointment| appointment.id != appointment_id)
        .cloned()
        .collect()
}
