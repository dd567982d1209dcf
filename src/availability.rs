//! Slot occupancy derived from an appointment snapshot.
//!
//! Nothing here mutates the snapshot. The functions assume appointments on
//! the same date never overlap; that is enforced when booking and when the
//! store loads its data file.

use crate::{
    calendar::{successor_slot, BusinessHours, Slot},
    catalog::{ServiceCatalog, ServiceId},
    types::{Appointment, DailySummary, ScheduledSlot, SlotState},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus<'a> {
    Available,
    OccupiedStart(&'a Appointment),
    OccupiedContinuation(&'a Appointment),
}

impl<'a> SlotStatus<'a> {
    pub fn state(&self) -> SlotState {
        match self {
            SlotStatus::Available => SlotState::Available,
            SlotStatus::OccupiedStart(_) => SlotState::OccupiedStart,
            SlotStatus::OccupiedContinuation(_) => SlotState::OccupiedContinuation,
        }
    }

    pub fn appointment(&self) -> Option<&'a Appointment> {
        match *self {
            SlotStatus::Available => None,
            SlotStatus::OccupiedStart(appointment)
            | SlotStatus::OccupiedContinuation(appointment) => Some(appointment),
        }
    }
}

pub fn slot_status(date: NaiveDate, slot: Slot, appointments: &[Appointment]) -> SlotStatus<'_> {
    let covering = appointments
        .iter()
        .filter(|appointment| appointment.date == date)
        .find(|appointment| appointment.covers(slot));

    match covering {
        Some(appointment) if appointment.start_slot == slot => {
            SlotStatus::OccupiedStart(appointment)
        }
        Some(appointment) => SlotStatus::OccupiedContinuation(appointment),
        None => SlotStatus::Available,
    }
}

pub fn is_slot_free(date: NaiveDate, slot: Slot, appointments: &[Appointment]) -> bool {
    slot_status(date, slot, appointments) == SlotStatus::Available
}

/// Whether the slot after `slot` is inside business hours and free.
pub fn is_successor_free(
    date: NaiveDate,
    slot: Slot,
    appointments: &[Appointment],
    business_close_hour: u32,
) -> bool {
    let successor = successor_slot(slot);
    if successor.hour() >= business_close_hour || successor == slot {
        return false;
    }
    is_slot_free(date, successor, appointments)
}

/// Whether the `count` slots following `slot` are all inside business hours
/// and free.
pub fn successors_free(
    date: NaiveDate,
    slot: Slot,
    count: u32,
    appointments: &[Appointment],
    business_close_hour: u32,
) -> bool {
    let mut last_slot = slot;
    for _ in 0..count {
        if !is_successor_free(date, last_slot, appointments, business_close_hour) {
            return false;
        }
        last_slot = successor_slot(last_slot);
    }
    true
}

/// Services a booking starting at `slot` would be accepted for. Empty on the
/// closed day, outside business hours and when the slot itself is taken.
pub fn bookable_services(
    date: NaiveDate,
    slot: Slot,
    hours: &BusinessHours,
    catalog: &ServiceCatalog,
    appointments: &[Appointment],
) -> Vec<ServiceId> {
    if hours.is_closed_day(date)
        || !hours.contains(slot)
        || !is_slot_free(date, slot, appointments)
    {
        return vec![];
    }
    catalog
        .services()
        .iter()
        .filter(|service| {
            successors_free(
                date,
                slot,
                service.duration_slots.saturating_sub(1),
                appointments,
                hours.close_hour(),
            )
        })
        .map(|service| service.id)
        .collect()
}

/// Status of every slot of the business day, in order.
pub fn day_schedule<'a>(
    date: NaiveDate,
    hours: &BusinessHours,
    appointments: &'a [Appointment],
) -> Vec<(Slot, SlotStatus<'a>)> {
    hours
        .slots()
        .into_iter()
        .map(|slot| (slot, slot_status(date, slot, appointments)))
        .collect()
}

/// Day schedule as records for rendering. Appointment details are only
/// attached when `with_details` is set.
pub fn render_day_schedule(
    date: NaiveDate,
    hours: &BusinessHours,
    catalog: &ServiceCatalog,
    appointments: &[Appointment],
    with_details: bool,
) -> Vec<ScheduledSlot> {
    day_schedule(date, hours, appointments)
        .into_iter()
        .map(|(slot, status)| ScheduledSlot {
            slot,
            state: status.state(),
            bookable_services: bookable_services(date, slot, hours, catalog, appointments),
            appointment: status
                .appointment()
                .filter(|_| with_details)
                .cloned(),
        })
        .collect()
}

/// Appointments on `date`, ordered by start slot.
pub fn day_appointments(date: NaiveDate, appointments: &[Appointment]) -> Vec<Appointment> {
    let mut day: Vec<Appointment> = appointments
        .iter()
        .filter(|appointment| appointment.date == date)
        .cloned()
        .collect();
    day.sort_unstable_by_key(|appointment| appointment.start_slot);
    day
}

/// Counts appointments, not slots. `None` if the revenue does not fit in a
/// `Decimal`.
pub fn daily_summary(date: NaiveDate, appointments: &[Appointment]) -> Option<DailySummary> {
    appointments
        .iter()
        .filter(|appointment| appointment.date == date)
        .try_fold(
            DailySummary {
                count: 0,
                total_revenue: Decimal::ZERO,
            },
            |summary, appointment| {
                Some(DailySummary {
                    count: summary.count + 1,
                    total_revenue: summary.total_revenue.checked_add(appointment.total_price)?,
                })
            },
        )
}
