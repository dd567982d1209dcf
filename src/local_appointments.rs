//! In-process appointment store.
//!
//! `book` keeps the store locked from validation until the new appointment is
//! committed, which makes this the single writer the booking validator relies
//! on. With a data file configured, every change is written to disk before it
//! is applied in memory. A data file is only accepted if its records could
//! have been booked together.

use crate::{
    backend::AppointmentBackend,
    booking::{cancel, BookingValidator},
    calendar::slot_after,
    catalog::MAX_PRICE,
    error::{BookingError, StoreError},
    types::{Appointment, BookingRequest},
};
use rust_decimal::Decimal;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::sync::watch::{self, Sender};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct LocalAppointments {
    appointments: Arc<Mutex<Vec<Appointment>>>,
    validator: BookingValidator,
    data_file: Option<PathBuf>,
    sender: Sender<Vec<Appointment>>,
}

impl LocalAppointments {
    pub fn new(validator: BookingValidator) -> Self {
        Self::from_appointments(validator, vec![], None)
    }

    /// Loads the appointments stored in `data_file`, or starts empty if the
    /// file does not exist yet.
    pub fn with_data_file(
        validator: BookingValidator,
        data_file: impl Into<PathBuf>,
    ) -> Result<Self, StoreError> {
        let data_file = data_file.into();
        let mut appointments = if data_file.exists() {
            let contents = fs::read(&data_file)?;
            serde_json::from_slice(&contents)?
        } else {
            vec![]
        };
        sort(&mut appointments);
        check_loaded(&validator, &appointments)?;
        info!(
            path = %data_file.display(),
            count = appointments.len(),
            "Loaded appointments"
        );
        Ok(Self::from_appointments(
            validator,
            appointments,
            Some(data_file),
        ))
    }

    fn from_appointments(
        validator: BookingValidator,
        mut appointments: Vec<Appointment>,
        data_file: Option<PathBuf>,
    ) -> Self {
        sort(&mut appointments);
        let (sender, _) = watch::channel(appointments.clone());
        Self {
            appointments: Arc::new(Mutex::new(appointments)),
            validator,
            data_file,
            sender,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Appointment>> {
        self.appointments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, appointments: &[Appointment]) -> Result<(), StoreError> {
        let Some(data_file) = &self.data_file else {
            return Ok(());
        };
        write_atomically(data_file, appointments).inspect_err(|err| {
            error!(?err, path = %data_file.display(), "Failed to write appointments");
        })
    }

    fn commit(
        &self,
        guard: &mut MutexGuard<'_, Vec<Appointment>>,
        mut updated: Vec<Appointment>,
    ) -> Result<(), StoreError> {
        sort(&mut updated);
        self.persist(&updated)?;
        self.sender.send_replace(updated.clone());
        **guard = updated;
        Ok(())
    }
}

fn sort(appointments: &mut [Appointment]) {
    appointments.sort_by(|a, b| (a.date, a.start_slot).cmp(&(b.date, b.start_slot)));
}

/// Expects `appointments` sorted by date and start slot.
fn check_loaded(
    validator: &BookingValidator,
    appointments: &[Appointment],
) -> Result<(), StoreError> {
    let mut ids = HashSet::new();
    for appointment in appointments {
        if !ids.insert(appointment.id.as_str()) {
            return Err(StoreError::DuplicateId(appointment.id.clone()));
        }
        let service = validator
            .catalog()
            .lookup(appointment.service_id.as_str())
            .map_err(|_| StoreError::UnknownService(appointment.id.clone()))?;
        if appointment.end_slot != slot_after(appointment.start_slot, service.duration_slots) {
            return Err(StoreError::DurationMismatch(appointment.id.clone()));
        }
        if appointment.total_price < Decimal::ZERO || appointment.total_price > *MAX_PRICE {
            return Err(StoreError::PriceOutOfRange(appointment.id.clone()));
        }
    }

    // sorted, so any overlap shows up between neighbours
    for pair in appointments.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        if first.date == second.date && second.start_slot < first.end_slot {
            return Err(StoreError::Overlap {
                first: first.id.clone(),
                second: second.id.clone(),
            });
        }
    }
    Ok(())
}

fn write_atomically(path: &Path, appointments: &[Appointment]) -> Result<(), StoreError> {
    let contents = serde_json::to_vec_pretty(appointments)?;
    let mut temporary = path.as_os_str().to_owned();
    temporary.push(".tmp");
    fs::write(&temporary, contents)?;
    fs::rename(&temporary, path)?;
    Ok(())
}

impl AppointmentBackend for LocalAppointments {
    fn appointments(&self) -> Vec<Appointment> {
        self.lock().clone()
    }

    fn appointment_stream(&self) -> WatchStream<Vec<Appointment>> {
        WatchStream::new(self.sender.subscribe())
    }

    fn book(&self, request: BookingRequest) -> Result<Appointment, BookingError> {
        let mut appointments = self.lock();

        let appointment = self
            .validator
            .validate(&request, &appointments)
            .inspect_err(|err| {
                warn!(
                    %err,
                    date = %request.date,
                    slot = %request.start_slot,
                    service = %request.service_id,
                    "Booking rejected"
                );
            })?;

        let mut updated = appointments.clone();
        updated.push(appointment.clone());
        self.commit(&mut appointments, updated)?;

        info!(
            id = %appointment.id,
            date = %appointment.date,
            start = %appointment.start_slot,
            end = %appointment.end_slot,
            "Appointment booked"
        );
        Ok(appointment)
    }

    fn cancel(&self, id: &str) -> Result<(), StoreError> {
        let mut appointments = self.lock();

        let remaining = cancel(id, &appointments);
        if remaining.len() == appointments.len() {
            debug!(id, "No appointment to cancel");
            return Ok(());
        }
        self.commit(&mut appointments, remaining)?;

        info!(id, "Appointment cancelled");
        Ok(())
    }
}
