use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use futures::StreamExt;
use rust_decimal_macros::dec;
use tokio::sync::watch::{self, Sender};
use tokio_stream::wrappers::WatchStream;

use crate::{
    backend::AppointmentBackend,
    calendar::successor_slot,
    catalog::ServiceId,
    error::{BookingError, StoreError},
    types::{Appointment, AppointmentStatus, BookingRequest},
};

pub struct MockAppointmentBackendInner {
    pub success: AtomicBool,
    pub calls_to_appointments: AtomicU64,
    pub calls_to_appointment_stream: AtomicU64,
    pub calls_to_book: AtomicU64,
    pub calls_to_cancel: AtomicU64,
    pub appointments: Mutex<Vec<Appointment>>,
    pub sender: Sender<Vec<Appointment>>,
}

#[derive(Clone)]
pub struct MockAppointmentBackend(pub Arc<MockAppointmentBackendInner>);

impl MockAppointmentBackendInner {
    fn new() -> Self {
        let (sender, _) = watch::channel(vec![]);
        Self {
            success: AtomicBool::new(true),
            calls_to_appointments: AtomicU64::default(),
            calls_to_appointment_stream: AtomicU64::default(),
            calls_to_book: AtomicU64::default(),
            calls_to_cancel: AtomicU64::default(),
            appointments: Mutex::default(),
            sender,
        }
    }
}

impl MockAppointmentBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockAppointmentBackendInner::new()))
    }

    pub fn set_appointments(&self, appointments: Vec<Appointment>) {
        *self.0.appointments.lock().unwrap() = appointments.clone();
        self.0.sender.send_replace(appointments);
    }

    fn succeeds(&self) -> bool {
        self.0.success.load(Ordering::SeqCst)
    }
}

impl AppointmentBackend for MockAppointmentBackend {
    fn appointments(&self) -> Vec<Appointment> {
        self.0.calls_to_appointments.fetch_add(1, Ordering::SeqCst);
        self.0.appointments.lock().unwrap().clone()
    }

    fn appointment_stream(&self) -> WatchStream<Vec<Appointment>> {
        self.0
            .calls_to_appointment_stream
            .fetch_add(1, Ordering::SeqCst);
        WatchStream::new(self.0.sender.subscribe())
    }

    fn book(&self, request: BookingRequest) -> Result<Appointment, BookingError> {
        self.0.calls_to_book.fetch_add(1, Ordering::SeqCst);
        if !self.succeeds() {
            return Err(BookingError::SlotTaken);
        }
        Ok(Appointment {
            id: "mock-appointment".into(),
            actor_id: request.actor.id,
            actor_name: request.actor.name,
            actor_contact: request.actor.contact,
            date: request.date,
            start_slot: request.start_slot,
            end_slot: successor_slot(request.start_slot),
            service_id: ServiceId::Hands,
            total_price: dec!(35.00),
            status: AppointmentStatus::Occupied,
        })
    }

    fn cancel(&self, _id: &str) -> Result<(), StoreError> {
        self.0.calls_to_cancel.fetch_add(1, Ordering::SeqCst);
        match self.succeeds() {
            true => Ok(()),
            false => Err(StoreError::Io(std::io::Error::other("Supposed to fail"))),
        }
    }
}

pub async fn read_from_appointment_stream(
    appointment_stream: &mut WatchStream<Vec<Appointment>>,
) -> Vec<Appointment> {
    tokio::time::timeout(Duration::from_secs(1), appointment_stream.next())
        .await
        .expect("No appointments received in time")
        .expect("Appointment stream closed")
}
