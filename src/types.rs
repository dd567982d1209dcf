use crate::{calendar::Slot, catalog::ServiceId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The person a booking is made for, supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub contact: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Occupied,
}

/// A committed booking. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub actor_id: String,
    pub actor_name: String,
    pub actor_contact: String,
    pub date: NaiveDate,
    pub start_slot: Slot,
    pub end_slot: Slot,
    pub service_id: ServiceId,
    pub total_price: Decimal,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Whether `slot` lies in the half-open interval `[start_slot, end_slot)`.
    pub fn covers(&self, slot: Slot) -> bool {
        self.start_slot <= slot && slot < self.end_slot
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub actor: Actor,
    pub date: NaiveDate,
    pub start_slot: Slot,
    pub service_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotState {
    Available,
    OccupiedStart,
    OccupiedContinuation,
}

/// A slot of a rendered day schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSlot {
    pub slot: Slot,
    pub state: SlotState,
    /// Services that would be accepted starting at this slot.
    #[serde(default)]
    pub bookable_services: Vec<ServiceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment: Option<Appointment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub count: usize,
    pub total_revenue: Decimal,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::calendar::parse_date;
    use rust_decimal_macros::dec;

    #[test]
    fn test_appointment_record_shape() {
        let appointment = Appointment {
            id: "b5d1c7e2".into(),
            actor_id: "actor-1".into(),
            actor_name: "Maria".into(),
            actor_contact: "(11) 91234-5678".into(),
            date: parse_date("2024-06-10").unwrap(),
            start_slot: "09:00".parse().unwrap(),
            end_slot: "11:00".parse().unwrap(),
            service_id: ServiceId::HandsAndFeet,
            total_price: dec!(60.00),
            status: AppointmentStatus::Occupied,
        };

        let value = serde_json::to_value(&appointment).unwrap();
        assert_eq!(value["date"], "2024-06-10");
        assert_eq!(value["startSlot"], "09:00");
        assert_eq!(value["endSlot"], "11:00");
        assert_eq!(value["serviceId"], "HANDS_AND_FEET");
        assert_eq!(value["totalPrice"], "60.00");
        assert_eq!(value["status"], "OCCUPIED");

        let restored: Appointment = serde_json::from_value(value).unwrap();
        assert_eq!(restored, appointment);
        assert_eq!(restored.total_price.scale(), 2);
    }

    #[test]
    fn test_reject_malformed_record() {
        let record = r#"{"id":"x","actorId":"a","actorName":"n","actorContact":"c",
            "date":"2024-06-10","startSlot":"9:15","endSlot":"10:00",
            "serviceId":"HANDS","totalPrice":"35.00","status":"OCCUPIED"}"#;
        serde_json::from_str::<Appointment>(record).unwrap_err();
    }

    #[test]
    fn test_covers_is_half_open() {
        let appointment = Appointment {
            id: "a".into(),
            actor_id: String::new(),
            actor_name: String::new(),
            actor_contact: String::new(),
            date: parse_date("2024-06-10").unwrap(),
            start_slot: "09:00".parse().unwrap(),
            end_slot: "11:00".parse().unwrap(),
            service_id: ServiceId::HandsAndFeet,
            total_price: dec!(60.00),
            status: AppointmentStatus::Occupied,
        };
        assert!(!appointment.covers("08:00".parse().unwrap()));
        assert!(appointment.covers("09:00".parse().unwrap()));
        assert!(appointment.covers("10:00".parse().unwrap()));
        assert!(!appointment.covers("11:00".parse().unwrap()));
    }
}
