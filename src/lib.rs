//! Availability and booking engine for a single-provider business with
//! fixed opening hours and whole-hour slots, plus the axum host serving it.

pub mod availability;
pub mod backend;
pub mod booking;
pub mod calendar;
pub mod catalog;
pub mod clock;
pub mod configuration;
pub mod configuration_handler;
pub mod error;
pub mod http;
pub mod local_appointments;
#[cfg(test)]
mod testutils;
pub mod types;
