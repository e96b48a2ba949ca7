//! `appointbook` - In-memory medical appointment booking
//!
//! This library provides the booking rules, the appointment store they guard,
//! the doctor directory and the session that ties them together. The `appt`
//! binary wraps it in a terminal front-end.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod appointment;
pub mod cli;
pub mod clock;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod rules;
pub mod session;
pub mod store;

pub use appointment::{Appointment, AppointmentId, AppointmentStatus, BookingRequest};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use directory::{BusinessHours, Doctor, DoctorDirectory};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use rules::{validate_booking, validate_cancellation, Rejection, RuleSet, ValidatedBooking};
pub use session::Session;
pub use store::{AppointmentStore, StoreStats};
