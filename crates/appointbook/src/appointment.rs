//! Core appointment types for appointbook.
//!
//! This module defines the appointment record kept in the store, its
//! one-way status, and the booking request the booking form produces.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::directory::{hhmm, Doctor};
use crate::error::Error;

/// Unique identifier of an appointment within a session.
///
/// Issued by [`crate::store::AppointmentStore::next_id`] and rendered as
/// `appt-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(u64);

impl AppointmentId {
    /// Wrap a raw sequence number.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw sequence number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "appt-{}", self.0)
    }
}

impl FromStr for AppointmentId {
    type Err = Error;

    /// Accepts both `appt-7` and `7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("appt-").unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| Error::InvalidAppointmentId {
                input: s.to_string(),
            })
    }
}

/// Lifecycle state of an appointment.
///
/// The only transition is `Confirmed` to `Canceled`; the cancellation moment
/// travels with the `Canceled` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    /// Booked and still standing.
    Confirmed,
    /// Canceled by the patient.
    Canceled {
        /// When the cancellation was accepted.
        canceled_at: NaiveDateTime,
    },
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::Canceled { .. } => write!(f, "CANCELED"),
        }
    }
}

/// A booked appointment.
///
/// Doctor name and specialty are copied from the directory at booking time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique identifier.
    pub id: AppointmentId,
    /// Patient display name.
    pub patient_name: String,
    /// Identifier of the booked doctor.
    pub doctor_id: String,
    /// Doctor name at booking time.
    pub doctor_name: String,
    /// Specialty at booking time.
    pub specialty: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Wall-clock time.
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    /// Current status.
    #[serde(flatten)]
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Create a confirmed appointment for `doctor`.
    #[must_use]
    pub fn confirmed(
        id: AppointmentId,
        patient_name: impl Into<String>,
        doctor: &Doctor,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            id,
            patient_name: patient_name.into(),
            doctor_id: doctor.id.clone(),
            doctor_name: doctor.name.clone(),
            specialty: doctor.specialty.clone(),
            date,
            time,
            status: AppointmentStatus::Confirmed,
        }
    }

    /// The appointment's date and time combined.
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Check if the appointment is still confirmed.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        matches!(self.status, AppointmentStatus::Confirmed)
    }

    /// When the appointment was canceled, if it was.
    #[must_use]
    pub fn canceled_at(&self) -> Option<NaiveDateTime> {
        match self.status {
            AppointmentStatus::Confirmed => None,
            AppointmentStatus::Canceled { canceled_at } => Some(canceled_at),
        }
    }

    /// Transition to `Canceled`, stamping `at`.
    ///
    /// Returns `false` and leaves the record untouched if it was already
    /// canceled.
    pub fn cancel(&mut self, at: NaiveDateTime) -> bool {
        match self.status {
            AppointmentStatus::Confirmed => {
                self.status = AppointmentStatus::Canceled { canceled_at: at };
                true
            }
            AppointmentStatus::Canceled { .. } => false,
        }
    }
}

/// What the booking form submits.
///
/// Blank strings and absent date/time count as missing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRequest {
    /// Patient display name.
    pub patient_name: String,
    /// Chosen specialty.
    pub specialty: String,
    /// Chosen doctor identifier.
    pub doctor_id: String,
    /// Chosen date.
    pub date: Option<NaiveDate>,
    /// Chosen time.
    pub time: Option<NaiveTime>,
}

impl BookingRequest {
    /// Create a fully filled request.
    #[must_use]
    pub fn new(
        patient_name: impl Into<String>,
        specialty: impl Into<String>,
        doctor_id: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            patient_name: patient_name.into(),
            specialty: specialty.into(),
            doctor_id: doctor_id.into(),
            date: Some(date),
            time: Some(time),
        }
    }
}
