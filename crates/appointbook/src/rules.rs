//! Booking and cancellation rules.
//!
//! Both entry points are pure: they look at the proposed action, the
//! appointments already in the store and the current moment, and either
//! accept or return the first [`Rejection`] that applies. Mutation is left
//! to the caller.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, trace};

use crate::appointment::{Appointment, BookingRequest};
use crate::directory::{Doctor, DoctorDirectory};

/// Default advance notice for bookings, and cancellation window, in hours.
pub const DEFAULT_WINDOW_HOURS: u32 = 2;

/// Why a booking or cancellation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// A required form field is blank.
    MissingFields,
    /// The doctor identifier is not in the directory.
    UnknownDoctor,
    /// The doctor does not practise the chosen specialty.
    SpecialtyMismatch,
    /// The doctor already has a confirmed appointment at that date and time.
    SlotTaken,
    /// The specialty already has a confirmed appointment that day.
    SpecialtyBookedThatDay,
    /// The time falls outside the doctor's business hours.
    OutsideBusinessHours,
    /// The booking is not far enough in the future.
    TooSoon {
        /// Required advance notice in hours.
        hours: u32,
    },
    /// The appointment's date-time is already in the past.
    AlreadyOccurred,
    /// Too little time remains before the appointment to cancel it.
    CancellationWindowPassed {
        /// Cancellation window in hours.
        hours: u32,
    },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "missing fields"),
            Self::UnknownDoctor => write!(f, "unknown doctor"),
            Self::SpecialtyMismatch => write!(f, "doctor does not attend that specialty"),
            Self::SlotTaken => write!(f, "slot already taken"),
            Self::SpecialtyBookedThatDay => write!(f, "specialty already booked that day"),
            Self::OutsideBusinessHours => write!(f, "outside business hours"),
            Self::TooSoon { hours } => {
                let unit = if *hours == 1 { "hour" } else { "hours" };
                write!(f, "must book at least {hours} {unit} ahead")
            }
            Self::AlreadyOccurred => write!(f, "appointment already occurred"),
            Self::CancellationWindowPassed { hours } => {
                write!(f, "cancellation window ({hours}h) has passed")
            }
        }
    }
}

impl std::error::Error for Rejection {}

impl Rejection {
    /// A stable snake-case code, recorded as the `code` field of rejection
    /// log events.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::UnknownDoctor => "unknown_doctor",
            Self::SpecialtyMismatch => "specialty_mismatch",
            Self::SlotTaken => "slot_taken",
            Self::SpecialtyBookedThatDay => "specialty_booked_that_day",
            Self::OutsideBusinessHours => "outside_business_hours",
            Self::TooSoon { .. } => "too_soon",
            Self::AlreadyOccurred => "already_occurred",
            Self::CancellationWindowPassed { .. } => "cancellation_window_passed",
        }
    }
}

/// The tunable parts of the rule-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    /// A booking must start strictly more than this many hours from now.
    pub advance_notice_hours: u32,
    /// A cancellation needs at least this many hours before the appointment.
    pub cancellation_window_hours: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            advance_notice_hours: DEFAULT_WINDOW_HOURS,
            cancellation_window_hours: DEFAULT_WINDOW_HOURS,
        }
    }
}

impl RuleSet {
    /// Advance notice as a duration.
    #[must_use]
    pub fn advance_notice(&self) -> Duration {
        Duration::hours(i64::from(self.advance_notice_hours))
    }

    /// Cancellation window as a duration.
    #[must_use]
    pub fn cancellation_window(&self) -> Duration {
        Duration::hours(i64::from(self.cancellation_window_hours))
    }
}

/// A booking request that passed every rule, with the doctor resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedBooking<'d> {
    /// Trimmed patient name.
    pub patient_name: &'d str,
    /// The doctor being booked.
    pub doctor: &'d Doctor,
    /// Calendar date.
    pub date: NaiveDate,
    /// Wall-clock time.
    pub time: NaiveTime,
}

/// Decide whether `request` may be booked.
///
/// Rules are checked in order and the first failure wins:
/// 1. every field is filled in, the doctor exists and practises the chosen
///    specialty;
/// 2. the doctor has no confirmed appointment at the same date and time;
/// 3. the specialty has no confirmed appointment that day, with any doctor;
/// 4. the time is inside the doctor's business hours;
/// 5. the date-time is strictly more than the advance notice after `now`.
///
/// # Errors
///
/// Returns the [`Rejection`] of the first rule that fails.
pub fn validate_booking<'d>(
    request: &'d BookingRequest,
    existing: &[Appointment],
    directory: &'d DoctorDirectory,
    rules: &RuleSet,
    now: NaiveDateTime,
) -> Result<ValidatedBooking<'d>, Rejection> {
    let patient_name = request.patient_name.trim();
    let specialty = request.specialty.trim();
    let doctor_id = request.doctor_id.trim();

    let (Some(date), Some(time)) = (request.date, request.time) else {
        return reject(Rejection::MissingFields);
    };
    if patient_name.is_empty() || specialty.is_empty() || doctor_id.is_empty() {
        return reject(Rejection::MissingFields);
    }

    let Some(doctor) = directory.get(doctor_id) else {
        return reject(Rejection::UnknownDoctor);
    };
    if doctor.specialty != specialty {
        return reject(Rejection::SpecialtyMismatch);
    }

    let mut confirmed = existing.iter().filter(|a| a.is_confirmed());
    if confirmed
        .clone()
        .any(|a| a.doctor_id == doctor.id && a.date == date && a.time == time)
    {
        return reject(Rejection::SlotTaken);
    }
    if confirmed.any(|a| a.specialty == specialty && a.date == date) {
        return reject(Rejection::SpecialtyBookedThatDay);
    }

    if !doctor.hours.contains(time) {
        return reject(Rejection::OutsideBusinessHours);
    }

    // A notice reaching past the calendar's end leaves nothing bookable
    let too_soon = match now.checked_add_signed(rules.advance_notice()) {
        Some(earliest) => date.and_time(time) <= earliest,
        None => true,
    };
    if too_soon {
        return reject(Rejection::TooSoon {
            hours: rules.advance_notice_hours,
        });
    }

    trace!("Booking for {} with {} on {} {} accepted", patient_name, doctor.id, date, time);
    Ok(ValidatedBooking {
        patient_name,
        doctor,
        date,
        time,
    })
}

/// Decide whether `appointment` may be canceled at `now`.
///
/// # Errors
///
/// Returns [`Rejection::AlreadyOccurred`] if the appointment is in the past,
/// or [`Rejection::CancellationWindowPassed`] if less than the cancellation
/// window remains.
pub fn validate_cancellation(
    appointment: &Appointment,
    rules: &RuleSet,
    now: NaiveDateTime,
) -> Result<(), Rejection> {
    let starts_at = appointment.starts_at();

    if starts_at < now {
        return reject(Rejection::AlreadyOccurred);
    }
    if starts_at - now < rules.cancellation_window() {
        return reject(Rejection::CancellationWindowPassed {
            hours: rules.cancellation_window_hours,
        });
    }

    Ok(())
}

fn reject<T>(rejection: Rejection) -> Result<T, Rejection> {
    debug!(code = rejection.code(), "Rejected: {}", rejection);
    Err(rejection)
}
