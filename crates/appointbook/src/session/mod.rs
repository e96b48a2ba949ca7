//! The booking session.
//!
//! A [`Session`] owns everything a running front-end needs: the doctor
//! directory, the appointment store, the rule settings and the clock. It is
//! the only place where validation is followed by mutation, so a rejected
//! action never touches the store.

pub mod shell;
pub mod view;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::appointment::{Appointment, AppointmentId, BookingRequest};
use crate::clock::Clock;
use crate::config::Config;
use crate::directory::{Doctor, DoctorDirectory};
use crate::error::{Error, Result};
use crate::rules::{self, Rejection, RuleSet, ValidatedBooking};
use crate::store::AppointmentStore;

pub use shell::Shell;

/// Top-level state of one booking session.
#[derive(Debug)]
pub struct Session<C> {
    directory: DoctorDirectory,
    store: AppointmentStore,
    rules: RuleSet,
    clock: C,
}

impl<C: Clock> Session<C> {
    /// Create a session with an empty store.
    pub fn new(directory: DoctorDirectory, rules: RuleSet, clock: C) -> Self {
        Self {
            directory,
            store: AppointmentStore::new(),
            rules,
            clock,
        }
    }

    /// Create a session from loaded configuration.
    pub fn from_config(config: &Config, clock: C) -> Self {
        Self::new(config.directory(), config.rule_set(), clock)
    }

    /// The doctor directory.
    pub fn directory(&self) -> &DoctorDirectory {
        &self.directory
    }

    /// The appointment store, read-only.
    pub fn store(&self) -> &AppointmentStore {
        &self.store
    }

    /// The rule settings.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The current moment according to the session clock.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Mutable access to the clock, e.g. to advance a [`crate::FixedClock`].
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Specialties offered by the directory.
    pub fn specialties(&self) -> Vec<&str> {
        self.directory.specialties()
    }

    /// Doctors practising `specialty`.
    pub fn doctors_for<'a>(&'a self, specialty: &'a str) -> Vec<&'a Doctor> {
        self.directory.by_specialty(specialty).collect()
    }

    /// Check `request` against the rules without booking it.
    ///
    /// # Errors
    ///
    /// Returns the first [`Rejection`] that applies.
    pub fn preview<'a>(
        &'a self,
        request: &'a BookingRequest,
    ) -> std::result::Result<ValidatedBooking<'a>, Rejection> {
        rules::validate_booking(
            request,
            self.store.all(),
            &self.directory,
            &self.rules,
            self.clock.now(),
        )
    }

    /// Validate `request` and, if accepted, add a confirmed appointment.
    ///
    /// Returns a copy of the stored record.
    ///
    /// # Errors
    ///
    /// Returns the first [`Rejection`] that applies; the store is unchanged.
    pub fn book(
        &mut self,
        request: &BookingRequest,
    ) -> std::result::Result<Appointment, Rejection> {
        let now = self.clock.now();
        let validated = rules::validate_booking(
            request,
            self.store.all(),
            &self.directory,
            &self.rules,
            now,
        )?;

        let appointment = Appointment::confirmed(
            self.store.next_id(),
            validated.patient_name,
            validated.doctor,
            validated.date,
            validated.time,
        );
        self.store.add(appointment.clone());
        Ok(appointment)
    }

    /// Cancel the confirmed appointment `id`, stamping the current moment.
    ///
    /// Returns a copy of the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AppointmentNotFound`] when no confirmed appointment
    /// has that id, or [`Error::Rejected`] when the rules refuse; the store
    /// is unchanged in both cases.
    pub fn cancel(&mut self, id: AppointmentId) -> Result<Appointment> {
        let now = self.clock.now();
        let Some(appointment) = self.store.get(id).filter(|a| a.is_confirmed()) else {
            debug!("No confirmed appointment {} to cancel", id);
            return Err(Error::AppointmentNotFound(id));
        };
        rules::validate_cancellation(appointment, &self.rules, now)?;

        self.store.cancel(id, now);
        self.store
            .get(id)
            .cloned()
            .ok_or(Error::AppointmentNotFound(id))
    }

    /// Confirmed appointments, in booking order.
    pub fn confirmed(&self) -> impl Iterator<Item = &Appointment> {
        self.store.confirmed()
    }
}
