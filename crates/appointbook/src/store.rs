//! In-memory appointment store.
//!
//! An ordered log of appointment records. Records are appended by `add` and
//! only ever change through `cancel`; nothing is deleted, and everything is
//! dropped with the session.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info};

use crate::appointment::{Appointment, AppointmentId};

/// Store of every appointment booked during a session.
#[derive(Debug, Default)]
pub struct AppointmentStore {
    /// Records in booking order.
    appointments: Vec<Appointment>,
    /// Last identifier handed out.
    last_id: u64,
}

impl AppointmentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next unique appointment identifier.
    ///
    /// Identifiers are never reused, even when the record they were issued
    /// for is never added.
    pub fn next_id(&mut self) -> AppointmentId {
        self.last_id += 1;
        AppointmentId::new(self.last_id)
    }

    /// Append an appointment.
    pub fn add(&mut self, appointment: Appointment) {
        info!(
            "Booked {} for {} with {} on {} {}",
            appointment.id,
            appointment.patient_name,
            appointment.doctor_name,
            appointment.date,
            appointment.time.format("%H:%M")
        );
        self.appointments.push(appointment);
    }

    /// Mark the appointment `id` as canceled at `at`.
    ///
    /// Returns `true` if a confirmed appointment was transitioned. Unknown
    /// and already-canceled ids leave the store unchanged and return `false`.
    pub fn cancel(&mut self, id: AppointmentId, at: NaiveDateTime) -> bool {
        let Some(appointment) = self.appointments.iter_mut().find(|a| a.id == id) else {
            debug!("Cancel of unknown appointment {} ignored", id);
            return false;
        };

        if appointment.cancel(at) {
            info!("Canceled {} at {}", id, at);
            true
        } else {
            debug!("Appointment {} was already canceled", id);
            false
        }
    }

    /// Get an appointment by identifier.
    #[must_use]
    pub fn get(&self, id: AppointmentId) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// Every appointment, in booking order.
    #[must_use]
    pub fn all(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Confirmed appointments, in booking order.
    pub fn confirmed(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.iter().filter(|a| a.is_confirmed())
    }

    /// Number of records, confirmed or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    /// Check if nothing has been booked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    /// Get store statistics.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let confirmed = self.confirmed().count();
        StoreStats {
            total: self.appointments.len(),
            confirmed,
            canceled: self.appointments.len() - confirmed,
        }
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Total number of records.
    pub total: usize,
    /// Records still confirmed.
    pub confirmed: usize,
    /// Records canceled.
    pub canceled: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::DoctorDirectory;
    use chrono::{NaiveDate, NaiveTime};

    fn moment() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn create_test_appointment(store: &mut AppointmentStore, doctor_id: &str) -> AppointmentId {
        let directory = DoctorDirectory::default();
        let id = store.next_id();
        store.add(Appointment::confirmed(
            id,
            "Maria Souza",
            directory.get(doctor_id).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        ));
        id
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = AppointmentStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.confirmed().count(), 0);
    }

    #[test]
    fn test_next_id_is_unique() {
        let mut store = AppointmentStore::new();
        let ids: Vec<AppointmentId> = (0..1000).map(|_| store.next_id()).collect();

        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
        assert_eq!(ids[0], AppointmentId::new(1));
    }

    #[test]
    fn test_add_and_get() {
        let mut store = AppointmentStore::new();
        let id = create_test_appointment(&mut store, "d1");

        let appt = store.get(id).unwrap();
        assert_eq!(appt.doctor_name, "Dr. Plácido");
        assert!(appt.is_confirmed());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let store = AppointmentStore::new();
        assert!(store.get(AppointmentId::new(99)).is_none());
    }

    #[test]
    fn test_all_keeps_booking_order() {
        let mut store = AppointmentStore::new();
        let first = create_test_appointment(&mut store, "d2");
        let second = create_test_appointment(&mut store, "d3");

        let ids: Vec<AppointmentId> = store.all().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn test_cancel_transitions_and_stamps() {
        let mut store = AppointmentStore::new();
        let id = create_test_appointment(&mut store, "d1");

        assert!(store.cancel(id, moment()));

        let appt = store.get(id).unwrap();
        assert!(!appt.is_confirmed());
        assert_eq!(appt.canceled_at(), Some(moment()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.confirmed().count(), 0);
    }

    #[test]
    fn test_cancel_twice_is_noop() {
        let mut store = AppointmentStore::new();
        let id = create_test_appointment(&mut store, "d1");

        assert!(store.cancel(id, moment()));
        let later = moment() + chrono::Duration::hours(1);
        assert!(!store.cancel(id, later));
        assert_eq!(store.get(id).unwrap().canceled_at(), Some(moment()));
    }

    #[test]
    fn test_cancel_unknown_is_noop() {
        let mut store = AppointmentStore::new();
        create_test_appointment(&mut store, "d1");
        let before = store.all().to_vec();

        assert!(!store.cancel(AppointmentId::new(42), moment()));
        assert_eq!(store.all(), before.as_slice());
    }

    #[test]
    fn test_stats() {
        let mut store = AppointmentStore::new();
        let first = create_test_appointment(&mut store, "d1");
        create_test_appointment(&mut store, "d2");
        create_test_appointment(&mut store, "d3");
        store.cancel(first, moment());

        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.confirmed, 2);
        assert_eq!(stats.canceled, 1);
    }
}
