//! Doctor reference data.
//!
//! The directory is static for the lifetime of a session: it is built from
//! configuration at startup and never mutated by booking or cancellation.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A doctor-specific window of wall-clock time during which bookings are
/// accepted. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    /// First bookable time of the day.
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Last bookable time of the day.
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl BusinessHours {
    /// Create a window from two wall-clock times.
    #[must_use]
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Check whether `time` falls inside the window, inclusive of both ends.
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time <= self.end
    }
}

impl std::fmt::Display for BusinessHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(hhmm::FORMAT),
            self.end.format(hhmm::FORMAT)
        )
    }
}

/// A doctor that patients can book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    /// Stable identifier, referenced by appointments.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Specialty label, e.g. `Cardiologia`.
    pub specialty: String,
    /// Business-hours window.
    pub hours: BusinessHours,
}

impl Doctor {
    /// Create a doctor.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        specialty: impl Into<String>,
        hours: BusinessHours,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            specialty: specialty.into(),
            hours,
        }
    }
}

/// Lookup table of the doctors a session can book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorDirectory {
    doctors: Vec<Doctor>,
}

impl DoctorDirectory {
    /// Build a directory from a list of doctors, keeping their order.
    #[must_use]
    pub fn new(doctors: Vec<Doctor>) -> Self {
        Self { doctors }
    }

    /// Look up a doctor by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Doctor> {
        let doctor = self.doctors.iter().find(|d| d.id == id);
        if doctor.is_none() {
            debug!("No doctor with id {}", id);
        }
        doctor
    }

    /// All distinct specialties, in the order they first appear.
    #[must_use]
    pub fn specialties(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for doctor in &self.doctors {
            if !seen.contains(&doctor.specialty.as_str()) {
                seen.push(&doctor.specialty);
            }
        }
        seen
    }

    /// The doctors practising `specialty`.
    pub fn by_specialty<'a>(
        &'a self,
        specialty: &'a str,
    ) -> impl Iterator<Item = &'a Doctor> + 'a {
        self.doctors.iter().filter(move |d| d.specialty == specialty)
    }

    /// Iterate over every doctor.
    pub fn iter(&self) -> impl Iterator<Item = &Doctor> {
        self.doctors.iter()
    }

    /// Number of doctors in the directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.doctors.len()
    }

    /// Check if the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty()
    }
}

impl Default for DoctorDirectory {
    fn default() -> Self {
        Self::new(default_doctors())
    }
}

impl From<Vec<Doctor>> for DoctorDirectory {
    fn from(doctors: Vec<Doctor>) -> Self {
        Self::new(doctors)
    }
}

/// The built-in doctors used when configuration supplies none.
#[must_use]
pub fn default_doctors() -> Vec<Doctor> {
    vec![
        Doctor::new("d1", "Dr. Plácido", "Cardiologia", hours(8, 17)),
        Doctor::new("d2", "Dr. Gabriel Leite", "Dermatologia", hours(9, 18)),
        Doctor::new("d3", "Dr. Luis Augusto", "Pediatria", hours(7, 16)),
    ]
}

fn hours(start: u32, end: u32) -> BusinessHours {
    BusinessHours::new(
        NaiveTime::from_hms_opt(start, 0, 0).unwrap_or_default(),
        NaiveTime::from_hms_opt(end, 0, 0).unwrap_or_default(),
    )
}

/// Serde helpers for `HH:MM` wall-clock times.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Format used when rendering times.
    pub const FORMAT: &str = "%H:%M";

    /// Parse `HH:MM`. Inputs with seconds are refused.
    ///
    /// # Errors
    ///
    /// Returns the chrono parse error if the input is not `HH:MM`.
    pub fn parse(s: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(s, FORMAT)
    }

    /// Serialize a time as `HH:MM`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    /// Deserialize a time from `HH:MM`.
    ///
    /// # Errors
    ///
    /// Fails when the string is not a valid wall-clock time.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_business_hours_inclusive() {
        let window = BusinessHours::new(t(8, 0), t(17, 0));
        assert!(window.contains(t(8, 0)));
        assert!(window.contains(t(12, 30)));
        assert!(window.contains(t(17, 0)));
        assert!(!window.contains(t(7, 59)));
        assert!(!window.contains(t(17, 1)));
    }

    #[test]
    fn test_business_hours_display() {
        let window = BusinessHours::new(t(9, 0), t(18, 0));
        assert_eq!(window.to_string(), "09:00-18:00");
    }

    #[test]
    fn test_default_directory() {
        let directory = DoctorDirectory::default();
        assert_eq!(directory.len(), 3);
        assert!(!directory.is_empty());

        let placido = directory.get("d1").unwrap();
        assert_eq!(placido.name, "Dr. Plácido");
        assert_eq!(placido.specialty, "Cardiologia");
        assert_eq!(placido.hours, BusinessHours::new(t(8, 0), t(17, 0)));
    }

    #[test]
    fn test_get_unknown() {
        let directory = DoctorDirectory::default();
        assert!(directory.get("d99").is_none());
    }

    #[test]
    fn test_specialties_are_distinct_and_ordered() {
        let mut doctors = default_doctors();
        doctors.push(Doctor::new("d4", "Dra. Ana", "Cardiologia", hours(10, 14)));
        let directory = DoctorDirectory::new(doctors);

        assert_eq!(
            directory.specialties(),
            vec!["Cardiologia", "Dermatologia", "Pediatria"]
        );
    }

    #[test]
    fn test_by_specialty() {
        let mut doctors = default_doctors();
        doctors.push(Doctor::new("d4", "Dra. Ana", "Cardiologia", hours(10, 14)));
        let directory = DoctorDirectory::from(doctors);

        let ids: Vec<&str> = directory
            .by_specialty("Cardiologia")
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["d1", "d4"]);
        assert_eq!(directory.by_specialty("Ortopedia").count(), 0);
    }

    #[test]
    fn test_hhmm_parse() {
        assert_eq!(hhmm::parse("08:30").unwrap(), t(8, 30));
        assert!(hhmm::parse("08:30:00").is_err());
        assert!(hhmm::parse("17:00:30").is_err());
        assert!(hhmm::parse("8h30").is_err());
        assert!(hhmm::parse("25:00").is_err());
    }

    #[test]
    fn test_doctor_serialization() {
        let doctor = Doctor::new("d2", "Dr. Gabriel Leite", "Dermatologia", hours(9, 18));
        let json = serde_json::to_string(&doctor).unwrap();
        assert!(json.contains(r#""start":"09:00""#));
        assert!(json.contains(r#""end":"18:00""#));

        let back: Doctor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doctor);
    }
}
