//! Text rendering for the session views.

use std::io::Write;

use crate::appointment::{Appointment, AppointmentStatus};
use crate::directory::{hhmm, Doctor};
use crate::error::Result;
use crate::rules::ValidatedBooking;
use crate::store::StoreStats;

/// One appointment as a single list line, e.g.
/// `appt-1  17/10/2026 10:00 – Dr. Plácido (Cardiologia) · Maria Souza`.
#[must_use]
pub fn appointment_line(appointment: &Appointment, date_format: &str) -> String {
    let mut line = format!(
        "{:<8} {} {} – {} ({}) · {}",
        appointment.id.to_string(),
        appointment.date.format(date_format),
        appointment.time.format(hhmm::FORMAT),
        appointment.doctor_name,
        appointment.specialty,
        appointment.patient_name,
    );
    if let AppointmentStatus::Canceled { canceled_at } = appointment.status {
        line.push_str(&format!(
            "  [canceled {} {}]",
            canceled_at.date().format(date_format),
            canceled_at.time().format(hhmm::FORMAT)
        ));
    }
    line
}

/// The appointment-list view.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_list<'a, W: Write>(
    out: &mut W,
    appointments: impl IntoIterator<Item = &'a Appointment>,
    date_format: &str,
) -> Result<()> {
    let mut empty = true;
    for appointment in appointments {
        empty = false;
        writeln!(out, "  {}", appointment_line(appointment, date_format))?;
    }
    if empty {
        writeln!(out, "  No appointments booked.")?;
    }
    Ok(())
}

/// The list view as pretty JSON.
///
/// # Errors
///
/// Propagates serialization and write failures.
pub fn write_list_json<'a, W: Write>(
    out: &mut W,
    appointments: impl IntoIterator<Item = &'a Appointment>,
) -> Result<()> {
    let appointments: Vec<&Appointment> = appointments.into_iter().collect();
    writeln!(out, "{}", serde_json::to_string_pretty(&appointments)?)?;
    Ok(())
}

/// The preview card shown before a booking is confirmed.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_preview<W: Write>(
    out: &mut W,
    booking: &ValidatedBooking<'_>,
    date_format: &str,
) -> Result<()> {
    writeln!(out, "Confirm booking")?;
    writeln!(out, "  Patient:   {}", booking.patient_name)?;
    writeln!(out, "  Doctor:    {}", booking.doctor.name)?;
    writeln!(out, "  Specialty: {}", booking.doctor.specialty)?;
    writeln!(out, "  Date:      {}", booking.date.format(date_format))?;
    writeln!(out, "  Time:      {}", booking.time.format(hhmm::FORMAT))?;
    Ok(())
}

/// A doctor as a single line, e.g. `d1  Dr. Plácido  Cardiologia  08:00-17:00`.
#[must_use]
pub fn doctor_line(doctor: &Doctor) -> String {
    format!(
        "{:<4} {:<20} {:<14} {}",
        doctor.id, doctor.name, doctor.specialty, doctor.hours
    )
}

/// The doctor directory, one doctor per line.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_doctors<'a, W: Write>(
    out: &mut W,
    doctors: impl IntoIterator<Item = &'a Doctor>,
) -> Result<()> {
    let mut empty = true;
    for doctor in doctors {
        empty = false;
        writeln!(out, "  {}", doctor_line(doctor))?;
    }
    if empty {
        writeln!(out, "  No doctors found.")?;
    }
    Ok(())
}

/// Session statistics.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_stats<W: Write>(out: &mut W, stats: &StoreStats) -> Result<()> {
    writeln!(out, "Appointments: {}", stats.total)?;
    writeln!(out, "  Confirmed:  {}", stats.confirmed)?;
    writeln!(out, "  Canceled:   {}", stats.canceled)?;
    Ok(())
}
