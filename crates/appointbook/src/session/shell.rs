//! Line-oriented terminal front-end over a [`Session`].
//!
//! Each line typed at the `appt>` prompt is parsed with clap as a
//! [`ShellCommand`]. Booking walks through a small form, shows a preview and
//! only touches the store once the user confirms.

use std::io::{BufRead, Write};

use chrono::{NaiveDate, NaiveTime};
use clap::Parser;
use tracing::{debug, info};

use super::{view, Session};
use crate::appointment::{Appointment, AppointmentId, BookingRequest};
use crate::cli::{ShellCommand, ShellLine};
use crate::clock::Clock;
use crate::config::DisplayConfig;
use crate::directory::hhmm;
use crate::error::{Error, Result};

const PROMPT: &str = "appt> ";

/// Date layout always accepted by the form, next to the display format.
const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether the read loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Answer to the preview card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Confirm,
    Edit,
    Abort,
}

/// Interactive shell bound to a session, an input and an output.
#[derive(Debug)]
pub struct Shell<'s, C, R, W> {
    session: &'s mut Session<C>,
    input: R,
    output: W,
    display: DisplayConfig,
}

impl<'s, C: Clock, R: BufRead, W: Write> Shell<'s, C, R, W> {
    /// Create a shell reading commands from `input` and writing to `output`.
    pub fn new(session: &'s mut Session<C>, input: R, output: W, display: DisplayConfig) -> Self {
        Self {
            session,
            input,
            output,
            display,
        }
    }

    /// Run the read loop until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails. Booking
    /// rejections are reported inline and never end the loop.
    pub fn run(&mut self) -> Result<()> {
        info!("Session shell started");
        writeln!(
            self.output,
            "Appointment booking. Clock: {}. Type 'help' for commands.",
            self.session.now().format(&format!("{} {}", self.display.date_format, hhmm::FORMAT))
        )?;

        loop {
            let Some(line) = self.prompt(PROMPT)? else {
                writeln!(self.output)?;
                break;
            };
            if line.is_empty() {
                continue;
            }
            if self.execute(&line)? == Flow::Quit {
                break;
            }
        }

        writeln!(self.output, "Bye.")?;
        info!("Session shell finished");
        Ok(())
    }

    fn execute(&mut self, line: &str) -> Result<Flow> {
        let command = match ShellLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                write!(self.output, "{}", err.render())?;
                return Ok(Flow::Continue);
            }
        };
        debug!("Shell command: {:?}", command);

        match command {
            ShellCommand::Book => self.book()?,
            ShellCommand::List { all, json } => self.list(all, json)?,
            ShellCommand::Cancel { id } => self.cancel(id)?,
            ShellCommand::Doctors { specialty } => self.doctors(specialty.as_deref())?,
            ShellCommand::Status => self.status()?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn book(&mut self) -> Result<()> {
        let mut request = BookingRequest::default();

        loop {
            if !self.fill_form(&mut request)? {
                writeln!(self.output, "Booking discarded.")?;
                return Ok(());
            }

            let previewed = match self.session.preview(&request) {
                Ok(booking) => {
                    view::write_preview(&mut self.output, &booking, &self.display.date_format)?;
                    Ok(())
                }
                Err(rejection) => Err(rejection),
            };

            if let Err(rejection) = previewed {
                writeln!(self.output, "✗ {rejection}")?;
                if self.confirm("Edit the booking? [Y/n] ", true)? {
                    continue;
                }
                writeln!(self.output, "Booking discarded.")?;
                return Ok(());
            }

            match self.decide()? {
                Decision::Confirm => match self.session.book(&request) {
                    Ok(appointment) => {
                        writeln!(self.output, "✓ Booked {}.", appointment.id)?;
                        return self.list(false, false);
                    }
                    Err(rejection) => {
                        // The clock may have moved since the preview
                        writeln!(self.output, "✗ {rejection}")?;
                        if !self.confirm("Edit the booking? [Y/n] ", true)? {
                            writeln!(self.output, "Booking discarded.")?;
                            return Ok(());
                        }
                    }
                },
                Decision::Edit => {}
                Decision::Abort => {
                    writeln!(self.output, "Booking discarded.")?;
                    return Ok(());
                }
            }
        }
    }

    /// Walk through the form fields, pre-filled from `request`.
    ///
    /// Returns `false` when input ends mid-form.
    fn fill_form(&mut self, request: &mut BookingRequest) -> Result<bool> {
        let Some(name) = self.ask("Patient name", &request.patient_name)? else {
            return Ok(false);
        };
        request.patient_name = name;

        let specialties: Vec<String> = self
            .session
            .specialties()
            .into_iter()
            .map(str::to_owned)
            .collect();
        for (index, specialty) in specialties.iter().enumerate() {
            writeln!(self.output, "  {}. {specialty}", index + 1)?;
        }
        let Some(answer) = self.ask("Specialty", &request.specialty)? else {
            return Ok(false);
        };
        let specialty = pick(&specialties, &answer).unwrap_or(answer);
        if specialty != request.specialty {
            request.doctor_id.clear();
        }
        request.specialty = specialty;

        let doctors: Vec<(String, String)> = self
            .session
            .doctors_for(&request.specialty)
            .into_iter()
            .map(|doctor| (doctor.id.clone(), format!("{} ({})", doctor.name, doctor.hours)))
            .collect();
        for (index, (_, label)) in doctors.iter().enumerate() {
            writeln!(self.output, "  {}. {label}", index + 1)?;
        }
        let Some(answer) = self.ask("Doctor", &request.doctor_id)? else {
            return Ok(false);
        };
        let ids: Vec<String> = doctors.into_iter().map(|(id, _)| id).collect();
        request.doctor_id = pick(&ids, &answer).unwrap_or(answer);

        let Some(date) = self.ask_date(request.date)? else {
            return Ok(false);
        };
        request.date = date;

        let Some(time) = self.ask_time(request.time)? else {
            return Ok(false);
        };
        request.time = time;

        Ok(true)
    }

    fn ask_date(&mut self, current: Option<NaiveDate>) -> Result<Option<Option<NaiveDate>>> {
        let shown = current
            .map(|date| date.format(INPUT_DATE_FORMAT).to_string())
            .unwrap_or_default();
        loop {
            let Some(answer) = self.ask("Date (YYYY-MM-DD)", &shown)? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(None));
            }
            let parsed = NaiveDate::parse_from_str(&answer, INPUT_DATE_FORMAT)
                .or_else(|_| NaiveDate::parse_from_str(&answer, &self.display.date_format));
            match parsed {
                Ok(date) => return Ok(Some(Some(date))),
                Err(_) => {
                    let err = Error::invalid_input("date", answer, "YYYY-MM-DD");
                    writeln!(self.output, "  {err}")?;
                }
            }
        }
    }

    fn ask_time(&mut self, current: Option<NaiveTime>) -> Result<Option<Option<NaiveTime>>> {
        let shown = current
            .map(|time| time.format(hhmm::FORMAT).to_string())
            .unwrap_or_default();
        loop {
            let Some(answer) = self.ask("Time (HH:MM)", &shown)? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(None));
            }
            match hhmm::parse(&answer) {
                Ok(time) => return Ok(Some(Some(time))),
                Err(_) => {
                    let err = Error::invalid_input("time", answer, "HH:MM");
                    writeln!(self.output, "  {err}")?;
                }
            }
        }
    }

    fn decide(&mut self) -> Result<Decision> {
        loop {
            let Some(answer) = self.prompt("[c]onfirm, [e]dit or [a]bort? ")? else {
                return Ok(Decision::Abort);
            };
            match answer.to_lowercase().as_str() {
                "c" | "confirm" | "y" | "yes" => return Ok(Decision::Confirm),
                "e" | "edit" => return Ok(Decision::Edit),
                "a" | "abort" | "n" | "no" => return Ok(Decision::Abort),
                _ => writeln!(self.output, "  Please answer c, e or a.")?,
            }
        }
    }

    fn list(&mut self, all: bool, json: bool) -> Result<()> {
        let all = all || self.display.show_canceled;
        let store = self.session.store();
        let appointments: Vec<&Appointment> = if all {
            store.all().iter().collect()
        } else {
            store.confirmed().collect()
        };

        if json {
            return view::write_list_json(&mut self.output, appointments);
        }
        writeln!(self.output, "Appointments")?;
        view::write_list(&mut self.output, appointments, &self.display.date_format)
    }

    fn cancel(&mut self, id: AppointmentId) -> Result<()> {
        let line = self
            .session
            .store()
            .get(id)
            .filter(|appointment| appointment.is_confirmed())
            .map(|appointment| view::appointment_line(appointment, &self.display.date_format));
        let Some(line) = line else {
            writeln!(self.output, "✗ {}", Error::AppointmentNotFound(id))?;
            return Ok(());
        };

        writeln!(self.output, "  {line}")?;
        if !self.confirm("Cancel this appointment? [y/N] ", false)? {
            writeln!(self.output, "Kept {id}.")?;
            return Ok(());
        }

        match self.session.cancel(id) {
            Ok(appointment) => writeln!(self.output, "✓ Canceled {}.", appointment.id)?,
            Err(err) => writeln!(self.output, "✗ {err}")?,
        }
        Ok(())
    }

    fn doctors(&mut self, specialty: Option<&str>) -> Result<()> {
        let directory = self.session.directory();
        match specialty {
            Some(specialty) => {
                view::write_doctors(&mut self.output, directory.by_specialty(specialty))
            }
            None => view::write_doctors(&mut self.output, directory.iter()),
        }
    }

    fn status(&mut self) -> Result<()> {
        let stats = self.session.store().stats();
        view::write_stats(&mut self.output, &stats)
    }

    /// Ask for a text field. An empty answer keeps `current`.
    fn ask(&mut self, label: &str, current: &str) -> Result<Option<String>> {
        let text = if current.is_empty() {
            format!("{label}: ")
        } else {
            format!("{label} [{current}]: ")
        };
        Ok(self.prompt(&text)?.map(|answer| {
            if answer.is_empty() {
                current.to_string()
            } else {
                answer
            }
        }))
    }

    /// Ask a yes/no question. An empty answer or end of input picks `default`.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let Some(answer) = self.prompt(question)? else {
            return Ok(false);
        };
        Ok(match answer.to_lowercase().as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Resolve a form answer against a numbered list: a 1-based index or a
/// case-insensitive match of an entry.
fn pick(options: &[String], answer: &str) -> Option<String> {
    if let Ok(index) = answer.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| options.get(i))
            .cloned();
    }
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(answer))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::AppointmentStatus;
    use crate::clock::FixedClock;
    use crate::directory::DoctorDirectory;
    use crate::logging::init_test_logging;
    use crate::rules::RuleSet;
    use std::io::Cursor;

    fn create_test_session() -> Session<FixedClock> {
        init_test_logging();
        let now = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Session::new(DoctorDirectory::default(), RuleSet::default(), FixedClock(now))
    }

    fn drive(session: &mut Session<FixedClock>, input: &str) -> String {
        let mut out = Vec::new();
        Shell::new(
            session,
            Cursor::new(input.as_bytes()),
            &mut out,
            DisplayConfig::default(),
        )
        .run()
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    const BOOK_CARDIOLOGY: &str = "book\nMaria Souza\n1\n1\n2026-10-17\n10:00\n";

    #[test]
    fn test_book_and_list() {
        let mut session = create_test_session();
        let output = drive(&mut session, &format!("{BOOK_CARDIOLOGY}c\nquit\n"));

        assert!(output.contains("Confirm booking"));
        assert!(output.contains("Specialty: Cardiologia"));
        assert!(output.contains("✓ Booked appt-1."));
        assert!(output.contains("17/10/2026 10:00 – Dr. Plácido (Cardiologia) · Maria Souza"));
        assert!(output.ends_with("Bye.\n"));

        let appointment = session.store().get(AppointmentId::new(1)).unwrap();
        assert_eq!(appointment.doctor_id, "d1");
        assert!(appointment.is_confirmed());
    }

    #[test]
    fn test_book_by_name() {
        let mut session = create_test_session();
        let input = "book\nAna\npediatria\nd3\n2026-10-17\n09:00\nc\n";
        let output = drive(&mut session, input);

        assert!(output.contains("✓ Booked appt-1."));
        assert_eq!(session.store().all()[0].specialty, "Pediatria");
    }

    #[test]
    fn test_book_rejected_then_discarded() {
        let mut session = create_test_session();
        let input = "book\nMaria Souza\n1\n1\n2026-10-17\n18:00\nn\n";
        let output = drive(&mut session, input);

        assert!(output.contains("✗ outside business hours"));
        assert!(output.contains("Booking discarded."));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_book_rejected_then_edited() {
        let mut session = create_test_session();
        // Every field but the time keeps its previous value
        let input = "book\nMaria Souza\n1\n1\n2026-10-17\n18:00\ny\n\n\n\n\n10:00\nc\n";
        let output = drive(&mut session, input);

        assert!(output.contains("Patient name [Maria Souza]: "));
        assert!(output.contains("Time (HH:MM) [18:00]: "));
        assert!(output.contains("✓ Booked appt-1."));
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_book_aborted_at_preview() {
        let mut session = create_test_session();
        let output = drive(&mut session, &format!("{BOOK_CARDIOLOGY}a\n"));

        assert!(output.contains("Booking discarded."));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_book_missing_fields() {
        let mut session = create_test_session();
        let input = "book\n\n\n\n\n\nn\n";
        let output = drive(&mut session, input);

        assert!(output.contains("✗ missing fields"));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_book_bad_date_is_asked_again() {
        let mut session = create_test_session();
        let input = "book\nMaria Souza\n1\n1\n17-10\n2026-10-17\n10:00\nc\n";
        let output = drive(&mut session, input);

        assert!(output.contains("invalid date '17-10', expected YYYY-MM-DD"));
        assert!(output.contains("✓ Booked appt-1."));
    }

    #[test]
    fn test_book_time_with_seconds_is_asked_again() {
        let mut session = create_test_session();
        let input = "book\nMaria Souza\n1\n1\n2026-10-17\n10:00:30\n10:00\nc\n";
        let output = drive(&mut session, input);

        assert!(output.contains("invalid time '10:00:30', expected HH:MM"));
        let appointment = session.store().get(AppointmentId::new(1)).unwrap();
        assert_eq!(appointment.time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }

    #[test]
    fn test_book_accepts_display_date_format() {
        let mut session = create_test_session();
        let input = "book\nMaria Souza\n1\n1\n17/10/2026\n10:00\nc\n";
        drive(&mut session, input);

        assert_eq!(
            session.store().all()[0].date,
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
        );
    }

    #[test]
    fn test_book_end_of_input_mid_form() {
        let mut session = create_test_session();
        let output = drive(&mut session, "book\nMaria Souza\n");

        assert!(output.contains("Booking discarded."));
        assert!(output.ends_with("Bye.\n"));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_second_booking_same_specialty_same_day() {
        let mut session = create_test_session();
        let input = format!(
            "{BOOK_CARDIOLOGY}c\nbook\nMaria Souza\n1\n1\n2026-10-17\n15:00\nn\n"
        );
        let output = drive(&mut session, &input);

        assert!(output.contains("✗ specialty already booked that day"));
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut session = create_test_session();
        let output = drive(&mut session, &format!("{BOOK_CARDIOLOGY}c\ncancel appt-1\ny\n"));

        assert!(output.contains("Cancel this appointment? [y/N] "));
        assert!(output.contains("✓ Canceled appt-1."));
        let appointment = session.store().get(AppointmentId::new(1)).unwrap();
        assert!(matches!(
            appointment.status,
            AppointmentStatus::Canceled { .. }
        ));
    }

    #[test]
    fn test_cancel_declined() {
        let mut session = create_test_session();
        let output = drive(&mut session, &format!("{BOOK_CARDIOLOGY}c\ncancel 1\n\n"));

        assert!(output.contains("Kept appt-1."));
        assert!(session.store().get(AppointmentId::new(1)).unwrap().is_confirmed());
    }

    #[test]
    fn test_cancel_unknown() {
        let mut session = create_test_session();
        let output = drive(&mut session, "cancel appt-9\n");

        assert!(output.contains("✗ no confirmed appointment with id appt-9"));
    }

    #[test]
    fn test_cancel_inside_window() {
        let mut session = create_test_session();
        drive(&mut session, &format!("{BOOK_CARDIOLOGY}c\n"));

        session.clock_mut().advance(chrono::Duration::hours(23));
        let output = drive(&mut session, "cancel appt-1\ny\n");

        assert!(output.contains("✗ cancellation window (2h) has passed"));
        assert!(session.store().get(AppointmentId::new(1)).unwrap().is_confirmed());
    }

    #[test]
    fn test_list_empty_and_all() {
        let mut session = create_test_session();
        let output = drive(&mut session, "list\n");
        assert!(output.contains("No appointments booked."));

        let input = format!("{BOOK_CARDIOLOGY}c\ncancel appt-1\ny\nlist\nlist --all\n");
        let output = drive(&mut session, &input);
        let after_cancel = output.rsplit("✓ Canceled appt-1.").next().unwrap();
        assert!(after_cancel.contains("No appointments booked."));
        assert!(after_cancel.contains("[canceled 16/10/2026 10:00]"));
    }

    #[test]
    fn test_list_json() {
        let mut session = create_test_session();
        let output = drive(&mut session, &format!("{BOOK_CARDIOLOGY}c\nlist --json\n"));

        assert!(output.contains(r#""patient_name": "Maria Souza""#));
        assert!(output.contains(r#""status": "CONFIRMED""#));
    }

    #[test]
    fn test_doctors_by_specialty() {
        let mut session = create_test_session();
        let output = drive(&mut session, "doctors --specialty Pediatria\n");

        assert!(output.contains("Dr. Luis Augusto"));
        assert!(!output.contains("Dr. Plácido"));
    }

    #[test]
    fn test_status() {
        let mut session = create_test_session();
        let output = drive(&mut session, &format!("{BOOK_CARDIOLOGY}c\nstatus\n"));

        assert!(output.contains("Appointments: 1"));
        assert!(output.contains("Confirmed:  1"));
    }

    #[test]
    fn test_unknown_command() {
        let mut session = create_test_session();
        let output = drive(&mut session, "frobnicate\nexit\n");

        assert!(output.contains("error"));
        assert!(output.ends_with("Bye.\n"));
    }

    #[test]
    fn test_help() {
        let mut session = create_test_session();
        let output = drive(&mut session, "help\n");

        assert!(output.contains("book"));
        assert!(output.contains("cancel"));
    }

    #[test]
    fn test_pick() {
        let options = vec!["Cardiologia".to_string(), "Pediatria".to_string()];
        assert_eq!(pick(&options, "2"), Some("Pediatria".to_string()));
        assert_eq!(pick(&options, "cardiologia"), Some("Cardiologia".to_string()));
        assert_eq!(pick(&options, "0"), None);
        assert_eq!(pick(&options, "3"), None);
        assert_eq!(pick(&options, "Ortopedia"), None);
    }
}
