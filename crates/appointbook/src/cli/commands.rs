//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands, including the
//! commands accepted at the interactive `appt>` prompt.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Args, Subcommand};

use crate::appointment::AppointmentId;

/// Accepted layouts for `--now`.
const NOW_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Session command arguments.
#[derive(Debug, Args)]
pub struct SessionCommand {
    /// Freeze the session clock at this local time (e.g. 2026-10-16T10:00)
    #[arg(long, value_name = "DATETIME", value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,
}

/// Doctors command arguments.
#[derive(Debug, Args)]
pub struct DoctorsCommand {
    /// Only show doctors of this specialty
    #[arg(short, long)]
    pub specialty: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Commands typed at the session prompt.
#[derive(Debug, Subcommand)]
pub enum ShellCommand {
    /// Fill in the booking form, preview and confirm
    Book,

    /// List appointments
    List {
        /// Include canceled appointments
        #[arg(short, long)]
        all: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Cancel a confirmed appointment
    Cancel {
        /// Appointment id (`appt-3` or `3`)
        #[arg(value_parser = parse_id)]
        id: AppointmentId,
    },

    /// Show the doctor directory
    Doctors {
        /// Only show doctors of this specialty
        #[arg(short, long)]
        specialty: Option<String>,
    },

    /// Show appointment counts
    Status,

    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

fn parse_now(input: &str) -> Result<NaiveDateTime, String> {
    NOW_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM, got '{input}'"))
}

fn parse_id(input: &str) -> Result<AppointmentId, String> {
    input.parse().map_err(|err: crate::error::Error| err.to_string())
}
