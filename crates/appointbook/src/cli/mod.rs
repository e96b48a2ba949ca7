//! Command-line interface for appointbook.
//!
//! This module provides the CLI structure for the `appt` binary and the
//! parser for lines typed inside an interactive session.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, DoctorsCommand, SessionCommand, ShellCommand};

/// appt - Book and cancel medical appointments
///
/// Runs an interactive booking session over an in-memory appointment list,
/// enforcing the clinic's booking and cancellation rules.
#[derive(Debug, Parser)]
#[command(name = "appt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive booking session
    Session(SessionCommand),

    /// List the doctor directory
    Doctors(DoctorsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

/// One line typed at the session prompt.
#[derive(Debug, Parser)]
#[command(name = "appt", no_binary_name = true)]
#[command(disable_version_flag = true)]
pub struct ShellLine {
    /// The command to execute
    #[command(subcommand)]
    pub command: ShellCommand,
}
