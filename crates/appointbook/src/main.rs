//! `appt` - CLI for appointbook
//!
//! This binary runs interactive booking sessions and inspects the doctor
//! directory and configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use appointbook::cli::{Cli, Command, ConfigCommand, DoctorsCommand, SessionCommand};
use appointbook::session::{view, Shell};
use appointbook::{init_logging, Clock, Config, FixedClock, Session, SystemClock};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Execute the command
    match cli.command {
        Command::Session(session_cmd) => handle_session(&load(cli.config)?, &session_cmd),
        Command::Doctors(doctors_cmd) => handle_doctors(&load(cli.config)?, &doctors_cmd),
        Command::Config(config_cmd) => handle_config(config_cmd, cli.config),
    }
}

fn load(config_path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(config_path).context("failed to load configuration")
}

fn handle_session(config: &Config, cmd: &SessionCommand) -> anyhow::Result<()> {
    let clock: Box<dyn Clock> = match cmd.now {
        Some(now) => Box::new(FixedClock(now)),
        None => Box::new(SystemClock),
    };
    let mut session = Session::from_config(config, clock);

    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(
        &mut session,
        stdin.lock(),
        stdout.lock(),
        config.display.clone(),
    )
    .run()
    .context("session ended unexpectedly")?;
    Ok(())
}

fn handle_doctors(config: &Config, cmd: &DoctorsCommand) -> anyhow::Result<()> {
    let directory = config.directory();
    let doctors: Vec<_> = match &cmd.specialty {
        Some(specialty) => directory.by_specialty(specialty).collect(),
        None => directory.iter().collect(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cmd.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&doctors)?)?;
    } else {
        view::write_doctors(&mut out, doctors)?;
    }
    Ok(())
}

fn handle_config(cmd: ConfigCommand, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Rules]");
                println!(
                    "  Advance notice (h):      {}",
                    config.rules.advance_notice_hours
                );
                println!(
                    "  Cancellation window (h): {}",
                    config.rules.cancellation_window_hours
                );
                println!();
                println!("[Display]");
                println!("  Date format:             {}", config.display.date_format);
                println!("  Show canceled:           {}", config.display.show_canceled);
                println!();
                println!("[Doctors]");
                for doctor in &config.doctors {
                    println!("  {}", view::doctor_line(doctor));
                }
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            // Load failures are the report here, not an error exit
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
