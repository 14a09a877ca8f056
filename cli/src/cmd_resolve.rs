// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use staysync_core::{BookingWindow, StaySync};

use crate::arg::{CommonArgs, OutputFormat, print_json};

#[derive(Debug, Clone)]
pub struct CmdResolve {
    pub token: String,
    pub code: String,
    pub output_format: OutputFormat,
}

impl CmdResolve {
    pub const NAME: &str = "resolve";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Look up a guest's stay from a verification token and a booking code")
            .arg(arg!(token: <TOKEN> "Verification token handed to the guest"))
            .arg(arg!(code: <CODE> "Booking code, e.g. HMABCD1234"))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            token: matches
                .get_one::<String>("token")
                .expect("token is required")
                .clone(),
            code: matches
                .get_one::<String>("code")
                .expect("code is required")
                .clone(),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, engine: &StaySync) -> Result<(), Box<dyn Error>> {
        // the token is a credential, keep it out of the logs
        tracing::debug!(code = %self.code, "resolving booking...");
        match engine.resolve_booking(&self.token, &self.code).await {
            Ok(window) => match self.output_format {
                OutputFormat::Json => print_json(&window)?,
                OutputFormat::Table => print_window(&window),
            },
            Err(e) => {
                if self.output_format == OutputFormat::Json {
                    print_json(&e.body())?;
                }
                return Err(format!("{} ({} {})", e, e.status(), e.code()).into());
            }
        }
        Ok(())
    }
}

fn print_window(window: &BookingWindow) {
    let property = match &window.property_name {
        Some(name) => format!("{name} ({})", window.property_id),
        None => window.property_id.clone(),
    };
    println!("{:<10}{}", "Property".bold(), property);
    println!("{:<10}{}", "Booking".bold(), window.airbnb_code);
    println!("{:<10}{}", "Check-in".bold(), window.check_in);
    println!("{:<10}{}", "Check-out".bold(), window.check_out);
    if let Some(guest) = &window.guest_name {
        println!("{:<10}{}", "Guest".bold(), guest);
    }
}
