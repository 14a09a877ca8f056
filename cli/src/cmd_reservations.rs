// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use colored::{Color, Colorize};
use staysync_core::{Reservation, StaySync, UID_CODE_PREFIX};

use crate::arg::{CommonArgs, OutputFormat, print_json};
use crate::table::{Column, PaddingDirection, Table};

#[derive(Debug, Clone)]
pub struct CmdReservations {
    pub property: String,
    pub output_format: OutputFormat,
}

impl CmdReservations {
    pub const NAME: &str = "reservations";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("List the reservations stored for a property")
            .arg(CommonArgs::property(true))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            property: CommonArgs::get_property(matches).expect("property is required"),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, engine: &StaySync) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing reservations...");
        let reservations = engine.reservations(&self.property).await?;

        match self.output_format {
            OutputFormat::Json => print_json(&reservations)?,
            OutputFormat::Table if reservations.is_empty() => {
                println!("{}", "No reservations found".italic());
            }
            OutputFormat::Table => {
                let columns = [
                    ReservationColumn::CheckIn,
                    ReservationColumn::CheckOut,
                    ReservationColumn::Nights,
                    ReservationColumn::Code,
                    ReservationColumn::Guests,
                    ReservationColumn::Guest,
                ];
                print!("{}", Table::new(&columns, &reservations));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum ReservationColumn {
    CheckIn,
    CheckOut,
    Nights,
    Code,
    Guests,
    Guest,
}

impl Column<Reservation> for ReservationColumn {
    fn name(&self) -> &'static str {
        match self {
            ReservationColumn::CheckIn => "Check-in",
            ReservationColumn::CheckOut => "Check-out",
            ReservationColumn::Nights => "Nights",
            ReservationColumn::Code => "Code",
            ReservationColumn::Guests => "Guests",
            ReservationColumn::Guest => "Guest",
        }
    }

    fn format(&self, data: &Reservation) -> String {
        match self {
            ReservationColumn::CheckIn => data.start_date.to_string(),
            ReservationColumn::CheckOut => data.end_date.to_string(),
            ReservationColumn::Nights => data.nights().to_string(),
            ReservationColumn::Code => data.booking_code.clone(),
            ReservationColumn::Guests => data
                .guest_count
                .map(|n| n.to_string())
                .unwrap_or_default(),
            ReservationColumn::Guest => data
                .guest_name
                .clone()
                .unwrap_or_else(|| data.summary.clone()),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            ReservationColumn::Nights | ReservationColumn::Guests => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }

    fn color(&self, data: &Reservation) -> Option<Color> {
        match self {
            // placeholder codes can't be resolved by guests
            ReservationColumn::Code if data.booking_code.starts_with(UID_CODE_PREFIX) => {
                Some(Color::BrightBlack)
            }
            ReservationColumn::Guest if data.guest_name.is_none() => Some(Color::BrightBlack),
            _ => None,
        }
    }
}
