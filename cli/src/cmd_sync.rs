// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::{Color, Colorize};
use serde::Serialize;
use staysync_core::{StaySync, SyncResponse};

use crate::arg::{CommonArgs, OutputFormat, print_json};
use crate::table::{Column, Table};

#[derive(Debug, Clone)]
pub struct CmdSync {
    pub property: Option<String>,
    pub all: bool,
    pub force: bool,
    pub output_format: OutputFormat,
}

impl CmdSync {
    pub const NAME: &str = "sync";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Fetch a property's calendar and replace its stored reservations")
            .arg(CommonArgs::property(false).required_unless_present("all"))
            .arg(
                arg!(--all "Sync every registered property, one after another")
                    .conflicts_with("property"),
            )
            .arg(arg!(-f --force "Sync even if the last sync is still fresh"))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            property: CommonArgs::get_property(matches),
            all: matches.get_flag("all"),
            force: matches.get_flag("force"),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, engine: &StaySync) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "syncing...");
        let ids = match (&self.property, self.all) {
            (Some(id), false) => vec![id.clone()],
            _ => engine
                .properties()
                .await?
                .into_iter()
                .map(|p| p.id)
                .collect(),
        };

        let mut results = Vec::with_capacity(ids.len());
        for property_id in ids {
            let response = engine.trigger_sync(&property_id, self.force).await;
            results.push(SyncResult {
                property_id,
                response,
            });
        }

        match self.output_format {
            OutputFormat::Json if self.all => print_json(&results)?,
            OutputFormat::Json => {
                for result in &results {
                    print_json(&result.response)?;
                }
            }
            OutputFormat::Table if results.is_empty() => {
                println!("{}", "No properties registered".italic());
            }
            OutputFormat::Table => {
                let columns = [SyncColumn::Property, SyncColumn::Result, SyncColumn::Message];
                print!("{}", Table::new(&columns, &results));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncResult {
    property_id: String,
    #[serde(flatten)]
    response: SyncResponse,
}

#[derive(Debug, Clone, Copy)]
enum SyncColumn {
    Property,
    Result,
    Message,
}

impl Column<SyncResult> for SyncColumn {
    fn name(&self) -> &'static str {
        match self {
            SyncColumn::Property => "Property",
            SyncColumn::Result => "Result",
            SyncColumn::Message => "Message",
        }
    }

    fn format(&self, data: &SyncResult) -> String {
        match self {
            SyncColumn::Property => data.property_id.clone(),
            SyncColumn::Result if data.response.success => "ok".to_string(),
            SyncColumn::Result => "failed".to_string(),
            SyncColumn::Message => data.response.message.clone(),
        }
    }

    fn color(&self, data: &SyncResult) -> Option<Color> {
        match self {
            SyncColumn::Result if data.response.success => Some(Color::Green),
            SyncColumn::Result => Some(Color::Red),
            _ => None,
        }
    }
}
