// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line interface of the staysync calendar sync engine.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_debug_implementations,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro
)]

mod arg;
mod cli;
mod cmd_reservations;
mod cmd_resolve;
mod cmd_status;
mod cmd_sync;
mod config;
mod table;

pub use crate::cli::{Cli, Commands, run};
