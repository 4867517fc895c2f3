// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod records;
pub mod reports;
pub mod settings;
pub mod setup;
pub mod status;
pub mod view;

use anyhow::{Result, bail};

use crate::api::Backend;
use crate::cli;
use crate::config::Config;
use crate::controller::{ALERT_UNAUTHENTICATED, Controller};
use crate::error::Error;
use crate::models::{Phase, RecordType};

/// Mounts the controller and dispatches one command.
pub fn run<B: Backend>(
    ctrl: &mut Controller<B>,
    config: &Config,
    matches: &clap::ArgMatches,
) -> Result<()> {
    match matches.subcommand() {
        None => {
            cli::build_cli().print_help()?;
            println!();
            return Ok(());
        }
        Some(("config", sub)) => return settings::handle_config(config, matches, sub),
        Some(_) => {}
    }

    ctrl.mount();
    if ctrl.phase() == Phase::Unauthenticated {
        let msg = ctrl
            .take_alert()
            .unwrap_or_else(|| ALERT_UNAUTHENTICATED.to_string());
        bail!("{}", msg);
    }
    show_alert(ctrl);
    if ctrl.is_first_visit() && !matches!(matches.subcommand_name(), Some("setup")) {
        bail!("No profile yet. Run `minifin setup --currency <CCY> --start-balance <AMOUNT>` first");
    }

    match matches.subcommand() {
        Some(("status", sub)) => status::handle(ctrl, sub)?,
        Some(("setup", sub)) => setup::handle(ctrl, sub)?,
        Some(("income", sub)) => records::quick_add(ctrl, RecordType::Income, sub)?,
        Some(("expense", sub)) => records::quick_add(ctrl, RecordType::Expense, sub)?,
        Some(("record", sub)) => records::handle(ctrl, sub)?,
        Some(("report", sub)) => reports::handle(ctrl, sub)?,
        Some(("category", sub)) => categories::handle(ctrl, sub)?,
        Some(("show", sub)) => view::handle(ctrl, config, sub)?,
        _ => {}
    }
    Ok(())
}

/// Prints a pending alert without failing the command.
pub fn show_alert<B: Backend>(ctrl: &mut Controller<B>) {
    if let Some(msg) = ctrl.take_alert() {
        eprintln!("⚠ {}", msg);
    }
}

/// Turns a failed controller operation into an error headed by its alert.
pub fn check<B: Backend, T>(ctrl: &mut Controller<B>, r: Result<T, Error>) -> Result<T> {
    r.map_err(|e| {
        let msg = ctrl.take_alert().unwrap_or_else(|| e.to_string());
        anyhow::Error::new(e).context(msg)
    })
}
