// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::str::FromStr;

use crate::api::Backend;
use crate::commands::{records, reports, settings, status};
use crate::config::Config;
use crate::controller::Controller;
use crate::models::{Period, Tab};

const HOME_RECENT: usize = 5;

pub fn handle<B: Backend>(
    ctrl: &mut Controller<B>,
    config: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let tab = Tab::from_str(
        sub.get_one::<String>("tab")
            .map(String::as_str)
            .unwrap_or("home"),
    )?;
    ctrl.select_tab(tab);
    render(ctrl, config);
    Ok(())
}

/// Prints the currently selected tab.
pub fn render<B: Backend>(ctrl: &Controller<B>, config: &Config) {
    match ctrl.tab() {
        Tab::Home => {
            println!("{}", status::balance_line(ctrl));
            if !ctrl.records().is_empty() {
                println!("Recent:");
                println!("{}", records::records_table(ctrl, Some(HOME_RECENT)));
            }
        }
        Tab::Records => {
            if ctrl.records().is_empty() {
                println!("No records yet.");
            } else {
                println!("{}", records::records_table(ctrl, None));
            }
        }
        Tab::Reports => match ctrl.report() {
            Some(report) => reports::print_report(
                report,
                ctrl.report_period().unwrap_or(Period::Year),
                ctrl.currency(),
                ctrl.start_balance(),
            ),
            None => println!("No report loaded."),
        },
        Tab::Settings => settings::print_settings(ctrl, config),
    }
}
