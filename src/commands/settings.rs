// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use crate::api::Backend;
use crate::config::{Config, RouteStyle};
use crate::controller::Controller;
use crate::utils::{fmt_money, pretty_table};

pub fn handle_config(config: &Config, top: &clap::ArgMatches, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => print!("{}", toml::to_string_pretty(config)?),
        Some(("path", _)) => {
            let path = match top.get_one::<String>("config") {
                Some(p) => PathBuf::from(p),
                None => Config::config_path()?,
            };
            println!("{}", path.display());
        }
        _ => {}
    }
    Ok(())
}

pub fn settings_rows<B: Backend>(ctrl: &Controller<B>, config: &Config) -> Vec<Vec<String>> {
    let routes = match config.routes {
        RouteStyle::Records => "records",
        RouteStyle::Operations => "operations",
    };
    vec![
        vec!["User".into(), ctrl.user_id().unwrap_or("-").to_string()],
        vec!["Currency".into(), ctrl.currency().to_string()],
        vec![
            "Start balance".into(),
            ctrl.start_balance()
                .map(|b| fmt_money(&b, ctrl.currency()))
                .unwrap_or_else(|| "-".into()),
        ],
        vec!["Backend".into(), config.backend_url.clone()],
        vec!["Routes".into(), routes.into()],
    ]
}

pub fn print_settings<B: Backend>(ctrl: &Controller<B>, config: &Config) {
    println!(
        "{}",
        pretty_table(&["Setting", "Value"], settings_rows(ctrl, config))
    );
}
