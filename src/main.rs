// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use minifin::api::HttpBackend;
use minifin::config::Config;
use minifin::controller::Controller;
use minifin::store::Store;
use minifin::{cli, commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = cli::build_cli().get_matches();

    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let mut config = Config::load(config_path.as_deref())?;
    config.apply_env();
    config.apply_overrides(
        matches.get_one::<String>("backend-url").map(String::as_str),
        matches.get_one::<String>("user-id").map(String::as_str),
    );
    let config = config.validate()?;

    let backend = HttpBackend::new(&config)?;
    let store = Store::open_or_init()?;
    let mut ctrl = Controller::new(
        backend,
        store,
        config.user_id.clone(),
        &config.default_currency,
    );
    commands::run(&mut ctrl, &config, &matches)
}
