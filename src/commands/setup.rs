// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use crate::api::Backend;
use crate::commands::{check, status::balance_line};
use crate::controller::Controller;
use crate::models::Phase;
use crate::utils::parse_decimal;

pub fn handle<B: Backend>(ctrl: &mut Controller<B>, sub: &clap::ArgMatches) -> Result<()> {
    if ctrl.phase() == Phase::MainView {
        bail!("Profile already set up; currency is {}", ctrl.currency());
    }
    let currency = sub.get_one::<String>("currency").map(String::as_str).unwrap_or_default();
    let start = parse_decimal(
        sub.get_one::<String>("start-balance")
            .map(String::as_str)
            .unwrap_or_default(),
    )?;
    let res = ctrl.init_user(currency, start);
    check(ctrl, res)?;
    println!("Profile saved. {}", balance_line(ctrl));
    Ok(())
}
