// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::api::Backend;
use crate::controller::Controller;
use crate::models::Phase;
use crate::utils::{fmt_money, maybe_print_json};

#[derive(Serialize)]
pub struct StatusView {
    pub phase: Phase,
    pub balance: Option<Decimal>,
    pub currency: String,
    pub records: usize,
}

pub fn snapshot<B: Backend>(ctrl: &Controller<B>) -> StatusView {
    StatusView {
        phase: ctrl.phase(),
        balance: ctrl.balance(),
        currency: ctrl.currency().to_string(),
        records: ctrl.records().len(),
    }
}

pub fn balance_line<B: Backend>(ctrl: &Controller<B>) -> String {
    match ctrl.balance() {
        Some(b) => format!("Balance: {}", fmt_money(&b, ctrl.currency())),
        None => "Balance: unknown".to_string(),
    }
}

pub fn handle<B: Backend>(ctrl: &mut Controller<B>, sub: &clap::ArgMatches) -> Result<()> {
    let view = snapshot(ctrl);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        println!("{}", balance_line(ctrl));
    }
    Ok(())
}
