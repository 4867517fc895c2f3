// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::api::Backend;
use crate::commands::check;
use crate::controller::Controller;
use crate::models::{Period, Report};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle<B: Backend>(ctrl: &mut Controller<B>, sub: &clap::ArgMatches) -> Result<()> {
    let period = Period::from_str(
        sub.get_one::<String>("period")
            .map(String::as_str)
            .unwrap_or("year"),
    )?;
    let res = ctrl.fetch_report(period);
    check(ctrl, res)?;

    let Some(report) = ctrl.report() else {
        return Ok(());
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), report)? {
        print_report(report, period, ctrl.currency(), ctrl.start_balance());
    }
    Ok(())
}

/// Label shown for a report: the backend's, else the period's own.
pub fn report_title(report: &Report, period: Period) -> String {
    if report.period_label.trim().is_empty() {
        period.label().to_string()
    } else {
        report.period_label.clone()
    }
}

pub fn report_rows(
    report: &Report,
    currency: &str,
    fallback_start: Option<Decimal>,
) -> Vec<Vec<String>> {
    let start = report
        .start_balance
        .or(fallback_start)
        .unwrap_or(Decimal::ZERO);
    vec![
        vec!["Income".into(), fmt_money(&report.income, currency)],
        vec!["Expense".into(), fmt_money(&report.expense, currency)],
        vec!["Start balance".into(), fmt_money(&start, currency)],
        vec![
            "Balance".into(),
            fmt_money(&report.balance(fallback_start), currency),
        ],
    ]
}

pub fn print_report(
    report: &Report,
    period: Period,
    currency: &str,
    fallback_start: Option<Decimal>,
) {
    println!("Report ({})", report_title(report, period));
    println!(
        "{}",
        pretty_table(&["", "Amount"], report_rows(report, currency, fallback_start))
    );
    if let Some(data) = &report.data {
        if let Ok(s) = serde_json::to_string_pretty(data) {
            println!("{}", s);
        }
    }
}
