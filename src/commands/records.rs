// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::str::FromStr;

use crate::api::Backend;
use crate::commands::{check, status::balance_line};
use crate::controller::Controller;
use crate::models::{Record, RecordType};
use crate::utils::{fmt_timestamp, maybe_print_json, parse_decimal, pretty_table};

pub fn handle<B: Backend>(ctrl: &mut Controller<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let kind = RecordType::from_str(
                sub.get_one::<String>("type")
                    .map(String::as_str)
                    .unwrap_or_default(),
            )?;
            add(ctrl, kind, sub)?
        }
        Some(("list", sub)) => list(ctrl, sub)?,
        Some(("edit", sub)) => edit(ctrl, sub)?,
        _ => {}
    }
    Ok(())
}

/// `income <amount>` / `expense <amount>`.
pub fn quick_add<B: Backend>(
    ctrl: &mut Controller<B>,
    kind: RecordType,
    sub: &clap::ArgMatches,
) -> Result<()> {
    add(ctrl, kind, sub)
}

fn category_arg<B: Backend>(ctrl: &Controller<B>, sub: &clap::ArgMatches) -> Result<Option<i64>> {
    match sub.get_one::<String>("category") {
        Some(key) => Ok(Some(ctrl.category_id_for(key)?)),
        None => Ok(None),
    }
}

fn add<B: Backend>(ctrl: &mut Controller<B>, kind: RecordType, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(
        sub.get_one::<String>("amount")
            .context("amount is required")?,
    )?;
    let currency = sub
        .get_one::<String>("currency")
        .cloned()
        .unwrap_or_else(|| ctrl.currency().to_string());
    let category_id = category_arg(ctrl, sub)?;
    let description = sub.get_one::<String>("description").map(String::as_str);

    let res = ctrl.add_record(kind, amount, &currency, category_id, description);
    check(ctrl, res)?;
    println!("Added: {} {} {}", kind, amount, currency);
    println!("{}", balance_line(ctrl));
    Ok(())
}

fn edit<B: Backend>(ctrl: &mut Controller<B>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("id is required")?;
    let kind = sub
        .get_one::<String>("type")
        .map(|s| RecordType::from_str(s))
        .transpose()?;
    let amount = sub
        .get_one::<String>("amount")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let category_id = category_arg(ctrl, sub)?;
    let currency = sub.get_one::<String>("currency").cloned();
    let description = sub.get_one::<String>("description").cloned();

    let res = ctrl.begin_edit(id).map(|editor| {
        editor.draft.r#type = kind;
        editor.draft.amount = amount;
        editor.draft.currency = currency;
        editor.draft.category_id = category_id;
        editor.draft.description = description;
    });
    check(ctrl, res)?;
    let res = ctrl.submit_edit();
    if res.is_err() {
        ctrl.cancel_edit();
    }
    check(ctrl, res)?;
    println!("Record {} saved", id);
    println!("{}", balance_line(ctrl));
    Ok(())
}

pub fn record_rows<B: Backend>(ctrl: &Controller<B>, records: &[Record]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                fmt_timestamp(r.created_at.as_ref()),
                r.r#type.to_string(),
                format!("{:.2}", r.amount),
                r.currency.clone(),
                ctrl.category_name(r.category_id),
                r.description.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

/// The first `limit` records (newest first, as the backend returns them).
pub fn limited(records: &[Record], limit: Option<usize>) -> &[Record] {
    match limit {
        Some(n) => &records[..n.min(records.len())],
        None => records,
    }
}

pub fn records_table<B: Backend>(ctrl: &Controller<B>, limit: Option<usize>) -> comfy_table::Table {
    pretty_table(
        &["ID", "When", "Type", "Amount", "CCY", "Category", "Description"],
        record_rows(ctrl, limited(ctrl.records(), limit)),
    )
}

fn list<B: Backend>(ctrl: &mut Controller<B>, sub: &clap::ArgMatches) -> Result<()> {
    let limit = sub.get_one::<usize>("limit").copied();
    let data = limited(ctrl.records(), limit);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        if data.is_empty() {
            println!("No records yet.");
        } else {
            println!("{}", records_table(ctrl, limit));
        }
    }
    Ok(())
}
