// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

const PERIODS: [&str; 4] = ["day", "week", "month", "year"];
const TYPES: [&str; 2] = ["income", "expense"];
const TABS: [&str; 4] = ["home", "records", "reports", "settings"];

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn record_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("currency").long("currency").help("Currency, defaults to the profile's"))
        .arg(
            Arg::new("category")
                .long("category")
                .help("Category name or id"),
        )
        .arg(Arg::new("description").long("description").short('d'))
}

fn quick_add(name: &'static str, about: &'static str) -> Command {
    record_fields(
        Command::new(name).about(about).arg(
            Arg::new("amount")
                .required(true)
                .help("Positive amount, e.g. 100 or 12.50"),
        ),
    )
}

pub fn build_cli() -> Command {
    Command::new("minifin")
        .about("Personal finance tracker client: balance, records and period reports")
        .version(crate_version!())
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to config.toml"),
        )
        .arg(
            Arg::new("backend-url")
                .long("backend-url")
                .global(true)
                .help("Backend base URL, e.g. http://localhost:8000"),
        )
        .arg(
            Arg::new("user-id")
                .long("user-id")
                .global(true)
                .help("Caller identifier sent with every request"),
        )
        .subcommand(json_flags(
            Command::new("status").about("Show balance and currency (home tab)"),
        ))
        .subcommand(
            Command::new("setup")
                .about("First visit: set currency and starting balance")
                .arg(Arg::new("currency").long("currency").required(true))
                .arg(
                    Arg::new("start-balance")
                        .long("start-balance")
                        .required(true)
                        .allow_hyphen_values(true),
                ),
        )
        .subcommand(quick_add("income", "Record income"))
        .subcommand(quick_add("expense", "Record an expense"))
        .subcommand(
            Command::new("record")
                .about("Records (income and expense entries)")
                .subcommand_required(true)
                .subcommand(record_fields(
                    Command::new("add")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(TYPES),
                        )
                        .arg(Arg::new("amount").long("amount").required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(record_fields(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("type").long("type").value_parser(TYPES))
                        .arg(Arg::new("amount").long("amount")),
                )),
        )
        .subcommand(json_flags(
            Command::new("report")
                .about("Income, expense and balance for a period")
                .arg(
                    Arg::new("period")
                        .value_parser(PERIODS)
                        .default_value("year"),
                ),
        ))
        .subcommand(
            Command::new("category")
                .about("Categories")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("show")
                .about("Render one tab")
                .arg(Arg::new("tab").required(true).value_parser(TABS)),
        )
        .subcommand(
            Command::new("config")
                .about("Inspect configuration")
                .subcommand_required(true)
                .subcommand(Command::new("show"))
                .subcommand(Command::new("path")),
        )
}
