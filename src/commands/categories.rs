// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::Backend;
use crate::controller::Controller;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<B: Backend>(ctrl: &mut Controller<B>, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let cats = ctrl.categories();
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
            let data = cats
                .iter()
                .map(|c| vec![c.id.to_string(), c.name.clone()])
                .collect();
            println!("{}", pretty_table(&["ID", "Category"], data));
        }
    }
    Ok(())
}
