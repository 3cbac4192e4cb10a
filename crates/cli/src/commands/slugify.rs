// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::Result;
use ctfpilot_core::slug::slug;

#[derive(clap::Args, Debug)]
pub struct SlugifyArgs {
    /// Name to slugify.
    name: String,
}

pub fn run(args: SlugifyArgs) -> Result<()> {
    println!("{}", slug(Some(&args.name)).unwrap_or_default());
    Ok(())
}
