// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::Result;
use ctfpilot_core::layout::RepoLayout;
use ctfpilot_core::pipeline::Pipeline;

use super::parse_challenge_ref;

#[derive(clap::Args, Debug)]
pub struct PipelineArgs {
    /// Challenge to run (directory for challenge - 'web/example').
    challenge: String,
    /// Registry to push the Docker image to.
    registry: String,
    /// Prefix for the Docker image.
    image_prefix: String,
    /// Suffix for the Docker image.
    #[arg(long)]
    image_suffix: Option<String>,
}

pub fn run(args: PipelineArgs) -> Result<()> {
    let layout = RepoLayout::from_cwd()?;
    let (category, challenge_slug) = parse_challenge_ref(&args.challenge)?;

    let pipeline = Pipeline::new(&layout, args.registry, args.image_prefix, args.image_suffix);
    pipeline.run(category, challenge_slug)?;
    Ok(())
}
