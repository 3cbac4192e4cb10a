// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::Result;
use clap::ValueEnum;
use ctfpilot_core::layout::RepoLayout;
use ctfpilot_core::model::{Challenge, ChallengeInput, DockerfileLocationInput, FlagInput};
use ctfpilot_core::scaffold::{DefinitionFormat, Scaffolder};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Yml,
    Yaml,
    Json,
}

impl From<Format> for DefinitionFormat {
    fn from(format: Format) -> DefinitionFormat {
        match format {
            Format::Yml => DefinitionFormat::Yml,
            Format::Yaml => DefinitionFormat::Yaml,
            Format::Json => DefinitionFormat::Json,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    /// Accepted for compatibility with older automation; creation is
    /// always driven by the flags below.
    #[arg(long)]
    no_prompts: bool,
    /// Name of the challenge.
    #[arg(long)]
    name: String,
    /// Slug of the challenge; derived from the name when omitted.
    #[arg(long)]
    slug: Option<String>,
    /// Author of the challenge.
    #[arg(long)]
    author: String,
    /// Category of the challenge.
    #[arg(long)]
    category: String,
    /// Difficulty of the challenge.
    #[arg(long)]
    difficulty: String,
    /// Type of the challenge.
    #[arg(long = "type")]
    challenge_type: String,
    /// Type of instanced challenge.
    #[arg(long, default_value = "none")]
    instanced_type: String,
    /// Flag for the challenge.
    #[arg(long)]
    flag: Option<String>,
    /// Points for the challenge.
    #[arg(long)]
    points: Option<u32>,
    /// Minimum points for the challenge.
    #[arg(long)]
    min_points: Option<u32>,
    /// Location of the description file.
    #[arg(long)]
    description_location: Option<String>,
    /// Location of the Dockerfile.
    #[arg(long, default_value = "src/Dockerfile")]
    dockerfile_location: String,
    /// Context of the Dockerfile.
    #[arg(long, default_value = "src/")]
    dockerfile_context: String,
    /// Identifier of the Dockerfile.
    #[arg(long)]
    dockerfile_identifier: Option<String>,
    /// Location of the handout directory.
    #[arg(long)]
    handout_location: Option<String>,
    /// Format of the generated definition file.
    #[arg(long, value_enum, default_value_t = Format::Yml)]
    format: Format,
}

pub fn run(args: CreateArgs) -> Result<()> {
    if !args.no_prompts {
        tracing::debug!("Interactive prompting is not supported; using flag values");
    }

    let is_static = args.challenge_type.eq_ignore_ascii_case("static");
    let dockerfile_locations = if is_static {
        None
    } else {
        Some(vec![DockerfileLocationInput {
            location: Some(args.dockerfile_location),
            context: Some(args.dockerfile_context),
            identifier: args.dockerfile_identifier,
        }])
    };

    let challenge = Challenge::build(ChallengeInput {
        name: Some(args.name),
        slug: args.slug,
        author: Some(args.author),
        category: Some(args.category),
        difficulty: Some(args.difficulty),
        challenge_type: Some(args.challenge_type),
        instanced_type: Some(args.instanced_type),
        flag: args.flag.map(FlagInput::One),
        points: args.points,
        min_points: args.min_points,
        description_location: args.description_location,
        handout_dir: args.handout_location,
        dockerfile_locations,
        ..Default::default()
    })?;

    let layout = RepoLayout::from_cwd()?;
    let scaffolder = Scaffolder::new(&layout, &challenge);
    scaffolder.build(args.format.into())?;
    tracing::info!("Challenge created at {}", scaffolder.path().display());
    Ok(())
}
