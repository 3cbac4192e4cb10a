// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

use commands::{create, page, pipeline, slugify, template};

/// Challenge repository toolkit.
#[derive(Parser, Debug)]
#[command(name = "ctf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the directory skeleton for a new challenge.
    Create(create::CreateArgs),
    /// Render deployment templates for a challenge.
    Template(template::TemplateArgs),
    /// Render the configmap for a CTFd page.
    Page(page::PageArgs),
    /// Build and push the Docker images of a challenge.
    Pipeline(pipeline::PipelineArgs),
    /// Slugify a string for use in a challenge slug.
    Slugify(slugify::SlugifyArgs),
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Create(args) => create::run(args),
        Commands::Template(args) => template::run(args),
        Commands::Page(args) => page::run(args),
        Commands::Pipeline(args) => pipeline::run(args),
        Commands::Slugify(args) => slugify::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // GitHub runners pick this annotation up as a check failure.
            if std::env::var_os("GITHUB_ACTIONS").is_some() {
                eprintln!("::error::An error occurred: {error:#}");
            }
            tracing::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
