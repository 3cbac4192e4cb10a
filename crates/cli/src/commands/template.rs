// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::Result;
use clap::ValueEnum;
use ctfpilot_core::layout::RepoLayout;
use ctfpilot_core::render::{
    clean, ConfigMapRenderer, HandoutPacker, K8sRenderer, RenderOptions,
};

use super::{load_challenge, resolve_repo};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Renderer {
    K8s,
    Configmap,
    Clean,
    Handout,
}

#[derive(clap::Args, Debug)]
pub struct TemplateArgs {
    /// Renderer to use for the challenge.
    #[arg(value_enum)]
    renderer: Renderer,
    /// Challenge to run (directory for challenge - 'web/example').
    challenge: String,
    /// Time until challenge expires.
    #[arg(long, default_value_t = 3600)]
    expires: u64,
    /// Time until challenge is available.
    #[arg(long, default_value_t = 0)]
    available: u64,
    /// GitHub repository for CTFd pages in the format 'owner/repo'.
    #[arg(long)]
    repo: Option<String>,
}

pub fn run(args: TemplateArgs) -> Result<()> {
    let layout = RepoLayout::from_cwd()?;
    let (_, _, challenge) = load_challenge(&layout, &args.challenge)?;

    match args.renderer {
        Renderer::Clean => {
            clean(&layout, &challenge)?;
        }
        Renderer::Handout => {
            HandoutPacker::new(&layout, &challenge).pack()?;
        }
        Renderer::K8s => {
            let opts = RenderOptions {
                repo: resolve_repo(args.repo)?,
                expires: args.expires,
                available: args.available,
            };
            match K8sRenderer::new(&layout, &challenge).render(&opts)? {
                Some(output) => tracing::info!("K8s template generated at {}", output.display()),
                None => tracing::info!("Challenge does not have a k8s template."),
            }
        }
        Renderer::Configmap => {
            let opts = RenderOptions {
                repo: resolve_repo(args.repo)?,
                expires: args.expires,
                available: args.available,
            };
            let output = ConfigMapRenderer::new(&layout, &challenge).render(&opts)?;
            tracing::info!("Configmap generated at {}", output.display());
        }
    }
    Ok(())
}
