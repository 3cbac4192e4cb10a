// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::{anyhow, Context, Result};
use ctfpilot_core::layout::RepoLayout;
use ctfpilot_core::model::Page;
use ctfpilot_core::render::PageRenderer;

use super::resolve_repo;

#[derive(clap::Args, Debug)]
pub struct PageArgs {
    /// Page to render (directory for page - 'example').
    page: String,
    /// GitHub repository for CTFd pages in the format 'owner/repo'.
    #[arg(long)]
    repo: Option<String>,
}

pub fn run(args: PageArgs) -> Result<()> {
    let repo = resolve_repo(args.repo)?;
    let layout = RepoLayout::from_cwd()?;

    let dir = layout.page_dir(&args.page);
    let page = Page::load_dir(&dir)
        .with_context(|| format!("Failed to load page {}", args.page))?
        .ok_or_else(|| anyhow!("Page {} is not a valid page", args.page))?;

    let output = PageRenderer::new(&layout, &page).render(&repo)?;
    tracing::info!("Configmap generated at {}", output.display());
    Ok(())
}
