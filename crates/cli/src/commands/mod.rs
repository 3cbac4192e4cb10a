// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod create;
pub mod page;
pub mod pipeline;
pub mod slugify;
pub mod template;

use anyhow::{anyhow, bail, Context, Result};
use ctfpilot_core::config::Category;
use ctfpilot_core::layout::RepoLayout;
use ctfpilot_core::model::Challenge;

/// Splits a `category/slug` challenge reference as passed on the command
/// line.
fn parse_challenge_ref(reference: &str) -> Result<(Category, &str)> {
    let Some((category, challenge_slug)) = reference.split_once('/') else {
        bail!("Challenge {reference} must be in the format 'category/name'");
    };
    let category = Category::parse(category).ok_or_else(|| {
        anyhow!(
            "Unknown category {category:?}, must be one of the following: {}",
            Category::permitted()
        )
    })?;
    Ok((category, challenge_slug))
}

/// Resolves and loads a challenge from its `category/slug` reference.
fn load_challenge(layout: &RepoLayout, reference: &str) -> Result<(Category, String, Challenge)> {
    let (category, challenge_slug) = parse_challenge_ref(reference)?;
    let dir = layout.challenge_dir(category, challenge_slug);
    let challenge = Challenge::load_dir(&dir)
        .with_context(|| format!("Failed to load challenge {reference}"))?
        .ok_or_else(|| anyhow!("Challenge {reference} is not a valid challenge"))?;
    Ok((category, challenge_slug.to_string(), challenge))
}

/// GitHub repository in `owner/repo` form, from the flag or the
/// GITHUB_REPOSITORY environment variable.
fn resolve_repo(flag: Option<String>) -> Result<String> {
    let repo = flag
        .filter(|r| !r.trim().is_empty())
        .or_else(|| std::env::var("GITHUB_REPOSITORY").ok())
        .unwrap_or_default();
    if repo.trim().is_empty() {
        bail!(
            "GitHub repository is required. Please provide it via the --repo argument \
             or the GITHUB_REPOSITORY environment variable."
        );
    }
    Ok(repo)
}
