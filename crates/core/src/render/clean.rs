// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::Path;

use crate::error::Result;
use crate::layout::RepoLayout;
use crate::model::Challenge;

/// Empties a challenge's `k8s` directory, removing files first and
/// directories bottom-up. A challenge without a k8s directory is a no-op.
pub fn clean(layout: &RepoLayout, challenge: &Challenge) -> Result<()> {
    let path = layout.k8s_dir(challenge.category(), challenge.slug());
    if !path.exists() {
        tracing::info!(
            "Challenge {} does not have a k8s directory.",
            challenge.slug()
        );
        return Ok(());
    }
    remove_contents(&path)?;
    tracing::info!("Cleaned instanced template for {}", challenge.slug());
    Ok(())
}

fn remove_contents(dir: &Path) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            remove_contents(&path)?;
            std::fs::remove_dir(&path)?;
            tracing::info!("Removed directory: {}", path.display());
        } else {
            std::fs::remove_file(&path)?;
            tracing::info!("Removed file: {}", path.display());
        }
    }
    Ok(())
}
