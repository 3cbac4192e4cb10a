// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::Path;

use crate::error::{Error, Result};

/// Per-entity pipeline counter, persisted as a plain decimal in a `version`
/// file next to the definition file. Reads and writes are plain file I/O
/// with no locking; concurrent render passes over the same directory can
/// lose an increment (see DESIGN.md).
pub fn read_version(dir: &Path) -> Result<u64> {
    let file = dir.join("version");
    if !file.exists() {
        return Ok(0);
    }
    let text = std::fs::read_to_string(&file)?;
    text.trim().parse().map_err(|_| Error::Malformed {
        path: file,
        message: format!("version file must contain an integer, got {text:?}"),
    })
}

pub fn write_version(dir: &Path, version: u64) -> Result<()> {
    std::fs::write(dir.join("version"), version.to_string())?;
    Ok(())
}

/// Read-increment-write pass used by the renderers and the pipeline.
/// Returns the new version.
pub fn bump_version(dir: &Path) -> Result<u64> {
    let version = read_version(dir)? + 1;
    write_version(dir, version)?;
    tracing::info!("Version of {} is now {version}", dir.display());
    Ok(version)
}
