// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::io::Write;
use std::path::PathBuf;

use ignore::WalkBuilder;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::Result;
use crate::layout::RepoLayout;
use crate::model::Challenge;

/// Packs a challenge's handout directory into
/// `k8s/files/<category>_<slug>.zip`, with the archive contents rooted at
/// a `<category>_<slug>/` directory. Git housekeeping files are skipped
/// and paths resolving outside the handout directory are refused.
pub struct HandoutPacker<'a> {
    layout: &'a RepoLayout,
    challenge: &'a Challenge,
}

impl<'a> HandoutPacker<'a> {
    pub fn new(layout: &'a RepoLayout, challenge: &'a Challenge) -> Self {
        HandoutPacker { layout, challenge }
    }

    /// `Ok(None)` when there is no handout directory or it holds no files.
    pub fn pack(&self) -> Result<Option<PathBuf>> {
        let slug = self.challenge.slug();
        tracing::info!("Rendering handout for challenge {slug}...");

        let files_dir = self
            .layout
            .k8s_dir(self.challenge.category(), slug)
            .join("files");
        if !files_dir.is_dir() {
            tracing::info!("Creating files directory for challenge {slug}");
            std::fs::create_dir_all(&files_dir)?;
            let gitkeep = files_dir.join(".gitkeep");
            if !gitkeep.exists() {
                std::fs::write(gitkeep, "# This file is to keep the directory in git.\n")?;
            }
        }

        let challenge_dir = self.challenge.dir(self.layout);
        let handout_dir = challenge_dir.join(self.challenge.handout_dir());
        if !handout_dir.is_dir() {
            tracing::warn!(
                "Handout directory {} does not exist for challenge {slug}, nothing to pack",
                self.challenge.handout_dir()
            );
            return Ok(None);
        }

        let handout_root = handout_dir.canonicalize()?;
        let mut entries = Vec::new();
        let walker = WalkBuilder::new(&handout_dir)
            .hidden(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .ignore(false)
            .build();
        for entry in walker {
            let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
            let path = entry.path().to_path_buf();
            if path == handout_dir {
                continue;
            }
            if matches!(
                path.file_name().and_then(|n| n.to_str()),
                Some(".gitkeep") | Some(".gitignore")
            ) {
                continue;
            }
            // Symlinks pointing out of the handout directory must not leak
            // repository content into the archive.
            if !path.canonicalize()?.starts_with(&handout_root) {
                tracing::warn!(
                    "Skipping {} as it is outside the handout directory",
                    path.display()
                );
                continue;
            }
            let Ok(relative) = path.strip_prefix(&handout_dir).map(PathBuf::from) else {
                continue;
            };
            entries.push((relative, path));
        }

        if entries.is_empty() {
            tracing::info!("Nothing found in the handout directory, skipping zip creation");
            return Ok(None);
        }

        let archive_root = format!(
            "{}_{}",
            self.challenge.category().as_str(),
            slug
        );
        let zip_path = files_dir.join(format!("{archive_root}.zip"));
        let file = std::fs::File::create(&zip_path)?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        for (relative, path) in entries {
            let name = format!("{archive_root}/{}", relative.display());
            if path.is_dir() {
                writer.add_directory(name, options)?;
            } else {
                writer.start_file(name, options)?;
                let contents = std::fs::read(&path)?;
                writer.write_all(&contents)?;
            }
        }
        writer.finish()?;

        tracing::info!("Handout files zipped to {}", zip_path.display());
        Ok(Some(zip_path))
    }
}
