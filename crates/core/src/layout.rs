// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::{Path, PathBuf};

use crate::config::Category;
use crate::slug;

/// Path conventions of a challenge repository, rooted wherever the tool is
/// invoked. Every entity directory is derived from slugified components so
/// no free-text value ever reaches a filesystem join.
#[derive(Debug, Clone)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        RepoLayout { root: root.into() }
    }

    pub fn from_cwd() -> std::io::Result<Self> {
        Ok(RepoLayout {
            root: std::env::current_dir()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn challenges_dir(&self) -> PathBuf {
        self.root.join("challenges")
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.root.join("pages")
    }

    /// Source directory for the fixed template files consumed by the
    /// renderers and the scaffolder.
    pub fn template_dir(&self) -> PathBuf {
        self.root.join("template")
    }

    pub fn challenge_dir(&self, category: Category, slug: &str) -> PathBuf {
        self.challenges_dir().join(category.as_str()).join(slug)
    }

    pub fn page_dir(&self, page_slug: &str) -> PathBuf {
        self.pages_dir()
            .join(slug::slug(Some(page_slug)).unwrap_or_default())
    }

    pub fn k8s_dir(&self, category: Category, slug: &str) -> PathBuf {
        self.challenge_dir(category, slug).join("k8s")
    }

    pub fn page_k8s_dir(&self, page_slug: &str) -> PathBuf {
        self.page_dir(page_slug).join("k8s")
    }

    /// Output root for the instanced-deployment renderer.
    pub fn challenge_render_dir(&self, category: Category, slug: &str) -> PathBuf {
        self.k8s_dir(category, slug).join("challenge")
    }

    /// Output root for the configmap renderer.
    pub fn configmap_dir(&self, category: Category, slug: &str) -> PathBuf {
        self.k8s_dir(category, slug).join("config")
    }

    /// Repository-relative challenge path as embedded in rendered bindings.
    pub fn challenge_dir_str(category: Category, slug: &str) -> String {
        format!("challenges/{}/{}", category.as_str(), slug)
    }

    pub fn page_dir_str(page_slug: &str) -> String {
        format!(
            "pages/{}",
            slug::slug(Some(page_slug)).unwrap_or_default()
        )
    }
}
