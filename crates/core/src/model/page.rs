// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::{PAGE_CONTENT_PATH, PageDefaults, PageFormat};
use crate::error::{Error, Result};
use crate::layout::RepoLayout;
use crate::model::challenge::load_input;
use crate::slug::validate_length;

pub const PAGE_FILES: &[&str] = &["page.yml", "page.yaml", "page.json"];

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PageInput {
    pub enabled: Option<bool>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub route: Option<String>,
    pub content: Option<String>,
    pub format: Option<String>,
    pub auth: Option<bool>,
    pub draft: Option<bool>,
}

/// One static content page's metadata for the challenge platform. Same
/// validate-on-build contract and load/serialize lifecycle as a challenge,
/// scoped to the pages directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    enabled: bool,
    slug: String,
    title: String,
    route: String,
    content: String,
    format: PageFormat,
    auth: bool,
    draft: bool,
}

impl Page {
    pub fn build(input: PageInput) -> Result<Page> {
        let defaults = PageDefaults::default();

        let slug = input.slug.unwrap_or_default();
        if !validate_length(Some(&slug), 1, 50) {
            return Err(Error::validation(
                "slug",
                "Slug must be between 1 and 50 characters.",
            ));
        }
        let title = input.title.unwrap_or_default();
        if !validate_length(Some(&title), 1, 100) {
            return Err(Error::validation(
                "title",
                "Title must be between 1 and 100 characters.",
            ));
        }
        let route = input.route.unwrap_or_default();
        if !validate_length(Some(&route), 1, 100) {
            return Err(Error::validation(
                "route",
                "Route must be between 1 and 100 characters.",
            ));
        }
        let content = input
            .content
            .unwrap_or_else(|| defaults.content.to_string());
        if !PAGE_CONTENT_PATH.is_match(&content) {
            return Err(Error::validation(
                "content",
                "Content must be a valid file path ending in .md, .html, or .txt.",
            ));
        }
        let format = match input.format.as_deref() {
            None => defaults.format,
            Some(text) => PageFormat::parse(text).ok_or_else(|| {
                Error::validation(
                    "format",
                    format!(
                        "Format must be one of the following: {}",
                        PageFormat::permitted()
                    ),
                )
            })?,
        };

        Ok(Page {
            enabled: input.enabled.unwrap_or(defaults.enabled),
            slug,
            title,
            route,
            content,
            format,
            auth: input.auth.unwrap_or(defaults.auth),
            draft: input.draft.unwrap_or(defaults.draft),
        })
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn format(&self) -> PageFormat {
        self.format
    }

    pub fn auth(&self) -> bool {
        self.auth
    }

    pub fn draft(&self) -> bool {
        self.draft
    }

    pub fn dir(&self, layout: &RepoLayout) -> PathBuf {
        layout.page_dir(&self.slug)
    }

    pub fn generate_dict(&self, schema_location: &str) -> IndexMap<&'static str, Value> {
        let mut data = IndexMap::new();
        data.insert("$schema", json!(schema_location));
        data.insert("enabled", json!(self.enabled));
        data.insert("slug", json!(self.slug));
        data.insert("title", json!(self.title));
        data.insert("route", json!(self.route));
        data.insert("content", json!(self.content));
        data.insert("format", json!(self.format));
        data.insert("auth", json!(self.auth));
        data.insert("draft", json!(self.draft));
        data
    }

    pub fn to_yaml_string(&self, schema_location: &str) -> Result<String> {
        let mut data = self.generate_dict(schema_location);
        data.shift_remove("$schema");
        let body = serde_yaml::to_string(&data).map_err(|e| Error::Malformed {
            path: PathBuf::from("page.yml"),
            message: e.to_string(),
        })?;
        Ok(format!(
            "# yaml-language-server: $schema={schema_location}\n\n{body}"
        ))
    }

    pub fn to_json_string(&self, schema_location: &str) -> Result<String> {
        let data = self.generate_dict(schema_location);
        serde_json::to_string_pretty(&data).map_err(|e| Error::Malformed {
            path: PathBuf::from("page.json"),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Page> {
        if !path.exists() {
            return Err(Error::NotFound {
                what: "Page definition file",
                path: path.to_path_buf(),
            });
        }
        let input = load_input(path)?;
        Page::build(input)
    }

    pub fn load_dir(dir: &Path) -> Result<Option<Page>> {
        if !dir.is_dir() {
            return Err(Error::NotFound {
                what: "Page directory",
                path: dir.to_path_buf(),
            });
        }
        for candidate in PAGE_FILES {
            let path = dir.join(candidate);
            if path.is_file() {
                tracing::debug!("Loading page definition from {}", path.display());
                return Page::load(&path).map(Some);
            }
        }
        Ok(None)
    }
}
