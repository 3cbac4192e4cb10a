// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

mod clean;
mod configmap;
mod handout;
mod k8s;
mod page;

pub use clean::clean;
pub use configmap::ConfigMapRenderer;
pub use handout::HandoutPacker;
pub use k8s::{K8sRenderer, TCP_TEMPLATE, WEB_TEMPLATE};
pub use page::PageRenderer;

use std::path::Path;

use crate::error::{Error, Result};

/// Indentation applied to block placeholders in the shipped templates.
const INDENT: &str = "    ";

/// Options the CLI layer hands to the renderers.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// GitHub repository in `owner/repo` form, embedded in the manifests.
    pub repo: String,
    /// Seconds until an instanced deployment expires.
    pub expires: u64,
    /// Timestamp at which the challenge becomes available.
    pub available: u64,
}

/// Replaces every spelling of the `{{ KEY }}` placeholder with the value.
/// Substitution is a sequential whole-document replace, one key at a time:
/// substituted values are not re-scanned, but a later key's pattern can
/// still match inside an earlier substituted value. Callers therefore
/// substitute keys in a fixed order.
pub fn replace_templated(key: &str, value: &str, content: &str) -> String {
    let content = content.replace(&format!("{{{{ {key} }}}}"), value);
    let content = content.replace(&format!("{{{{{key}}}}}"), value);
    let content = content.replace(&format!("{{ {{ {key} }} }}"), value);
    content.replace(&format!("{{ {{{key}}} }}"), value)
}

/// Re-indents a multi-line block so each line carries the template's
/// four-space prefix, each line terminated by a newline.
pub fn indent_block(text: &str) -> String {
    text.lines()
        .map(|line| format!("{INDENT}{line}\n"))
        .collect()
}

/// Same re-indentation, but lines joined without a trailing newline, for
/// placeholders that sit on their own template line.
pub fn indent_inline(text: &str) -> String {
    text.lines()
        .map(|line| format!("{INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces a `%%BLOCK%%` placeholder anchored at the template's four-space
/// indentation with an already re-indented block.
pub fn replace_block(content: &str, placeholder: &str, block: &str) -> String {
    content.replace(&format!("{INDENT}{placeholder}"), block)
}

/// Reads a required template source file; a missing source is fatal for the
/// current command.
pub fn read_template(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::MissingTemplate(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Helm chart metadata written next to every rendered manifest. The chart
/// semver is derived from the entity version as `1.<version>.0`.
pub(crate) fn chart_yaml(name: &str, version: u64, description: &str) -> String {
    let semver = format!("1.{version}.0");
    format!(
        "apiVersion: v2\n\
         name: {name}\n\
         version: {semver}\n\
         description: {description}\n\
         appVersion: \"{semver}\"\n\
         type: application\n"
    )
}

pub(crate) fn current_date() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
