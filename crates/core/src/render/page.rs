// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use crate::config::PAGE_SCHEMA;
use crate::error::{Error, Result};
use crate::layout::RepoLayout;
use crate::model::Page;
use crate::render::{
    current_date, indent_block, read_template, replace_block, replace_templated,
};
use crate::version;

pub const PAGE_CONFIGMAP_TEMPLATE: &str = "page-configmap.yml";

/// Renders the ConfigMap manifest embedding a page's canonical JSON and
/// its content file.
pub struct PageRenderer<'a> {
    layout: &'a RepoLayout,
    page: &'a Page,
}

impl<'a> PageRenderer<'a> {
    pub fn new(layout: &'a RepoLayout, page: &'a Page) -> Self {
        PageRenderer { layout, page }
    }

    fn content(&self) -> Result<String> {
        let content_path = self.page.dir(self.layout).join(self.page.content());
        if !content_path.is_file() {
            return Err(Error::NotFound {
                what: "Page content file",
                path: content_path,
            });
        }
        tracing::info!("Rendering content from {}", content_path.display());
        Ok(std::fs::read_to_string(content_path)?)
    }

    /// Renders `k8s/page.yml` under the page directory, bumping the page
    /// version as part of the pass.
    pub fn render(&self, repo: &str) -> Result<PathBuf> {
        let template_content =
            read_template(&self.layout.template_dir().join(PAGE_CONFIGMAP_TEMPLATE))?;

        let page_dir = self.page.dir(self.layout);
        let version = version::bump_version(&page_dir)?;

        let page_json = indent_block(&self.page.to_json_string(PAGE_SCHEMA)?);
        let content = indent_block(&self.content()?);

        let output = replace_block(&template_content, "%%PAGE%%", &page_json);
        let output = replace_block(&output, "%%CONTENT%%", &content);

        let slug = self.page.slug();
        let output = replace_templated("PAGE_SLUG", slug, &output);
        let output = replace_templated("PAGE_NAME", slug, &output);
        let output = replace_templated("PAGE_PATH", &RepoLayout::page_dir_str(slug), &output);
        let output = replace_templated("PAGE_REPO", repo, &output);
        let output = replace_templated("PAGE_VERSION", &version.to_string(), &output);
        let output = replace_templated(
            "PAGE_ENABLED",
            if self.page.enabled() { "true" } else { "false" },
            &output,
        );
        let output = replace_templated("CURRENT_DATE", &current_date(), &output);

        let k8s_dir = self.layout.page_k8s_dir(slug);
        std::fs::create_dir_all(&k8s_dir)?;
        let output_file = k8s_dir.join("page.yml");
        std::fs::write(&output_file, output)?;

        tracing::info!("Configmap generated at {}", output_file.display());
        Ok(output_file)
    }
}
