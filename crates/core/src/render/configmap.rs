// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use crate::config::CHALLENGE_SCHEMA;
use crate::error::Result;
use crate::layout::RepoLayout;
use crate::model::Challenge;
use crate::render::{
    RenderOptions, chart_yaml, current_date, indent_block, read_template, replace_block,
    replace_templated,
};
use crate::version;

pub const CONFIGMAP_TEMPLATE: &str = "challenge-configmap.yml";

/// Renders the ConfigMap Helm chart embedding the challenge's canonical
/// JSON and its description markdown.
pub struct ConfigMapRenderer<'a> {
    layout: &'a RepoLayout,
    challenge: &'a Challenge,
}

impl<'a> ConfigMapRenderer<'a> {
    pub fn new(layout: &'a RepoLayout, challenge: &'a Challenge) -> Self {
        ConfigMapRenderer { layout, challenge }
    }

    /// Renders chart, values and manifest under `k8s/config`. Bumps the
    /// challenge version as part of the pass; the bumped value is embedded
    /// in the bindings and the chart semver.
    pub fn render(&self, opts: &RenderOptions) -> Result<PathBuf> {
        let template_content =
            read_template(&self.layout.template_dir().join(CONFIGMAP_TEMPLATE))?;

        let challenge_dir = self.challenge.dir(self.layout);
        let version = version::bump_version(&challenge_dir)?;

        let config = indent_block(&self.challenge.to_json_string(CHALLENGE_SCHEMA)?);
        let description = indent_block(&self.challenge.description(&challenge_dir)?);

        let output = replace_block(&template_content, "%%CONFIG%%", &config);
        let output = replace_block(&output, "%%DESCRIPTION%%", &description);

        let slug = self.challenge.slug();
        let category = self.challenge.category();
        let path_str = RepoLayout::challenge_dir_str(category, slug);

        let output = replace_templated("CHALLENGE_NAME", slug, &output);
        let output = replace_templated("CHALLENGE_PATH", &path_str, &output);
        let output = replace_templated("CHALLENGE_REPO", &opts.repo, &output);
        let output = replace_templated("CHALLENGE_CATEGORY", category.as_str(), &output);
        let output =
            replace_templated("CHALLENGE_TYPE", self.challenge.instanced_type().as_str(), &output);
        let output = replace_templated("CHALLENGE_VERSION", &version.to_string(), &output);
        let output = replace_templated(
            "CHALLENGE_ENABLED",
            if self.challenge.enabled() { "true" } else { "false" },
            &output,
        );
        let output = replace_templated("HOST", "{{ .Values.kubectf.host }}", &output);
        // Stamped so consumers can tell when the challenge was last updated.
        let output = replace_templated("CURRENT_DATE", &current_date(), &output);

        let configmap_dir = self.layout.configmap_dir(category, slug);
        std::fs::create_dir_all(&configmap_dir)?;

        std::fs::write(
            configmap_dir.join("Chart.yaml"),
            chart_yaml(
                &format!("configmap-{slug}"),
                version,
                &format!("Challenge configmap for {slug} in category {category}"),
            ),
        )?;
        std::fs::write(
            configmap_dir.join("values.yaml"),
            format!(
                "challenge:\n\
                 \x20 enabled: {enabled}\n\
                 \x20 name: {slug}\n\
                 \x20 category: {category}\n\
                 \x20 type: {instanced_type}\n\
                 \x20 version: {version}\n\
                 \x20 path: {path_str}\n\
                 kubectf:\n\
                 \x20 expires: {expires}\n\
                 \x20 availableAt: {available}\n\
                 \x20 host: example.com\n",
                enabled = self.challenge.enabled(),
                instanced_type = self.challenge.instanced_type(),
                expires = opts.expires,
                available = opts.available,
            ),
        )?;

        let templates_dir = configmap_dir.join("templates");
        std::fs::create_dir_all(&templates_dir)?;
        let output_file = templates_dir.join("k8s.yml");
        std::fs::write(&output_file, output)?;

        tracing::info!("Configmap generated at {}", output_file.display());
        Ok(output_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChallengeInput, FlagInput};

    fn challenge() -> Challenge {
        Challenge::build(ChallengeInput {
            name: Some("Example".into()),
            author: Some("someone".into()),
            category: Some("web".into()),
            difficulty: Some("easy".into()),
            challenge_type: Some("static".into()),
            flag: Some(FlagInput::One("ctf{a}".into())),
            ..Default::default()
        })
        .unwrap()
    }

    fn opts() -> RenderOptions {
        RenderOptions {
            repo: "owner/repo".into(),
            expires: 3600,
            available: 0,
        }
    }

    fn write_repo_fixture(root: &std::path::Path, challenge: &Challenge) {
        let layout = RepoLayout::new(root);
        std::fs::create_dir_all(layout.template_dir()).unwrap();
        std::fs::write(
            layout.template_dir().join(CONFIGMAP_TEMPLATE),
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: {{ CHALLENGE_NAME }}\n\
             data:\n  challenge.json: |\n    %%CONFIG%%\n  description.md: |\n    %%DESCRIPTION%%\n\
             \x20 updated: \"{{ CURRENT_DATE }}\"\n  host: {{ HOST }}\n",
        )
        .unwrap();
        let dir = challenge.dir(&layout);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("description.md"), "# Example\n\nSolve me.\n").unwrap();
    }

    #[test]
    fn renders_chart_values_and_manifest() {
        let root = tempfile::tempdir().unwrap();
        let challenge = challenge();
        write_repo_fixture(root.path(), &challenge);
        let layout = RepoLayout::new(root.path());

        let output = ConfigMapRenderer::new(&layout, &challenge)
            .render(&opts())
            .unwrap();
        let manifest = std::fs::read_to_string(&output).unwrap();
        assert!(manifest.contains("name: example"));
        assert!(manifest.contains("    \"slug\": \"example\""));
        assert!(manifest.contains("    # Example"));
        assert!(manifest.contains("host: {{ .Values.kubectf.host }}"));

        let config_dir = layout.configmap_dir(challenge.category(), challenge.slug());
        let chart = std::fs::read_to_string(config_dir.join("Chart.yaml")).unwrap();
        assert!(chart.contains("name: configmap-example"));
        assert!(chart.contains("version: 1.1.0"));
        let values = std::fs::read_to_string(config_dir.join("values.yaml")).unwrap();
        assert!(values.contains("  path: challenges/web/example"));
        assert!(values.contains("  expires: 3600"));
    }

    #[test]
    fn each_render_pass_bumps_the_version_by_one() {
        let root = tempfile::tempdir().unwrap();
        let challenge = challenge();
        write_repo_fixture(root.path(), &challenge);
        let layout = RepoLayout::new(root.path());
        let dir = challenge.dir(&layout);
        let renderer = ConfigMapRenderer::new(&layout, &challenge);

        assert_eq!(version::read_version(&dir).unwrap(), 0);
        renderer.render(&opts()).unwrap();
        assert_eq!(version::read_version(&dir).unwrap(), 1);
        renderer.render(&opts()).unwrap();
        assert_eq!(version::read_version(&dir).unwrap(), 2);
        let chart = std::fs::read_to_string(
            layout
                .configmap_dir(challenge.category(), challenge.slug())
                .join("Chart.yaml"),
        )
        .unwrap();
        assert!(chart.contains("version: 1.2.0"));
    }

    #[test]
    fn missing_template_source_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        let challenge = challenge();
        let layout = RepoLayout::new(root.path());
        std::fs::create_dir_all(challenge.dir(&layout)).unwrap();
        let result = ConfigMapRenderer::new(&layout, &challenge).render(&opts());
        assert!(matches!(
            result,
            Err(crate::error::Error::MissingTemplate(_))
        ));
    }
}
