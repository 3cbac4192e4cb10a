// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use crate::config::ChallengeType;
use crate::error::{Error, Result};
use crate::layout::RepoLayout;
use crate::model::Challenge;
use crate::render::{
    RenderOptions, chart_yaml, read_template, replace_block, replace_templated,
};
use crate::version;

pub const BASE_TEMPLATE: &str = "instanced-k8s-challenge.yml";
pub const WEB_TEMPLATE: &str = "instanced-web-k8s.yml";
pub const TCP_TEMPLATE: &str = "instanced-tcp-k8s.yml";

/// Renders the per-challenge Kubernetes deployment. Instanced challenges
/// are wrapped in the shared base template through the `%%TEMPLATE%%`
/// block; other types render their challenge template directly.
pub struct K8sRenderer<'a> {
    layout: &'a RepoLayout,
    challenge: &'a Challenge,
}

impl<'a> K8sRenderer<'a> {
    pub fn new(layout: &'a RepoLayout, challenge: &'a Challenge) -> Self {
        K8sRenderer { layout, challenge }
    }

    /// Deterministic lowercase image name embedded in the manifest.
    pub fn docker_image(&self) -> String {
        format!("{}-{}", self.challenge.category(), self.challenge.slug())
            .to_lowercase()
            .replace(' ', "")
    }

    /// Renders the manifest (plus chart and values for non-instanced
    /// types) under `k8s/challenge`. A challenge without its own
    /// `template/k8s.yml` has nothing to render; that is not an error.
    pub fn render(&self, opts: &RenderOptions) -> Result<Option<PathBuf>> {
        let template_dir = self.layout.template_dir();
        // The shared source templates must be present even when this
        // challenge does not use them; their absence means a broken repo.
        for source in [WEB_TEMPLATE, TCP_TEMPLATE] {
            let path = template_dir.join(source);
            if !path.is_file() {
                return Err(Error::MissingTemplate(path));
            }
        }

        let challenge_dir = self.challenge.dir(self.layout);
        let challenge_template_path = challenge_dir.join("template").join("k8s.yml");
        if !challenge_template_path.is_file() {
            tracing::info!(
                "Challenge {} does not have a k8s template, nothing to render",
                self.challenge.slug()
            );
            return Ok(None);
        }

        let challenge_template = std::fs::read_to_string(&challenge_template_path)?;
        let challenge_template_indented = super::indent_inline(&challenge_template);

        let instanced = self.challenge.challenge_type() == ChallengeType::Instanced;
        let base = if instanced {
            read_template(&template_dir.join(BASE_TEMPLATE))?
        } else {
            challenge_template.clone()
        };

        let version = version::bump_version(&challenge_dir)?;
        let slug = self.challenge.slug();
        let category = self.challenge.category();
        tracing::info!("Rendering k8s template for challenge {slug}...");

        let output = replace_block(&base, "%%TEMPLATE%%", &challenge_template_indented);
        let output = replace_templated("CHALLENGE_NAME", slug, &output);
        let output = replace_templated("CHALLENGE_CATEGORY", category.as_str(), &output);
        let output =
            replace_templated("CHALLENGE_TYPE", self.challenge.instanced_type().as_str(), &output);
        let output = replace_templated("CHALLENGE_VERSION", &version.to_string(), &output);
        let output = replace_templated("CHALLENGE_EXPIRES", &opts.expires.to_string(), &output);
        let output =
            replace_templated("CHALLENGE_AVAILABLE_AT", &opts.available.to_string(), &output);
        let output = replace_templated("CHALLENGE_REPO", &opts.repo, &output);
        let output = replace_templated("DOCKER_IMAGE", &self.docker_image(), &output);

        let mut deployment_dir = self.layout.challenge_render_dir(category, slug);
        std::fs::create_dir_all(&deployment_dir)?;

        if !instanced {
            std::fs::write(
                deployment_dir.join("Chart.yaml"),
                chart_yaml(
                    slug,
                    version,
                    &format!("Challenge {slug} in category {category}"),
                ),
            )?;
            std::fs::write(
                deployment_dir.join("values.yaml"),
                format!(
                    "challenge:\n\
                     \x20 enabled: {enabled}\n\
                     \x20 name: {slug}\n\
                     \x20 category: {category}\n\
                     \x20 type: {instanced_type}\n\
                     \x20 version: {version}\n\
                     \x20 path: {path}\n\
                     \x20 dockerImage: {docker_image}\n\
                     kubectf:\n\
                     \x20 expires: {expires}\n\
                     \x20 availableAt: {available}\n\
                     \x20 host: example.com\n",
                    enabled = self.challenge.enabled(),
                    instanced_type = self.challenge.instanced_type(),
                    path = RepoLayout::challenge_dir_str(category, slug),
                    docker_image = self.docker_image(),
                    expires = opts.expires,
                    available = opts.available,
                ),
            )?;
            deployment_dir = deployment_dir.join("templates");
            std::fs::create_dir_all(&deployment_dir)?;
        }

        let output_file = deployment_dir.join("k8s.yml");
        std::fs::write(&output_file, output)?;

        tracing::info!("K8s template generated at {}", output_file.display());
        Ok(Some(output_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChallengeInput, FlagInput};

    fn challenge(challenge_type: &str, instanced_type: Option<&str>) -> Challenge {
        Challenge::build(ChallengeInput {
            name: Some("Example".into()),
            author: Some("someone".into()),
            category: Some("pwn".into()),
            difficulty: Some("hard".into()),
            challenge_type: Some(challenge_type.into()),
            instanced_type: instanced_type.map(Into::into),
            flag: Some(FlagInput::One("ctf{a}".into())),
            ..Default::default()
        })
        .unwrap()
    }

    fn opts() -> RenderOptions {
        RenderOptions {
            repo: "owner/repo".into(),
            expires: 1800,
            available: 0,
        }
    }

    fn write_repo_fixture(root: &std::path::Path, challenge: &Challenge) -> RepoLayout {
        let layout = RepoLayout::new(root);
        std::fs::create_dir_all(layout.template_dir()).unwrap();
        std::fs::write(
            layout.template_dir().join(BASE_TEMPLATE),
            "kind: ChallengeDeployment\nname: {{ CHALLENGE_NAME }}\nexpires: {{ CHALLENGE_EXPIRES }}\n\
             spec:\n    %%TEMPLATE%%\n",
        )
        .unwrap();
        std::fs::write(layout.template_dir().join(WEB_TEMPLATE), "web: true\n").unwrap();
        std::fs::write(layout.template_dir().join(TCP_TEMPLATE), "tcp: true\n").unwrap();
        let template_dir = challenge.dir(&layout).join("template");
        std::fs::create_dir_all(&template_dir).unwrap();
        std::fs::write(
            template_dir.join("k8s.yml"),
            "image: {{ DOCKER_IMAGE }}\nversion: \"{{ CHALLENGE_VERSION }}\"\n",
        )
        .unwrap();
        layout
    }

    #[test]
    fn instanced_challenge_is_wrapped_in_the_base_template() {
        let root = tempfile::tempdir().unwrap();
        let challenge = challenge("instanced", Some("web"));
        let layout = write_repo_fixture(root.path(), &challenge);

        let output = K8sRenderer::new(&layout, &challenge)
            .render(&opts())
            .unwrap()
            .unwrap();
        let manifest = std::fs::read_to_string(&output).unwrap();
        assert!(manifest.starts_with("kind: ChallengeDeployment\nname: example\n"));
        assert!(manifest.contains("expires: 1800"));
        assert!(manifest.contains("    image: pwn-example"));
        assert!(manifest.contains("    version: \"1\""));
        // Instanced output goes straight under k8s/challenge, no chart.
        assert_eq!(
            output,
            layout
                .challenge_render_dir(challenge.category(), challenge.slug())
                .join("k8s.yml")
        );
        assert!(
            !layout
                .challenge_render_dir(challenge.category(), challenge.slug())
                .join("Chart.yaml")
                .exists()
        );
    }

    #[test]
    fn shared_challenge_renders_its_own_template_with_chart() {
        let root = tempfile::tempdir().unwrap();
        let challenge = challenge("shared", None);
        let layout = write_repo_fixture(root.path(), &challenge);

        let output = K8sRenderer::new(&layout, &challenge)
            .render(&opts())
            .unwrap()
            .unwrap();
        let manifest = std::fs::read_to_string(&output).unwrap();
        assert!(manifest.starts_with("image: pwn-example\n"));

        let render_dir = layout.challenge_render_dir(challenge.category(), challenge.slug());
        assert_eq!(output, render_dir.join("templates").join("k8s.yml"));
        let values = std::fs::read_to_string(render_dir.join("values.yaml")).unwrap();
        assert!(values.contains("  dockerImage: pwn-example"));
        let chart = std::fs::read_to_string(render_dir.join("Chart.yaml")).unwrap();
        assert!(chart.contains("name: example"));
    }

    #[test]
    fn challenge_without_template_renders_nothing() {
        let root = tempfile::tempdir().unwrap();
        let challenge = challenge("shared", None);
        let layout = write_repo_fixture(root.path(), &challenge);
        std::fs::remove_file(challenge.dir(&layout).join("template").join("k8s.yml")).unwrap();

        let result = K8sRenderer::new(&layout, &challenge).render(&opts()).unwrap();
        assert!(result.is_none());
        // Nothing to render must not burn a version.
        assert_eq!(version::read_version(&challenge.dir(&layout)).unwrap(), 0);
    }

    #[test]
    fn missing_shared_source_templates_are_fatal() {
        let root = tempfile::tempdir().unwrap();
        let challenge = challenge("instanced", Some("tcp"));
        let layout = write_repo_fixture(root.path(), &challenge);
        std::fs::remove_file(layout.template_dir().join(TCP_TEMPLATE)).unwrap();

        assert!(matches!(
            K8sRenderer::new(&layout, &challenge).render(&opts()),
            Err(Error::MissingTemplate(_))
        ));
    }
}
