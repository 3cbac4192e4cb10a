// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::process::{Command, Stdio};

use crate::config::Category;
use crate::error::{Error, Result};
use crate::layout::RepoLayout;
use crate::model::{Challenge, DockerfileLocation};
use crate::slug::slug;
use crate::version::bump_version;

/// Full image reference for one Dockerfile location, without a tag.
///
/// `registry/prefix-category-slug`, extended with the location's
/// identifier and the global suffix when present. Identifier and suffix
/// values of `none`, `null` or the empty string are treated as unset.
/// Registries reject uppercase repository names, so the reference is
/// lowercased as a whole.
pub fn image_reference(
    registry: &str,
    image_prefix: &str,
    image_suffix: Option<&str>,
    challenge: &Challenge,
    location: &DockerfileLocation,
) -> String {
    let category = slug(Some(challenge.category().as_str())).unwrap_or_default();
    let mut image = format!(
        "{registry}/{image_prefix}-{category}-{}",
        challenge.slug()
    );
    if let Some(identifier) = location.identifier.as_deref().filter(|v| part_is_set(v)) {
        image.push('-');
        image.push_str(identifier);
    }
    if let Some(suffix) = image_suffix.filter(|v| part_is_set(v)) {
        image.push('-');
        image.push_str(suffix);
    }
    image.to_lowercase()
}

fn part_is_set(value: &str) -> bool {
    !value.is_empty() && !value.eq_ignore_ascii_case("none") && !value.eq_ignore_ascii_case("null")
}

/// Builds and pushes every Docker image a challenge declares.
pub struct Pipeline<'a> {
    layout: &'a RepoLayout,
    registry: String,
    image_prefix: String,
    image_suffix: Option<String>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        layout: &'a RepoLayout,
        registry: impl Into<String>,
        image_prefix: impl Into<String>,
        image_suffix: Option<String>,
    ) -> Self {
        Pipeline {
            layout,
            registry: registry.into(),
            image_prefix: image_prefix.into(),
            image_suffix,
        }
    }

    /// Loads the challenge, bumps its version and then builds and pushes
    /// an image per Dockerfile location. The bump comes first so the
    /// version tag on the images matches the manifests rendered from the
    /// same version file afterwards.
    pub fn run(&self, category: Category, challenge_slug: &str) -> Result<()> {
        let dir = self.layout.challenge_dir(category, challenge_slug);
        tracing::info!(
            "Running pipeline for challenge \"{}/{challenge_slug}\"",
            category
        );

        let challenge = Challenge::load_dir(&dir)?.ok_or(Error::NotFound {
            what: "Challenge definition",
            path: dir.clone(),
        })?;

        let version = bump_version(&dir)?;

        for location in challenge.dockerfile_locations() {
            tracing::info!(
                "Building Docker image for {}...",
                location.identifier.as_deref().unwrap_or("default")
            );
            self.build_and_push(&challenge, version, location)?;
        }
        tracing::info!("Docker process complete");
        Ok(())
    }

    fn build_and_push(
        &self,
        challenge: &Challenge,
        version: u64,
        location: &DockerfileLocation,
    ) -> Result<()> {
        let image = image_reference(
            &self.registry,
            &self.image_prefix,
            self.image_suffix.as_deref(),
            challenge,
            location,
        );
        let dir = challenge.dir(self.layout);

        tracing::info!("Building Docker image \"{image}\"...");
        run_command(
            Command::new("docker")
                .arg("build")
                .args(["-t", &format!("{image}:latest")])
                .args(["-t", &format!("{image}:{version}")])
                .arg("-f")
                .arg(dir.join(&location.location))
                .arg(dir.join(&location.context)),
        )?;

        run_command(
            Command::new("docker")
                .arg("push")
                .arg(&image)
                .arg("--all-tags"),
        )
    }
}

/// Runs a command with inherited stdio, mapping a non-zero exit status to
/// an error carrying the rendered command line.
fn run_command(command: &mut Command) -> Result<()> {
    let status = command
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;
    if !status.success() {
        return Err(Error::CommandFailed {
            command: format!("{command:?}"),
            code: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChallengeInput, FlagInput};

    fn challenge() -> Challenge {
        Challenge::build(ChallengeInput {
            name: Some("Buffer Overflow".into()),
            author: Some("someone".into()),
            category: Some("pwn".into()),
            difficulty: Some("hard".into()),
            challenge_type: Some("static".into()),
            flag: Some(FlagInput::One("ctf{pwn}".into())),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn reference_without_identifier_or_suffix() {
        let challenge = challenge();
        let location = DockerfileLocation::new("src/Dockerfile", "src/", None).unwrap();
        assert_eq!(
            image_reference("registry.example.com", "ctf", None, &challenge, &location),
            "registry.example.com/ctf-pwn-buffer-overflow"
        );
    }

    #[test]
    fn reference_appends_identifier_and_suffix() {
        let challenge = challenge();
        let location =
            DockerfileLocation::new("bot/Dockerfile", "bot/", Some("Bot")).unwrap();
        assert_eq!(
            image_reference(
                "registry.example.com",
                "ctf",
                Some("Staging"),
                &challenge,
                &location
            ),
            "registry.example.com/ctf-pwn-buffer-overflow-bot-staging"
        );
    }

    #[test]
    fn placeholder_parts_are_dropped() {
        let challenge = challenge();
        let location = DockerfileLocation::new("src/Dockerfile", "src/", None).unwrap();
        for suffix in ["none", "NULL", ""] {
            assert_eq!(
                image_reference("r.example.com", "ctf", Some(suffix), &challenge, &location),
                "r.example.com/ctf-pwn-buffer-overflow"
            );
        }
    }

    #[test]
    fn run_fails_for_missing_challenge() {
        let root = tempfile::tempdir().unwrap();
        let layout = RepoLayout::new(root.path());
        let pipeline = Pipeline::new(&layout, "r.example.com", "ctf", None);
        let err = pipeline
            .run(Category::Web, "does-not-exist")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
