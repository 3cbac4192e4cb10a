// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::{Path, PathBuf};

use crate::config::{CHALLENGE_SCHEMA, ChallengeType, InstancedType};
use crate::error::Result;
use crate::layout::RepoLayout;
use crate::model::Challenge;
use crate::render::{TCP_TEMPLATE, WEB_TEMPLATE};

/// On-disk format of the generated definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Yml,
    Yaml,
    Json,
}

impl DefinitionFormat {
    fn extension(&self) -> &'static str {
        match self {
            DefinitionFormat::Yml => "yml",
            DefinitionFormat::Yaml => "yaml",
            DefinitionFormat::Json => "json",
        }
    }
}

/// Creates a new challenge's on-disk skeleton. Every step checks for an
/// existing file or directory first and skips it with a notice, so
/// re-running against a partially scaffolded directory never overwrites
/// anything.
pub struct Scaffolder<'a> {
    layout: &'a RepoLayout,
    challenge: &'a Challenge,
    path: PathBuf,
    dir_src: PathBuf,
    dir_template: PathBuf,
    dir_solution: PathBuf,
    dir_k8s: PathBuf,
    dir_files: PathBuf,
    dir_handout: PathBuf,
}

impl<'a> Scaffolder<'a> {
    pub fn new(layout: &'a RepoLayout, challenge: &'a Challenge) -> Self {
        let path = challenge.dir(layout);
        let dir_k8s = path.join("k8s");
        Scaffolder {
            layout,
            challenge,
            dir_src: path.join("src"),
            dir_template: path.join("template"),
            dir_solution: path.join("solution"),
            dir_files: dir_k8s.join("files"),
            dir_handout: path.join(challenge.handout_dir()),
            dir_k8s,
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn build(&self, format: DefinitionFormat) -> Result<()> {
        self.src_directory()?;
        self.solution_directory()?;
        self.files_directory()?;
        self.handout_directory()?;

        self.challenge_file(format)?;
        self.readme_file()?;
        self.description_file()?;
        self.version_file()?;

        if self.challenge.challenge_type() != ChallengeType::Static {
            self.template_directory()?;
            self.k8s_directory()?;

            self.dockerfile()?;

            self.instanced_template_file()?;
        }
        Ok(())
    }

    fn create_directory_if_missing(&self, dir: &Path, name: &str) -> Result<bool> {
        if dir.exists() {
            tracing::info!("{name} {} already exists, skipping creation", dir.display());
            return Ok(false);
        }
        tracing::info!("Creating {name} {}", dir.display());
        std::fs::create_dir_all(dir)?;
        Ok(true)
    }

    fn write_file_if_missing(&self, path: &Path, content: &str, name: &str) -> Result<bool> {
        if path.exists() {
            tracing::info!("{name} already exists!");
            return Ok(false);
        }
        std::fs::write(path, content)?;
        tracing::info!("File created: {}", path.display());
        Ok(true)
    }

    fn src_directory(&self) -> Result<bool> {
        if self.create_directory_if_missing(&self.dir_src, "source directory")? {
            std::fs::write(
                self.dir_src.join(".gitkeep"),
                "# This file is used to keep the directory in the repository.\n\
                 # This directory is used to store source files for the challenge.",
            )?;
            return Ok(true);
        }
        Ok(false)
    }

    fn solution_directory(&self) -> Result<bool> {
        if self.create_directory_if_missing(&self.dir_solution, "solution directory")? {
            std::fs::write(
                self.dir_solution.join("README.md"),
                "# Solution\n\
                 This directory is used to store the solution script for the challenge.\n\
                 This file should contain the steps to solve the challenge.",
            )?;
            return Ok(true);
        }
        Ok(false)
    }

    fn files_directory(&self) -> Result<bool> {
        if self.create_directory_if_missing(&self.dir_files, "files directory")? {
            std::fs::write(
                self.dir_files.join(".gitkeep"),
                "# This file is used to keep the directory in the repository.\n\
                 # This directory is used to store files that are handed out, for the challenge. \
                 Use the handout directory for files that are handed out to users and want to be \
                 packaged as a zip file.",
            )?;
            return Ok(true);
        }
        Ok(false)
    }

    fn handout_directory(&self) -> Result<bool> {
        if self.create_directory_if_missing(&self.dir_handout, "handout directory")? {
            std::fs::write(
                self.dir_handout.join(".gitkeep"),
                "# This file is used to keep the directory in the repository.\n\
                 # This directory is used to store files that are handed out, for the challenge. \
                 The files are automatically zipped and copied to the files directory.",
            )?;
            return Ok(true);
        }
        Ok(false)
    }

    fn template_directory(&self) -> Result<bool> {
        if self.create_directory_if_missing(&self.dir_template, "template directory")? {
            std::fs::write(
                self.dir_template.join(".gitkeep"),
                "# This file is used to keep the directory in the repository.\n\
                 # This directory is used to store templates for the challenge deployment.",
            )?;
            return Ok(true);
        }
        Ok(false)
    }

    fn k8s_directory(&self) -> Result<bool> {
        if self.create_directory_if_missing(&self.dir_k8s, "k8s directory")? {
            std::fs::write(
                self.dir_k8s.join(".gitkeep"),
                "# This file is used to keep the directory in the repository.\n\
                 # This directory is used to store Kubernetes deployment files for the challenge.",
            )?;
            return Ok(true);
        }
        Ok(false)
    }

    fn challenge_file_exists(&self) -> bool {
        crate::model::CHALLENGE_FILES
            .iter()
            .any(|name| self.path.join(name).exists())
    }

    fn challenge_file(&self, format: DefinitionFormat) -> Result<bool> {
        // Any existing definition file wins, regardless of its format.
        if self.challenge_file_exists() {
            tracing::info!("Challenge file already exists!");
            return Ok(false);
        }
        let path = self
            .path
            .join(format!("challenge.{}", format.extension()));
        let content = match format {
            DefinitionFormat::Json => self.challenge.to_json_string(CHALLENGE_SCHEMA)?,
            _ => self.challenge.to_yaml_string(CHALLENGE_SCHEMA)?,
        };
        std::fs::write(&path, format!("{content}\n"))?;
        tracing::info!("File created: {}", path.display());
        Ok(true)
    }

    fn readme_file(&self) -> Result<bool> {
        self.write_file_if_missing(
            &self.path.join("README.md"),
            &format!(
                "# {}\n\n\
                 *Add information about challenge here*  \n\
                 *It is meant to contain internal documentation of the challenge, such as how it is solved*\n",
                self.challenge.name()
            ),
            "README file",
        )
    }

    fn description_file(&self) -> Result<bool> {
        let difficulty = self.challenge.difficulty().as_str();
        let mut difficulty = difficulty.to_string();
        if let Some(first) = difficulty.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        self.write_file_if_missing(
            &self.path.join("description.md"),
            &format!(
                "# {}\n\n\
                 **Difficulty:** {difficulty}  \n\
                 **Author:** {}  \n\n\
                 *Add challenge description here*\n",
                self.challenge.name(),
                self.challenge.author()
            ),
            "Description file",
        )
    }

    fn dockerfile(&self) -> Result<bool> {
        self.write_file_if_missing(
            &self.dir_src.join("Dockerfile"),
            &format!(
                "# Dockerfile for {} - {}\n\
                 FROM ubuntu:22.04\n\n\
                 RUN apt-get update && apt-get upgrade -y && apt-get install -y python3\n\
                 RUN useradd -m challengeuser\n\
                 \n\
                 USER challengeuser\n\n",
                self.challenge.category(),
                self.challenge.name()
            ),
            "Dockerfile",
        )
    }

    fn version_file(&self) -> Result<bool> {
        self.write_file_if_missing(&self.path.join("version"), "1", "Version file")
    }

    /// Copies the instanced-type-specific k8s template into the
    /// challenge's template directory. Missing source templates or an
    /// unsupported instanced type are notices, not errors.
    fn instanced_template_file(&self) -> Result<bool> {
        let template_dir = self.layout.template_dir();
        if !template_dir.join(WEB_TEMPLATE).is_file()
            || !template_dir.join(TCP_TEMPLATE).is_file()
        {
            tracing::warn!("k8s template files not found!");
            return Ok(false);
        }
        if !self.dir_template.exists() {
            tracing::warn!("Template directory not found!");
            return Ok(false);
        }
        let output_file = self.dir_template.join("k8s.yml");
        if output_file.exists() {
            tracing::info!("Template file already exists!");
            return Ok(false);
        }
        let source_file = match self.challenge.instanced_type() {
            InstancedType::Web => template_dir.join(WEB_TEMPLATE),
            InstancedType::Tcp => template_dir.join(TCP_TEMPLATE),
            InstancedType::None => {
                tracing::warn!(
                    "Instanced type {} is not supported for instanced challenges.",
                    self.challenge.instanced_type()
                );
                return Ok(false);
            }
        };
        std::fs::copy(source_file, &output_file)?;
        tracing::info!("File created: {}", output_file.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::{ChallengeInput, FlagInput};

    fn challenge(challenge_type: &str, instanced_type: Option<&str>) -> Challenge {
        Challenge::build(ChallengeInput {
            name: Some("Example".into()),
            author: Some("someone".into()),
            category: Some("web".into()),
            difficulty: Some("easy-medium".into()),
            challenge_type: Some(challenge_type.into()),
            instanced_type: instanced_type.map(Into::into),
            flag: Some(FlagInput::One("ctf{a}".into())),
            ..Default::default()
        })
        .unwrap()
    }

    fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in std::fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    files.insert(path.clone(), Vec::new());
                    stack.push(path);
                } else {
                    files.insert(path.clone(), std::fs::read(&path).unwrap());
                }
            }
        }
        files
    }

    #[test]
    fn static_challenge_skeleton() {
        let root = tempfile::tempdir().unwrap();
        let layout = RepoLayout::new(root.path());
        let challenge = challenge("static", None);
        let scaffolder = Scaffolder::new(&layout, &challenge);
        scaffolder.build(DefinitionFormat::Yml).unwrap();

        let path = scaffolder.path();
        assert!(path.join("src").join(".gitkeep").exists());
        assert!(path.join("solution").join("README.md").exists());
        assert!(path.join("k8s").join("files").join(".gitkeep").exists());
        assert!(path.join("handout").join(".gitkeep").exists());
        assert!(path.join("challenge.yml").exists());
        assert!(path.join("README.md").exists());
        assert_eq!(
            std::fs::read_to_string(path.join("version")).unwrap(),
            "1"
        );
        // Static challenges get no Dockerfile or template dir.
        assert!(!path.join("src").join("Dockerfile").exists());
        assert!(!path.join("template").exists());

        let description = std::fs::read_to_string(path.join("description.md")).unwrap();
        assert!(description.contains("**Difficulty:** Easy-medium"));
        assert!(description.contains("**Author:** someone"));
    }

    #[test]
    fn instanced_challenge_gets_dockerfile_and_template() {
        let root = tempfile::tempdir().unwrap();
        let layout = RepoLayout::new(root.path());
        std::fs::create_dir_all(layout.template_dir()).unwrap();
        std::fs::write(layout.template_dir().join(WEB_TEMPLATE), "web: true\n").unwrap();
        std::fs::write(layout.template_dir().join(TCP_TEMPLATE), "tcp: true\n").unwrap();

        let challenge = challenge("instanced", Some("tcp"));
        let scaffolder = Scaffolder::new(&layout, &challenge);
        scaffolder.build(DefinitionFormat::Yml).unwrap();

        let path = scaffolder.path();
        assert!(path.join("src").join("Dockerfile").exists());
        assert_eq!(
            std::fs::read_to_string(path.join("template").join("k8s.yml")).unwrap(),
            "tcp: true\n"
        );
    }

    #[test]
    fn rebuilding_changes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let layout = RepoLayout::new(root.path());
        std::fs::create_dir_all(layout.template_dir()).unwrap();
        std::fs::write(layout.template_dir().join(WEB_TEMPLATE), "web: true\n").unwrap();
        std::fs::write(layout.template_dir().join(TCP_TEMPLATE), "tcp: true\n").unwrap();

        let challenge = challenge("instanced", Some("web"));
        let scaffolder = Scaffolder::new(&layout, &challenge);
        scaffolder.build(DefinitionFormat::Yml).unwrap();

        // Simulate work done since the first scaffolding pass.
        std::fs::write(scaffolder.path().join("version"), "7").unwrap();
        let before = snapshot(root.path());

        scaffolder.build(DefinitionFormat::Yml).unwrap();
        assert_eq!(before, snapshot(root.path()));
    }

    #[test]
    fn existing_definition_file_wins_over_requested_format() {
        let root = tempfile::tempdir().unwrap();
        let layout = RepoLayout::new(root.path());
        let challenge = challenge("static", None);
        let scaffolder = Scaffolder::new(&layout, &challenge);
        std::fs::create_dir_all(scaffolder.path()).unwrap();
        std::fs::write(scaffolder.path().join("challenge.json"), "{}").unwrap();

        scaffolder.build(DefinitionFormat::Yml).unwrap();
        assert!(!scaffolder.path().join("challenge.yml").exists());
        assert_eq!(
            std::fs::read_to_string(scaffolder.path().join("challenge.json")).unwrap(),
            "{}"
        );
    }
}
