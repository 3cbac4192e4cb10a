// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::{
    Category, ChallengeDefaults, ChallengeType, Difficulty, InstancedType, DESCRIPTION_PATH,
    HANDOUT_PATH, SUBDOMAIN_FORMAT, TAG_FORMAT,
};
use crate::error::{Error, Result};
use crate::layout::RepoLayout;
use crate::model::dockerfile::{DockerfileLocation, DockerfileLocationInput};
use crate::model::flag::{ChallengeFlag, FlagInput};
use crate::slug::{slug, validate_length};

/// Candidate definition filenames, tried in this fixed priority order.
pub const CHALLENGE_FILES: &[&str] = &["challenge.yml", "challenge.yaml", "challenge.json"];

/// Raw challenge document as found in a definition file or assembled from
/// command-line input. Every key is optional; [`Challenge::build`] fills
/// defaults and validates. Unknown keys (such as `$schema`) are ignored.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ChallengeInput {
    pub enabled: Option<bool>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    #[serde(rename = "type")]
    pub challenge_type: Option<String>,
    pub tags: Option<Vec<String>>,
    pub instanced_type: Option<String>,
    pub instanced_name: Option<String>,
    pub instanced_subdomains: Option<Vec<String>>,
    pub connection: Option<String>,
    pub flag: Option<FlagInput>,
    pub points: Option<u32>,
    pub decay: Option<u32>,
    pub min_points: Option<u32>,
    pub description_location: Option<String>,
    pub handout_dir: Option<String>,
    pub dockerfile_locations: Option<Vec<DockerfileLocationInput>>,
    pub prerequisites: Option<Vec<String>>,
}

/// One challenge's full metadata. A value of this type has passed every
/// field validation; fields are private and only change through validating
/// methods, so it can never hold an invalid value.
#[derive(Debug, Clone, PartialEq)]
pub struct Challenge {
    enabled: bool,
    name: String,
    slug: String,
    author: String,
    category: Category,
    difficulty: Difficulty,
    challenge_type: ChallengeType,
    tags: Vec<String>,
    instanced_type: InstancedType,
    instanced_name: Option<String>,
    instanced_subdomains: Vec<String>,
    connection: Option<String>,
    flag: Vec<ChallengeFlag>,
    points: u32,
    decay: u32,
    min_points: u32,
    description_location: String,
    handout_dir: String,
    dockerfile_locations: Vec<DockerfileLocation>,
    prerequisites: Vec<String>,
}

impl Challenge {
    /// Builds a validated challenge from a raw document, filling the
    /// default table for every missing key. A persisted file with a bad
    /// value fails here exactly like bad command-line input would.
    pub fn build(input: ChallengeInput) -> Result<Challenge> {
        let defaults = ChallengeDefaults::default();

        let name = input.name.unwrap_or_default();
        if !validate_length(Some(&name), 1, 50) {
            return Err(Error::validation(
                "name",
                "Name must be between 1 and 50 characters.",
            ));
        }

        // Derived from the name when absent.
        let slug = slug(input.slug.as_deref().or(Some(&name))).unwrap_or_default();
        if !validate_length(Some(&slug), 1, 50) {
            return Err(Error::validation(
                "slug",
                "Slug must be between 1 and 50 characters.",
            ));
        }

        let author = input.author.unwrap_or_default();
        if !validate_length(Some(&author), 1, 100) {
            return Err(Error::validation(
                "author",
                "Author must be between 1 and 100 characters.",
            ));
        }

        let category = input
            .category
            .as_deref()
            .and_then(Category::parse)
            .ok_or_else(|| {
                Error::validation(
                    "category",
                    format!(
                        "Category must be one of the following: {}",
                        Category::permitted()
                    ),
                )
            })?;
        let difficulty = input
            .difficulty
            .as_deref()
            .and_then(Difficulty::parse)
            .ok_or_else(|| {
                Error::validation(
                    "difficulty",
                    format!(
                        "Difficulty must be one of the following: {}",
                        Difficulty::permitted()
                    ),
                )
            })?;
        let challenge_type = input
            .challenge_type
            .as_deref()
            .and_then(ChallengeType::parse)
            .ok_or_else(|| {
                Error::validation(
                    "type",
                    format!(
                        "Type must be one of the following: {}",
                        ChallengeType::permitted()
                    ),
                )
            })?;

        let instanced_type = match input.instanced_type.as_deref() {
            None => defaults.instanced_type,
            Some(text) => InstancedType::parse(text).ok_or_else(|| {
                Error::validation(
                    "instanced_type",
                    format!(
                        "Instanced type must be one of the following: {}",
                        InstancedType::permitted()
                    ),
                )
            })?,
        };
        if challenge_type != ChallengeType::Instanced && instanced_type != InstancedType::None {
            return Err(Error::validation(
                "instanced_type",
                "Instanced type must be \"none\" unless the challenge type is \"instanced\".",
            ));
        }

        let tags = input.tags.unwrap_or_default();
        for tag in &tags {
            if !TAG_FORMAT.is_match(tag) {
                return Err(Error::validation(
                    "tags",
                    format!(
                        "Tag {tag:?} does not match the required format: {}",
                        TAG_FORMAT.as_str()
                    ),
                ));
            }
        }

        let instanced_name = match input.instanced_name.as_deref() {
            None => None,
            Some(text) => {
                let name = crate::slug::slug(Some(text)).filter(|s| !s.is_empty());
                if !validate_length(name.as_deref(), 1, 50) {
                    return Err(Error::validation(
                        "instanced_name",
                        "Instanced name must be between 1 and 50 characters.",
                    ));
                }
                name
            }
        };

        let instanced_subdomains = input.instanced_subdomains.unwrap_or_default();
        if instanced_subdomains.len() > 5 {
            return Err(Error::validation(
                "instanced_subdomains",
                "Instanced subdomains must not exceed 5 items.",
            ));
        }
        for subdomain in &instanced_subdomains {
            if !SUBDOMAIN_FORMAT.is_match(subdomain) {
                return Err(Error::validation(
                    "instanced_subdomains",
                    format!(
                        "Subdomain {subdomain:?} does not match the required format: {}",
                        SUBDOMAIN_FORMAT.as_str()
                    ),
                ));
            }
            if subdomain.len() > 10 {
                return Err(Error::validation(
                    "instanced_subdomains",
                    format!("Subdomain {subdomain:?} exceeds the maximum length of 10 characters."),
                ));
            }
        }

        let connection = input.connection;
        if let Some(connection) = &connection
            && !validate_length(Some(connection), 1, 255)
        {
            return Err(Error::validation(
                "connection",
                "Connection string must be between 1 and 255 characters.",
            ));
        }

        let flag = input
            .flag
            .unwrap_or_else(|| FlagInput::One(defaults.flag.to_string()))
            .into_flags()?;

        let points = input.points.unwrap_or(defaults.points);
        if !(1..=10000).contains(&points) {
            return Err(Error::validation(
                "points",
                "Points must be between 1 and 10000.",
            ));
        }
        let decay = input.decay.unwrap_or(defaults.decay);
        if decay > 10000 {
            return Err(Error::validation(
                "decay",
                "Decay must be between 0 and 10000.",
            ));
        }
        let min_points = input.min_points.unwrap_or(defaults.min_points);
        if !(1..=1000).contains(&min_points) {
            return Err(Error::validation(
                "min_points",
                "Minimum points must be between 1 and 1000.",
            ));
        }

        let description_location = input
            .description_location
            .unwrap_or_else(|| defaults.description_location.to_string());
        if !DESCRIPTION_PATH.is_match(&description_location) {
            return Err(Error::validation(
                "description_location",
                "Description location must be a valid file path to a Markdown file.",
            ));
        }
        let handout_dir = input
            .handout_dir
            .unwrap_or_else(|| defaults.handout_dir.to_string());
        if !HANDOUT_PATH.is_match(&handout_dir) {
            return Err(Error::validation(
                "handout_dir",
                "Handout directory must be a valid file path.",
            ));
        }

        let mut challenge = Challenge {
            enabled: input.enabled.unwrap_or(defaults.enabled),
            name,
            slug,
            author,
            category,
            difficulty,
            challenge_type,
            tags,
            instanced_type,
            instanced_name,
            instanced_subdomains,
            connection,
            flag,
            points,
            decay,
            min_points,
            description_location,
            handout_dir,
            dockerfile_locations: Vec::new(),
            prerequisites: Vec::new(),
        };

        for location in input.dockerfile_locations.unwrap_or_default() {
            challenge.add_dockerfile_location(location.validate()?);
        }
        for prerequisite in input.prerequisites.unwrap_or_default() {
            challenge.add_prerequisite(&prerequisite)?;
        }

        Ok(challenge)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn challenge_type(&self) -> ChallengeType {
        self.challenge_type
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn instanced_type(&self) -> InstancedType {
        self.instanced_type
    }

    pub fn instanced_name(&self) -> Option<&str> {
        self.instanced_name.as_deref()
    }

    pub fn instanced_subdomains(&self) -> &[String] {
        &self.instanced_subdomains
    }

    pub fn connection(&self) -> Option<&str> {
        self.connection.as_deref()
    }

    pub fn flag(&self) -> &[ChallengeFlag] {
        &self.flag
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn decay(&self) -> u32 {
        self.decay
    }

    pub fn min_points(&self) -> u32 {
        self.min_points
    }

    pub fn description_location(&self) -> &str {
        &self.description_location
    }

    pub fn handout_dir(&self) -> &str {
        &self.handout_dir
    }

    pub fn dockerfile_locations(&self) -> &[DockerfileLocation] {
        &self.dockerfile_locations
    }

    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }

    /// Appends an already-validated build location.
    pub fn add_dockerfile_location(&mut self, location: DockerfileLocation) {
        self.dockerfile_locations.push(location);
    }

    /// Slugifies and appends one prerequisite challenge slug. Duplicates
    /// are an error, the list stays de-duplicated and ordered.
    pub fn add_prerequisite(&mut self, prerequisite: &str) -> Result<()> {
        let prerequisite = slug(Some(prerequisite))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::validation("prerequisite", "Prerequisite must be provided."))?;
        if !validate_length(Some(&prerequisite), 1, 50) {
            return Err(Error::validation(
                "prerequisite",
                "Prerequisite must be between 1 and 50 characters.",
            ));
        }
        if self.prerequisites.contains(&prerequisite) {
            return Err(Error::validation(
                "prerequisite",
                format!("Prerequisite {prerequisite} already exists."),
            ));
        }
        self.prerequisites.push(prerequisite);
        Ok(())
    }

    pub fn dir(&self, layout: &RepoLayout) -> PathBuf {
        layout.challenge_dir(self.category, &self.slug)
    }

    /// Contents of the description file, empty if it does not exist yet.
    pub fn description(&self, challenge_dir: &Path) -> Result<String> {
        let file = challenge_dir.join(&self.description_location);
        if !file.exists() {
            return Ok(String::new());
        }
        Ok(std::fs::read_to_string(file)?)
    }

    /// Canonical ordered mapping of the challenge, including `$schema`.
    /// `dockerfile_locations` and `prerequisites` are omitted entirely when
    /// empty; absence and empty-array are distinct on the wire.
    pub fn generate_dict(&self, schema_location: &str) -> IndexMap<&'static str, Value> {
        let mut data = IndexMap::new();
        data.insert("$schema", json!(schema_location));
        data.insert("enabled", json!(self.enabled));
        data.insert("name", json!(self.name));
        data.insert("slug", json!(self.slug));
        data.insert("author", json!(self.author));
        data.insert("category", json!(self.category));
        data.insert("difficulty", json!(self.difficulty));
        data.insert("tags", json!(self.tags));
        data.insert("type", json!(self.challenge_type));
        data.insert("instanced_type", json!(self.instanced_type));
        data.insert("instanced_name", json!(self.instanced_name));
        data.insert("instanced_subdomains", json!(self.instanced_subdomains));
        data.insert("connection", json!(self.connection));
        data.insert("flag", json!(self.flag));
        data.insert("points", json!(self.points));
        data.insert("decay", json!(self.decay));
        data.insert("min_points", json!(self.min_points));
        data.insert("description_location", json!(self.description_location));
        data.insert("handout_dir", json!(self.handout_dir));
        if !self.dockerfile_locations.is_empty() {
            data.insert("dockerfile_locations", json!(self.dockerfile_locations));
        }
        if !self.prerequisites.is_empty() {
            data.insert("prerequisites", json!(self.prerequisites));
        }
        data
    }

    /// YAML rendition: `$schema` becomes a leading language-server comment,
    /// the body keeps the canonical key order.
    pub fn to_yaml_string(&self, schema_location: &str) -> Result<String> {
        let mut data = self.generate_dict(schema_location);
        data.shift_remove("$schema");
        let body = serde_yaml::to_string(&data).map_err(|e| Error::Malformed {
            path: PathBuf::from("challenge.yml"),
            message: e.to_string(),
        })?;
        Ok(format!(
            "# yaml-language-server: $schema={schema_location}\n\n{body}"
        ))
    }

    pub fn to_json_string(&self, schema_location: &str) -> Result<String> {
        let data = self.generate_dict(schema_location);
        serde_json::to_string_pretty(&data).map_err(|e| Error::Malformed {
            path: PathBuf::from("challenge.json"),
            message: e.to_string(),
        })
    }

    /// Loads a definition file, dispatching on the extension. Anything
    /// other than yml/yaml/json is a validation error, distinct from the
    /// file simply not existing.
    pub fn load(path: &Path) -> Result<Challenge> {
        if !path.exists() {
            return Err(Error::NotFound {
                what: "Challenge definition file",
                path: path.to_path_buf(),
            });
        }
        let input = load_input(path)?;
        Challenge::build(input)
    }

    /// Tries the candidate definition filenames in fixed priority order.
    /// `Ok(None)` means no definition file was found.
    pub fn load_dir(dir: &Path) -> Result<Option<Challenge>> {
        if !dir.is_dir() {
            return Err(Error::NotFound {
                what: "Challenge directory",
                path: dir.to_path_buf(),
            });
        }
        for candidate in CHALLENGE_FILES {
            let path = dir.join(candidate);
            if path.is_file() {
                tracing::debug!("Loading challenge definition from {}", path.display());
                return Challenge::load(&path).map(Some);
            }
        }
        Ok(None)
    }
}

pub(crate) fn load_input<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let text = std::fs::read_to_string(path)?;
    match extension {
        "yml" | "yaml" => serde_yaml::from_str(&text).map_err(|e| Error::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        "json" => serde_json::from_str(&text).map_err(|e| Error::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_input() -> ChallengeInput {
        ChallengeInput {
            name: Some("Example Challenge".into()),
            author: Some("author".into()),
            category: Some("web".into()),
            difficulty: Some("easy".into()),
            challenge_type: Some("static".into()),
            flag: Some(FlagInput::One("ctfpilot{x}".into())),
            ..Default::default()
        }
    }

    #[test]
    fn builds_with_defaults_for_missing_keys() {
        let challenge = Challenge::build(minimal_input()).unwrap();
        assert_eq!(challenge.slug(), "example-challenge");
        assert_eq!(challenge.points(), 1000);
        assert_eq!(challenge.decay(), 75);
        assert_eq!(challenge.min_points(), 100);
        assert_eq!(challenge.instanced_type(), InstancedType::None);
        assert!(challenge.tags().is_empty());
        assert_eq!(challenge.description_location(), "description.md");
        assert_eq!(challenge.handout_dir(), "handout");
        assert!(challenge.enabled());
    }

    #[test]
    fn flag_string_becomes_case_insensitive_flag_object() {
        let challenge = Challenge::build(minimal_input()).unwrap();
        assert_eq!(
            challenge.flag(),
            &[ChallengeFlag::new("ctfpilot{x}", false).unwrap()]
        );
    }

    #[test]
    fn instanced_name_is_slugified() {
        let mut input = minimal_input();
        input.challenge_type = Some("instanced".into());
        input.instanced_type = Some("web".into());
        input.instanced_name = Some("My Shared Service".into());
        let challenge = Challenge::build(input).unwrap();
        assert_eq!(challenge.instanced_name(), Some("my-shared-service"));
    }

    #[test]
    fn rejects_values_outside_enums() {
        for (field, value) in [
            ("category", "warfare"),
            ("difficulty", "impossible"),
            ("type", "floating"),
        ] {
            let mut input = minimal_input();
            match field {
                "category" => input.category = Some(value.into()),
                "difficulty" => input.difficulty = Some(value.into()),
                _ => input.challenge_type = Some(value.into()),
            }
            let err = Challenge::build(input).unwrap_err();
            assert!(
                err.to_string().contains("must be one of the following"),
                "unexpected error for {field}: {err}"
            );
        }
    }

    #[test]
    fn instanced_type_requires_instanced_challenge() {
        let mut input = minimal_input();
        input.instanced_type = Some("web".into());
        assert!(Challenge::build(input).is_err());

        let mut input = minimal_input();
        input.challenge_type = Some("instanced".into());
        input.instanced_type = Some("web".into());
        let challenge = Challenge::build(input).unwrap();
        assert_eq!(challenge.instanced_type(), InstancedType::Web);
    }

    #[test]
    fn points_bounds_are_enforced() {
        let mut input = minimal_input();
        input.points = Some(0);
        assert!(Challenge::build(input).is_err());
        let mut input = minimal_input();
        input.points = Some(10_001);
        assert!(Challenge::build(input).is_err());
        let mut input = minimal_input();
        input.min_points = Some(1001);
        assert!(Challenge::build(input).is_err());
        let mut input = minimal_input();
        input.decay = Some(0);
        assert_eq!(Challenge::build(input).unwrap().decay(), 0);
    }

    #[test]
    fn subdomain_rules() {
        let mut input = minimal_input();
        input.challenge_type = Some("instanced".into());
        input.instanced_type = Some("web".into());
        input.instanced_subdomains = Some(vec!["web:app".into(), "db".into()]);
        assert!(Challenge::build(input.clone()).is_ok());

        input.instanced_subdomains = Some(vec!["toolongname123".into()]);
        assert!(Challenge::build(input.clone()).is_err());

        input.instanced_subdomains = Some(vec!["UPPER".into()]);
        assert!(Challenge::build(input.clone()).is_err());

        input.instanced_subdomains = Some(vec!["a".into(); 6]);
        assert!(Challenge::build(input).is_err());
    }

    #[test]
    fn duplicate_prerequisite_is_rejected() {
        let mut challenge = Challenge::build(minimal_input()).unwrap();
        challenge.add_prerequisite("Other Challenge").unwrap();
        assert_eq!(challenge.prerequisites(), &["other-challenge".to_string()]);
        assert!(challenge.add_prerequisite("other-challenge").is_err());
    }

    #[test]
    fn dict_omits_empty_build_keys() {
        let challenge = Challenge::build(minimal_input()).unwrap();
        let dict = challenge.generate_dict("-");
        assert!(!dict.contains_key("dockerfile_locations"));
        assert!(!dict.contains_key("prerequisites"));

        let mut challenge = challenge;
        challenge.add_dockerfile_location(
            DockerfileLocation::new("src/Dockerfile", "src/", None).unwrap(),
        );
        let dict = challenge.generate_dict("-");
        let locations = dict.get("dockerfile_locations").unwrap();
        assert_eq!(locations[0]["location"], "src/Dockerfile");
        assert_eq!(locations[0]["context"], "src/");
        assert_eq!(locations[0]["identifier"], Value::Null);
    }

    #[test]
    fn dict_preserves_canonical_key_order() {
        let challenge = Challenge::build(minimal_input()).unwrap();
        let keys: Vec<&str> = challenge.generate_dict("-").keys().copied().collect();
        assert_eq!(
            &keys[..6],
            &["$schema", "enabled", "name", "slug", "author", "category"]
        );
    }

    #[test]
    fn yaml_moves_schema_into_leading_comment() {
        let challenge = Challenge::build(minimal_input()).unwrap();
        let yaml = challenge.to_yaml_string("https://example.com/schema.json").unwrap();
        assert!(yaml.starts_with(
            "# yaml-language-server: $schema=https://example.com/schema.json\n\n"
        ));
        assert!(!yaml.contains("$schema:"));
        assert!(yaml.contains("name: Example Challenge"));
    }

    #[test]
    fn yaml_round_trip_preserves_fields_and_fills_defaults() {
        let mut input = minimal_input();
        input.dockerfile_locations = Some(vec![DockerfileLocationInput {
            location: Some("src/Dockerfile".into()),
            context: Some("src/".into()),
            identifier: Some("api".into()),
        }]);
        input.prerequisites = Some(vec!["intro".into()]);
        let original = Challenge::build(input).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("challenge.yml");
        std::fs::write(&path, original.to_yaml_string("-").unwrap()).unwrap();

        let loaded = Challenge::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn omitted_optional_keys_take_defaults_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("challenge.yml");
        std::fs::write(
            &path,
            "name: Example\nauthor: someone\ncategory: misc\ndifficulty: hard\n\
             type: static\nflag: ctf{a}\n",
        )
        .unwrap();
        let challenge = Challenge::load(&path).unwrap();
        assert_eq!(challenge.decay(), 75);
        assert_eq!(challenge.handout_dir(), "handout");
        assert_eq!(challenge.slug(), "example");
    }

    #[test]
    fn load_dir_prefers_yml_over_json() {
        let dir = tempfile::tempdir().unwrap();
        let yml = Challenge::build(minimal_input()).unwrap();
        std::fs::write(dir.path().join("challenge.yml"), yml.to_yaml_string("-").unwrap())
            .unwrap();
        std::fs::write(dir.path().join("challenge.json"), "{not json").unwrap();
        // The malformed json is never read because yml wins.
        let loaded = Challenge::load_dir(dir.path()).unwrap().unwrap();
        assert_eq!(loaded.slug(), "example-challenge");
    }

    #[test]
    fn load_dir_without_definition_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Challenge::load_dir(dir.path()).unwrap().is_none());
    }

    #[test]
    fn unsupported_extension_is_distinct_from_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("challenge.toml");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            Challenge::load(&path),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            Challenge::load(&dir.path().join("challenge.yml")),
            Err(Error::NotFound { .. })
        ));
    }
}
