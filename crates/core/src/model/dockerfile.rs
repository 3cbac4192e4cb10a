// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::config::PATH_SAFE;
use crate::error::{Error, Result};
use crate::slug::{slug, validate_length};

/// One image build within a challenge: where the Dockerfile lives, the
/// build context, and an optional identifier distinguishing multiple images
/// of the same challenge in the image tag.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DockerfileLocation {
    pub location: String,
    pub context: String,
    pub identifier: Option<String>,
}

impl DockerfileLocation {
    pub fn new(location: &str, context: &str, identifier: Option<&str>) -> Result<Self> {
        if !PATH_SAFE.is_match(location) {
            return Err(Error::validation(
                "dockerfile location",
                "Dockerfile location must be a valid file path to a Dockerfile.",
            ));
        }
        if !PATH_SAFE.is_match(context) {
            return Err(Error::validation(
                "dockerfile context",
                "Dockerfile context must be a valid file path.",
            ));
        }
        let identifier = slug(identifier).filter(|s| !s.is_empty());
        if let Some(identifier) = &identifier
            && !validate_length(Some(identifier), 1, 50)
        {
            return Err(Error::validation(
                "identifier",
                "Identifier must be between 1 and 50 characters.",
            ));
        }
        Ok(DockerfileLocation {
            location: location.to_string(),
            context: context.to_string(),
            identifier,
        })
    }
}

/// Raw `dockerfile_locations` entry from a definition file; missing keys
/// fall back to the conventional src layout.
#[derive(Deserialize, Debug, Clone)]
pub struct DockerfileLocationInput {
    pub location: Option<String>,
    pub context: Option<String>,
    pub identifier: Option<String>,
}

impl DockerfileLocationInput {
    pub fn validate(self) -> Result<DockerfileLocation> {
        DockerfileLocation::new(
            self.location.as_deref().unwrap_or("src/Dockerfile"),
            self.context.as_deref().unwrap_or("src/"),
            self.identifier.as_deref(),
        )
    }
}
