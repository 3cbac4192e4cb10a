// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const CHALLENGE_SCHEMA: &str =
    "https://raw.githubusercontent.com/ctfpilot/challenge-schema/refs/heads/main/schema.json";
pub const PAGE_SCHEMA: &str =
    "https://raw.githubusercontent.com/ctfpilot/page-schema/refs/heads/main/schema.json";

pub static TAG_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-_:;? ]+$").unwrap());
pub static FLAG_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w{2,10}\{[^}]*\}|dynamic|null)$").unwrap());
pub static SUBDOMAIN_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((web|tcp):)?[a-z0-9-]+$").unwrap());
/// Character class every path-like field is restricted to before it gets
/// joined into a filesystem path.
pub static PATH_SAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-_/\.]+$").unwrap());
pub static DESCRIPTION_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-_/]+.md$").unwrap());
pub static HANDOUT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-_/]+$").unwrap());
pub static PAGE_CONTENT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-_.]+\.(md|html|txt)$").unwrap());

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Lists every permitted value, for validation error messages.
            pub fn permitted() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    Category {
        Web => "web",
        Forensics => "forensics",
        Rev => "rev",
        Crypto => "crypto",
        Pwn => "pwn",
        Boot2root => "boot2root",
        Osint => "osint",
        Misc => "misc",
        Blockchain => "blockchain",
        Mobile => "mobile",
        Test => "test",
    }
}

string_enum! {
    /// Ordered from beginner to insane.
    Difficulty {
        Beginner => "beginner",
        Easy => "easy",
        EasyMedium => "easy-medium",
        Medium => "medium",
        MediumHard => "medium-hard",
        Hard => "hard",
        VeryHard => "very-hard",
        Insane => "insane",
    }
}

string_enum! {
    ChallengeType {
        Static => "static",
        Shared => "shared",
        Instanced => "instanced",
    }
}

string_enum! {
    /// How users interact with the challenge. "none" unless the challenge
    /// type is instanced.
    InstancedType {
        None => "none",
        Web => "web",
        Tcp => "tcp",
    }
}

string_enum! {
    PageFormat {
        Markdown => "markdown",
        Html => "html",
    }
}

impl Category {
    /// Categories match exactly as written in the definition file.
    pub fn parse(text: &str) -> Option<Category> {
        Self::ALL.iter().copied().find(|c| c.as_str() == text)
    }
}

impl Difficulty {
    pub fn parse(text: &str) -> Option<Difficulty> {
        let text = text.to_lowercase();
        Self::ALL.iter().copied().find(|d| d.as_str() == text)
    }
}

impl ChallengeType {
    pub fn parse(text: &str) -> Option<ChallengeType> {
        let text = text.to_lowercase();
        Self::ALL.iter().copied().find(|t| t.as_str() == text)
    }
}

impl InstancedType {
    pub fn parse(text: &str) -> Option<InstancedType> {
        let text = text.to_lowercase();
        Self::ALL.iter().copied().find(|t| t.as_str() == text)
    }
}

impl PageFormat {
    pub fn parse(text: &str) -> Option<PageFormat> {
        Self::ALL.iter().copied().find(|f| f.as_str() == text)
    }
}

/// Default values applied both when building a challenge from partial input
/// and when a persisted definition file omits a key.
pub struct ChallengeDefaults {
    pub enabled: bool,
    pub instanced_type: InstancedType,
    pub flag: &'static str,
    pub points: u32,
    pub decay: u32,
    pub min_points: u32,
    pub description_location: &'static str,
    pub handout_dir: &'static str,
}

impl Default for ChallengeDefaults {
    fn default() -> Self {
        ChallengeDefaults {
            enabled: true,
            instanced_type: InstancedType::None,
            flag: "null",
            points: 1000,
            decay: 75,
            min_points: 100,
            description_location: "description.md",
            handout_dir: "handout",
        }
    }
}

pub struct PageDefaults {
    pub enabled: bool,
    pub content: &'static str,
    pub format: PageFormat,
    pub auth: bool,
    pub draft: bool,
}

impl Default for PageDefaults {
    fn default() -> Self {
        PageDefaults {
            enabled: true,
            content: "page.md",
            format: PageFormat::Markdown,
            auth: false,
            draft: false,
        }
    }
}
