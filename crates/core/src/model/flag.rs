// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::config::FLAG_FORMAT;
use crate::error::{Error, Result};
use crate::slug::validate_length;

/// One accepted flag. The flag text is trimmed and stripped of newlines on
/// construction and must match the flag format, so a stored flag is always
/// submittable as-is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChallengeFlag {
    pub flag: String,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl ChallengeFlag {
    pub fn new(flag: &str, case_sensitive: bool) -> Result<Self> {
        if !validate_length(Some(flag), 1, 1000) {
            return Err(Error::validation(
                "flag",
                "Flag must be between 1 and 1000 characters.",
            ));
        }
        let flag = flag.trim().replace(['\n', '\r'], "");
        if !FLAG_FORMAT.is_match(&flag) {
            return Err(Error::validation(
                "flag",
                format!(
                    "The flag {flag:?} must be in the format: {}",
                    FLAG_FORMAT.as_str()
                ),
            ));
        }
        Ok(ChallengeFlag {
            flag,
            case_sensitive,
        })
    }
}

/// Accepted spellings of the `flag` key in a definition file: a bare
/// string, a list of strings, or a list of `{flag, case_sensitive}`
/// mappings (spellings may be mixed within one list).
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum FlagInput {
    One(String),
    Many(Vec<FlagEntry>),
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum FlagEntry {
    Text(String),
    Full {
        flag: String,
        #[serde(default)]
        case_sensitive: bool,
    },
}

impl FlagInput {
    /// Normalizes the input into an ordered flag list. Any invalid element
    /// fails the whole call before anything is stored.
    pub fn into_flags(self) -> Result<Vec<ChallengeFlag>> {
        let flags = match self {
            FlagInput::One(text) => vec![ChallengeFlag::new(&text, false)?],
            FlagInput::Many(entries) => {
                let mut flags = Vec::with_capacity(entries.len());
                for entry in entries {
                    flags.push(match entry {
                        FlagEntry::Text(text) => ChallengeFlag::new(&text, false)?,
                        FlagEntry::Full {
                            flag,
                            case_sensitive,
                        } => ChallengeFlag::new(&flag, case_sensitive)?,
                    });
                }
                flags
            }
        };
        if flags.is_empty() {
            return Err(Error::validation("flag", "No valid flags provided in list."));
        }
        Ok(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_text_is_trimmed_and_validated() {
        let flag = ChallengeFlag::new(" ctfpilot{x}\n", false).unwrap();
        assert_eq!(flag.flag, "ctfpilot{x}");
        assert!(!flag.case_sensitive);

        assert!(ChallengeFlag::new("no braces here", false).is_err());
        assert!(ChallengeFlag::new("", false).is_err());
    }

    #[test]
    fn sentinel_flags_are_accepted() {
        assert!(ChallengeFlag::new("dynamic", false).is_ok());
        assert!(ChallengeFlag::new("null", true).is_ok());
    }

    #[test]
    fn single_string_becomes_one_case_insensitive_flag() {
        let flags = FlagInput::One("ctfpilot{x}".into()).into_flags().unwrap();
        assert_eq!(flags, vec![ChallengeFlag::new("ctfpilot{x}", false).unwrap()]);
    }

    #[test]
    fn list_input_preserves_order() {
        let flags = FlagInput::Many(vec![
            FlagEntry::Text("ctf{a}".into()),
            FlagEntry::Full {
                flag: "ctf{b}".into(),
                case_sensitive: true,
            },
        ])
        .into_flags()
        .unwrap();
        assert_eq!(flags.len(), 2);
        assert_eq!(flags[0].flag, "ctf{a}");
        assert!(flags[1].case_sensitive);
    }

    #[test]
    fn one_bad_element_fails_the_whole_list() {
        let result = FlagInput::Many(vec![
            FlagEntry::Text("ctf{ok}".into()),
            FlagEntry::Text("not a flag".into()),
        ])
        .into_flags();
        assert!(result.is_err());
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(FlagInput::Many(Vec::new()).into_flags().is_err());
    }
}
