// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use slugify::slugify;

/// Normalizes free text into a URL/path-safe identifier: lowercased,
/// transliterated, non-alphanumerics collapsed into `-`, with leading and
/// trailing `-`, `_` and `.` trimmed off. Returns `None` for absent input so
/// optional fields stay optional.
pub fn slug(text: Option<&str>) -> Option<String> {
    let text = text?;
    let slug = slugify!(text.trim());
    Some(
        slug.trim_matches(|c| c == '-' || c == '_' || c == '.')
            .to_string(),
    )
}

/// Inclusive length bound check over characters, not bytes. Absent input
/// fails, callers turn the failure into a validation error naming the field.
pub fn validate_length(text: Option<&str>, min: usize, max: usize) -> bool {
    match text {
        None => false,
        Some(text) => {
            let chars = text.chars().count();
            chars >= min && chars <= max
        }
    }
}
