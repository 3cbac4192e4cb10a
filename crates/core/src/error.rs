// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A field value was outside its allowed set, pattern or length. Raised
    /// at the point of assignment, never deferred.
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("{what} does not exist: {path}")]
    NotFound { what: &'static str, path: PathBuf },
    #[error("Definition file must be either a yml or json file: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("Failed to parse {path}: {message}")]
    Malformed { path: PathBuf, message: String },
    #[error("Template source file does not exist: {0}")]
    MissingTemplate(PathBuf),
    #[error("Command failed with exit code {code}: {command}")]
    CommandFailed { command: String, code: i32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Failed to write archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
