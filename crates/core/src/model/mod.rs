// SPDX-FileCopyrightText: 2026 ctfpilot contributors
//
// SPDX-License-Identifier: AGPL-3.0-or-later

mod challenge;
mod dockerfile;
mod flag;
mod page;

pub use challenge::{CHALLENGE_FILES, Challenge, ChallengeInput};
pub use dockerfile::{DockerfileLocation, DockerfileLocationInput};
pub use flag::{ChallengeFlag, FlagEntry, FlagInput};
pub use page::{PAGE_FILES, Page, PageInput};
