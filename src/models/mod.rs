// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod profile;
pub mod user;

pub use profile::{Education, Experience, Profile, ProfileUpdate, SocialLinks};
pub use user::User;
