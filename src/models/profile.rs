// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile aggregate: the profile document plus its embedded experience
//! and education lists, treated as one consistency unit.
//!
//! All mutation helpers operate on the in-memory aggregate; persistence
//! (including transactional read-modify-write) lives in `db::firestore`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Social network links, all optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

/// A work experience entry. Newest entries sit at the front of the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    /// Generated identifier, unique within the parent list
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    /// Start date (RFC 3339)
    pub from: String,
    /// End date; None while `current`
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

/// An education entry, same identifier contract as [`Experience`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: Option<String>,
    pub from: String,
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

/// Profile document stored in Firestore, keyed by the owner's user ID.
///
/// Keying by owner enforces the at-most-one-profile-per-owner invariant
/// at the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Owner user ID (also used as document ID), immutable once set
    pub user_id: String,
    pub status: String,
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    #[serde(default)]
    pub social: SocialLinks,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    pub created_at: String,
    pub updated_at: String,
}

/// Sparse field set for create-or-update.
///
/// `status` and `skills` are mandatory on every upsert; the rest only
/// overwrite stored values when supplied.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub status: String,
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub social: SocialLinks,
}

/// Split a comma-delimited skills string into trimmed entries.
///
/// Empty segments from stray commas are dropped.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Profile {
    /// Create a fresh profile for `user_id` from an update's field set.
    pub fn new(user_id: &str, update: &ProfileUpdate, now: &str) -> Self {
        let mut profile = Self {
            user_id: user_id.to_string(),
            status: String::new(),
            skills: Vec::new(),
            company: None,
            website: None,
            location: None,
            bio: None,
            githubusername: None,
            social: SocialLinks::default(),
            experience: Vec::new(),
            education: Vec::new(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        };
        profile.apply_update(update, now);
        profile
    }

    /// Apply a sparse update in place.
    ///
    /// Supplied fields overwrite; omitted fields are left untouched, so
    /// re-applying the same update is idempotent.
    pub fn apply_update(&mut self, update: &ProfileUpdate, now: &str) {
        self.status = update.status.clone();
        self.skills = update.skills.clone();

        if update.company.is_some() {
            self.company = update.company.clone();
        }
        if update.website.is_some() {
            self.website = update.website.clone();
        }
        if update.location.is_some() {
            self.location = update.location.clone();
        }
        if update.bio.is_some() {
            self.bio = update.bio.clone();
        }
        if update.githubusername.is_some() {
            self.githubusername = update.githubusername.clone();
        }

        if update.social.youtube.is_some() {
            self.social.youtube = update.social.youtube.clone();
        }
        if update.social.twitter.is_some() {
            self.social.twitter = update.social.twitter.clone();
        }
        if update.social.instagram.is_some() {
            self.social.instagram = update.social.instagram.clone();
        }
        if update.social.linkedin.is_some() {
            self.social.linkedin = update.social.linkedin.clone();
        }
        if update.social.facebook.is_some() {
            self.social.facebook = update.social.facebook.clone();
        }

        self.updated_at = now.to_string();
    }

    /// Prepend an experience entry (newest-first ordering).
    pub fn add_experience(&mut self, entry: Experience, now: &str) {
        self.experience.insert(0, entry);
        self.updated_at = now.to_string();
    }

    /// Remove the experience entry with the given ID.
    ///
    /// Returns false when no entry matches; the list is not touched.
    pub fn remove_experience(&mut self, entry_id: &str, now: &str) -> bool {
        match self.experience.iter().position(|e| e.id == entry_id) {
            Some(index) => {
                self.experience.remove(index);
                self.updated_at = now.to_string();
                true
            }
            None => false,
        }
    }

    /// Prepend an education entry (newest-first ordering).
    pub fn add_education(&mut self, entry: Education, now: &str) {
        self.education.insert(0, entry);
        self.updated_at = now.to_string();
    }

    /// Remove the education entry with the given ID.
    pub fn remove_education(&mut self, entry_id: &str, now: &str) -> bool {
        match self.education.iter().position(|e| e.id == entry_id) {
            Some(index) => {
                self.education.remove(index);
                self.updated_at = now.to_string();
                true
            }
            None => false,
        }
    }
}

impl Experience {
    /// Build an entry with a fresh unique identifier.
    pub fn new(
        title: String,
        company: String,
        location: Option<String>,
        from: String,
        to: Option<String>,
        current: bool,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            company,
            location,
            from,
            to,
            current,
            description,
        }
    }
}

impl Education {
    /// Build an entry with a fresh unique identifier.
    pub fn new(
        school: String,
        degree: String,
        fieldofstudy: Option<String>,
        from: String,
        to: Option<String>,
        current: bool,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            school,
            degree,
            fieldofstudy,
            from,
            to,
            current,
            description,
        }
    }
}
