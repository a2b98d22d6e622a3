// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile aggregate routes: upsert, reads, cascade delete, and the
//! experience/education sub-list operations, plus the GitHub repo proxy.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::middleware::auth::{require_auth, AuthUser};
use crate::models::{profile::parse_skills, Education, Experience, Profile, ProfileUpdate, SocialLinks};
use crate::services::github::RepoSummary;
use crate::AppState;
use axum::{
    extract::{Path, State},
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Concurrency bound for owner joins on the public listing.
const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Routes that are readable without a token.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(list_profiles))
        .route("/profile/user/{user_id}", get(get_profile_by_user))
        .route("/profile/github/{username}", get(github_repos))
}

/// Routes that require a valid session token.
///
/// The auth layer is applied per method router rather than per path, so
/// that POST /profile can be protected while GET /profile stays public.
pub fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let auth = middleware::from_fn_with_state(state, require_auth);

    Router::new()
        .route(
            "/profile/me",
            get(get_my_profile).route_layer(auth.clone()),
        )
        .route(
            "/profile",
            post(upsert_profile)
                .delete(delete_own_profile)
                .route_layer(auth.clone()),
        )
        .route(
            "/profile/experience",
            put(add_experience).route_layer(auth.clone()),
        )
        .route(
            "/profile/experience/{exp_id}",
            delete(remove_experience).route_layer(auth.clone()),
        )
        .route(
            "/profile/education",
            put(add_education).route_layer(auth.clone()),
        )
        .route(
            "/profile/education/{edu_id}",
            delete(remove_education).route_layer(auth),
        )
}

// ─── Response Shapes ─────────────────────────────────────────

/// Public slice of the owning user embedded in profile responses.
#[derive(Debug, Serialize)]
pub struct OwnerInfo {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// Profile joined with its owner's public fields.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: OwnerInfo,
    #[serde(flatten)]
    pub profile: Profile,
}

/// Join a profile with the owning user's name and avatar.
///
/// Only the public slice of the user record is exposed; an orphaned
/// profile (owner record missing) degrades to an empty name.
async fn with_owner(db: &FirestoreDb, profile: Profile) -> Result<ProfileResponse> {
    let owner = db.get_user(&profile.user_id).await?;

    let user = match owner {
        Some(user) => OwnerInfo {
            id: user.id,
            name: user.name,
            avatar: user.avatar,
        },
        None => OwnerInfo {
            id: profile.user_id.clone(),
            name: String::new(),
            avatar: None,
        },
    };

    Ok(ProfileResponse { user, profile })
}

// ─── Profile CRUD ────────────────────────────────────────────

/// Get the caller's own profile.
async fn get_my_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state.db.get_profile(&user.user_id).await?.ok_or_else(|| {
        AppError::NotFound("There is no profile for this user".to_string())
    })?;

    Ok(Json(with_owner(&state.db, profile).await?))
}

/// Create-or-update request body. The social links arrive flat, the way
/// the profile form submits them.
#[derive(Debug, Deserialize, Validate)]
pub struct ProfileBody {
    #[serde(default)]
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    /// Comma-delimited skills list
    #[serde(default)]
    #[validate(length(min = 1, message = "Skills is required"))]
    pub skills: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub facebook: Option<String>,
}

impl From<ProfileBody> for ProfileUpdate {
    fn from(body: ProfileBody) -> Self {
        ProfileUpdate {
            status: body.status,
            skills: parse_skills(&body.skills),
            company: body.company,
            website: body.website,
            location: body.location,
            bio: body.bio,
            githubusername: body.githubusername,
            social: SocialLinks {
                youtube: body.youtube,
                twitter: body.twitter,
                instagram: body.instagram,
                linkedin: body.linkedin,
                facebook: body.facebook,
            },
        }
    }
}

/// Create or update the caller's profile (sparse upsert).
async fn upsert_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<ProfileBody>,
) -> Result<Json<ProfileResponse>> {
    body.validate().map_err(AppError::from_validation)?;

    let update = ProfileUpdate::from(body);
    let profile = state.db.upsert_profile(&user.user_id, &update).await?;

    Ok(Json(with_owner(&state.db, profile).await?))
}

/// List all profiles (public).
async fn list_profiles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProfileResponse>>> {
    let profiles = state.db.list_profiles().await?;

    // Join each profile with its owner, bounded concurrency, order kept
    let responses: Vec<Result<ProfileResponse>> = stream::iter(profiles)
        .map(|profile| {
            let db = state.db.clone();
            async move { with_owner(&db, profile).await }
        })
        .buffered(MAX_CONCURRENT_DB_OPS)
        .collect()
        .await;

    let responses = responses.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(Json(responses))
}

/// Get a profile by owner user ID (public).
async fn get_profile_by_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>> {
    // A malformed identifier can never match a document; report it the
    // same way as a missing profile rather than as a server fault.
    if !is_valid_user_id(&user_id) {
        return Err(AppError::NotFound("Profile not found".to_string()));
    }

    let profile = state
        .db
        .get_profile(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(with_owner(&state.db, profile).await?))
}

/// Response for account deletion.
#[derive(Serialize)]
pub struct DeleteResponse {
    pub msg: String,
}

/// Delete the caller's profile and cascade to the owning user record.
async fn delete_own_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteResponse>> {
    tracing::info!(user_id = %user.user_id, "User-initiated account deletion");

    // Best-effort cleanup: succeeds even when no profile exists
    state.db.delete_owner_data(&user.user_id).await?;

    Ok(Json(DeleteResponse {
        msg: "User deleted".to_string(),
    }))
}

// ─── Experience ──────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct ExperienceBody {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    pub location: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "From date is required"))]
    pub from: String,
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

/// Add an experience entry to the front of the caller's list.
async fn add_experience(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<ExperienceBody>,
) -> Result<Json<ProfileResponse>> {
    body.validate().map_err(AppError::from_validation)?;

    let profile = state
        .db
        .mutate_profile(&user.user_id, |profile, now| {
            profile.add_experience(
                Experience::new(
                    body.title.clone(),
                    body.company.clone(),
                    body.location.clone(),
                    body.from.clone(),
                    body.to.clone(),
                    body.current,
                    body.description.clone(),
                ),
                now,
            );
            Ok(())
        })
        .await?;

    tracing::info!(user_id = %user.user_id, "Experience entry added");
    Ok(Json(with_owner(&state.db, profile).await?))
}

/// Remove an experience entry by ID.
async fn remove_experience(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(exp_id): Path<String>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .mutate_profile(&user.user_id, |profile, now| {
            if profile.remove_experience(&exp_id, now) {
                Ok(())
            } else {
                Err(AppError::NotFound("Experience entry not found".to_string()))
            }
        })
        .await?;

    tracing::info!(user_id = %user.user_id, exp_id = %exp_id, "Experience entry removed");
    Ok(Json(with_owner(&state.db, profile).await?))
}

// ─── Education ───────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct EducationBody {
    #[serde(default)]
    #[validate(length(min = 1, message = "School is required"))]
    pub school: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Degree is required"))]
    pub degree: String,
    pub fieldofstudy: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "From date is required"))]
    pub from: String,
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

/// Add an education entry to the front of the caller's list.
async fn add_education(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<EducationBody>,
) -> Result<Json<ProfileResponse>> {
    body.validate().map_err(AppError::from_validation)?;

    let profile = state
        .db
        .mutate_profile(&user.user_id, |profile, now| {
            profile.add_education(
                Education::new(
                    body.school.clone(),
                    body.degree.clone(),
                    body.fieldofstudy.clone(),
                    body.from.clone(),
                    body.to.clone(),
                    body.current,
                    body.description.clone(),
                ),
                now,
            );
            Ok(())
        })
        .await?;

    tracing::info!(user_id = %user.user_id, "Education entry added");
    Ok(Json(with_owner(&state.db, profile).await?))
}

/// Remove an education entry by ID.
async fn remove_education(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(edu_id): Path<String>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .mutate_profile(&user.user_id, |profile, now| {
            if profile.remove_education(&edu_id, now) {
                Ok(())
            } else {
                Err(AppError::NotFound("Education entry not found".to_string()))
            }
        })
        .await?;

    tracing::info!(user_id = %user.user_id, edu_id = %edu_id, "Education entry removed");
    Ok(Json(with_owner(&state.db, profile).await?))
}

// ─── GitHub Proxy ────────────────────────────────────────────

/// List a user's most recent GitHub repos (public pass-through).
async fn github_repos(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<RepoSummary>>> {
    let repos = state.github.list_repos(&username).await?;
    Ok(Json(repos))
}

// ─── Helpers ─────────────────────────────────────────────────

/// Owner identifiers are opaque but bounded: alphanumeric plus `-`/`_`,
/// at most 128 chars. Anything else cannot name a document.
fn is_valid_user_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
