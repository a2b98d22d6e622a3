// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Integration tests for the profile store.
//!
//! These tests require the Firestore emulator to be running
//! (FIRESTORE_EMULATOR_HOST set).

use devconnect::error::AppError;
use devconnect::models::profile::parse_skills;
use devconnect::models::{Experience, ProfileUpdate, User};

mod common;

/// Generate a unique user ID for test isolation.
fn unique_user_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let since_the_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    format!("user-{}", since_the_epoch.as_nanos())
}

fn base_update() -> ProfileUpdate {
    ProfileUpdate {
        status: "Developer".to_string(),
        skills: parse_skills("html, css,node "),
        bio: Some("First bio".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_upsert_creates_then_updates_in_place() {
    require_emulator!();
    let db = common::test_db().await;
    let user_id = unique_user_id();

    // Create
    let created = db.upsert_profile(&user_id, &base_update()).await.unwrap();
    assert_eq!(created.user_id, user_id);
    assert_eq!(created.skills, vec!["html", "css", "node"]);
    assert_eq!(created.bio.as_deref(), Some("First bio"));

    // Sparse update: new status, bio omitted
    let update = ProfileUpdate {
        status: "Senior Developer".to_string(),
        skills: vec!["rust".to_string()],
        ..Default::default()
    };
    let updated = db.upsert_profile(&user_id, &update).await.unwrap();

    assert_eq!(updated.status, "Senior Developer");
    assert_eq!(updated.skills, vec!["rust"]);
    // Omitted field preserved from the first write
    assert_eq!(updated.bio.as_deref(), Some("First bio"));
    assert_eq!(updated.created_at, created.created_at);

    // Still exactly one stored document for this owner
    let stored = db.get_profile(&user_id).await.unwrap().unwrap();
    assert_eq!(stored.status, "Senior Developer");
}

#[tokio::test]
async fn test_upsert_is_idempotent() {
    require_emulator!();
    let db = common::test_db().await;
    let user_id = unique_user_id();
    let update = base_update();

    let first = db.upsert_profile(&user_id, &update).await.unwrap();
    let second = db.upsert_profile(&user_id, &update).await.unwrap();

    // Identical field set both times (timestamps aside)
    assert_eq!(first.status, second.status);
    assert_eq!(first.skills, second.skills);
    assert_eq!(first.bio, second.bio);
    assert_eq!(first.created_at, second.created_at);
    assert_eq!(first.experience.len(), second.experience.len());
}

#[tokio::test]
async fn test_add_and_remove_experience() {
    require_emulator!();
    let db = common::test_db().await;
    let user_id = unique_user_id();

    db.upsert_profile(&user_id, &base_update()).await.unwrap();

    // Add two entries; the second must end up first
    let first = db
        .mutate_profile(&user_id, |profile, now| {
            profile.add_experience(
                Experience::new(
                    "Engineer".to_string(),
                    "Acme".to_string(),
                    None,
                    "2020-01-01T00:00:00Z".to_string(),
                    None,
                    true,
                    None,
                ),
                now,
            );
            Ok(())
        })
        .await
        .unwrap();
    assert_eq!(first.experience.len(), 1);

    let second = db
        .mutate_profile(&user_id, |profile, now| {
            profile.add_experience(
                Experience::new(
                    "Staff Engineer".to_string(),
                    "Acme".to_string(),
                    None,
                    "2022-01-01T00:00:00Z".to_string(),
                    None,
                    true,
                    None,
                ),
                now,
            );
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(second.experience.len(), 2);
    assert_eq!(second.experience[0].title, "Staff Engineer");
    assert_eq!(second.experience[1].title, "Engineer");

    // Remove the older entry by ID
    let target = second.experience[1].id.clone();
    let after_remove = db
        .mutate_profile(&user_id, |profile, now| {
            if profile.remove_experience(&target, now) {
                Ok(())
            } else {
                Err(AppError::NotFound("Experience entry not found".to_string()))
            }
        })
        .await
        .unwrap();

    assert_eq!(after_remove.experience.len(), 1);
    assert_eq!(after_remove.experience[0].title, "Staff Engineer");

    // Removing it again fails with NotFound and leaves the list alone
    let err = db
        .mutate_profile(&user_id, |profile, now| {
            if profile.remove_experience(&target, now) {
                Ok(())
            } else {
                Err(AppError::NotFound("Experience entry not found".to_string()))
            }
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let stored = db.get_profile(&user_id).await.unwrap().unwrap();
    assert_eq!(stored.experience.len(), 1);
}

#[tokio::test]
async fn test_mutate_profile_without_profile_is_not_found() {
    require_emulator!();
    let db = common::test_db().await;
    let user_id = unique_user_id();

    let err = db
        .mutate_profile(&user_id, |_, _| Ok(()))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_owner_data_cascades() {
    require_emulator!();
    let db = common::test_db().await;
    let user_id = unique_user_id();

    let user = User {
        id: user_id.clone(),
        name: "Delete Me".to_string(),
        avatar: Some("https://example.com/a.png".to_string()),
        email: Some("delete@example.com".to_string()),
        created_at: "2024-01-01T00:00:00Z".to_string(),
    };
    db.upsert_user(&user).await.unwrap();
    db.upsert_profile(&user_id, &base_update()).await.unwrap();

    assert!(db.get_user(&user_id).await.unwrap().is_some());
    assert!(db.get_profile(&user_id).await.unwrap().is_some());

    db.delete_owner_data(&user_id).await.unwrap();

    assert!(db.get_user(&user_id).await.unwrap().is_none());
    assert!(db.get_profile(&user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_owner_data_without_profile_succeeds() {
    require_emulator!();
    let db = common::test_db().await;
    let user_id = unique_user_id();

    // Best-effort cleanup: nothing stored for this owner at all
    db.delete_owner_data(&user_id).await.unwrap();
}

#[tokio::test]
async fn test_list_profiles_includes_new_profile() {
    require_emulator!();
    let db = common::test_db().await;
    let user_id = unique_user_id();

    db.upsert_profile(&user_id, &base_update()).await.unwrap();

    let profiles = db.list_profiles().await.unwrap();
    assert!(profiles.iter().any(|p| p.user_id == user_id));
}
