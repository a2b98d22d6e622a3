// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent upsert tests: the owner-uniqueness invariant must hold when
//! two racing upserts both observe "no profile yet".
//!
//! Requires the Firestore emulator (FIRESTORE_EMULATOR_HOST set).

use devconnect::models::ProfileUpdate;

mod common;

fn unique_user_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let since_the_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    format!("race-{}", since_the_epoch.as_nanos())
}

#[tokio::test]
async fn test_concurrent_upserts_produce_one_profile() {
    require_emulator!();
    let db = common::test_db().await;
    let user_id = unique_user_id();

    let update_a = ProfileUpdate {
        status: "Writer A".to_string(),
        skills: vec!["rust".to_string()],
        bio: Some("from A".to_string()),
        ..Default::default()
    };
    let update_b = ProfileUpdate {
        status: "Writer B".to_string(),
        skills: vec!["go".to_string()],
        location: Some("from B".to_string()),
        ..Default::default()
    };

    let db_a = db.clone();
    let db_b = db.clone();
    let id_a = user_id.clone();
    let id_b = user_id.clone();

    let (res_a, res_b) = tokio::join!(
        tokio::spawn(async move { db_a.upsert_profile(&id_a, &update_a).await }),
        tokio::spawn(async move { db_b.upsert_profile(&id_b, &update_b).await }),
    );

    // At least one writer must succeed; a loser surfacing Conflict after
    // its retry is acceptable, duplicate documents are not.
    let ok_count = [res_a.unwrap(), res_b.unwrap()]
        .into_iter()
        .filter(|r| r.is_ok())
        .count();
    assert!(ok_count >= 1);

    // Exactly one profile exists for the owner, holding one writer's status
    let profiles = db.list_profiles().await.unwrap();
    let matching: Vec<_> = profiles.iter().filter(|p| p.user_id == user_id).collect();
    assert_eq!(matching.len(), 1);
    assert!(matching[0].status == "Writer A" || matching[0].status == "Writer B");
}
