// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (account records, referenced by profiles)
//! - Profiles (the profile aggregate, keyed by owner user ID)
//!
//! Keying profile documents by owner ID makes the one-profile-per-owner
//! invariant a property of the storage layout: two racing creates land on
//! the same document instead of producing duplicates.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Profile, ProfileUpdate, User};

/// Transactional mutations retry once on commit conflict before failing.
const TXN_ATTEMPTS: usize = 2;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a profile by owner user ID.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all profiles, newest first.
    pub async fn list_profiles(&self) -> Result<Vec<Profile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PROFILES)
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Atomically create or update the profile for `user_id`.
    ///
    /// Reads the current aggregate inside a transaction, merges the sparse
    /// field set (or builds a fresh profile when none exists), and writes
    /// the result back. A concurrent writer causes the commit to fail; the
    /// transaction is re-run once with fresh data, so the losing racer
    /// re-applies as an update instead of clobbering the winner.
    pub async fn upsert_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<Profile, AppError> {
        let mut last_err = None;

        for attempt in 0..TXN_ATTEMPTS {
            let now = chrono::Utc::now().to_rfc3339();

            let mut transaction = self
                .get_client()?
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            let current: Option<Profile> = self
                .get_client()?
                .fluent()
                .select()
                .by_id_in(collections::PROFILES)
                .obj()
                .one(user_id)
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to read profile in transaction: {}", e))
                })?;

            let profile = match current {
                Some(mut existing) => {
                    existing.apply_update(update, &now);
                    existing
                }
                None => Profile::new(user_id, update, &now),
            };

            self.get_client()?
                .fluent()
                .update()
                .in_col(collections::PROFILES)
                .document_id(user_id)
                .object(&profile)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add profile to transaction: {}", e))
                })?;

            match transaction.commit().await {
                Ok(_) => {
                    tracing::info!(user_id, attempt, "Profile upserted");
                    return Ok(profile);
                }
                Err(e) => {
                    tracing::warn!(user_id, attempt, error = %e, "Profile upsert commit failed");
                    last_err = Some(e);
                }
            }
        }

        Err(AppError::Conflict(format!(
            "Concurrent profile update for {}: {}",
            user_id,
            last_err.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    /// Atomically mutate an existing profile.
    ///
    /// Runs `mutate` against the stored aggregate inside a transaction and
    /// writes the result back. Fails with `NotFound` when the owner has no
    /// profile; the closure may fail the operation itself (e.g. unknown
    /// sub-document ID), which rolls the transaction back.
    pub async fn mutate_profile<F>(&self, user_id: &str, mutate: F) -> Result<Profile, AppError>
    where
        F: Fn(&mut Profile, &str) -> Result<(), AppError>,
    {
        let mut last_err = None;

        for attempt in 0..TXN_ATTEMPTS {
            let now = chrono::Utc::now().to_rfc3339();

            let mut transaction = self
                .get_client()?
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            let current: Option<Profile> = self
                .get_client()?
                .fluent()
                .select()
                .by_id_in(collections::PROFILES)
                .obj()
                .one(user_id)
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to read profile in transaction: {}", e))
                })?;

            let mut profile = match current {
                Some(profile) => profile,
                None => {
                    let _ = transaction.rollback().await;
                    return Err(AppError::NotFound(
                        "There is no profile for this user".to_string(),
                    ));
                }
            };

            if let Err(e) = mutate(&mut profile, &now) {
                let _ = transaction.rollback().await;
                return Err(e);
            }

            self.get_client()?
                .fluent()
                .update()
                .in_col(collections::PROFILES)
                .document_id(user_id)
                .object(&profile)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add profile to transaction: {}", e))
                })?;

            match transaction.commit().await {
                Ok(_) => return Ok(profile),
                Err(e) => {
                    tracing::warn!(user_id, attempt, error = %e, "Profile mutation commit failed");
                    last_err = Some(e);
                }
            }
        }

        Err(AppError::Conflict(format!(
            "Concurrent profile update for {}: {}",
            user_id,
            last_err.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    // ─── Owner Deletion (cascade) ──────────────────────────────────

    /// Delete the profile for `user_id` and cascade to the owning user.
    ///
    /// Best-effort cleanup: deleting documents that do not exist succeeds,
    /// so a user without a profile can still remove their account.
    pub async fn delete_owner_data(&self, user_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::PROFILES)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        tracing::debug!(user_id, "Deleted profile");

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        tracing::debug!(user_id, "Deleted user");

        tracing::info!(user_id, "Owner data deletion complete");
        Ok(())
    }
}
