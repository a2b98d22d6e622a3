// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! DevConnect: developer profile API backend
//!
//! This crate provides the REST backend for the DevConnect single-page
//! app: JWT-authenticated profile management over Firestore plus a thin
//! proxy to the GitHub repository listing API.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::GithubClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub github: GithubClient,
}
