//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User account stored in Firestore.
///
/// Accounts are created by the auth service; this API references them for
/// profile ownership and public listing (name/avatar only), and removes
/// them when the owner deletes their profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (also used as document ID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Avatar URL
    pub avatar: Option<String>,
    /// Email address (never exposed through this API)
    pub email: Option<String>,
    /// When the account was created
    pub created_at: String,
}
