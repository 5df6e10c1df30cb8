//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quitanda_core::{Email, UserId};

/// A store owner, provisioned on first Google login.
///
/// Users are matched by email: the OAuth callback looks the account up by
/// the address Google reports and creates it if absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (unique).
    pub email: Email,
    /// Display name from the Google profile.
    pub name: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
