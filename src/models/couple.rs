//! Couple: a pairing of up to two users sharing agents and chats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle status. Transitions (`pending` → `active` → `inactive`) are not
/// guarded anywhere; the column accepts any value at any time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "couple_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CoupleStatus {
    Pending,
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Couple {
    pub id: Uuid,
    pub couple_name: String,
    pub user1_id: Uuid,
    pub user2_id: Option<Uuid>,
    pub user1_name: String,
    pub user2_name: String,
    pub partner_email: Option<String>,
    pub status: CoupleStatus,
    pub invitation_token: Option<String>,
    pub invitation_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `"user1 & user2"`.
pub fn members_label(user1_name: &str, user2_name: &str) -> String {
    format!("{user1_name} & {user2_name}")
}

/// Couple name, falling back to the member names.
pub fn display_label(couple_name: &str, user1_name: &str, user2_name: &str) -> String {
    if couple_name.is_empty() {
        members_label(user1_name, user2_name)
    } else {
        couple_name.to_string()
    }
}
