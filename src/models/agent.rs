//! Agent: an AI-assistant persona owned by exactly one couple.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Agent {
    pub id: Uuid,
    pub title: String,
    pub emoji: String,
    pub description: String,
    pub prompt: String,
    pub couple_id: Uuid,
    pub created_by: Uuid,
    pub is_default: bool,
    pub share_token: Option<String>,
    pub shared_users: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
