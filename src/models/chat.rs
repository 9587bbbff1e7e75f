//! Chat: a conversation thread bound to one agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Preview stored on a chat before any message is sent.
pub const DEFAULT_LAST_MESSAGE: &str = "Start a conversation...";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chat {
    pub id: Uuid,
    pub title: String,
    pub agent_id: Uuid,
    pub last_message: String,
    pub is_active: bool,
    pub initial_prompt: Option<String>,
    pub share_token: Option<String>,
    pub shared_users: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
