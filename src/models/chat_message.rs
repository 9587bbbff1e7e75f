//! Chat message with attachments, reactions and read receipts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "message_sender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub url: String,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    pub user_id: Uuid,
    pub read_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub emoji: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    pub sender: MessageSender,
    pub user_id: Option<Uuid>,
    pub chat_id: Uuid,
    pub timestamp: String,
    pub attachments: Json<Vec<Attachment>>,
    pub read_by: Json<Vec<ReadReceipt>>,
    pub reply_to_message_id: Option<Uuid>,
    pub reactions: Json<Vec<Reaction>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serialization() {
        let json = serde_json::to_string(&MessageSender::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn read_receipt_uses_camel_case() {
        let receipt = ReadReceipt {
            user_id: Uuid::nil(),
            read_at: Utc::now(),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["userId"], Uuid::nil().to_string());
        assert!(json["readAt"].is_string());
    }

    #[test]
    fn attachment_uses_camel_case() {
        let attachment = Attachment {
            url: "https://cdn.example.com/a.png".to_string(),
            filename: "a.png".to_string(),
            original_name: "beach.png".to_string(),
            mime_type: "image/png".to_string(),
            size: 2048,
            uploaded_at: Utc::now(),
        };
        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["originalName"], "beach.png");
        assert_eq!(json["mimeType"], "image/png");
    }
}
