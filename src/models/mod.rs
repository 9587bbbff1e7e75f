//! Database models for the five record-store entities.

pub mod agent;
pub mod chat;
pub mod chat_message;
pub mod couple;
pub mod user;
