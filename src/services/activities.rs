//! Activity view: active chats projected into pseudo-tasks.
//!
//! There is no task entity. Each [`TaskView`] is computed per request from a chat
//! row and its message count, and carries no persistence guarantees.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::couple;
use crate::services::clock;

/// Active chats considered for status counts.
const CONSIDERED_CHATS: i64 = 20;

/// Activities returned to the page.
const DISPLAYED_ACTIVITIES: usize = 10;

/// Messages that make a chat count as fully progressed.
const MESSAGES_FOR_COMPLETION: i64 = 10;

#[derive(Debug, Serialize)]
pub struct ActivitiesData {
    pub activities: Vec<TaskView>,
    pub stats: ActivityStats,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Completed,
    Planning,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

/// Read-only projection of one active chat.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub couple: String,
    pub participants: u8,
    pub progress: i64,
    pub start_date: String,
    pub estimated_completion: String,
    pub description: String,
    pub objectives: [&'static str; 3],
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub active_tasks: i64,
    pub completed: i64,
    pub planning: i64,
    pub success_rate: i64,
}

/// Active chat joined with its agent, couple and message count.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActiveChatRow {
    pub id: Uuid,
    pub title: String,
    pub last_message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub agent_title: Option<String>,
    pub couple_name: Option<String>,
    pub user1_name: Option<String>,
    pub user2_name: Option<String>,
    pub message_count: i64,
}

/// Active vs. inactive chat totals across the whole store.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct ChatTotals {
    pub active: i64,
    pub inactive: i64,
}

/// Percentage of the way to [`MESSAGES_FOR_COMPLETION`], capped at 100.
pub fn progress_for(message_count: i64) -> i64 {
    (message_count.max(0) * 100 / MESSAGES_FOR_COMPLETION).min(100)
}

pub fn status_for(progress: i64, days_since_update: i64) -> TaskStatus {
    if progress == 100 {
        TaskStatus::Completed
    } else if days_since_update > 7 {
        TaskStatus::Planning
    } else {
        TaskStatus::Active
    }
}

pub fn priority_for(days_since_update: i64) -> TaskPriority {
    match days_since_update {
        d if d < 1 => TaskPriority::High,
        d if d < 3 => TaskPriority::Medium,
        _ => TaskPriority::Low,
    }
}

/// `ACT-` followed by the first eight characters of the chat key.
pub fn display_id(id: Uuid) -> String {
    let prefix: String = id.to_string().chars().take(8).collect();
    format!("ACT-{}", prefix.to_uppercase())
}

fn objectives_for(title: &str) -> [&'static str; 3] {
    let first = if title.contains("plan") || title.contains("Plan") {
        "Plan details"
    } else {
        "Complete task"
    };
    [first, "Review progress", "Finalize"]
}

impl ActiveChatRow {
    fn couple_label(&self) -> String {
        match (&self.couple_name, &self.user1_name, &self.user2_name) {
            (Some(name), Some(user1), Some(user2)) => couple::display_label(name, user1, user2),
            _ => "Unknown".to_string(),
        }
    }

    fn display_name(&self) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        match &self.agent_title {
            Some(agent_title) if !agent_title.is_empty() => agent_title.clone(),
            _ => "Untitled Activity".to_string(),
        }
    }

    /// Project this chat into a task as seen at `now`.
    pub fn project(&self, now: DateTime<Utc>) -> TaskView {
        let progress = progress_for(self.message_count);
        let days_since_update = (now - self.updated_at).num_days();
        let estimated_completion = self.updated_at + Duration::days((100 - progress) / 10);

        TaskView {
            id: display_id(self.id),
            name: self.display_name(),
            status: status_for(progress, days_since_update),
            priority: priority_for(days_since_update),
            couple: self.couple_label(),
            participants: 2,
            progress,
            start_date: clock::iso_date(self.created_at),
            estimated_completion: clock::iso_date(estimated_completion),
            description: if self.last_message.is_empty() {
                "No description available".to_string()
            } else {
                self.last_message.clone()
            },
            objectives: objectives_for(&self.title),
        }
    }
}

/// Status counts over the considered tasks blended with store-wide chat totals.
///
/// `completed` adds every inactive chat to the completed tasks, and the success
/// rate is the share of inactive chats among all chats.
pub fn activity_stats(tasks: &[TaskView], totals: ChatTotals) -> ActivityStats {
    let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count() as i64;
    let all_chats = totals.active + totals.inactive;
    let success_rate = if all_chats > 0 {
        (totals.inactive as f64 / all_chats as f64 * 100.0).round() as i64
    } else {
        0
    };

    ActivityStats {
        active_tasks: count(TaskStatus::Active),
        completed: count(TaskStatus::Completed) + totals.inactive,
        planning: count(TaskStatus::Planning),
        success_rate,
    }
}

/// Derive the activities page from the most recently updated active chats.
pub async fn get_activities(pool: &PgPool, now: DateTime<Utc>) -> Result<ActivitiesData, AppError> {
    let (rows, totals) = tokio::try_join!(fetch_active_chats(pool), fetch_chat_totals(pool))?;

    let mut activities: Vec<TaskView> = rows.iter().map(|row| row.project(now)).collect();
    let stats = activity_stats(&activities, totals);
    activities.truncate(DISPLAYED_ACTIVITIES);

    tracing::debug!(
        considered = rows.len(),
        active = stats.active_tasks,
        completed = stats.completed,
        "Derived activities"
    );

    Ok(ActivitiesData { activities, stats })
}

async fn fetch_active_chats(pool: &PgPool) -> Result<Vec<ActiveChatRow>, AppError> {
    let rows = sqlx::query_as::<_, ActiveChatRow>(
        r#"
        SELECT
            ch.id,
            ch.title,
            ch.last_message,
            ch.created_at,
            ch.updated_at,
            a.title AS agent_title,
            co.couple_name,
            co.user1_name,
            co.user2_name,
            (SELECT COUNT(*) FROM chat_messages m WHERE m.chat_id = ch.id) AS message_count
        FROM chats ch
        LEFT JOIN agents a ON a.id = ch.agent_id
        LEFT JOIN couples co ON co.id = a.couple_id
        WHERE ch.is_active
        ORDER BY ch.updated_at DESC
        LIMIT $1
        "#,
    )
    .bind(CONSIDERED_CHATS)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn fetch_chat_totals(pool: &PgPool) -> Result<ChatTotals, AppError> {
    let row = sqlx::query_as::<_, ChatTotals>(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE is_active)     AS active,
            COUNT(*) FILTER (WHERE NOT is_active) AS inactive
        FROM chats
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    fn chat(title: &str, message_count: i64, updated_days_ago: i64) -> ActiveChatRow {
        let now = fixed_now();
        ActiveChatRow {
            id: Uuid::parse_str("5f3c2a1b-0000-4000-8000-000000000000").unwrap(),
            title: title.to_string(),
            last_message: "See you at the airport".to_string(),
            created_at: now - Duration::days(30),
            updated_at: now - Duration::days(updated_days_ago),
            agent_title: Some("Travel Planner".to_string()),
            couple_name: Some(String::new()),
            user1_name: Some("Jamie".to_string()),
            user2_name: Some("Riley".to_string()),
            message_count,
        }
    }

    #[test]
    fn ten_or_more_messages_complete_the_task() {
        let now = fixed_now();
        for count in [10, 11, 250] {
            let task = chat("Lisbon trip", count, 0).project(now);
            assert_eq!(task.progress, 100);
            assert_eq!(task.status, TaskStatus::Completed);
        }
        // Completion wins over staleness.
        let stale = chat("Lisbon trip", 12, 30).project(now);
        assert_eq!(stale.status, TaskStatus::Completed);
    }

    #[test]
    fn partial_progress_and_dates() {
        let now = fixed_now();
        let row = chat("Lisbon trip", 4, 0);
        let task = row.project(now);
        assert_eq!(task.progress, 40);
        assert_eq!(task.status, TaskStatus::Active);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.start_date, clock::iso_date(row.created_at));
        assert_eq!(
            task.estimated_completion,
            clock::iso_date(row.updated_at + Duration::days(6))
        );
    }

    #[test]
    fn idle_chats_go_back_to_planning() {
        let now = fixed_now();
        assert_eq!(chat("Lisbon trip", 2, 7).project(now).status, TaskStatus::Active);
        assert_eq!(chat("Lisbon trip", 2, 8).project(now).status, TaskStatus::Planning);
    }

    #[test]
    fn idle_days_round_down_at_the_week_boundary() {
        let now = fixed_now();
        let mut row = chat("Lisbon trip", 2, 0);

        row.updated_at = now - Duration::days(8) + Duration::seconds(1);
        assert_eq!(row.project(now).status, TaskStatus::Active);

        row.updated_at = now - Duration::days(8);
        assert_eq!(row.project(now).status, TaskStatus::Planning);
    }

    #[test]
    fn priority_by_idle_days() {
        assert_eq!(priority_for(0), TaskPriority::High);
        assert_eq!(priority_for(1), TaskPriority::Medium);
        assert_eq!(priority_for(2), TaskPriority::Medium);
        assert_eq!(priority_for(3), TaskPriority::Low);
    }

    #[test]
    fn labels_and_objectives() {
        let now = fixed_now();
        let task = chat("Plan the honeymoon", 1, 0).project(now);
        assert_eq!(task.id, "ACT-5F3C2A1B");
        assert_eq!(task.couple, "Jamie & Riley");
        assert_eq!(task.objectives, ["Plan details", "Review progress", "Finalize"]);

        let untitled = chat("", 1, 0).project(now);
        assert_eq!(untitled.name, "Travel Planner");
        assert_eq!(untitled.objectives[0], "Complete task");

        let mut orphan = chat("", 1, 0);
        orphan.agent_title = None;
        orphan.couple_name = None;
        orphan.last_message = String::new();
        let task = orphan.project(now);
        assert_eq!(task.name, "Untitled Activity");
        assert_eq!(task.couple, "Unknown");
        assert_eq!(task.description, "No description available");
    }

    #[test]
    fn stats_blend_inactive_chats() {
        let now = fixed_now();
        let tasks = vec![
            chat("a", 10, 0).project(now),
            chat("b", 3, 0).project(now),
            chat("c", 3, 9).project(now),
        ];
        let stats = activity_stats(
            &tasks,
            ChatTotals {
                active: 3,
                inactive: 1,
            },
        );
        assert_eq!(
            stats,
            ActivityStats {
                active_tasks: 1,
                completed: 2,
                planning: 1,
                success_rate: 25,
            }
        );
    }

    #[test]
    fn stats_without_chats() {
        let stats = activity_stats(
            &[],
            ChatTotals {
                active: 0,
                inactive: 0,
            },
        );
        assert_eq!(stats.success_rate, 0);
        assert_eq!(stats.completed, 0);
    }

    #[test]
    fn task_view_serializes_camel_case() {
        let task = chat("Lisbon trip", 4, 0).project(fixed_now());
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["participants"], 2);
        assert!(json["estimatedCompletion"].is_string());
        assert!(json["startDate"].is_string());
    }
}
