//! Overview aggregation: platform counts, today's activity and the 7-day histogram.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::chat_message::MessageSender;
use crate::models::couple;
use crate::services::clock;

/// Length of the rolling usage histogram window.
pub const USAGE_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewData {
    pub stats: OverviewStats,
    pub recent_couples: Vec<RecentCouple>,
    pub recent_activity: Vec<RecentActivity>,
    pub usage_stats: Vec<DailyCount>,
    pub platform_stats: PlatformStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub active_couples: i64,
    pub messages_today: i64,
    pub new_couples_today: i64,
    pub total_users: i64,
    pub total_agents: i64,
    pub total_chats: i64,
}

#[derive(Debug, Serialize)]
pub struct RecentCouple {
    pub id: String,
    pub name: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RecentActivity {
    pub time: DateTime<Utc>,
    pub user: String,
    pub action: &'static str,
    pub item: String,
}

/// Messages created on one UTC calendar date.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, sqlx::FromRow)]
pub struct DailyCount {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub chat_conversations: i64,
    pub shared_tasks: i64,
    pub memories_shared: i64,
    pub daily_active_users: i64,
    pub messages_per_day: i64,
    pub avg_messages_per_couple: f64,
    pub avg_session_time: &'static str,
}

/// Store-wide entity counts.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct EntityCounts {
    pub active_couples: i64,
    pub total_users: i64,
    pub total_agents: i64,
    pub total_chats: i64,
    pub active_chats: i64,
}

/// Counts bounded by the start of the local day.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct TodayCounts {
    pub messages_today: i64,
    pub new_couples_today: i64,
    pub daily_active_users: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct RecentCoupleRow {
    pub id: Uuid,
    pub couple_name: String,
    pub user1_name: String,
    pub user2_name: String,
}

/// Recent message resolved through chat → agent → couple. Any link may be missing.
#[derive(Debug, sqlx::FromRow)]
pub struct RecentMessageRow {
    pub created_at: DateTime<Utc>,
    pub sender: MessageSender,
    pub chat_title: Option<String>,
    pub user1_name: Option<String>,
    pub user2_name: Option<String>,
}

impl From<RecentCoupleRow> for RecentCouple {
    fn from(row: RecentCoupleRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: couple::display_label(&row.couple_name, &row.user1_name, &row.user2_name),
            status: "active",
        }
    }
}

impl From<RecentMessageRow> for RecentActivity {
    fn from(row: RecentMessageRow) -> Self {
        let user = match (&row.user1_name, &row.user2_name) {
            (Some(user1), Some(user2)) => couple::members_label(user1, user2),
            _ => "Unknown".to_string(),
        };
        let action = match row.sender {
            MessageSender::Assistant => "received AI response",
            MessageSender::User => "sent message",
        };
        Self {
            time: row.created_at,
            user,
            action,
            item: row
                .chat_title
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| "Chat".to_string()),
        }
    }
}

/// Messages today per active couple, rounded to one decimal.
pub fn avg_messages_per_couple(messages_today: i64, active_couples: i64) -> f64 {
    if active_couples > 0 {
        (messages_today as f64 / active_couples as f64 * 10.0).round() / 10.0
    } else {
        0.0
    }
}

pub fn platform_stats(entities: EntityCounts, today: TodayCounts) -> PlatformStats {
    PlatformStats {
        chat_conversations: entities.total_chats,
        shared_tasks: entities.active_chats,
        // No memory entity exists in the record store yet.
        memories_shared: 0,
        daily_active_users: today.daily_active_users,
        messages_per_day: today.messages_today,
        avg_messages_per_couple: avg_messages_per_couple(
            today.messages_today,
            entities.active_couples,
        ),
        avg_session_time: "18.5m",
    }
}

/// Fill every date in `first..=last` that has no bucket with a zero count.
pub fn backfill_daily_counts(
    counts: Vec<DailyCount>,
    first: NaiveDate,
    last: NaiveDate,
) -> Vec<DailyCount> {
    let by_date: HashMap<String, i64> = counts.into_iter().map(|c| (c.date, c.count)).collect();
    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| {
            let date = day.format("%Y-%m-%d").to_string();
            let count = by_date.get(&date).copied().unwrap_or(0);
            DailyCount { date, count }
        })
        .collect()
}

/// Fetch all overview statistics in parallel queries.
///
/// The histogram window starts exactly 7 days before `now`, so it spans eight
/// UTC date buckets: the first and last are partial days. With `backfill`,
/// dates in the window without messages appear with a zero count instead of
/// being omitted.
pub async fn get_overview(
    pool: &PgPool,
    now: DateTime<Utc>,
    backfill: bool,
) -> Result<OverviewData, AppError> {
    let today_start = clock::local_midnight(now);
    let window_start = now - Duration::days(USAGE_WINDOW_DAYS);

    let (entities, today, recent_couples, recent_messages, usage) = tokio::try_join!(
        fetch_entity_counts(pool),
        fetch_today_counts(pool, today_start),
        fetch_recent_couples(pool),
        fetch_recent_messages(pool),
        fetch_daily_message_counts(pool, window_start),
    )?;

    let usage_stats = if backfill {
        backfill_daily_counts(usage, window_start.date_naive(), now.date_naive())
    } else {
        usage
    };

    tracing::debug!(
        active_couples = entities.active_couples,
        messages_today = today.messages_today,
        histogram_days = usage_stats.len(),
        "Aggregated overview"
    );

    Ok(OverviewData {
        stats: OverviewStats {
            active_couples: entities.active_couples,
            messages_today: today.messages_today,
            new_couples_today: today.new_couples_today,
            total_users: entities.total_users,
            total_agents: entities.total_agents,
            total_chats: entities.total_chats,
        },
        recent_couples: recent_couples.into_iter().map(RecentCouple::from).collect(),
        recent_activity: recent_messages.into_iter().map(RecentActivity::from).collect(),
        usage_stats,
        platform_stats: platform_stats(entities, today),
    })
}

async fn fetch_entity_counts(pool: &PgPool) -> Result<EntityCounts, AppError> {
    let row = sqlx::query_as::<_, EntityCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM couples WHERE status = 'active') AS active_couples,
            (SELECT COUNT(*) FROM users)                           AS total_users,
            (SELECT COUNT(*) FROM agents)                          AS total_agents,
            (SELECT COUNT(*) FROM chats)                           AS total_chats,
            (SELECT COUNT(*) FROM chats WHERE is_active)           AS active_chats
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

async fn fetch_today_counts(
    pool: &PgPool,
    today_start: DateTime<Utc>,
) -> Result<TodayCounts, AppError> {
    let row = sqlx::query_as::<_, TodayCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM chat_messages WHERE created_at >= $1)                  AS messages_today,
            (SELECT COUNT(*) FROM couples WHERE status = 'active' AND created_at >= $1) AS new_couples_today,
            (SELECT COUNT(*) FROM users WHERE updated_at >= $1)                          AS daily_active_users
        "#,
    )
    .bind(today_start)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Four most recently updated active couples.
async fn fetch_recent_couples(pool: &PgPool) -> Result<Vec<RecentCoupleRow>, AppError> {
    let rows = sqlx::query_as::<_, RecentCoupleRow>(
        r#"
        SELECT id, couple_name, user1_name, user2_name
        FROM couples
        WHERE status = 'active'
        ORDER BY updated_at DESC
        LIMIT 4
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Five most recent messages with their chat and couple.
async fn fetch_recent_messages(pool: &PgPool) -> Result<Vec<RecentMessageRow>, AppError> {
    let rows = sqlx::query_as::<_, RecentMessageRow>(
        r#"
        SELECT
            m.created_at,
            m.sender,
            ch.title AS chat_title,
            co.user1_name,
            co.user2_name
        FROM chat_messages m
        LEFT JOIN chats ch ON ch.id = m.chat_id
        LEFT JOIN agents a ON a.id = ch.agent_id
        LEFT JOIN couples co ON co.id = a.couple_id
        ORDER BY m.created_at DESC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Messages since `since`, bucketed by UTC date in ascending order.
async fn fetch_daily_message_counts(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<DailyCount>, AppError> {
    let rows = sqlx::query_as::<_, DailyCount>(
        r#"
        SELECT
            to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date,
            COUNT(*) AS count
        FROM chat_messages
        WHERE created_at >= $1
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
