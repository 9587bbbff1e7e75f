//! Agent usage aggregation: chat counts, recency and keyword categories.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

/// Agents page payload.
#[derive(Debug, Serialize)]
pub struct AgentsData {
    pub agents: Vec<AgentUsage>,
    pub stats: AgentTotals,
}

/// One agent with its derived usage figures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentUsage {
    pub id: String,
    pub name: String,
    pub status: &'static str,
    /// Owning couples only. Agents are never shared across couples, so this is 1
    /// whenever the owner still exists.
    pub couples: i64,
    pub last_seen: String,
    pub chats: i64,
    pub category: AgentCategory,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentTotals {
    pub active_agents: i64,
    pub total_chats: i64,
    pub avg_usage: i64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgentCategory {
    Productivity,
    Romance,
    Memory,
    Travel,
    Daily,
    Communication,
    General,
}

/// Ordered keyword rules; the first rule with a matching keyword wins.
const CATEGORY_RULES: &[(&[&str], AgentCategory)] = &[
    (&["planning"], AgentCategory::Productivity),
    (&["date", "romance", "gift"], AgentCategory::Romance),
    (&["memory", "remember"], AgentCategory::Memory),
    (&["travel"], AgentCategory::Travel),
    (&["daily", "briefing"], AgentCategory::Daily),
    (&["conflict", "communicat"], AgentCategory::Communication),
];

/// Classify an agent by keywords in its title.
pub fn categorize(title: &str) -> AgentCategory {
    let title = title.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| title.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(AgentCategory::General)
}

/// Human-readable age of `last` relative to `now`.
///
/// Under a minute is "Just now"; minutes, hours and days follow until a week,
/// after which the local calendar date is shown.
pub fn recency_label(last: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - last;
    let mins = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if mins < 1 {
        "Just now".to_string()
    } else if mins < 60 {
        format!("{mins} min ago")
    } else if hours < 24 {
        format!("{hours} {} ago", plural(hours, "hour"))
    } else if days < 7 {
        format!("{days} {} ago", plural(days, "day"))
    } else {
        last.with_timezone(&Local).format("%-m/%-d/%Y").to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n > 1 {
        format!("{unit}s")
    } else {
        unit.to_string()
    }
}

/// Per-agent aggregate row.
#[derive(Debug, sqlx::FromRow)]
pub struct AgentUsageRow {
    pub id: Uuid,
    pub title: String,
    pub owner_couples: i64,
    pub chat_count: i64,
    pub last_chat_at: Option<DateTime<Utc>>,
}

impl AgentUsageRow {
    pub fn into_usage(self, now: DateTime<Utc>) -> AgentUsage {
        AgentUsage {
            id: self.id.to_string(),
            category: categorize(&self.title),
            name: self.title,
            status: "active",
            couples: self.owner_couples,
            last_seen: self
                .last_chat_at
                .map(|ts| recency_label(ts, now))
                .unwrap_or_else(|| "Never".to_string()),
            chats: self.chat_count,
        }
    }
}

/// Sum chats and average them across agents.
pub fn totals(agents: &[AgentUsage]) -> AgentTotals {
    let active_agents = agents.len() as i64;
    let total_chats: i64 = agents.iter().map(|a| a.chats).sum();
    let avg_usage = if active_agents > 0 {
        (total_chats as f64 / active_agents as f64).round() as i64
    } else {
        0
    };
    AgentTotals {
        active_agents,
        total_chats,
        avg_usage,
    }
}

/// Fetch every agent with its usage figures, newest agents first.
pub async fn get_agents(pool: &PgPool, now: DateTime<Utc>) -> Result<AgentsData, AppError> {
    let rows = fetch_agent_usage(pool).await?;
    let agents: Vec<AgentUsage> = rows.into_iter().map(|row| row.into_usage(now)).collect();
    let stats = totals(&agents);

    tracing::debug!(
        agents = stats.active_agents,
        chats = stats.total_chats,
        "Aggregated agent usage"
    );

    Ok(AgentsData { agents, stats })
}

async fn fetch_agent_usage(pool: &PgPool) -> Result<Vec<AgentUsageRow>, AppError> {
    let rows = sqlx::query_as::<_, AgentUsageRow>(
        r#"
        SELECT
            a.id,
            a.title,
            (SELECT COUNT(*) FROM couples co WHERE co.id = a.couple_id) AS owner_couples,
            COUNT(ch.id) AS chat_count,
            MAX(ch.updated_at) AS last_chat_at
        FROM agents a
        LEFT JOIN chats ch ON ch.agent_id = a.id
        GROUP BY a.id
        ORDER BY a.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn recency_under_a_minute() {
        let now = Utc::now();
        assert_eq!(recency_label(now - Duration::seconds(59), now), "Just now");
        assert_eq!(recency_label(now, now), "Just now");
    }

    #[test]
    fn recency_minutes_hours_days() {
        let now = Utc::now();
        assert_eq!(recency_label(now - Duration::minutes(1), now), "1 min ago");
        assert_eq!(recency_label(now - Duration::minutes(59), now), "59 min ago");
        assert_eq!(recency_label(now - Duration::minutes(90), now), "1 hour ago");
        assert_eq!(recency_label(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(recency_label(now - Duration::hours(30), now), "1 day ago");
        assert_eq!(recency_label(now - Duration::days(6), now), "6 days ago");
    }

    #[test]
    fn recency_beyond_a_week_is_a_date() {
        let now = Utc::now();
        let last = now - Duration::days(8);
        let label = recency_label(last, now);
        assert!(!label.contains("ago"));
        assert_eq!(label, last.with_timezone(&Local).format("%-m/%-d/%Y").to_string());
    }

    #[test]
    fn categorize_ordered_keywords() {
        assert_eq!(categorize("Weekend Planning"), AgentCategory::Productivity);
        assert_eq!(categorize("Date Night Ideas"), AgentCategory::Romance);
        assert_eq!(categorize("Gift Finder"), AgentCategory::Romance);
        assert_eq!(categorize("Remember This"), AgentCategory::Memory);
        assert_eq!(categorize("Travel Planner"), AgentCategory::Travel);
        assert_eq!(categorize("Morning Briefing"), AgentCategory::Daily);
        assert_eq!(categorize("Communication Coach"), AgentCategory::Communication);
        assert_eq!(categorize("Chef"), AgentCategory::General);
    }

    #[test]
    fn categorize_first_rule_wins() {
        // "planning" precedes "travel" in rule order.
        assert_eq!(categorize("Travel Planning"), AgentCategory::Productivity);
        // "date" precedes "daily".
        assert_eq!(categorize("Daily Date Ideas"), AgentCategory::Romance);
    }

    #[test]
    fn row_without_chats_is_never_seen() {
        let row = AgentUsageRow {
            id: Uuid::nil(),
            title: "Gift Finder".to_string(),
            owner_couples: 1,
            chat_count: 0,
            last_chat_at: None,
        };
        let usage = row.into_usage(Utc::now());
        assert_eq!(usage.last_seen, "Never");
        assert_eq!(usage.category, AgentCategory::Romance);
        assert_eq!(usage.couples, 1);

        let json = serde_json::to_value(&usage).unwrap();
        assert_eq!(json["lastSeen"], "Never");
        assert_eq!(json["category"], "romance");
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn totals_round_average() {
        let now = Utc::now();
        let agents: Vec<AgentUsage> = [3, 2]
            .into_iter()
            .map(|chat_count| {
                AgentUsageRow {
                    id: Uuid::new_v4(),
                    title: "Chef".to_string(),
                    owner_couples: 1,
                    chat_count,
                    last_chat_at: Some(now),
                }
                .into_usage(now)
            })
            .collect();
        assert_eq!(
            totals(&agents),
            AgentTotals {
                active_agents: 2,
                total_chats: 5,
                avg_usage: 3,
            }
        );
        assert_eq!(totals(&[]).avg_usage, 0);
    }
}
