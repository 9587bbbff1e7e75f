//! Seed script for development. Populates a fresh database with sample couples.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires the `DATABASE_URL` environment variable (reads .env).

use chrono::{Duration, Utc};
use couple_insights::models::chat::DEFAULT_LAST_MESSAGE;
use couple_insights::models::chat_message::MessageSender;
use couple_insights::models::couple::CoupleStatus;
use couple_insights::models::user::UserRole;
use sqlx::PgPool;
use uuid::Uuid;

const DEMO_PASSWORD: &str = "Together123!";

/// (couple name, partner 1, partner 2, status)
const COUPLES: &[(&str, &str, &str, CoupleStatus)] = &[
    ("The Wanderers", "Jamie Chen", "Riley Park", CoupleStatus::Active),
    ("", "Sam Ortiz", "Alex Kim", CoupleStatus::Active),
    ("Team Sunshine", "Morgan Lee", "Casey Diaz", CoupleStatus::Pending),
    ("Old Flames", "Jordan Blake", "Taylor Quinn", CoupleStatus::Inactive),
];

/// (title, emoji, description)
const AGENTS: &[(&str, &str, &str)] = &[
    ("Travel Planner", "✈️", "Plans trips and itineraries together"),
    ("Date Night Ideas", "🌹", "Suggests date nights and gifts"),
    ("Memory Keeper", "📸", "Helps remember shared moments"),
    ("Daily Briefing", "☀️", "Morning summary of the day ahead"),
    ("Conflict Coach", "🕊️", "Guides calm communication"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL")?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    couple_insights::db::run_migrations(&pool).await?;

    println!("=== couple-insights Seed Script ===");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM couples")
        .fetch_one(&pool)
        .await?;
    if count > 0 {
        println!("[skip] Couples already exist ({count})");
        return Ok(());
    }

    let hash = couple_insights::services::credentials::hash_password(DEMO_PASSWORD)?;
    for (index, couple) in COUPLES.iter().enumerate() {
        seed_couple(&pool, index, *couple, &hash).await?;
    }

    println!("\n=== Seed complete! ===");
    println!("Demo login: <first>.<last>@couples.local / {DEMO_PASSWORD}");

    Ok(())
}

async fn seed_couple(
    pool: &PgPool,
    index: usize,
    (couple_name, partner1, partner2, status): (&str, &str, &str, CoupleStatus),
    password_hash: &str,
) -> anyhow::Result<()> {
    let user1 = insert_user(pool, partner1, UserRole::User, password_hash).await?;
    let user2 = insert_user(pool, partner2, UserRole::Partner, password_hash).await?;

    let couple_id: Uuid = sqlx::query_scalar(
        "INSERT INTO couples (couple_name, user1_id, user2_id, user1_name, user2_name, status)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(couple_name)
    .bind(user1)
    .bind(user2)
    .bind(first_name(partner1))
    .bind(first_name(partner2))
    .bind(status)
    .fetch_one(pool)
    .await?;

    sqlx::query("UPDATE users SET couple_id = $1 WHERE id = ANY($2)")
        .bind(couple_id)
        .bind(vec![user1, user2])
        .execute(pool)
        .await?;

    if status == CoupleStatus::Pending {
        println!("[done] Created pending couple {partner1} & {partner2}");
        return Ok(());
    }

    let now = Utc::now();
    // Each couple gets a rotating subset of agents so usage differs between them.
    for (offset, &(title, emoji, description)) in AGENTS.iter().enumerate().skip(index % 2) {
        let agent_id: Uuid = sqlx::query_scalar(
            "INSERT INTO agents (title, emoji, description, prompt, couple_id, created_by, is_default)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(title)
        .bind(emoji)
        .bind(description)
        .bind(format!("You are {title}, a helpful assistant for couples."))
        .bind(couple_id)
        .bind(user1)
        .bind(offset == 0)
        .fetch_one(pool)
        .await?;

        let chat_count = (offset + index) % 3 + 1;
        for n in 0..chat_count {
            let idle = Duration::hours(((offset * 7 + n * 29 + index * 11) % 240) as i64);
            let active = status == CoupleStatus::Active && n % 2 == 0;
            let messages = (offset * 3 + n * 5 + index) % 14;
            seed_chat(pool, agent_id, user1, title, n, active, messages, now - idle).await?;
        }
    }

    println!("[done] Created {status:?} couple {partner1} & {partner2} with agents and chats");
    Ok(())
}

async fn insert_user(
    pool: &PgPool,
    full_name: &str,
    role: UserRole,
    password_hash: &str,
) -> anyhow::Result<Uuid> {
    let email = format!("{}@couples.local", full_name.to_lowercase().replace(' ', "."));
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (full_name, email, password_hash, role, is_verified)
         VALUES ($1, $2, $3, $4, true)
         RETURNING id",
    )
    .bind(full_name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

#[allow(clippy::too_many_arguments)]
async fn seed_chat(
    pool: &PgPool,
    agent_id: Uuid,
    user_id: Uuid,
    agent_title: &str,
    n: usize,
    is_active: bool,
    messages: usize,
    last_update: chrono::DateTime<Utc>,
) -> anyhow::Result<()> {
    let started = last_update - Duration::days(3);
    let chat_id: Uuid = sqlx::query_scalar(
        "INSERT INTO chats (title, agent_id, last_message, is_active, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(format!("{agent_title} #{}", n + 1))
    .bind(agent_id)
    .bind(if messages == 0 {
        DEFAULT_LAST_MESSAGE.to_string()
    } else {
        format!("Let's plan the next step ({messages} messages so far)")
    })
    .bind(is_active)
    .bind(started)
    .bind(last_update)
    .fetch_one(pool)
    .await?;

    for m in 0..messages {
        let sender = if m % 2 == 1 {
            MessageSender::Assistant
        } else {
            MessageSender::User
        };
        let assistant = sender == MessageSender::Assistant;
        let created_at = last_update - Duration::minutes(((messages - m) * 17) as i64);
        sqlx::query(
            "INSERT INTO chat_messages (content, sender, user_id, chat_id, timestamp, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)",
        )
        .bind(if assistant {
            "Here are a few ideas you might both enjoy."
        } else {
            "What should we do this weekend?"
        })
        .bind(sender)
        .bind(if assistant { None } else { Some(user_id) })
        .bind(chat_id)
        .bind(created_at.format("%H:%M").to_string())
        .bind(created_at)
        .execute(pool)
        .await?;
    }

    Ok(())
}

fn first_name(full_name: &str) -> &str {
    full_name.split_whitespace().next().unwrap_or(full_name)
}
