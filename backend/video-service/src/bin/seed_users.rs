//! Seed the owner registry with bearer tokens.
//!
//! Reads `SEED_USERS` as `id:token,id:token`; without it the three local
//! development owners are written.

use anyhow::{bail, Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_service::db::PgUserRepository;

const DEFAULT_USERS: [(&str, &str); 3] = [
    ("1", "v!de0ver$eTe$tT0ken_1"),
    ("2", "v!de0ver$eTe$tT0ken_2"),
    ("3", "v!de0ver$eTe$tT0ken_3"),
];

fn parse_seed_users(raw: &str) -> Result<Vec<(String, String)>> {
    let mut users = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((id, token)) = entry.split_once(':') else {
            bail!("invalid SEED_USERS entry {:?}, expected id:token", entry);
        };
        if id.is_empty() || token.is_empty() {
            bail!("invalid SEED_USERS entry {:?}, id and token must be non-empty", entry);
        }
        users.push((id.to_string(), token.to_string()));
    }
    Ok(users)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let users = match std::env::var("SEED_USERS") {
        Ok(raw) => parse_seed_users(&raw)?,
        Err(_) => DEFAULT_USERS
            .iter()
            .map(|(id, token)| (id.to_string(), token.to_string()))
            .collect(),
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .context("failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let repo = PgUserRepository::new(pool);
    for (id, token) in &users {
        repo.upsert(id, token)
            .await
            .with_context(|| format!("failed to seed user {}", id))?;
        tracing::info!(user_id = %id, "seeded user");
    }

    tracing::info!("Seeded {} users", users.len());
    Ok(())
}
