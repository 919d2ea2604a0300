use std::time::Duration;

use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::auth::password::hash_password;
use crate::chat;
use crate::state::AppState;

mod faker;

/// All synthetic accounts share one throwaway credential, hashed once per run.
const SEED_PASSWORD: &str = "password123";

/// Spawns the load generator: one run at startup, then one per interval.
/// It owns nothing but the state handle; all writes are plain inserts against
/// the shared pool, interleaving freely with live traffic.
pub fn spawn(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        run(&state).await;

        let period = Duration::from_secs(state.config.seed.interval_minutes * 60);
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await; // the first tick completes immediately
        loop {
            ticker.tick().await;
            run(&state).await;
        }
    })
}

#[instrument(skip(state))]
async fn run(state: &AppState) {
    let cfg = &state.config.seed;
    info!("load generation run starting");

    if let Err(e) = seed_accounts(&state.db, cfg.accounts_per_run).await {
        warn!(error = %e, "account generation failed");
    }
    if let Err(e) = seed_friend_links(&state.db, cfg.accounts_per_run / 5).await {
        warn!(error = %e, "friend link generation failed");
    }
    if let Err(e) = seed_posts(&state.db, cfg.posts_per_run).await {
        warn!(error = %e, "post generation failed");
    }

    seed_chat(state, cfg.chat_messages_per_run, cfg.chat_window_secs).await;
    info!("load generation run finished");
}

async fn seed_accounts(db: &PgPool, count: u32) -> anyhow::Result<()> {
    if count == 0 {
        return Ok(());
    }
    let password_hash = hash_password(SEED_PASSWORD)?;

    let mut inserted = 0u32;
    for _ in 0..count {
        let username = faker::username();
        let email = faker::email(&username);
        // Random names can collide with earlier runs; skip instead of failing
        // the whole batch.
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (username, email, password_hash, first_name, last_name,
                                  address, country, city, phone, gender, citizenship)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&username)
        .bind(&email)
        .bind(&password_hash)
        .bind(faker::first_name())
        .bind(faker::last_name())
        .bind(faker::street_address())
        .bind(faker::country())
        .bind(faker::city())
        .bind(faker::phone())
        .bind(faker::gender())
        .bind(faker::country())
        .execute(db)
        .await?;
        inserted += result.rows_affected() as u32;
    }
    info!(inserted, requested = count, "synthetic accounts inserted");
    Ok(())
}

async fn seed_friend_links(db: &PgPool, count: u32) -> anyhow::Result<()> {
    let mut inserted = 0u32;
    for _ in 0..count {
        let Some(a) = random_account(db).await? else {
            warn!("no accounts to link as friends");
            return Ok(());
        };
        let Some(b) = random_account(db).await? else {
            return Ok(());
        };
        if a == b {
            continue;
        }
        sqlx::query(
            "INSERT INTO friends (account_id_1, account_id_2, status) VALUES ($1, $2, $3)",
        )
        .bind(a)
        .bind(b)
        .bind(faker::friend_status())
        .execute(db)
        .await?;
        inserted += 1;
    }
    info!(inserted, "synthetic friend links inserted");
    Ok(())
}

async fn seed_posts(db: &PgPool, count: u32) -> anyhow::Result<()> {
    let mut inserted = 0u32;
    for _ in 0..count {
        let Some(author_id) = random_account(db).await? else {
            warn!("no accounts to attribute posts to");
            return Ok(());
        };
        let content = faker::sentence(8);
        sqlx::query("INSERT INTO posts (author_id, content) VALUES ($1, $2)")
            .bind(author_id)
            .bind(&content)
            .execute(db)
            .await?;
        inserted += 1;
    }
    info!(inserted, "synthetic posts inserted");
    Ok(())
}

/// Drips `count` synthetic chat messages over `window_secs`, each one going
/// through the same persist-then-broadcast path as live chat. Each unit of
/// work is one insert plus a sleep, so request handling never starves.
async fn seed_chat(state: &AppState, count: u32, window_secs: u64) {
    if count == 0 {
        return;
    }
    let pause = Duration::from_secs(window_secs / u64::from(count).max(1));

    for _ in 0..count {
        let pair = async {
            let sender = random_account(&state.db).await?;
            let receiver = random_account(&state.db).await?;
            anyhow::Ok(sender.zip(receiver))
        }
        .await;

        match pair {
            Ok(Some((sender, receiver))) if sender != receiver => {
                let message = faker::sentence(5);
                if let Err(e) =
                    chat::send_message(&state.db, &state.chat, sender, Some(receiver), &message)
                        .await
                {
                    warn!(error = %e, "synthetic chat message dropped");
                }
            }
            Ok(Some(_)) => {} // picked the same account twice; skip this slot
            Ok(None) => {
                warn!("not enough accounts for chat generation");
                return;
            }
            Err(e) => warn!(error = %e, "chat generation query failed"),
        }

        tokio::time::sleep(pause).await;
    }
    info!(count, "synthetic chat run finished");
}

/// Independently re-queried on every pick; no cross-read snapshot is assumed.
async fn random_account(db: &PgPool) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM accounts ORDER BY random() LIMIT 1")
        .fetch_optional(db)
        .await
}
