use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Knobs for the background load generator.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    pub enabled: bool,
    pub accounts_per_run: u32,
    pub posts_per_run: u32,
    pub chat_messages_per_run: u32,
    /// Interval between generation runs, in minutes.
    pub interval_minutes: u64,
    /// Window over which one run's chat messages are spread, in seconds.
    pub chat_window_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub seed: SeedConfig,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "socialnet".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "socialnet-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let seed = SeedConfig {
            enabled: env_parse("SEED_ENABLED", true),
            accounts_per_run: env_parse("SEED_ACCOUNTS_PER_RUN", 25),
            posts_per_run: env_parse("SEED_POSTS_PER_RUN", 50),
            chat_messages_per_run: env_parse("SEED_CHAT_MESSAGES_PER_RUN", 20),
            interval_minutes: env_parse("SEED_INTERVAL_MINUTES", 120),
            chat_window_secs: env_parse("SEED_CHAT_WINDOW_SECS", 3600),
        };
        Ok(Self {
            database_url,
            jwt,
            seed,
        })
    }
}
