use time::Duration;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_hours: i64,
    pub remember_ttl_days: i64,
}

impl SessionConfig {
    /// Lifetime of a new session: the default TTL, or the extended one when
    /// the user asked to stay logged in.
    pub fn ttl(&self, keep_logged_in: bool) -> Duration {
        if keep_logged_in {
            Duration::days(self.remember_ttl_days)
        } else {
            Duration::hours(self.ttl_hours)
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let session = SessionConfig {
            cookie_name: std::env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "larder_session".into()),
            ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(24),
            remember_ttl_days: std::env::var("SESSION_REMEMBER_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
        };
        Ok(Self {
            database_url,
            session,
        })
    }
}
