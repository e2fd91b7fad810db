use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// Cookie-carried login session. Expiry is checked at resolution time, not
/// by a background sweep.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: OffsetDateTime,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= OffsetDateTime::now_utc()
    }
}

/// Bearer token for the REST surface; at most one per user.
#[derive(Debug, Clone, FromRow)]
pub struct ApiKey {
    pub key: String,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "cook42".into(),
            email: "cook@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("cook42"));
    }

    #[test]
    fn session_expiry_is_a_point_in_time_check() {
        let live = Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            expires_at: OffsetDateTime::now_utc() + Duration::hours(1),
        };
        assert!(!live.is_expired());

        let stale = Session {
            expires_at: OffsetDateTime::now_utc() - Duration::seconds(1),
            ..live.clone()
        };
        assert!(stale.is_expired());
    }
}
