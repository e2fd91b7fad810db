use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;
use uuid::Uuid;

use crate::auth::keys;
use crate::auth::repo_types::{Session, User};
use crate::errors::ApiError;
use crate::state::AppState;

/// The resolved caller identity, passed explicitly into every protected
/// handler. Resolution tries the bearer API key first (REST surface), then
/// the session cookie (web surface); session expiry is enforced here, so a
/// stale row counts as no credentials even before it is deleted.
pub struct Caller(pub User);

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        {
            let key = auth
                .strip_prefix("Bearer ")
                .or_else(|| auth.strip_prefix("bearer "))
                .ok_or(ApiError::Unauthorized)?;
            if !keys::looks_like_api_key(key) {
                warn!("malformed api key");
                return Err(ApiError::Unauthorized);
            }
            let user = User::find_by_api_key(&state.db, key)
                .await?
                .ok_or(ApiError::Unauthorized)?;
            return Ok(Caller(user));
        }

        let jar = match CookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(infallible) => match infallible {},
        };
        let cookie = jar
            .get(&state.config.session.cookie_name)
            .ok_or(ApiError::Unauthorized)?;
        let session_id =
            Uuid::parse_str(cookie.value()).map_err(|_| ApiError::Unauthorized)?;

        let session = Session::find(&state.db, session_id)
            .await?
            .ok_or(ApiError::Unauthorized)?;
        if session.is_expired() {
            Session::delete(&state.db, session.id).await?;
            warn!(session_id = %session.id, "expired session presented");
            return Err(ApiError::Unauthorized);
        }

        let user = User::find_by_id(&state.db, session.user_id)
            .await?
            .ok_or(ApiError::Unauthorized)?;
        Ok(Caller(user))
    }
}

/// The single authorization rule: a caller may only act on their own
/// account and the things it owns. Every provided identity field must match
/// exactly.
pub fn authorize_self(
    caller: &User,
    user_id: Uuid,
    username: Option<&str>,
    email: Option<&str>,
) -> Result<(), ApiError> {
    let owner = caller.id == user_id
        && username.map_or(true, |u| u == caller.username)
        && email.map_or(true, |e| e.eq_ignore_ascii_case(&caller.email));
    if owner {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn caller() -> User {
        User {
            id: Uuid::new_v4(),
            username: "cook42".into(),
            email: "cook@example.com".into(),
            password_hash: "hash".into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn owner_passes_with_id_alone() {
        let user = caller();
        assert!(authorize_self(&user, user.id, None, None).is_ok());
    }

    #[test]
    fn owner_passes_with_all_fields_matching() {
        let user = caller();
        assert!(
            authorize_self(&user, user.id, Some("cook42"), Some("Cook@Example.com")).is_ok()
        );
    }

    #[test]
    fn foreign_user_id_is_forbidden() {
        let user = caller();
        let err = authorize_self(&user, Uuid::new_v4(), None, None).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[test]
    fn any_mismatched_field_is_forbidden() {
        let user = caller();
        assert!(authorize_self(&user, user.id, Some("someoneelse"), None).is_err());
        assert!(authorize_self(&user, user.id, None, Some("other@example.com")).is_err());
        assert!(
            authorize_self(&user, user.id, Some("cook42"), Some("other@example.com")).is_err()
        );
    }
}
