use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::{
    dto::{
        ApiKeyRequest, ApiKeyResponse, ChangePasswordRequest, DeleteAccountRequest, LoginRequest,
        PublicUser, RegisterRequest, UpdateProfileRequest,
    },
    extractors::{authorize_self, Caller},
    password,
    repo_types::{ApiKey, Session, User},
};
use crate::errors::ApiError;
use crate::state::AppState;
use crate::validate;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/api-key", post(refresh_api_key))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me).put(update_profile).delete(delete_account))
        .route("/me/password", put(change_password))
}

fn session_cookie(name: &str, session: &Session, ttl: Duration) -> Cookie<'static> {
    Cookie::build((name.to_owned(), session.id.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(ttl)
        .build()
}

fn clear_session_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(name.to_owned()).path("/").build()
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let (username, email) = payload.validate().map_err(ApiError::Validation)?;

    if let Some(existing) = User::find_by_username_or_email(&state.db, &username, &email).await? {
        warn!(username = %username, "registration conflict");
        let field = if existing.username == username {
            "username"
        } else {
            "email"
        };
        return Err(ApiError::Conflict(format!("{field} already registered")));
    }

    let hash = password::hash_password(&payload.password)?;
    let user = User::create(&state.db, &username, &email, &hash).await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(PublicUser::from(&user))))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<PublicUser>), ApiError> {
    let user = User::find_by_username(&state.db, payload.username.trim())
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized);
    }

    let ttl = state.config.session.ttl(payload.keep_logged_in);
    let session = Session::create(&state.db, user.id, ttl).await?;

    info!(user_id = %user.id, keep_logged_in = payload.keep_logged_in, "user logged in");
    let cookie = session_cookie(&state.config.session.cookie_name, &session, ttl);
    Ok((jar.add(cookie), Json(PublicUser::from(&user))))
}

/// Deletes the session row if the cookie carries one; clears the cookie
/// either way.
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    if let Some(cookie) = jar.get(&state.config.session.cookie_name) {
        if let Ok(session_id) = Uuid::parse_str(cookie.value()) {
            Session::delete(&state.db, session_id).await?;
            info!(%session_id, "session ended");
        }
    }
    let jar = jar.remove(clear_session_cookie(&state.config.session.cookie_name));
    Ok((jar, StatusCode::NO_CONTENT))
}

#[instrument(skip(state, payload))]
pub async fn refresh_api_key(
    State(state): State<AppState>,
    Json(payload): Json<ApiKeyRequest>,
) -> Result<(StatusCode, Json<ApiKeyResponse>), ApiError> {
    let user = User::find_by_username(&state.db, payload.username.trim())
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "api key refresh invalid password");
        return Err(ApiError::Unauthorized);
    }

    let api_key = ApiKey::rotate(&state.db, user.id).await?;
    info!(user_id = %user.id, "api key rotated");
    Ok((
        StatusCode::CREATED,
        Json(ApiKeyResponse {
            api_key: api_key.key,
        }),
    ))
}

#[instrument(skip(user))]
pub async fn me(Caller(user): Caller) -> Json<PublicUser> {
    Json(PublicUser::from(&user))
}

#[instrument(skip(state, user, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    Caller(user): Caller,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let (username, email) = payload.validate().map_err(ApiError::Validation)?;
    let username = username.unwrap_or_else(|| user.username.clone());
    let email = email.unwrap_or_else(|| user.email.clone());

    if User::find_other_by_username_or_email(&state.db, &username, &email, user.id)
        .await?
        .is_some()
    {
        warn!(user_id = %user.id, "profile update conflict");
        return Err(ApiError::Conflict(
            "username or email already registered".into(),
        ));
    }

    let updated = User::update_profile(&state.db, user.id, &username, &email).await?;
    info!(user_id = %updated.id, "profile updated");
    Ok(Json(PublicUser::from(&updated)))
}

#[instrument(skip(state, user, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    Caller(user): Caller,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    if !password::verify_password(&payload.old_password, &user.password_hash)? {
        warn!(user_id = %user.id, "password change with bad old password");
        return Err(ApiError::Unauthorized);
    }

    validate::password(&payload.new_password).map_err(|e| ApiError::Validation(vec![e]))?;
    let hash = password::hash_password(&payload.new_password)?;
    User::update_password_hash(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}

/// Deleting the account requires retyping username and email and the
/// current password; everything the user owns goes with it.
#[instrument(skip(state, user, jar, payload))]
pub async fn delete_account(
    State(state): State<AppState>,
    Caller(user): Caller,
    jar: CookieJar,
    Json(payload): Json<DeleteAccountRequest>,
) -> Result<(CookieJar, StatusCode), ApiError> {
    authorize_self(
        &user,
        user.id,
        Some(payload.username.trim()),
        Some(payload.email.trim()),
    )?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "account deletion with bad password");
        return Err(ApiError::Unauthorized);
    }

    User::delete(&state.db, user.id).await?;
    info!(user_id = %user.id, "account deleted");

    let jar = jar.remove(clear_session_cookie(&state.config.session.cookie_name));
    Ok((jar, StatusCode::NO_CONTENT))
}
