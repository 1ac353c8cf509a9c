// irms-backend/src/api/handlers/auth_handler.rs

use crate::api::dto::auth_dto::{CurrentUserResponse, LoginRequest, LoginResponse};
use crate::api::dto::common::MessageResponse;
use crate::api::{AppState, CookieConfig};
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;
use validator::Validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/me", get(me_handler))
}

fn session_cookie(config: &CookieConfig, token: String, max_age_hours: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(config.session_cookie_name.clone(), token);
    cookie.set_http_only(config.http_only);
    cookie.set_secure(config.secure);
    cookie.set_path(config.path.clone());
    cookie.set_same_site(SameSite::Strict);
    cookie.set_max_age(time::Duration::hours(max_age_hours));
    cookie
}

pub async fn login_handler(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let (session_user, token) = app_state
        .auth_service
        .authenticate(&payload.email, &payload.password)
        .await?;

    let cookie = session_cookie(
        &app_state.cookie_config,
        token,
        app_state.jwt_manager.session_expiry_hours(),
    );

    info!(user_id = %session_user.user_id, "Session cookie issued");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            user: CurrentUserResponse::from(&session_user),
        }),
    ))
}

pub async fn logout_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    app_state.auth_service.logout(user.user()).await;

    // 有効期限切れのCookieで上書きして破棄する
    let expired = session_cookie(&app_state.cookie_config, String::new(), 0);

    Ok((
        jar.add(expired),
        Json(MessageResponse::new("Signed out successfully")),
    ))
}

pub async fn me_handler(user: AuthenticatedUser) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse::from(user.user()))
}
