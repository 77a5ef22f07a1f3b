use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{AuthResponse, RegisterRequest},
    queries::user_queries,
    utils::{extractors::AppJson, jwt},
};

const MIN_PASSWORD_LENGTH: usize = 8;

pub async fn register_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    validate_registration(&payload)?;

    let email = payload.email.trim().to_lowercase();

    if user_queries::find_by_email(&state.db, &email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    // a concurrent registration can still win the insert
    let user = user_queries::create_user(&state.db, &email, payload.name.trim(), &password_hash)
        .await?
        .ok_or_else(|| AppError::Conflict("Email already registered".to_string()))?;

    let token = jwt::generate_token(user.id, &user.email, user.role)?;

    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}

fn validate_registration(payload: &RegisterRequest) -> Result<()> {
    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name cannot be empty".to_string()));
    }

    if payload.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(())
}
