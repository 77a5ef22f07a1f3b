use axum::{extract::Request, middleware::Next, response::Response};

use crate::{
    error::{AppError, Result},
    models::UserRole,
    utils::jwt::{self, Claims},
};

fn bearer_claims(req: &Request) -> Result<Claims> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))?;

    jwt::verify_token(token)
}

pub async fn admin_middleware(mut req: Request, next: Next) -> Result<Response> {
    let claims = bearer_claims(&req)?;

    if claims.role != UserRole::Admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    tracing::debug!("Admin request from {}", claims.email);
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
