use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use anyhow::anyhow;
use futures::future::{Ready, ready};

use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::AppError;
use crate::model::role::Role;
use crate::policy;

/// Verified identity claims for the current request. Built purely from the
/// signed token; the store is never consulted here.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub email: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract(req).map_err(Into::into))
    }
}

fn extract(req: &HttpRequest) -> Result<AuthUser, AppError> {
    // A missing or non-Bearer header is "no credentials at all", which is a
    // different failure kind than a bad token.
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthenticated)?;

    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| AppError::Internal(anyhow!("app config missing")))?;

    let claims = verify_token(token, &config.jwt_secret).map_err(|_| AppError::InvalidToken)?;
    let role = Role::from_id(claims.role).ok_or(AppError::InvalidToken)?;

    Ok(AuthUser {
        user_id: claims.user_id,
        email: claims.sub,
        role,
    })
}

impl AuthUser {
    /// Gate-level role requirement for admin-only routes.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if policy::can_manage_employees(self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}
