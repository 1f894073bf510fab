use actix_web::{HttpResponse, web};
use anyhow::anyhow;
use serde_json::json;
use tracing::{debug, error, info, instrument};

use crate::{
    auth::{
        jwt::generate_access_token,
        password::{hash_password, verify_password},
    },
    config::Config,
    error::AppError,
    model::{
        role::Role,
        user::{LeaveBalances, NewUser},
    },
    models::{LoginReqDto, LoginResponse, SignupReqDto},
    policy,
    store::Store,
    utils::{email_cache, email_filter},
};

/// true  => email AVAILABLE
/// false => email TAKEN
pub async fn is_email_available(email: &str, store: &dyn Store) -> bool {
    let email = email.to_lowercase();

    // Cuckoo filter: fast negative. If the filter has never seen the email
    // it cannot be taken.
    if !email_filter::might_exist(&email) {
        return true;
    }

    // Moka cache: fast positive.
    if email_cache::is_taken(&email).await {
        return false;
    }

    // Store fallback; treat lookup failures as taken (fail-safe).
    match store.find_user_by_email(&email).await {
        Ok(Some(_)) => false,
        Ok(None) => true,
        Err(_) => false,
    }
}

/// Employee signup. Always creates an EMPLOYEE account with the default
/// leave grant; admin accounts only exist via the startup seed.
pub async fn signup(
    body: web::Json<SignupReqDto>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let name = body.name.trim();
    let email = body.email.trim().to_lowercase();
    let department = body.department.trim();

    if name.is_empty() || email.is_empty() || department.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "name, email, department and password must not be empty".into(),
        ));
    }

    if !is_email_available(&email, store.get_ref()).await {
        return Err(AppError::DuplicateEmail);
    }

    let hashed = hash_password(&body.password)
        .map_err(|e| AppError::Internal(anyhow!("password hashing failed: {e}")))?;

    // The store enforces uniqueness again; the availability check above is
    // only a fast path.
    let user_id = store
        .insert_user(
            NewUser {
                name: name.to_owned(),
                email: email.clone(),
                department: department.to_owned(),
                joining_date: body.joining_date,
                password: hashed,
                role_id: Role::Employee.id(),
            },
            LeaveBalances::default_grant(),
        )
        .await?;

    email_filter::insert(&email);
    email_cache::mark_taken(&email).await;

    info!(user_id, "User created");

    Ok(HttpResponse::Created().json(json!({
        "message": "User created successfully",
        "userId": user_id
    })))
}

#[instrument(
    name = "auth_login",
    skip(store, config, body),
    fields(email = %body.email)
)]
pub async fn login(
    body: web::Json<LoginReqDto>,
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    let email = body.email.trim().to_lowercase();
    if email.is_empty() || body.password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(AppError::Validation("Email and password required".into()));
    }

    debug!("Fetching user from store");

    // Unknown account and wrong password intentionally share one error.
    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    debug!(user_id = user.id, "User found, verifying password");

    if verify_password(&body.password, &user.password).is_err() {
        info!("Invalid credentials: password mismatch");
        return Err(AppError::InvalidCredentials);
    }

    let role = Role::from_id(user.role_id).ok_or_else(|| {
        AppError::Internal(anyhow!("user {} has unknown role id {}", user.id, user.role_id))
    })?;

    // Admin-scoped login refuses to mint a downgraded token.
    if body.admin_only && !policy::can_manage_employees(role) {
        info!("Admin-only login refused for non-admin account");
        return Err(AppError::Forbidden);
    }

    debug!("Generating access token");

    let token = generate_access_token(
        user.id,
        user.email.clone(),
        user.role_id,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| AppError::Internal(e.into()))?;

    // Non-fatal bookkeeping.
    if let Err(e) = store.touch_last_login(user.id).await {
        error!(error = %e, "Failed to update last_login_at");
    }

    info!("Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}
