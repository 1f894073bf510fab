use anyhow::anyhow;
use chrono::Utc;
use sqlx::MySqlPool;
use tracing::info;

use crate::auth::password::hash_password;
use crate::config::Config;
use crate::model::role::Role;
use crate::model::user::{LeaveBalances, NewUser};
use crate::store::{Store, StoreError};

pub async fn init_db(database_url: &str) -> MySqlPool {
    MySqlPool::connect(database_url)
        .await
        .expect("Failed to connect to database")
}

/// Out-of-band admin provisioning: create the configured admin account if it
/// does not exist yet. Signup never grants the admin role, so this is the
/// only way an admin comes into existence.
pub async fn seed_admin(store: &dyn Store, config: &Config) -> anyhow::Result<()> {
    let (Some(email), Some(password)) =
        (config.admin_email.as_deref(), config.admin_password.as_deref())
    else {
        return Ok(());
    };

    let email = email.trim().to_lowercase();
    if store.find_user_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let hashed = hash_password(password)
        .map_err(|e| anyhow!("admin password hashing failed: {e}"))?;

    let result = store
        .insert_user(
            NewUser {
                name: config
                    .admin_name
                    .clone()
                    .unwrap_or_else(|| "Administrator".to_string()),
                email,
                department: "Administration".to_string(),
                joining_date: Utc::now().date_naive(),
                password: hashed,
                role_id: Role::Admin.id(),
            },
            // Admins do not file leave requests; no grant needed.
            LeaveBalances::default(),
        )
        .await;

    match result {
        Ok(admin_id) => {
            info!(admin_id, "Seeded bootstrap admin account");
            Ok(())
        }
        // Another instance seeded it first.
        Err(StoreError::DuplicateEmail) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
