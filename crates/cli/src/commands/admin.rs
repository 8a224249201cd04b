//! Admin account commands.
//!
//! The first super admin has to be created here; after that, super admins
//! manage accounts from the dashboard.

use esep_admin::models::AdminUserForm;
use esep_core::AdminRole;
use esep_admin::models::admin_user::{validate_password, validate_username};
use esep_admin::services::AdminAuthService;

use super::{CommandError, connect};

/// Create an admin account. Returns nothing; the new id is logged.
pub async fn create_user(
    username: &str,
    role: AdminRole,
    password: String,
) -> Result<(), CommandError> {
    let form = AdminUserForm {
        username: username.to_string(),
        password,
        role: role.to_string(),
    };
    let draft = form
        .validate()
        .map_err(|e| CommandError::Invalid(e.to_string()))?;

    let pool = connect().await?;
    let id = AdminAuthService::new(&pool).create_admin(&draft).await?;

    tracing::info!(
        admin_user_id = %id,
        username = %draft.username,
        role = %draft.role,
        "Admin account created"
    );
    Ok(())
}

/// Replace the password of `username`.
pub async fn set_password(username: &str, password: &str) -> Result<(), CommandError> {
    let username = validate_username(username).map_err(|e| CommandError::Invalid(e.to_string()))?;
    validate_password(password).map_err(|e| CommandError::Invalid(e.to_string()))?;

    let pool = connect().await?;
    AdminAuthService::new(&pool)
        .set_password(&username, password)
        .await?;

    tracing::info!(%username, "Password updated");
    Ok(())
}
