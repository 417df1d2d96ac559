use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;

/// Seeds the first admin account from FIRST_ADMIN_EMAIL/FIRST_ADMIN_PASSWORD.
/// Idempotent: an existing row is repaired in place when the password or role
/// drifted from the configured values.
pub(crate) async fn ensure_admin(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_admin_password.is_empty() {
        tracing::warn!("FIRST_ADMIN_PASSWORD not configured; skipping admin creation");
        return Ok(());
    }

    let email = &admin.first_admin_email;

    let user = repositories::users::find_by_email(state.db(), email).await?;

    if let Some(user) = user {
        let verified =
            security::verify_password(&admin.first_admin_password, &user.hashed_password)
                .unwrap_or(false);

        if verified && user.role == UserRole::Admin {
            tracing::info!("Default admin already up to date");
            return Ok(());
        }

        let hashed_password = if verified {
            user.hashed_password.clone()
        } else {
            security::hash_password(&admin.first_admin_password)?
        };

        sqlx::query("UPDATE users SET hashed_password = $1, role = $2 WHERE id = $3")
            .bind(hashed_password)
            .bind(UserRole::Admin)
            .bind(user.id)
            .execute(state.db())
            .await?;

        tracing::info!("Updated default admin {email}");
        return Ok(());
    }

    let hashed_password = security::hash_password(&admin.first_admin_password)?;

    sqlx::query(
        "INSERT INTO users (email, hashed_password, full_name, role, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(email)
    .bind(hashed_password)
    .bind("Administrator")
    .bind(UserRole::Admin)
    .bind(primitive_now_utc())
    .execute(state.db())
    .await?;

    tracing::info!("Created default admin {email}");
    Ok(())
}
