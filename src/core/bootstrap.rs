use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;

/// Makes sure the configured first admin exists, is active, and can log in with the
/// configured password.
pub(crate) async fn ensure_first_admin(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().bootstrap_admin();
    let Some(password) = admin.password.as_deref() else {
        tracing::warn!("FIRST_ADMIN_PASSWORD not configured; skipping admin bootstrap");
        return Ok(());
    };

    let email = admin.email.to_lowercase();
    let now = primitive_now_utc();

    let Some(user) = repositories::users::find_by_email(state.db(), &email).await? else {
        let password_hash = security::hash_password(password)?;
        let created = repositories::users::create(
            state.db(),
            repositories::users::CreateUser {
                email: &email,
                password_hash,
                name: &admin.name,
                role: UserRole::Admin,
                department_id: None,
                is_active: true,
                created_at: now,
            },
        )
        .await?;
        tracing::info!(user_id = created.id, email = %email, "Created first admin");
        return Ok(());
    };

    let password_matches =
        security::verify_password(password, &user.password_hash).unwrap_or(false);
    let password_hash = if password_matches {
        None
    } else {
        Some(security::hash_password(password)?)
    };
    let role = (user.role != UserRole::Admin).then_some(UserRole::Admin);
    let is_active = (!user.is_active).then_some(true);

    if password_hash.is_none() && role.is_none() && is_active.is_none() {
        tracing::info!(user_id = user.id, "First admin already up to date");
        return Ok(());
    }

    repositories::users::update(
        state.db(),
        user.id,
        repositories::users::UpdateUser {
            name: None,
            role,
            is_active,
            password_hash,
            updated_at: now,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %email, "Updated first admin");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn promotes_and_reactivates_existing_account() {
        let ctx = test_support::setup_test_context().await;
        let email = ctx.state.settings().bootstrap_admin().email.to_lowercase();
        let user =
            test_support::insert_user(ctx.state.db(), &email, "Someone", UserRole::Evaluatee).await;
        repositories::users::update(
            ctx.state.db(),
            user.id,
            repositories::users::UpdateUser {
                name: None,
                role: None,
                is_active: Some(false),
                password_hash: None,
                updated_at: primitive_now_utc(),
            },
        )
        .await
        .expect("deactivate");

        ensure_first_admin(&ctx.state).await.expect("bootstrap");

        let user = repositories::users::find_by_id(ctx.state.db(), user.id)
            .await
            .expect("fetch")
            .expect("user");
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.is_active);
        assert!(security::verify_password(test_support::TEST_PASSWORD, &user.password_hash)
            .expect("verify"));
    }

    #[tokio::test]
    async fn creates_missing_admin_once() {
        let ctx = test_support::setup_test_context().await;

        ensure_first_admin(&ctx.state).await.expect("first run");
        ensure_first_admin(&ctx.state).await.expect("second run");

        let admins = repositories::users::list(ctx.state.db(), Some(UserRole::Admin))
            .await
            .expect("list admins");
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].email, "admin@example.com");
    }
}
