use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub social_provider: String,
    pub social_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub language_code: String,
    pub currency_code: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a user from verified social-provider claims
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub social_provider: &'a str,
    pub social_id: &'a str,
    pub email: Option<&'a str>,
    pub display_name: Option<&'a str>,
    pub language_code: &'a str,
    pub currency_code: &'a str,
    pub avatar_url: Option<&'a str>,
}

/// Partial profile update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub language_code: Option<String>,
    pub currency_code: Option<String>,
    pub avatar_url: Option<String>,
}

pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &PgPool, user: NewUser<'_>) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"INSERT INTO "user" (social_provider, social_id, email, display_name, language_code, currency_code, avatar_url)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING user_id, social_provider, social_id, email, display_name, language_code, currency_code, avatar_url, created_at, updated_at"#,
        )
        .bind(user.social_provider)
        .bind(user.social_id)
        .bind(user.email)
        .bind(user.display_name)
        .bind(user.language_code)
        .bind(user.currency_code)
        .bind(user.avatar_url)
        .fetch_one(pool)
        .await
        .context("Failed to create user")?;
        Ok(row)
    }

    pub async fn get_by_social(
        pool: &PgPool,
        provider: &str,
        social_id: &str,
    ) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT user_id, social_provider, social_id, email, display_name, language_code, currency_code, avatar_url, created_at, updated_at
               FROM "user" WHERE social_provider = $1 AND social_id = $2"#,
        )
        .bind(provider)
        .bind(social_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by social identity")?;
        Ok(row)
    }

    pub async fn get_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT user_id, social_provider, social_id, email, display_name, language_code, currency_code, avatar_url, created_at, updated_at
               FROM "user" WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by id")?;
        Ok(row)
    }

    /// Apply a partial profile update. Absent fields keep their value.
    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        update: UserProfileUpdate,
    ) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"UPDATE "user" SET
                   email = COALESCE($2, email),
                   display_name = COALESCE($3, display_name),
                   language_code = COALESCE($4, language_code),
                   currency_code = COALESCE($5, currency_code),
                   avatar_url = COALESCE($6, avatar_url),
                   updated_at = NOW()
               WHERE user_id = $1
               RETURNING user_id, social_provider, social_id, email, display_name, language_code, currency_code, avatar_url, created_at, updated_at"#,
        )
        .bind(user_id)
        .bind(update.email)
        .bind(update.display_name)
        .bind(update.language_code)
        .bind(update.currency_code)
        .bind(update.avatar_url)
        .fetch_optional(pool)
        .await
        .context("Failed to update user profile")?;
        Ok(row)
    }

    /// Delete a user. Itineraries and their children go with it (FK cascade).
    pub async fn delete(pool: &PgPool, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM "user" WHERE user_id = $1"#)
            .bind(user_id)
            .execute(pool)
            .await
            .context("Failed to delete user")?;
        Ok(result.rows_affected() > 0)
    }
}
