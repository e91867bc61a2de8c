use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BudgetRow {
    pub budget_id: Uuid,
    pub itinerary_id: Uuid,
    pub category: String,
    pub amount: f64,
    pub currency: String,
    pub spent_at: DateTime<Utc>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBudget<'a> {
    pub category: &'a str,
    pub amount: f64,
    pub currency: &'a str,
    pub spent_at: DateTime<Utc>,
    pub description: Option<&'a str>,
}

pub struct BudgetRepo;

impl BudgetRepo {
    pub async fn create(
        pool: &PgPool,
        itinerary_id: Uuid,
        budget: NewBudget<'_>,
    ) -> Result<BudgetRow> {
        let row = sqlx::query_as::<_, BudgetRow>(
            r#"INSERT INTO budget (itinerary_id, category, amount, currency, spent_at, description)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING budget_id, itinerary_id, category, amount, currency, spent_at, description, created_at, updated_at"#,
        )
        .bind(itinerary_id)
        .bind(budget.category)
        .bind(budget.amount)
        .bind(budget.currency)
        .bind(budget.spent_at)
        .bind(budget.description)
        .fetch_one(pool)
        .await
        .context("Failed to create budget entry")?;
        Ok(row)
    }

    pub async fn list_for_itinerary(pool: &PgPool, itinerary_id: Uuid) -> Result<Vec<BudgetRow>> {
        let rows = sqlx::query_as::<_, BudgetRow>(
            r#"SELECT budget_id, itinerary_id, category, amount, currency, spent_at, description, created_at, updated_at
               FROM budget WHERE itinerary_id = $1
               ORDER BY spent_at DESC"#,
        )
        .bind(itinerary_id)
        .fetch_all(pool)
        .await
        .context("Failed to list budget entries")?;
        Ok(rows)
    }
}
