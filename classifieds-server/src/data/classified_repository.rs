use crate::domain::classified::{Classified, ClassifiedChanges, NewClassified};
use crate::domain::error::{DomainError, FieldError, FieldErrors};
use crate::domain::listing::{ListWindow, SortKey};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::error::ErrorKind;
use tracing::{error, info};

#[async_trait]
pub trait ClassifiedRepository: Send + Sync {
    async fn create(&self, classified: NewClassified) -> Result<Classified, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Classified>, DomainError>;
    /// Whole collection in id order when `window` is `None`.
    async fn list(&self, window: Option<ListWindow>) -> Result<Vec<Classified>, DomainError>;
    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        changes: ClassifiedChanges,
    ) -> Result<Option<Classified>, DomainError>;
    async fn delete(&self, id: i64, owner_id: i64) -> Result<(), DomainError>;
}

#[derive(Clone)]
pub struct PostgresClassifiedRepository {
    pool: PgPool,
}

impl PostgresClassifiedRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COLUMNS: &str = "id, user_id, title, price, description, created_at, updated_at";

/// Constraint violations are reported to the client as model errors.
fn write_error(action: &str, e: sqlx::Error) -> DomainError {
    let kind = e.as_database_error().map(|db| db.kind());
    let mut errors = FieldErrors::default();
    match kind {
        Some(ErrorKind::ForeignKeyViolation) => errors.add("user", FieldError::new("blank")),
        Some(ErrorKind::NotNullViolation) | Some(ErrorKind::CheckViolation) => {
            errors.add("base", FieldError::new("invalid"))
        }
        _ => {
            error!("failed to {} classified: {}", action, e);
            return DomainError::Internal(format!("database error: {}", e));
        }
    }
    info!("rejected classified {}: {}", action, e);
    DomainError::Validation(errors)
}

#[async_trait]
impl ClassifiedRepository for PostgresClassifiedRepository {
    async fn create(&self, classified: NewClassified) -> Result<Classified, DomainError> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Classified>(&format!(
            r#"
            INSERT INTO classifieds (user_id, title, price, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(classified.user_id)
        .bind(&classified.title)
        .bind(classified.price)
        .bind(&classified.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("create", e))?;

        info!(classified_id = created.id, user_id = created.user_id, "classified created");
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Classified>, DomainError> {
        sqlx::query_as::<_, Classified>(&format!("SELECT {COLUMNS} FROM classifieds WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_by_id {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn list(&self, window: Option<ListWindow>) -> Result<Vec<Classified>, DomainError> {
        let Some(window) = window else {
            return sqlx::query_as::<_, Classified>(&format!(
                "SELECT {COLUMNS} FROM classifieds ORDER BY id ASC"
            ))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching classifieds: {}", e);
                DomainError::Internal(e.to_string())
            });
        };

        let direction = window.order.as_sql();
        let order_by = match window.key {
            SortKey::Id => format!("id {direction}"),
            SortKey::CreatedAt => format!("created_at {direction}, id {direction}"),
        };

        sqlx::query_as::<_, Classified>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM classifieds
            ORDER BY {order_by}
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching classifieds page: {}", e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        changes: ClassifiedChanges,
    ) -> Result<Option<Classified>, DomainError> {
        let now = Utc::now();
        let classified = sqlx::query_as::<_, Classified>(&format!(
            r#"
            UPDATE classifieds
            SET
                title = COALESCE($1, title),
                price = COALESCE($2, price),
                description = COALESCE($3, description),
                updated_at = $4
            WHERE id = $5 AND user_id = $6
            RETURNING {COLUMNS}
            "#
        ))
        .bind(changes.title)
        .bind(changes.price)
        .bind(changes.description)
        .bind(now)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("update", e))?;

        if classified.is_some() {
            info!(classified_id = id, "classified updated");
        }

        Ok(classified)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> Result<(), DomainError> {
        let deleted = sqlx::query("DELETE FROM classifieds WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if deleted.rows_affected() == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM classifieds WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| DomainError::Internal(e.to_string()))?;

            return if exists {
                Err(DomainError::Forbidden)
            } else {
                Err(DomainError::ClassifiedNotFound(id.to_string()))
            };
        }

        info!(classified_id = id, "classified deleted");
        Ok(())
    }
}
