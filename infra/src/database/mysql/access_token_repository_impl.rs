//! MySQL implementation of the AccessTokenRepository trait.
//!
//! Uniqueness of `(user_id, name)` and `jti` is enforced by the table's unique
//! keys, so concurrent creates race inside the database and the loser gets a
//! conflict.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tk_core::domain::entities::{AccessTokenRecord, Identity, NewAccessToken};
use tk_core::errors::DomainError;
use tk_core::repositories::AccessTokenRepository;

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, name, access_token, refresh_token, jti, revoked, issued_on, last_used_on
    FROM access_tokens
"#;

/// MySQL implementation of AccessTokenRepository
pub struct MySqlAccessTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAccessTokenRepository {
    /// Create a new MySQL access token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to AccessTokenRecord entity
    fn row_to_record(row: &MySqlRow) -> Result<AccessTokenRecord, DomainError> {
        let id: String = row.try_get("id").map_err(decode_error("id"))?;
        let user_id: String = row.try_get("user_id").map_err(decode_error("user_id"))?;

        Ok(AccessTokenRecord {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid token UUID: {}", e),
            })?,
            user_id: Identity::from(user_id),
            name: row.try_get("name").map_err(decode_error("name"))?,
            access_token: row
                .try_get("access_token")
                .map_err(decode_error("access_token"))?,
            refresh_token: row
                .try_get("refresh_token")
                .map_err(decode_error("refresh_token"))?,
            jti: row.try_get("jti").map_err(decode_error("jti"))?,
            revoked: row.try_get("revoked").map_err(decode_error("revoked"))?,
            issued_on: row
                .try_get::<DateTime<Utc>, _>("issued_on")
                .map_err(decode_error("issued_on"))?,
            last_used_on: row
                .try_get::<Option<DateTime<Utc>>, _>("last_used_on")
                .map_err(decode_error("last_used_on"))?,
        })
    }
}

fn decode_error(column: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::Internal {
        message: format!("Failed to get {}: {}", column, e),
    }
}

/// Classify a sqlx failure into the domain taxonomy
///
/// Unique key violations are conflicts, connection level failures make the
/// store unavailable, anything else is internal.
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            tracing::warn!(operation, error = %err, "Unique constraint violated");
            DomainError::conflict(format!("Access token already exists: {}", db.message()))
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            tracing::error!(operation, error = %err, "Token store unavailable");
            DomainError::store_unavailable(format!("Failed to {}: {}", operation, err))
        }
        _ => {
            tracing::error!(operation, error = %err, "Token store query failed");
            DomainError::Internal {
                message: format!("Failed to {}: {}", operation, err),
            }
        }
    }
}

#[async_trait]
impl AccessTokenRepository for MySqlAccessTokenRepository {
    async fn create(&self, token: NewAccessToken) -> Result<AccessTokenRecord, DomainError> {
        // TIMESTAMP(6) keeps microseconds
        let issued_on = Utc::now().trunc_subsecs(6);
        let record = AccessTokenRecord::issue(token, Uuid::new_v4(), issued_on);

        let query = r#"
            INSERT INTO access_tokens (
                id, user_id, name, access_token, refresh_token, jti, revoked, issued_on
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(record.user_id.as_str())
            .bind(&record.name)
            .bind(&record.access_token)
            .bind(&record.refresh_token)
            .bind(&record.jti)
            .bind(record.revoked)
            .bind(record.issued_on)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create access token", e))?;

        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<AccessTokenRecord>, DomainError> {
        let query = format!("{} WHERE id = ? LIMIT 1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find access token by id", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn get_by_name(
        &self,
        user_id: &Identity,
        name: &str,
    ) -> Result<Option<AccessTokenRecord>, DomainError> {
        let query = format!("{} WHERE user_id = ? AND name = ? LIMIT 1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(user_id.as_str())
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find access token by name", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn get_by_jti(
        &self,
        user_id: &Identity,
        jti: &str,
    ) -> Result<Option<AccessTokenRecord>, DomainError> {
        let query = format!("{} WHERE user_id = ? AND jti = ? LIMIT 1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(user_id.as_str())
            .bind(jti)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find access token by jti", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn get_by_user(&self, user_id: &Identity) -> Result<Vec<AccessTokenRecord>, DomainError> {
        let query = format!("{} WHERE user_id = ? ORDER BY issued_on DESC", SELECT_COLUMNS);

        let rows = sqlx::query(&query)
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list access tokens", e))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn revoke(&self, user_id: &Identity, id: Uuid) -> Result<(), DomainError> {
        let query = r#"
            UPDATE access_tokens
            SET revoked = TRUE
            WHERE id = ? AND user_id = ?
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("revoke access token", e))?;

        if result.rows_affected() == 0 {
            tracing::debug!(user_id = %user_id, token_id = %id, "Revoke changed no rows");
        }
        Ok(())
    }

    async fn delete(&self, user_id: &Identity, id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete access token", e))?;

        if result.rows_affected() == 0 {
            tracing::debug!(user_id = %user_id, token_id = %id, "Delete matched no token");
        }
        Ok(())
    }

    async fn touch(&self, jti: &str, at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query("UPDATE access_tokens SET last_used_on = ? WHERE jti = ?")
            .bind(at)
            .bind(jti)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("record token usage", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failures_are_unavailable() {
        let err = map_sqlx_error("create access token", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DomainError::StoreUnavailable { .. }));
        assert!(err.is_retryable());

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = map_sqlx_error("get access token", sqlx::Error::Io(io));
        assert!(matches!(err, DomainError::StoreUnavailable { .. }));
    }

    #[test]
    fn test_other_failures_are_internal() {
        let err = map_sqlx_error("get access token", sqlx::Error::RowNotFound);
        assert!(matches!(err, DomainError::Internal { .. }));

        let err = map_sqlx_error(
            "get access token",
            sqlx::Error::ColumnNotFound("jti".to_string()),
        );
        assert!(!err.is_retryable());
    }
}
