//! # Client Repository
//!
//! Database operations for clients.
//!
//! Deleting a client cascades through the schema: its courses, their lessons
//! and its price overrides go with it.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use super::generate_id;
use crate::error::{DbError, DbResult};
use ledger_core::{Client, NewClient};

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) async fn fetch_all<'e>(executor: impl SqliteExecutor<'e>) -> DbResult<Vec<Client>> {
    let rows = sqlx::query_as::<_, ClientRow>(
        "SELECT id, name, created_at, updated_at FROM clients ORDER BY rowid",
    )
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(Client::from).collect())
}

pub(crate) async fn fetch_one<'e>(
    executor: impl SqliteExecutor<'e>,
    id: &str,
) -> DbResult<Option<Client>> {
    let row = sqlx::query_as::<_, ClientRow>(
        "SELECT id, name, created_at, updated_at FROM clients WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Client::from))
}

/// Repository for client database operations.
///
/// ## Usage
/// ```rust,ignore
/// let acme = db.clients().create(&NewClient { name: "Acme".into() }).await?;
/// db.clients().delete(&acme.id).await?; // courses, lessons, overrides go too
/// ```
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Lists all clients in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Client>> {
        fetch_all(&self.pool).await
    }

    /// Gets a client by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Client))` - Client found
    /// * `Ok(None)` - Client not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        fetch_one(&self.pool, id).await
    }

    /// Inserts a new client.
    ///
    /// ## Returns
    /// * `Err(DbError::BadValue)` - Empty or oversized name
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    pub async fn create(&self, input: &NewClient) -> DbResult<Client> {
        input.validate()?;

        let now = Utc::now();
        let client = Client {
            id: generate_id(),
            name: input.name.trim().to_string(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %client.id, name = %client.name, "Inserting client");

        sqlx::query("INSERT INTO clients (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&client.id)
            .bind(&client.name)
            .bind(client.created_at)
            .bind(client.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_duplicate_value(&client.name))?;

        Ok(client)
    }

    /// Renames a client.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Client doesn't exist
    /// * `Err(DbError::UniqueViolation)` - Another client has the name
    pub async fn rename(&self, id: &str, input: &NewClient) -> DbResult<Client> {
        input.validate()?;
        let name = input.name.trim();

        debug!(id = %id, name = %name, "Renaming client");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE clients SET name = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(name)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::from(e).with_duplicate_value(name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        let client = fetch_one(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Client", id))?;

        tx.commit().await?;
        Ok(client)
    }

    /// Deletes a client and everything it owns.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting client");

        let result = sqlx::query("DELETE FROM clients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        Ok(())
    }

    /// Counts clients (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
