//! PostgreSQL record store
//!
//! Each collection is one table. Updates lock the row, apply the patch in
//! process and write the row back inside one transaction. Insert
//! notifications arrive on the `<collection>_insert` channel raised by a
//! trigger, so rows added by other writers reach subscribers too.

use async_trait::async_trait;
use chrono::Utc;
use dashboard_core::types::{AccessLog, Client, Idea};
use dashboard_core::{Error, Result};
use sqlx::postgres::PgListener;
use sqlx::{PgConnection, PgPool};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{AccessLogDb, ClientDb, IdeaDb};
use crate::record::{ListQuery, RecordStore, StoredRecord, Subscription};
use crate::PgStore;

fn store_error(e: &sqlx::Error) -> Error {
    Error::Store(e.to_string())
}

fn lookup_error(e: sqlx::Error, collection: &str, id: &str) -> Error {
    match e {
        sqlx::Error::RowNotFound => Error::NotFound {
            resource: format!("{collection} record {id}"),
        },
        _ => Error::Store(e.to_string()),
    }
}

fn limit_param(query: &ListQuery) -> Option<i64> {
    query.limit.map(|limit| i64::try_from(limit).unwrap_or(i64::MAX))
}

/// Record type with a table in the PostgreSQL backend
#[async_trait]
pub trait PgTable: StoredRecord {
    /// Rows matching `query`, newest first
    async fn select(pool: &PgPool, query: &ListQuery) -> Result<Vec<Self>>;

    /// Insert a new row
    async fn insert(pool: &PgPool, record: &Self) -> Result<()>;

    /// Read a row and lock it for the rest of the transaction
    async fn lock(conn: &mut PgConnection, id: &str) -> Result<Self>;

    /// Overwrite the mutable columns of an existing row
    async fn store(conn: &mut PgConnection, record: &Self) -> Result<()>;

    /// Delete a row
    async fn remove(pool: &PgPool, id: &str) -> Result<()>;
}

/// Access log database operations
pub struct AccessLogQueries;

impl AccessLogQueries {
    /// Entries matching `query`, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<Vec<AccessLogDb>> {
        let sql = r"
            SELECT * FROM access_logs
            WHERE ($1::timestamptz IS NULL OR created_at < $1)
            ORDER BY created_at DESC
            LIMIT $2
        ";

        sqlx::query_as::<_, AccessLogDb>(sql)
            .bind(query.created_before)
            .bind(limit_param(query))
            .fetch_all(pool)
            .await
            .map_err(|e| store_error(&e))
    }

    /// Append an entry
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn insert(pool: &PgPool, row: &AccessLogDb) -> Result<()> {
        let sql = r"
            INSERT INTO access_logs (
                id, created_at, status, level, access_type, user_info, resource, method,
                status_code, ip_address, location, device, duration_ms, request_size,
                response_size, user_agent, referrer, session_id, request_id, error_message,
                stack_trace, tags, is_suspicious, is_bot, metadata
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23, $24, $25
            )
        ";

        sqlx::query(sql)
            .bind(&row.id)
            .bind(row.created_at)
            .bind(&row.status)
            .bind(&row.level)
            .bind(&row.access_type)
            .bind(&row.user_info)
            .bind(&row.resource)
            .bind(&row.method)
            .bind(row.status_code)
            .bind(&row.ip_address)
            .bind(&row.location)
            .bind(&row.device)
            .bind(row.duration_ms)
            .bind(row.request_size)
            .bind(row.response_size)
            .bind(&row.user_agent)
            .bind(&row.referrer)
            .bind(&row.session_id)
            .bind(&row.request_id)
            .bind(&row.error_message)
            .bind(&row.stack_trace)
            .bind(&row.tags)
            .bind(row.is_suspicious)
            .bind(row.is_bot)
            .bind(&row.metadata)
            .execute(pool)
            .await
            .map_err(|e| store_error(&e))?;

        Ok(())
    }

    /// Remove an entry
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or nothing was deleted.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<()> {
        delete_row(pool, "DELETE FROM access_logs WHERE id = $1", AccessLog::COLLECTION, id).await
    }
}

/// Client database operations
pub struct ClientQueries;

impl ClientQueries {
    /// Clients matching `query`, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<Vec<ClientDb>> {
        let sql = r"
            SELECT * FROM clients
            WHERE ($1::timestamptz IS NULL OR created_at < $1)
            ORDER BY created_at DESC
            LIMIT $2
        ";

        sqlx::query_as::<_, ClientDb>(sql)
            .bind(query.created_before)
            .bind(limit_param(query))
            .fetch_all(pool)
            .await
            .map_err(|e| store_error(&e))
    }

    /// Insert a client
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn insert(pool: &PgPool, row: &ClientDb) -> Result<()> {
        let sql = r"
            INSERT INTO clients (
                id, created_at, name, company, industry, website, status, contacts, revenue,
                lifetime_value, projects, health_score, nps, last_activity, tags, address,
                owner, team, source, deals
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20
            )
        ";

        sqlx::query(sql)
            .bind(&row.id)
            .bind(row.created_at)
            .bind(&row.name)
            .bind(&row.company)
            .bind(&row.industry)
            .bind(&row.website)
            .bind(&row.status)
            .bind(&row.contacts)
            .bind(row.revenue)
            .bind(row.lifetime_value)
            .bind(row.projects)
            .bind(row.health_score)
            .bind(row.nps)
            .bind(row.last_activity)
            .bind(&row.tags)
            .bind(&row.address)
            .bind(&row.owner)
            .bind(&row.team)
            .bind(&row.source)
            .bind(&row.deals)
            .execute(pool)
            .await
            .map_err(|e| store_error(&e))?;

        Ok(())
    }

    /// Read a client and lock its row
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the client is not found.
    pub async fn find_for_update(conn: &mut PgConnection, id: &str) -> Result<ClientDb> {
        sqlx::query_as::<_, ClientDb>("SELECT * FROM clients WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_one(conn)
            .await
            .map_err(|e| lookup_error(e, Client::COLLECTION, id))
    }

    /// Write back the editable columns
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn update(conn: &mut PgConnection, row: &ClientDb) -> Result<()> {
        let sql = r"
            UPDATE clients SET
                name = $2, company = $3, industry = $4, website = $5, status = $6,
                contacts = $7, last_activity = $8, deals = $9
            WHERE id = $1
        ";

        sqlx::query(sql)
            .bind(&row.id)
            .bind(&row.name)
            .bind(&row.company)
            .bind(&row.industry)
            .bind(&row.website)
            .bind(&row.status)
            .bind(&row.contacts)
            .bind(row.last_activity)
            .bind(&row.deals)
            .execute(conn)
            .await
            .map_err(|e| store_error(&e))?;

        Ok(())
    }

    /// Remove a client
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or nothing was deleted.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<()> {
        delete_row(pool, "DELETE FROM clients WHERE id = $1", Client::COLLECTION, id).await
    }
}

/// Feedback idea database operations
pub struct IdeaQueries;

impl IdeaQueries {
    /// Ideas matching `query`, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<Vec<IdeaDb>> {
        let sql = r"
            SELECT * FROM ideas
            WHERE ($1::timestamptz IS NULL OR created_at < $1)
            ORDER BY created_at DESC
            LIMIT $2
        ";

        sqlx::query_as::<_, IdeaDb>(sql)
            .bind(query.created_before)
            .bind(limit_param(query))
            .fetch_all(pool)
            .await
            .map_err(|e| store_error(&e))
    }

    /// Insert an idea
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn insert(pool: &PgPool, row: &IdeaDb) -> Result<()> {
        let sql = r"
            INSERT INTO ideas (
                id, created_at, updated_at, title, description, category, status, priority,
                votes, voters, comments, author, planned_release, linked_ideas, tags,
                impact_score, effort_score, admin_response, merged_into, subscribers, views,
                product
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22
            )
        ";

        sqlx::query(sql)
            .bind(&row.id)
            .bind(row.created_at)
            .bind(row.updated_at)
            .bind(&row.title)
            .bind(&row.description)
            .bind(&row.category)
            .bind(&row.status)
            .bind(&row.priority)
            .bind(row.votes)
            .bind(&row.voters)
            .bind(row.comments)
            .bind(&row.author)
            .bind(&row.planned_release)
            .bind(&row.linked_ideas)
            .bind(&row.tags)
            .bind(row.impact_score)
            .bind(row.effort_score)
            .bind(&row.admin_response)
            .bind(&row.merged_into)
            .bind(row.subscribers)
            .bind(row.views)
            .bind(&row.product)
            .execute(pool)
            .await
            .map_err(|e| store_error(&e))?;

        Ok(())
    }

    /// Read an idea and lock its row
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the idea is not found.
    pub async fn find_for_update(conn: &mut PgConnection, id: &str) -> Result<IdeaDb> {
        sqlx::query_as::<_, IdeaDb>("SELECT * FROM ideas WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_one(conn)
            .await
            .map_err(|e| lookup_error(e, Idea::COLLECTION, id))
    }

    /// Write back the columns board actions change
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn update(conn: &mut PgConnection, row: &IdeaDb) -> Result<()> {
        let sql = r"
            UPDATE ideas SET
                updated_at = $2, status = $3, votes = $4, voters = $5, linked_ideas = $6,
                admin_response = $7, merged_into = $8
            WHERE id = $1
        ";

        sqlx::query(sql)
            .bind(&row.id)
            .bind(row.updated_at)
            .bind(&row.status)
            .bind(row.votes)
            .bind(&row.voters)
            .bind(&row.linked_ideas)
            .bind(&row.admin_response)
            .bind(&row.merged_into)
            .execute(conn)
            .await
            .map_err(|e| store_error(&e))?;

        Ok(())
    }

    /// Remove an idea
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or nothing was deleted.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<()> {
        delete_row(pool, "DELETE FROM ideas WHERE id = $1", Idea::COLLECTION, id).await
    }
}

async fn delete_row(pool: &PgPool, sql: &str, collection: &str, id: &str) -> Result<()> {
    let result = sqlx::query(sql)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| store_error(&e))?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound {
            resource: format!("{collection} record {id}"),
        });
    }
    Ok(())
}

#[async_trait]
impl PgTable for AccessLog {
    async fn select(pool: &PgPool, query: &ListQuery) -> Result<Vec<Self>> {
        let rows = AccessLogQueries::list(pool, query).await?;
        Ok(rows.into_iter().map(Self::from).collect())
    }

    async fn insert(pool: &PgPool, record: &Self) -> Result<()> {
        AccessLogQueries::insert(pool, &AccessLogDb::from_record(record)).await
    }

    async fn lock(_conn: &mut PgConnection, id: &str) -> Result<Self> {
        Err(Error::ReadOnly {
            resource: format!("{} record {id}", Self::COLLECTION),
        })
    }

    async fn store(_conn: &mut PgConnection, record: &Self) -> Result<()> {
        Err(Error::ReadOnly {
            resource: format!("{} record {}", Self::COLLECTION, record.id),
        })
    }

    async fn remove(pool: &PgPool, id: &str) -> Result<()> {
        AccessLogQueries::delete(pool, id).await
    }
}

#[async_trait]
impl PgTable for Client {
    async fn select(pool: &PgPool, query: &ListQuery) -> Result<Vec<Self>> {
        let rows = ClientQueries::list(pool, query).await?;
        Ok(rows.into_iter().map(Self::from).collect())
    }

    async fn insert(pool: &PgPool, record: &Self) -> Result<()> {
        ClientQueries::insert(pool, &ClientDb::from_record(record)).await
    }

    async fn lock(conn: &mut PgConnection, id: &str) -> Result<Self> {
        ClientQueries::find_for_update(conn, id).await.map(Self::from)
    }

    async fn store(conn: &mut PgConnection, record: &Self) -> Result<()> {
        ClientQueries::update(conn, &ClientDb::from_record(record)).await
    }

    async fn remove(pool: &PgPool, id: &str) -> Result<()> {
        ClientQueries::delete(pool, id).await
    }
}

#[async_trait]
impl PgTable for Idea {
    async fn select(pool: &PgPool, query: &ListQuery) -> Result<Vec<Self>> {
        let rows = IdeaQueries::list(pool, query).await?;
        Ok(rows.into_iter().map(Self::from).collect())
    }

    async fn insert(pool: &PgPool, record: &Self) -> Result<()> {
        IdeaQueries::insert(pool, &IdeaDb::from_record(record)).await
    }

    async fn lock(conn: &mut PgConnection, id: &str) -> Result<Self> {
        IdeaQueries::find_for_update(conn, id).await.map(Self::from)
    }

    async fn store(conn: &mut PgConnection, record: &Self) -> Result<()> {
        IdeaQueries::update(conn, &IdeaDb::from_record(record)).await
    }

    async fn remove(pool: &PgPool, id: &str) -> Result<()> {
        IdeaQueries::delete(pool, id).await
    }
}

/// Channel the insert trigger of `collection` notifies on
#[must_use]
pub fn insert_channel(collection: &str) -> String {
    format!("{collection}_insert")
}

#[async_trait]
impl<R: PgTable> RecordStore<R> for PgStore {
    async fn list(&self, query: &ListQuery) -> Result<Vec<R>> {
        let records = R::select(self.pool(), query).await?;
        debug!(collection = R::COLLECTION, count = records.len(), "Listed records");
        Ok(records)
    }

    async fn create(&self, draft: R::Draft) -> Result<R> {
        let record = R::from_draft(Uuid::new_v4().to_string(), Utc::now(), draft);
        R::insert(self.pool(), &record).await?;
        debug!(collection = R::COLLECTION, id = record.id(), "Created record");
        Ok(record)
    }

    async fn update(&self, id: &str, patch: R::Patch) -> Result<R> {
        let mut tx = self.pool().begin().await.map_err(|e| store_error(&e))?;

        let mut record = R::lock(&mut *tx, id).await?;
        record.apply_patch(patch, Utc::now());
        R::store(&mut *tx, &record).await?;

        tx.commit().await.map_err(|e| store_error(&e))?;
        debug!(collection = R::COLLECTION, id, "Updated record");
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        R::remove(self.pool(), id).await?;
        debug!(collection = R::COLLECTION, id, "Deleted record");
        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription> {
        let channel = insert_channel(R::COLLECTION);
        let mut listener = PgListener::connect_with(self.pool())
            .await
            .map_err(|e| Error::Subscription(e.to_string()))?;
        listener
            .listen(&channel)
            .await
            .map_err(|e| Error::Subscription(e.to_string()))?;
        info!(channel = %channel, "Listening for inserts");

        let (sender, receiver) = mpsc::unbounded_channel();
        let forwarder = tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    Ok(notification) => {
                        if sender.send(notification.payload().to_string()).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(channel = %channel, error = %e, "Insert listener failed");
                        break;
                    }
                }
            }
        });

        Ok(Subscription::with_forwarder(receiver, forwarder))
    }
}
