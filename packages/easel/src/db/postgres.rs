//! Postgres document store.
//!
//! Every collection is a table of JSONB documents (see
//! `schema/migrations`). Field filters and sorts are pushed down into SQL;
//! updates are applied in Rust under a row lock so both backends share the
//! same update semantics.

use std::collections::{HashMap, HashSet};

use clients::easel::Document;
use color_eyre::{
    Result,
    eyre::{Context, bail},
};
use derive_more::Debug;
use sqlx::{
    PgPool, QueryBuilder,
    migrate::{Migrate, Migrator},
    types::Json,
};
use uuid::Uuid;

use super::{Collection, DocumentId, Filter, Find, Order, Sort, StoredDocument, Update};

type Row = (Uuid, Json<Document>);

/// A connected Postgres database instance.
#[derive(Clone, Debug)]
#[debug("Postgres(pool_size = {})", self.pool.size())]
pub struct Postgres {
    pub pool: PgPool,
}

impl Postgres {
    /// The migrator for the database.
    pub const MIGRATOR: Migrator = sqlx::migrate!("./schema/migrations");

    /// Connect to the Postgres database.
    #[tracing::instrument(name = "Postgres::connect", skip(url))]
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        Ok(Self { pool })
    }

    /// Ping the database to ensure the connection is alive.
    #[tracing::instrument(name = "Postgres::ping")]
    pub async fn ping(&self) -> Result<()> {
        let pong = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("ping database")?;
        if pong != 1 {
            bail!("database ping failed; unexpected response: {pong}");
        }
        Ok(())
    }

    /// Validate that all migrations have been applied to the database.
    ///
    /// Fails if a migration is dirty, pending, or was modified after it was
    /// applied. This does NOT apply migrations; use the `migrate` command for
    /// that.
    #[tracing::instrument(name = "Postgres::validate_migrations")]
    pub async fn validate_migrations(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await.context("acquire connection")?;

        conn.ensure_migrations_table()
            .await
            .context("ensure migrations table")?;

        if let Some(version) = conn.dirty_version().await.context("check dirty version")? {
            bail!(
                "Database has a dirty migration (version {version}). \
                 Manually resolve the issue and re-run 'easel migrate'."
            );
        }

        let applied = conn
            .list_applied_migrations()
            .await
            .context("list applied migrations")?
            .into_iter()
            .map(|m| (m.version, m.checksum))
            .collect::<HashMap<_, _>>();

        let expected = Self::MIGRATOR
            .iter()
            .filter(|m| m.migration_type.is_up_migration())
            .collect::<Vec<_>>();

        let mut pending = expected
            .iter()
            .filter(|m| !applied.contains_key(&m.version))
            .map(|m| m.version)
            .collect::<Vec<_>>();
        pending.sort();
        if !pending.is_empty() {
            let versions = pending
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            bail!("Database has pending migrations: [{versions}]. Run 'easel migrate' first.");
        }

        let mismatched = expected
            .iter()
            .filter(|m| applied.get(&m.version).is_some_and(|sum| *sum != m.checksum))
            .map(|m| m.version.to_string())
            .collect::<Vec<_>>();
        if !mismatched.is_empty() {
            bail!(
                "Applied migrations were modified after being applied: [{}].",
                mismatched.join(", ")
            );
        }

        let known = expected.iter().map(|m| m.version).collect::<HashSet<_>>();
        let mut unknown = applied
            .keys()
            .filter(|version| !known.contains(version))
            .copied()
            .collect::<Vec<_>>();
        unknown.sort();
        if !unknown.is_empty() && !Self::MIGRATOR.ignore_missing {
            bail!("Database has migrations missing from this build: {unknown:?}.");
        }

        Ok(())
    }

    #[tracing::instrument(name = "Postgres::insert", skip(document))]
    pub async fn insert(&self, collection: Collection, document: Document) -> Result<DocumentId> {
        let sql = format!(
            "INSERT INTO {} (doc) VALUES ($1) RETURNING id",
            collection.table()
        );
        let id = sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(Json(document))
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("insert into {collection}"))?;
        Ok(DocumentId::from(id))
    }

    #[tracing::instrument(name = "Postgres::find")]
    pub async fn find(&self, collection: Collection, find: &Find) -> Result<Vec<StoredDocument>> {
        let mut query = QueryBuilder::new("SELECT id, doc FROM ");
        query.push(collection.table());
        push_filter(&mut query, &find.filter);
        push_order(&mut query, find.sort.as_ref());
        if let Some(limit) = find.limit {
            let limit = i64::try_from(limit).context("limit out of range")?;
            query.push(" LIMIT ").push_bind(limit);
        }

        let rows = query
            .build_query_as::<Row>()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("find in {collection}"))?;
        Ok(rows.into_iter().map(stored).collect())
    }

    #[tracing::instrument(name = "Postgres::find_one")]
    pub async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<StoredDocument>> {
        let mut query = QueryBuilder::new("SELECT id, doc FROM ");
        query.push(collection.table());
        push_filter(&mut query, filter);
        push_order(&mut query, None);
        query.push(" LIMIT 1");

        let row = query
            .build_query_as::<Row>()
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("find one in {collection}"))?;
        Ok(row.map(stored))
    }

    /// Apply updates to the document with the given id.
    ///
    /// Returns `false` if there is no such document.
    #[tracing::instrument(name = "Postgres::update_one")]
    pub async fn update_one(
        &self,
        collection: Collection,
        id: DocumentId,
        updates: &[Update],
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT doc FROM {} WHERE id = $1 FOR UPDATE",
            collection.table()
        );
        let row = sqlx::query_scalar::<_, Json<Document>>(&select)
            .bind(id.as_uuid())
            .fetch_optional(tx.as_mut())
            .await
            .with_context(|| format!("lock document in {collection}"))?;
        let Some(Json(mut document)) = row else {
            return Ok(false);
        };

        Update::apply_all(updates, &mut document)
            .with_context(|| format!("apply updates to {collection} document {id}"))?;

        let update = format!("UPDATE {} SET doc = $2 WHERE id = $1", collection.table());
        sqlx::query(&update)
            .bind(id.as_uuid())
            .bind(Json(&document))
            .execute(tx.as_mut())
            .await
            .with_context(|| format!("write document in {collection}"))?;

        tx.commit().await.context("commit transaction")?;
        Ok(true)
    }

    /// Delete the first document, in insertion order, matching the filter.
    #[tracing::instrument(name = "Postgres::delete_one")]
    pub async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<bool> {
        let mut query = QueryBuilder::new("DELETE FROM ");
        query
            .push(collection.table())
            .push(" WHERE seq = (SELECT seq FROM ")
            .push(collection.table());
        push_filter(&mut query, filter);
        query.push(" ORDER BY seq LIMIT 1)");

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .with_context(|| format!("delete one from {collection}"))?;
        Ok(result.rows_affected() > 0)
    }
}

fn stored((id, Json(fields)): Row) -> StoredDocument {
    StoredDocument {
        id: DocumentId::from(id),
        fields,
    }
}

fn push_filter(query: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &Filter) {
    match filter {
        Filter::All => {}
        Filter::Id(id) => {
            query.push(" WHERE id = ").push_bind(id.as_uuid());
        }
        Filter::Field { name, value } => {
            query
                .push(" WHERE doc -> ")
                .push_bind(*name)
                .push(" = to_jsonb(")
                .push_bind(value.clone())
                .push("::text)");
        }
    }
}

fn push_order(query: &mut QueryBuilder<'_, sqlx::Postgres>, sort: Option<&Sort>) {
    match sort {
        Some(sort) => {
            let direction = match sort.order {
                Order::Ascending => "ASC",
                Order::Descending => "DESC",
            };
            query
                .push(" ORDER BY doc -> ")
                .push_bind(sort.field)
                .push(" ")
                .push(direction)
                .push(" NULLS LAST, seq");
        }
        None => {
            query.push(" ORDER BY seq");
        }
    }
}
