//! SQLite implementation of the taxonomy ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqliteRow};
use sqlx::{Executor, Row, Sqlite, Transaction};

use catalog_domain::{
    AncestorPath, AttributeId, Category, CategoryAttribute, CategoryId, CategoryName,
    NewCategoryAttribute,
};

use super::map_sqlx_error;
use crate::infrastructure::ports::{RepoError, TaxonomyRepo, TaxonomyTx};

const ATTRIBUTE_COLUMNS: &str = "id, category_id, parent_id, description, level, \
                                 ancestor_path, parent_attribute, created_at";

/// Pool-level access to categories and attribute nodes.
#[derive(Clone)]
pub struct SqliteTaxonomyRepo {
    pool: SqlitePool,
}

impl SqliteTaxonomyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// One open transaction.
///
/// The inner transaction is taken on commit; an uncommitted handle rolls back
/// when dropped.
pub struct SqliteTaxonomyTx {
    tx: Option<Transaction<'static, Sqlite>>,
}

impl SqliteTaxonomyTx {
    fn conn(&mut self) -> Result<&mut SqliteConnection, RepoError> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| RepoError::database("transaction", "transaction already committed"))
    }
}

// =============================================================================
// Row mapping
// =============================================================================

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(RepoError::serialization)
}

fn row_to_attribute(row: &SqliteRow) -> Result<CategoryAttribute, RepoError> {
    let get_err = |e: sqlx::Error| RepoError::serialization(e);

    let path_json: String = row.try_get("ancestor_path").map_err(get_err)?;
    let ancestor_path: AncestorPath =
        serde_json::from_str(&path_json).map_err(RepoError::serialization)?;
    let level: i64 = row.try_get("level").map_err(get_err)?;
    let created_at: String = row.try_get("created_at").map_err(get_err)?;

    Ok(CategoryAttribute {
        id: AttributeId::from_raw(row.try_get("id").map_err(get_err)?),
        category_id: CategoryId::from_raw(row.try_get("category_id").map_err(get_err)?),
        parent_id: row
            .try_get::<Option<i64>, _>("parent_id")
            .map_err(get_err)?
            .map(AttributeId::from_raw),
        description: row.try_get("description").map_err(get_err)?,
        level: u32::try_from(level).map_err(RepoError::serialization)?,
        ancestor_path,
        parent_attribute: row.try_get("parent_attribute").map_err(get_err)?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn row_to_category(row: &SqliteRow) -> Result<Category, RepoError> {
    let get_err = |e: sqlx::Error| RepoError::serialization(e);
    let created_at: String = row.try_get("created_at").map_err(get_err)?;

    Ok(Category {
        id: CategoryId::from_raw(row.try_get("id").map_err(get_err)?),
        name: row.try_get("name").map_err(get_err)?,
        created_at: parse_timestamp(&created_at)?,
    })
}

// =============================================================================
// Queries shared by the pool and transaction handles
// =============================================================================

async fn fetch_attribute<'e, E>(
    executor: E,
    id: AttributeId,
) -> Result<Option<CategoryAttribute>, RepoError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {} FROM category_attributes WHERE id = ?",
        ATTRIBUTE_COLUMNS
    );
    let row = sqlx::query(&sql)
        .bind(id.get())
        .fetch_optional(executor)
        .await
        .map_err(|e| map_sqlx_error("get_attribute", e))?;

    row.as_ref().map(row_to_attribute).transpose()
}

async fn fetch_children<'e, E>(
    executor: E,
    id: AttributeId,
) -> Result<Vec<CategoryAttribute>, RepoError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {} FROM category_attributes WHERE parent_id = ? ORDER BY id",
        ATTRIBUTE_COLUMNS
    );
    let rows = sqlx::query(&sql)
        .bind(id.get())
        .fetch_all(executor)
        .await
        .map_err(|e| map_sqlx_error("list_children", e))?;

    rows.iter().map(row_to_attribute).collect()
}

async fn fetch_category<'e, E>(executor: E, id: CategoryId) -> Result<Option<Category>, RepoError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT id, name, created_at FROM categories WHERE id = ?")
        .bind(id.get())
        .fetch_optional(executor)
        .await
        .map_err(|e| map_sqlx_error("get_category", e))?;

    row.as_ref().map(row_to_category).transpose()
}

fn count_to_u64(count: i64) -> Result<u64, RepoError> {
    u64::try_from(count).map_err(RepoError::serialization)
}

// =============================================================================
// Port implementations
// =============================================================================

#[async_trait]
impl TaxonomyRepo for SqliteTaxonomyRepo {
    async fn begin(&self) -> Result<Box<dyn TaxonomyTx>, RepoError> {
        // Take the write lock up front so a second writer waits on busy_timeout
        // and then validates against the first writer's committed rows.
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;
        Ok(Box::new(SqliteTaxonomyTx { tx: Some(tx) }))
    }

    async fn create_category(
        &self,
        name: &CategoryName,
        created_at: DateTime<Utc>,
    ) -> Result<Category, RepoError> {
        let result = sqlx::query("INSERT INTO categories (name, created_at) VALUES (?, ?)")
            .bind(name.as_str())
            .bind(created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_category", e))?;

        Ok(Category::new(
            CategoryId::from_raw(result.last_insert_rowid()),
            name.as_str(),
            created_at,
        ))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        let rows = sqlx::query("SELECT id, name, created_at FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_categories", e))?;

        rows.iter().map(row_to_category).collect()
    }

    async fn get_attribute(&self, id: AttributeId) -> Result<Option<CategoryAttribute>, RepoError> {
        fetch_attribute(&self.pool, id).await
    }

    async fn list_root_attributes(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<CategoryAttribute>, RepoError> {
        let mut sql = format!(
            "SELECT {} FROM category_attributes WHERE level = 0",
            ATTRIBUTE_COLUMNS
        );
        if category_id.is_some() {
            sql.push_str(" AND category_id = ?");
        }
        sql.push_str(" ORDER BY id");

        let mut query = sqlx::query(&sql);
        if let Some(category_id) = category_id {
            query = query.bind(category_id.get());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_root_attributes", e))?;

        rows.iter().map(row_to_attribute).collect()
    }

    async fn list_children(&self, id: AttributeId) -> Result<Vec<CategoryAttribute>, RepoError> {
        fetch_children(&self.pool, id).await
    }
}

#[async_trait]
impl TaxonomyTx for SqliteTaxonomyTx {
    async fn get_attribute(
        &mut self,
        id: AttributeId,
    ) -> Result<Option<CategoryAttribute>, RepoError> {
        let conn = self.conn()?;
        fetch_attribute(&mut *conn, id).await
    }

    async fn get_category(&mut self, id: CategoryId) -> Result<Option<Category>, RepoError> {
        let conn = self.conn()?;
        fetch_category(&mut *conn, id).await
    }

    async fn find_sibling(
        &mut self,
        category_id: CategoryId,
        parent_id: Option<AttributeId>,
        description: &str,
    ) -> Result<Option<AttributeId>, RepoError> {
        let conn = self.conn()?;
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM category_attributes
            WHERE category_id = ? AND COALESCE(parent_id, 0) = ? AND description = ?
            "#,
        )
        .bind(category_id.get())
        .bind(parent_id.map(AttributeId::get).unwrap_or(0))
        .bind(description)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("find_sibling", e))?;

        Ok(id.map(AttributeId::from_raw))
    }

    async fn count_children(&mut self, id: AttributeId) -> Result<u64, RepoError> {
        let conn = self.conn()?;
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM category_attributes WHERE parent_id = ?")
                .bind(id.get())
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| map_sqlx_error("count_children", e))?;
        count_to_u64(count)
    }

    async fn count_attributes_in_category(&mut self, id: CategoryId) -> Result<u64, RepoError> {
        let conn = self.conn()?;
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM category_attributes WHERE category_id = ?")
                .bind(id.get())
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| map_sqlx_error("count_attributes_in_category", e))?;
        count_to_u64(count)
    }

    async fn insert_attribute(
        &mut self,
        attribute: &NewCategoryAttribute,
    ) -> Result<CategoryAttribute, RepoError> {
        let path_json =
            serde_json::to_string(&attribute.ancestor_path).map_err(RepoError::serialization)?;

        let conn = self.conn()?;
        let result = sqlx::query(
            r#"
            INSERT INTO category_attributes
                (category_id, parent_id, description, level, ancestor_path, parent_attribute, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(attribute.category_id.get())
        .bind(attribute.parent_id.map(AttributeId::get))
        .bind(attribute.description.as_str())
        .bind(i64::from(attribute.level))
        .bind(path_json)
        .bind(attribute.parent_attribute.as_deref())
        .bind(attribute.created_at.to_rfc3339())
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("insert_attribute", e))?;

        Ok(CategoryAttribute {
            id: AttributeId::from_raw(result.last_insert_rowid()),
            category_id: attribute.category_id,
            parent_id: attribute.parent_id,
            description: attribute.description.as_str().to_string(),
            level: attribute.level,
            ancestor_path: attribute.ancestor_path.clone(),
            parent_attribute: attribute.parent_attribute.clone(),
            created_at: attribute.created_at,
        })
    }

    async fn delete_attribute(&mut self, id: AttributeId) -> Result<(), RepoError> {
        let conn = self.conn()?;
        let result = sqlx::query("DELETE FROM category_attributes WHERE id = ?")
            .bind(id.get())
            .execute(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("delete_attribute", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("CategoryAttribute", id));
        }
        Ok(())
    }

    async fn delete_category(&mut self, id: CategoryId) -> Result<(), RepoError> {
        let conn = self.conn()?;
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id.get())
            .execute(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("delete_category", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Category", id));
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), RepoError> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| RepoError::database("commit", "transaction already committed"))?;
        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
    }
}
