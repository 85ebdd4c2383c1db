//! Category Repository
//!
//! 删除前校验没有商品仍引用该分类，避免悬空的 category 引用。

use super::{BaseRepository, RepoError, RepoResult, Repository};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find category by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let mut rows: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?
            .take(0)?;
        Ok(rows.pop())
    }

    async fn ensure_name_free(&self, name: &str) -> RepoResult<()> {
        if self.find_by_name(name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category '{name}' already exists"
            )));
        }
        Ok(())
    }

    /// Count products still referencing the category
    async fn products_in(&self, id: &RecordId) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct CountRow {
            count: i64,
        }

        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() FROM product WHERE category = $cat GROUP ALL")
            .bind(("cat", id.clone()))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        id.parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid category ID format: {id}")))
    }
}

impl Repository<Category, CategoryCreate, CategoryUpdate> for CategoryRepository {
    /// List all categories, sortOrder first and name as tie-breaker
    async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let rows: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category ORDER BY sortOrder, name")
            .await?
            .take(0)?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        // 非法 id 文本视同不存在
        let Ok(record_id) = id.parse::<RecordId>() else {
            return Ok(None);
        };
        Ok(self.base.db().select(record_id).await?)
    }

    async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        self.ensure_name_free(&data.name).await?;

        let row = Category {
            id: None,
            name: data.name,
            icon: data.icon,
            sort_order: data.sort_order.unwrap_or(0),
            is_active: true,
        };

        let created: Option<Category> = self.base.db().create(TABLE).content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

        // 改名时才查重，改成当前名字不算冲突
        if let Some(ref new_name) = data.name
            && new_name != &existing.name
        {
            self.ensure_name_free(new_name).await?;
        }

        let mut rows: Vec<Category> = self
            .base
            .db()
            .query("UPDATE $id MERGE $data RETURN AFTER")
            .bind(("id", Self::parse_id(id)?))
            .bind(("data", data))
            .await?
            .take(0)?;
        rows.pop()
            .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
    }

    /// Hard delete. Refused while products still reference the category.
    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = Self::parse_id(id)?;

        let in_use = self.products_in(&record_id).await?;
        if in_use > 0 {
            return Err(RepoError::Validation(format!(
                "Category {id} still has {in_use} product(s)"
            )));
        }

        let deleted: Option<Category> = self.base.db().delete(record_id).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Category {id} not found")));
        }
        Ok(true)
    }
}
