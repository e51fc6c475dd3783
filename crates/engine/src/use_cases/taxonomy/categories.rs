//! Category lifecycle: the containers attribute trees hang off.

use std::sync::Arc;

use catalog_domain::{Category, CategoryId, CategoryName};

use crate::infrastructure::ports::{ClockPort, RepoError, TaxonomyRepo};

use super::error::TaxonomyError;

/// Category operations.
pub struct CategoryOps {
    repo: Arc<dyn TaxonomyRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CategoryOps {
    pub fn new(repo: Arc<dyn TaxonomyRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repo, clock }
    }

    pub async fn create(&self, name: String) -> Result<Category, TaxonomyError> {
        let name = CategoryName::new(name)?;

        let category = self
            .repo
            .create_category(&name, self.clock.now())
            .await
            .map_err(|e| match e {
                RepoError::UniqueViolation(_) => TaxonomyError::DuplicateName(name.to_string()),
                other => other.into(),
            })?;

        tracing::info!(category_id = %category.id, name = %category.name, "Created category");
        Ok(category)
    }

    /// All categories in creation order.
    pub async fn list(&self) -> Result<Vec<Category>, TaxonomyError> {
        Ok(self.repo.list_categories().await?)
    }

    /// Delete a category that no attribute belongs to.
    ///
    /// Returns the deleted category.
    pub async fn delete(&self, id: CategoryId) -> Result<Category, TaxonomyError> {
        let mut tx = self.repo.begin().await?;

        let category = tx
            .get_category(id)
            .await?
            .ok_or_else(|| TaxonomyError::category_not_found(id))?;

        let attributes = tx.count_attributes_in_category(id).await?;
        if attributes > 0 {
            tracing::warn!(
                category_id = %id,
                attributes,
                "Rejected delete: category still has attributes"
            );
            return Err(TaxonomyError::HasDependents(id));
        }

        let delete_conflict = |e: RepoError| match e {
            RepoError::ForeignKeyViolation(_) => TaxonomyError::HasDependents(id),
            RepoError::NotFound { .. } => TaxonomyError::category_not_found(id),
            other => other.into(),
        };
        tx.delete_category(id).await.map_err(delete_conflict)?;
        tx.commit().await.map_err(delete_conflict)?;

        tracing::info!(category_id = %id, "Deleted category");
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockTaxonomyRepo, MockTaxonomyTx, TaxonomyTx};
    use crate::use_cases::taxonomy::error::ErrorKind;
    use crate::use_cases::taxonomy::test_support::fixed_clock;
    use chrono::{TimeZone, Utc};

    fn category(id: i64, name: &str) -> Category {
        Category::new(
            CategoryId::from_raw(id),
            name,
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        )
    }

    fn repo_with(tx: MockTaxonomyTx) -> MockTaxonomyRepo {
        let mut repo = MockTaxonomyRepo::new();
        repo.expect_begin()
            .return_once(move || Ok(Box::new(tx) as Box<dyn TaxonomyTx>));
        repo
    }

    #[tokio::test]
    async fn create_trims_and_stamps_name() {
        let mut repo = MockTaxonomyRepo::new();
        repo.expect_create_category()
            .withf(|name, created_at| {
                name.as_str() == "Safety Helmets" && created_at.timestamp() == 1_700_000_000
            })
            .returning(|name, created_at| {
                Ok(Category::new(CategoryId::from_raw(1), name.as_str(), created_at))
            });

        let created = CategoryOps::new(Arc::new(repo), fixed_clock())
            .create("  Safety Helmets ".into())
            .await
            .expect("create");

        assert_eq!(created.name, "Safety Helmets");
    }

    #[tokio::test]
    async fn duplicate_name_is_conflict() {
        let mut repo = MockTaxonomyRepo::new();
        repo.expect_create_category()
            .returning(|_, _| Err(RepoError::UniqueViolation("categories.name".into())));

        let err = CategoryOps::new(Arc::new(repo), fixed_clock())
            .create("Gloves".into())
            .await
            .expect_err("duplicate");

        assert!(matches!(err, TaxonomyError::DuplicateName(ref name) if name == "Gloves"));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn blank_name_is_rejected_without_store_call() {
        let mut repo = MockTaxonomyRepo::new();
        repo.expect_create_category().never();

        let result = CategoryOps::new(Arc::new(repo), fixed_clock())
            .create(" ".into())
            .await;

        assert!(matches!(result, Err(TaxonomyError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_empty_category() {
        let mut tx = MockTaxonomyTx::new();
        tx.expect_get_category()
            .returning(|id| Ok(Some(category(id.get(), "Gloves"))));
        tx.expect_count_attributes_in_category().returning(|_| Ok(0));
        tx.expect_delete_category().times(1).returning(|_| Ok(()));
        tx.expect_commit().times(1).returning(|| Ok(()));

        let deleted = CategoryOps::new(Arc::new(repo_with(tx)), fixed_clock())
            .delete(CategoryId::from_raw(2))
            .await
            .expect("delete");

        assert_eq!(deleted.id, CategoryId::from_raw(2));
        assert_eq!(deleted.name, "Gloves");
    }

    #[tokio::test]
    async fn delete_with_attributes_is_rejected() {
        let mut tx = MockTaxonomyTx::new();
        tx.expect_get_category()
            .returning(|id| Ok(Some(category(id.get(), "Helmets"))));
        tx.expect_count_attributes_in_category().returning(|_| Ok(3));
        tx.expect_delete_category().never();
        tx.expect_commit().never();

        let result = CategoryOps::new(Arc::new(repo_with(tx)), fixed_clock())
            .delete(CategoryId::from_raw(1))
            .await;

        assert!(matches!(result, Err(TaxonomyError::HasDependents(_))));
    }

    #[tokio::test]
    async fn delete_missing_category_is_not_found() {
        let mut tx = MockTaxonomyTx::new();
        tx.expect_get_category().returning(|_| Ok(None));
        tx.expect_delete_category().never();

        let result = CategoryOps::new(Arc::new(repo_with(tx)), fixed_clock())
            .delete(CategoryId::from_raw(9))
            .await;

        assert!(matches!(result, Err(TaxonomyError::NotFound { .. })));
    }

    #[tokio::test]
    async fn attribute_inserted_concurrently_blocks_delete() {
        let mut tx = MockTaxonomyTx::new();
        tx.expect_get_category()
            .returning(|id| Ok(Some(category(id.get(), "Helmets"))));
        tx.expect_count_attributes_in_category().returning(|_| Ok(0));
        tx.expect_delete_category()
            .returning(|_| Err(RepoError::ForeignKeyViolation("category_id".into())));
        tx.expect_commit().never();

        let result = CategoryOps::new(Arc::new(repo_with(tx)), fixed_clock())
            .delete(CategoryId::from_raw(1))
            .await;

        assert!(matches!(result, Err(TaxonomyError::HasDependents(_))));
    }
}
