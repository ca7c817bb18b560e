// src/services/menu_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::MenuRepository,
    models::menu::{
        CategoryRecord, CategoryTreeNode, IndentedCategory, MenuCategory, MenuItem, MenuStatistics,
    },
    services::category_tree::{self, MAX_CATEGORY_DEPTH},
};

fn ensure_room_below(parent_level: i32) -> Result<(), AppError> {
    if parent_level as usize >= MAX_CATEGORY_DEPTH {
        return Err(AppError::invalid_field(
            "parentId",
            format!("a árvore de categorias aceita no máximo {} níveis", MAX_CATEGORY_DEPTH),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct MenuService {
    menu_repo: MenuRepository,
}

impl MenuService {
    pub fn new(menu_repo: MenuRepository) -> Self {
        Self { menu_repo }
    }

    // --- CATEGORIAS ---

    pub async fn list_categories<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
    ) -> Result<Vec<MenuCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.menu_repo.list_categories(executor, merchant_id).await
    }

    pub async fn get_category_tree<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
    ) -> Result<Vec<CategoryTreeNode>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records: Vec<CategoryRecord> = self
            .menu_repo
            .list_categories(executor, merchant_id)
            .await?
            .into_iter()
            .map(CategoryRecord::from)
            .collect();

        category_tree::build_tree(&records)
    }

    pub async fn get_category_options<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
    ) -> Result<Vec<IndentedCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tree = self.get_category_tree(executor, merchant_id).await?;
        Ok(category_tree::flatten_tree(&tree))
    }

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        name: &str,
        description: Option<&str>,
        parent_id: Option<Uuid>,
    ) -> Result<MenuCategory, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // O pai precisa existir no mesmo restaurante, e ter espaço para mais um nível
        if let Some(parent) = parent_id {
            let parent_level = self
                .menu_repo
                .category_level(&mut *tx, merchant_id, parent, MAX_CATEGORY_DEPTH as i32)
                .await?
                .ok_or(AppError::CategoryNotFound)?;
            ensure_room_below(parent_level)?;
        }

        let category = self
            .menu_repo
            .create_category(&mut *tx, merchant_id, name, description, parent_id)
            .await?;

        tx.commit().await?;
        Ok(category)
    }

    pub async fn delete_category<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        category_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let detached = self
            .menu_repo
            .detach_children(&mut *tx, merchant_id, category_id)
            .await?;
        self.menu_repo
            .delete_category(&mut *tx, merchant_id, category_id)
            .await?;

        tx.commit().await?;

        tracing::info!(
            merchant_id = %merchant_id,
            category_id = %category_id,
            detached,
            "Categoria removida; subcategorias movidas para a raiz"
        );
        Ok(())
    }

    // --- ITENS ---

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
    ) -> Result<Vec<MenuItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.menu_repo.list_items(executor, merchant_id).await
    }

    pub async fn create_item<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        category_id: Option<Uuid>,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        available: bool,
    ) -> Result<MenuItem, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        if let Some(category) = category_id {
            if !self.menu_repo.category_exists(&mut *tx, merchant_id, category).await? {
                return Err(AppError::CategoryNotFound);
            }
        }

        let item = self
            .menu_repo
            .create_item(&mut *tx, merchant_id, category_id, name, description, price, available)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn get_statistics<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
    ) -> Result<MenuStatistics, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = self.menu_repo.list_items(executor, merchant_id).await?;
        Ok(category_tree::compute_menu_statistics(&items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_allowed_until_last_level() {
        assert!(ensure_room_below(1).is_ok());
        assert!(ensure_room_below(MAX_CATEGORY_DEPTH as i32 - 1).is_ok());
    }

    #[test]
    fn parent_at_last_level_cannot_get_children() {
        let err = ensure_room_below(MAX_CATEGORY_DEPTH as i32).unwrap_err();
        assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "parentId"));
    }
}
