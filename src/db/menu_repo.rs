// src/db/menu_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::menu::{MenuCategory, MenuItem},
};

#[derive(Clone, Default)]
pub struct MenuRepository;

impl MenuRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Categorias
    // ---

    // Ordem de criação: é a ordem que a árvore preserva entre irmãos.
    pub async fn list_categories<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
    ) -> Result<Vec<MenuCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories = sqlx::query_as::<_, MenuCategory>(
            "SELECT * FROM menu_categories WHERE merchant_id = $1 ORDER BY created_at ASC, name ASC",
        )
        .bind(merchant_id)
        .fetch_all(executor)
        .await?;
        Ok(categories)
    }

    pub async fn category_exists<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        category_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM menu_categories WHERE merchant_id = $1 AND id = $2)",
        )
        .bind(merchant_id)
        .bind(category_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    /// Nível da categoria na árvore (raiz = 1), subindo pelos pais até `max_level`.
    /// `None` se a categoria não existe.
    pub async fn category_level<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        category_id: Uuid,
        max_level: i32,
    ) -> Result<Option<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let level: Option<i32> = sqlx::query_scalar(
            r#"
            WITH RECURSIVE lineage AS (
                SELECT id, parent_id, 1 AS level
                FROM menu_categories
                WHERE merchant_id = $1 AND id = $2
                UNION ALL
                SELECT c.id, c.parent_id, l.level + 1
                FROM menu_categories c
                JOIN lineage l ON c.id = l.parent_id
                WHERE c.merchant_id = $1 AND l.level < $3
            )
            SELECT MAX(level) FROM lineage
            "#,
        )
        .bind(merchant_id)
        .bind(category_id)
        .bind(max_level)
        .fetch_one(executor)
        .await?;
        Ok(level)
    }

    /// Cria uma categoria (raiz ou subcategoria).
    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        name: &str,
        description: Option<&str>,
        parent_id: Option<Uuid>,
    ) -> Result<MenuCategory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, MenuCategory>(
            r#"
            INSERT INTO menu_categories (merchant_id, name, description, parent_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(merchant_id)
        .bind(name)
        .bind(description)
        .bind(parent_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CategoryNameAlreadyExists(name.to_string());
                }
            }
            e.into()
        })
    }

    /// Sobe os filhos para a raiz antes de apagar (nunca apagamos subárvores em cascata).
    pub async fn detach_children<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        category_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE menu_categories SET parent_id = NULL, updated_at = NOW()
            WHERE merchant_id = $1 AND parent_id = $2
            "#,
        )
        .bind(merchant_id)
        .bind(category_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_category<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        category_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM menu_categories WHERE merchant_id = $1 AND id = $2")
            .bind(merchant_id)
            .bind(category_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::CategoryNotFound);
        }
        Ok(())
    }

    // ---
    // Itens
    // ---

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
    ) -> Result<Vec<MenuItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, MenuItem>(
            "SELECT * FROM menu_items WHERE merchant_id = $1 ORDER BY name ASC",
        )
        .bind(merchant_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
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
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            INSERT INTO menu_items (merchant_id, category_id, name, description, price, available)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(merchant_id)
        .bind(category_id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(available)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }
}
