// src/db/charge_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::charges::{CalculationType, ChargeDefinition, ChargeKind},
};

// Dados de escrita de uma cobrança (criação e atualização usam o mesmo formato).
#[derive(Debug, Clone)]
pub struct ChargeInput<'a> {
    pub name: &'a str,
    pub kind: ChargeKind,
    pub calculation_type: CalculationType,
    pub rate: Decimal,
    pub amount: Decimal,
    pub active: bool,
}

#[derive(Clone, Default)]
pub struct ChargeRepository;

impl ChargeRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Leitura
    // ---

    /// Retrato de todas as cobranças do restaurante (ativas e inativas).
    pub async fn list_charges<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
    ) -> Result<Vec<ChargeDefinition>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let charges = sqlx::query_as::<_, ChargeDefinition>(
            "SELECT * FROM charges WHERE merchant_id = $1 ORDER BY kind ASC, created_at ASC",
        )
        .bind(merchant_id)
        .fetch_all(executor)
        .await?;
        Ok(charges)
    }

    // ---
    // Escrita
    // ---

    pub async fn create_charge<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        input: &ChargeInput<'_>,
    ) -> Result<ChargeDefinition, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let charge = sqlx::query_as::<_, ChargeDefinition>(
            r#"
            INSERT INTO charges (merchant_id, name, kind, calculation_type, rate, amount, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(merchant_id)
        .bind(input.name)
        .bind(input.kind)
        .bind(input.calculation_type)
        .bind(input.rate)
        .bind(input.amount)
        .bind(input.active)
        .fetch_one(executor)
        .await?;
        Ok(charge)
    }

    pub async fn update_charge<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        charge_id: Uuid,
        input: &ChargeInput<'_>,
    ) -> Result<ChargeDefinition, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ChargeDefinition>(
            r#"
            UPDATE charges
            SET name = $3, kind = $4, calculation_type = $5, rate = $6, amount = $7, active = $8,
                updated_at = NOW()
            WHERE merchant_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(merchant_id)
        .bind(charge_id)
        .bind(input.name)
        .bind(input.kind)
        .bind(input.calculation_type)
        .bind(input.rate)
        .bind(input.amount)
        .bind(input.active)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ChargeNotFound)
    }

    pub async fn delete_charge<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        charge_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM charges WHERE merchant_id = $1 AND id = $2")
            .bind(merchant_id)
            .bind(charge_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ChargeNotFound);
        }
        Ok(())
    }
}
