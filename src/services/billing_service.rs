// src/services/billing_service.rs

use std::collections::HashSet;

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ChargeInput, ChargeRepository},
    models::{
        charges::{BillResult, ChargeDefinition, ChargeSummary},
        orders::OrderLineItem,
    },
    services::charge_engine,
};

#[derive(Clone)]
pub struct BillingService {
    repo: ChargeRepository,
}

impl BillingService {
    pub fn new(repo: ChargeRepository) -> Self {
        Self { repo }
    }

    // --- CRUD DE COBRANÇAS ---

    pub async fn list_charges<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
    ) -> Result<Vec<ChargeDefinition>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_charges(executor, merchant_id).await
    }

    pub async fn create_charge<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        input: &ChargeInput<'_>,
    ) -> Result<ChargeDefinition, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let charge = self.repo.create_charge(executor, merchant_id, input).await?;
        tracing::info!(merchant_id = %merchant_id, charge_id = %charge.id, "Cobrança criada");
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
        self.repo.update_charge(executor, merchant_id, charge_id, input).await
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
        self.repo.delete_charge(executor, merchant_id, charge_id).await?;
        tracing::info!(merchant_id = %merchant_id, charge_id = %charge_id, "Cobrança removida");
        Ok(())
    }

    pub async fn get_summary<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
    ) -> Result<ChargeSummary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let charges = self.repo.list_charges(executor, merchant_id).await?;
        Ok(charge_engine::summarize_charges(&charges))
    }

    // --- CÁLCULO DA CONTA ---
    // Uma única leitura das cobranças = um retrato consistente para o cálculo.

    pub async fn preview_bill<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        total_bill: Decimal,
        selected_optional_ids: &HashSet<Uuid>,
    ) -> Result<BillResult, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let charges = self.repo.list_charges(executor, merchant_id).await?;
        let bill = charge_engine::compute_bill(total_bill, &charges, selected_optional_ids)?;

        tracing::debug!(
            merchant_id = %merchant_id,
            total_bill = %bill.total_bill,
            final_amount = %bill.final_amount,
            "Prévia de conta calculada"
        );
        Ok(bill)
    }

    pub async fn bill_order<'e, E>(
        &self,
        executor: E,
        merchant_id: Uuid,
        items: &[OrderLineItem],
        selected_optional_ids: &HashSet<Uuid>,
    ) -> Result<BillResult, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // As linhas são validadas uma única vez, dentro do cálculo
        let charges = self.repo.list_charges(executor, merchant_id).await?;
        let bill = charge_engine::compute_order_bill(items, &charges, selected_optional_ids)?;

        tracing::debug!(
            merchant_id = %merchant_id,
            lines = items.len(),
            total_bill = %bill.total_bill,
            total_charges = %bill.total_charges,
            final_amount = %bill.final_amount,
            "Conta do pedido calculada"
        );
        Ok(bill)
    }
}
