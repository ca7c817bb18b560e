// src/models/charges.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

/// `System` é obrigatória em todo pedido; `Optional` só entra se o caixa selecionar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "charge_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeKind {
    System,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "charge_calculation", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationType {
    Percentage, // usa `rate`
    Fixed,      // usa `amount`
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeDefinition {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(ignore)]
    pub merchant_id: Uuid,

    #[schema(example = "Taxa de Serviço")]
    pub name: String,

    pub kind: ChargeKind,
    pub calculation_type: CalculationType,

    #[schema(example = "5.00")]
    pub rate: Decimal,

    #[schema(example = "0.00")]
    pub amount: Decimal,

    #[schema(example = true)]
    pub active: bool,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Uma cobrança efetivamente aplicada na conta, já com o valor calculado.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppliedCharge {
    pub charge_id: Uuid,
    pub name: String,
    pub kind: ChargeKind,
    pub calculation_type: CalculationType,
    #[schema(example = "10.00")]
    pub amount: Decimal,
}

/// Agregados para relatório (só cobranças ativas).
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeSummary {
    #[schema(example = "5.00")]
    pub total_system_charge_rate: Decimal,
    #[schema(example = "20.00")]
    pub total_system_charges_amount: Decimal,
    pub system_charge_count: usize,
    pub optional_charge_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillResult {
    #[schema(example = "200.00")]
    pub total_bill: Decimal,
    pub applied_charges: Vec<AppliedCharge>,
    #[schema(example = "10.00")]
    pub total_charges: Decimal,
    #[schema(example = "210.00")]
    pub final_amount: Decimal,
    pub summary: ChargeSummary,
}
