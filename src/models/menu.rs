// src/models/menu.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Categorias do Cardápio (tabela plana, referenciando o pai) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub id: Uuid,
    #[schema(ignore)]
    pub merchant_id: Uuid,
    pub parent_id: Option<Uuid>,
    #[schema(example = "Entradas")]
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Registro plano usado pelo montador da árvore.
/// O `id` é opcional aqui porque também aceitamos listas vindas do cliente.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: Option<Uuid>,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub description: Option<String>,
}

impl From<MenuCategory> for CategoryRecord {
    fn from(category: MenuCategory) -> Self {
        Self {
            id: Some(category.id),
            name: category.name,
            parent_id: category.parent_id,
            description: category.description,
        }
    }
}

// --- 2. Árvore (derivada, nunca persistida) ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTreeNode {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub description: Option<String>,
    #[schema(no_recursion)]
    pub children: Vec<CategoryTreeNode>,
}

impl CategoryTreeNode {
    /// Quantos nós existem abaixo deste (filhos, netos, ...).
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&CategoryTreeNode> = self.children.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

// Linha "achatada" para selects com indentação (ex.: "-- Sobremesas Geladas")
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndentedCategory {
    pub id: Uuid,
    pub name: String,
    #[schema(example = 1)]
    pub depth: usize,
}

// --- 3. Itens do Cardápio ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    #[schema(ignore)]
    pub merchant_id: Uuid,
    pub category_id: Option<Uuid>,
    #[schema(example = "Butter Chicken")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "320.00")]
    pub price: Decimal,
    #[schema(example = true)]
    pub available: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// --- 4. Estatísticas do Cardápio ---
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuStatistics {
    #[schema(example = 2)]
    pub count: usize,
    #[schema(example = "20.00")]
    pub average_price: Decimal,
    // [min, max], ou null com cardápio vazio
    #[schema(value_type = Option<Vec<f64>>, example = json!([10.0, 30.0]))]
    pub price_range: Option<[Decimal; 2]>,
}
