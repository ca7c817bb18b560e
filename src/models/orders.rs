// src/models/orders.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::validate_money_amount;

// Uma linha do pedido, como vem do caixa. O pedido em si não é persistido aqui.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    #[schema(example = "Paneer Tikka")]
    pub name: String,

    #[validate(range(min = 1, max = 9999, message = "validation.quantity_range"))]
    #[schema(example = 2)]
    pub quantity: i32,

    #[validate(custom(function = "validate_money_amount"))]
    #[schema(example = "180.00")]
    pub price: Decimal,

    // Se ausente, vale `price * quantity`
    #[validate(custom(function = "validate_money_amount"))]
    #[schema(example = "360.00")]
    pub subtotal: Option<Decimal>,
}

impl OrderLineItem {
    /// Total da linha; `None` se a multiplicação estourar o `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        match self.subtotal {
            Some(subtotal) => Some(subtotal),
            None => self.price.checked_mul(Decimal::from(self.quantity)),
        }
    }
}
