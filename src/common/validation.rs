// src/common/validation.rs
//
// Validações customizadas para o `validator`. A mensagem é a chave do catálogo i18n.

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::common::money::MAX_MONEY_AMOUNT;

/// Valor monetário de entrada: entre 0 e `MAX_MONEY_AMOUNT`, inclusive.
pub fn validate_money_amount(val: &Decimal) -> Result<(), ValidationError> {
    if *val < Decimal::ZERO || *val > MAX_MONEY_AMOUNT {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.add_param("max".into(), &MAX_MONEY_AMOUNT.to_string());
        err.message = Some("validation.money_range".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_rate(val: &Decimal) -> Result<(), ValidationError> {
    if *val < Decimal::ZERO || *val > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.add_param("max".into(), &100.0);
        err.message = Some("validation.rate_range".into());
        return Err(err);
    }
    Ok(())
}
