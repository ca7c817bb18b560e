// src/common/money.rs

use rust_decimal::{Decimal, RoundingStrategy};

/// Casas decimais de exibição para valores monetários.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Arredonda para 2 casas, meio para cima (convenção monetária).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Teto para qualquer valor monetário de entrada (subtotal, preço, valor fixo).
/// Mantém todo cálculo da conta muito abaixo do limite do `Decimal`.
pub const MAX_MONEY_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Teto de quantidade por linha do pedido.
pub const MAX_QUANTITY: i32 = 9999;

/// `base * rate / 100`, sem arredondar. `None` se estourar o `Decimal`.
pub fn percentage_of(base: Decimal, rate: Decimal) -> Option<Decimal> {
    base.checked_mul(rate)?.checked_div(Decimal::ONE_HUNDRED)
}

/// Soma que devolve `None` em vez de entrar em pânico no estouro.
pub fn checked_sum<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
}
