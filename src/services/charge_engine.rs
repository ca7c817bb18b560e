// src/services/charge_engine.rs
//
// Cálculo da conta: subtotal do pedido + cobranças do restaurante.
// Funções puras: recebem um "retrato" das cobranças e devolvem o resultado,
// sem tocar no banco. Toda validação acontece antes do primeiro cálculo.

use std::collections::HashSet;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        money::{checked_sum, percentage_of, round_money, MAX_MONEY_AMOUNT, MAX_QUANTITY},
    },
    models::{
        charges::{
            AppliedCharge, BillResult, CalculationType, ChargeDefinition, ChargeKind, ChargeSummary,
        },
        orders::OrderLineItem,
    },
};

fn overflow(field: &str) -> AppError {
    AppError::invalid_field(field, "valor grande demais para ser calculado")
}

fn validate_money(field: &str, owner: &str, value: Decimal) -> Result<(), AppError> {
    if value < Decimal::ZERO || value > MAX_MONEY_AMOUNT {
        return Err(AppError::invalid_field(
            field,
            format!(
                "o valor de '{}' deve estar entre 0 e {}, recebido {}",
                owner, MAX_MONEY_AMOUNT, value
            ),
        ));
    }
    Ok(())
}

fn validate_charge(charge: &ChargeDefinition) -> Result<(), AppError> {
    if charge.rate < Decimal::ZERO || charge.rate > Decimal::ONE_HUNDRED {
        return Err(AppError::invalid_field(
            "rate",
            format!(
                "a taxa da cobrança '{}' deve estar entre 0 e 100, recebido {}",
                charge.name, charge.rate
            ),
        ));
    }
    validate_money("amount", &charge.name, charge.amount)
}

fn charge_value(charge: &ChargeDefinition, total_bill: Decimal) -> Result<Decimal, AppError> {
    match charge.calculation_type {
        CalculationType::Percentage => percentage_of(total_bill, charge.rate)
            .map(round_money)
            .ok_or_else(|| overflow("rate")),
        CalculationType::Fixed => Ok(round_money(charge.amount)),
    }
}

/// Agregados das cobranças ativas, para relatórios.
pub fn summarize_charges(charges: &[ChargeDefinition]) -> ChargeSummary {
    charges
        .iter()
        .filter(|c| c.active)
        .fold(ChargeSummary::default(), |mut summary, charge| {
            match (charge.kind, charge.calculation_type) {
                (ChargeKind::System, CalculationType::Percentage) => {
                    summary.total_system_charge_rate += charge.rate;
                    summary.system_charge_count += 1;
                }
                (ChargeKind::System, CalculationType::Fixed) => {
                    summary.total_system_charges_amount += charge.amount;
                    summary.system_charge_count += 1;
                }
                (ChargeKind::Optional, _) => summary.optional_charge_count += 1,
            }
            summary
        })
}

/// Aplica as cobranças sobre o subtotal.
///
/// Cobranças `System` ativas entram sempre; `Optional` ativas só quando o id
/// está em `selected_optional_ids`. Ids desconhecidos, inativos ou de
/// cobranças de sistema na seleção são ignorados.
pub fn compute_bill(
    total_bill: Decimal,
    charges: &[ChargeDefinition],
    selected_optional_ids: &HashSet<Uuid>,
) -> Result<BillResult, AppError> {
    validate_money("totalBill", "subtotal", total_bill)?;
    for charge in charges {
        validate_charge(charge)?;
    }

    let applied_charges = charges
        .iter()
        .filter(|c| c.active)
        .filter(|c| match c.kind {
            ChargeKind::System => true,
            ChargeKind::Optional => selected_optional_ids.contains(&c.id),
        })
        .map(|c| {
            Ok(AppliedCharge {
                charge_id: c.id,
                name: c.name.clone(),
                kind: c.kind,
                calculation_type: c.calculation_type,
                amount: charge_value(c, total_bill)?,
            })
        })
        .collect::<Result<Vec<AppliedCharge>, AppError>>()?;

    let total_charges = checked_sum(applied_charges.iter().map(|c| c.amount))
        .ok_or_else(|| overflow("totalCharges"))?;
    let final_amount = total_bill
        .checked_add(total_charges)
        .map(round_money)
        .ok_or_else(|| overflow("finalAmount"))?;

    Ok(BillResult {
        total_bill,
        total_charges,
        final_amount,
        applied_charges,
        summary: summarize_charges(charges),
    })
}

/// Soma das linhas do pedido. O total nunca é aceito do cliente: é sempre recalculado aqui.
pub fn compute_order_total(items: &[OrderLineItem]) -> Result<Decimal, AppError> {
    for item in items {
        if item.quantity <= 0 || item.quantity > MAX_QUANTITY {
            return Err(AppError::invalid_field(
                "quantity",
                format!(
                    "a quantidade de '{}' deve estar entre 1 e {}, recebido {}",
                    item.name, MAX_QUANTITY, item.quantity
                ),
            ));
        }
        validate_money("price", &item.name, item.price)?;
        if let Some(subtotal) = item.subtotal {
            validate_money("subtotal", &item.name, subtotal)?;
        }
    }

    let lines = items
        .iter()
        .map(|item| item.line_total().ok_or_else(|| overflow("subtotal")))
        .collect::<Result<Vec<Decimal>, AppError>>()?;

    checked_sum(lines).ok_or_else(|| overflow("totalBill"))
}

pub fn compute_order_bill(
    items: &[OrderLineItem],
    charges: &[ChargeDefinition],
    selected_optional_ids: &HashSet<Uuid>,
) -> Result<BillResult, AppError> {
    let total_bill = compute_order_total(items)?;
    compute_bill(total_bill, charges, selected_optional_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn charge(
        kind: ChargeKind,
        calculation_type: CalculationType,
        rate: Decimal,
        amount: Decimal,
    ) -> ChargeDefinition {
        ChargeDefinition {
            id: Uuid::new_v4(),
            merchant_id: Uuid::nil(),
            name: "Cobrança".to_string(),
            kind,
            calculation_type,
            rate,
            amount,
            active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn system_percentage(rate: Decimal) -> ChargeDefinition {
        charge(ChargeKind::System, CalculationType::Percentage, rate, Decimal::ZERO)
    }

    fn optional_fixed(amount: Decimal) -> ChargeDefinition {
        charge(ChargeKind::Optional, CalculationType::Fixed, Decimal::ZERO, amount)
    }

    fn line(name: &str, quantity: i32, price: Decimal, subtotal: Option<Decimal>) -> OrderLineItem {
        OrderLineItem {
            name: name.into(),
            quantity,
            price,
            subtotal,
        }
    }

    fn none_selected() -> HashSet<Uuid> {
        HashSet::new()
    }

    #[test]
    fn no_charges_keeps_total() {
        let result = compute_bill(dec(150), &[], &none_selected()).unwrap();

        assert_eq!(result.total_charges, Decimal::ZERO);
        assert_eq!(result.final_amount, dec(150));
        assert!(result.applied_charges.is_empty());
        assert_eq!(result.summary, ChargeSummary::default());
    }

    #[test]
    fn single_percentage_charge_is_rounded_half_up() {
        // 99.99 * 12.5% = 12.49875 -> 12.50
        let total = Decimal::new(9999, 2);
        let charges = [system_percentage(Decimal::new(125, 1))];
        let result = compute_bill(total, &charges, &none_selected()).unwrap();

        assert_eq!(result.total_charges, Decimal::new(1250, 2));
        assert_eq!(result.final_amount, Decimal::new(11249, 2));
    }

    #[test]
    fn optional_charge_only_applies_when_selected() {
        let system = system_percentage(dec(5));
        let optional = optional_fixed(dec(20));
        let charges = vec![system, optional.clone()];

        let without = compute_bill(dec(200), &charges, &none_selected()).unwrap();
        assert_eq!(without.total_charges, dec(10));
        assert_eq!(without.final_amount, dec(210));
        assert_eq!(without.applied_charges.len(), 1);

        let selected: HashSet<Uuid> = [optional.id].into_iter().collect();
        let with = compute_bill(dec(200), &charges, &selected).unwrap();
        assert_eq!(with.total_charges, dec(30));
        assert_eq!(with.final_amount, dec(230));
        assert_eq!(with.applied_charges.len(), 2);
    }

    #[test]
    fn unselected_optionals_never_change_the_bill() {
        let system_only = vec![system_percentage(dec(10))];
        let mut with_optionals = system_only.clone();
        for amount in [5, 15, 50] {
            with_optionals.push(optional_fixed(dec(amount)));
        }

        let a = compute_bill(dec(80), &system_only, &none_selected()).unwrap();
        let b = compute_bill(dec(80), &with_optionals, &none_selected()).unwrap();

        assert_eq!(a.final_amount, b.final_amount);
        assert_eq!(b.summary.optional_charge_count, 3);
    }

    #[test]
    fn inactive_charges_are_ignored() {
        let mut inactive = system_percentage(dec(50));
        inactive.active = false;

        let result = compute_bill(dec(100), &[inactive], &none_selected()).unwrap();

        assert_eq!(result.final_amount, dec(100));
        assert_eq!(result.summary.system_charge_count, 0);
    }

    #[test]
    fn selecting_a_system_or_unknown_id_adds_nothing_extra() {
        let system = system_percentage(dec(5));
        let selected: HashSet<Uuid> = [system.id, Uuid::new_v4()].into_iter().collect();

        let result = compute_bill(dec(200), &[system], &selected).unwrap();

        assert_eq!(result.applied_charges.len(), 1);
        assert_eq!(result.final_amount, dec(210));
    }

    #[test]
    fn summary_aggregates_only_active_system_charges() {
        let mut inactive_fixed =
            charge(ChargeKind::System, CalculationType::Fixed, Decimal::ZERO, dec(99));
        inactive_fixed.active = false;
        let charges = vec![
            system_percentage(dec(5)),
            system_percentage(Decimal::new(25, 1)),
            charge(ChargeKind::System, CalculationType::Fixed, Decimal::ZERO, dec(20)),
            inactive_fixed,
            optional_fixed(dec(10)),
        ];

        let summary = summarize_charges(&charges);

        assert_eq!(summary.total_system_charge_rate, Decimal::new(75, 1));
        assert_eq!(summary.total_system_charges_amount, dec(20));
        assert_eq!(summary.system_charge_count, 3);
        assert_eq!(summary.optional_charge_count, 1);
    }

    #[test]
    fn final_amount_never_below_total() {
        let charges = vec![
            system_percentage(Decimal::ZERO),
            charge(ChargeKind::System, CalculationType::Fixed, Decimal::ZERO, Decimal::ZERO),
            system_percentage(Decimal::new(1, 2)),
        ];
        for cents in [0_i64, 1, 49, 12345, 999_999] {
            let total = Decimal::new(cents, 2);
            let result = compute_bill(total, &charges, &none_selected()).unwrap();
            assert!(result.final_amount >= total, "total {}", total);
        }
    }

    #[test]
    fn same_input_same_output() {
        let charges = vec![system_percentage(Decimal::new(175, 1)), optional_fixed(dec(3))];
        let selected: HashSet<Uuid> = [charges[1].id].into_iter().collect();

        let first = compute_bill(Decimal::new(4321, 2), &charges, &selected).unwrap();
        let second = compute_bill(Decimal::new(4321, 2), &charges, &selected).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn rejects_negative_total() {
        let err = compute_bill(dec(-1), &[], &none_selected()).unwrap_err();
        assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "totalBill"));
    }

    #[test]
    fn huge_total_is_rejected_instead_of_overflowing() {
        let charges = [system_percentage(dec(100))];

        let err = compute_bill(Decimal::MAX, &charges, &none_selected()).unwrap_err();
        assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "totalBill"));

        // No teto, com 100% de taxa, a conta ainda fecha
        let result = compute_bill(MAX_MONEY_AMOUNT, &charges, &none_selected()).unwrap();
        assert_eq!(result.final_amount, MAX_MONEY_AMOUNT * dec(2));
    }

    #[test]
    fn rejects_rate_out_of_range_even_when_inactive() {
        let mut bad = system_percentage(Decimal::new(1001, 1));
        bad.active = false;

        let err = compute_bill(dec(10), &[bad], &none_selected()).unwrap_err();
        assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "rate"));

        let negative = system_percentage(dec(-1));
        assert!(compute_bill(dec(10), &[negative], &none_selected()).is_err());
    }

    #[test]
    fn rejects_negative_or_huge_fixed_amount() {
        let err = compute_bill(dec(10), &[optional_fixed(dec(-5))], &none_selected()).unwrap_err();
        assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "amount"));

        let huge = optional_fixed(Decimal::MAX);
        assert!(compute_bill(dec(10), &[huge], &none_selected()).is_err());
    }

    #[test]
    fn order_total_uses_subtotal_or_price_times_quantity() {
        let items = vec![
            line("Naan", 3, Decimal::new(4050, 2), None),
            line("Lassi", 2, dec(60), Some(dec(100))),
        ];

        assert_eq!(compute_order_total(&items).unwrap(), Decimal::new(22150, 2));
    }

    #[test]
    fn order_bill_matches_reference_example() {
        let items = vec![line("Thali", 2, dec(100), None)];
        let charges = vec![system_percentage(dec(5)), optional_fixed(dec(20))];

        let result = compute_order_bill(&items, &charges, &none_selected()).unwrap();

        assert_eq!(result.total_bill, dec(200));
        assert_eq!(result.final_amount, dec(210));
    }

    #[test]
    fn order_rejects_bad_lines_before_computing() {
        let zero_qty = vec![line("Chai", 0, dec(20), None)];
        assert!(matches!(
            compute_order_total(&zero_qty),
            Err(AppError::InvalidField { ref field, .. }) if field == "quantity"
        ));

        let negative_price = vec![line("Chai", 1, dec(-20), None)];
        assert!(compute_order_total(&negative_price).is_err());

        let negative_subtotal = vec![line("Chai", 1, dec(20), Some(dec(-1)))];
        assert!(compute_order_total(&negative_subtotal).is_err());
    }

    #[test]
    fn order_with_huge_line_is_rejected_instead_of_overflowing() {
        let huge_quantity = vec![line("Chai", i32::MAX, dec(20), None)];
        assert!(matches!(
            compute_order_total(&huge_quantity),
            Err(AppError::InvalidField { ref field, .. }) if field == "quantity"
        ));

        let huge_price = vec![line("Chai", 2, Decimal::MAX / dec(2), None)];
        assert!(matches!(
            compute_order_total(&huge_price),
            Err(AppError::InvalidField { ref field, .. }) if field == "price"
        ));

        let huge_subtotal = vec![line("Chai", 1, dec(20), Some(Decimal::MAX))];
        assert!(compute_order_total(&huge_subtotal).is_err());

        // Maior linha aceita: teto de preço vezes teto de quantidade
        let largest = vec![line("Banquete", MAX_QUANTITY, MAX_MONEY_AMOUNT, None)];
        assert_eq!(
            compute_order_total(&largest).unwrap(),
            MAX_MONEY_AMOUNT * Decimal::from(MAX_QUANTITY)
        );
    }

    #[test]
    fn empty_order_totals_zero() {
        let charges = [system_percentage(dec(5))];
        let result = compute_order_bill(&[], &charges, &none_selected()).unwrap();
        assert_eq!(result.final_amount, Decimal::ZERO);
    }
}
