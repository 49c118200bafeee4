use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::DealInput;
use crate::payments::math::monthly_payment;
use crate::types::*;

// ---------------------------------------------------------------------------
// Strategy defaults (decimal fractions unless noted)
// ---------------------------------------------------------------------------

pub const FLIP_HOLDING_MONTHS: Decimal = dec!(6);
pub const FLIP_SELLING_COST_RATE: Ratio = dec!(0.08);
pub const FLIP_DOWN_PAYMENT_RATE: Ratio = dec!(0.20);
pub const FLIP_INTEREST_RATE: Ratio = dec!(0.10);
pub const FLIP_POINTS_RATE: Ratio = dec!(0.02);

pub const RENTAL_MAINTENANCE_SHARE: Ratio = dec!(0.05);
pub const RENTAL_VACANCY_RATE: Ratio = dec!(0.05);
pub const RENTAL_MANAGEMENT_RATE: Ratio = dec!(0.08);
pub const RENTAL_DOWN_PAYMENT_RATE: Ratio = dec!(0.25);
pub const RENTAL_INTEREST_RATE: Ratio = dec!(0.075);
pub const RENTAL_TERM_YEARS: Decimal = dec!(30);

pub const STR_OCCUPANCY_RATE: Ratio = dec!(0.55);
pub const STR_PLATFORM_FEE_RATE: Ratio = dec!(0.03);
pub const STR_CLEANING_FEE: Money = dec!(120);
pub const STR_AVG_STAY_NIGHTS: Decimal = dec!(3);
pub const STR_MONTHLY_UTILITIES: Money = dec!(350);
pub const STR_MONTHLY_SUPPLIES: Money = dec!(120);
pub const STR_MAINTENANCE_SHARE: Ratio = dec!(0.05);
pub const STR_MANAGEMENT_RATE: Ratio = dec!(0.15);
/// Nightly rate proxy: long-term rent times this premium, spread over 30 nights.
pub const STR_RENT_PREMIUM: Decimal = dec!(1.6);
pub const STR_MIN_NIGHTLY_RATE: Money = dec!(80);

const NIGHTS_PER_MONTH: Decimal = dec!(30);
const MONTHS_PER_YEAR: Decimal = dec!(12);

fn ratio(value: Decimal) -> Ratio {
    value.round_dp(4)
}

fn quotient(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Whole months or years; negatives count as zero.
fn whole(value: Option<Decimal>, default: Decimal) -> Decimal {
    value.unwrap_or(default).round().max(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Flip
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipBudget {
    pub purchase_price: Money,
    pub arv: Money,
    pub rehab_total: Money,
    pub holding_months: Decimal,
    pub holding_cost: Money,
    pub selling_cost_rate: Ratio,
    pub selling_costs: Money,
    pub loan_amount: Money,
    pub down_payment: Money,
    pub interest_rate: Ratio,
    pub interest_cost: Money,
    pub points_rate: Ratio,
    pub points_cost: Money,
    pub total_investment: Money,
    pub profit: Money,
    /// Profit over cash in (down payment, rehab, points); zero with no cash in.
    pub roi: Ratio,
}

/// Buy, renovate, hold on interest-only financing, and resell at ARV.
pub fn calculate_flip_budget(input: &DealInput) -> FlipBudget {
    let form = &input.form;
    let purchase_price = input.purchase_price();
    let arv = input.arv();
    let rehab_total = input.rehab_total();

    let holding_months = whole(form.holding_months, FLIP_HOLDING_MONTHS);
    let holding_cost = form
        .monthly_holding_cost
        .unwrap_or_default()
        .saturating_mul(holding_months);

    let selling_cost_rate = form.selling_cost_rate.unwrap_or(FLIP_SELLING_COST_RATE);
    let selling_costs = arv.saturating_mul(selling_cost_rate);

    let down_payment_rate = form.down_payment_rate.unwrap_or(FLIP_DOWN_PAYMENT_RATE);
    let down_payment = purchase_price.saturating_mul(down_payment_rate);
    let loan_amount = purchase_price.saturating_sub(down_payment).max(Decimal::ZERO);

    let interest_rate = form.interest_rate.unwrap_or(FLIP_INTEREST_RATE);
    let points_rate = form.points_rate.unwrap_or(FLIP_POINTS_RATE);
    let points_cost = loan_amount.saturating_mul(points_rate);
    let interest_cost = loan_amount
        .saturating_mul(interest_rate)
        .saturating_mul(holding_months)
        .checked_div(MONTHS_PER_YEAR)
        .unwrap_or(Decimal::ZERO);

    let total_investment = purchase_price
        .saturating_add(rehab_total)
        .saturating_add(holding_cost)
        .saturating_add(selling_costs)
        .saturating_add(points_cost)
        .saturating_add(interest_cost);
    let profit = arv.saturating_sub(total_investment);
    let cash_in = down_payment
        .saturating_add(rehab_total)
        .saturating_add(points_cost);

    FlipBudget {
        purchase_price: round_money(purchase_price),
        arv: round_money(arv),
        rehab_total: round_money(rehab_total),
        holding_months,
        holding_cost: round_money(holding_cost),
        selling_cost_rate,
        selling_costs: round_money(selling_costs),
        loan_amount: round_money(loan_amount),
        down_payment: round_money(down_payment),
        interest_rate,
        interest_cost: round_money(interest_cost),
        points_rate,
        points_cost: round_money(points_cost),
        total_investment: round_money(total_investment),
        profit: round_money(profit),
        roi: ratio(quotient(profit, cash_in)),
    }
}

// ---------------------------------------------------------------------------
// Long-term rental
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalBudget {
    pub purchase_price: Money,
    pub monthly_rent: Money,
    pub effective_rent: Money,
    pub monthly_expenses: Money,
    pub mortgage_payment: Money,
    pub net_cashflow: Money,
    pub annual_noi: Money,
    pub cap_rate: Ratio,
    pub dscr: Ratio,
    pub loan_amount: Money,
    pub down_payment: Money,
}

pub fn calculate_rental_budget(input: &DealInput) -> RentalBudget {
    let form = &input.form;
    let purchase_price = input.purchase_price();
    let monthly_rent = input.market_rent();

    let vacancy_rate = form.vacancy_rate.unwrap_or(RENTAL_VACANCY_RATE);
    let effective_rent = monthly_rent.saturating_mul(Decimal::ONE.saturating_sub(vacancy_rate));
    let management = effective_rent
        .saturating_mul(form.management_rate.unwrap_or(RENTAL_MANAGEMENT_RATE));
    let maintenance = form
        .monthly_maintenance
        .unwrap_or_else(|| monthly_rent.saturating_mul(RENTAL_MAINTENANCE_SHARE));
    let monthly_expenses = form
        .monthly_taxes
        .unwrap_or_default()
        .saturating_add(form.monthly_insurance.unwrap_or_default())
        .saturating_add(form.monthly_hoa.unwrap_or_default())
        .saturating_add(maintenance)
        .saturating_add(management);

    let down_payment = purchase_price
        .saturating_mul(form.down_payment_rate.unwrap_or(RENTAL_DOWN_PAYMENT_RATE));
    let loan_amount = purchase_price.saturating_sub(down_payment).max(Decimal::ZERO);

    let interest_rate = form.interest_rate.unwrap_or(RENTAL_INTEREST_RATE).max(Decimal::ZERO);
    let term_months = whole(form.term_years, RENTAL_TERM_YEARS)
        .checked_mul(MONTHS_PER_YEAR)
        .and_then(|m| m.to_u32())
        .unwrap_or(0);
    let mortgage_payment = monthly_payment(
        loan_amount,
        interest_rate.saturating_mul(Decimal::ONE_HUNDRED),
        term_months,
    );

    let operating = effective_rent.saturating_sub(monthly_expenses);
    let net_cashflow = operating.saturating_sub(mortgage_payment);
    let annual_noi = operating.saturating_mul(MONTHS_PER_YEAR);

    RentalBudget {
        purchase_price: round_money(purchase_price),
        monthly_rent: round_money(monthly_rent),
        effective_rent: round_money(effective_rent),
        monthly_expenses: round_money(monthly_expenses),
        mortgage_payment: round_money(mortgage_payment),
        net_cashflow: round_money(net_cashflow),
        annual_noi: round_money(annual_noi),
        cap_rate: ratio(quotient(annual_noi, purchase_price)),
        dscr: ratio(quotient(operating, mortgage_payment)),
        loan_amount: round_money(loan_amount),
        down_payment: round_money(down_payment),
    }
}

// ---------------------------------------------------------------------------
// Short-term rental
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirbnbBudget {
    pub nightly_rate: Money,
    pub occupancy_rate: Ratio,
    pub booked_nights: Decimal,
    pub gross_monthly: Money,
    pub monthly_expenses: Money,
    pub net_monthly: Money,
}

/// Monthly take for a furnished short-term rental. Without a nightly rate
/// the long-term rent is marked up into one, never below the floor.
pub fn calculate_airbnb_budget(input: &DealInput) -> AirbnbBudget {
    let form = &input.form;
    let nightly_rate = match form.nightly_rate.filter(|r| *r > Decimal::ZERO) {
        Some(rate) => rate,
        None => quotient(
            input.market_rent().saturating_mul(STR_RENT_PREMIUM),
            NIGHTS_PER_MONTH,
        )
        .max(STR_MIN_NIGHTLY_RATE),
    };

    let occupancy_rate = form.occupancy_rate.unwrap_or(STR_OCCUPANCY_RATE);
    let booked_nights = NIGHTS_PER_MONTH.saturating_mul(occupancy_rate);
    let gross_monthly = nightly_rate.saturating_mul(booked_nights);

    let avg_stay = form
        .avg_stay_nights
        .unwrap_or(STR_AVG_STAY_NIGHTS)
        .max(Decimal::ONE);
    let stays = quotient(booked_nights, avg_stay).max(Decimal::ONE);
    let cleaning = form
        .cleaning_fee_cost
        .unwrap_or(STR_CLEANING_FEE)
        .saturating_mul(stays);
    let platform_fees =
        gross_monthly.saturating_mul(form.platform_fee_rate.unwrap_or(STR_PLATFORM_FEE_RATE));
    let management =
        gross_monthly.saturating_mul(form.management_rate.unwrap_or(STR_MANAGEMENT_RATE));
    let maintenance = form
        .monthly_maintenance
        .unwrap_or_else(|| gross_monthly.saturating_mul(STR_MAINTENANCE_SHARE));

    let monthly_expenses = platform_fees
        .saturating_add(cleaning)
        .saturating_add(form.monthly_utilities.unwrap_or(STR_MONTHLY_UTILITIES))
        .saturating_add(form.monthly_supplies.unwrap_or(STR_MONTHLY_SUPPLIES))
        .saturating_add(maintenance)
        .saturating_add(management);
    let net_monthly = gross_monthly.saturating_sub(monthly_expenses);

    AirbnbBudget {
        nightly_rate: round_money(nightly_rate),
        occupancy_rate,
        booked_nights,
        gross_monthly: round_money(gross_monthly),
        monthly_expenses: round_money(monthly_expenses),
        net_monthly: round_money(net_monthly),
    }
}
