use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_engine_core::deal::{analyze_deal, DealInput};

use crate::input;

#[derive(Args)]
pub struct DealArgs {
    /// Path to JSON input file with `form` and `comps`
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price, overriding the form and comps
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// After-repair value
    #[arg(long)]
    pub arv: Option<Decimal>,

    /// Total rehab budget
    #[arg(long)]
    pub rehab_total: Option<Decimal>,

    /// Expected long-term monthly rent
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Short-term nightly rate
    #[arg(long)]
    pub nightly_rate: Option<Decimal>,
}

pub fn run_deal(args: DealArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut deal: DealInput = input::optional(args.input.as_deref())?.unwrap_or_default();

    let form = &mut deal.form;
    form.purchase_price = args.purchase_price.or(form.purchase_price);
    form.arv = args.arv.or(form.arv);
    form.rehab_total = args.rehab_total.or(form.rehab_total);
    form.monthly_rent = args.rent.or(form.monthly_rent);
    form.nightly_rate = args.nightly_rate.or(form.nightly_rate);

    Ok(serde_json::to_value(analyze_deal(&deal))?)
}
