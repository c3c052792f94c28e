use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use agribook_core::{
    Financials, PartnerStatement, PaymentSource, Season, SeasonSettlement, Store, Transaction,
    filtered_totals,
};

use crate::money::format_inr;

fn source_label(store: &Store, t: &Transaction) -> String {
    match &t.payment_source {
        PaymentSource::FarmCash => "Farm Cash".to_string(),
        PaymentSource::FarmBank => "Farm Bank".to_string(),
        PaymentSource::Partner { payer_partner_id } => {
            let name = store
                .partner(payer_partner_id)
                .map(|p| p.name.as_str())
                .unwrap_or(payer_partner_id.as_str());
            format!("Paid by {name}")
        }
    }
}

pub fn print_financials(store: &Store, financials: &Financials) {
    println!("Farm Cash:      {}", format_inr(financials.cash));
    println!("Bank Balance:   {}", format_inr(financials.bank));
    println!("Worker Advances: {}", format_inr(financials.total_advances));
    println!();
    println!("Partner balances (positive = farm owes partner):");
    for partner in &store.partners {
        let balance = financials
            .partner_balances
            .get(&partner.id)
            .copied()
            .unwrap_or(0.0);
        println!("  {:<20} {}", partner.name, format_inr(balance));
    }
}

pub fn print_distribution(financials: &Financials) {
    let d = &financials.share_details;
    println!("Total Revenue:           {}", format_inr(d.total_income));
    println!("Total Expenses:          {}", format_inr(d.total_expense));
    println!("Net Farm Profit:         {}", format_inr(d.net_farm_profit));
    println!("Less: Worker Share (20%): {}", format_inr(d.worker_share));
    println!("Distributable Profit:    {}", format_inr(d.distributable_profit));
    println!("Share per Partner:       {}", format_inr(d.share_per_partner));
}

pub fn print_settlement(season: &Season, s: &SeasonSettlement) {
    println!("Season: {}", season.name);
    println!();
    println!("Farm performance");
    println!("  Total Income:        {}", format_inr(s.total_income));
    println!("  Total Expense:       {}", format_inr(s.total_expense));
    println!();
    println!("Worker share (20%)");
    println!("  Income Base:         {}", format_inr(s.worker_income_base));
    println!("  Expense Base:        {}", format_inr(s.worker_expense_base));
    println!("  (+) 20% Income Share: {}", format_inr(s.worker_gross_share));
    println!("  (-) 20% Expense Share: {}", format_inr(s.worker_expense_share));
    println!("  Net Share:           {}", format_inr(s.worker_net_share));
    println!("  Less Advances:       {}", format_inr(s.season_advances));
    println!("  Final Payable:       {}", format_inr(s.final_payable));
}

pub fn print_partner_statement(name: &str, s: &PartnerStatement) {
    println!("Partner: {name}");
    println!();
    println!("Inflows (investment)");
    println!("  Direct Cash Injection:  {}", format_inr(s.direct_contribution));
    println!("  Expenses Paid (Pocket): {}", format_inr(s.expenses_paid));
    println!("  Advances Paid (Pocket): {}", format_inr(s.advances_paid));
    println!("  Total Invested:         {}", format_inr(s.total_invested));
    println!();
    println!("Outflows");
    println!("  Withdrawals:            {}", format_inr(s.withdrawal));
    println!("  Income Collected:       {}", format_inr(s.income_received));
    println!();
    println!("Net Balance:              {}", format_inr(s.net_balance));
}

pub fn print_transactions(store: &Store, transactions: &[Transaction]) {
    for t in transactions {
        let season = store
            .season(&t.season_id)
            .map(|s| s.name.as_str())
            .unwrap_or(t.season_id.as_str());
        println!(
            "{}  {:<20}  {:<22} {:>14}  {:<12}  {}",
            t.date,
            t.transaction_type().as_str(),
            t.category,
            format_inr(t.amount),
            source_label(store, t),
            season,
        );
        if !t.description.is_empty() {
            println!("            {}", t.description);
        }
    }

    let totals = filtered_totals(transactions);
    println!();
    println!(
        "In: {}  Out: {}  Net: {}",
        format_inr(totals.income),
        format_inr(totals.expense),
        format_inr(totals.balance)
    );
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    date: String,
    #[serde(rename = "type")]
    kind: &'a str,
    category: &'a str,
    description: &'a str,
    amount: f64,
    source: String,
    season: &'a str,
}

pub fn write_transactions_csv(
    path: &Path,
    store: &Store,
    transactions: &[Transaction],
) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("write {}", path.display()))?;

    for t in transactions {
        let season = store
            .season(&t.season_id)
            .map(|s| s.name.as_str())
            .unwrap_or(t.season_id.as_str());
        writer.serialize(CsvRow {
            date: t.date.to_string(),
            kind: t.transaction_type().as_str(),
            category: &t.category,
            description: &t.description,
            amount: t.amount,
            source: source_label(store, t),
            season,
        })?;
    }

    writer.flush().context("flush csv")?;
    Ok(())
}
