use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{BillingRow, Period};
use crate::reports::{rank_totals, RankedTotal, TOP_N};

pub struct BillingSummary {
    pub period: Period,
    /// Faturamento Total.
    pub total: Decimal,
    /// Nº de Vendas: billing rows in the period.
    pub sales_count: usize,
    pub distinct_clients: usize,
    pub avg_ticket_per_sale: Decimal,
    pub avg_ticket_per_client: Decimal,
    pub best_seller: Option<RankedTotal>,
    pub best_client: Option<RankedTotal>,
    pub top_sellers: Vec<RankedTotal>,
    pub top_clients: Vec<RankedTotal>,
    /// Per-month totals over every row, whatever the selected period.
    pub monthly_totals: [Decimal; 12],
}

/// Amount a row contributes to the period, or `None` when the row has no
/// sale in the selected month.
fn row_total(row: &BillingRow, period: Period) -> Option<Decimal> {
    match period {
        Period::Annual => Some(row.months.iter().sum()),
        Period::Month(m) => {
            let amount = *row.months.get((m as usize).checked_sub(1)?)?;
            (amount > Decimal::ZERO).then_some(amount)
        }
    }
}

fn has_name(name: &str) -> bool {
    !name.trim().is_empty()
}

fn per_row(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

pub fn summarize(rows: &[BillingRow], period: Period) -> BillingSummary {
    let selected: Vec<(&BillingRow, Decimal)> = rows
        .iter()
        .filter_map(|r| row_total(r, period).map(|t| (r, t)))
        .collect();

    let total: Decimal = selected.iter().map(|(_, t)| *t).sum();
    let sales_count = selected.len();
    let distinct_clients = selected
        .iter()
        .map(|(r, _)| r.client.as_str())
        .filter(|c| has_name(c))
        .collect::<HashSet<_>>()
        .len();

    // Blank sellers and clients still count toward the totals but are never ranked.
    let sellers = rank_totals(
        selected
            .iter()
            .filter(|(r, _)| has_name(&r.seller))
            .map(|(r, t)| (r.seller.as_str(), *t)),
    );
    let clients = rank_totals(
        selected
            .iter()
            .filter(|(r, _)| has_name(&r.client))
            .map(|(r, t)| (r.client.as_str(), *t)),
    );

    let mut monthly_totals = [Decimal::ZERO; 12];
    for row in rows {
        for (slot, amount) in monthly_totals.iter_mut().zip(row.months.iter()) {
            *slot += *amount;
        }
    }

    debug!(
        "billing for {}: {} sales, {} clients",
        period.label(),
        sales_count,
        distinct_clients
    );

    BillingSummary {
        period,
        total,
        sales_count,
        distinct_clients,
        avg_ticket_per_sale: per_row(total, sales_count),
        avg_ticket_per_client: per_row(total, distinct_clients),
        best_seller: sellers.first().cloned(),
        best_client: clients.first().cloned(),
        top_sellers: sellers.into_iter().take(TOP_N).collect(),
        top_clients: clients.into_iter().take(TOP_N).collect(),
        monthly_totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn row(client: &str, seller: &str, amounts: &[(usize, &str)]) -> BillingRow {
        let mut months = [Decimal::ZERO; 12];
        for (m, a) in amounts {
            months[m - 1] = d(a);
        }
        BillingRow {
            client: client.to_string(),
            seller: seller.to_string(),
            months,
        }
    }

    fn seed() -> Vec<BillingRow> {
        vec![
            row("ACME", "Ana", &[(1, "100"), (2, "200")]),
            row("Beta", "Bruno", &[(1, "300")]),
            row("ACME", "Bruno", &[(2, "50")]),
            row("Gama", "Carla", &[(3, "0")]),
        ]
    }

    #[test]
    fn test_annual_summary() {
        let s = summarize(&seed(), Period::Annual);
        assert_eq!(s.total, d("650"));
        assert_eq!(s.sales_count, 4);
        assert_eq!(s.distinct_clients, 3);
        assert_eq!(s.avg_ticket_per_sale, d("162.5"));
        let best_seller = s.best_seller.unwrap();
        assert_eq!(best_seller.name, "Bruno");
        assert_eq!(best_seller.total, d("350"));
        let best_client = s.best_client.unwrap();
        assert_eq!(best_client.name, "ACME");
        assert_eq!(best_client.total, d("350"));
    }

    #[test]
    fn test_month_summary_keeps_only_positive_rows() {
        let s = summarize(&seed(), Period::Month(2));
        assert_eq!(s.sales_count, 2);
        assert_eq!(s.distinct_clients, 1);
        assert_eq!(s.total, d("250"));
        assert_eq!(s.avg_ticket_per_client, d("250"));
        assert_eq!(s.best_seller.unwrap().name, "Ana");
    }

    #[test]
    fn test_ties_go_to_first_seen() {
        let rows = vec![
            row("Zeta", "Zé", &[(1, "100")]),
            row("Alfa", "Ana", &[(1, "100")]),
        ];
        let s = summarize(&rows, Period::Month(1));
        assert_eq!(s.best_client.unwrap().name, "Zeta");
        assert_eq!(s.best_seller.unwrap().name, "Zé");
    }

    #[test]
    fn test_blank_names_are_not_ranked() {
        let rows = vec![
            row("", " ", &[(1, "900")]),
            row("ACME", "Ana", &[(1, "100")]),
        ];
        let s = summarize(&rows, Period::Annual);
        assert_eq!(s.total, d("1000"));
        assert_eq!(s.sales_count, 2);
        assert_eq!(s.distinct_clients, 1);
        assert_eq!(s.avg_ticket_per_client, d("1000"));
        assert_eq!(s.best_seller.unwrap().name, "Ana");
        assert_eq!(s.best_client.unwrap().name, "ACME");
        assert_eq!(s.top_sellers.len(), 1);
        assert_eq!(s.top_clients.len(), 1);
    }

    #[test]
    fn test_empty_month_has_no_best_and_zero_tickets() {
        let s = summarize(&seed(), Period::Month(12));
        assert_eq!(s.sales_count, 0);
        assert_eq!(s.total, Decimal::ZERO);
        assert_eq!(s.avg_ticket_per_sale, Decimal::ZERO);
        assert_eq!(s.avg_ticket_per_client, Decimal::ZERO);
        assert!(s.best_seller.is_none());
        assert!(s.best_client.is_none());
        assert!(s.top_clients.is_empty());
    }

    #[test]
    fn test_monthly_totals_ignore_period() {
        let s = summarize(&seed(), Period::Month(3));
        assert_eq!(s.monthly_totals[0], d("400"));
        assert_eq!(s.monthly_totals[1], d("250"));
        assert_eq!(s.monthly_totals[2], Decimal::ZERO);
    }

    #[test]
    fn test_top_lists_are_capped() {
        let rows: Vec<BillingRow> = (1..=8)
            .map(|i| row(&format!("C{i}"), &format!("S{i}"), &[(1, "10")]))
            .collect();
        let s = summarize(&rows, Period::Annual);
        assert_eq!(s.top_clients.len(), TOP_N);
        assert_eq!(s.top_sellers.len(), TOP_N);
        assert_eq!(s.top_clients[0].name, "C1");
    }
}
