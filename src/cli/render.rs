use colored::Colorize;
use comfy_table::{Cell, Table};
use rust_decimal::Decimal;

use crate::billing::BillingSummary;
use crate::fmt::{money, money_whole, number, percent};
use crate::models::{month_name, MONTH_NAMES};
use crate::reports::{
    self, DashboardSummary, DreStatement, ExecutiveReport, MonthlyDre, QuarterlyComparison,
    RankedTotal,
};
use crate::view::{Page, ALL_PAGES, HOME_TITLE};

/// Prepend company name as a header line if non-empty.
pub fn with_header(company_name: &str, body: String) -> String {
    if company_name.is_empty() {
        body
    } else {
        format!("{company_name}\n{body}")
    }
}

fn signed_money(val: Decimal) -> String {
    if val >= Decimal::ZERO {
        money(val).green().to_string()
    } else {
        money(val).red().to_string()
    }
}

fn ranking_table(label: &str, rows: &[RankedTotal]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", label, "Total"]);
    for (i, r) in rows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&r.name),
            Cell::new(money(r.total)),
        ]);
    }
    table
}

pub fn format_home() -> String {
    let mut table = Table::new();
    table.set_header(vec!["Página", "Seletor de mês"]);
    for page in ALL_PAGES {
        let selector = match page {
            Page::DreTrimestral => "2 a 11",
            p if p.uses_period() => "Anual, 1 a 12",
            _ => "",
        };
        table.add_row(vec![Cell::new(page.title()), Cell::new(selector)]);
    }
    format!("{HOME_TITLE}\n{table}")
}

pub fn format_dashboard(data: &DashboardSummary) -> String {
    let s = &data.statement;
    let mut kpis = Table::new();
    kpis.set_header(vec!["Indicador", "Valor"]);
    let rows: [(&str, String); 10] = [
        ("Receita Total", money(s.gross_revenue)),
        ("Receita Líquida", money(s.net_revenue)),
        ("Custos Variáveis", money(s.variable_costs)),
        ("Custos Fixos", money(s.fixed_costs)),
        ("Despesas Financeiras", money(s.financial_expenses)),
        ("Impostos", money(s.taxes)),
        ("Margem de Contribuição", percent(s.contribution_margin_pct)),
        ("Ponto de Equilíbrio", money(s.break_even)),
        ("Receita - PE", signed_money(data.revenue_minus_break_even)),
        ("Lucro Líquido", signed_money(s.net_income)),
    ];
    for (label, value) in rows {
        kpis.add_row(vec![Cell::new(label), Cell::new(value)]);
    }

    let mut series = Table::new();
    series.set_header(vec!["Mês", "Receita Líquida", "Lucro Líquido"]);
    for (i, name) in MONTH_NAMES.iter().enumerate() {
        series.add_row(vec![
            Cell::new(name),
            Cell::new(money_whole(data.series.net_revenue[i])),
            Cell::new(money_whole(data.series.net_income[i])),
        ]);
    }

    let mut out = format!(
        "{} ({})\n{kpis}\n\nEvolução Mensal\n{series}",
        Page::DashboardGeral.title(),
        data.period.label()
    );
    if !data.top_cost_centers.is_empty() {
        let top = ranking_table("Setor", &data.top_cost_centers);
        out.push_str(&format!("\n\nMaiores Despesas por Setor\n{top}"));
    }
    out
}

pub fn format_billing(data: &BillingSummary) -> String {
    let mut kpis = Table::new();
    kpis.set_header(vec!["Indicador", "Valor"]);
    let best = |r: &Option<RankedTotal>| match r {
        Some(r) => format!("{} ({})", r.name, money(r.total)),
        None => "\u{2014}".to_string(),
    };
    kpis.add_row(vec![Cell::new("Faturamento Total"), Cell::new(money(data.total))]);
    kpis.add_row(vec![Cell::new("Nº de Vendas"), Cell::new(data.sales_count)]);
    kpis.add_row(vec![Cell::new("Clientes"), Cell::new(data.distinct_clients)]);
    kpis.add_row(vec![
        Cell::new("Ticket Médio por Venda"),
        Cell::new(money(data.avg_ticket_per_sale)),
    ]);
    kpis.add_row(vec![
        Cell::new("Ticket Médio por Cliente"),
        Cell::new(money(data.avg_ticket_per_client)),
    ]);
    kpis.add_row(vec![Cell::new("Melhor Vendedor"), Cell::new(best(&data.best_seller))]);
    kpis.add_row(vec![Cell::new("Melhor Cliente"), Cell::new(best(&data.best_client))]);

    let mut months = Table::new();
    months.set_header(vec!["Mês", "Faturamento"]);
    for (name, total) in MONTH_NAMES.iter().zip(data.monthly_totals.iter()) {
        months.add_row(vec![Cell::new(name), Cell::new(money_whole(*total))]);
    }

    let mut out = format!(
        "{} ({})\n{kpis}\n\nFaturamento Mensal\n{months}",
        Page::AnaliseFaturamento.title(),
        data.period.label()
    );
    if !data.top_sellers.is_empty() {
        let sellers = ranking_table("Vendedor", &data.top_sellers);
        out.push_str(&format!("\n\nTop Vendedores\n{sellers}"));
    }
    if !data.top_clients.is_empty() {
        let clients = ranking_table("Cliente", &data.top_clients);
        out.push_str(&format!("\n\nTop Clientes\n{clients}"));
    }
    out
}

pub fn format_quarterly(data: &QuarterlyComparison) -> String {
    let mut table = Table::new();
    let mut header = vec!["".to_string(), "Conta".to_string()];
    header.extend(data.columns.iter().map(|c| c.label.clone()));
    table.set_header(header);

    let columns: Vec<Vec<reports::DreLine>> = data
        .columns
        .iter()
        .map(|c| reports::line_items(&c.statement))
        .collect();
    let title = format!(
        "{} (foco: {})",
        Page::DreTrimestral.title(),
        month_name(data.focus_month)
    );
    let Some(first) = columns.first() else {
        return format!("{title}\n{table}");
    };
    for (i, line) in first.iter().enumerate() {
        let mut row = vec![Cell::new(line.symbol), Cell::new(line.label)];
        for col in &columns {
            let value = money(col[i].value);
            if line.symbol == "=" {
                row.push(Cell::new(value.bold()));
            } else {
                row.push(Cell::new(value));
            }
        }
        table.add_row(row);
    }
    format!("{title}\n{table}")
}

fn statement_row(label: &str, s: &DreStatement) -> Vec<Cell> {
    vec![
        Cell::new(label),
        Cell::new(money(s.gross_revenue)),
        Cell::new(money(s.deductions)),
        Cell::new(money(s.net_revenue)),
        Cell::new(money(s.taxes)),
        Cell::new(money(s.variable_costs)),
        Cell::new(money(s.gross_profit)),
        Cell::new(money(s.fixed_costs)),
        Cell::new(money(s.ebitda)),
        Cell::new(money(s.financial_expenses)),
        Cell::new(signed_money(s.net_income)),
        Cell::new(percent(s.contribution_margin_pct)),
        Cell::new(money(s.break_even)),
    ]
}

pub fn format_monthly_dre(data: &MonthlyDre) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        "Mês",
        "Receita Total",
        "Deduções",
        "Receita Líquida",
        "Impostos",
        "Custos Variáveis",
        "Lucro Bruto",
        "Custos Fixos",
        "EBITDA",
        "Despesas Financeiras",
        "Lucro Líquido",
        "Margem Contrib.",
        "Ponto de Equilíbrio",
    ]);
    for m in &data.months {
        table.add_row(statement_row(m.name, &m.statement));
    }
    table.add_row(statement_row("Total", &data.total));
    format!("{}\n{table}", Page::DreCompleto.title())
}

pub fn format_executive(data: &ExecutiveReport) -> String {
    let s = &data.statement;
    let mut table = Table::new();
    table.set_header(vec!["Conta", "Valor"]);
    let rows: [(&str, String); 12] = [
        ("Receita Total", money(s.gross_revenue)),
        ("Deduções", money(s.deductions)),
        ("Receita Líquida", money(s.net_revenue)),
        ("Custos Variáveis", money(s.variable_costs)),
        ("Custos Fixos", money(s.fixed_costs)),
        ("Folha de Pagamento", money(s.payroll)),
        (
            "Folha (variável / fixa)",
            format!("{} / {}", money(s.payroll_variable), money(s.payroll_fixed)),
        ),
        ("Despesas Financeiras", money(s.financial_expenses)),
        ("Impostos", money(s.taxes)),
        ("Despesas Totais", money(s.total_expenses)),
        ("Faturamento Operacional", money(data.operating_revenue)),
        ("Lucro Líquido", signed_money(s.net_income)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }

    let result = if s.net_income >= Decimal::ZERO {
        "lucro"
    } else {
        "prejuízo"
    };
    let findings = [
        format!(
            "1. Faturamento operacional de {}, {} da receita total.",
            money(data.operating_revenue),
            percent(data.operating_revenue_pct)
        ),
        format!(
            "2. Margem de contribuição de R$ {} ({}).",
            number(data.contribution_margin),
            percent(data.contribution_margin_pct)
        ),
        format!(
            "3. Ponto de equilíbrio em {} de receita líquida.",
            money(data.break_even)
        ),
        format!(
            "4. Despesas financeiras somam {}, {} da receita total.",
            money(s.financial_expenses),
            percent(data.financial_expenses_pct)
        ),
        format!(
            "5. O ano fecha com {result} de {} e margem líquida de {}.",
            money(s.net_income),
            percent(data.net_margin_pct)
        ),
    ];

    format!(
        "{}\n{table}\n\nPrincipais Pontos\n{}",
        Page::RelatorioExecutivo.title(),
        findings.join("\n")
    )
}
