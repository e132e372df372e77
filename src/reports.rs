use std::collections::HashMap;
use std::ops::AddAssign;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{DreError, Result};
use crate::models::{month_name, Payable, Period, Receivable, TransferPolicy};

const PAYROLL_GROUP: &str = "despesas com folha";
const TAX_GROUP: &str = "imposto";
const FINANCIAL_GROUP: &str = "despesas financeiras";
const VARIABLE: &str = "variável";
const FIXED: &str = "fixo";
const TRANSFER_ACCOUNT: &str = "transferência entre contas";
const SIMPLES_NACIONAL: &str = "simples nacional";

pub const TOP_N: usize = 5;

static DEDUCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)desconto|devolução").expect("valid deduction pattern"));

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Share of payroll booked as variable cost; the rest is fixed.
fn payroll_variable_share() -> Decimal {
    Decimal::new(6, 1)
}

fn payroll_fixed_share() -> Decimal {
    Decimal::new(4, 1)
}

/// `num / den`, or zero when the denominator is zero.
fn ratio(num: Decimal, den: Decimal) -> Decimal {
    if den.is_zero() {
        return Decimal::ZERO;
    }
    num.checked_div(den).unwrap_or(Decimal::ZERO)
}

/// `num / den` in percent, zero on a zero denominator or overflow.
fn percent_of(num: Decimal, den: Decimal) -> Decimal {
    ratio(num, den)
        .checked_mul(HUNDRED)
        .unwrap_or(Decimal::ZERO)
}

/// Margem de Contribuição % and Ponto de Equilíbrio.
fn margin_and_break_even(
    gross_profit: Decimal,
    net_revenue: Decimal,
    fixed_costs: Decimal,
) -> (Decimal, Decimal) {
    let margin_pct = percent_of(gross_profit, net_revenue);
    (margin_pct, ratio(fixed_costs, margin_pct / HUNDRED))
}

fn group_is(p: &Payable, name: &str) -> bool {
    p.group.as_deref().is_some_and(|g| g.to_lowercase() == name)
}

fn classification_is(p: &Payable, name: &str) -> bool {
    p.classification
        .as_deref()
        .is_some_and(|c| c.to_lowercase() == name)
}

/// Rows without a group still count as operating, only tax and financial
/// groups are carved out of the cost buckets.
fn is_operating(p: &Payable) -> bool {
    match p.group.as_deref() {
        Some(g) => {
            let g = g.to_lowercase();
            g != TAX_GROUP && g != FINANCIAL_GROUP
        }
        None => true,
    }
}

fn is_transfer(p: &Payable) -> bool {
    p.account.to_lowercase().contains(TRANSFER_ACCOUNT)
}

fn is_simples_nacional(p: &Payable) -> bool {
    p.account.to_lowercase().contains(SIMPLES_NACIONAL)
}

fn is_deduction(r: &Receivable) -> bool {
    DEDUCTION.is_match(&r.category)
}

pub fn filter_payables(
    payables: &[Payable],
    period: Period,
    policy: TransferPolicy,
) -> Vec<&Payable> {
    payables
        .iter()
        .filter(|p| period.contains(p.paid_on))
        .filter(|p| policy == TransferPolicy::Include || !is_transfer(p))
        .collect()
}

pub fn filter_receivables(receivables: &[Receivable], period: Period) -> Vec<&Receivable> {
    receivables
        .iter()
        .filter(|r| period.contains(r.paid_on))
        .collect()
}

fn sum_where<T>(
    rows: &[&T],
    amount: impl Fn(&T) -> Decimal,
    pred: impl Fn(&T) -> bool,
) -> Decimal {
    rows.iter()
        .filter(|r| pred(**r))
        .map(|r| amount(*r))
        .sum()
}

// ---------------------------------------------------------------------------
// DRE statement
// ---------------------------------------------------------------------------

/// One income statement over a set of payables and receivables.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DreStatement {
    /// Receita Total: positive receivables.
    pub gross_revenue: Decimal,
    /// Deduções: discounts and returns, counted as a positive amount.
    pub deductions: Decimal,
    /// Receita Líquida.
    pub net_revenue: Decimal,
    /// Folha: payables in the payroll group, before the variable/fixed split.
    pub payroll: Decimal,
    pub payroll_variable: Decimal,
    pub payroll_fixed: Decimal,
    /// Custos Variáveis, including the variable payroll share.
    pub variable_costs: Decimal,
    /// Custos Fixos, including the fixed payroll share.
    pub fixed_costs: Decimal,
    /// Despesas Financeiras.
    pub financial_expenses: Decimal,
    /// Impostos. "Simples Nacional" accounts are added on top of the tax
    /// group even when a row is in both.
    pub taxes: Decimal,
    /// Lucro Bruto.
    pub gross_profit: Decimal,
    pub ebitda: Decimal,
    /// Lucro Líquido.
    pub net_income: Decimal,
    /// Despesas Totais.
    pub total_expenses: Decimal,
    /// Margem de Contribuição, in percent of net revenue.
    pub contribution_margin_pct: Decimal,
    /// Ponto de Equilíbrio.
    pub break_even: Decimal,
}

impl DreStatement {
    pub fn from_rows(payables: &[&Payable], receivables: &[&Receivable]) -> Self {
        let gross_revenue = sum_where(receivables, |r| r.amount, |r| r.amount > Decimal::ZERO);
        let negative_deductions = sum_where(
            receivables,
            |r| r.amount,
            |r| r.amount < Decimal::ZERO && is_deduction(r),
        )
        .abs();
        let positive_deductions = sum_where(
            receivables,
            |r| r.amount,
            |r| r.amount > Decimal::ZERO && is_deduction(r),
        );
        let deductions = negative_deductions + positive_deductions;
        let net_revenue = gross_revenue - deductions;

        let payroll = sum_where(payables, |p| p.amount, |p| group_is(p, PAYROLL_GROUP));
        let payroll_variable = payroll * payroll_variable_share();
        let payroll_fixed = payroll * payroll_fixed_share();

        let variable_costs = sum_where(
            payables,
            |p| p.amount,
            |p| classification_is(p, VARIABLE) && is_operating(p),
        ) + payroll_variable;
        let fixed_costs = sum_where(
            payables,
            |p| p.amount,
            |p| classification_is(p, FIXED) && is_operating(p),
        ) + payroll_fixed;

        let financial_expenses =
            sum_where(payables, |p| p.amount, |p| group_is(p, FINANCIAL_GROUP));
        let taxes = sum_where(payables, |p| p.amount, |p| group_is(p, TAX_GROUP))
            + sum_where(payables, |p| p.amount, is_simples_nacional);

        let gross_profit = net_revenue - taxes - variable_costs;
        let ebitda = gross_profit - fixed_costs;
        let total_expenses = variable_costs + fixed_costs + financial_expenses + taxes;
        let net_income = net_revenue - total_expenses;

        let (contribution_margin_pct, break_even) =
            margin_and_break_even(gross_profit, net_revenue, fixed_costs);

        Self {
            gross_revenue,
            deductions,
            net_revenue,
            payroll,
            payroll_variable,
            payroll_fixed,
            variable_costs,
            fixed_costs,
            financial_expenses,
            taxes,
            gross_profit,
            ebitda,
            net_income,
            total_expenses,
            contribution_margin_pct,
            break_even,
        }
    }
}

impl AddAssign for DreStatement {
    fn add_assign(&mut self, rhs: Self) {
        self.gross_revenue += rhs.gross_revenue;
        self.deductions += rhs.deductions;
        self.net_revenue += rhs.net_revenue;
        self.payroll += rhs.payroll;
        self.payroll_variable += rhs.payroll_variable;
        self.payroll_fixed += rhs.payroll_fixed;
        self.variable_costs += rhs.variable_costs;
        self.fixed_costs += rhs.fixed_costs;
        self.financial_expenses += rhs.financial_expenses;
        self.taxes += rhs.taxes;
        self.gross_profit += rhs.gross_profit;
        self.ebitda += rhs.ebitda;
        self.net_income += rhs.net_income;
        self.total_expenses += rhs.total_expenses;
        // Ratios do not add up; derive them again from the summed lines.
        (self.contribution_margin_pct, self.break_even) =
            margin_and_break_even(self.gross_profit, self.net_revenue, self.fixed_costs);
    }
}

pub fn compute(
    payables: &[Payable],
    receivables: &[Receivable],
    period: Period,
    policy: TransferPolicy,
) -> DreStatement {
    let p = filter_payables(payables, period, policy);
    let r = filter_receivables(receivables, period);
    debug!(
        "computing DRE for {} ({:?}): {} payables, {} receivables",
        period.label(),
        policy,
        p.len(),
        r.len()
    );
    DreStatement::from_rows(&p, &r)
}

// ---------------------------------------------------------------------------
// DRE line items (ordered, with sign symbols)
// ---------------------------------------------------------------------------

pub struct DreLine {
    pub symbol: &'static str,
    pub label: &'static str,
    pub value: Decimal,
}

pub fn line_items(s: &DreStatement) -> Vec<DreLine> {
    let line = |symbol, label, value| DreLine { symbol, label, value };
    vec![
        line("+", "Receita Total", s.gross_revenue),
        line("-", "Deduções", s.deductions),
        line("=", "Receita Líquida", s.net_revenue),
        line("-", "Impostos", s.taxes),
        line("-", "Custos Variáveis", s.variable_costs),
        line("=", "Lucro Bruto", s.gross_profit),
        line("-", "Custos Fixos", s.fixed_costs),
        line("=", "EBITDA", s.ebitda),
        line("-", "Despesas Financeiras", s.financial_expenses),
        line("=", "Lucro Líquido", s.net_income),
    ]
}

// ---------------------------------------------------------------------------
// Monthly views
// ---------------------------------------------------------------------------

pub struct MonthlySeries {
    pub net_revenue: [Decimal; 12],
    pub net_income: [Decimal; 12],
}

pub struct MonthlyStatement {
    pub name: &'static str,
    pub statement: DreStatement,
}

pub struct MonthlyDre {
    pub months: Vec<MonthlyStatement>,
    /// Column sums over the twelve months.
    pub total: DreStatement,
}

/// Full-year DRE, one statement per calendar month. Transfers stay in.
pub fn monthly_statements(payables: &[Payable], receivables: &[Receivable]) -> MonthlyDre {
    let mut months = Vec::with_capacity(12);
    let mut total = DreStatement::default();
    for m in 1..=12 {
        let statement = compute(payables, receivables, Period::Month(m), TransferPolicy::Include);
        total += statement;
        months.push(MonthlyStatement {
            name: month_name(m),
            statement,
        });
    }
    MonthlyDre { months, total }
}

pub fn monthly_series(payables: &[Payable], receivables: &[Receivable]) -> MonthlySeries {
    let dre = monthly_statements(payables, receivables);
    let mut series = MonthlySeries {
        net_revenue: [Decimal::ZERO; 12],
        net_income: [Decimal::ZERO; 12],
    };
    for (i, m) in dre.months.iter().enumerate() {
        series.net_revenue[i] = m.statement.net_revenue;
        series.net_income[i] = m.statement.net_income;
    }
    series
}

pub struct QuarterlyColumn {
    pub label: String,
    pub statement: DreStatement,
}

pub struct QuarterlyComparison {
    pub focus_month: u32,
    /// Previous month, focus month, next month, then the full year.
    pub columns: Vec<QuarterlyColumn>,
}

/// Side-by-side DRE around a focus month (February through November).
/// Transfers stay in, unlike the general dashboard.
pub fn quarterly_comparison(
    payables: &[Payable],
    receivables: &[Receivable],
    focus_month: u32,
) -> Result<QuarterlyComparison> {
    if !(2..=11).contains(&focus_month) {
        return Err(DreError::InvalidMonth(focus_month));
    }
    let policy = TransferPolicy::Include;
    let mut columns: Vec<QuarterlyColumn> = [focus_month - 1, focus_month, focus_month + 1]
        .into_iter()
        .map(|m| QuarterlyColumn {
            label: month_name(m).to_string(),
            statement: compute(payables, receivables, Period::Month(m), policy),
        })
        .collect();
    columns.push(QuarterlyColumn {
        label: Period::Annual.label().to_string(),
        statement: compute(payables, receivables, Period::Annual, policy),
    });
    Ok(QuarterlyComparison {
        focus_month,
        columns,
    })
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RankedTotal {
    pub name: String,
    pub total: Decimal,
}

/// Sum amounts per key, largest first. Equal totals keep the order in which
/// their keys first appeared.
pub fn rank_totals<'a>(entries: impl IntoIterator<Item = (&'a str, Decimal)>) -> Vec<RankedTotal> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut totals: Vec<RankedTotal> = Vec::new();
    for (name, amount) in entries {
        match index.get(name) {
            Some(&i) => totals[i].total += amount,
            None => {
                index.insert(name, totals.len());
                totals.push(RankedTotal {
                    name: name.to_string(),
                    total: amount,
                });
            }
        }
    }
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

pub fn top_cost_centers(
    payables: &[Payable],
    period: Period,
    policy: TransferPolicy,
    n: usize,
) -> Vec<RankedTotal> {
    let rows = filter_payables(payables, period, policy);
    let mut ranked = rank_totals(
        rows.iter()
            .filter_map(|p| p.cost_center.as_deref().map(|c| (c, p.amount))),
    );
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub struct DashboardSummary {
    pub period: Period,
    pub statement: DreStatement,
    /// Receita Total minus Ponto de Equilíbrio.
    pub revenue_minus_break_even: Decimal,
    pub series: MonthlySeries,
    pub top_cost_centers: Vec<RankedTotal>,
}

/// General dashboard: KPIs exclude inter-account transfers, while the
/// monthly series and the cost-center ranking keep them.
pub fn dashboard(payables: &[Payable], receivables: &[Receivable], period: Period) -> DashboardSummary {
    let statement = compute(payables, receivables, period, TransferPolicy::Exclude);
    DashboardSummary {
        period,
        statement,
        revenue_minus_break_even: statement.gross_revenue - statement.break_even,
        series: monthly_series(payables, receivables),
        top_cost_centers: top_cost_centers(payables, period, TransferPolicy::Include, TOP_N),
    }
}

// ---------------------------------------------------------------------------
// Executive report
// ---------------------------------------------------------------------------

pub struct ExecutiveReport {
    pub statement: DreStatement,
    /// Faturamento Operacional: net revenue plus deductions.
    pub operating_revenue: Decimal,
    /// Net revenue minus variable costs. Taxes are not subtracted here.
    pub contribution_margin: Decimal,
    pub contribution_margin_pct: Decimal,
    pub break_even: Decimal,
    /// Margem Líquida: net income over net revenue, in percent.
    pub net_margin_pct: Decimal,
    pub financial_expenses_pct: Decimal,
    pub operating_revenue_pct: Decimal,
}

/// Annual figures behind the executive narrative. Transfers are excluded.
pub fn executive_report(payables: &[Payable], receivables: &[Receivable]) -> ExecutiveReport {
    let s = compute(payables, receivables, Period::Annual, TransferPolicy::Exclude);
    let operating_revenue = s.net_revenue + s.deductions;
    let contribution_margin = s.net_revenue - s.variable_costs;
    let contribution_margin_pct = percent_of(contribution_margin, s.net_revenue);
    ExecutiveReport {
        statement: s,
        operating_revenue,
        contribution_margin,
        contribution_margin_pct,
        break_even: ratio(s.fixed_costs, contribution_margin_pct / HUNDRED),
        net_margin_pct: percent_of(s.net_income, s.net_revenue),
        financial_expenses_pct: percent_of(s.financial_expenses, s.gross_revenue),
        operating_revenue_pct: percent_of(operating_revenue, s.gross_revenue),
    }
}
