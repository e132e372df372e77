use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::classification::{AccountClass, ClassificationTable};
use crate::error::{DreError, Result};
use crate::models::{BillingRow, RawPayable, Receivable, MONTH_NAMES};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a ledger amount. Accepts `1.234,56`, `1.500` and `1234.56` styles, an
/// optional `R$` prefix and parenthesized negatives. Garbage parses as zero.
pub fn parse_amount(raw: &str) -> Decimal {
    let s: String = raw
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '"' && *c != '\u{a0}')
        .collect();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return -parse_amount(inner);
    }

    let normalized = match (s.rfind(','), s.rfind('.')) {
        // 1.234,56 -> comma is the decimal separator
        (Some(c), Some(d)) if c > d => s.replace('.', "").replace(',', "."),
        // 1,234.56 -> point is the decimal separator
        (Some(_), Some(_)) => s.replace(',', ""),
        // 1,234,567 -> thousands; a lone comma stays decimal
        (Some(_), None) if s.matches(',').count() > 1 && is_grouped(&s, ',') => {
            s.replace(',', "")
        }
        (Some(_), None) => s.replace(',', "."),
        // 1.500 and 1.234.567 are whole reais
        (None, Some(_)) if is_grouped(&s, '.') => s.replace('.', ""),
        _ => s,
    };
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .unwrap_or(Decimal::ZERO)
}

/// Whether `sep` only separates thousands: a leading group of one to three
/// digits (not a lone zero) followed by groups of exactly three digits.
fn is_grouped(s: &str, sep: char) -> bool {
    let digits = s.trim_start_matches(['-', '+']);
    let mut groups = digits.split(sep);
    let Some(head) = groups.next() else {
        return false;
    };
    let tail: Vec<&str> = groups.collect();
    !tail.is_empty()
        && (1..=3).contains(&head.len())
        && head != "0"
        && head.bytes().all(|b| b.is_ascii_digit())
        && tail
            .iter()
            .all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}

/// Parse a day-first date (`15/01/2024`, `15-01-24`, `15.01.2024`) or an ISO
/// date/datetime as written by spreadsheet exports. Anything else is `None`.
pub fn parse_date_dmy(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.len() >= 10 && raw.as_bytes()[4] == b'-' {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(dt.date());
        }
        return NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok();
    }

    let date_part = raw.split_whitespace().next()?;
    let parts: Vec<&str> = date_part.split(['/', '-', '.']).collect();
    if parts.len() != 3 {
        return None;
    }
    let d: u32 = parts[0].parse().ok()?;
    let m: u32 = parts[1].parse().ok()?;
    let mut y: i32 = parts[2].parse().ok()?;
    if parts[2].len() <= 2 {
        y += 2000;
    }
    NaiveDate::from_ymd_opt(y, m, d)
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Exports from Brazilian spreadsheets are often semicolon separated.
fn detect_delimiter(file_path: &Path) -> Result<u8> {
    let file = std::fs::File::open(file_path)?;
    let mut first_line = String::new();
    BufReader::new(file).read_line(&mut first_line)?;
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    Ok(if semicolons > commas { b';' } else { b',' })
}

struct Sheet {
    file: String,
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl Sheet {
    fn read(file_path: &Path) -> Result<Self> {
        let delimiter = detect_delimiter(file_path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(file_path)?;
        let headers = rdr.headers()?.clone();
        let rows = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("read {} rows from {}", rows.len(), file_path.display());
        Ok(Self {
            file: file_path.display().to_string(),
            headers,
            rows,
        })
    }

    fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DreError::MissingColumn {
                file: self.file.clone(),
                column: name.to_string(),
            })
    }
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

/// Read several exports of the same ledger and concatenate them in order.
pub fn load_many<T, P, F>(paths: &[P], load: F) -> Result<Vec<T>>
where
    P: AsRef<Path>,
    F: Fn(&Path) -> Result<Vec<T>>,
{
    let mut all = Vec::new();
    for path in paths {
        all.extend(load(path.as_ref())?);
    }
    Ok(all)
}

// ---------------------------------------------------------------------------
// Ledgers
// ---------------------------------------------------------------------------

pub fn load_payables(file_path: &Path) -> Result<Vec<RawPayable>> {
    let sheet = Sheet::read(file_path)?;
    let amount = sheet.column("Valor")?;
    let paid = sheet.column("Pagto")?;
    let category = sheet.column("Categoria")?;
    let cost_center = sheet.column("Setor Cons.")?;

    let rows: Vec<RawPayable> = sheet
        .rows
        .iter()
        .map(|r| RawPayable {
            amount: parse_amount(cell(r, amount)),
            paid_on: parse_date_dmy(cell(r, paid)),
            category: cell(r, category).to_string(),
            cost_center: optional(cell(r, cost_center)),
        })
        .collect();
    let undated = rows.iter().filter(|r| r.paid_on.is_none()).count();
    info!(
        "loaded {} payables from {} ({} without a valid payment date)",
        rows.len(),
        sheet.file,
        undated
    );
    Ok(rows)
}

pub fn load_receivables(file_path: &Path) -> Result<Vec<Receivable>> {
    let sheet = Sheet::read(file_path)?;
    let amount = sheet.column("Valor")?;
    let paid = sheet.column("Pagto.")?;
    let category = sheet.column("Categoria")?;

    let rows: Vec<Receivable> = sheet
        .rows
        .iter()
        .map(|r| Receivable {
            amount: parse_amount(cell(r, amount)),
            paid_on: parse_date_dmy(cell(r, paid)),
            category: cell(r, category).to_string(),
        })
        .collect();
    info!("loaded {} receivables from {}", rows.len(), sheet.file);
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

pub fn load_classification(accounts_path: &Path, renames_path: &Path) -> Result<ClassificationTable> {
    let sheet = Sheet::read(accounts_path)?;
    let account = sheet.column("Conta")?;
    let group = sheet.column("Grupo")?;
    let classification = sheet.column("Classificação")?;
    let accounts: Vec<(String, AccountClass)> = sheet
        .rows
        .iter()
        .map(|r| {
            (
                cell(r, account).to_string(),
                AccountClass {
                    group: optional(cell(r, group)),
                    classification: optional(cell(r, classification)),
                },
            )
        })
        .collect();

    let sheet = Sheet::read(renames_path)?;
    let old = sheet.column("contasantigas")?;
    let new = sheet.column("contasnovas")?;
    let renames: Vec<(String, String)> = sheet
        .rows
        .iter()
        .filter(|r| !cell(r, new).is_empty())
        .map(|r| (cell(r, old).to_string(), cell(r, new).to_string()))
        .collect();

    let table = ClassificationTable::new(accounts, renames);
    info!("loaded {} classified accounts", table.account_count());
    Ok(table)
}

pub fn load_billing(file_path: &Path) -> Result<Vec<BillingRow>> {
    let sheet = Sheet::read(file_path)?;
    let client = sheet.column("Cliente")?;
    let seller = sheet.column("Vendedor")?;
    let month_cols = MONTH_NAMES
        .iter()
        .map(|name| sheet.column(name))
        .collect::<Result<Vec<_>>>()?;

    let rows: Vec<BillingRow> = sheet
        .rows
        .iter()
        .map(|r| {
            let mut months = [Decimal::ZERO; 12];
            for (slot, idx) in months.iter_mut().zip(&month_cols) {
                *slot = parse_amount(cell(r, *idx));
            }
            BillingRow {
                client: cell(r, client).to_string(),
                seller: cell(r, seller).to_string(),
                months,
            }
        })
        .collect();
    info!("loaded {} billing rows from {}", rows.len(), sheet.file);
    Ok(rows)
}
