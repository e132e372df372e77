use std::path::Path;

use tracing::{info, warn};

use crate::billing;
use crate::cli::render;
use crate::error::{DreError, Result};
use crate::importer::{load_billing, load_classification, load_many, load_payables, load_receivables};
use crate::models::{BillingRow, Payable, Receivable};
use crate::reports;
use crate::settings::Settings;
use crate::view::{Page, ViewState};

/// Everything a page needs, loaded and classified once per run.
pub struct App {
    settings: Settings,
    payables: Vec<Payable>,
    receivables: Vec<Receivable>,
    billing: Option<Vec<BillingRow>>,
}

impl App {
    pub fn load(settings: Settings) -> Result<Self> {
        info!("loading ledgers from {}", settings.data_dir);
        let classification = load_classification(
            &settings.data_path(&settings.classification_accounts),
            &settings.data_path(&settings.classification_renames),
        )?;
        let raw = load_many(&settings.payables_paths(), load_payables)?;
        let payables = classification.classify_all(raw);
        let receivables = load_many(&settings.receivables_paths(), load_receivables)?;

        let billing_path = settings.data_path(&settings.billing);
        let billing = if billing_path.exists() {
            Some(load_billing(&billing_path)?)
        } else {
            warn!("billing file {} not found", billing_path.display());
            None
        };

        Ok(Self::from_parts(settings, payables, receivables, billing))
    }

    pub fn from_parts(
        settings: Settings,
        payables: Vec<Payable>,
        receivables: Vec<Receivable>,
        billing: Option<Vec<BillingRow>>,
    ) -> Self {
        Self {
            settings,
            payables,
            receivables,
            billing,
        }
    }

    fn billing_rows(&self) -> Result<&[BillingRow]> {
        self.billing.as_deref().ok_or_else(|| {
            DreError::Other(format!(
                "billing file not found: {}",
                Path::new(&self.settings.data_dir)
                    .join(&self.settings.billing)
                    .display()
            ))
        })
    }

    /// Compute the data for the current page and hand it to its renderer.
    pub fn render(&self, state: &ViewState) -> Result<String> {
        let company = &self.settings.company_name;
        let body = match state.page() {
            None => render::format_home(),
            Some(Page::DashboardGeral) => {
                let data = reports::dashboard(&self.payables, &self.receivables, state.period);
                render::format_dashboard(&data)
            }
            Some(Page::AnaliseFaturamento) => {
                let data = billing::summarize(self.billing_rows()?, state.period);
                render::format_billing(&data)
            }
            Some(Page::DreTrimestral) => {
                let data = reports::quarterly_comparison(
                    &self.payables,
                    &self.receivables,
                    state.focus_month,
                )?;
                render::format_quarterly(&data)
            }
            Some(Page::DreCompleto) => {
                let data = reports::monthly_statements(&self.payables, &self.receivables);
                render::format_monthly_dre(&data)
            }
            Some(Page::RelatorioExecutivo) => {
                let data = reports::executive_report(&self.payables, &self.receivables);
                render::format_executive(&data)
            }
        };
        Ok(render::with_header(company, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;
    use rust_decimal::Decimal;

    fn app(billing: Option<Vec<BillingRow>>) -> App {
        let receivables = vec![Receivable {
            amount: Decimal::new(123450, 2),
            paid_on: chrono::NaiveDate::from_ymd_opt(2024, 3, 1),
            category: "Venda".to_string(),
        }];
        let settings = Settings {
            company_name: "TeutoMaq".to_string(),
            ..Settings::default()
        };
        App::from_parts(settings, Vec::new(), receivables, billing)
    }

    #[test]
    fn test_render_home() {
        let out = app(None).render(&ViewState::default()).unwrap();
        assert!(out.starts_with("TeutoMaq\n"));
        assert!(out.contains("Dashboard Geral"));
    }

    #[test]
    fn test_render_dashboard() {
        let state = ViewState::default()
            .with_period(Period::Month(3))
            .open(Page::DashboardGeral);
        let out = app(None).render(&state).unwrap();
        assert!(out.contains("R$ 1.234,50"));
        assert!(out.contains("Março"));
    }

    #[test]
    fn test_render_billing_without_file_fails() {
        let state = ViewState::default().open(Page::AnaliseFaturamento);
        assert!(matches!(app(None).render(&state), Err(DreError::Other(_))));
        assert!(app(Some(Vec::new())).render(&state).is_ok());
    }

    #[test]
    fn test_render_every_page() {
        let a = app(Some(Vec::new()));
        for page in crate::view::ALL_PAGES {
            let out = a.render(&ViewState::default().open(*page)).unwrap();
            assert!(out.contains(page.title()), "missing title for {page:?}");
        }
    }
}
