use crate::error::{DreError, Result};
use crate::models::Period;

/// Dashboard pages, by the names shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    DashboardGeral,
    AnaliseFaturamento,
    DreTrimestral,
    DreCompleto,
    RelatorioExecutivo,
}

/// Name of the page list shown before any dashboard is opened.
pub const HOME_TITLE: &str = "Início";

pub const ALL_PAGES: &[Page] = &[
    Page::DashboardGeral,
    Page::AnaliseFaturamento,
    Page::DreTrimestral,
    Page::DreCompleto,
    Page::RelatorioExecutivo,
];

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Self::DashboardGeral => "Dashboard Geral",
            Self::AnaliseFaturamento => "Análise de Faturamento",
            Self::DreTrimestral => "DRE Trimestral",
            Self::DreCompleto => "DRE Completo",
            Self::RelatorioExecutivo => "Relatório Executivo",
        }
    }

    /// Case-insensitive lookup by title.
    pub fn from_name(name: &str) -> Result<Self> {
        let wanted = name.trim().to_lowercase();
        ALL_PAGES
            .iter()
            .find(|p| p.title().to_lowercase() == wanted)
            .copied()
            .ok_or_else(|| DreError::UnknownPage(name.to_string()))
    }

    /// Pages with a month selector.
    pub fn uses_period(&self) -> bool {
        matches!(self, Self::DashboardGeral | Self::AnaliseFaturamento)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Home,
    Dashboard(Page),
}

/// What to render. Transitions consume the state and hand back a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub screen: Screen,
    pub period: Period,
    /// Center month of the quarterly comparison, February through November.
    pub focus_month: u32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            screen: Screen::Home,
            period: Period::Annual,
            focus_month: 2,
        }
    }
}

impl ViewState {
    pub fn open(self, page: Page) -> Self {
        Self {
            screen: Screen::Dashboard(page),
            ..self
        }
    }

    pub fn back(self) -> Self {
        Self {
            screen: Screen::Home,
            ..self
        }
    }

    /// Follow a page name: `Início` goes back home, anything else opens
    /// that page.
    pub fn navigate(self, name: &str) -> Result<Self> {
        if name.trim().to_lowercase() == HOME_TITLE.to_lowercase() {
            return Ok(self.back());
        }
        Ok(self.open(Page::from_name(name)?))
    }

    pub fn with_period(self, period: Period) -> Self {
        Self { period, ..self }
    }

    pub fn with_focus_month(self, month: u32) -> Result<Self> {
        if !(2..=11).contains(&month) {
            return Err(DreError::InvalidMonth(month));
        }
        Ok(Self {
            focus_month: month,
            ..self
        })
    }

    pub fn page(&self) -> Option<Page> {
        match self.screen {
            Screen::Home => None,
            Screen::Dashboard(page) => Some(page),
        }
    }
}
