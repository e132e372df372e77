use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DreError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default)]
    pub company_name: String,
    /// Payables exports, one per company, concatenated in order.
    #[serde(default = "default_payables")]
    pub payables: Vec<String>,
    #[serde(default = "default_receivables")]
    pub receivables: Vec<String>,
    #[serde(default = "default_classification_accounts")]
    pub classification_accounts: String,
    #[serde(default = "default_classification_renames")]
    pub classification_renames: String,
    #[serde(default = "default_billing")]
    pub billing: String,
}

fn default_payables() -> Vec<String> {
    vec!["contasapagar.csv".to_string()]
}

fn default_receivables() -> Vec<String> {
    vec!["contasareceber.csv".to_string()]
}

fn default_classification_accounts() -> String {
    "classificacao_contas.csv".to_string()
}

fn default_classification_renames() -> String {
    "classificacao_mapa.csv".to_string()
}

fn default_billing() -> String {
    "faturamento.csv".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            company_name: String::new(),
            payables: default_payables(),
            receivables: default_receivables(),
            classification_accounts: default_classification_accounts(),
            classification_renames: default_classification_renames(),
            billing: default_billing(),
        }
    }
}

impl Settings {
    pub fn data_path(&self, file: &str) -> PathBuf {
        Path::new(&self.data_dir).join(file)
    }

    pub fn payables_paths(&self) -> Vec<PathBuf> {
        self.payables.iter().map(|f| self.data_path(f)).collect()
    }

    pub fn receivables_paths(&self) -> Vec<PathBuf> {
        self.receivables.iter().map(|f| self.data_path(f)).collect()
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("dre")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("dre")
}

pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        debug!("no settings at {}, using defaults", path.display());
        Settings::default()
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| DreError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<PathBuf> {
    let path = settings_path();
    save_settings_to(settings, &path)?;
    Ok(path)
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
