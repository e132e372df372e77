pub mod init;
pub mod render;
pub mod report;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dre",
    version,
    about = "Income statement (DRE) dashboards from payables and receivables exports."
)]
pub struct Cli {
    /// Directory holding the CSV exports (overrides settings.json)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Log loading and aggregation details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write settings.json and create the data directory.
    Init {
        /// Company name shown above every page
        #[arg(long)]
        company: Option<String>,
    },
    /// Dashboard Geral: KPIs, monthly series and top cost centres.
    Dashboard {
        /// Month number (1-12); annual when omitted
        #[arg(long)]
        month: Option<u32>,
    },
    /// Análise de Faturamento: billing KPIs and rankings.
    Billing {
        /// Month number (1-12); annual when omitted
        #[arg(long)]
        month: Option<u32>,
    },
    /// DRE Trimestral: previous, focus and next month plus the year.
    Quarterly {
        /// Focus month (2-11)
        #[arg(long)]
        month: u32,
    },
    /// DRE Completo: twelve monthly statements and a total row.
    Statement,
    /// Relatório Executivo: annual summary and findings.
    Executive,
    /// Open any page by its Portuguese name, or "Início" for the page list.
    View {
        /// Page name, e.g. "DRE Completo"
        page: String,
        #[arg(long)]
        month: Option<u32>,
    },
}
