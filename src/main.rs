mod app;
mod billing;
mod classification;
mod cli;
mod error;
mod fmt;
mod importer;
mod log;
mod models;
mod reports;
mod settings;
mod view;

use clap::Parser;

use cli::{Cli, Commands};
use view::Page;

fn main() {
    let cli = Cli::parse();
    log::init_logging(cli.verbose);

    let data_dir = cli.data_dir;
    let result = match cli.command {
        Commands::Init { company } => cli::init::run(data_dir, company),
        Commands::Dashboard { month } => cli::report::page(data_dir, Page::DashboardGeral, month),
        Commands::Billing { month } => {
            cli::report::page(data_dir, Page::AnaliseFaturamento, month)
        }
        Commands::Quarterly { month } => {
            cli::report::page(data_dir, Page::DreTrimestral, Some(month))
        }
        Commands::Statement => cli::report::page(data_dir, Page::DreCompleto, None),
        Commands::Executive => cli::report::page(data_dir, Page::RelatorioExecutivo, None),
        Commands::View { page, month } => cli::report::view(data_dir, &page, month),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
