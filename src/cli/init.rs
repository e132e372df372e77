use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(data_dir: Option<String>, company: Option<String>) -> Result<()> {
    let mut settings = load_settings();

    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    if let Some(name) = company {
        settings.company_name = name.trim().to_string();
    }

    let path = save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;

    println!("Settings written to {}", path.display());
    println!("Place the CSV exports in {}:", resolved.display());
    for file in settings
        .payables
        .iter()
        .chain(settings.receivables.iter())
        .chain([
            &settings.classification_accounts,
            &settings.classification_renames,
            &settings.billing,
        ])
    {
        println!("  {file}");
    }
    Ok(())
}
