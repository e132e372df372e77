use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::models::{Payable, RawPayable};

static LEADING_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s*").expect("valid leading code pattern"));

/// Strip a leading numeric account code: "4101 Energia" -> "Energia".
pub fn clean_category(raw: &str) -> String {
    LEADING_CODE.replace(raw, "").into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountClass {
    pub group: Option<String>,
    pub classification: Option<String>,
}

/// Static reference data: account -> (Grupo, Classificação), plus the legacy
/// category rename map.
#[derive(Debug, Clone, Default)]
pub struct ClassificationTable {
    accounts: HashMap<String, AccountClass>,
    renames: HashMap<String, String>,
}

impl ClassificationTable {
    /// Duplicate keys keep the first entry seen.
    pub fn new(
        accounts: impl IntoIterator<Item = (String, AccountClass)>,
        renames: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut table = Self::default();
        for (name, class) in accounts {
            if table.accounts.contains_key(&name) {
                warn!("duplicate classification for account '{name}', keeping the first");
                continue;
            }
            table.accounts.insert(name, class);
        }
        for (old, new) in renames {
            if table.renames.contains_key(&old) {
                warn!("duplicate rename for category '{old}', keeping the first");
                continue;
            }
            table.renames.insert(old, new);
        }
        table
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// ContaPadrao for a raw ledger category.
    pub fn standard_account(&self, category: &str) -> String {
        let cleaned = clean_category(category);
        match self.renames.get(&cleaned) {
            Some(new) => new.clone(),
            None => cleaned,
        }
    }

    pub fn lookup(&self, account: &str) -> Option<&AccountClass> {
        self.accounts.get(account)
    }

    pub fn classify(&self, raw: RawPayable) -> Payable {
        let account = self.standard_account(&raw.category);
        let (group, classification) = match self.lookup(&account) {
            Some(class) => (class.group.clone(), class.classification.clone()),
            None => (None, None),
        };
        Payable {
            amount: raw.amount,
            paid_on: raw.paid_on,
            category: raw.category,
            cost_center: raw.cost_center,
            account,
            group,
            classification,
        }
    }

    pub fn classify_all(&self, rows: Vec<RawPayable>) -> Vec<Payable> {
        let payables: Vec<Payable> = rows.into_iter().map(|r| self.classify(r)).collect();
        let missing = unclassified_categories(&payables);
        debug!(
            "classified {} payables, {} categories without a classification entry",
            payables.len(),
            missing.len()
        );
        for category in &missing {
            debug!("unclassified category '{category}'");
        }
        payables
    }
}

/// Distinct raw categories whose account has neither Grupo nor
/// Classificação, in first-seen order.
pub fn unclassified_categories(payables: &[Payable]) -> Vec<&str> {
    let mut seen = HashSet::new();
    payables
        .iter()
        .filter(|p| p.group.is_none() && p.classification.is_none())
        .map(|p| p.category.as_str())
        .filter(|c| seen.insert(*c))
        .collect()
}
