//! Declarative configuration loading.
//!
//! Statement shapes and classification tables are data, not code. A
//! statement config is a JSON document carrying a [`StatementLayout`] and an
//! ordered rule list; a budget chart is the two-list document described in
//! [`bilan_core::BudgetChart`]. Both are validated at load time, and every
//! configuration defect is fatal: a bad table would silently produce a wrong
//! statement, so nothing downstream ever sees one.
//!
//! ```
//! let json = r#"{
//!     "layout": {
//!         "result_label": "Résultat",
//!         "left":  { "title": "Charges",  "groups": [{ "id": "charges",  "label": "Charges" }] },
//!         "right": { "title": "Produits", "groups": [{ "id": "produits", "label": "Produits" }] }
//!     },
//!     "rules": [
//!         { "prefix": "6", "group": "charges" },
//!         { "prefix": "7", "group": "produits", "negate": true }
//!     ]
//! }"#;
//! let (layout, rules) = bilan_config::parse_statement(json).unwrap();
//! assert_eq!(rules.rules().len(), 2);
//! assert_eq!(layout.left.title, "Charges");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use bilan_core::{
    AccountCode, BudgetChart, BudgetLine, ClassificationRule, GroupId, RuleSet, StatementLayout,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid JSON for the expected shape.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A rule routes to a group the layout never declares.
    #[error("rule on prefix {prefix} targets undefined group {group}")]
    UndefinedGroup {
        /// The offending rule's prefix.
        prefix: String,
        /// The undeclared group.
        group: GroupId,
    },

    /// The same group id is declared twice.
    #[error("group {0} is declared more than once")]
    DuplicateGroup(GroupId),

    /// Two rules with the same prefix, overlapping sign conditions and the
    /// same sub-column route to different groups.
    #[error("conflicting rules on prefix {prefix}: groups {first} and {second}")]
    ConflictingRules {
        /// The shared prefix.
        prefix: String,
        /// First group.
        first: GroupId,
        /// Second, disagreeing group.
        second: GroupId,
    },

    /// A budget chart side has no budget line at all.
    #[error("budget chart has an empty {0} side")]
    EmptyChart(&'static str),

    /// An account code appears in more than one budget line.
    #[error("account {account} appears in both {first:?} and {second:?}")]
    DuplicateAccount {
        /// The duplicated code.
        account: AccountCode,
        /// First line label.
        first: String,
        /// Second line label.
        second: String,
    },
}

/// The on-disk shape of a statement configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StatementConfig {
    /// Group layout of both sides.
    pub layout: StatementLayout,
    /// Classification rules, in declaration order.
    pub rules: Vec<ClassificationRule>,
}

fn validate_statement(config: &StatementConfig) -> Result<(), ConfigError> {
    let mut seen: HashSet<&GroupId> = HashSet::new();
    for spec in config.layout.groups() {
        if !seen.insert(&spec.id) {
            return Err(ConfigError::DuplicateGroup(spec.id.clone()));
        }
    }

    for rule in &config.rules {
        if !config.layout.declares(&rule.group) {
            return Err(ConfigError::UndefinedGroup {
                prefix: rule.prefix.clone(),
                group: rule.group.clone(),
            });
        }
    }

    // Two rules may share a prefix only when their sign conditions are
    // disjoint or they aim at the same (group, column) target.
    for (i, a) in config.rules.iter().enumerate() {
        for b in &config.rules[i + 1..] {
            if a.prefix == b.prefix
                && a.column == b.column
                && a.sign.overlaps(b.sign)
                && a.group != b.group
            {
                return Err(ConfigError::ConflictingRules {
                    prefix: a.prefix.clone(),
                    first: a.group.clone(),
                    second: b.group.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Parse and validate a statement configuration from a JSON string.
pub fn parse_statement(json: &str) -> Result<(StatementLayout, RuleSet), ConfigError> {
    let config: StatementConfig = serde_json::from_str(json)?;
    validate_statement(&config)?;
    debug!(
        groups = config.layout.groups().count(),
        rules = config.rules.len(),
        "statement configuration loaded"
    );
    Ok((config.layout, RuleSet::new(config.rules)))
}

/// Load and validate a statement configuration file.
pub fn load_statement(path: &Path) -> Result<(StatementLayout, RuleSet), ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse_statement(&json)
}

fn validate_budget(chart: &BudgetChart) -> Result<(), ConfigError> {
    let has_line = |lines: &[BudgetLine]| lines.iter().any(|l| !l.is_heading());
    if !has_line(&chart.expenses) {
        return Err(ConfigError::EmptyChart("expense"));
    }
    if !has_line(&chart.income) {
        return Err(ConfigError::EmptyChart("income"));
    }

    let mut owner: HashMap<&AccountCode, &str> = HashMap::new();
    for line in chart.expenses.iter().chain(chart.income.iter()) {
        let BudgetLine::Line {
            label, accounts, ..
        } = line
        else {
            continue;
        };
        for account in accounts {
            if let Some(first) = owner.insert(account, label) {
                return Err(ConfigError::DuplicateAccount {
                    account: account.clone(),
                    first: first.to_owned(),
                    second: label.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Parse and validate a budget chart from a JSON string.
pub fn parse_budget(json: &str) -> Result<BudgetChart, ConfigError> {
    let chart: BudgetChart = serde_json::from_str(json)?;
    validate_budget(&chart)?;
    debug!(accounts = chart.accounts().len(), "budget chart loaded");
    Ok(chart)
}

/// Load and validate a budget chart file.
pub fn load_budget(path: &Path) -> Result<BudgetChart, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse_budget(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilan_core::SubColumn;
    use std::io::Write;

    const MINIMAL: &str = r#"{
        "layout": {
            "result_label": "Résultat de l'exercice",
            "coverage_prefixes": ["6", "7"],
            "left": {
                "title": "Charges",
                "groups": [{ "id": "charges", "label": "Charges" }],
                "class_prefixes": ["6"]
            },
            "right": {
                "title": "Produits",
                "groups": [{ "id": "produits", "label": "Produits" }],
                "class_prefixes": ["7"],
                "negate_raw": true
            }
        },
        "rules": [
            { "prefix": "6", "group": "charges" },
            { "prefix": "7", "group": "produits", "negate": true }
        ]
    }"#;

    #[test]
    fn test_parse_minimal_statement() {
        let (layout, rules) = parse_statement(MINIMAL).unwrap();
        assert_eq!(layout.result_label, "Résultat de l'exercice");
        assert_eq!(rules.rules().len(), 2);
        assert!(rules.rules()[1].negate);
        assert_eq!(rules.rules()[0].sign, bilan_core::SignCondition::Any);
    }

    #[test]
    fn test_paired_group_and_columns() {
        let json = r#"{
            "layout": {
                "result_label": "Résultat",
                "left": {
                    "title": "Actif",
                    "groups": [{ "id": "immo", "label": "Immobilisations", "paired": true }]
                },
                "right": { "title": "Passif", "groups": [] }
            },
            "rules": [
                { "prefix": "21", "group": "immo", "column": "gross" },
                { "prefix": "281", "group": "immo", "column": "contra", "negate": true }
            ]
        }"#;
        let (layout, rules) = parse_statement(json).unwrap();
        assert!(layout.left.groups[0].paired);
        assert_eq!(rules.rules()[0].column, SubColumn::Gross);
        assert_eq!(rules.rules()[1].column, SubColumn::Contra);
    }

    #[test]
    fn test_undefined_group_is_fatal() {
        let json = MINIMAL.replace("\"group\": \"produits\"", "\"group\": \"ventes\"");
        let err = parse_statement(&json).unwrap_err();
        assert!(matches!(err, ConfigError::UndefinedGroup { .. }));
    }

    #[test]
    fn test_duplicate_group_is_fatal() {
        let json = MINIMAL.replace("\"id\": \"produits\"", "\"id\": \"charges\"");
        let json = json.replace("\"group\": \"produits\"", "\"group\": \"charges\"");
        let err = parse_statement(&json).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateGroup(_)));
    }

    #[test]
    fn test_conflicting_rules_are_fatal() {
        let json = r#"{
            "layout": {
                "result_label": "Résultat",
                "left": {
                    "title": "Charges",
                    "groups": [
                        { "id": "a", "label": "A" },
                        { "id": "b", "label": "B" }
                    ]
                },
                "right": { "title": "Produits", "groups": [] }
            },
            "rules": [
                { "prefix": "61", "group": "a" },
                { "prefix": "61", "group": "b" }
            ]
        }"#;
        let err = parse_statement(json).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingRules { .. }));
    }

    #[test]
    fn test_disjoint_signs_do_not_conflict() {
        let json = r#"{
            "layout": {
                "result_label": "Résultat",
                "left": { "title": "Actif", "groups": [{ "id": "creances", "label": "Créances" }] },
                "right": { "title": "Passif", "groups": [{ "id": "dettes", "label": "Dettes" }] }
            },
            "rules": [
                { "prefix": "40", "group": "creances", "sign": "positive" },
                { "prefix": "40", "group": "dettes", "sign": "negative", "negate": true }
            ]
        }"#;
        let (_, rules) = parse_statement(json).unwrap();
        assert_eq!(rules.rules().len(), 2);
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        assert!(matches!(
            parse_statement("{ not json").unwrap_err(),
            ConfigError::Json(_)
        ));
    }

    const BUDGET: &str = r#"{
        "expenses": [
            { "title": "Fonctionnement" },
            { "label": "Fournitures", "budget": "300.00", "accounts": ["6061", "6064"] },
            { "label": "Assurance", "budget": "150.00", "accounts": ["616"] }
        ],
        "income": [
            { "label": "Cotisations", "budget": "450.00", "accounts": ["756"] }
        ]
    }"#;

    #[test]
    fn test_parse_budget_chart() {
        let chart = parse_budget(BUDGET).unwrap();
        assert!(chart.expenses[0].is_heading());
        assert_eq!(chart.accounts().len(), 4);
        assert!(chart.covers(&"616".parse().unwrap()));
    }

    #[test]
    fn test_empty_budget_side_is_fatal() {
        let json = r#"{
            "expenses": [
                { "label": "Assurance", "budget": "150.00", "accounts": ["616"] }
            ],
            "income": [
                { "title": "Recettes" }
            ]
        }"#;
        let err = parse_budget(json).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyChart("income")));
    }

    #[test]
    fn test_duplicate_budget_account_is_fatal() {
        let json = BUDGET.replace("\"6064\"", "\"616\"");
        let err = parse_budget(&json).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateAccount { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let (layout, rules) = load_statement(file.path()).unwrap();
        assert_eq!(layout.left.groups.len(), 1);
        assert_eq!(rules.rules().len(), 2);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_statement(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/config.json"));
    }
}
