//! Built-in French PCG classification tables.
//!
//! The hand-curated tables mapping PCG account prefixes to CERFA-style
//! statement lines: [`french_balance_sheet`] for the bilan and
//! [`french_income_statement`] for the compte de résultat. Both can be
//! overridden by a declarative config file; these are the defaults a small
//! association needs.
//!
//! Conventions: snapshot balances are debit-positive, so liability and
//! income rules negate, and contra (amortization) rules negate so net =
//! gross - contra holds with positive contra magnitudes.

use crate::rule::{ClassificationRule, RuleSet, SignCondition, SubColumn};
use crate::statement::{GroupSpec, SideLayout, StatementLayout};

fn gross(prefix: &str, group: &str) -> ClassificationRule {
    ClassificationRule::new(prefix, group).in_column(SubColumn::Gross)
}

fn contra(prefix: &str, group: &str) -> ClassificationRule {
    ClassificationRule::new(prefix, group)
        .in_column(SubColumn::Contra)
        .negated()
}

fn passif(prefix: &str, group: &str) -> ClassificationRule {
    ClassificationRule::new(prefix, group).negated()
}

fn charge(prefix: &str, group: &str) -> ClassificationRule {
    ClassificationRule::new(prefix, group)
}

fn produit(prefix: &str, group: &str) -> ClassificationRule {
    ClassificationRule::new(prefix, group).negated()
}

fn spec(id: &str, label: &str) -> GroupSpec {
    GroupSpec {
        id: id.into(),
        label: label.to_owned(),
        paired: false,
    }
}

fn paired(id: &str, label: &str) -> GroupSpec {
    GroupSpec {
        id: id.into(),
        label: label.to_owned(),
        paired: true,
    }
}

/// The balance-sheet (bilan) layout and rule table.
#[must_use]
pub fn french_balance_sheet() -> (StatementLayout, RuleSet) {
    let layout = StatementLayout {
        result_label: "Résultat de l'exercice".to_owned(),
        coverage_prefixes: Vec::new(),
        left: SideLayout {
            title: "Actif".to_owned(),
            groups: vec![
                paired(
                    "immo_incorp_fonds_commercial",
                    "Immobilisations incorporelles : fonds commercial",
                ),
                paired(
                    "immo_incorp_autres",
                    "Immobilisations incorporelles : autres",
                ),
                paired("immo_corp", "Immobilisations corporelles"),
                paired("immo_fin", "Immobilisations financières"),
                paired(
                    "stock_hors_marchandises",
                    "Stocks (autres que marchandises)",
                ),
                paired("stock_marchandises", "Stocks de marchandises"),
                paired("avances", "Avances et acomptes versés"),
                paired("creances_clients", "Créances : clients et comptes rattachés"),
                paired("creances_autres", "Créances : autres créances"),
                paired("valeurs_mobilieres", "Valeurs mobilières de placement"),
                paired("disponibilites", "Disponibilités (autres que caisse)"),
                paired("caisse", "Caisse"),
                paired("charges_constatees_avance", "Charges constatées d'avance"),
            ],
            class_prefixes: Vec::new(),
            negate_raw: false,
        },
        right: SideLayout {
            title: "Passif".to_owned(),
            groups: vec![
                spec("capital", "Capital"),
                spec("ecarts_reevaluation", "Écarts de réévaluation"),
                spec("reserve_legale", "Réserve légale"),
                spec("reserves_reglementees", "Réserves réglementées"),
                spec("reserves_autres", "Réserves : autres"),
                spec("report_a_nouveau", "Report à nouveau"),
                spec("provisions_reglementees", "Provisions réglementées"),
                spec("provisions", "Provisions"),
                spec("dettes_emprunts", "Emprunts et dettes assimilées"),
                spec("dettes_avances", "Avances et acomptes reçus"),
                spec("dettes_fournisseurs", "Fournisseurs et comptes rattachés"),
                spec("dettes_autres", "Dettes : autres"),
                spec("produits_constates_avance", "Produits constatés d'avance"),
            ],
            class_prefixes: Vec::new(),
            negate_raw: true,
        },
    };

    let mut rules = vec![
        // Immobilisations incorporelles : fonds commercial.
        gross("206", "immo_incorp_fonds_commercial"),
        gross("207", "immo_incorp_fonds_commercial"),
        contra("2906", "immo_incorp_fonds_commercial"),
        contra("2909", "immo_incorp_fonds_commercial"),
        // Immobilisations incorporelles : autres.
        gross("201", "immo_incorp_autres"),
        gross("203", "immo_incorp_autres"),
        gross("205", "immo_incorp_autres"),
        gross("208", "immo_incorp_autres"),
        contra("280", "immo_incorp_autres"),
        contra("2905", "immo_incorp_autres"),
        contra("2908", "immo_incorp_autres"),
        // Immobilisations corporelles.
        gross("21", "immo_corp"),
        gross("22", "immo_corp"),
        gross("23", "immo_corp"),
        contra("281", "immo_corp"),
        contra("291", "immo_corp"),
        // Immobilisations financières.
        gross("26", "immo_fin"),
        gross("27", "immo_fin"),
        contra("296", "immo_fin"),
        contra("297", "immo_fin"),
    ];
    // Stocks autres que marchandises.
    for p in 31..=35 {
        rules.push(gross(&p.to_string(), "stock_hors_marchandises"));
    }
    for p in 391..=395 {
        rules.push(contra(&p.to_string(), "stock_hors_marchandises"));
    }
    rules.extend([
        // Stocks de marchandises.
        gross("37", "stock_marchandises"),
        contra("397", "stock_marchandises"),
        // Avances et acomptes versés. The specific prefix shields 4091
        // from the general rules on 40.
        gross("4091", "avances"),
        // Créances : clients et comptes rattachés.
        gross("41", "creances_clients").when(SignCondition::Positive),
        contra("491", "creances_clients"),
        // Créances : autres créances.
        gross("40", "creances_autres").when(SignCondition::Positive),
        gross("42", "creances_autres").when(SignCondition::Positive),
        gross("43", "creances_autres").when(SignCondition::Positive),
        gross("44", "creances_autres").when(SignCondition::Positive),
        gross("45", "creances_autres").when(SignCondition::Positive),
        gross("46", "creances_autres").when(SignCondition::Positive),
        contra("496", "creances_autres"),
        // Valeurs mobilières de placement.
        gross("50", "valeurs_mobilieres"),
        contra("590", "valeurs_mobilieres"),
        // Disponibilités.
        gross("51", "disponibilites").when(SignCondition::Positive),
        gross("54", "disponibilites"),
        gross("58", "disponibilites"),
        gross("53", "caisse"),
        // Charges constatées d'avance.
        gross("486", "charges_constatees_avance"),
        // Passif.
        passif("101", "capital"),
        passif("108", "capital"),
        passif("105", "ecarts_reevaluation"),
        passif("1061", "reserve_legale"),
        passif("1064", "reserves_reglementees"),
        passif("1063", "reserves_autres"),
        passif("1068", "reserves_autres"),
        passif("110", "report_a_nouveau"),
        passif("119", "report_a_nouveau"),
        passif("14", "provisions_reglementees"),
        passif("15", "provisions"),
        passif("16", "dettes_emprunts"),
        // An overdrawn bank account is a debt, not a negative asset.
        passif("51", "dettes_emprunts").when(SignCondition::Negative),
        // Avances et acomptes reçus, shielded from the general 41 rules.
        // A debit-balance 4191 is a receivable and must fall through.
        passif("4191", "dettes_avances").when(SignCondition::Negative),
        passif("40", "dettes_fournisseurs").when(SignCondition::Negative),
        passif("41", "dettes_autres").when(SignCondition::Negative),
        passif("42", "dettes_autres").when(SignCondition::Negative),
        passif("43", "dettes_autres").when(SignCondition::Negative),
        passif("44", "dettes_autres").when(SignCondition::Negative),
        passif("45", "dettes_autres").when(SignCondition::Negative),
        passif("46", "dettes_autres").when(SignCondition::Negative),
        passif("487", "produits_constates_avance"),
    ]);

    (layout, RuleSet::new(rules))
}

/// The income-statement (compte de résultat) layout and rule table.
#[must_use]
pub fn french_income_statement() -> (StatementLayout, RuleSet) {
    let layout = StatementLayout {
        result_label: "Résultat de l'exercice".to_owned(),
        coverage_prefixes: vec!["6".to_owned(), "7".to_owned()],
        left: SideLayout {
            title: "Charges".to_owned(),
            groups: vec![
                spec("achats_marchandises", "Achats de marchandises"),
                spec("variation_stocks", "Variation de stocks"),
                spec("achats_approvisionnements", "Achats d'approvisionnements"),
                spec("autres_charges_externes", "Autres charges externes"),
                spec("impots_taxes", "Impôts, taxes et versements assimilés"),
                spec("remuneration", "Rémunération du personnel"),
                spec("charges_sociales", "Charges sociales"),
                spec("dotations_amortissements", "Dotations aux amortissements"),
                spec("dotations_provisions", "Dotations aux provisions"),
                spec("autres_charges", "Autres charges"),
                spec("charges_financieres", "Charges financières"),
                spec("charges_exceptionnelles", "Charges exceptionnelles"),
                spec("impot_benefices", "Impôt sur les bénéfices"),
            ],
            class_prefixes: vec!["6".to_owned()],
            negate_raw: false,
        },
        right: SideLayout {
            title: "Produits".to_owned(),
            groups: vec![
                spec("ventes_marchandises", "Ventes de marchandises"),
                spec("production_vendue", "Production vendue"),
                spec("production_stockee", "Production stockée"),
                spec("production_immobilisee", "Production immobilisée"),
                spec("subventions_exploitation", "Subventions d'exploitation"),
                spec("autres_produits", "Autres produits"),
                spec("produits_financiers", "Produits financiers"),
                spec("produits_exceptionnels", "Produits exceptionnels"),
            ],
            class_prefixes: vec!["7".to_owned()],
            negate_raw: true,
        },
    };

    let mut rules = vec![
        charge("607", "achats_marchandises"),
        charge("6097", "achats_marchandises"),
        charge("6037", "variation_stocks"),
        charge("6031", "variation_stocks"),
        charge("6032", "variation_stocks"),
        charge("601", "achats_approvisionnements"),
        charge("602", "achats_approvisionnements"),
        charge("604", "achats_approvisionnements"),
        charge("605", "achats_approvisionnements"),
        charge("606", "achats_approvisionnements"),
        charge("61", "autres_charges_externes"),
        charge("62", "autres_charges_externes"),
        charge("63", "impots_taxes"),
        charge("641", "remuneration"),
        charge("644", "remuneration"),
        charge("645", "charges_sociales"),
        charge("646", "charges_sociales"),
        charge("6811", "dotations_amortissements"),
        charge("6815", "dotations_provisions"),
        charge("6817", "dotations_provisions"),
        charge("65", "autres_charges"),
        charge("66", "charges_financieres"),
        charge("686", "charges_financieres"),
        charge("67", "charges_exceptionnelles"),
        charge("687", "charges_exceptionnelles"),
        charge("695", "impot_benefices"),
        charge("697", "impot_benefices"),
        produit("707", "ventes_marchandises"),
        produit("7097", "ventes_marchandises"),
    ];
    for p in ["701", "706", "708", "7091", "7096", "7098"] {
        rules.push(produit(p, "production_vendue"));
    }
    rules.push(produit("713", "production_stockee"));
    rules.push(produit("72", "production_immobilisee"));
    rules.push(produit("74", "subventions_exploitation"));
    for p in ["75", "781", "791"] {
        rules.push(produit(p, "autres_produits"));
    }
    for p in ["76", "786", "796"] {
        rules.push(produit(p, "produits_financiers"));
    }
    for p in ["77", "787", "797"] {
        rules.push(produit(p, "produits_exceptionnels"));
    }

    (layout, RuleSet::new(rules))
}
