//! LaTeX table bodies and template substitution.
//!
//! The arithmetic is done here, not in the template: each function emits the
//! rows of one `tabular` body, and [`apply_template`] splices the bodies
//! into a user-supplied template at `{{ name }}` markers. The template owns
//! the page layout, column definitions and headers.

use crate::{format_amount, format_total};
use bilan_aggregate::{BudgetComparison, BudgetEntry, BudgetStatement};
use bilan_core::{GroupColumns, ResultLine, Side, SideRef, Statement};
use std::collections::HashMap;
use std::fmt::Write;

/// Escape the LaTeX special characters that occur in labels and codes.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            _ => out.push(c),
        }
    }
    out
}

fn paired_rows(out: &mut String, group: &bilan_core::StatementGroup) {
    let GroupColumns::Paired { gross, contra } = &group.columns else {
        return;
    };
    let _ = writeln!(
        out,
        "\\textbf{{{}}} & \\textbf{{{}}} & \\textbf{{{}}} & \\textbf{{{}}} \\\\",
        escape(&group.label),
        format_total(gross.total),
        format_total(contra.total),
        format_total(group.total()),
    );
    // Per-account detail: contra magnitudes shown in the amort column.
    let mut rows: HashMap<&str, (Option<String>, Option<String>)> = HashMap::new();
    for entry in &gross.entries {
        rows.entry(entry.account.as_str()).or_default().0 = Some(format_amount(entry.amount));
    }
    for entry in &contra.entries {
        rows.entry(entry.account.as_str()).or_default().1 = Some(format_amount(entry.amount));
    }
    let mut accounts: Vec<&str> = rows.keys().copied().collect();
    accounts.sort_unstable();
    for account in accounts {
        let (gross_cell, contra_cell) = &rows[account];
        let _ = writeln!(
            out,
            "{} & {} & {} & \\\\",
            escape(account),
            gross_cell.as_deref().unwrap_or(""),
            contra_cell.as_deref().unwrap_or(""),
        );
    }
    out.push_str("&&&\\\\\n");
}

fn simple_rows(out: &mut String, group: &bilan_core::StatementGroup) {
    let GroupColumns::Single(col) = &group.columns else {
        return;
    };
    let _ = writeln!(
        out,
        "\\textbf{{{}}} & \\textbf{{{}}} \\\\",
        escape(&group.label),
        format_total(col.total),
    );
    for entry in &col.entries {
        let _ = writeln!(
            out,
            "{} & {} \\\\",
            escape(entry.account.as_str()),
            format_amount(entry.amount),
        );
    }
    out.push_str("&\\\\\n");
}

fn side_body(side: &Side, result: Option<&ResultLine>) -> String {
    let mut out = String::new();
    for group in &side.groups {
        match &group.columns {
            GroupColumns::Paired { .. } => paired_rows(&mut out, group),
            GroupColumns::Single(_) => simple_rows(&mut out, group),
        }
    }
    if let Some(line) = result {
        let _ = writeln!(
            out,
            "\\textbf{{{}}} & \\textbf{{{}}} \\\\",
            escape(&line.label),
            format_amount(line.amount),
        );
    }
    out
}

/// Emit the table bodies of a statement's two sides.
#[must_use]
pub fn statement(stmt: &Statement) -> (String, String) {
    let (left_result, right_result) = match stmt.result.side {
        SideRef::Left => (Some(&stmt.result), None),
        SideRef::Right => (None, Some(&stmt.result)),
    };
    (
        side_body(&stmt.left, left_result),
        side_body(&stmt.right, right_result),
    )
}

fn budget_body(column: &bilan_aggregate::BudgetColumn, result: Option<&ResultLine>) -> String {
    let mut out = String::new();
    for entry in &column.entries {
        match entry {
            BudgetEntry::Heading(heading) => {
                let _ = writeln!(out, "\\textbf{{{}}} & & \\\\", escape(heading));
            }
            BudgetEntry::Row(row) => {
                let _ = writeln!(
                    out,
                    "{} & {} & {} \\\\",
                    escape(&row.label),
                    format_amount(row.budget),
                    format_amount(row.realised),
                );
            }
        }
    }
    if let Some(line) = result {
        let _ = writeln!(
            out,
            "{} & & {} \\\\",
            escape(&line.label),
            format_amount(line.amount),
        );
    }
    let _ = writeln!(
        out,
        "\\hline\nTotal & {} & {} \\\\",
        format_amount(column.total_budget),
        format_amount(column.total_realised),
    );
    out
}

/// Emit the table bodies of a budget statement's two columns.
#[must_use]
pub fn budget(stmt: &BudgetStatement) -> (String, String) {
    let (left_result, right_result) = match stmt.result.side {
        SideRef::Left => (Some(&stmt.result), None),
        SideRef::Right => (None, Some(&stmt.result)),
    };
    (
        budget_body(&stmt.expenses, left_result),
        budget_body(&stmt.income, right_result),
    )
}

/// Emit the table bodies of a two-year budget comparison.
#[must_use]
pub fn comparison(cmp: &BudgetComparison) -> (String, String) {
    let body = |rows: &[bilan_aggregate::ComparisonRow]| {
        let mut out = String::new();
        for row in rows {
            let _ = writeln!(
                out,
                "{} & {} & {} \\\\",
                escape(&row.label),
                format_amount(row.budget_n),
                format_amount(row.budget_n1),
            );
        }
        out
    };
    (body(&cmp.expenses), body(&cmp.income))
}

/// Substitute named bodies into a template at `{{ name }}` markers.
///
/// Both the spaced and unspaced marker forms are recognized. Markers with
/// no matching substitution are left in place.
#[must_use]
pub fn apply_template(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = template.to_owned();
    for (name, body) in substitutions {
        out = out.replace(&format!("{{{{ {name} }}}}"), body);
        out = out.replace(&format!("{{{{{name}}}}}"), body);
    }
    out
}
