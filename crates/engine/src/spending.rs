//! Household spending: expense breakdown by category and weekly burn rate.
//!
//! Category labels come from bank imports and hand edits, so they are grouped
//! on a normalized key (accents stripped, case folded, runs of whitespace
//! collapsed). Punctuation is kept, so "Bills & Utilities" and "Bills
//! Utilities" stay apart. The label shown is the first spelling seen.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{AnalysisWindow, MoneyCents, Transaction};

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: String,
    /// Money spent, as a positive amount.
    pub total: MoneyCents,
    /// Fraction of the window's spending, in `[0, 1]`.
    pub share: f64,
    pub transactions: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpendingReport {
    pub window: AnalysisWindow,
    pub total_spent: MoneyCents,
    /// Average spending per 7 days over the window.
    pub weekly_burn_rate: MoneyCents,
    /// Largest category first.
    pub categories: Vec<CategorySpend>,
}

impl SpendingReport {
    pub fn calculate(transactions: &[Transaction], window: AnalysisWindow) -> Self {
        let mut expenses: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| tx.is_expense() && window.contains(tx.date))
            .collect();
        expenses.sort_by_key(|tx| (tx.date, tx.id));

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut categories: Vec<CategorySpend> = Vec::new();
        for tx in expenses {
            let (key, label) = tx
                .category
                .as_deref()
                .and_then(|raw| Some((normalize_key(raw)?, normalize_display(raw)?)))
                .unwrap_or_else(|| (UNCATEGORIZED.to_lowercase(), UNCATEGORIZED.to_string()));

            let slot = *index.entry(key).or_insert_with(|| {
                categories.push(CategorySpend {
                    category: label,
                    total: MoneyCents::ZERO,
                    share: 0.0,
                    transactions: 0,
                });
                categories.len() - 1
            });
            categories[slot].total += tx.amount.abs();
            categories[slot].transactions += 1;
        }

        let total_spent: MoneyCents = categories.iter().map(|c| c.total).sum();
        if total_spent.is_positive() {
            for category in &mut categories {
                category.share = category.total.cents() as f64 / total_spent.cents() as f64;
            }
        }
        categories.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });

        let days = window.days();
        let weekly_burn_rate = if days > 0 {
            MoneyCents::new(total_spent.cents() * 7 / days)
        } else {
            MoneyCents::ZERO
        };

        Self {
            window,
            total_spent,
            weekly_burn_rate,
            categories,
        }
    }
}

fn normalize_display(input: &str) -> Option<String> {
    let out = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if out.is_empty() { None } else { Some(out) }
}

fn normalize_key(input: &str) -> Option<String> {
    let folded: String = input
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect();
    normalize_display(&folded)
}
