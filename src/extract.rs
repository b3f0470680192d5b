// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Best-effort drafts from noisy input: the JSON a bill-reading model returns
//! and free-form voice transcripts. Guessing is allowed here and nowhere
//! else; every draft still goes through `validate` before it is stored.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;

use crate::models::{Category, GstRate, TransactionDraft, TxKind};
use crate::tax::round2;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*").expect("static regex"));
static VOICE_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"₹?\s?(\d[\d,]*(?:\.\d{1,2})?)").expect("static regex"));
static VOICE_VENDOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bto\s+([a-zA-Z][a-zA-Z\s]*)").expect("static regex"));

const INCOME_HINTS: [&str; 3] = ["payment", "received", "income"];
// Whole words only, so "forgot" is not read as "got".
static VOICE_INCOME_HINTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:received|got|income|sold)\b").expect("static regex")
});
static VOICE_EXPENSE_HINTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:paid|spent|bought|expense)\b").expect("static regex")
});

/// Keyword table for guessing a category from a bill description. First
/// match wins.
const CATEGORY_HINTS: [(&str, &[&str]); 8] = [
    ("Marketing", &["brand", "marketing", "design"]),
    ("Software", &["software", "app", "platform"]),
    ("Professional Services", &["consult", "service"]),
    ("Office Supplies", &["office", "supply"]),
    ("Travel", &["travel", "trip"]),
    ("Rent", &["rent", "lease"]),
    ("Utilities", &["utility", "electric", "water"]),
    ("Insurance", &["insurance"]),
];

pub const FALLBACK_CATEGORY: &str = "Other";

/// Closest GST slab to an arbitrary percentage. Ties go to the lower slab.
pub fn nearest_rate(raw: Decimal) -> GstRate {
    let mut best = GstRate::Zero;
    for r in GstRate::ALL {
        let dist = (Decimal::from(r.percent()) - raw).abs();
        let best_dist = (Decimal::from(best.percent()) - raw).abs();
        if dist < best_dist {
            best = r;
        }
    }
    best
}

pub fn guess_category(description: &str) -> &'static str {
    let lower = description.to_lowercase();
    CATEGORY_HINTS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(name, _)| *name)
        .unwrap_or(FALLBACK_CATEGORY)
}

/// Resolve a guessed category name against the known categories,
/// case-insensitively.
pub fn resolve_category(name: &str, categories: &[Category]) -> Option<i64> {
    categories
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
        .map(|c| c.id)
}

fn value_to_decimal(v: &Value) -> Option<Decimal> {
    match v {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            Decimal::from_str(&cleaned).ok()
        }
        _ => None,
    }
}

fn value_to_str(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Normalise the JSON reply of a bill-extraction model into a draft.
///
/// Expected keys: `type`, `vendor`, `amount`, `gstRate`, `description`,
/// `date`, `category`. Markdown code fences around the object are ignored.
pub fn bill_draft(raw: &str, categories: &[Category]) -> Result<TransactionDraft> {
    let cleaned = CODE_FENCE.replace_all(raw, "");
    let v: Value = serde_json::from_str(cleaned.trim())
        .context("Bill extraction reply is not a JSON object")?;
    if !v.is_object() {
        anyhow::bail!("Bill extraction reply is not a JSON object");
    }

    let description = value_to_str(v.get("description")).unwrap_or_default();
    let amount = v.get("amount").and_then(value_to_decimal);

    let tax_rate = match v.get("gstRate").and_then(value_to_decimal) {
        Some(r) => match GstRate::from_percent(r) {
            Ok(exact) => exact,
            Err(_) => {
                let near = nearest_rate(r);
                debug!(raw = %r, clamped = near.percent(), "clamped bill GST rate");
                near
            }
        },
        None => GstRate::Zero,
    };

    let lower = description.to_lowercase();
    let kind = match v.get("type").and_then(Value::as_str).map(TxKind::from_str) {
        Some(Ok(k)) => k,
        _ => {
            if INCOME_HINTS.iter().any(|w| lower.contains(w)) {
                TxKind::Income
            } else {
                TxKind::Expense
            }
        }
    };

    let category_name = value_to_str(v.get("category"))
        .filter(|c| resolve_category(c, categories).is_some())
        .unwrap_or_else(|| guess_category(&description).to_string());

    let transaction_date = value_to_str(v.get("date"))
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());

    Ok(TransactionDraft {
        kind: Some(kind),
        vendor_name: value_to_str(v.get("vendor")).unwrap_or_default(),
        base_amount: amount.map(|a| round2(a.abs())),
        tax_rate: Some(Decimal::from(tax_rate.percent())),
        category_id: resolve_category(&category_name, categories),
        category_name: Some(category_name),
        transaction_date,
        description: (!description.is_empty()).then_some(description),
        is_voice_entry: false,
    })
}

/// Pull what can be recognised out of a spoken sentence such as
/// "paid ₹500 to Sharma Traders". The transcript becomes the description.
pub fn voice_draft(transcript: &str) -> TransactionDraft {
    let text = transcript.trim();

    let base_amount = VOICE_AMOUNT
        .captures(text)
        .and_then(|c| Decimal::from_str(&c[1].replace(',', "")).ok());
    let vendor_name = VOICE_VENDOR
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    let kind = if VOICE_INCOME_HINTS.is_match(text) {
        Some(TxKind::Income)
    } else if VOICE_EXPENSE_HINTS.is_match(text) {
        Some(TxKind::Expense)
    } else {
        None
    };

    TransactionDraft {
        kind,
        vendor_name,
        base_amount,
        description: (!text.is_empty()).then(|| text.to_string()),
        is_voice_entry: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_rate_prefers_lower_slab_on_tie() {
        assert_eq!(nearest_rate(Decimal::from(15)), GstRate::Twelve);
        assert_eq!(nearest_rate(Decimal::from(16)), GstRate::Eighteen);
        assert_eq!(nearest_rate(Decimal::from(100)), GstRate::TwentyEight);
        assert_eq!(nearest_rate(Decimal::from(-3)), GstRate::Zero);
    }

    #[test]
    fn guess_category_first_match_wins() {
        assert_eq!(guess_category("Logo design retainer"), "Marketing");
        assert_eq!(guess_category("Office chair"), "Office Supplies");
        assert_eq!(guess_category("misc"), FALLBACK_CATEGORY);
    }
}
