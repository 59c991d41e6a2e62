//! Plain-text card lists: one card per line with an optional leading
//! quantity, e.g. `4 Lightning Bolt` or `2x Fire/Ice`.

use std::fmt::Write;

use thiserror::Error;

use crate::{Card, CardEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("line {line}: no card name found in '{text}'")]
    MissingName { line: usize, text: String },
    #[error("line {line}: quantity must be at least 1")]
    InvalidQuantity { line: usize },
    #[error("line {line}: quantity '{text}' is too large")]
    QuantityOverflow { line: usize, text: String },
}

impl ImportError {
    /// 1-based number of the offending line.
    pub fn line(&self) -> usize {
        match self {
            ImportError::MissingName { line, .. }
            | ImportError::InvalidQuantity { line }
            | ImportError::QuantityOverflow { line, .. } => *line,
        }
    }
}

/// Parses a whole card list. The first bad line fails the whole input.
///
/// Blank lines are skipped. A name listed twice keeps its first position and
/// the quantities are summed.
pub fn parse_card_list(text: &str) -> Result<Vec<CardEntry>, ImportError> {
    let mut entries: Vec<CardEntry> = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let Some(entry) = parse_line(raw, index + 1)? else {
            continue;
        };
        match entries.iter_mut().find(|e| e.card == entry.card) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(entry.quantity)
            }
            None => entries.push(entry),
        }
    }
    Ok(entries)
}

/// Writes entries in the format [`parse_card_list`] reads back.
pub fn format_card_list(entries: &[CardEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{} {}", entry.quantity, entry.card.name());
    }
    out
}

fn parse_line(raw: &str, line: usize) -> Result<Option<CardEntry>, ImportError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (quantity, rest) = if digits_end == 0 {
        (1, trimmed)
    } else {
        let digits = &trimmed[..digits_end];
        let quantity: u32 = digits.parse().map_err(|_| ImportError::QuantityOverflow {
            line,
            text: digits.to_string(),
        })?;
        if quantity == 0 {
            return Err(ImportError::InvalidQuantity { line });
        }
        let rest = &trimmed[digits_end..];
        let rest = rest
            .strip_prefix('x')
            .or_else(|| rest.strip_prefix('X'))
            .filter(|r| r.starts_with(char::is_whitespace))
            .unwrap_or(rest);
        (quantity, rest)
    };

    if !rest.chars().any(char::is_alphabetic) {
        return Err(ImportError::MissingName {
            line,
            text: trimmed.to_string(),
        });
    }

    Ok(Some(CardEntry::new(Card::new(rest), quantity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_suffix_only_strips_when_followed_by_space() {
        let entry = parse_line("3x Xenagos, the Reveler", 1).unwrap().unwrap();
        assert_eq!(entry.quantity, 3);
        assert_eq!(entry.card.name(), "Xenagos, the Reveler");

        let entry = parse_line("Xenagos, the Reveler", 1).unwrap().unwrap();
        assert_eq!(entry.quantity, 1);
        assert_eq!(entry.card.name(), "Xenagos, the Reveler");
    }
}
