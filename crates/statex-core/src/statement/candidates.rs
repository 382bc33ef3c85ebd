//! Monetary value candidates in a row's value columns.

use tracing::trace;

use super::rules::patterns::AMOUNT_PATTERN;
use super::tokens::PositionedToken;
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;

/// A parsed figure and the horizontal position of the token it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericCandidate {
    pub value: f64,
    pub x_frac: f32,
}

/// Parse a matched amount. A leading `(` or `-` makes it negative;
/// separators and parentheses are stripped.
pub fn parse_amount(raw: &str) -> Result<f64, ExtractionError> {
    let negative = raw.starts_with('(') || raw.starts_with('-');
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '-'))
        .collect();

    let value: f64 = digits
        .parse()
        .map_err(|_| ExtractionError::NumericParse(raw.to_string()))?;

    Ok(if negative { -value } else { value })
}

/// Whether a parsed value can be a monetary figure rather than a note
/// reference or a year label.
pub fn is_plausible(value: f64, config: &ExtractionConfig) -> bool {
    if value.abs() < config.min_magnitude {
        return false;
    }
    !(value > config.year_floor && value < config.year_ceiling)
}

/// Extract candidates from tokens at or right of `value_column_start`,
/// sorted by position. `tokens` may be in any order; ties keep it.
pub fn extract_candidates(
    tokens: &[&PositionedToken],
    config: &ExtractionConfig,
) -> Vec<NumericCandidate> {
    let mut candidates = Vec::new();

    for token in tokens
        .iter()
        .filter(|t| t.x_frac >= config.value_column_start)
    {
        for m in AMOUNT_PATTERN.find_iter(&token.text) {
            let value = match parse_amount(m.as_str()) {
                Ok(v) => v,
                Err(e) => {
                    trace!("Dropping candidate: {}", e);
                    continue;
                }
            };

            if !is_plausible(value, config) {
                trace!("Filtered {} at x={:.3}", value, token.x_frac);
                continue;
            }

            candidates.push(NumericCandidate {
                value,
                x_frac: token.x_frac,
            });
        }
    }

    candidates.sort_by(|a, b| a.x_frac.total_cmp(&b.x_frac));
    candidates
}

/// The leftmost candidate: the column just right of the labels, which
/// holds the current reporting period.
pub fn best_value(candidates: &[NumericCandidate]) -> Option<f64> {
    candidates.first().map(|c| c.value)
}
