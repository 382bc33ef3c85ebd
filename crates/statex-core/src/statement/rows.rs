//! Grouping of positioned tokens into horizontal rows.

use super::tokens::PositionedToken;

/// Tokens judged to lie on the same line of text.
///
/// Tokens are kept in the order they were clustered (by `y`); use
/// [`Row::reading_order`] for left-to-right order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub tokens: Vec<PositionedToken>,
}

impl Row {
    /// `y` of the row's first token.
    pub fn top(&self) -> f32 {
        self.tokens.first().map(|t| t.y).unwrap_or(0.0)
    }

    /// Tokens sorted left to right. Ties keep clustering order.
    pub fn reading_order(&self) -> Vec<&PositionedToken> {
        let mut ordered: Vec<&PositionedToken> = self.tokens.iter().collect();
        ordered.sort_by(|a, b| a.x_frac.total_cmp(&b.x_frac));
        ordered
    }

    /// Lower-cased text of the row in reading order.
    pub fn text(&self) -> String {
        self.reading_order()
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// Cluster tokens into rows, top to bottom.
///
/// Tokens are stably sorted by `y`; a new row starts whenever the gap to the
/// previous token exceeds `tolerance`. The tolerance is in the same unit as
/// `y`.
pub fn cluster_rows(tokens: &[PositionedToken], tolerance: f32) -> Vec<Row> {
    let mut sorted: Vec<&PositionedToken> = tokens.iter().collect();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y));

    let mut rows: Vec<Row> = Vec::new();
    let mut current: Vec<PositionedToken> = Vec::new();
    let mut last_y = f32::NEG_INFINITY;

    for token in sorted {
        if !current.is_empty() && token.y - last_y > tolerance {
            rows.push(Row {
                tokens: std::mem::take(&mut current),
            });
        }
        last_y = token.y;
        current.push(token.clone());
    }

    if !current.is_empty() {
        rows.push(Row { tokens: current });
    }

    rows
}
