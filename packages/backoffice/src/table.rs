//! Terminal tables.
//!
//! Widths are measured with [`console::measure_text_width`], which ignores
//! ANSI escapes, so coloured cells line up with plain ones.

use agency_api::v1::{Amount, Tone};
use colored::{ColoredString, Colorize as _};
use console::{Alignment, measure_text_width, pad_str, truncate_str};

/// Cells wider than this are cut and end with `…`.
pub const MAX_CELL_WIDTH: usize = 40;

const EMPTY: &str = "-";
const TRUNCATED: &str = "…";
const GAP: &str = "  ";

/// A table cell: its text, and optionally the tone of a status badge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    text: String,
    tone: Option<Tone>,
    align: Alignment,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: None,
            align: Alignment::Left,
        }
    }

    /// A status badge.
    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            tone: Some(tone),
            ..Self::new(text)
        }
    }

    /// A money amount, right-aligned.
    pub fn amount(amount: Amount) -> Self {
        Self {
            align: Alignment::Right,
            ..Self::new(amount.to_string())
        }
    }

    pub fn empty() -> Self {
        Self::new(EMPTY)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tone(&self) -> Option<Tone> {
        self.tone
    }

    fn render(&self, width: usize) -> String {
        let text = truncate_str(&self.text, width, TRUNCATED);
        let text = match self.tone {
            Some(tone) => paint(&text, tone).to_string(),
            None => text.into_owned(),
        };
        pad_str(&text, width, self.align, None).into_owned()
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        if text.trim().is_empty() {
            Self::empty()
        } else {
            Self::new(text)
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::from(text.to_string())
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_else(Self::empty)
    }
}

/// Colour the text the way badges of the tone are shown.
pub fn paint(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Success => text.green(),
        Tone::Warning => text.yellow(),
        Tone::Danger => text.red(),
        Tone::Info => text.blue(),
        Tone::Neutral => text.dimmed(),
    }
}

/// Rows of cells under a header line.
#[derive(Clone, Debug)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    max_width: usize,
}

impl Table {
    pub fn new(headers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            max_width: MAX_CELL_WIDTH,
        }
    }

    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width.max(1);
        self
    }

    /// Add a row. Missing trailing cells render as empty; extra cells are
    /// dropped.
    pub fn push(&mut self, row: impl IntoIterator<Item = impl Into<Cell>>) {
        let mut row = row
            .into_iter()
            .map(Into::into)
            .take(self.headers.len())
            .collect::<Vec<Cell>>();
        row.resize_with(self.headers.len(), Cell::empty);
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let widths = self
            .headers
            .iter()
            .enumerate()
            .map(|(column, header)| {
                self.rows
                    .iter()
                    .map(|row| measure_text_width(&row[column].text))
                    .chain([measure_text_width(header)])
                    .max()
                    .unwrap_or_default()
                    .min(self.max_width)
            })
            .collect::<Vec<_>>();

        let header = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(header, &width)| {
                let text = truncate_str(header, width, TRUNCATED);
                let text = text.bold().underline().to_string();
                pad_str(&text, width, Alignment::Left, None).into_owned()
            })
            .collect::<Vec<_>>()
            .join(GAP)
            .trim_end()
            .to_string();

        let mut lines = vec![header];
        lines.extend(self.rows.iter().map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &width)| cell.render(width))
                .collect::<Vec<_>>()
                .join(GAP)
                .trim_end()
                .to_string()
        }));
        lines.join("\n")
    }
}

/// Label/value pairs, one per line, for a single record.
pub fn details(pairs: impl IntoIterator<Item = (impl Into<String>, Cell)>) -> String {
    let pairs = pairs
        .into_iter()
        .map(|(label, cell)| (label.into(), cell))
        .collect::<Vec<(String, Cell)>>();
    let width = pairs
        .iter()
        .map(|(label, _)| measure_text_width(label))
        .max()
        .unwrap_or_default();
    pairs
        .iter()
        .map(|(label, cell)| {
            let label = pad_str(label, width, Alignment::Left, None);
            let value = match cell.tone {
                Some(tone) => paint(&cell.text, tone).to_string(),
                None => cell.text.clone(),
            };
            format!("{}{GAP}{value}", label.bold())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use console::strip_ansi_codes;
    use pretty_assertions::assert_eq as pretty_assert_eq;

    use super::*;

    fn plain(rendered: &str) -> String {
        strip_ansi_codes(rendered).into_owned()
    }

    #[test]
    fn aligns_columns() {
        let mut table = Table::new(["ID", "Nom", "Statut"]);
        table.push([Cell::new("1"), Cell::new("Yasmine Benali"), Cell::toned("Payé", Tone::Success)]);
        table.push([Cell::new("12"), Cell::new("Omar"), Cell::toned("En attente", Tone::Info)]);

        pretty_assert_eq!(
            plain(&table.render()),
            [
                "ID  Nom             Statut",
                "1   Yasmine Benali  Payé",
                "12  Omar            En attente",
            ]
            .join("\n")
        );
    }

    #[test]
    fn truncates_wide_cells() {
        let mut table = Table::new(["Destination"]).with_max_width(8);
        table.push(["Saint-Pétersbourg"]);
        let rendered = plain(&table.render());
        let row = rendered.lines().nth(1).expect("row line");
        pretty_assert_eq!(row, "Saint-P…");
        pretty_assert_eq!(measure_text_width(row), 8);
    }

    #[test]
    fn right_aligns_amounts_and_fills_missing_cells() {
        let mut table = Table::new(["Montant", "Note"]);
        table.push([Cell::amount(Amount::from_cents(150_050))]);
        table.push([Cell::amount(Amount::from_units(20))]);
        pretty_assert_eq!(
            plain(&table.render()),
            ["Montant  Note", "1500.50  -", "  20.00  -"].join("\n")
        );
    }

    #[test]
    fn blank_text_is_empty_cell() {
        pretty_assert_eq!(Cell::from("  "), Cell::empty());
        pretty_assert_eq!(Cell::from(None::<String>), Cell::empty());
        pretty_assert_eq!(Cell::from(Some("Oran")).text(), "Oran");
    }

    #[test]
    fn details_align_labels() {
        let rendered = details([
            ("Nom", Cell::new("Benali")),
            ("Statut", Cell::toned("Payé", Tone::Success)),
        ]);
        pretty_assert_eq!(plain(&rendered), "Nom     Benali\nStatut  Payé");
    }
}
