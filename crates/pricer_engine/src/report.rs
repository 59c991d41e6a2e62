use std::sync::Arc;

use pricer_core::{format_price, Card, SearchOutcome, SearchSettings, SourceId};

use crate::ResultStore;

const NAME_HEADER: &str = "Name";
const QUANTITY_HEADER: &str = "Quantity";
const TOTAL_LABEL: &str = "Total price";
const COLUMN_SEPARATOR: &str = " | ";

/// One card/source cell of the price grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridCell {
    /// Not searched, either because the search is still running or it was
    /// stopped first.
    Pending,
    NotFound,
    Price { amount: f64, currency: String },
}

impl GridCell {
    pub fn text(&self) -> String {
        match self {
            GridCell::Pending => String::new(),
            GridCell::NotFound => "not found".to_string(),
            GridCell::Price { amount, currency } => format_price(*amount, currency),
        }
    }
}

impl From<Option<SearchOutcome>> for GridCell {
    fn from(outcome: Option<SearchOutcome>) -> Self {
        match outcome {
            None => GridCell::Pending,
            Some(SearchOutcome::NotFound) => GridCell::NotFound,
            Some(SearchOutcome::Found(result)) => GridCell::Price {
                amount: result.price(),
                currency: result.currency().to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub card: Card,
    pub quantity: u32,
    pub cells: Vec<GridCell>,
}

/// Price of the whole list at one source, counting only found cards.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTotal {
    pub source: SourceId,
    pub amount: f64,
    pub currency: Option<String>,
    pub found: usize,
}

impl SourceTotal {
    pub fn text(&self) -> String {
        match &self.currency {
            Some(currency) => format_price(self.amount, currency),
            None => format!("{:.2}", self.amount),
        }
    }
}

/// Cards as rows, enabled sources as columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceGrid {
    sources: Vec<SourceId>,
    rows: Vec<GridRow>,
}

impl PriceGrid {
    /// Lays out `stores` in the order of the settings' sources. A source
    /// without a store shows every card as pending.
    pub fn build(settings: &SearchSettings, stores: &[Arc<ResultStore>]) -> Self {
        let sources = settings.sources().to_vec();
        let columns: Vec<Option<&Arc<ResultStore>>> = sources
            .iter()
            .map(|id| stores.iter().find(|store| store.source() == id))
            .collect();

        let rows = settings
            .entries()
            .into_iter()
            .map(|entry| {
                let cells = columns
                    .iter()
                    .map(|store| GridCell::from(store.and_then(|store| store.get(&entry.card))))
                    .collect();
                GridRow {
                    card: entry.card,
                    quantity: entry.quantity,
                    cells,
                }
            })
            .collect();

        Self { sources, rows }
    }

    pub fn sources(&self) -> &[SourceId] {
        &self.sources
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// Sum of price times quantity per source.
    pub fn totals(&self) -> Vec<SourceTotal> {
        self.sources
            .iter()
            .enumerate()
            .map(|(column, source)| {
                let mut total = SourceTotal {
                    source: source.clone(),
                    amount: 0.0,
                    currency: None,
                    found: 0,
                };
                for row in &self.rows {
                    if let Some(GridCell::Price { amount, currency }) = row.cells.get(column) {
                        total.amount += amount * f64::from(row.quantity);
                        total.found += 1;
                        total.currency.get_or_insert_with(|| currency.clone());
                    }
                }
                total
            })
            .collect()
    }

    /// One line per card, every field followed by `separator`.
    pub fn to_delimited(&self, separator: &str) -> String {
        let mut out = String::new();
        for field in self.header() {
            out.push_str(&quote_field(&field, separator));
            out.push_str(separator);
        }
        out.push('\n');
        for row in &self.rows {
            for field in row_fields(row) {
                out.push_str(&quote_field(&field, separator));
                out.push_str(separator);
            }
            out.push('\n');
        }
        out
    }

    /// ASCII table for terminals and `.txt` reports, closed by a total row.
    pub fn to_fixed_width(&self) -> String {
        let header = self.header();
        let body: Vec<Vec<String>> = self.rows.iter().map(row_fields).collect();
        let mut total_row = vec![TOTAL_LABEL.to_string(), String::new()];
        total_row.extend(self.totals().iter().map(SourceTotal::text));

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in body.iter().chain(std::iter::once(&total_row)) {
            for (width, field) in widths.iter_mut().zip(row) {
                *width = (*width).max(field.chars().count());
            }
        }

        let rule = widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join(COLUMN_SEPARATOR);

        let mut lines = vec![render_line(&header, &widths, false), rule.clone()];
        lines.extend(body.iter().map(|row| render_line(row, &widths, true)));
        lines.push(rule);
        lines.push(render_line(&total_row, &widths, true));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn header(&self) -> Vec<String> {
        let mut header = vec![NAME_HEADER.to_string(), QUANTITY_HEADER.to_string()];
        header.extend(self.sources.iter().map(|source| source.name().to_string()));
        header
    }
}

fn row_fields(row: &GridRow) -> Vec<String> {
    let mut fields = vec![row.card.name().to_string(), row.quantity.to_string()];
    fields.extend(row.cells.iter().map(GridCell::text));
    fields
}

/// Names are left aligned; with `align_numbers` every later column is right
/// aligned.
fn render_line(fields: &[String], widths: &[usize], align_numbers: bool) -> String {
    fields
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(column, (field, &width))| {
            if align_numbers && column > 0 {
                format!("{field:>width$}")
            } else {
                format!("{field:<width$}")
            }
        })
        .collect::<Vec<_>>()
        .join(COLUMN_SEPARATOR)
}

fn quote_field(field: &str, separator: &str) -> String {
    let needs_quotes = (!separator.is_empty() && field.contains(separator))
        || field.contains('"')
        || field.contains('\n');
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
