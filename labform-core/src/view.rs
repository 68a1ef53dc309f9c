//! Text rendering of section tables.

use crate::models::{Column, Row, TableState};

const MAX_CELL_WIDTH: usize = 28;

/// Display text of one cell. Fixed-label cells fall back to the column
/// header when empty instead of rendering blank.
pub fn cell_text(column: &Column, row: &Row) -> String {
    let value = row.get(&column.accessor_key);
    if value.is_empty() && column.is_fixed_label() {
        column.header.clone()
    } else {
        value.display()
    }
}

fn clip(text: &str, width: usize) -> String {
    let single_line = text.replace('\n', " / ");
    if single_line.chars().count() > width {
        let kept: String = single_line.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        single_line
    }
}

/// Fixed-width grid: header line, rule, then one line per row with the row
/// id first.
pub fn render_table(state: &TableState) -> String {
    let id_width = state
        .rows
        .iter()
        .map(|r| r.id.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max(2);

    let widths: Vec<usize> = state
        .columns
        .iter()
        .map(|column| {
            let cells = state
                .rows
                .iter()
                .map(|row| clip(&cell_text(column, row), MAX_CELL_WIDTH).chars().count());
            cells
                .chain(std::iter::once(
                    clip(&column.header, MAX_CELL_WIDTH).chars().count(),
                ))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let mut header = format!("{:<id_width$}", "ID");
    for (column, width) in state.columns.iter().zip(&widths) {
        header.push_str(&format!("  {:<width$}", clip(&column.header, MAX_CELL_WIDTH)));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    let total = id_width + widths.iter().map(|w| w + 2).sum::<usize>();
    out.push_str(&"-".repeat(total));
    out.push('\n');

    for row in &state.rows {
        let mut line = format!("{:<id_width$}", row.id.as_str());
        for (column, width) in state.columns.iter().zip(&widths) {
            line.push_str(&format!(
                "  {:<width$}",
                clip(&cell_text(column, row), MAX_CELL_WIDTH)
            ));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
