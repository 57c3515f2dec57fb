// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text rendering of the inventory table for model prompts.

use stockbot_core::types::InventoryTable;

/// Column names formatted as a bracketed list, e.g. `['ID', 'Producto']`.
pub fn column_list(table: &InventoryTable) -> String {
    let quoted: Vec<String> = table.columns.iter().map(|c| format!("'{c}'")).collect();
    format!("[{}]", quoted.join(", "))
}

/// Renders every row and column as a right-aligned text grid with a leading
/// row index.
pub fn render_table(table: &InventoryTable) -> String {
    let index_width = table.len().saturating_sub(1).to_string().len();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            table
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (name, width) in table.columns.iter().zip(&widths) {
        out.push_str(&format!("  {name:>width$}"));
    }

    for (idx, row) in table.rows.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("{idx:>index_width$}"));
        for (i, width) in widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            out.push_str(&format!("  {cell:>width$}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> InventoryTable {
        InventoryTable {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn renders_header_and_indexed_rows() {
        let t = table(
            &["ID", "Producto", "Stock"],
            &[&["1", "Mouse", "25"], &["2", "Teclado Mecánico", "15"]],
        );
        let rendered = render_table(&t);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "   ID          Producto  Stock");
        assert_eq!(lines[1], "0   1             Mouse     25");
        assert_eq!(lines[2], "1   2  Teclado Mecánico     15");
    }

    #[test]
    fn every_cell_appears() {
        let t = table(&["ID", "Color"], &[&["7", "azul"]]);
        let rendered = render_table(&t);
        assert!(rendered.contains("Color"));
        assert!(rendered.contains("azul"));
    }

    #[test]
    fn column_list_formatting() {
        let t = table(&["ID", "Producto"], &[]);
        assert_eq!(column_list(&t), "['ID', 'Producto']");
    }
}
