//! Table formatting utilities for catalog list commands
//!
//! One formatter renders rows as an aligned terminal table, CSV, Markdown,
//! or bare ids, so each list command only describes its columns and rows.

use console::{pad_str, style, Alignment};

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Show summary line after table (e.g., "5 material(s) found")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { show_summary: true }
    }
}

impl TableConfig {
    /// Create config optimized for piping (no summary)
    pub fn for_pipe() -> Self {
        Self {
            show_summary: false,
        }
    }
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Catalog id (cyan)
    Id(String),
    /// Plain text, truncated to the column width
    Text(String),
    /// Category or kind label (dim)
    Type(String),
    /// Float value with precision, right-aligned
    Float(f64, usize),
}

impl CellValue {
    /// Get raw string value (no styling, no truncation)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) | CellValue::Type(s) => s.clone(),
            CellValue::Float(f, precision) => format!("{:.prec$}", f, prec = precision),
        }
    }

    /// Character width of the raw value
    pub fn display_width(&self) -> usize {
        console::measure_text_width(&self.raw())
    }

    /// Padded and styled for the aligned table
    pub fn format_table(&self, width: usize) -> String {
        match self {
            CellValue::Id(s) => style(pad_str(s, width, Alignment::Left, None).into_owned())
                .cyan()
                .to_string(),
            CellValue::Text(s) => {
                pad_str(&truncate_str(s, width), width, Alignment::Left, None).into_owned()
            }
            CellValue::Type(s) => style(pad_str(s, width, Alignment::Left, None).into_owned())
                .dim()
                .to_string(),
            CellValue::Float(..) => pad_str(&self.raw(), width, Alignment::Right, None).into_owned(),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        escape_csv(&self.raw())
    }

    /// Format for Markdown output (escaped pipes)
    pub fn format_md(&self) -> String {
        self.raw().replace('|', "\\|")
    }
}

/// Column definition with header label and maximum width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
#[derive(Debug, Clone)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that renders rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            config: TableConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Print rows in the specified format
    pub fn output(&self, rows: &[TableRow], format: OutputFormat) {
        print!("{}", self.render(rows, format));
    }

    /// Render rows in the specified format
    pub fn render(&self, rows: &[TableRow], format: OutputFormat) -> String {
        match format {
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Md => self.render_md(rows),
            OutputFormat::Id => rows.iter().map(|r| format!("{}\n", r.id)).collect(),
            OutputFormat::Tsv => self.render_tsv(rows),
            _ => self.render_table(rows),
        }
    }

    /// Column widths from content, capped at each column's maximum
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                col.header.len().max(content).min(col.width)
            })
            .collect()
    }

    fn render_table(&self, rows: &[TableRow]) -> String {
        let widths = self.calculate_widths(rows);
        let mut out = String::new();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, &w)| style(pad_str(col.header, w, Alignment::Left, None).into_owned()).bold().to_string())
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, &w)| match row.get(col.key) {
                    Some(value) => value.format_table(w),
                    None => pad_str("-", w, Alignment::Left, None).into_owned(),
                })
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }

        if self.config.show_summary {
            out.push('\n');
            out.push_str(&format!(
                "{} {}(s) found.\n",
                style(rows.len()).cyan(),
                self.entity_name
            ));
        }

        out
    }

    fn render_tsv(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let header: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        out.push_str(&header.join("\t"));
        out.push('\n');
        for row in rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map(|v| v.raw()).unwrap_or_default())
                .collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }

    fn render_csv(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let header: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        out.push_str(&header.join(","));
        out.push('\n');
        for row in rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map(|v| v.format_csv()).unwrap_or_default())
                .collect();
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }

    fn render_md(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let header: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        out.push_str(&format!("| {} |\n", header.join(" | ")));
        let sep: Vec<&str> = self.columns.iter().map(|_| "---").collect();
        out.push_str(&format!("|{}|\n", sep.join("|")));
        for row in rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map(|v| v.format_md()).unwrap_or_else(|| "-".to_string()))
                .collect();
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("id", "ID", 20),
        ColumnDef::new("name", "NAME", 12),
        ColumnDef::new("price", "PRICE", 10),
    ];

    fn rows() -> Vec<TableRow> {
        vec![
            TableRow::new("laminate_white")
                .cell("id", CellValue::Id("laminate_white".to_string()))
                .cell("name", CellValue::Text("ЛДСП белая".to_string()))
                .cell("price", CellValue::Float(800.0, 2)),
            TableRow::new("glass")
                .cell("id", CellValue::Id("glass".to_string()))
                .cell("name", CellValue::Text("Glass, tempered".to_string()))
                .cell("price", CellValue::Float(3000.0, 2)),
        ]
    }

    #[test]
    fn test_render_csv_escapes() {
        let out = TableFormatter::new(COLUMNS, "material").render(&rows(), OutputFormat::Csv);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id,name,price");
        assert_eq!(lines[1], "laminate_white,ЛДСП белая,800.00");
        assert_eq!(lines[2], "glass,\"Glass, tempered\",3000.00");
    }

    #[test]
    fn test_render_ids() {
        let out = TableFormatter::new(COLUMNS, "material").render(&rows(), OutputFormat::Id);
        assert_eq!(out, "laminate_white\nglass\n");
    }

    #[test]
    fn test_render_md() {
        let out = TableFormatter::new(COLUMNS, "material").render(&rows(), OutputFormat::Md);
        assert!(out.starts_with("| ID | NAME | PRICE |\n|---|---|---|\n"));
        assert!(out.contains("| glass | Glass, tempered | 3000.00 |"));
    }

    #[test]
    fn test_render_table_summary_toggle() {
        let formatter = TableFormatter::new(COLUMNS, "material");
        assert!(formatter.render(&rows(), OutputFormat::Auto).contains("material(s) found"));

        let piped = formatter.with_config(TableConfig::for_pipe());
        assert!(!piped.render(&rows(), OutputFormat::Auto).contains("found"));
    }

    #[test]
    fn test_widths_capped_by_column() {
        let formatter = TableFormatter::new(COLUMNS, "material");
        let widths = formatter.calculate_widths(&rows());
        assert_eq!(widths, vec![14, 12, 7]);
    }
}
