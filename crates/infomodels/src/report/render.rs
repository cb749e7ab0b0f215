//! Console rendering of finalized reports.

use std::fmt;
use std::str::FromStr;

use super::{FileReport, GroupSummary};
use crate::error::Result;

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Plain-text grid tables.
    #[default]
    Table,
    /// One pretty-printed JSON document per file.
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Table => write!(f, "table"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

pub const ROW_HEADERS: [&str; 5] = ["code", "error", "occurrences", "lines", "example"];
pub const FIELD_HEADERS: [&str; 6] = ["field", "code", "error", "occurrences", "lines", "samples"];

/// A plain-text table whose cells may span several lines.
#[derive(Debug, Clone)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let widest = cell.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(widest);
                }
            }
        }
        widths
    }

    /// Render with `+---+` borders.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let border = {
            let mut s = String::from("+");
            for w in &widths {
                s.push_str(&"-".repeat(w + 2));
                s.push('+');
            }
            s
        };

        let mut out = String::new();
        out.push_str(&border);
        out.push('\n');
        let upper: Vec<String> = self.headers.iter().map(|h| h.to_uppercase()).collect();
        push_row(&mut out, &upper, &widths);
        out.push_str(&border);
        out.push('\n');
        for row in &self.rows {
            push_row(&mut out, row, &widths);
        }
        out.push_str(&border);
        out.push('\n');
        out
    }
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let cell_lines: Vec<Vec<&str>> = widths
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let cell = cells.get(i).map(|c| c.as_str()).unwrap_or("");
            let lines: Vec<&str> = cell.lines().collect();
            if lines.is_empty() { vec![""] } else { lines }
        })
        .collect();
    let height = cell_lines.iter().map(|l| l.len()).max().unwrap_or(1);

    for n in 0..height {
        out.push('|');
        for (i, w) in widths.iter().enumerate() {
            let text = cell_lines[i].get(n).copied().unwrap_or("");
            let pad = w - text.chars().count();
            out.push(' ');
            out.push_str(text);
            out.push_str(&" ".repeat(pad + 1));
            out.push('|');
        }
        out.push('\n');
    }
}

/// Turns finalized reports into console output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer {
    format: ReportFormat,
}

impl ReportRenderer {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Row-level table: code, error, occurrences, lines, example.
    pub fn row_table(groups: &[GroupSummary]) -> TextTable {
        let mut table = TextTable::new(&ROW_HEADERS);
        for g in groups {
            table.push(vec![
                g.code.to_string(),
                g.description.clone(),
                g.occurrences.to_string(),
                g.lines_display(),
                g.examples.first().cloned().unwrap_or_default(),
            ]);
        }
        table
    }

    /// Field-level table: field, code, error, occurrences, lines, samples.
    pub fn field_table(groups: &[GroupSummary]) -> TextTable {
        let mut table = TextTable::new(&FIELD_HEADERS);
        for g in groups {
            table.push(vec![
                g.field.clone().unwrap_or_default(),
                g.code.to_string(),
                g.description.clone(),
                g.occurrences.to_string(),
                g.lines_display(),
                g.examples.join("\n"),
            ]);
        }
        table
    }

    /// Render a report, or `None` when the file had no errors.
    pub fn render(&self, report: &FileReport) -> Result<Option<String>> {
        if !report.has_errors() {
            return Ok(None);
        }

        let out = match self.format {
            ReportFormat::Json => serde_json::to_string_pretty(report)?,
            ReportFormat::Table => {
                let mut out = String::new();
                if !report.row.is_empty() {
                    out.push_str(&Self::row_table(&report.row).render());
                }
                if !report.field.is_empty() {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(&Self::field_table(&report.field).render());
                }
                out
            }
        };

        Ok(Some(out))
    }
}
