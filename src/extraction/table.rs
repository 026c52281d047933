//! Table row scanning for HTML `<table>` markup and Markdown pipe tables.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, WordbookError};

/// Cell texts of one table row, tags stripped and whitespace collapsed.
pub type Cells = Vec<String>;

/// Selectors and patterns for scanning tables out of a document.
#[derive(Debug, Clone)]
pub struct TableScanner {
    table: Selector,
    row: Selector,
    cell: Selector,
    separator: Regex,
}

impl TableScanner {
    pub fn new() -> Result<Self> {
        let select = |selector: &str| {
            Selector::parse(selector)
                .map_err(|e| WordbookError::other(format!("invalid selector {selector}: {e:?}")))
        };

        Ok(TableScanner {
            table: select("table")?,
            row: select("tr")?,
            cell: select("td")?,
            separator: Regex::new(r"^\|?\s*:?-{3,}:?\s*(\|\s*:?-{3,}:?\s*)*\|?$")
                .map_err(|e| WordbookError::other(format!("invalid separator pattern: {e}")))?,
        })
    }

    /// All rows of every HTML table in `content`, in document order.
    pub fn html_rows(&self, content: &str) -> Vec<Cells> {
        let fragment = Html::parse_fragment(content);
        let mut rows = Vec::new();
        for table in fragment.select(&self.table) {
            for row in table.select(&self.row) {
                rows.push(row.select(&self.cell).map(element_text).collect());
            }
        }
        rows
    }

    /// All rows of Markdown pipe tables in `content`, separator rows excluded.
    pub fn pipe_rows(&self, content: &str) -> Vec<Cells> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with('|') && line.len() > 1)
            .filter(|line| !self.separator.is_match(line))
            .map(|line| {
                let inner = line.trim_start_matches('|');
                let inner = inner.strip_suffix('|').unwrap_or(inner);
                inner.split('|').map(inline_text).collect()
            })
            .collect()
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse(element.text())
}

/// Text of inline markup inside a pipe cell, entities decoded.
fn inline_text(raw: &str) -> String {
    collapse(Html::parse_fragment(raw).root_element().text())
}

fn collapse<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    let text: String = pieces.collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
