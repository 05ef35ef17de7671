//! HTML table extraction adapter.
//!
//! Both scraped sources (dividenddata.co.uk and the Wikipedia constituent
//! pages) expose their data as one `<table>` per page. This module isolates
//! the coupling to that upstream structure: a change to the page layout
//! fails loudly here, naming the URL and selector, instead of corrupting
//! downstream columns.

use crate::data::provider::DataError;
use scraper::{Html, Selector};

/// A raw HTML table: header row plus string cells, nothing coerced yet.
#[derive(Debug, Clone)]
pub struct HtmlTable {
    /// Page the table was extracted from, kept for error messages.
    pub url: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl HtmlTable {
    /// Append another table's rows below this one's.
    ///
    /// The second table must have the same column count; headers of the
    /// first table win.
    pub fn append(&mut self, other: HtmlTable) -> Result<(), DataError> {
        if other.headers.len() != self.headers.len() {
            return Err(DataError::ColumnCountMismatch {
                url: other.url,
                row: 0,
                expected: self.headers.len(),
                got: other.headers.len(),
            });
        }
        self.rows.extend(other.rows);
        Ok(())
    }
}

fn compile(selector: &str) -> Result<Selector, DataError> {
    Selector::parse(selector)
        .map_err(|e| DataError::Other(format!("invalid selector `{selector}`: {e}")))
}

fn cell_text(el: scraper::ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Extract the first table matching `selector` from an HTML document.
///
/// Header cells (`<th>`) become column names; every `<tr>` carrying `<td>`
/// cells becomes a row. A row whose cell count differs from the header
/// count is a fatal [`DataError::ColumnCountMismatch`] — the upstream page
/// has changed shape and silently shifted columns are worse than an abort.
pub fn extract_table(html: &str, url: &str, selector: &str) -> Result<HtmlTable, DataError> {
    let document = Html::parse_document(html);
    let table_sel = compile(selector)?;
    let th_sel = compile("th")?;
    let tr_sel = compile("tr")?;
    let td_sel = compile("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| DataError::TableNotFound {
            url: url.to_string(),
            selector: selector.to_string(),
        })?;

    let headers: Vec<String> = table.select(&th_sel).map(cell_text).collect();
    if headers.is_empty() {
        return Err(DataError::ResponseFormatChanged(format!(
            "{url}: table matched `{selector}` but has no header row"
        )));
    }

    let mut rows = Vec::new();
    for (i, tr) in table.select(&tr_sel).enumerate() {
        let cells: Vec<String> = tr.select(&td_sel).map(cell_text).collect();
        // Header rows carry <th> only
        if cells.is_empty() {
            continue;
        }
        if cells.len() != headers.len() {
            return Err(DataError::ColumnCountMismatch {
                url: url.to_string(),
                row: i,
                expected: headers.len(),
                got: cells.len(),
            });
        }
        rows.push(cells);
    }

    Ok(HtmlTable {
        url: url.to_string(),
        headers,
        rows,
    })
}
