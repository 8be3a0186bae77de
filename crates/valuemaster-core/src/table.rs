//! HTML table extraction shared by the document-backed acquirers.
//!
//! Documents are parsed with `scraper` into plain [`HtmlTable`] values so that
//! no `!Send` parser state crosses an `.await`.

use scraper::{ElementRef, Html};

use crate::domain::LookupTable;

/// One `<table>` reduced to whitespace-collapsed string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTable {
    pub header_rows: Vec<Vec<String>>,
    pub body_rows: Vec<Vec<String>>,
}

impl HtmlTable {
    /// Index of the first header cell equal to `name`, scanning header rows in order.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header_rows
            .iter()
            .find_map(|row| row.iter().position(|cell| cell == name))
    }

    pub fn has_headers(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.column_index(name).is_some())
    }

    /// Positional lookup: first body row whose `key_column` equals `key`.
    ///
    /// Returns `None` when no row matches or the matched cell is not numeric.
    pub fn lookup_by_position(
        &self,
        key: &str,
        key_column: usize,
        value_column: usize,
    ) -> Option<f64> {
        self.body_rows
            .iter()
            .find(|row| row.get(key_column).map(String::as_str) == Some(key))
            .and_then(|row| row.get(value_column))
            .and_then(|cell| parse_number(cell))
    }

    /// Header-name lookup: resolve both columns from the header rows, then scan by position.
    pub fn lookup_by_header(
        &self,
        key: &str,
        key_header: &str,
        value_header: &str,
    ) -> Option<f64> {
        let key_column = self.column_index(key_header)?;
        let value_column = self.column_index(value_header)?;
        self.lookup_by_position(key, key_column, value_column)
    }

    /// Snapshot of every body row as a first-match lookup table.
    pub fn to_lookup_table(&self, key_column: usize, value_column: usize) -> LookupTable {
        self.body_rows
            .iter()
            .filter_map(|row| {
                let key = row.get(key_column)?;
                let value = row.get(value_column).and_then(|cell| parse_number(cell));
                Some((key.clone(), value))
            })
            .collect()
    }
}

/// How a document-backed acquirer picks its data table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSelector {
    /// First table whose header rows contain every listed name.
    ByHeaders(Vec<String>),
    /// Table at this zero-based document position.
    ByPosition(usize),
}

impl TableSelector {
    pub fn by_headers(names: &[&str]) -> Self {
        Self::ByHeaders(names.iter().map(|name| (*name).to_owned()).collect())
    }

    pub fn select<'t>(&self, tables: &'t [HtmlTable]) -> Option<&'t HtmlTable> {
        match self {
            Self::ByHeaders(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                tables.iter().find(|table| table.has_headers(&names))
            }
            Self::ByPosition(index) => tables.get(*index),
        }
    }
}

/// Parse every `<table>` in document order.
///
/// Header rows are the `<thead>` rows when present, otherwise the first row.
/// Rows of nested tables belong to the nested table only.
pub fn parse_tables(document: &str) -> Vec<HtmlTable> {
    let html = Html::parse_document(document);

    html.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "table")
        .map(extract_table)
        .collect()
}

fn extract_table(table: ElementRef<'_>) -> HtmlTable {
    let mut thead_rows = Vec::new();
    let mut other_rows = Vec::new();

    for row in table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "tr")
        .filter(|row| owning_table(*row).map(|owner| owner.id()) == Some(table.id()))
    {
        let cells = row_cells(row);
        if in_thead(row) {
            thead_rows.push(cells);
        } else {
            other_rows.push(cells);
        }
    }

    if thead_rows.is_empty() && !other_rows.is_empty() {
        let first = other_rows.remove(0);
        thead_rows.push(first);
    }

    HtmlTable {
        header_rows: thead_rows,
        body_rows: other_rows,
    }
}

fn owning_table(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "table")
}

fn in_thead(row: ElementRef<'_>) -> bool {
    row.parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|parent| parent.value().name() == "thead")
}

fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .map(|cell| collapse_whitespace(&cell.text().collect::<Vec<_>>().join(" ")))
        .collect()
}

/// Collapse runs of whitespace (including non-breaking spaces) to single spaces and trim.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lenient numeric cell parsing: surrounding whitespace, a trailing `%` and thousands
/// separators are tolerated. The percent sign does not rescale the value.
///
/// Commas are only accepted as three-digit groups in the integer part, so a
/// comma-decimal cell such as `3,57` is rejected rather than read as `357`.
pub fn parse_number(cell: &str) -> Option<f64> {
    let collapsed = collapse_whitespace(cell);
    let trimmed = collapsed.strip_suffix('%').unwrap_or(&collapsed).trim_end();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned = strip_thousands_separators(trimmed)?;
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn strip_thousands_separators(number: &str) -> Option<String> {
    if !number.contains(',') {
        return Some(number.to_owned());
    }

    let unsigned = number.strip_prefix(['-', '+']).unwrap_or(number);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    if fraction.is_some_and(|fraction| fraction.contains(',')) {
        return None;
    }

    let mut groups = integer.split(',');
    let leading = groups.next()?;
    let is_digits = |group: &str| group.bytes().all(|byte| byte.is_ascii_digit());
    let leading_ok = (1..=3).contains(&leading.len()) && is_digits(leading);
    if !leading_ok || !groups.all(|group| group.len() == 3 && is_digits(group)) {
        return None;
    }

    Some(number.replace(',', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"
        <html><body>
          <table><tr><td>Navigation</td></tr></table>
          <table>
            <thead><tr><th>Industry Name</th><th>Number of firms</th><th>Unlevered&nbsp;beta</th></tr></thead>
            <tbody>
              <tr><td>Advertising</td><td>54</td><td> 0.92 </td></tr>
              <tr><td>Banks (Regional)</td><td>1,210</td><td>0.43</td></tr>
              <tr><td>Advertising</td><td>1</td><td>9.99</td></tr>
            </tbody>
          </table>
        </body></html>
    "#;

    #[test]
    fn parses_tables_in_document_order() {
        let tables = parse_tables(DOCUMENT);

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].header_rows, vec![vec![String::from("Navigation")]]);
        assert!(tables[0].body_rows.is_empty());
        assert_eq!(tables[1].body_rows.len(), 3);
    }

    #[test]
    fn nbsp_is_treated_as_whitespace_in_headers() {
        let tables = parse_tables(DOCUMENT);
        assert_eq!(tables[1].column_index("Unlevered beta"), Some(2));
    }

    #[test]
    fn header_selector_skips_unrelated_tables() {
        let tables = parse_tables(DOCUMENT);
        let selector = TableSelector::by_headers(&["Industry Name", "Unlevered beta"]);

        let table = selector.select(&tables).expect("betas table");
        assert_eq!(
            table.lookup_by_header("Advertising", "Industry Name", "Unlevered beta"),
            Some(0.92)
        );
    }

    #[test]
    fn position_selector_out_of_range_is_none() {
        let tables = parse_tables(DOCUMENT);
        assert!(TableSelector::ByPosition(5).select(&tables).is_none());
    }

    #[test]
    fn first_matching_row_wins() {
        let tables = parse_tables(DOCUMENT);
        let lookup = tables[1].to_lookup_table(0, 2);

        assert_eq!(lookup.get("Advertising"), Some(0.92));
        assert_eq!(lookup.len(), 3);
    }

    #[test]
    fn first_row_is_header_without_thead() {
        let tables = parse_tables(
            "<table><tr><td>Country</td><td>CRP</td></tr><tr><td>Brazil</td><td>3.57%</td></tr></table>",
        );

        assert_eq!(tables[0].header_rows.len(), 1);
        assert_eq!(tables[0].lookup_by_position("Brazil", 0, 1), Some(3.57));
    }

    #[test]
    fn nested_table_rows_stay_with_the_nested_table() {
        let tables = parse_tables(
            "<table><tr><td>Outer</td></tr><tr><td><table><tr><td>Inner</td></tr></table></td></tr></table>",
        );

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].body_rows.len(), 1);
        assert_eq!(tables[1].header_rows, vec![vec![String::from("Inner")]]);
    }

    #[test]
    fn lenient_number_parsing() {
        assert_eq!(parse_number(" 5.25% "), Some(5.25));
        assert_eq!(parse_number("1,234.5"), Some(1234.5));
        assert_eq!(parse_number("-12,345,678"), Some(-12345678.0));
        assert_eq!(parse_number("NA"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn comma_decimal_cells_do_not_parse() {
        assert_eq!(parse_number("3,57"), None);
        assert_eq!(parse_number("3,57%"), None);
        assert_eq!(parse_number("1,23,456"), None);
        assert_eq!(parse_number("1234,567"), None);
        assert_eq!(parse_number("1,234.5,6"), None);
    }

    #[test]
    fn comma_decimal_premium_resolves_as_not_found() {
        let tables = parse_tables(
            "<table><tr><td>Country</td><td>CRP</td></tr><tr><td>Brazil</td><td>3,57%</td></tr></table>",
        );

        let lookup = tables[0].to_lookup_table(0, 1);
        assert!(lookup.contains_key("Brazil"));
        assert_eq!(lookup.get("Brazil"), None);
    }

    #[test]
    fn line_breaks_inside_header_cells_separate_words() {
        let tables = parse_tables(
            "<table>\
             <tr><th>Industry<br>Name</th><th><b>Unlevered</b>\n<br>beta</th></tr>\
             <tr><td>Advertising</td><td>0.92</td></tr>\
             </table>",
        );

        assert_eq!(
            tables[0].header_rows,
            vec![vec![
                String::from("Industry Name"),
                String::from("Unlevered beta"),
            ]]
        );
        let table = TableSelector::by_headers(&["Industry Name", "Unlevered beta"])
            .select(&tables)
            .expect("betas table");
        assert_eq!(
            table.lookup_by_header("Advertising", "Industry Name", "Unlevered beta"),
            Some(0.92)
        );
    }

    #[test]
    fn missing_cells_resolve_as_not_found() {
        let tables = parse_tables(DOCUMENT);
        assert_eq!(tables[1].lookup_by_position("Advertising", 0, 10), None);
        assert_eq!(tables[1].lookup_by_position("Unknown", 0, 2), None);
    }
}
