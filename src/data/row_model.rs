use anyhow::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::debug;

use crate::data::cell::{compare_cells, CellValue};

/// Sort direction hint carried by a column definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Column definition: accessor id, header text, and presentation flags
#[derive(Debug, Clone)]
pub struct Column {
    /// Accessor key into row records
    pub id: String,
    pub header: String,
    /// Seeds the initial sort spec when set
    pub sort_hint: Option<SortDirection>,
    pub editable: bool,
    pub width: Option<u16>,
    /// Whether the global text filter looks at this column
    pub searchable: bool,
}

impl Column {
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            sort_hint: None,
            editable: false,
            width: None,
            searchable: true,
        }
    }

    pub fn with_sort_hint(mut self, direction: SortDirection) -> Self {
        self.sort_hint = Some(direction);
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn not_searchable(mut self) -> Self {
        self.searchable = false;
        self
    }
}

/// One table row, cells ordered by the column definitions
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    pub fn cell(&self, column: usize) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }
}

/// Load rows from a JSON array of records, one cell per column accessor
pub fn rows_from_json(columns: &[Column], value: &JsonValue) -> Result<Vec<Row>> {
    let records = value
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("Expected a JSON array of records"))?;

    Ok(records
        .iter()
        .map(|record| {
            Row::new(
                columns
                    .iter()
                    .map(|col| {
                        record
                            .get(&col.id)
                            .map(CellValue::from_json)
                            .unwrap_or(CellValue::Null)
                    })
                    .collect(),
            )
        })
        .collect())
}

/// One entry of the ordered sort spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: usize,
    pub descending: bool,
}

/// Display numbers for the "Showing X to Y of Z entries" line (1-based,
/// start is 0 when the filtered set is empty)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

/// Derived view over an immutable row collection.
///
/// The pipeline runs in fixed order on every recompute:
/// core rows -> global text filter -> multi-column sort -> page slice.
/// Source rows are shared behind an `Arc` and never mutated; edits replace
/// the whole collection.
pub struct RowModel {
    columns: Vec<Column>,
    rows: Arc<Vec<Row>>,

    filter_text: String,
    sort_keys: Vec<SortKey>,
    page_index: usize,
    page_size: usize,

    /// Row indices visible after filter + sort
    visible: Vec<usize>,

    matcher: SkimMatcherV2,
}

impl RowModel {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>, page_size: usize) -> Self {
        // Column sort hints seed the initial sort spec in column order
        let sort_keys = columns
            .iter()
            .enumerate()
            .filter_map(|(i, col)| {
                col.sort_hint.map(|hint| SortKey {
                    column: i,
                    descending: hint == SortDirection::Descending,
                })
            })
            .collect();

        let mut model = Self {
            columns,
            rows: Arc::new(rows),
            filter_text: String::new(),
            sort_keys,
            page_index: 0,
            page_size: page_size.max(1),
            visible: Vec::new(),
            matcher: SkimMatcherV2::default(),
        };
        model.recompute();
        model
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The current row collection. Callers holding a previous `Arc` keep an
    /// unchanged snapshot across edits.
    pub fn rows(&self) -> Arc<Vec<Row>> {
        Arc::clone(&self.rows)
    }

    pub fn row(&self, source_index: usize) -> Option<&Row> {
        self.rows.get(source_index)
    }

    pub fn cell(&self, source_index: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(source_index).and_then(|r| r.cell(column))
    }

    /// Replace the source rows, keeping filter/sort/page state
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = Arc::new(rows);
        self.recompute();
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Apply a new global filter text (normally a debounced value)
    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.filter_text != text {
            debug!(target: "table", "Global filter changed to '{}'", text);
            self.filter_text = text;
            self.recompute();
        }
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    /// The sort state shown in a column's header marker
    pub fn sort_state(&self, column: usize) -> Option<SortDirection> {
        self.sort_keys.iter().find(|k| k.column == column).map(|k| {
            if k.descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            }
        })
    }

    /// Header toggle: unsorted -> ascending -> descending -> unsorted.
    /// A newly sorted column appends to the spec, so ties break in the
    /// order columns were toggled.
    pub fn toggle_sort(&mut self, column: usize) -> Result<()> {
        if column >= self.columns.len() {
            return Err(anyhow::anyhow!("Column index {} out of bounds", column));
        }

        match self.sort_keys.iter().position(|k| k.column == column) {
            None => self.sort_keys.push(SortKey {
                column,
                descending: false,
            }),
            Some(pos) if !self.sort_keys[pos].descending => {
                self.sort_keys[pos].descending = true;
            }
            Some(pos) => {
                self.sort_keys.remove(pos);
            }
        }

        self.recompute();
        Ok(())
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.visible.len().div_ceil(self.page_size)
    }

    pub fn filtered_count(&self) -> usize {
        self.visible.len()
    }

    pub fn set_page_index(&mut self, index: usize) {
        self.page_index = index;
        self.clamp_page();
    }

    pub fn next_page(&mut self) {
        self.page_index += 1;
        self.clamp_page();
    }

    pub fn prev_page(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
        self.clamp_page();
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.clamp_page();
    }

    /// Resolve a raw "go to page" input: strip non-digits, default to page 1
    /// when nothing is left, clamp into `[1, page_count]`. Returns the
    /// 1-based page actually selected.
    pub fn goto_page(&mut self, raw: &str) -> usize {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        let requested = if digits.is_empty() {
            1
        } else {
            // Overflow means an absurdly large page; the clamp handles it
            digits.parse::<usize>().unwrap_or(usize::MAX)
        };

        let page_count = self.page_count().max(1);
        let resolved = requested.clamp(1, page_count);
        self.page_index = resolved - 1;
        self.clamp_page();
        resolved
    }

    /// Source indices of the rows on the current page
    pub fn page_rows(&self) -> &[usize] {
        let start = self.page_index * self.page_size;
        let end = (start + self.page_size).min(self.visible.len());
        if start >= end {
            return &[];
        }
        &self.visible[start..end]
    }

    pub fn page_info(&self) -> PageInfo {
        let total = self.visible.len();
        if total == 0 {
            return PageInfo {
                start: 0,
                end: 0,
                total: 0,
            };
        }
        let start = self.page_index * self.page_size + 1;
        let end = ((self.page_index + 1) * self.page_size).min(total);
        PageInfo { start, end, total }
    }

    /// 1-based page numbers for the windowed pagination buttons: all pages
    /// when five or fewer, otherwise a three-wide window anchored at the
    /// start, the end, or the current page.
    pub fn page_window(&self) -> Vec<usize> {
        let total = self.page_count();
        if total == 0 {
            return Vec::new();
        }
        let current = self.page_index + 1;

        let (start, end) = if total <= 5 {
            (1, total)
        } else if current <= 2 {
            (1, 3)
        } else if current >= total {
            (total - 2, total)
        } else {
            (current - 2, current)
        };

        (start..=end).collect()
    }

    /// Commit an edited cell: produces a new row collection with exactly
    /// that cell replaced. The previous collection is untouched.
    pub fn edit_cell(&mut self, source_index: usize, column: usize, value: CellValue) -> Result<()> {
        if column >= self.columns.len() {
            return Err(anyhow::anyhow!("Column index {} out of bounds", column));
        }
        if source_index >= self.rows.len() {
            return Err(anyhow::anyhow!("Row index {} out of bounds", source_index));
        }

        let mut rows: Vec<Row> = self.rows.as_ref().clone();
        rows[source_index].cells[column] = value;
        self.rows = Arc::new(rows);
        self.recompute();
        Ok(())
    }

    /// Derive the visible set: filter, then a stable multi-key sort, then
    /// clamp the page so a non-empty page is always shown
    fn recompute(&mut self) {
        let pattern = self.filter_text.trim();

        self.visible = (0..self.rows.len())
            .filter(|&row_idx| {
                if pattern.is_empty() {
                    return true;
                }
                self.columns.iter().enumerate().any(|(col_idx, col)| {
                    col.searchable
                        && self
                            .cell(row_idx, col_idx)
                            .map(|c| self.matcher.fuzzy_match(&c.render(), pattern).is_some())
                            .unwrap_or(false)
                })
            })
            .collect();

        if !self.sort_keys.is_empty() {
            let rows = &self.rows;
            let keys = &self.sort_keys;
            // Vec::sort_by is stable, so equal rows keep their input order
            self.visible.sort_by(|&a, &b| {
                for key in keys {
                    let va = rows.get(a).and_then(|r| r.cell(key.column));
                    let vb = rows.get(b).and_then(|r| r.cell(key.column));
                    let cmp = match (va, vb) {
                        (Some(va), Some(vb)) => compare_cells(va, vb),
                        (None, None) => std::cmp::Ordering::Equal,
                        (None, Some(_)) => std::cmp::Ordering::Less,
                        (Some(_), None) => std::cmp::Ordering::Greater,
                    };
                    let cmp = if key.descending { cmp.reverse() } else { cmp };
                    if cmp != std::cmp::Ordering::Equal {
                        return cmp;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }

        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        let page_count = self.page_count();
        if page_count == 0 {
            self.page_index = 0;
        } else if self.page_index >= page_count {
            self.page_index = page_count - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_rows(values: &[i64]) -> Vec<Row> {
        values
            .iter()
            .map(|&n| Row::new(vec![CellValue::Integer(n)]))
            .collect()
    }

    fn model_with(values: &[i64]) -> RowModel {
        RowModel::new(vec![Column::new("n", "N")], number_rows(values), 10)
    }

    fn column_values(model: &RowModel) -> Vec<i64> {
        model
            .page_rows()
            .iter()
            .filter_map(|&i| match model.cell(i, 0) {
                Some(CellValue::Integer(n)) => Some(*n),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn sort_cycle_asc_desc_unsorted() {
        let mut model = model_with(&[3, 1, 2]);
        assert_eq!(column_values(&model), vec![3, 1, 2]);

        model.toggle_sort(0).unwrap();
        assert_eq!(model.sort_state(0), Some(SortDirection::Ascending));
        assert_eq!(column_values(&model), vec![1, 2, 3]);

        model.toggle_sort(0).unwrap();
        assert_eq!(model.sort_state(0), Some(SortDirection::Descending));
        assert_eq!(column_values(&model), vec![3, 2, 1]);

        model.toggle_sort(0).unwrap();
        assert_eq!(model.sort_state(0), None);
        assert_eq!(column_values(&model), vec![3, 1, 2]);
    }

    #[test]
    fn sort_toggle_on_bad_column_errors() {
        let mut model = model_with(&[1]);
        assert!(model.toggle_sort(5).is_err());
    }

    #[test]
    fn page_window_shapes() {
        let mut model = model_with(&(0..120).collect::<Vec<i64>>());
        model.set_page_size(10); // 12 pages

        model.set_page_index(0);
        assert_eq!(model.page_window(), vec![1, 2, 3]);

        model.set_page_index(5); // current page 6
        assert_eq!(model.page_window(), vec![4, 5, 6]);

        model.set_page_index(11); // current page 12
        assert_eq!(model.page_window(), vec![10, 11, 12]);

        model.set_page_size(30); // 4 pages
        assert_eq!(model.page_window(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn page_info_line() {
        let mut model = model_with(&(0..12).collect::<Vec<i64>>());
        model.set_page_index(1);
        let info = model.page_info();
        assert_eq!((info.start, info.end, info.total), (11, 12, 12));
    }

    #[test]
    fn empty_model_page_info() {
        let model = model_with(&[]);
        let info = model.page_info();
        assert_eq!((info.start, info.end, info.total), (0, 0, 0));
        assert_eq!(model.page_count(), 0);
        assert!(model.page_rows().is_empty());
    }
}
