//! Table widget
//!
//! Renders a [`RowModel`] with a debounced global search, sortable column
//! headers, inline cell editing, and a pagination footer (page info,
//! go-to-page input, windowed page buttons, page-size chooser).

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell as TableCell, Paragraph, Row as TableRow, Table},
    Frame,
};
use tracing::debug;
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::config::config::{BehaviorConfig, DisplayConfig};
use crate::data::cell::CellValue;
use crate::data::row_model::{RowModel, SortDirection};
use crate::widgets::debounced_input::{DebouncedInput, DebouncedInputAction, DebouncedInputBuilder};

/// Result of handling a key in the table
#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    None,
    /// The page-size chooser picked a new size
    PageSizeChanged(usize),
    /// Go-to-page resolved to this 1-based page
    PageChanged(usize),
    /// An editable cell committed a new value
    CellEdited { row: usize, column: usize },
    /// Key is not for this widget
    PassThrough,
}

/// Which part of the table owns keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableFocus {
    Body,
    Search,
    Goto,
    Edit,
}

/// In-flight cell edit, committed on blur rather than per keystroke
struct CellEditor {
    source_row: usize,
    column: usize,
    input: Input,
}

pub struct TableWidget {
    model: RowModel,
    display: DisplayConfig,

    search: DebouncedInput,
    goto_buffer: Input,
    focus: TableFocus,

    /// Row cursor within the current page
    row_cursor: usize,
    /// Column cursor for sorting and editing
    col_cursor: usize,

    editor: Option<CellEditor>,

    page_size_options: Vec<usize>,
}

impl TableWidget {
    pub fn new(model: RowModel, display: DisplayConfig, behavior: &BehaviorConfig) -> Self {
        let search = DebouncedInputBuilder::new()
            .debounce_ms(behavior.debounce_ms)
            .title("Search")
            .placeholder("Search...")
            .build();

        Self {
            model,
            display,
            search,
            goto_buffer: Input::default(),
            focus: TableFocus::Body,
            row_cursor: 0,
            col_cursor: 0,
            editor: None,
            page_size_options: behavior.page_size_options.clone(),
        }
    }

    pub fn model(&self) -> &RowModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut RowModel {
        &mut self.model
    }

    /// Poll from the event loop tick: apply a settled search value
    pub fn check_debounce(&mut self) -> Option<String> {
        let settled = self.search.check_debounce()?;
        self.model.set_filter_text(settled.clone());
        self.clamp_cursor();
        Some(settled)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> TableAction {
        match self.focus {
            TableFocus::Search => self.handle_search_key(key),
            TableFocus::Goto => self.handle_goto_key(key),
            TableFocus::Edit => self.handle_edit_key(key),
            TableFocus::Body => self.handle_body_key(key),
        }
    }

    fn handle_body_key(&mut self, key: KeyEvent) -> TableAction {
        match key.code {
            KeyCode::Char('/') if self.display.show_search => {
                self.focus = TableFocus::Search;
                self.search.activate();
                TableAction::None
            }
            KeyCode::Char('g') if self.display.show_page_input => {
                self.focus = TableFocus::Goto;
                self.goto_buffer.reset();
                TableAction::None
            }
            KeyCode::Down => {
                let max = self.model.page_rows().len().saturating_sub(1);
                self.row_cursor = (self.row_cursor + 1).min(max);
                TableAction::None
            }
            KeyCode::Up => {
                self.row_cursor = self.row_cursor.saturating_sub(1);
                TableAction::None
            }
            KeyCode::Left => {
                self.col_cursor = self.col_cursor.saturating_sub(1);
                TableAction::None
            }
            KeyCode::Right => {
                let max = self.model.columns().len().saturating_sub(1);
                self.col_cursor = (self.col_cursor + 1).min(max);
                TableAction::None
            }
            KeyCode::Char('s') => {
                if self.model.toggle_sort(self.col_cursor).is_ok() {
                    self.clamp_cursor();
                }
                TableAction::None
            }
            KeyCode::Char(']') | KeyCode::PageDown => {
                self.model.next_page();
                self.clamp_cursor();
                TableAction::None
            }
            KeyCode::Char('[') | KeyCode::PageUp => {
                self.model.prev_page();
                self.clamp_cursor();
                TableAction::None
            }
            KeyCode::Char('z') if self.display.show_page_size_chooser => {
                let size = self.cycle_page_size();
                TableAction::PageSizeChanged(size)
            }
            KeyCode::Enter | KeyCode::Char('e') => self.begin_edit(),
            _ => TableAction::PassThrough,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> TableAction {
        match self.search.handle_key(key) {
            DebouncedInputAction::Cancel => {
                self.focus = TableFocus::Body;
                TableAction::None
            }
            DebouncedInputAction::Confirm(value) => {
                self.model.set_filter_text(value);
                self.clamp_cursor();
                self.focus = TableFocus::Body;
                TableAction::None
            }
            _ => TableAction::None,
        }
    }

    fn handle_goto_key(&mut self, key: KeyEvent) -> TableAction {
        match key.code {
            KeyCode::Esc => {
                self.focus = TableFocus::Body;
                TableAction::None
            }
            KeyCode::Enter => {
                let resolved = self.model.goto_page(self.goto_buffer.value());
                debug!(target: "table", "Go to page resolved to {}", resolved);
                self.goto_buffer.reset();
                self.focus = TableFocus::Body;
                self.clamp_cursor();
                TableAction::PageChanged(resolved)
            }
            _ => {
                self.goto_buffer
                    .handle_event(&crossterm::event::Event::Key(key));
                TableAction::None
            }
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> TableAction {
        match key.code {
            KeyCode::Esc => {
                // Discard without committing
                self.editor = None;
                self.focus = TableFocus::Body;
                TableAction::None
            }
            // Leaving the cell commits the edit
            KeyCode::Enter | KeyCode::Tab => self.commit_edit(),
            _ => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.input.handle_event(&crossterm::event::Event::Key(key));
                }
                TableAction::None
            }
        }
    }

    fn begin_edit(&mut self) -> TableAction {
        let column = self.col_cursor;
        if !self
            .model
            .columns()
            .get(column)
            .map(|c| c.editable)
            .unwrap_or(false)
        {
            return TableAction::None;
        }

        let Some(&source_row) = self.model.page_rows().get(self.row_cursor) else {
            return TableAction::None;
        };

        // Seed the editor with the cell's current text
        let seed = self
            .model
            .cell(source_row, column)
            .map(|c| c.render())
            .unwrap_or_default();

        self.editor = Some(CellEditor {
            source_row,
            column,
            input: Input::default().with_value(seed),
        });
        self.focus = TableFocus::Edit;
        TableAction::None
    }

    fn commit_edit(&mut self) -> TableAction {
        let Some(editor) = self.editor.take() else {
            self.focus = TableFocus::Body;
            return TableAction::None;
        };
        self.focus = TableFocus::Body;

        let value = CellValue::infer_from_string(editor.input.value());
        match self.model.edit_cell(editor.source_row, editor.column, value) {
            Ok(()) => {
                self.clamp_cursor();
                TableAction::CellEdited {
                    row: editor.source_row,
                    column: editor.column,
                }
            }
            Err(e) => {
                debug!(target: "table", "Cell edit rejected: {}", e);
                TableAction::None
            }
        }
    }

    fn cycle_page_size(&mut self) -> usize {
        let current = self.model.page_size();
        let pos = self.page_size_options.iter().position(|&s| s == current);
        let next = match pos {
            Some(p) => self.page_size_options[(p + 1) % self.page_size_options.len()],
            None => self.page_size_options.first().copied().unwrap_or(current),
        };
        self.model.set_page_size(next);
        self.clamp_cursor();
        next
    }

    fn clamp_cursor(&mut self) {
        let max = self.model.page_rows().len().saturating_sub(1);
        self.row_cursor = self.row_cursor.min(max);
    }

    fn sort_marker(&self, column: usize) -> &'static str {
        let glyphs = self.display.use_glyphs;
        match self.model.sort_state(column) {
            Some(SortDirection::Ascending) => {
                if glyphs {
                    "▲"
                } else {
                    "^"
                }
            }
            Some(SortDirection::Descending) => {
                if glyphs {
                    "▼"
                } else {
                    "v"
                }
            }
            None => {
                if glyphs {
                    "⇅"
                } else {
                    "-"
                }
            }
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let mut constraints = Vec::new();
        if self.display.show_search {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(3));
        constraints.push(Constraint::Length(2));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut idx = 0;
        if self.display.show_search {
            self.search.render(f, chunks[idx]);
            idx += 1;
        }

        self.render_body(f, chunks[idx]);
        self.render_footer(f, chunks[idx + 1]);
    }

    fn render_body(&self, f: &mut Frame, area: Rect) {
        let columns = self.model.columns();

        let header = TableRow::new(
            columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let marker = self.sort_marker(i);
                    let style = if i == self.col_cursor {
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                            .fg(Color::White)
                            .bg(Color::Blue)
                            .add_modifier(Modifier::BOLD)
                    };
                    TableCell::from(format!("{} {}", col.header.to_uppercase(), marker))
                        .style(style)
                })
                .collect::<Vec<_>>(),
        );

        let page_rows = self.model.page_rows();
        let rows: Vec<TableRow> = if page_rows.is_empty() {
            vec![TableRow::new(vec![TableCell::from("No Records Found!")
                .style(Style::default().fg(Color::DarkGray))])]
        } else {
            page_rows
                .iter()
                .enumerate()
                .map(|(visual_row, &source_row)| {
                    TableRow::new(
                        columns
                            .iter()
                            .enumerate()
                            .map(|(col_idx, _)| self.render_cell(visual_row, source_row, col_idx))
                            .collect::<Vec<_>>(),
                    )
                })
                .collect()
        };

        let widths: Vec<Constraint> = columns
            .iter()
            .map(|col| match col.width {
                Some(w) => Constraint::Length(w),
                None => Constraint::Fill(1),
            })
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(table, area);
    }

    fn render_cell(&self, visual_row: usize, source_row: usize, col_idx: usize) -> TableCell<'_> {
        if let Some(editor) = &self.editor {
            if editor.source_row == source_row && editor.column == col_idx {
                return TableCell::from(format!("{}█", editor.input.value()))
                    .style(Style::default().fg(Color::Black).bg(Color::Yellow));
            }
        }

        let text = self
            .model
            .cell(source_row, col_idx)
            .map(|c| c.render())
            .unwrap_or_default();

        let style = if self.focus == TableFocus::Body
            && visual_row == self.row_cursor
            && col_idx == self.col_cursor
        {
            Style::default().add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
        } else {
            Style::default()
        };

        TableCell::from(text).style(style)
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let mut lines = Vec::new();

        if self.display.show_page_info {
            let info = self.model.page_info();
            lines.push(Line::from(format!(
                "Showing {} to {} of {} entries",
                info.start, info.end, info.total
            )));
        }

        let mut spans = Vec::new();

        if self.display.show_page_input {
            let buf = if self.focus == TableFocus::Goto {
                format!("{}█", self.goto_buffer.value())
            } else {
                (self.model.page_index() + 1).to_string()
            };
            spans.push(Span::raw(format!(
                "Go to page: [{}] of {}   ",
                buf,
                self.model.page_count()
            )));
        }

        if self.display.show_pagination {
            let current = self.model.page_index() + 1;
            spans.push(Span::styled("Prev ", Style::default().fg(Color::Blue)));
            for page in self.model.page_window() {
                let style = if page == current {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                spans.push(Span::styled(format!(" {} ", page), style));
            }
            spans.push(Span::styled(" Next", Style::default().fg(Color::Blue)));
        }

        if self.display.show_page_size_chooser {
            spans.push(Span::raw(format!("   Show {}", self.model.page_size())));
        }

        if !spans.is_empty() {
            lines.push(Line::from(spans));
        }

        f.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cell::CellValue;
    use crate::data::row_model::{Column, Row, RowModel};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn widget_with_rows(n: i64) -> TableWidget {
        let columns = vec![
            Column::new("id", "Id"),
            Column::new("name", "Name").editable(),
        ];
        let rows = (0..n)
            .map(|i| {
                Row::new(vec![
                    CellValue::Integer(i),
                    CellValue::String(format!("row{}", i)),
                ])
            })
            .collect();
        let model = RowModel::new(columns, rows, 10);
        TableWidget::new(model, DisplayConfig::default(), &BehaviorConfig::default())
    }

    #[test]
    fn goto_input_sanitizes_and_clamps() {
        let mut table = widget_with_rows(12); // two pages at size 10

        table.handle_key(key(KeyCode::Char('g')));
        for c in "abc3def".chars() {
            table.handle_key(key(KeyCode::Char(c)));
        }
        let action = table.handle_key(key(KeyCode::Enter));
        assert_eq!(action, TableAction::PageChanged(2));
        assert_eq!(table.model().page_index(), 1);
    }

    #[test]
    fn page_size_cycle_notifies_owner() {
        let mut table = widget_with_rows(30);
        let action = table.handle_key(key(KeyCode::Char('z')));
        assert_eq!(action, TableAction::PageSizeChanged(25));
        assert_eq!(table.model().page_size(), 25);
    }

    #[test]
    fn edit_commits_on_blur_only() {
        let mut table = widget_with_rows(3);
        let before = table.model().rows();

        table.handle_key(key(KeyCode::Right)); // column 1 ("name", editable)
        table.handle_key(key(KeyCode::Enter)); // begin edit
        for c in "!!".chars() {
            table.handle_key(key(KeyCode::Char(c)));
        }
        // no commit while typing
        assert_eq!(table.model().rows().as_ref(), before.as_ref());

        let action = table.handle_key(key(KeyCode::Enter));
        assert_eq!(action, TableAction::CellEdited { row: 0, column: 1 });
        assert_eq!(
            table.model().cell(0, 1),
            Some(&CellValue::String("row0!!".to_string()))
        );
        // the previous collection is untouched
        assert_eq!(before[0].cell(1), Some(&CellValue::String("row0".to_string())));
    }

    #[test]
    fn edit_escape_discards() {
        let mut table = widget_with_rows(2);
        table.handle_key(key(KeyCode::Right));
        table.handle_key(key(KeyCode::Char('e')));
        table.handle_key(key(KeyCode::Char('x')));
        table.handle_key(key(KeyCode::Esc));
        assert_eq!(
            table.model().cell(0, 1),
            Some(&CellValue::String("row0".to_string()))
        );
    }

    #[test]
    fn non_editable_column_does_not_enter_edit() {
        let mut table = widget_with_rows(2);
        // column 0 is not editable
        assert_eq!(table.handle_key(key(KeyCode::Char('e'))), TableAction::None);
        assert_eq!(table.handle_key(key(KeyCode::Char('x'))), TableAction::PassThrough);
    }
}
