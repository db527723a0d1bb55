//! Records view
//!
//! The main authenticated view: a data table over the loaded records, a
//! dropdown select choosing the page size, and the wiring between them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use tracing::debug;

use crate::config::Config;
use crate::data::options::OptionSet;
use crate::data::row_model::{Column, Row, RowModel};
use crate::widgets::select::{SelectAction, SelectEvent, SelectWidget};
use crate::widgets::table::{TableAction, TableWidget};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordsAction {
    None,
    Logout,
    PageSizeChanged(usize),
}

/// Which component owns keystrokes inside the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordsFocus {
    Table,
    PageSize,
}

pub struct RecordsView {
    table: TableWidget,
    page_size_select: SelectWidget,
    focus: RecordsFocus,
}

impl RecordsView {
    pub fn new(config: &Config, columns: Vec<Column>, rows: Vec<Row>) -> Self {
        let model = RowModel::new(columns, rows, config.behavior.default_page_size);
        let table = TableWidget::new(model, config.display.clone(), &config.behavior);

        let sizes: Vec<String> = config
            .behavior
            .page_size_options
            .iter()
            .map(|s| s.to_string())
            .collect();
        let page_size_select = SelectWidget::new(OptionSet::flat(sizes))
            .with_value(config.behavior.default_page_size.to_string())
            .with_placeholder("Page size")
            .searchable(false);

        Self {
            table,
            page_size_select,
            focus: RecordsFocus::Table,
        }
    }

    pub fn table(&self) -> &TableWidget {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableWidget {
        &mut self.table
    }

    pub fn check_debounce(&mut self) -> Option<String> {
        self.table.check_debounce()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> RecordsAction {
        // Logout is global to the view
        if key.code == KeyCode::Char('l') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return RecordsAction::Logout;
        }

        match self.focus {
            RecordsFocus::PageSize => self.handle_select_key(key),
            RecordsFocus::Table => {
                match self.table.handle_key(key) {
                    TableAction::PageSizeChanged(size) => {
                        self.page_size_select
                            .apply(SelectEvent::SyncValue(size.to_string()));
                        RecordsAction::PageSizeChanged(size)
                    }
                    TableAction::PassThrough => match key.code {
                        KeyCode::Tab => {
                            self.focus = RecordsFocus::PageSize;
                            RecordsAction::None
                        }
                        _ => RecordsAction::None,
                    },
                    _ => RecordsAction::None,
                }
            }
        }
    }

    fn handle_select_key(&mut self, key: KeyEvent) -> RecordsAction {
        // Tab moves focus back to the table; an open panel treats it as
        // an outside interaction first
        if key.code == KeyCode::Tab {
            self.page_size_select.apply(SelectEvent::FocusLost);
            self.focus = RecordsFocus::Table;
            return RecordsAction::None;
        }

        match self.page_size_select.handle_key(key) {
            SelectAction::Changed(change) if !change.value.is_empty() => {
                match change.value.parse::<usize>() {
                    Ok(size) => {
                        debug!(target: "records", "Page size picked from select: {}", size);
                        self.table.model_mut().set_page_size(size);
                        self.focus = RecordsFocus::Table;
                        RecordsAction::PageSizeChanged(size)
                    }
                    Err(_) => RecordsAction::None,
                }
            }
            _ => RecordsAction::None,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);

        self.render_toolbar(f, chunks[0]);
        self.table.render(f, chunks[1]);

        // The select panel overlays whatever is underneath it
        if self.page_size_select.is_open() {
            let panel = Rect::new(
                chunks[0].right().saturating_sub(18),
                chunks[0].bottom(),
                18.min(area.width),
                9.min(chunks[1].height),
            );
            self.page_size_select.render_panel(f, panel);
        }
    }

    fn render_toolbar(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(18)])
            .split(area);

        let title = Paragraph::new(Line::styled(
            " Records  (/ search, s sort, e edit, g go to page, Ctrl+L log out)",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .style(match self.focus {
            RecordsFocus::Table => Style::default(),
            RecordsFocus::PageSize => Style::default().fg(Color::DarkGray),
        });
        f.render_widget(title, chunks[0]);

        self.page_size_select.render(f, chunks[1]);
    }
}
