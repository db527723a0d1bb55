//! Dropdown select widget
//!
//! A searchable, optionally grouped select: a closed control showing the
//! committed value, and an options panel with incremental search and a
//! keyboard-driven highlight cursor. All transitions run through
//! [`SelectWidget::apply`], a pure state-transition function, so the whole
//! machine is unit-testable without a terminal.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};
use tracing::debug;

use crate::data::options::{FilteredOptions, OptionGroup, OptionItem, OptionRef, OptionSet};

/// What a committed change matched: the raw item for direct activation and
/// flat commits, the owning group for grouped keyboard commits
#[derive(Debug, Clone, PartialEq)]
pub enum SelectMatch {
    Item(OptionItem),
    Group(OptionGroup),
}

/// Payload delivered to the owner on commit, direct click, and clear
#[derive(Debug, Clone, PartialEq)]
pub struct SelectChange {
    /// The committed key text, empty on clear
    pub value: String,
    /// The matched item or group, None on clear
    pub matched: Option<SelectMatch>,
    /// Search text at the moment of commit
    pub search: String,
}

/// Result of feeding an event or key into the select
#[derive(Debug, Clone, PartialEq)]
pub enum SelectAction {
    None,
    Opened,
    Closed,
    Changed(SelectChange),
}

/// Events the select state machine understands
#[derive(Debug, Clone, PartialEq)]
pub enum SelectEvent {
    /// Activate the control: toggles open/closed
    Toggle,
    /// Focus or pointer moved outside the control and panel
    FocusLost,
    Escape,
    /// Move the highlight cursor down
    Next,
    /// Move the highlight cursor up
    Prev,
    /// Commit the highlighted option
    Commit,
    /// Directly activate one visible option, bypassing the cursor
    Activate(OptionRef),
    /// The clear control was used
    Clear,
    SearchPush(char),
    SearchPop,
    SearchClear,
    /// The owner's value changed externally; it is authoritative
    SyncValue(String),
    SetOptions(OptionSet),
}

/// Select state: open flag, highlight cursor, committed value, search text
#[derive(Debug, Clone, PartialEq)]
pub struct SelectState {
    pub open: bool,
    pub highlighted: Option<OptionRef>,
    pub selected: String,
    pub search: String,
}

impl Default for SelectState {
    fn default() -> Self {
        Self {
            open: false,
            highlighted: None,
            selected: String::new(),
            search: String::new(),
        }
    }
}

pub struct SelectWidget {
    options: OptionSet,
    state: SelectState,
    searchable: bool,
    placeholder: String,
    disabled: bool,

    /// Derived: the filtered view and its flattened cursor order
    filtered: FilteredOptions,
    flattened: Vec<OptionRef>,
}

impl SelectWidget {
    pub fn new(options: OptionSet) -> Self {
        let filtered = options.filter("");
        let flattened = filtered.flatten();
        Self {
            options,
            state: SelectState::default(),
            searchable: true,
            placeholder: "Select an Option".to_string(),
            disabled: false,
            filtered,
            flattened,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.state.selected = value.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn state(&self) -> &SelectState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.open
    }

    pub fn selected(&self) -> &str {
        &self.state.selected
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// The flattened option refs the cursor currently walks
    pub fn visible_refs(&self) -> &[OptionRef] {
        &self.flattened
    }

    /// Pure state transition. Every interaction funnels through here.
    pub fn apply(&mut self, event: SelectEvent) -> SelectAction {
        if self.disabled {
            return SelectAction::None;
        }

        match event {
            SelectEvent::Toggle => {
                self.state.open = !self.state.open;
                if self.state.open {
                    SelectAction::Opened
                } else {
                    SelectAction::Closed
                }
            }
            SelectEvent::FocusLost => {
                // Outside interaction collapses the panel but keeps the
                // search text, matching the control's original behavior
                if !self.state.open {
                    return SelectAction::None;
                }
                self.state.open = false;
                self.state.highlighted = None;
                SelectAction::Closed
            }
            SelectEvent::Escape => {
                if !self.state.open {
                    return SelectAction::None;
                }
                self.state.open = false;
                self.state.highlighted = None;
                self.set_search(String::new());
                SelectAction::Closed
            }
            SelectEvent::Next => {
                if self.flattened.is_empty() {
                    return SelectAction::None;
                }
                let next = match self.cursor_position() {
                    Some(pos) => (pos + 1).min(self.flattened.len() - 1),
                    None => 0,
                };
                self.state.highlighted = Some(self.flattened[next]);
                SelectAction::None
            }
            SelectEvent::Prev => {
                if self.flattened.is_empty() {
                    return SelectAction::None;
                }
                let prev = match self.cursor_position() {
                    Some(pos) => pos.saturating_sub(1),
                    None => 0,
                };
                self.state.highlighted = Some(self.flattened[prev]);
                SelectAction::None
            }
            SelectEvent::Commit => match self.state.highlighted {
                Some(r) => {
                    let matched = if self.options.is_grouped() {
                        self.options.group(r).cloned().map(SelectMatch::Group)
                    } else {
                        self.options.resolve(r).cloned().map(SelectMatch::Item)
                    };
                    self.commit(r, matched)
                }
                None => SelectAction::None,
            },
            SelectEvent::Activate(r) => {
                // Direct activation always reports the raw item
                let matched = self.options.resolve(r).cloned().map(SelectMatch::Item);
                self.commit(r, matched)
            }
            SelectEvent::Clear => {
                // Reopen ready for a fresh pick
                self.state.open = true;
                self.state.highlighted = None;
                self.state.selected = String::new();
                self.set_search(String::new());
                SelectAction::Changed(SelectChange {
                    value: String::new(),
                    matched: None,
                    search: String::new(),
                })
            }
            SelectEvent::SearchPush(c) => {
                if !self.searchable || !self.state.open {
                    return SelectAction::None;
                }
                let mut search = self.state.search.clone();
                search.push(c);
                self.set_search(search);
                SelectAction::None
            }
            SelectEvent::SearchPop => {
                if !self.searchable || !self.state.open {
                    return SelectAction::None;
                }
                let mut search = self.state.search.clone();
                search.pop();
                self.set_search(search);
                SelectAction::None
            }
            SelectEvent::SearchClear => {
                if !self.searchable {
                    return SelectAction::None;
                }
                self.set_search(String::new());
                SelectAction::None
            }
            SelectEvent::SyncValue(value) => {
                if self.state.selected != value {
                    self.state.selected = value;
                }
                SelectAction::None
            }
            SelectEvent::SetOptions(options) => {
                self.options = options;
                self.refilter();
                SelectAction::None
            }
        }
    }

    /// Map a terminal key to select events
    pub fn handle_key(&mut self, key: KeyEvent) -> SelectAction {
        if !self.state.open {
            return match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.apply(SelectEvent::Toggle),
                KeyCode::Delete if !self.state.selected.is_empty() => {
                    self.apply(SelectEvent::Clear)
                }
                _ => SelectAction::None,
            };
        }

        match key.code {
            KeyCode::Down => self.apply(SelectEvent::Next),
            KeyCode::Up => self.apply(SelectEvent::Prev),
            KeyCode::Enter | KeyCode::Char(' ') => self.apply(SelectEvent::Commit),
            KeyCode::Esc => self.apply(SelectEvent::Escape),
            KeyCode::Backspace => self.apply(SelectEvent::SearchPop),
            KeyCode::Delete if !self.state.selected.is_empty() => self.apply(SelectEvent::Clear),
            KeyCode::Char(c) => self.apply(SelectEvent::SearchPush(c)),
            _ => SelectAction::None,
        }
    }

    fn commit(&mut self, r: OptionRef, matched: Option<SelectMatch>) -> SelectAction {
        let Some(value) = self.options.key_of(r) else {
            return SelectAction::None;
        };

        let search_at_commit = self.state.search.clone();
        debug!(target: "select", "Committed '{}' (search was '{}')", value, search_at_commit);

        self.state.selected = value.clone();
        self.state.open = false;
        self.state.highlighted = None;
        self.set_search(String::new());

        SelectAction::Changed(SelectChange {
            value,
            matched,
            search: search_at_commit,
        })
    }

    fn cursor_position(&self) -> Option<usize> {
        self.state
            .highlighted
            .and_then(|h| self.flattened.iter().position(|&r| r == h))
    }

    fn set_search(&mut self, search: String) {
        self.state.search = search;
        self.refilter();
    }

    /// Recompute the filtered view. The highlight is re-validated against
    /// the new set and cleared when its option is no longer visible.
    fn refilter(&mut self) {
        let search = if self.searchable {
            self.state.search.as_str()
        } else {
            ""
        };
        self.filtered = self.options.filter(search);
        self.flattened = self.filtered.flatten();

        if let Some(h) = self.state.highlighted {
            if !self.filtered.contains(h) {
                self.state.highlighted = None;
            }
        }
    }

    /// Render the closed control line
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let arrow = if self.state.open { "▴" } else { "▾" };

        let mut spans = Vec::new();
        if self.state.selected.is_empty() {
            spans.push(Span::styled(
                self.placeholder.clone(),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            spans.push(Span::raw(self.state.selected.clone()));
            spans.push(Span::raw(" "));
            spans.push(Span::styled("×", Style::default().fg(Color::Red)));
        }
        spans.push(Span::raw(format!(" {}", arrow)));

        let border_style = if self.state.open {
            Style::default().fg(Color::Cyan)
        } else if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let control = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).border_style(border_style));
        f.render_widget(control, area);
    }

    /// Render the options panel into the overlay area below the control
    pub fn render_panel(&self, f: &mut Frame, area: Rect) {
        if !self.state.open {
            return;
        }

        f.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut y = inner.y;

        if self.searchable && y < inner.bottom() {
            let search_line = if self.state.search.is_empty() {
                Line::from(Span::styled("Search...", Style::default().fg(Color::DarkGray)))
            } else {
                Line::from(vec![
                    Span::raw(self.state.search.clone()),
                    Span::raw(" "),
                    Span::styled("×", Style::default().fg(Color::Red)),
                ])
            };
            let row = Rect::new(inner.x, y, inner.width, 1);
            f.render_widget(Paragraph::new(search_line), row);
            y += 1;
        }

        let list_area = Rect::new(inner.x, y, inner.width, inner.bottom().saturating_sub(y));
        let items = self.panel_items();
        f.render_widget(List::new(items), list_area);
    }

    fn option_line(&self, r: OptionRef, indent: &str) -> ListItem<'static> {
        let key = self.options.key_of(r).unwrap_or_default();
        let style = if self.state.highlighted == Some(r) {
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else if !self.state.selected.is_empty()
            && self.state.selected == key
            && self.state.highlighted.is_none()
        {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        ListItem::new(Line::from(Span::styled(format!("{}{}", indent, key), style)))
    }

    fn panel_items(&self) -> Vec<ListItem<'static>> {
        let mut items = Vec::new();

        match &self.filtered {
            FilteredOptions::Flat(indices) => {
                for &i in indices {
                    items.push(self.option_line(OptionRef::flat(i), " "));
                }
            }
            FilteredOptions::Grouped(groups) => {
                let OptionSet::Grouped(source_groups) = &self.options else {
                    return items;
                };
                for (g, indices) in groups.iter().enumerate() {
                    let name = source_groups
                        .get(g)
                        .map(|grp| grp.name.clone())
                        .unwrap_or_default();
                    items.push(ListItem::new(Line::from(Span::styled(
                        name,
                        Style::default().add_modifier(Modifier::BOLD),
                    ))));
                    for &i in indices {
                        items.push(self.option_line(OptionRef::grouped(g, i), "  "));
                    }
                }
            }
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::options::OptionGroup;

    fn open_select(options: OptionSet) -> SelectWidget {
        let mut select = SelectWidget::new(options);
        select.apply(SelectEvent::Toggle);
        select
    }

    #[test]
    fn toggle_opens_and_closes() {
        let mut select = SelectWidget::new(OptionSet::flat(["a", "b"]));
        assert!(!select.is_open());
        assert_eq!(select.apply(SelectEvent::Toggle), SelectAction::Opened);
        assert!(select.is_open());
        assert_eq!(select.apply(SelectEvent::Toggle), SelectAction::Closed);
    }

    #[test]
    fn disabled_ignores_everything() {
        let mut select = SelectWidget::new(OptionSet::flat(["a"])).disabled(true);
        assert_eq!(select.apply(SelectEvent::Toggle), SelectAction::None);
        assert!(!select.is_open());
    }

    #[test]
    fn escape_clears_search_but_not_selection() {
        let mut select = open_select(OptionSet::flat(["alpha", "beta"]));
        select.apply(SelectEvent::Next);
        select.apply(SelectEvent::Commit);
        assert_eq!(select.selected(), "alpha");

        select.apply(SelectEvent::Toggle);
        select.apply(SelectEvent::SearchPush('b'));
        select.apply(SelectEvent::Escape);
        assert!(!select.is_open());
        assert_eq!(select.state().search, "");
        assert_eq!(select.selected(), "alpha");
    }

    #[test]
    fn focus_lost_keeps_search_text() {
        let mut select = open_select(OptionSet::flat(["alpha", "beta"]));
        select.apply(SelectEvent::SearchPush('b'));
        select.apply(SelectEvent::FocusLost);
        assert!(!select.is_open());
        assert_eq!(select.state().search, "b");
        assert_eq!(select.state().highlighted, None);
    }

    #[test]
    fn external_value_is_authoritative() {
        let mut select = SelectWidget::new(OptionSet::flat(["a", "b"])).with_value("a");
        select.apply(SelectEvent::SyncValue("b".to_string()));
        assert_eq!(select.selected(), "b");
    }

    #[test]
    fn clear_reopens_and_notifies_empty() {
        let mut select = open_select(OptionSet::flat(["a"]));
        select.apply(SelectEvent::Next);
        select.apply(SelectEvent::Commit);
        assert_eq!(select.selected(), "a");

        let action = select.apply(SelectEvent::Clear);
        assert!(select.is_open());
        assert_eq!(
            action,
            SelectAction::Changed(SelectChange {
                value: String::new(),
                matched: None,
                search: String::new(),
            })
        );
        assert_eq!(select.selected(), "");
    }

    #[test]
    fn stale_highlight_is_cleared_by_search_change() {
        let mut select = open_select(OptionSet::flat(["alpha", "beta"]));
        select.apply(SelectEvent::Next); // highlight "alpha"
        assert!(select.state().highlighted.is_some());

        select.apply(SelectEvent::SearchPush('b')); // only "beta" remains
        assert_eq!(select.state().highlighted, None);
    }

    #[test]
    fn grouped_options_without_search_show_everything() {
        let select = open_select(OptionSet::Grouped(vec![OptionGroup {
            name: "G".to_string(),
            key_prop: None,
            options: vec!["x".into(), "y".into()],
        }]));
        assert_eq!(select.visible_refs().len(), 2);
    }
}
