//! UI widgets
//!
//! Reusable components rendered by the application shell: the dropdown
//! select, the data table, debounced and plain search inputs, and status
//! notifications. Widgets own their state and hand interaction results back
//! to the owner as action enums.

pub mod debounced_input;
pub mod notification;
pub mod search_bar;
pub mod select;
pub mod table;
