//! Data layer
//!
//! Separates the derived-state engines from presentation: typed cell values
//! and comparators, the table row model (filter/sort/paginate), and the
//! select option model with its search filter.

pub mod cell;
pub mod options;
pub mod row_model;

pub use cell::CellValue;
pub use options::{FilteredOptions, OptionGroup, OptionItem, OptionRef, OptionSet};
pub use row_model::{Column, PageInfo, Row, RowModel, SortDirection, SortKey};
