//! Spreadsheet to catalog synchronization
//!
//! Rows are read from CSV ([`csv_reader`]), each one reconciled against the
//! shop ([`reconciler`]) and the whole batch driven row by row ([`runner`]).

pub mod csv_reader;
pub mod reconciler;
pub mod row;
pub mod runner;

pub use csv_reader::read_rows;
pub use reconciler::{ProductAction, PublishStatus, RowOutcome, StageError, VariantAction};
pub use row::ProductRow;
pub use runner::{SyncObserver, SyncSummary, run_sync};
