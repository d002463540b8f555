//! Pure page logic for the dashboard: derived views, aggregates, forms and export
//!
//! Nothing in this crate performs I/O. Each page instantiates the same shape:
//! a [`RecordFilter`] narrows the record list with [`derive_view`], an
//! [`Aggregate`] reduces it to header counters, forms are checked before any
//! collaborator call, and the current view can be rendered to CSV or JSON.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]

pub mod access_logs;
pub mod clients;
pub mod dialog;
pub mod error;
pub mod export;
pub mod feedback;
pub mod forms;
pub mod stats;
pub mod view;

pub use access_logs::{AccessLogFilter, AccessLogStats, ExportRange};
pub use clients::{ClientFilter, ClientStats};
pub use dialog::{AccessLogDialog, ClientDialog, FeedbackDialog};
pub use error::{ExportError, FormError};
pub use export::{CsvRow, ExportFormat, export_filename};
pub use feedback::{IdeaFilter, IdeaSort, IdeaStats, NpsSummary, sort_ideas};
pub use stats::{Aggregate, compute_aggregate, rate};
pub use view::{RecordFilter, Searchable, Selector, derive_view};
