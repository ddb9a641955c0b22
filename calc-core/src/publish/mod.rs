//! Read-only consumers of a computed result.
//!
//! Publishers receive a calculator's inputs and its [`ResultRecord`] by shared
//! reference and keep their own copies; nothing here can change a store.
//!
//! [`ResultRecord`]: crate::ResultRecord

mod summary;
mod tray;

pub use summary::{Summary, SummaryInput, SummaryLine};
pub use tray::{ComparisonTray, TrayEntry};
