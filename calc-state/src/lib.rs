//! Keeps calculator inputs, the address bar and browser history in step.
//!
//! A [`CalculatorSession`] owns one calculator's [`InputStateStore`] and
//! writes its fields to the shared [`AddressBar`] under the calculator's
//! namespace through a [`UrlCodec`]. A [`Navigator`] replays back/forward
//! through its [`HistoryBridge`] so attached sessions re-read the URL.

pub mod address_bar;
pub mod codec;
pub mod error;
pub mod history;
pub mod query;
pub mod routing;
pub mod share;
pub mod store;

pub use address_bar::{AddressBar, MemoryAddressBar, NavigationEvent, SharedAddressBar};
pub use codec::{UrlCodec, hydrate_from_url};
pub use error::StateError;
pub use history::{HistoryBridge, ListenerId, Navigator};
pub use query::QueryString;
pub use routing::{activate, active_calculator};
pub use share::build_share_link;
pub use store::{CalculatorSession, InputStateStore};
