//! Slab tables supplied as data.
//!
//! A CSV file with columns `regime,min,max,rate_percent` describes one or
//! more progressive schedules; [`SlabTableLoader`] turns it into validated
//! [`calc_core::SlabTable`]s.

mod loader;

pub use loader::{SlabLoaderError, SlabRecord, SlabTableLoader};
