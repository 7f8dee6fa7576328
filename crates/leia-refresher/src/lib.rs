//! Background data refresher for leia.
//!
//! [`TimeBasedDataProvider`] polls a supplier on a dedicated thread and
//! publishes each accepted value with a single atomic swap. Readers go
//! through [`DataProvider::data`] and always see either the initial value or
//! the last published one.

pub mod config;
pub mod error;
pub mod provider;
pub mod time_based;

pub use config::RefresherConfig;
pub use error::{BoxError, RefreshError, Result};
pub use provider::{DataProvider, StaticDataProvider};
pub use time_based::TimeBasedDataProvider;
