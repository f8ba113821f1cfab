//! Data acquisition and storage
//!
//! Scrapers for ESPN game pages and SQLite database management.

pub mod database;
pub mod scrapers;

pub use database::{Database, StoreStats};
pub use scrapers::{BoxScoreScraper, ScheduleScraper};
