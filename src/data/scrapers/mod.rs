//! Web scrapers for ESPN game data

pub mod boxscore;
pub mod schedule;

pub use boxscore::BoxScoreScraper;
pub use schedule::ScheduleScraper;

use crate::Result;

/// Retry a scraper operation with exponential backoff
pub fn with_retry<T, F>(mut operation: F, max_attempts: u32) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let mut last_error = None;
    for attempt in 0..max_attempts {
        match operation() {
            Ok(result) => return Ok(result),
            Err(e) => {
                log::warn!("Attempt {} failed: {}", attempt + 1, e);
                last_error = Some(e);
                if attempt < max_attempts - 1 {
                    let delay = std::time::Duration::from_millis(100 * 2u64.pow(attempt));
                    std::thread::sleep(delay);
                }
            }
        }
    }
    Err(last_error.unwrap())
}
