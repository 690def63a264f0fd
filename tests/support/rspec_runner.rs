//! Runs rspec suites on a single thread.

use std::sync::Arc;

use rspec::block::Suite;
use rspec::report::Report;
use rspec::{ConfigurationBuilder, Logger, Runner};

/// Runs `suite` serially; a Bevy `App` must not be ticked from several
/// threads at once.
///
/// Every example runs even after one fails; the failures are then reported
/// as a panic so the surrounding `#[test]` fails too.
///
/// # Panics
///
/// Panics if the rspec configuration cannot be built or any example failed.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + std::fmt::Debug,
{
    let logger = Arc::new(Logger::new(std::io::stdout()));
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|e| panic!("rspec configuration failed: {e}"));
    let report = Runner::new(config, vec![logger]).run(suite);
    assert!(!report.is_failure(), "rspec suite reported failing examples");
}
