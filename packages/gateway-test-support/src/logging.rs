//! Test logging shared by unit and integration tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_TEST_FILTER: &str = "warn";

static INSTALLED: OnceCell<()> = OnceCell::new();

/// `TEST_LOG` wins over `RUST_LOG`; with neither set only warnings show.
fn test_filter() -> EnvFilter {
    ["TEST_LOG", "RUST_LOG"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_TEST_FILTER))
}

/// Install a compact subscriber writing through the test harness.
///
/// Safe to call from every test and every `ctor` hook; only the first call
/// installs anything, and a subscriber installed elsewhere is left alone.
pub fn init() {
    INSTALLED.get_or_init(|| {
        let _ = fmt()
            .with_env_filter(test_filter())
            .with_test_writer()
            .without_time()
            .compact()
            .try_init();
    });
}
