pub mod wiremock_helpers;

use companyprofiler::config::AppConfig;

/// Config built from the embedded defaults, for tests that need timeouts
/// and provider mappings but no file on disk.
pub fn test_config() -> AppConfig {
    AppConfig::embedded_default().expect("embedded default config should parse")
}
