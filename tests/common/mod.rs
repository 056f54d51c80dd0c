use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use edgarfacts::{Edgar, EdgarConfig, EdgarUrls};

pub fn fixture_path(relative: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

pub fn read_fixture(relative: impl AsRef<Path>) -> String {
    fs::read_to_string(fixture_path(relative)).expect("fixture file should be readable")
}

#[allow(dead_code)]
pub fn read_fixture_bytes(relative: impl AsRef<Path>) -> Vec<u8> {
    fs::read(fixture_path(relative)).expect("fixture file should be readable")
}

#[allow(dead_code)]
pub fn edgar() -> Edgar {
    Edgar::new("test_agent example@example.com").unwrap()
}

/// Client pointed at a mock server, with a short request interval.
#[allow(dead_code)]
pub fn mock_edgar(base: &str) -> Edgar {
    let config = EdgarConfig {
        user_agent: "test_agent example@example.com".to_string(),
        request_interval: Duration::from_millis(1),
        base_urls: EdgarUrls::single(base),
        ..EdgarConfig::default()
    };
    Edgar::with_config(config).unwrap()
}
