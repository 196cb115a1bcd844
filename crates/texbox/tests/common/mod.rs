//! Shared setup for the integration tests

#![allow(dead_code)]

use texbox::{DefaultTexFont, FontConfig, GlueTable};

pub const FONT_JSON: &str = include_str!("../fixtures/font.json");

pub const ROMAN: usize = 0;
pub const ITALIC: usize = 1;
pub const SYMBOLS: usize = 2;
pub const EXTENSION: usize = 3;

/// Route layout logs to the test output; `RUST_LOG=texbox=trace` shows them
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn font_config() -> FontConfig {
    match FontConfig::from_json(FONT_JSON) {
        Ok(config) => config,
        Err(err) => panic!("fixture font config is invalid: {}", err),
    }
}

pub fn font() -> DefaultTexFont {
    init_tracing();
    match DefaultTexFont::new(font_config(), 10.0) {
        Ok(font) => font,
        Err(err) => panic!("fixture font is invalid: {}", err),
    }
}

pub fn glue() -> GlueTable {
    GlueTable::tex_default()
}
