// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use minifin::config::{Config, ConfigError, ENV_BACKEND_URL, ENV_USER_ID, RouteStyle};
use std::io::Write;
use tempfile::{NamedTempFile, tempdir};

#[test]
fn missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let cfg = Config::load(Some(dir.path().join("nope.toml").as_path())).unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.backend_url, "http://localhost:8000");
    assert_eq!(cfg.default_currency, "₽");
    assert_eq!(cfg.routes, RouteStyle::Records);
}

#[test]
fn file_values_are_read() {
    let mut f = NamedTempFile::new().unwrap();
    writeln!(
        f,
        r#"
backend_url = "https://fin.example.com/"
user_id = "777"
routes = "operations"
timeout_secs = 5
"#
    )
    .unwrap();
    let cfg = Config::load(Some(f.path())).unwrap().validate().unwrap();
    assert_eq!(cfg.backend_url, "https://fin.example.com");
    assert_eq!(cfg.user_id.as_deref(), Some("777"));
    assert_eq!(cfg.routes, RouteStyle::Operations);
    assert_eq!(cfg.timeout_secs, 5);
    assert_eq!(cfg.default_currency, "₽");
}

#[test]
fn malformed_file_is_a_parse_error() {
    let mut f = NamedTempFile::new().unwrap();
    writeln!(f, "routes = \"graphql\"").unwrap();
    assert!(matches!(
        Config::load(Some(f.path())),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn flags_beat_env_which_beats_file() {
    let mut cfg = Config {
        user_id: Some("file".into()),
        ..Config::default()
    };
    cfg.apply_env_with(|k| match k {
        ENV_USER_ID => Some("env".into()),
        ENV_BACKEND_URL => Some("http://env:8000".into()),
        _ => None,
    });
    assert_eq!(cfg.user_id.as_deref(), Some("env"));
    assert_eq!(cfg.backend_url, "http://env:8000");

    cfg.apply_overrides(None, Some("flag"));
    assert_eq!(cfg.user_id.as_deref(), Some("flag"));
    assert_eq!(cfg.backend_url, "http://env:8000");
}

#[test]
fn blank_env_values_are_ignored() {
    let mut cfg = Config::default();
    cfg.apply_env_with(|_| Some("  ".into()));
    assert_eq!(cfg, Config::default());
}

#[test]
fn validate_rejects_non_http_urls_and_blank_users() {
    let bad = Config {
        backend_url: "ftp://x".into(),
        ..Config::default()
    };
    assert!(matches!(
        bad.validate(),
        Err(ConfigError::InvalidBackendUrl(_))
    ));

    let blank = Config {
        user_id: Some("   ".into()),
        ..Config::default()
    }
    .validate()
    .unwrap();
    assert_eq!(blank.user_id, None);
}
