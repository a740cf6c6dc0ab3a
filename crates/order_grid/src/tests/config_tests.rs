use std::{collections::HashMap, fs};

use super::*;

#[test]
fn defaults_match_the_market_page() {
    let settings = GridSettings::default();
    assert_eq!(settings.grid.num_grid_lines, 4);
    assert_eq!(settings.grid.vert_lines(), 4);
    assert_eq!(settings.grid.price_extreme, 100.0);
    assert_eq!(settings.grid.minor_tick, 4);
    assert_eq!(settings.max_orders, 6);
    settings.validate().expect("valid defaults");
}

#[test]
fn vertical_lines_follow_grid_lines_unless_set() {
    let mut config = GridConfig::new(6, 100.0, 2);
    assert_eq!(config.vert_lines(), 6);
    config.num_vert_lines = Some(3);
    assert_eq!(config.vert_lines(), 3);
}

#[test]
fn rejects_degenerate_grids() {
    assert!(matches!(
        GridConfig::new(0, 100.0, 4).validate(),
        Err(GridError::NoGridLines)
    ));
    assert!(matches!(
        GridConfig::new(4, 100.0, 0).validate(),
        Err(GridError::NoMinorTick)
    ));
    assert!(matches!(
        GridConfig::new(4, -1.0, 4).validate(),
        Err(GridError::PriceExtreme(_))
    ));
}

#[test]
fn rejects_grids_too_dense_to_index() {
    assert!(matches!(
        GridConfig::new(4, 100.0, u32::MAX / 2).validate(),
        Err(GridError::TooDense {
            field: "minor_tick",
            ..
        })
    ));
    assert!(matches!(
        GridConfig::new(u32::MAX, 100.0, 4).validate(),
        Err(GridError::TooDense {
            field: "num_grid_lines",
            ..
        })
    ));

    let mut config = GridConfig::new(4, 100.0, 4);
    config.num_vert_lines = Some(MAX_LINES + 1);
    assert!(matches!(
        config.validate(),
        Err(GridError::TooDense {
            field: "num_vert_lines",
            ..
        })
    ));

    let widest = GridConfig::new(MAX_LINES, 100.0, MAX_LINES);
    widest.validate().expect("upper bound is allowed");
    assert!(widest.price_per_line() > 0.0);
    assert_eq!(
        GridConfig::new(u32::MAX, 100.0, 4).price_per_line(),
        100.0 / (f64::from(u32::MAX) + 1.0)
    );
}

#[test]
fn env_override_cannot_sneak_past_the_bounds() {
    let mut settings = GridSettings::default();
    apply_env_overrides(&mut settings, |name| {
        (name == "APP__MINOR_TICK").then(|| "2147483647".to_string())
    });
    assert_eq!(settings.grid.minor_tick, 2_147_483_647);
    assert!(matches!(
        settings.validate(),
        Err(GridError::TooDense { .. })
    ));
}

#[test]
fn file_then_env_overrides_apply_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let codes_path = dir.path().join("codes.json");
    fs::write(
        &codes_path,
        r#"{"1":{"value":1,"field":1,"desc":"Price must be positive"}}"#,
    )
    .expect("write codes");
    let settings_path = dir.path().join("grid.toml");
    fs::write(
        &settings_path,
        r#"
server_url = "ws://market.local/live/abc"
market_price = 80.0
max_orders = 4
error_codes_path = "codes.json"

[grid]
num_grid_lines = 5
minor_tick = 2
"#,
    )
    .expect("write settings");

    let mut settings = GridSettings::default();
    let raw = fs::read_to_string(&settings_path).expect("read");
    let file: SettingsFile = toml::from_str(&raw).expect("parse");
    apply_file(&mut settings, file, settings_path.parent()).expect("apply");

    assert_eq!(settings.server_url, "ws://market.local/live/abc");
    assert_eq!(settings.market_price, 80.0);
    assert_eq!(settings.grid.num_grid_lines, 5);
    assert_eq!(settings.grid.minor_tick, 2);
    assert_eq!(settings.grid.price_extreme, 100.0);
    assert_eq!(settings.max_orders, 4);
    assert_eq!(settings.error_codes.describe(1), Some("Price must be positive"));

    let env: HashMap<&str, &str> = HashMap::from([
        ("APP__MARKET_PRICE", "65.5"),
        ("APP__MAX_ORDERS_PER_SIDE", "2"),
        ("APP__MINOR_TICK", "not-a-number"),
    ]);
    apply_env_overrides(&mut settings, |name| env.get(name).map(|v| v.to_string()));

    assert_eq!(settings.market_price, 65.5);
    assert_eq!(settings.max_orders_per_side, Some(2));
    assert_eq!(settings.grid.minor_tick, 2);
    settings.validate().expect("valid");
}

#[test]
fn load_settings_reports_malformed_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("grid.toml");
    fs::write(&path, "market_price = \"lots\"").expect("write");

    let err = load_settings(Some(&path)).expect_err("should fail");
    assert!(matches!(err, GridError::Settings { .. }));
}

#[test]
fn explicit_settings_path_must_exist() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.toml");

    let err = load_settings(Some(&missing)).expect_err("missing file");
    assert!(matches!(err, GridError::Read { path, .. } if path == missing));
}

#[test]
fn rejects_unparsable_server_url() {
    let settings = GridSettings {
        server_url: "not a url".into(),
        ..GridSettings::default()
    };
    assert!(matches!(
        settings.validate(),
        Err(GridError::ServerUrl { .. })
    ));
}
