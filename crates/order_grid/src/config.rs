use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use shared::error::ErrorCodeTable;
use tracing::{debug, warn};

use crate::error::GridError;

pub const DEFAULT_SETTINGS_FILE: &str = "grid.toml";

/// Upper bound for line and tick counts; keeps column and tick-row indices
/// well inside `u32`.
pub const MAX_LINES: u32 = 1000;

/// Price/quantity layout of the grid. Constant for a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Gridlines above the market price row.
    pub num_grid_lines: u32,
    /// Columns on each side of the zero-quantity axis, minus one. Follows
    /// `num_grid_lines` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_vert_lines: Option<u32>,
    /// Price distance from the market price to the top of the grid.
    pub price_extreme: f64,
    /// Price ticks per drawn gridline.
    pub minor_tick: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            num_grid_lines: 4,
            num_vert_lines: None,
            price_extreme: 100.0,
            minor_tick: 4,
        }
    }
}

impl GridConfig {
    pub fn new(num_grid_lines: u32, price_extreme: f64, minor_tick: u32) -> Self {
        Self {
            num_grid_lines,
            num_vert_lines: None,
            price_extreme,
            minor_tick,
        }
    }

    pub fn vert_lines(&self) -> u32 {
        self.num_vert_lines.unwrap_or(self.num_grid_lines)
    }

    pub fn price_per_line(&self) -> f64 {
        self.price_extreme / (f64::from(self.num_grid_lines) + 1.0)
    }

    pub fn price_per_tick(&self) -> f64 {
        self.price_per_line() / f64::from(self.minor_tick)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.num_grid_lines == 0 {
            return Err(GridError::NoGridLines);
        }
        if self.vert_lines() == 0 {
            return Err(GridError::NoVertLines);
        }
        if self.minor_tick == 0 {
            return Err(GridError::NoMinorTick);
        }
        for (field, value) in [
            ("num_grid_lines", self.num_grid_lines),
            ("num_vert_lines", self.vert_lines()),
            ("minor_tick", self.minor_tick),
        ] {
            if value > MAX_LINES {
                return Err(GridError::TooDense {
                    field,
                    value,
                    max: MAX_LINES,
                });
            }
        }
        if !(self.price_extreme.is_finite() && self.price_extreme > 0.0) {
            return Err(GridError::PriceExtreme(self.price_extreme));
        }
        Ok(())
    }
}

/// Pixel padding around the grid box and the pointer marker size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub edge_pad: f32,
    pub text_pad: f32,
    pub marker_radius: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            edge_pad: 5.0,
            text_pad: 50.0,
            marker_radius: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridSettings {
    pub server_url: String,
    pub market_price: f64,
    pub grid: GridConfig,
    pub layout: GridLayout,
    pub max_orders: usize,
    pub max_orders_per_side: Option<usize>,
    pub error_codes: ErrorCodeTable,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:8000/live".into(),
            market_price: 50.0,
            grid: GridConfig::default(),
            layout: GridLayout::default(),
            max_orders: 6,
            max_orders_per_side: None,
            error_codes: ErrorCodeTable::default(),
        }
    }
}

impl GridSettings {
    pub fn validate(&self) -> Result<(), GridError> {
        self.grid.validate()?;
        if !(self.market_price.is_finite() && self.market_price >= 0.0) {
            return Err(GridError::MarketPrice(self.market_price));
        }
        url::Url::parse(&self.server_url).map_err(|source| GridError::ServerUrl {
            url: self.server_url.clone(),
            source,
        })?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    server_url: Option<String>,
    market_price: Option<f64>,
    grid: Option<GridConfig>,
    layout: Option<GridLayout>,
    max_orders: Option<usize>,
    max_orders_per_side: Option<usize>,
    error_codes_path: Option<PathBuf>,
}

/// Defaults, then the settings file, then `APP__*` environment overrides. An
/// explicit `path` must exist; the default `grid.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> Result<GridSettings, GridError> {
    let mut settings = GridSettings::default();

    let (path, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_SETTINGS_FILE), false),
    };
    if required || path.exists() {
        let raw = fs::read_to_string(path).map_err(|source| GridError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: SettingsFile = toml::from_str(&raw).map_err(|source| GridError::Settings {
            path: path.to_path_buf(),
            source,
        })?;
        apply_file(&mut settings, file, path.parent())?;
        debug!(path = %path.display(), "loaded grid settings file");
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings.validate()?;
    Ok(settings)
}

fn apply_file(
    settings: &mut GridSettings,
    file: SettingsFile,
    base_dir: Option<&Path>,
) -> Result<(), GridError> {
    if let Some(v) = file.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file.market_price {
        settings.market_price = v;
    }
    if let Some(v) = file.grid {
        settings.grid = v;
    }
    if let Some(v) = file.layout {
        settings.layout = v;
    }
    if let Some(v) = file.max_orders {
        settings.max_orders = v;
    }
    if file.max_orders_per_side.is_some() {
        settings.max_orders_per_side = file.max_orders_per_side;
    }
    if let Some(table_path) = file.error_codes_path {
        let table_path = match base_dir {
            Some(dir) if table_path.is_relative() => dir.join(table_path),
            _ => table_path,
        };
        settings.error_codes = load_error_codes(&table_path)?;
    }
    Ok(())
}

pub fn load_error_codes(path: &Path) -> Result<ErrorCodeTable, GridError> {
    let raw = fs::read_to_string(path).map_err(|source| GridError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ErrorCodeTable::from_json(&raw).map_err(|source| GridError::ErrorCodes {
        path: path.to_path_buf(),
        source,
    })
}

pub fn apply_env_overrides(settings: &mut GridSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = parsed(&lookup, "APP__MARKET_PRICE") {
        settings.market_price = v;
    }
    if let Some(v) = parsed(&lookup, "APP__NUM_GRID_LINES") {
        settings.grid.num_grid_lines = v;
    }
    if let Some(v) = parsed(&lookup, "APP__NUM_VERT_LINES") {
        settings.grid.num_vert_lines = Some(v);
    }
    if let Some(v) = parsed(&lookup, "APP__PRICE_EXTREME") {
        settings.grid.price_extreme = v;
    }
    if let Some(v) = parsed(&lookup, "APP__MINOR_TICK") {
        settings.grid.minor_tick = v;
    }
    if let Some(v) = parsed(&lookup, "APP__MAX_ORDERS") {
        settings.max_orders = v;
    }
    if let Some(v) = parsed(&lookup, "APP__MAX_ORDERS_PER_SIDE") {
        settings.max_orders_per_side = Some(v);
    }
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
