//! Pure grid arithmetic: line counts, pixel spacing, pointer snapping and the
//! price/quantity each grid intersection stands for. Nothing here touches a
//! drawing surface.

use serde::Serialize;

use crate::{
    config::{GridConfig, GridLayout},
    error::GridError,
    surface::{Point, Rect},
};

/// Half of the grid a column belongs to. Sells are left of the quantity axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GridHalf {
    Sell,
    Buy,
}

/// Snapped pointer position: a whole-share column and a price-tick row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridPoint {
    pub column: u32,
    pub tick_row: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridGeometry {
    pub canvas_size: f32,
    pub box_size: f32,
    pub edge_pad: f32,
    pub text_pad: f32,
    /// Gridlines above the market price row.
    pub num_top: u32,
    /// Gridlines below the market price row; never reaches negative prices.
    pub num_bottom: u32,
    /// Row count, `num_top + 1 + num_bottom`.
    pub num_hor_lines: u32,
    /// Columns on each side of the quantity axis, minus one.
    pub num_vert_lines: u32,
    pub minor_tick: u32,
    pub hspace: f32,
    pub vspace: f32,
}

impl GridGeometry {
    pub fn compute(
        config: &GridConfig,
        layout: &GridLayout,
        canvas_size: f32,
        market_price: f64,
    ) -> Result<Self, GridError> {
        config.validate()?;
        let box_size = canvas_size - (layout.edge_pad + layout.text_pad);
        if !(box_size > 0.0) {
            return Err(GridError::EmptyContainer {
                width: canvas_size,
                height: canvas_size,
            });
        }

        let num_top = config.num_grid_lines;
        let lines_below = (market_price / config.price_per_line()).floor();
        let num_bottom = if lines_below >= f64::from(num_top) {
            num_top
        } else {
            lines_below.max(0.0) as u32
        };
        let num_hor_lines = num_top + 1 + num_bottom;
        let num_vert_lines = config.vert_lines();

        Ok(Self {
            canvas_size,
            box_size,
            edge_pad: layout.edge_pad,
            text_pad: layout.text_pad,
            num_top,
            num_bottom,
            num_hor_lines,
            num_vert_lines,
            minor_tick: config.minor_tick,
            hspace: box_size / (2 * num_vert_lines + 2) as f32,
            vspace: box_size / num_hor_lines as f32,
        })
    }

    /// Dashed vertical gridlines drawn inside the box.
    pub fn vert_line_count(&self) -> u32 {
        2 * self.num_vert_lines + 1
    }

    /// Column of the zero-quantity axis.
    pub fn center_column(&self) -> u32 {
        self.num_vert_lines + 1
    }

    pub fn last_column(&self) -> u32 {
        2 * self.num_vert_lines + 2
    }

    /// Row of the market-price axis.
    pub fn axis_row(&self) -> u32 {
        self.num_top + 1
    }

    pub fn tick_spacing(&self) -> f32 {
        self.vspace / self.minor_tick as f32
    }

    pub fn last_tick_row(&self) -> u32 {
        self.num_hor_lines * self.minor_tick
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        let far_edge = self.edge_pad + self.box_size;
        x >= 0.0 && y >= 0.0 && x <= far_edge && y <= far_edge
    }

    /// Nearest intersection: columns at gridline spacing, rows at tick spacing.
    pub fn snap(&self, x: f32, y: f32) -> GridPoint {
        let column = (x / self.hspace).round().max(0.0) as u32;
        let tick_row = ((y - self.edge_pad) / self.tick_spacing()).round().max(0.0) as u32;
        GridPoint {
            column: column.min(self.last_column()),
            tick_row: tick_row.min(self.last_tick_row()),
        }
    }

    pub fn marker_position(&self, point: GridPoint) -> Point {
        Point::new(
            self.edge_pad + point.column as f32 * self.hspace,
            self.edge_pad + point.tick_row as f32 * self.tick_spacing(),
        )
    }

    /// Signed share count of a column: negative sells, positive buys.
    pub fn quantity_at(&self, column: u32) -> i64 {
        i64::from(column) - i64::from(self.center_column())
    }

    pub fn half_of(&self, point: GridPoint) -> Option<GridHalf> {
        match point.column.cmp(&self.center_column()) {
            std::cmp::Ordering::Less => Some(GridHalf::Sell),
            std::cmp::Ordering::Greater => Some(GridHalf::Buy),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn box_rect(&self) -> Rect {
        Rect::new(self.edge_pad, self.edge_pad, self.box_size, self.box_size)
    }

    pub fn half_rect(&self, half: GridHalf) -> Rect {
        let half_width = self.box_size / 2.0;
        let x = match half {
            GridHalf::Sell => self.edge_pad,
            GridHalf::Buy => self.edge_pad + half_width,
        };
        Rect::new(x, self.edge_pad, half_width, self.box_size)
    }
}

/// Price at a tick row, unclamped.
pub fn tick_price(config: &GridConfig, market_price: f64, tick_row: u32) -> f64 {
    market_price + config.price_extreme - f64::from(tick_row) * config.price_per_tick()
}

/// Price printed next to a gridline row, clamped at zero.
pub fn line_price(config: &GridConfig, market_price: f64, row: u32) -> f64 {
    (market_price + config.price_extreme - f64::from(row) * config.price_per_line()).max(0.0)
}

#[cfg(test)]
#[path = "tests/geometry_tests.rs"]
mod tests;
