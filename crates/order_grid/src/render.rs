use std::f32::consts::FRAC_PI_2;

use crate::{
    config::GridConfig,
    geometry::{line_price, GridGeometry, GridHalf},
    order::format_price,
    surface::{GridSurface, LineStyle, Point, Rgb, TextAlign, TextStyle},
};

const DISABLED_SHADE: Rgb = Rgb(215, 215, 215);
const BORDER: LineStyle = LineStyle {
    width: 1.0,
    color: Rgb(90, 90, 90),
    dashed: false,
};
const GRIDLINE: LineStyle = LineStyle {
    width: 1.0,
    color: Rgb(200, 200, 200),
    dashed: true,
};
const AXIS: LineStyle = LineStyle {
    width: 3.0,
    color: Rgb(75, 75, 75),
    dashed: false,
};
const MARKER_FILL: Rgb = Rgb(255, 0, 0);
const MARKER_STROKE: LineStyle = LineStyle {
    width: 3.0,
    color: Rgb(200, 50, 50),
    dashed: false,
};

const CAPTION: TextStyle = TextStyle {
    size_pt: 15.0,
    align: TextAlign::Center,
    rotation: 0.0,
};
const TICK_LABEL: TextStyle = TextStyle {
    size_pt: 10.0,
    align: TextAlign::Left,
    rotation: 0.0,
};
const QUANTITY_LABEL: TextStyle = TextStyle {
    size_pt: 10.0,
    align: TextAlign::Center,
    rotation: 0.0,
};

/// Paints the whole grid, back to front, on a freshly sized canvas.
pub fn paint_grid<S: GridSurface + ?Sized>(
    surface: &mut S,
    geometry: &GridGeometry,
    config: &GridConfig,
    market_price: f64,
    dark_left: bool,
    dark_right: bool,
) {
    surface.begin_frame(geometry.canvas_size);

    if dark_left {
        surface.fill_rect(geometry.half_rect(GridHalf::Sell), DISABLED_SHADE);
    }
    if dark_right {
        surface.fill_rect(geometry.half_rect(GridHalf::Buy), DISABLED_SHADE);
    }

    surface.stroke_rect(geometry.box_rect(), BORDER);

    let edge = geometry.edge_pad;
    let far = edge + geometry.box_size;

    for i in 1..=geometry.vert_line_count() {
        let x = edge + geometry.hspace * i as f32;
        surface.line(Point::new(x, edge), Point::new(x, far), GRIDLINE);
    }
    for i in 1..=geometry.num_hor_lines {
        let y = edge + geometry.vspace * i as f32;
        surface.line(Point::new(edge, y), Point::new(far, y), GRIDLINE);
    }

    let price_axis = edge + geometry.vspace * geometry.axis_row() as f32;
    surface.line(Point::new(edge, price_axis), Point::new(far, price_axis), AXIS);
    let quantity_axis = edge + geometry.hspace * geometry.center_column() as f32;
    surface.line(
        Point::new(quantity_axis, edge),
        Point::new(quantity_axis, far),
        AXIS,
    );

    surface.text(
        "Price",
        Point::new(far + geometry.text_pad, edge + geometry.box_size / 2.0),
        TextStyle {
            rotation: -FRAC_PI_2,
            ..CAPTION
        },
    );

    for row in 0..=geometry.num_hor_lines {
        let price = line_price(config, market_price, row);
        surface.text(
            &format_price(price),
            Point::new(far + 5.0, edge + 5.0 + row as f32 * geometry.vspace),
            TICK_LABEL,
        );
    }

    let caption_y = far + 45.0;
    surface.text(
        "Sell",
        Point::new(edge + geometry.box_size / 4.0, caption_y),
        CAPTION,
    );
    surface.text(
        "Buy",
        Point::new(edge + 3.0 * geometry.box_size / 4.0, caption_y),
        CAPTION,
    );

    for column in 0..=geometry.last_column() {
        let quantity = geometry.quantity_at(column).unsigned_abs();
        surface.text(
            &quantity.to_string(),
            Point::new(edge + column as f32 * geometry.hspace, far + 15.0),
            QUANTITY_LABEL,
        );
    }
}

pub fn paint_marker<S: GridSurface + ?Sized>(surface: &mut S, center: Point, radius: f32) {
    surface.circle(center, radius, MARKER_FILL, MARKER_STROKE);
}
