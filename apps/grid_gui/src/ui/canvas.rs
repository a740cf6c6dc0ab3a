//! Replays the grid's display list onto an egui painter.

use egui::{
    emath::Rot2, epaint::TextShape, Color32, FontId, Painter, Pos2, Shape, Stroke, StrokeKind,
    Vec2,
};
use order_grid::{
    surface::{LineStyle, Point, Rect, Rgb, TextAlign, TextStyle},
    DisplayList, DrawCommand,
};

const DASH_LENGTH: f32 = 2.0;
const DASH_GAP: f32 = 2.0;
/// Share of the font size that sits above the baseline.
const ASCENT: f32 = 0.8;

fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

fn stroke(style: LineStyle) -> Stroke {
    Stroke::new(style.width, color(style.color))
}

fn pos(origin: Pos2, point: Point) -> Pos2 {
    origin + Vec2::new(point.x, point.y)
}

fn rect(origin: Pos2, rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        pos(origin, Point::new(rect.x, rect.y)),
        Vec2::new(rect.width, rect.height),
    )
}

pub fn paint_display_list(painter: &Painter, origin: Pos2, list: &DisplayList) {
    for command in list.commands() {
        match command {
            DrawCommand::FillRect { rect: r, color: c } => {
                painter.rect_filled(rect(origin, *r), 0.0, color(*c));
            }
            DrawCommand::StrokeRect { rect: r, style } => {
                painter.rect_stroke(rect(origin, *r), 0.0, stroke(*style), StrokeKind::Middle);
            }
            DrawCommand::Line { from, to, style } => {
                let points = [pos(origin, *from), pos(origin, *to)];
                if style.dashed {
                    painter.extend(Shape::dashed_line(
                        &points,
                        stroke(*style),
                        DASH_LENGTH,
                        DASH_GAP,
                    ));
                } else {
                    painter.line_segment(points, stroke(*style));
                }
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke: outline,
            } => {
                painter.circle(pos(origin, *center), *radius, color(*fill), stroke(*outline));
            }
            DrawCommand::Text { text, at, style } => paint_text(painter, origin, text, *at, *style),
        }
    }
}

fn paint_text(painter: &Painter, origin: Pos2, text: &str, at: Point, style: TextStyle) {
    // Points to pixels.
    let font_px = style.size_pt * 4.0 / 3.0;
    let galley = painter.layout_no_wrap(
        text.to_string(),
        FontId::proportional(font_px),
        Color32::BLACK,
    );

    let dx = match style.align {
        TextAlign::Left => 0.0,
        TextAlign::Center => -galley.size().x / 2.0,
    };
    let offset = Rot2::from_angle(style.rotation) * Vec2::new(dx, -font_px * ASCENT);
    let top_left = pos(origin, at) + offset;

    painter.add(TextShape::new(top_left, galley, Color32::BLACK).with_angle(style.rotation));
}
