//! Drawing surface the grid renders into.
//!
//! [`DisplayList`] records draw calls the way a canvas keeps its pixels: a new
//! frame wipes it, later calls paint over earlier ones. Front-ends replay it
//! onto their own painter.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineStyle {
    pub width: f32,
    pub color: Rgb,
    pub dashed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    Left,
    Center,
}

/// Text is anchored at its baseline, like canvas `fillText`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub size_pt: f32,
    pub align: TextAlign,
    /// Clockwise rotation in radians around the anchor.
    pub rotation: f32,
}

pub trait GridSurface {
    /// Measured size of the element hosting the canvas, `(width, height)`.
    fn container_size(&self) -> (f32, f32);

    /// Resize the square canvas, discarding everything painted so far.
    fn begin_frame(&mut self, size: f32);

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn stroke_rect(&mut self, rect: Rect, style: LineStyle);

    fn line(&mut self, from: Point, to: Point, style: LineStyle);

    fn circle(&mut self, center: Point, radius: f32, fill: Rgb, stroke: LineStyle);

    fn text(&mut self, text: &str, at: Point, style: TextStyle);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Rgb,
    },
    StrokeRect {
        rect: Rect,
        style: LineStyle,
    },
    Line {
        from: Point,
        to: Point,
        style: LineStyle,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Rgb,
        stroke: LineStyle,
    },
    Text {
        text: String,
        at: Point,
        style: TextStyle,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    container: (f32, f32),
    canvas_size: f32,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            container: (width, height),
            canvas_size: 0.0,
            commands: Vec::new(),
        }
    }

    /// Records a new container size. Returns whether it changed.
    pub fn set_container_size(&mut self, width: f32, height: f32) -> bool {
        let changed = self.container != (width, height);
        self.container = (width, height);
        changed
    }

    pub fn canvas_size(&self) -> f32 {
        self.canvas_size
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = Point> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Circle { center, .. } => Some(*center),
            _ => None,
        })
    }
}

impl GridSurface for DisplayList {
    fn container_size(&self) -> (f32, f32) {
        self.container
    }

    fn begin_frame(&mut self, size: f32) {
        self.canvas_size = size;
        self.commands.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, style: LineStyle) {
        self.commands.push(DrawCommand::StrokeRect { rect, style });
    }

    fn line(&mut self, from: Point, to: Point, style: LineStyle) {
        self.commands.push(DrawCommand::Line { from, to, style });
    }

    fn circle(&mut self, center: Point, radius: f32, fill: Rgb, stroke: LineStyle) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill,
            stroke,
        });
    }

    fn text(&mut self, text: &str, at: Point, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            style,
        });
    }
}
