use crate::draw::model::Color;
use crate::draw::surface::DrawSurface;
use egui::{epaint::QuadraticBezierShape, Color32, Pos2, Shape};

#[derive(Debug, Clone, Copy, PartialEq)]
enum PathElement {
    Line { from: (f32, f32), to: (f32, f32) },
    Quad { from: (f32, f32), control: (f32, f32), to: (f32, f32) },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Primitive {
    Rect { min: (f32, f32), size: (f32, f32), color: Color },
    Path { element: PathElement, width: f32, color: Color },
    Dot { center: (f32, f32), radius: f32, color: Color },
}

/// Retained surface painted through an [`egui::Painter`].
///
/// Calls are kept in surface pixel space and stretched onto the target rect
/// at paint time, so a low-resolution preview covers the same area as the
/// full-resolution layer.
#[derive(Debug, Clone)]
pub struct EguiSurface {
    size: (u32, u32),
    visible: bool,
    stroke_color: Color,
    stroke_width: f32,
    fill_color: Color,
    pen: Option<(f32, f32)>,
    path: Vec<PathElement>,
    primitives: Vec<Primitive>,
}

impl EguiSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            visible: true,
            stroke_color: Color::BLACK,
            stroke_width: 1.0,
            fill_color: Color::BLACK,
            pen: None,
            path: Vec::new(),
            primitives: Vec::new(),
        }
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Shapes mapped onto `rect`; empty while hidden.
    pub fn shapes(&self, rect: egui::Rect) -> Vec<Shape> {
        if !self.visible || self.size.0 == 0 || self.size.1 == 0 {
            return Vec::new();
        }
        let sx = rect.width() / self.size.0 as f32;
        let sy = rect.height() / self.size.1 as f32;
        let map = |(x, y): (f32, f32)| Pos2::new(rect.min.x + x * sx, rect.min.y + y * sy);

        self.primitives
            .iter()
            .map(|primitive| match *primitive {
                Primitive::Rect { min, size, color } => Shape::rect_filled(
                    egui::Rect::from_min_max(map(min), map((min.0 + size.0, min.1 + size.1))),
                    0.0,
                    color32(color),
                ),
                Primitive::Path {
                    element,
                    width,
                    color,
                } => {
                    let stroke = egui::Stroke::new(width * sx, color32(color));
                    match element {
                        PathElement::Line { from, to } => {
                            Shape::line_segment([map(from), map(to)], stroke)
                        }
                        PathElement::Quad { from, control, to } => {
                            Shape::QuadraticBezier(QuadraticBezierShape::from_points_stroke(
                                [map(from), map(control), map(to)],
                                false,
                                Color32::TRANSPARENT,
                                stroke,
                            ))
                        }
                    }
                }
                Primitive::Dot {
                    center,
                    radius,
                    color,
                } => Shape::circle_filled(map(center), radius * sx, color32(color)),
            })
            .collect()
    }

    pub fn paint(&self, painter: &egui::Painter, rect: egui::Rect) {
        painter.extend(self.shapes(rect));
    }
}

fn color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

impl DrawSurface for EguiSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.primitives.clear();
        self.path.clear();
        self.pen = None;
    }

    fn clear(&mut self) {
        self.primitives.clear();
        self.path.clear();
        self.pen = None;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.primitives.push(Primitive::Rect {
            min: (x, y),
            size: (width, height),
            color,
        });
    }

    fn set_stroke_style(&mut self, color: Color, width: f32) {
        self.stroke_color = color;
        self.stroke_width = width;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.pen = None;
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.pen = Some((x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        if let Some(from) = self.pen {
            self.path.push(PathElement::Line { from, to: (x, y) });
        }
        self.pen = Some((x, y));
    }

    fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let from = self.pen.unwrap_or((cx, cy));
        self.path.push(PathElement::Quad {
            from,
            control: (cx, cy),
            to: (x, y),
        });
        self.pen = Some((x, y));
    }

    fn stroke(&mut self) {
        let (width, color) = (self.stroke_width, self.stroke_color);
        self.primitives
            .extend(self.path.iter().map(|&element| Primitive::Path {
                element,
                width,
                color,
            }));
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.primitives.push(Primitive::Dot {
            center: (x, y),
            radius,
            color: self.fill_color,
        });
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
