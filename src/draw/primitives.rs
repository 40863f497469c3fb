use crate::draw::geometry::midpoint;
use crate::draw::model::{Color, Point, Stroke};
use crate::draw::surface::DrawSurface;

/// Issues the surface calls for one stroke.
///
/// Multi-point strokes become quadratic segments through successive
/// midpoints, each stroked with `brush_size * pressure` of its trailing
/// point. Points below `min_force` are skipped as curve targets. A single
/// point becomes a filled dot of radius `brush_size * pressure / 2`.
pub fn draw_stroke<S: DrawSurface + ?Sized>(surface: &mut S, stroke: &Stroke, min_force: f32) {
    match stroke.points.as_slice() {
        [] => {}
        [dot] => {
            if dot.pressure >= min_force {
                surface.set_fill_color(stroke.color);
                surface.fill_circle(dot.x, dot.y, stroke.brush_size * dot.pressure / 2.0);
            }
        }
        [first, ..] => {
            surface.set_stroke_style(stroke.color, stroke.brush_size);
            surface.begin_path();
            surface.move_to(first.x, first.y);
            for pair in stroke.points.windows(2) {
                let (control, target) = (pair[0], pair[1]);
                if target.pressure < min_force {
                    continue;
                }
                let mid = midpoint(control, target);
                surface.quadratic_curve_to(control.x, control.y, mid.x, mid.y);
                surface.set_stroke_style(stroke.color, stroke.brush_size * target.pressure);
                surface.stroke();
                surface.begin_path();
                surface.move_to(mid.x, mid.y);
            }
        }
    }
}

/// Straight segment used by the live preview.
pub fn draw_line<S: DrawSurface + ?Sized>(
    surface: &mut S,
    from: Point,
    to: Point,
    color: Color,
    width: f32,
) {
    surface.begin_path();
    surface.move_to(from.x, from.y);
    surface.line_to(to.x, to.y);
    surface.set_stroke_style(color, width);
    surface.stroke();
}

#[cfg(test)]
mod tests {
    use super::{draw_line, draw_stroke};
    use crate::draw::model::{Color, Point, Stroke};
    use crate::draw::surface::{RecordingSurface, SurfaceCommand};

    fn stroke(points: Vec<Point>) -> Stroke {
        Stroke {
            color: Color::rgb(10, 20, 30),
            brush_size: 10.0,
            points,
        }
    }

    #[test]
    fn empty_stroke_draws_nothing() {
        let mut surface = RecordingSurface::new(10, 10);
        draw_stroke(&mut surface, &stroke(Vec::new()), 0.0);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn single_point_becomes_pressure_scaled_dot() {
        let mut surface = RecordingSurface::new(10, 10);
        draw_stroke(&mut surface, &stroke(vec![Point::new(3.0, 4.0, 0.6)]), 0.0);
        assert_eq!(
            surface.commands(),
            &[
                SurfaceCommand::FillColor(Color::rgb(10, 20, 30)),
                SurfaceCommand::FillCircle {
                    x: 3.0,
                    y: 4.0,
                    radius: 3.0
                },
            ]
        );
    }

    #[test]
    fn single_point_below_min_force_is_not_drawn() {
        let mut surface = RecordingSurface::new(10, 10);
        draw_stroke(&mut surface, &stroke(vec![Point::new(3.0, 4.0, 0.1)]), 0.2);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn segments_curve_through_midpoints_with_trailing_pressure_width() {
        let mut surface = RecordingSurface::new(10, 10);
        let points = vec![
            Point::new(0.0, 0.0, 1.0),
            Point::new(4.0, 0.0, 0.5),
            Point::new(4.0, 4.0, 0.25),
        ];
        draw_stroke(&mut surface, &stroke(points), 0.0);

        let color = Color::rgb(10, 20, 30);
        assert_eq!(
            surface.commands(),
            &[
                SurfaceCommand::StrokeStyle { color, width: 10.0 },
                SurfaceCommand::BeginPath,
                SurfaceCommand::MoveTo { x: 0.0, y: 0.0 },
                SurfaceCommand::QuadraticCurveTo {
                    cx: 0.0,
                    cy: 0.0,
                    x: 2.0,
                    y: 0.0
                },
                SurfaceCommand::StrokeStyle { color, width: 5.0 },
                SurfaceCommand::Stroke,
                SurfaceCommand::BeginPath,
                SurfaceCommand::MoveTo { x: 2.0, y: 0.0 },
                SurfaceCommand::QuadraticCurveTo {
                    cx: 4.0,
                    cy: 0.0,
                    x: 4.0,
                    y: 2.0
                },
                SurfaceCommand::StrokeStyle { color, width: 2.5 },
                SurfaceCommand::Stroke,
                SurfaceCommand::BeginPath,
                SurfaceCommand::MoveTo { x: 4.0, y: 2.0 },
            ]
        );
    }

    #[test]
    fn low_pressure_points_are_skipped_but_drawing_continues() {
        let mut surface = RecordingSurface::new(10, 10);
        let points = vec![
            Point::new(0.0, 0.0, 1.0),
            Point::new(1.0, 0.0, 0.05),
            Point::new(2.0, 0.0, 1.0),
            Point::new(3.0, 0.0, 1.0),
        ];
        draw_stroke(&mut surface, &stroke(points), 0.1);
        assert_eq!(surface.stroke_calls(), 2);
    }

    #[test]
    fn line_is_a_single_stroked_segment() {
        let mut surface = RecordingSurface::new(10, 10);
        draw_line(
            &mut surface,
            Point::new(1.0, 1.0, 1.0),
            Point::new(2.0, 3.0, 1.0),
            Color::BLACK,
            1.5,
        );
        assert_eq!(
            surface.commands(),
            &[
                SurfaceCommand::BeginPath,
                SurfaceCommand::MoveTo { x: 1.0, y: 1.0 },
                SurfaceCommand::LineTo { x: 2.0, y: 3.0 },
                SurfaceCommand::StrokeStyle {
                    color: Color::BLACK,
                    width: 1.5
                },
                SurfaceCommand::Stroke,
            ]
        );
    }
}
