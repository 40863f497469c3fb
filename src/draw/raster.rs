use crate::draw::model::Color;
use crate::draw::surface::DrawSurface;

const MAX_CURVE_SUBDIVISIONS: usize = 32;
const CURVE_FLATNESS_PX: f32 = 2.0;
const MIN_STROKE_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DirtyRect {
    pub fn from_points(a: (f32, f32), b: (f32, f32), pad: f32) -> Self {
        let min_x = (a.0.min(b.0) - pad).floor() as i32;
        let max_x = (a.0.max(b.0) + pad).ceil() as i32;
        let min_y = (a.1.min(b.1) - pad).floor() as i32;
        let max_y = (a.1.max(b.1) + pad).ceil() as i32;
        Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x + 1).max(1),
            height: (max_y - min_y + 1).max(1),
        }
    }

    pub fn union(self, other: DirtyRect) -> DirtyRect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        DirtyRect {
            x: min_x,
            y: min_y,
            width: (max_x - min_x).max(1),
            height: (max_y - min_y).max(1),
        }
    }

    pub fn clamp(self, width: u32, height: u32) -> Option<DirtyRect> {
        let max_w = width as i32;
        let max_h = height as i32;
        let x0 = self.x.clamp(0, max_w);
        let y0 = self.y.clamp(0, max_h);
        let x1 = (self.x + self.width).clamp(0, max_w);
        let y1 = (self.y + self.height).clamp(0, max_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(DirtyRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// RGBA8 software surface.
///
/// Segments are rasterized as round-capped capsules, quadratic curves are
/// flattened into segments first. Writes replace pixels; there is no blending.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    rgba: Vec<u8>,
    size: (u32, u32),
    visible: bool,
    stroke_color: Color,
    stroke_width: f32,
    fill_color: Color,
    subpaths: Vec<Vec<(f32, f32)>>,
    dirty: Option<DirtyRect>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            rgba: vec![0; buffer_len(width, height)],
            size: (width, height),
            visible: true,
            stroke_color: Color::BLACK,
            stroke_width: 1.0,
            fill_color: Color::BLACK,
            subpaths: Vec::new(),
            dirty: None,
        }
    }

    pub fn rgba_pixels(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.size.0 || y >= self.size.1 {
            return None;
        }
        let idx = ((y * self.size.0 + x) * 4) as usize;
        let px = self.rgba.get(idx..idx + 4)?;
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Count of pixels that differ from `background`.
    pub fn count_pixels_not(&self, background: Color) -> usize {
        let bg = background.to_rgba_array();
        self.rgba
            .chunks_exact(4)
            .filter(|px| *px != bg.as_slice())
            .count()
    }

    /// Region touched since the last call.
    pub fn take_dirty(&mut self) -> Option<DirtyRect> {
        self.dirty.take()
    }

    fn mark_dirty(&mut self, rect: DirtyRect) {
        let Some(rect) = rect.clamp(self.size.0, self.size.1) else {
            return;
        };
        self.dirty = Some(self.dirty.map_or(rect, |dirty| dirty.union(rect)));
    }

    fn current_point(&self) -> Option<(f32, f32)> {
        self.subpaths.last().and_then(|subpath| subpath.last().copied())
    }

    fn draw_capsule(&mut self, start: (f32, f32), end: (f32, f32), radius: f32, color: Color) {
        let bounds = DirtyRect::from_points(start, end, radius + 1.0);
        let Some(clip) = bounds.clamp(self.size.0, self.size.1) else {
            return;
        };
        let radius_sq = radius * radius;
        for y in clip.y..(clip.y + clip.height) {
            for x in clip.x..(clip.x + clip.width) {
                let center = (x as f32 + 0.5, y as f32 + 0.5);
                if point_segment_distance_sq(center, start, end) <= radius_sq {
                    self.set_pixel(x, y, color);
                }
            }
        }
        self.mark_dirty(clip);
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let (width, height) = self.size;
        if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
            return;
        }
        let idx = ((y as u32 * width + x as u32) * 4) as usize;
        if let Some(px) = self.rgba.get_mut(idx..idx + 4) {
            px.copy_from_slice(&color.to_rgba_array());
        }
    }
}

impl DrawSurface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.size == (width, height) {
            return;
        }
        self.size = (width, height);
        self.rgba = vec![0; buffer_len(width, height)];
        self.subpaths.clear();
        self.dirty = None;
    }

    fn clear(&mut self) {
        self.rgba.fill(0);
        self.subpaths.clear();
        self.mark_dirty(DirtyRect {
            x: 0,
            y: 0,
            width: self.size.0 as i32,
            height: self.size.1 as i32,
        });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let rect = DirtyRect {
            x: x.floor() as i32,
            y: y.floor() as i32,
            width: width.ceil() as i32,
            height: height.ceil() as i32,
        };
        let Some(rect) = rect.clamp(self.size.0, self.size.1) else {
            return;
        };
        for py in rect.y..(rect.y + rect.height) {
            for px in rect.x..(rect.x + rect.width) {
                self.set_pixel(px, py, color);
            }
        }
        self.mark_dirty(rect);
    }

    fn set_stroke_style(&mut self, color: Color, width: f32) {
        self.stroke_color = color;
        self.stroke_width = width;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.subpaths.push(vec![(x, y)]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push((x, y)),
            None => self.subpaths.push(vec![(x, y)]),
        }
    }

    fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let Some(start) = self.current_point() else {
            self.subpaths.push(vec![(cx, cy), (x, y)]);
            return;
        };
        let steps = curve_subdivisions(start, (cx, cy), (x, y));
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            let u = 1.0 - t;
            let px = u * u * start.0 + 2.0 * u * t * cx + t * t * x;
            let py = u * u * start.1 + 2.0 * u * t * cy + t * t * y;
            self.line_to(px, py);
        }
    }

    fn stroke(&mut self) {
        let radius = (self.stroke_width / 2.0).max(MIN_STROKE_RADIUS);
        let color = self.stroke_color;
        let subpaths = std::mem::take(&mut self.subpaths);
        for subpath in &subpaths {
            for segment in subpath.windows(2) {
                self.draw_capsule(segment[0], segment[1], radius, color);
            }
        }
        self.subpaths = subpaths;
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        let color = self.fill_color;
        self.draw_capsule((x, y), (x, y), radius.max(MIN_STROKE_RADIUS), color);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

fn buffer_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

fn curve_subdivisions(start: (f32, f32), control: (f32, f32), end: (f32, f32)) -> usize {
    let hull = distance(start, control) + distance(control, end);
    ((hull / CURVE_FLATNESS_PX).ceil() as usize).clamp(1, MAX_CURVE_SUBDIVISIONS)
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

fn point_segment_distance_sq(point: (f32, f32), start: (f32, f32), end: (f32, f32)) -> f32 {
    let (px, py) = point;
    let (x0, y0) = start;
    let vx = end.0 - x0;
    let vy = end.1 - y0;
    let wx = px - x0;
    let wy = py - y0;
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        return wx * wx + wy * wy;
    }
    let t = ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0);
    let dx = px - (x0 + vx * t);
    let dy = py - (y0 + vy * t);
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::{DirtyRect, PixelSurface};
    use crate::draw::model::Color;
    use crate::draw::surface::DrawSurface;

    #[test]
    fn new_surface_is_transparent() {
        let surface = PixelSurface::new(4, 3);
        assert_eq!(surface.rgba_pixels().len(), 4 * 3 * 4);
        assert_eq!(surface.count_pixels_not(Color::TRANSPARENT), 0);
    }

    #[test]
    fn fill_rect_is_clamped_to_bounds() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_rect(-2.0, -2.0, 4.0, 4.0, Color::WHITE);
        assert_eq!(surface.count_pixels_not(Color::TRANSPARENT), 4);
        assert_eq!(surface.pixel(1, 1), Some(Color::WHITE));
        assert_eq!(surface.pixel(2, 2), Some(Color::TRANSPARENT));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn stroked_line_covers_its_midpoint_and_reports_dirty_region() {
        let mut surface = PixelSurface::new(32, 32);
        surface.begin_path();
        surface.move_to(2.0, 16.0);
        surface.line_to(30.0, 16.0);
        surface.set_stroke_style(Color::rgb(200, 0, 0), 3.0);
        surface.stroke();

        assert_eq!(surface.pixel(16, 15), Some(Color::rgb(200, 0, 0)));
        assert_eq!(surface.pixel(16, 2), Some(Color::TRANSPARENT));
        let dirty = surface.take_dirty().expect("dirty");
        assert!(dirty.x <= 2 && dirty.x + dirty.width >= 30);
        assert_eq!(surface.take_dirty(), None);
    }

    #[test]
    fn quadratic_curve_passes_near_its_endpoint() {
        let mut surface = PixelSurface::new(32, 32);
        surface.begin_path();
        surface.move_to(4.0, 4.0);
        surface.quadratic_curve_to(28.0, 4.0, 28.0, 28.0);
        surface.set_stroke_style(Color::WHITE, 2.0);
        surface.stroke();

        assert_eq!(surface.pixel(27, 27), Some(Color::WHITE));
        assert_eq!(surface.pixel(4, 28), Some(Color::TRANSPARENT));
    }

    #[test]
    fn filled_circle_respects_radius() {
        let mut surface = PixelSurface::new(21, 21);
        surface.set_fill_color(Color::WHITE);
        surface.fill_circle(10.5, 10.5, 4.0);

        assert_eq!(surface.pixel(10, 10), Some(Color::WHITE));
        assert_eq!(surface.pixel(10, 7), Some(Color::WHITE));
        assert_eq!(surface.pixel(10, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn resize_reallocates_and_clear_wipes() {
        let mut surface = PixelSurface::new(2, 2);
        surface.fill_rect(0.0, 0.0, 2.0, 2.0, Color::WHITE);
        surface.resize(3, 1);
        assert_eq!(surface.size(), (3, 1));
        assert_eq!(surface.count_pixels_not(Color::TRANSPARENT), 0);

        surface.fill_rect(0.0, 0.0, 3.0, 1.0, Color::WHITE);
        surface.clear();
        assert_eq!(surface.count_pixels_not(Color::TRANSPARENT), 0);
    }

    #[test]
    fn dirty_rect_union_and_clamp() {
        let a = DirtyRect::from_points((0.0, 0.0), (2.0, 2.0), 0.0);
        let b = DirtyRect::from_points((8.0, 8.0), (9.0, 9.0), 0.0);
        let merged = a.union(b);
        assert_eq!((merged.x, merged.y), (0, 0));
        assert_eq!(merged.clamp(5, 5).map(|r| (r.width, r.height)), Some((5, 5)));
        assert_eq!(b.clamp(5, 5), None);
    }
}
