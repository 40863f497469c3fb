use crate::draw::history::{StrokeHistory, DEFAULT_MIN_FORCE};
use crate::draw::model::{Color, Point};
use crate::draw::primitives::{draw_line, draw_stroke};
use crate::draw::surface::DrawSurface;

pub const DEFAULT_RENDER_SCALE: f32 = 0.5;
pub(crate) const MIN_RENDER_SCALE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Preview resolution relative to the full surface, in `(0, 1]`.
    pub scale_factor: f32,
    pub background: Color,
    pub min_force: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_RENDER_SCALE,
            background: Color::WHITE,
            min_force: DEFAULT_MIN_FORCE,
        }
    }
}

impl RenderSettings {
    fn scale(&self) -> f32 {
        self.scale_factor.clamp(MIN_RENDER_SCALE, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleLayer {
    Full,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub commit_renders: u64,
    pub incremental_segments: u64,
    pub strokes_in_last_commit: usize,
    pub points_in_last_commit: usize,
}

pub fn scaled_size(size: (u32, u32), scale_factor: f32) -> (u32, u32) {
    let scale = |v: u32| {
        if v == 0 {
            0
        } else {
            ((v as f32 * scale_factor).round() as u32).max(1)
        }
    };
    (scale(size.0), scale(size.1))
}

/// Two render targets: a full-resolution surface for committed strokes and a
/// scaled-down preview that receives cheap line segments while a stroke is
/// being drawn. At most one of them is visible.
#[derive(Debug)]
pub struct DualResolutionRenderer<S: DrawSurface> {
    full: S,
    preview: S,
    settings: RenderSettings,
    visible: VisibleLayer,
    last_committed_revision: Option<u64>,
    stats: RenderStats,
}

impl<S: DrawSurface> DualResolutionRenderer<S> {
    /// Takes the full surface at its current size and fits `preview` to it.
    pub fn new(mut full: S, mut preview: S, settings: RenderSettings) -> Self {
        let (width, height) = scaled_size(full.size(), settings.scale());
        if preview.size() != (width, height) {
            preview.resize(width, height);
        }
        full.set_visible(true);
        preview.set_visible(false);
        Self {
            full,
            preview,
            settings,
            visible: VisibleLayer::Full,
            last_committed_revision: None,
            stats: RenderStats::default(),
        }
    }

    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    /// Takes effect on the next commit render.
    pub fn set_settings(&mut self, settings: RenderSettings) {
        if self.settings == settings {
            return;
        }
        let rescaled = self.settings.scale() != settings.scale();
        self.settings = settings;
        if rescaled {
            let (width, height) = scaled_size(self.full.size(), self.settings.scale());
            self.preview.resize(width, height);
        }
        self.last_committed_revision = None;
    }

    pub fn visible_layer(&self) -> VisibleLayer {
        self.visible
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn full(&self) -> &S {
        &self.full
    }

    pub fn preview(&self) -> &S {
        &self.preview
    }

    pub fn full_mut(&mut self) -> &mut S {
        &mut self.full
    }

    pub fn preview_mut(&mut self) -> &mut S {
        &mut self.preview
    }

    pub fn into_surfaces(self) -> (S, S) {
        (self.full, self.preview)
    }

    /// Resizes both targets and redraws everything visible.
    pub fn resize(&mut self, width: u32, height: u32, history: &StrokeHistory) {
        self.full.resize(width, height);
        let (preview_width, preview_height) = scaled_size((width, height), self.settings.scale());
        self.preview.resize(preview_width, preview_height);
        self.render_committed(history);
    }

    /// Commit-renders when the visible window changed since the last commit.
    /// Never redraws while a stroke is open.
    pub fn sync(&mut self, history: &StrokeHistory) -> bool {
        if history.is_drawing() || self.last_committed_revision == Some(history.revision()) {
            return false;
        }
        self.render_committed(history);
        true
    }

    /// Full redraw of every visible stroke onto both targets.
    pub fn render_committed(&mut self, history: &StrokeHistory) {
        let scale = self.settings.scale();
        let min_force = self.settings.min_force;
        let background = self.settings.background;

        paint_background(&mut self.full, background);
        paint_background(&mut self.preview, background);

        let mut strokes = 0usize;
        let mut points = 0usize;
        for stroke in history.visible_strokes() {
            draw_stroke(&mut self.full, stroke, min_force);
            draw_stroke(&mut self.preview, &stroke.scaled(scale), min_force);
            strokes += 1;
            points += stroke.points.len();
        }

        self.show(VisibleLayer::Full);
        self.last_committed_revision = Some(history.revision());
        self.stats.commit_renders += 1;
        self.stats.strokes_in_last_commit = strokes;
        self.stats.points_in_last_commit = points;
        tracing::debug!(strokes, points, revision = history.revision(), "commit render");
    }

    /// Draws one live segment onto the preview and brings the preview forward.
    /// Coordinates are in full-resolution space.
    pub fn render_incremental(&mut self, from: Point, to: Point, color: Color, brush_size: f32) {
        let scale = self.settings.scale();
        draw_line(
            &mut self.preview,
            from.scaled(scale),
            to.scaled(scale),
            color,
            brush_size * scale * to.pressure,
        );
        self.show(VisibleLayer::Preview);
        self.stats.incremental_segments += 1;
    }

    /// Swaps the full surface back in and redraws it.
    pub fn finish_live_preview(&mut self, history: &StrokeHistory) {
        self.render_committed(history);
    }

    fn show(&mut self, layer: VisibleLayer) {
        if self.visible == layer {
            return;
        }
        self.full.set_visible(layer == VisibleLayer::Full);
        self.preview.set_visible(layer == VisibleLayer::Preview);
        self.visible = layer;
    }
}

fn paint_background<S: DrawSurface>(surface: &mut S, background: Color) {
    let (width, height) = surface.size();
    surface.clear();
    surface.fill_rect(0.0, 0.0, width as f32, height as f32, background);
}
