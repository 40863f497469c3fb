use crate::draw::history::StrokeHistory;
use crate::draw::input::{InputNormalizer, PointerEvent};
use crate::draw::model::Point;
use crate::draw::render::DualResolutionRenderer;
use crate::draw::settings::DrawSettings;
use crate::draw::surface::DrawSurface;

/// Runs each pointer event to completion: normalize, transition, render.
#[derive(Debug)]
pub struct DrawController<S: DrawSurface> {
    settings: DrawSettings,
    normalizer: InputNormalizer,
    history: StrokeHistory,
    renderer: DualResolutionRenderer<S>,
}

impl<S: DrawSurface> DrawController<S> {
    pub fn new(full: S, preview: S, mut settings: DrawSettings) -> Self {
        settings.sanitize();
        let history = StrokeHistory::new(settings.history_config());
        let mut renderer = DualResolutionRenderer::new(full, preview, settings.render_settings());
        renderer.render_committed(&history);
        Self {
            normalizer: settings.input_normalizer(),
            settings,
            history,
            renderer,
        }
    }

    pub fn settings(&self) -> &DrawSettings {
        &self.settings
    }

    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    pub fn renderer(&self) -> &DualResolutionRenderer<S> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut DualResolutionRenderer<S> {
        &mut self.renderer
    }

    pub fn normalizer_mut(&mut self) -> &mut InputNormalizer {
        &mut self.normalizer
    }

    /// Returns `true` when the event changed the history.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down(sample) => match self.normalizer.normalize(&sample) {
                Some(point) => self.start_stroke(point),
                None => false,
            },
            PointerEvent::Move(sample) => match self.normalizer.normalize(&sample) {
                Some(point) => self.append_point(point),
                None => false,
            },
            PointerEvent::Up | PointerEvent::Leave => self.end_stroke(),
        }
    }

    /// Opens a stroke with the configured brush color and size.
    pub fn start_stroke(&mut self, point: Point) -> bool {
        self.history
            .start_stroke(point, self.settings.brush_color, self.settings.brush_size)
    }

    pub fn append_point(&mut self, point: Point) -> bool {
        let Some(open) = self.history.open_stroke() else {
            return false;
        };
        let (color, brush_size) = (open.color, open.brush_size);
        let previous = open.last_point();

        if !self.history.append_point(point) {
            return false;
        }

        if self.history.is_drawing() {
            if let Some(previous) = previous {
                self.renderer
                    .render_incremental(previous, point, color, brush_size);
            }
        } else {
            self.renderer.finish_live_preview(&self.history);
        }
        true
    }

    pub fn end_stroke(&mut self) -> bool {
        if !self.history.end_stroke() {
            return false;
        }
        self.renderer.finish_live_preview(&self.history);
        true
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo();
        self.renderer.sync(&self.history);
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo();
        self.renderer.sync(&self.history);
        changed
    }

    pub fn clear(&mut self) -> bool {
        let changed = self.history.clear();
        self.renderer.sync(&self.history);
        changed
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height, &self.history);
    }

    /// Applies new settings; stored strokes keep the color and size they were drawn with.
    pub fn apply_settings(&mut self, mut settings: DrawSettings) {
        settings.sanitize();
        if settings == self.settings {
            return;
        }
        self.history.set_config(settings.history_config());
        self.renderer.set_settings(settings.render_settings());
        self.normalizer
            .set_palm_rejection_sensitivity(settings.palm_rejection_sensitivity);
        self.settings = settings;
        self.renderer.sync(&self.history);
        tracing::debug!(settings = ?self.settings, "draw settings applied");
    }
}

#[cfg(test)]
mod tests {
    use super::DrawController;
    use crate::draw::input::{PointerEvent, RawPointerSample};
    use crate::draw::model::Color;
    use crate::draw::render::VisibleLayer;
    use crate::draw::settings::DrawSettings;
    use crate::draw::surface::{DrawSurface, RecordingSurface};

    fn controller() -> DrawController<RecordingSurface> {
        DrawController::new(
            RecordingSurface::new(100, 100),
            RecordingSurface::new(50, 50),
            DrawSettings::default(),
        )
    }

    #[test]
    fn live_segments_go_to_preview_until_pointer_up() {
        let mut controller = controller();
        controller.handle_pointer_event(PointerEvent::Down(RawPointerSample::mouse(10.0, 10.0)));
        controller.handle_pointer_event(PointerEvent::Move(RawPointerSample::mouse(20.0, 10.0)));

        assert_eq!(controller.renderer().visible_layer(), VisibleLayer::Preview);
        assert_eq!(controller.renderer().stats().incremental_segments, 1);
        let commits = controller.renderer().stats().commit_renders;

        assert!(controller.handle_pointer_event(PointerEvent::Up));
        assert_eq!(controller.renderer().visible_layer(), VisibleLayer::Full);
        assert_eq!(controller.renderer().stats().commit_renders, commits + 1);
        assert!(controller.renderer().full().is_visible());
    }

    #[test]
    fn pointer_leave_closes_stroke_like_pointer_up() {
        let mut controller = controller();
        controller.handle_pointer_event(PointerEvent::Down(RawPointerSample::mouse(1.0, 1.0)));
        assert!(controller.history().is_drawing());
        assert!(controller.handle_pointer_event(PointerEvent::Leave));
        assert!(!controller.history().is_drawing());
        assert!(!controller.handle_pointer_event(PointerEvent::Up));
    }

    #[test]
    fn strokes_use_configured_brush() {
        let mut controller = DrawController::new(
            RecordingSurface::new(10, 10),
            RecordingSurface::new(5, 5),
            DrawSettings {
                brush_color: Color::rgb(1, 2, 3),
                brush_size: 9.0,
                ..DrawSettings::default()
            },
        );
        controller.handle_pointer_event(PointerEvent::Down(RawPointerSample::pen(2.0, 2.0, 0.7)));
        let stroke = controller.history().open_stroke().expect("open stroke");
        assert_eq!(stroke.color, Color::rgb(1, 2, 3));
        assert_eq!(stroke.brush_size, 9.0);
        assert_eq!(stroke.points[0].pressure, 0.7);
    }

    #[test]
    fn apply_settings_rerenders_with_new_scale() {
        let mut controller = controller();
        let commits = controller.renderer().stats().commit_renders;
        controller.apply_settings(DrawSettings {
            render_scale: 0.25,
            ..DrawSettings::default()
        });
        assert_eq!(controller.renderer().preview().size(), (25, 25));
        assert_eq!(controller.renderer().stats().commit_renders, commits + 1);
    }
}
