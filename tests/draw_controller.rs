use inkstroke::draw::input::{PointerEvent, RawPointerSample};
use inkstroke::draw::raster::PixelSurface;
use inkstroke::draw::{
    Color, DrawController, DrawSettings, DrawSurface, RecordingSurface, VisibleLayer,
};

fn settings() -> DrawSettings {
    DrawSettings {
        brush_color: Color::rgb(200, 0, 0),
        brush_size: 10.0,
        ..DrawSettings::default()
    }
}

fn pixel_controller() -> DrawController<PixelSurface> {
    DrawController::new(PixelSurface::new(100, 60), PixelSurface::new(1, 1), settings())
}

fn drag(controller: &mut DrawController<PixelSurface>, y: f32) {
    controller.handle_pointer_event(PointerEvent::Down(RawPointerSample::mouse(10.0, y)));
    for x in [30.0, 50.0, 70.0] {
        controller.handle_pointer_event(PointerEvent::Move(RawPointerSample::mouse(x, y)));
    }
    controller.handle_pointer_event(PointerEvent::Up);
}

#[test]
fn committed_stroke_is_rasterized_on_full_surface() {
    let mut controller = pixel_controller();
    assert_eq!(controller.renderer().preview().size(), (50, 30));

    drag(&mut controller, 20.0);

    let full = controller.renderer().full();
    assert_eq!(full.pixel(30, 20), Some(Color::rgb(200, 0, 0)));
    assert_eq!(full.pixel(45, 20), Some(Color::rgb(200, 0, 0)));
    assert_eq!(full.pixel(30, 45), Some(Color::WHITE));
    assert_eq!(controller.renderer().visible_layer(), VisibleLayer::Full);
}

#[test]
fn undo_removes_latest_stroke_from_pixels() {
    let mut controller = pixel_controller();
    drag(&mut controller, 15.0);
    drag(&mut controller, 45.0);
    assert_eq!(
        controller.renderer().full().pixel(30, 45),
        Some(Color::rgb(200, 0, 0))
    );

    assert!(controller.undo());
    let full = controller.renderer().full();
    assert_eq!(full.pixel(30, 45), Some(Color::WHITE));
    assert_eq!(full.pixel(30, 15), Some(Color::rgb(200, 0, 0)));

    assert!(controller.redo());
    assert_eq!(
        controller.renderer().full().pixel(30, 45),
        Some(Color::rgb(200, 0, 0))
    );
}

#[test]
fn first_stroke_cannot_be_undone() {
    let mut controller = pixel_controller();
    drag(&mut controller, 20.0);
    assert!(!controller.can_undo());
    assert!(!controller.undo());
}

#[test]
fn clear_wipes_surface_back_to_background() {
    let mut controller = pixel_controller();
    drag(&mut controller, 20.0);
    assert!(controller.clear());
    assert_eq!(controller.renderer().full().count_pixels_not(Color::WHITE), 0);
    assert_eq!(controller.history().chunk_count(), 0);
}

#[test]
fn palm_contacts_never_reach_history() {
    let mut controller = DrawController::new(
        RecordingSurface::new(100, 100),
        RecordingSurface::new(50, 50),
        DrawSettings {
            palm_rejection_sensitivity: 20.0,
            ..DrawSettings::default()
        },
    );

    let palm = RawPointerSample::touch(10.0, 10.0, 6.0, 5.0);
    assert!(!controller.handle_pointer_event(PointerEvent::Down(palm)));
    assert!(!controller.history().is_drawing());

    let finger = RawPointerSample::touch(10.0, 10.0, 4.0, 4.0);
    assert!(controller.handle_pointer_event(PointerEvent::Down(finger)));
    assert!(controller.history().is_drawing());

    assert!(!controller.handle_pointer_event(PointerEvent::Move(RawPointerSample::touch(
        20.0, 10.0, 8.0, 8.0
    ))));
    assert_eq!(
        controller.history().open_stroke().map(|stroke| stroke.points.len()),
        Some(1)
    );
}

#[test]
fn origin_offset_applies_to_recorded_points() {
    let mut controller = DrawController::new(
        RecordingSurface::new(100, 100),
        RecordingSurface::new(50, 50),
        DrawSettings::default(),
    );
    controller.normalizer_mut().set_origin(40.0, 25.0);
    controller.handle_pointer_event(PointerEvent::Down(RawPointerSample::pen(50.0, 30.0, 0.9)));

    let stroke = controller.history().open_stroke().expect("open stroke");
    assert_eq!((stroke.points[0].x, stroke.points[0].y), (10.0, 5.0));
    assert_eq!(stroke.points[0].pressure, 0.9);
}

#[test]
fn pressure_lift_commits_and_restores_full_layer() {
    let mut controller = DrawController::new(
        RecordingSurface::new(100, 100),
        RecordingSurface::new(50, 50),
        DrawSettings {
            min_force: 0.3,
            ..DrawSettings::default()
        },
    );
    controller.handle_pointer_event(PointerEvent::Down(RawPointerSample::pen(10.0, 10.0, 0.8)));
    controller.handle_pointer_event(PointerEvent::Move(RawPointerSample::pen(20.0, 10.0, 0.8)));
    assert_eq!(controller.renderer().visible_layer(), VisibleLayer::Preview);
    let commits = controller.renderer().stats().commit_renders;

    assert!(controller.handle_pointer_event(PointerEvent::Move(RawPointerSample::pen(
        30.0, 10.0, 0.1
    ))));

    assert!(!controller.history().is_drawing());
    assert_eq!(controller.renderer().visible_layer(), VisibleLayer::Full);
    assert_eq!(controller.renderer().stats().commit_renders, commits + 1);
    assert_eq!(
        controller.history().current_stroke().map(|stroke| stroke.points.len()),
        Some(2)
    );
    assert!(!controller.handle_pointer_event(PointerEvent::Up));
}
