use crate::draw::model::{Point, DEFAULT_PRESSURE};

pub const DEFAULT_PALM_REJECTION_SENSITIVITY: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

/// A device sample in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointerSample {
    pub kind: PointerKind,
    pub client_x: f32,
    pub client_y: f32,
    /// `0.0` when the device reports no pressure.
    pub pressure: f32,
    pub contact_width: f32,
    pub contact_height: f32,
}

impl RawPointerSample {
    pub fn mouse(client_x: f32, client_y: f32) -> Self {
        Self {
            kind: PointerKind::Mouse,
            client_x,
            client_y,
            pressure: 0.0,
            contact_width: 0.0,
            contact_height: 0.0,
        }
    }

    pub fn pen(client_x: f32, client_y: f32, pressure: f32) -> Self {
        Self {
            kind: PointerKind::Pen,
            pressure,
            ..Self::mouse(client_x, client_y)
        }
    }

    pub fn touch(client_x: f32, client_y: f32, contact_width: f32, contact_height: f32) -> Self {
        Self {
            kind: PointerKind::Touch,
            contact_width,
            contact_height,
            ..Self::mouse(client_x, client_y)
        }
    }

    /// Bounding-box product `width * height` of the contact, not the ellipse area.
    pub fn contact_area(&self) -> f32 {
        self.contact_width.max(0.0) * self.contact_height.max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(RawPointerSample),
    Move(RawPointerSample),
    Up,
    Leave,
}

/// Turns raw samples into surface-relative points, dropping palm contacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputNormalizer {
    origin: (f32, f32),
    palm_rejection_sensitivity: f32,
}

impl Default for InputNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_PALM_REJECTION_SENSITIVITY)
    }
}

impl InputNormalizer {
    pub fn new(palm_rejection_sensitivity: f32) -> Self {
        Self {
            origin: (0.0, 0.0),
            palm_rejection_sensitivity,
        }
    }

    /// Window-space position of the drawing surface's top-left corner.
    pub fn set_origin(&mut self, left: f32, top: f32) {
        self.origin = (left, top);
    }

    pub fn origin(&self) -> (f32, f32) {
        self.origin
    }

    pub fn set_palm_rejection_sensitivity(&mut self, sensitivity: f32) {
        self.palm_rejection_sensitivity = sensitivity;
    }

    pub fn palm_rejection_sensitivity(&self) -> f32 {
        self.palm_rejection_sensitivity
    }

    /// `None` means the sample is a rejected palm contact and should be ignored.
    pub fn normalize(&self, sample: &RawPointerSample) -> Option<Point> {
        if sample.kind == PointerKind::Touch
            && sample.contact_area() > self.palm_rejection_sensitivity
        {
            tracing::trace!(
                area = sample.contact_area(),
                sensitivity = self.palm_rejection_sensitivity,
                "palm contact rejected"
            );
            return None;
        }

        let pressure = if sample.pressure.is_finite() && sample.pressure != 0.0 {
            sample.pressure
        } else {
            DEFAULT_PRESSURE
        };
        Some(Point {
            x: sample.client_x - self.origin.0,
            y: sample.client_y - self.origin.1,
            pressure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{InputNormalizer, RawPointerSample};
    use crate::draw::model::Point;

    #[test]
    fn coordinates_are_relative_to_surface_origin() {
        let mut normalizer = InputNormalizer::default();
        normalizer.set_origin(100.0, 50.0);
        assert_eq!(
            normalizer.normalize(&RawPointerSample::pen(130.0, 70.0, 0.8)),
            Some(Point::new(30.0, 20.0, 0.8))
        );
    }

    #[test]
    fn missing_pressure_defaults_to_half_but_low_pressure_is_kept() {
        let normalizer = InputNormalizer::default();
        let mouse = normalizer
            .normalize(&RawPointerSample::mouse(1.0, 1.0))
            .expect("mouse point");
        assert_eq!(mouse.pressure, 0.5);

        let feather = normalizer
            .normalize(&RawPointerSample::pen(1.0, 1.0, 0.01))
            .expect("pen point");
        assert_eq!(feather.pressure, 0.01);
    }

    #[test]
    fn large_touch_contacts_are_rejected() {
        let normalizer = InputNormalizer::new(10.0);
        assert_eq!(
            normalizer.normalize(&RawPointerSample::touch(5.0, 5.0, 4.0, 3.0)),
            None
        );
        assert!(normalizer
            .normalize(&RawPointerSample::touch(5.0, 5.0, 2.0, 5.0))
            .is_some());
    }

    #[test]
    fn contact_size_is_ignored_for_pens() {
        let normalizer = InputNormalizer::new(1.0);
        let mut sample = RawPointerSample::pen(5.0, 5.0, 0.4);
        sample.contact_width = 40.0;
        sample.contact_height = 40.0;
        assert!(normalizer.normalize(&sample).is_some());
    }
}
