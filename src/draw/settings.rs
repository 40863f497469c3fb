use serde::{Deserialize, Serialize};

use crate::draw::geometry::DEFAULT_SIMPLIFY_TOLERANCE;
use crate::draw::history::{
    HistoryConfig, DEFAULT_CHUNK_CAPACITY, DEFAULT_MIN_FORCE, MIN_CHUNK_CAPACITY,
};
use crate::draw::input::{InputNormalizer, DEFAULT_PALM_REJECTION_SENSITIVITY};
use crate::draw::model::Color;
use crate::draw::render::{RenderSettings, DEFAULT_RENDER_SCALE, MIN_RENDER_SCALE};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawSettings {
    #[serde(default = "default_brush_color")]
    pub brush_color: Color,
    #[serde(default = "default_brush_size")]
    pub brush_size: f32,
    #[serde(default = "default_palm_rejection_sensitivity")]
    pub palm_rejection_sensitivity: f32,
    #[serde(default = "default_min_force")]
    pub min_force: f32,
    #[serde(default = "default_chunk_capacity")]
    pub chunk_capacity: usize,
    #[serde(default = "default_simplify_tolerance")]
    pub simplify_tolerance: f32,
    #[serde(default = "default_render_scale")]
    pub render_scale: f32,
    #[serde(default = "default_background_color")]
    pub background_color: Color,
}

fn default_brush_color() -> Color {
    Color::BLACK
}

fn default_brush_size() -> f32 {
    5.0
}

fn default_palm_rejection_sensitivity() -> f32 {
    DEFAULT_PALM_REJECTION_SENSITIVITY
}

fn default_min_force() -> f32 {
    DEFAULT_MIN_FORCE
}

fn default_chunk_capacity() -> usize {
    DEFAULT_CHUNK_CAPACITY
}

fn default_simplify_tolerance() -> f32 {
    DEFAULT_SIMPLIFY_TOLERANCE
}

fn default_render_scale() -> f32 {
    DEFAULT_RENDER_SCALE
}

fn default_background_color() -> Color {
    Color::WHITE
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            brush_color: default_brush_color(),
            brush_size: default_brush_size(),
            palm_rejection_sensitivity: default_palm_rejection_sensitivity(),
            min_force: default_min_force(),
            chunk_capacity: default_chunk_capacity(),
            simplify_tolerance: default_simplify_tolerance(),
            render_scale: default_render_scale(),
            background_color: default_background_color(),
        }
    }
}

impl DrawSettings {
    /// Pulls out-of-range values back to something usable. Returns `true`
    /// when anything was changed.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;

        if !(self.brush_size.is_finite() && self.brush_size > 0.0) {
            tracing::warn!(value = self.brush_size, "brush size must be positive");
            self.brush_size = default_brush_size();
            changed = true;
        }
        if !(self.palm_rejection_sensitivity.is_finite() && self.palm_rejection_sensitivity > 0.0)
        {
            tracing::warn!(
                value = self.palm_rejection_sensitivity,
                "palm rejection sensitivity must be positive"
            );
            self.palm_rejection_sensitivity = default_palm_rejection_sensitivity();
            changed = true;
        }
        if !(self.min_force.is_finite() && self.min_force >= 0.0) {
            tracing::warn!(value = self.min_force, "minimum force must be >= 0");
            self.min_force = default_min_force();
            changed = true;
        }
        if self.chunk_capacity < MIN_CHUNK_CAPACITY {
            tracing::warn!(value = self.chunk_capacity, "chunk capacity below minimum");
            self.chunk_capacity = MIN_CHUNK_CAPACITY;
            changed = true;
        }
        if !(self.simplify_tolerance.is_finite() && self.simplify_tolerance >= 0.0) {
            tracing::warn!(
                value = self.simplify_tolerance,
                "simplify tolerance must be >= 0"
            );
            self.simplify_tolerance = default_simplify_tolerance();
            changed = true;
        }
        if !self.render_scale.is_finite() {
            self.render_scale = default_render_scale();
            changed = true;
        } else if !(self.render_scale > 0.0 && self.render_scale <= 1.0) {
            tracing::warn!(value = self.render_scale, "render scale must be in (0, 1]");
            self.render_scale = self.render_scale.clamp(MIN_RENDER_SCALE, 1.0);
            changed = true;
        }

        changed
    }

    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig {
            chunk_capacity: self.chunk_capacity,
            min_force: self.min_force,
            simplify_tolerance: self.simplify_tolerance,
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            scale_factor: self.render_scale,
            background: self.background_color,
            min_force: self.min_force,
        }
    }

    pub fn input_normalizer(&self) -> InputNormalizer {
        InputNormalizer::new(self.palm_rejection_sensitivity)
    }
}
