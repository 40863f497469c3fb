pub mod controller;
pub mod egui_surface;
pub mod geometry;
pub mod history;
pub mod input;
pub mod model;
pub mod primitives;
pub mod raster;
pub mod render;
pub mod settings;
pub mod settings_store;
pub mod state;
pub mod surface;

pub use controller::DrawController;
pub use history::{DrawAction, HistoryConfig, HistoryCursor, StrokeHistory};
pub use model::{Chunk, Color, Point, Stroke};
pub use render::{DualResolutionRenderer, RenderSettings, VisibleLayer};
pub use settings::DrawSettings;
pub use surface::{DrawSurface, RecordingSurface};
