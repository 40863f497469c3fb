use crate::draw::geometry::{simplify_points, DEFAULT_SIMPLIFY_TOLERANCE};
use crate::draw::model::{Chunk, Color, Point, Stroke};
use crate::draw::state::DrawPhase;
use std::sync::Arc;

pub const DEFAULT_CHUNK_CAPACITY: usize = 1000;
pub const DEFAULT_MIN_FORCE: f32 = 0.0;
/// Chunks revisited by simplification when a stroke ends.
pub const SIMPLIFY_LOOKBACK_CHUNKS: usize = 3;
/// A split chunk holds the continuity point plus the new point.
pub(crate) const MIN_CHUNK_CAPACITY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryConfig {
    pub chunk_capacity: usize,
    pub min_force: f32,
    pub simplify_tolerance: f32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
            min_force: DEFAULT_MIN_FORCE,
            simplify_tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawAction {
    StartPath {
        point: Point,
        color: Color,
        brush_size: f32,
    },
    UpdatePath {
        point: Point,
    },
    EndPath,
    Undo,
    Redo,
    Clear,
}

/// Position of the last visible stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoryCursor {
    pub chunk: usize,
    pub stroke: usize,
}

/// Chunked, undo/redo-navigable stroke history.
///
/// Everything after the cursor is kept for redo but is not visible. Chunks
/// are shared behind `Arc`, so [`StrokeHistory::reduce`] leaves the previous
/// state intact while only copying the chunk it actually touches.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrokeHistory {
    config: HistoryConfig,
    chunks: Vec<Arc<Chunk>>,
    cursor: Option<HistoryCursor>,
    phase: DrawPhase,
    revision: u64,
}

impl StrokeHistory {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> HistoryConfig {
        self.config
    }

    /// New values apply to subsequent transitions; stored strokes are untouched.
    pub fn set_config(&mut self, config: HistoryConfig) {
        self.config = config;
    }

    /// Pure transition: returns the successor state and leaves `self` as it was.
    pub fn reduce(&self, action: DrawAction) -> StrokeHistory {
        let mut next = self.clone();
        next.apply(action);
        next
    }

    /// Applies `action` in place. Returns `false` when the action was a no-op.
    pub fn apply(&mut self, action: DrawAction) -> bool {
        let changed = match action {
            DrawAction::StartPath {
                point,
                color,
                brush_size,
            } => self.start_path(point, color, brush_size),
            DrawAction::UpdatePath { point } => self.update_path(point),
            DrawAction::EndPath => self.end_path(),
            DrawAction::Undo => self.undo_step(),
            DrawAction::Redo => self.redo_step(),
            DrawAction::Clear => self.reset(),
        };
        if changed {
            self.revision = self.revision.wrapping_add(1);
        }
        changed
    }

    pub fn start_stroke(&mut self, point: Point, color: Color, brush_size: f32) -> bool {
        self.apply(DrawAction::StartPath {
            point,
            color,
            brush_size,
        })
    }

    pub fn append_point(&mut self, point: Point) -> bool {
        self.apply(DrawAction::UpdatePath { point })
    }

    pub fn end_stroke(&mut self) -> bool {
        self.apply(DrawAction::EndPath)
    }

    /// Ignored while a stroke is open.
    pub fn undo(&mut self) -> bool {
        self.apply(DrawAction::Undo)
    }

    /// Ignored while a stroke is open.
    pub fn redo(&mut self) -> bool {
        self.apply(DrawAction::Redo)
    }

    pub fn clear(&mut self) -> bool {
        self.apply(DrawAction::Clear)
    }

    pub fn can_undo(&self) -> bool {
        match self.cursor {
            Some(cursor) if !self.phase.is_drawing() => cursor.stroke > 0 || cursor.chunk > 0,
            _ => false,
        }
    }

    pub fn can_redo(&self) -> bool {
        match self.cursor {
            Some(cursor) if !self.phase.is_drawing() => {
                cursor.stroke + 1 < self.chunks[cursor.chunk].strokes.len()
                    || cursor.chunk + 1 < self.chunks.len()
            }
            _ => false,
        }
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn is_drawing(&self) -> bool {
        self.phase.is_drawing()
    }

    pub fn cursor(&self) -> Option<HistoryCursor> {
        self.cursor
    }

    /// Bumped on every effective transition.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index).map(Arc::as_ref)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.iter().map(Arc::as_ref)
    }

    /// Points held by each chunk, including redo-able chunks.
    pub fn chunk_point_counts(&self) -> Vec<usize> {
        self.chunks.iter().map(|chunk| chunk.point_count()).collect()
    }

    /// The stroke at the cursor.
    pub fn current_stroke(&self) -> Option<&Stroke> {
        let cursor = self.cursor?;
        self.chunks.get(cursor.chunk)?.strokes.get(cursor.stroke)
    }

    /// The stroke currently being written, if any.
    pub fn open_stroke(&self) -> Option<&Stroke> {
        if self.phase.is_drawing() {
            self.current_stroke()
        } else {
            None
        }
    }

    /// Every stroke up to and including the cursor, in drawing order.
    pub fn visible_strokes(&self) -> impl Iterator<Item = &Stroke> + '_ {
        let (full_chunks, tail) = match self.cursor {
            Some(cursor) => (cursor.chunk, Some(cursor)),
            None => (0, None),
        };
        let tail_strokes = tail
            .and_then(|cursor| {
                let chunk = self.chunks.get(cursor.chunk)?;
                let end = (cursor.stroke + 1).min(chunk.strokes.len());
                Some(&chunk.strokes[..end])
            })
            .unwrap_or(&[]);
        self.chunks[..full_chunks]
            .iter()
            .flat_map(|chunk| chunk.strokes.iter())
            .chain(tail_strokes.iter())
    }

    fn start_path(&mut self, point: Point, color: Color, brush_size: f32) -> bool {
        if self.phase.is_drawing() {
            tracing::debug!("ignoring stroke start while a stroke is open");
            return false;
        }

        let keep = match self.cursor {
            Some(cursor) => {
                let slot = &mut self.chunks[cursor.chunk];
                if slot.strokes.len() > cursor.stroke + 1 {
                    Arc::make_mut(slot).strokes.truncate(cursor.stroke + 1);
                }
                cursor.chunk + 1
            }
            None => 0,
        };
        let dropped = self.chunks.len().saturating_sub(keep);
        self.chunks.truncate(keep);
        self.chunks
            .push(Arc::new(Chunk::with_stroke(Stroke::new(color, brush_size, point))));
        self.cursor = Some(HistoryCursor {
            chunk: self.chunks.len() - 1,
            stroke: 0,
        });
        self.phase = DrawPhase::Drawing;
        tracing::debug!(
            chunk = self.chunks.len() - 1,
            dropped_redo_chunks = dropped,
            "stroke started"
        );
        true
    }

    fn update_path(&mut self, point: Point) -> bool {
        if !self.phase.is_drawing() {
            return false;
        }
        let Some(cursor) = self.cursor else {
            return false;
        };

        let stroke = &self.chunks[cursor.chunk].strokes[cursor.stroke];
        if stroke.points.len() >= 2 && point.pressure < self.config.min_force {
            self.phase = DrawPhase::Idle;
            tracing::debug!(
                pressure = point.pressure,
                min_force = self.config.min_force,
                "pressure lift closed stroke"
            );
            return true;
        }

        let capacity = self.config.chunk_capacity.max(MIN_CHUNK_CAPACITY);
        if stroke.points.len() >= capacity {
            let Some(continuity) = stroke.last_point() else {
                return false;
            };
            let continued = Stroke {
                color: stroke.color,
                brush_size: stroke.brush_size,
                points: vec![continuity, point],
            };
            self.chunks.push(Arc::new(Chunk::with_stroke(continued)));
            self.cursor = Some(HistoryCursor {
                chunk: self.chunks.len() - 1,
                stroke: 0,
            });
            tracing::debug!(
                chunk = self.chunks.len() - 1,
                capacity,
                "stroke continued in new chunk"
            );
            return true;
        }

        Arc::make_mut(&mut self.chunks[cursor.chunk]).strokes[cursor.stroke]
            .points
            .push(point);
        tracing::trace!(x = point.x, y = point.y, pressure = point.pressure, "point appended");
        true
    }

    fn end_path(&mut self) -> bool {
        if !self.phase.is_drawing() {
            return false;
        }

        let tolerance = self.config.simplify_tolerance;
        let first = self.chunks.len().saturating_sub(SIMPLIFY_LOOKBACK_CHUNKS);
        let mut removed = 0usize;
        for slot in &mut self.chunks[first..] {
            let simplified: Vec<Vec<Point>> = slot
                .strokes
                .iter()
                .map(|stroke| simplify_points(&stroke.points, tolerance))
                .collect();
            let shrunk = simplified
                .iter()
                .zip(&slot.strokes)
                .any(|(points, stroke)| points.len() != stroke.points.len());
            if !shrunk {
                continue;
            }
            let chunk = Arc::make_mut(slot);
            for (stroke, points) in chunk.strokes.iter_mut().zip(simplified) {
                removed += stroke.points.len() - points.len();
                stroke.points = points;
            }
        }

        self.phase = DrawPhase::Idle;
        tracing::debug!(removed_points = removed, tolerance, "stroke ended");
        true
    }

    fn undo_step(&mut self) -> bool {
        // No cursor movement while a stroke is open.
        if self.phase.is_drawing() {
            return false;
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return false;
        };
        if cursor.stroke > 0 {
            cursor.stroke -= 1;
        } else if cursor.chunk > 0 {
            cursor.chunk -= 1;
            cursor.stroke = self.chunks[cursor.chunk].strokes.len().saturating_sub(1);
        } else {
            return false;
        }
        true
    }

    fn redo_step(&mut self) -> bool {
        // No cursor movement while a stroke is open.
        if self.phase.is_drawing() {
            return false;
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return false;
        };
        if cursor.stroke + 1 < self.chunks[cursor.chunk].strokes.len() {
            cursor.stroke += 1;
        } else if cursor.chunk + 1 < self.chunks.len() {
            cursor.chunk += 1;
            cursor.stroke = 0;
        } else {
            return false;
        }
        true
    }

    fn reset(&mut self) -> bool {
        if self.chunks.is_empty() && !self.phase.is_drawing() {
            return false;
        }
        self.chunks.clear();
        self.cursor = None;
        self.phase = DrawPhase::Idle;
        tracing::debug!("history cleared");
        true
    }
}
