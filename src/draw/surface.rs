use crate::draw::model::Color;

/// A 2D drawing target with canvas-style path primitives.
///
/// Line caps and joins are round. Widths and coordinates are in the
/// surface's own pixel space.
pub trait DrawSurface {
    fn size(&self) -> (u32, u32);
    fn resize(&mut self, width: u32, height: u32);

    /// Resets every pixel to transparent.
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    fn set_stroke_style(&mut self, color: Color, width: f32);
    fn set_fill_color(&mut self, color: Color);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32);
    /// Strokes the current path with the current stroke style.
    fn stroke(&mut self);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32);

    fn set_visible(&mut self, visible: bool);
    fn is_visible(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    Resize { width: u32, height: u32 },
    Clear,
    FillRect { x: f32, y: f32, width: f32, height: f32, color: Color },
    StrokeStyle { color: Color, width: f32 },
    FillColor(Color),
    BeginPath,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    QuadraticCurveTo { cx: f32, cy: f32, x: f32, y: f32 },
    Stroke,
    FillCircle { x: f32, y: f32, radius: f32 },
    SetVisible(bool),
}

/// Surface that records every call, for replay into another backend.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: (u32, u32),
    visible: bool,
    commands: Vec<SurfaceCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            visible: true,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of recorded `stroke()` calls.
    pub fn stroke_calls(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, SurfaceCommand::Stroke))
            .count()
    }

    pub fn replay_into<S: DrawSurface + ?Sized>(&self, target: &mut S) {
        replay(&self.commands, target);
    }
}

pub fn replay<S: DrawSurface + ?Sized>(commands: &[SurfaceCommand], target: &mut S) {
    for command in commands {
        match *command {
            SurfaceCommand::Resize { width, height } => target.resize(width, height),
            SurfaceCommand::Clear => target.clear(),
            SurfaceCommand::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => target.fill_rect(x, y, width, height, color),
            SurfaceCommand::StrokeStyle { color, width } => target.set_stroke_style(color, width),
            SurfaceCommand::FillColor(color) => target.set_fill_color(color),
            SurfaceCommand::BeginPath => target.begin_path(),
            SurfaceCommand::MoveTo { x, y } => target.move_to(x, y),
            SurfaceCommand::LineTo { x, y } => target.line_to(x, y),
            SurfaceCommand::QuadraticCurveTo { cx, cy, x, y } => {
                target.quadratic_curve_to(cx, cy, x, y)
            }
            SurfaceCommand::Stroke => target.stroke(),
            SurfaceCommand::FillCircle { x, y, radius } => target.fill_circle(x, y, radius),
            SurfaceCommand::SetVisible(visible) => target.set_visible(visible),
        }
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.commands.push(SurfaceCommand::Resize { width, height });
    }

    fn clear(&mut self) {
        self.commands.push(SurfaceCommand::Clear);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.commands.push(SurfaceCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn set_stroke_style(&mut self, color: Color, width: f32) {
        self.commands
            .push(SurfaceCommand::StrokeStyle { color, width });
    }

    fn set_fill_color(&mut self, color: Color) {
        self.commands.push(SurfaceCommand::FillColor(color));
    }

    fn begin_path(&mut self) {
        self.commands.push(SurfaceCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(SurfaceCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(SurfaceCommand::LineTo { x, y });
    }

    fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.commands
            .push(SurfaceCommand::QuadraticCurveTo { cx, cy, x, y });
    }

    fn stroke(&mut self) {
        self.commands.push(SurfaceCommand::Stroke);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.commands
            .push(SurfaceCommand::FillCircle { x, y, radius });
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.commands.push(SurfaceCommand::SetVisible(visible));
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
