#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawPhase {
    #[default]
    Idle,
    Drawing,
}

impl DrawPhase {
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Drawing)
    }
}
