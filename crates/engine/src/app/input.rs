/// Per-tick view of the player's input: a 2D move axis plus two
/// discrete action triggers. Trigger flags are edges, not held state;
/// the producer is responsible for clearing them between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    move_axis: (f32, f32),
    primary_pressed: bool,
    secondary_pressed: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_move_axis(mut self, x: f32, y: f32) -> Self {
        self.move_axis = (x, y);
        self
    }

    pub fn with_primary_pressed(mut self, pressed: bool) -> Self {
        self.primary_pressed = pressed;
        self
    }

    pub fn with_secondary_pressed(mut self, pressed: bool) -> Self {
        self.secondary_pressed = pressed;
        self
    }

    pub fn move_axis(&self) -> (f32, f32) {
        self.move_axis
    }

    pub fn primary_pressed(&self) -> bool {
        self.primary_pressed
    }

    pub fn secondary_pressed(&self) -> bool {
        self.secondary_pressed
    }
}

/// Produces one snapshot per simulation tick.
pub trait InputSource {
    fn next_snapshot(&mut self, tick: u64) -> InputSnapshot;
}

/// Input source that always reports nothing pressed.
#[derive(Debug, Default)]
pub struct NullInput;

impl InputSource for NullInput {
    fn next_snapshot(&mut self, _tick: u64) -> InputSnapshot {
        InputSnapshot::empty()
    }
}
