// src/crowd/state_machine.rs - Walk/idle state machine with cross-fade window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PedestrianState {
    Walk,
    Idle,
}

/// Transitions are measured on the shared animation clock (in frames).
/// After `change_to`, the blend weight ramps as
/// `(clock - start) / (blend_duration + 1)` until more than `blend_duration`
/// frames have passed, then the state switches and the weight keeps its last
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMachine {
    current: PedestrianState,
    pending: Option<PedestrianState>,
    transition_start_frame: f64,
    blend_weight: f32,
    blend_duration: f32,
}

impl StateMachine {
    pub fn new(blend_duration: f32) -> Self {
        Self {
            current: PedestrianState::Walk,
            pending: None,
            transition_start_frame: 0.0,
            blend_weight: 1.0,
            blend_duration,
        }
    }

    pub fn current(&self) -> PedestrianState {
        self.current
    }

    pub fn pending(&self) -> Option<PedestrianState> {
        self.pending
    }

    pub fn in_transition(&self) -> bool {
        self.pending.is_some()
    }

    pub fn blend_weight(&self) -> f32 {
        self.blend_weight
    }

    pub fn transition_start_frame(&self) -> f64 {
        self.transition_start_frame
    }

    pub fn change_to(&mut self, state: PedestrianState, clock: f64) {
        if self.pending == Some(state) || (self.pending.is_none() && self.current == state) {
            return;
        }
        self.pending = Some(state);
        self.transition_start_frame = clock;
    }

    pub fn update(&mut self, clock: f64) {
        let Some(target) = self.pending else {
            return;
        };

        let elapsed = clock - self.transition_start_frame;
        let blend_duration = f64::from(self.blend_duration);
        if elapsed > blend_duration {
            self.current = target;
            self.pending = None;
        } else {
            self.blend_weight = (elapsed / (blend_duration + 1.0)) as f32;
        }
    }
}
