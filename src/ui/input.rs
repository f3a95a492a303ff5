/// Keyboard state tracker.
///
/// Tracks which keys are currently held, enabling:
///   - Continuous movement while ←/→ (or A/D) is held
///   - Edge-triggered actions (jump, dodge, slash, ultimate) that fire
///     once per physical press
///
/// Uses crossterm's keyboard enhancement for Release events when
/// available, with a timeout fallback on terminals that only report
/// presses and repeats.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind};

use crate::domain::entity::FrameInput;

/// After this duration without a Press/Repeat event, consider the key
/// released. Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned "not held" → "held" during the most
    /// recent drain. Edge-triggered actions read these.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call once per frame, before the simulation step.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.raw_events.push(key);

                match key.kind {
                    KeyEventKind::Release if self.honor_release => {
                        self.last_active.remove(&key.code);
                    }
                    KeyEventKind::Release => {
                        // enhancement not confirmed; timeout handles it
                    }
                    _ => {
                        let was_held = self.is_held_inner(key.code);
                        self.last_active.insert(key.code, Instant::now());
                        if !was_held {
                            self.fresh_presses.push(key.code);
                        }
                    }
                }
            }
        }

        // expire keys that timed out (no-Release fallback)
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// The keyboard's contribution to this frame's simulation input.
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            move_left: self.any_held(&[KeyCode::Left, KeyCode::Char('a')]),
            move_right: self.any_held(&[KeyCode::Right, KeyCode::Char('d')]),
            jump: self.any_pressed(&[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char(' ')]),
            dodge: self.any_pressed(&[KeyCode::Char('k'), KeyCode::Char('x')]),
            attack: self.any_pressed(&[KeyCode::Char('j'), KeyCode::Char('z')]),
            ultimate: self.any_pressed(&[KeyCode::Char('l'), KeyCode::Char('c')]),
        }
    }

    /// Is this key currently held down? (continuous actions)
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.is_held_inner(code)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Check if any raw event this frame has Ctrl+C.
    pub fn ctrl_c_pressed(&self) -> bool {
        use crossterm::event::KeyModifiers;
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn is_held_inner(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}
