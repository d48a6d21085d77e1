//! Polled long-press detector for the user button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with external pull-up on an input-only
//! GPIO.  The main loop samples the level every tick and feeds it to
//! [`LongPressDetector::tick`]; there is no ISR.
//!
//! ## Gestures
//!
//! | Gesture           | Condition                                  | Event            |
//! |-------------------|--------------------------------------------|------------------|
//! | Long press start  | Held (debounced) for `long_press_ms`       | `LongPressStart` |
//! | Long press stop   | Released after a long press started        | `LongPressStop`  |
//!
//! Short presses produce nothing.

use crate::app::commands::ButtonEvent;

const DEBOUNCE_MS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Released,
    Pressed { since_ms: u32 },
    LongPress,
}

pub struct LongPressDetector {
    long_press_ms: u32,
    state: PressState,
}

impl LongPressDetector {
    pub fn new(long_press_ms: u32) -> Self {
        Self {
            long_press_ms: long_press_ms.max(DEBOUNCE_MS),
            state: PressState::Released,
        }
    }

    /// `true` while a long press is in progress.
    pub fn is_long_pressed(&self) -> bool {
        self.state == PressState::LongPress
    }

    /// Call from the main loop at each tick.
    ///
    /// `pressed` is the logical button state (already inverted for the
    /// active-low wiring); `now_ms` is monotonic time in milliseconds.
    pub fn tick(&mut self, pressed: bool, now_ms: u32) -> Option<ButtonEvent> {
        match (self.state, pressed) {
            (PressState::Released, true) => {
                self.state = PressState::Pressed { since_ms: now_ms };
                None
            }
            (PressState::Pressed { since_ms }, true) => {
                if now_ms.wrapping_sub(since_ms) >= self.long_press_ms {
                    self.state = PressState::LongPress;
                    Some(ButtonEvent::LongPressStart)
                } else {
                    None
                }
            }
            (PressState::Pressed { .. }, false) => {
                self.state = PressState::Released;
                None
            }
            (PressState::LongPress, false) => {
                self.state = PressState::Released;
                Some(ButtonEvent::LongPressStop)
            }
            (PressState::Released, false) | (PressState::LongPress, true) => None,
        }
    }

    /// Sample the button GPIO and advance the detector.
    pub fn poll(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        let pressed = !crate::drivers::hw_init::gpio_read(crate::pins::USER_BUTTON_GPIO);
        self.tick(pressed, now_ms)
    }
}
