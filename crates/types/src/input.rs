//! Discrete input events delivered by the presentation layer.

use crate::Vec2;
use serde::{Deserialize, Serialize};

/// Input delivered to the runner once per tick.
///
/// Hit-testing a click against node positions is the runner's job; the
/// presentation layer only reports where the pointer was.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Stop the simulation.
    Quit,
    /// Pause or resume the update loop.
    TogglePause,
    /// Primary click: select or deselect the node under the pointer.
    Click { x: f64, y: f64 },
    /// Secondary click: toggle maliciousness of the node under the pointer.
    SecondaryClick { x: f64, y: f64 },
}

impl InputEvent {
    /// Pointer position for click events.
    pub fn pointer(&self) -> Option<Vec2> {
        match *self {
            InputEvent::Click { x, y } | InputEvent::SecondaryClick { x, y } => {
                Some(Vec2::new(x, y))
            }
            InputEvent::Quit | InputEvent::TogglePause => None,
        }
    }
}
