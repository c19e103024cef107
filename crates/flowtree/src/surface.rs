//! The navigation surface collaborator and the events it reports.

use std::any::Any;

use crate::screen::{ModalStyle, Screen};

/// Callback fired when a display transition finishes.
pub type Completion = Box<dyn FnOnce()>;

/// A mutable stack of screens that performs the actual transitions.
///
/// Surfaces are owned by the host's navigation widget; flowtree drives them
/// through this interface and learns about finished transitions through
/// [`Flows::did_show`](crate::Flows::did_show).
pub trait Surface: Any {
    /// Push a screen onto the stack.
    fn push(&mut self, screen: Screen, animated: bool);

    /// Replace the whole stack.
    fn set_stack(&mut self, screens: Vec<Screen>, animated: bool);

    /// Present a screen modally over the stack. The surface calls
    /// `completion` once the transition has finished.
    fn present(&mut self, screen: Screen, animated: bool, completion: Option<Completion>);

    /// Pop everything above the bottom screen.
    fn pop_to_root(&mut self, animated: bool);

    /// Set the style used when the whole surface is presented modally.
    fn set_modal_style(&mut self, style: ModalStyle);

    /// The current stack, bottom first.
    fn stack(&self) -> Vec<Screen>;

    /// Is the screen anywhere in the current stack?
    fn contains(&self, screen: &Screen) -> bool {
        self.stack().contains(screen)
    }
}

/// A finished transition, as reported by a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The screen now on top.
    pub shown: Screen,
    /// The screen that was on top before the transition, when the surface
    /// can tell.
    pub from: Option<Screen>,
    /// Whether the transition was animated.
    pub animated: bool,
}

impl Transition {
    /// A transition to `shown` with no known source.
    pub fn new(shown: Screen, animated: bool) -> Self {
        Self {
            shown,
            from: None,
            animated,
        }
    }

    /// Record the screen that was on top before the transition.
    pub fn from_screen(mut self, from: Screen) -> Self {
        self.from = Some(from);
        self
    }
}
