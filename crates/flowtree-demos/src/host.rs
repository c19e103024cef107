use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use flowtree::{
    Completion, Container, ModalStyle, Presenter, Resizing, Screen, Surface, SurfaceId,
    Transition, Window, geom::Rect,
};
use tracing::info;

/// Shared handle on a [`LogSurface`] stack, bottom first.
pub type Stack = Rc<RefCell<Vec<Screen>>>;

/// A navigation surface that keeps its stack in memory and logs each action.
///
/// Modal presentations finish immediately, so completions run before
/// `present` returns.
pub struct LogSurface {
    /// Label used in log output.
    label: String,
    /// Current stack.
    stack: Stack,
}

impl LogSurface {
    /// Create a surface with an empty stack.
    pub fn new(label: &str) -> Self {
        Self {
            label: label.into(),
            stack: Stack::default(),
        }
    }

    /// A handle on the stack, used to simulate user gestures.
    pub fn handle(&self) -> Stack {
        Rc::clone(&self.stack)
    }
}

impl Surface for LogSurface {
    fn push(&mut self, screen: Screen, animated: bool) {
        info!(surface = %self.label, %screen, animated, "push");
        self.stack.borrow_mut().push(screen);
    }

    fn set_stack(&mut self, screens: Vec<Screen>, animated: bool) {
        info!(surface = %self.label, screens = ?screens, animated, "set stack");
        *self.stack.borrow_mut() = screens;
    }

    fn present(&mut self, screen: Screen, animated: bool, completion: Option<Completion>) {
        info!(
            surface = %self.label,
            %screen,
            style = ?screen.modal_style(),
            animated,
            "present"
        );
        if let Some(completion) = completion {
            completion();
        }
    }

    fn pop_to_root(&mut self, animated: bool) {
        info!(surface = %self.label, animated, "pop to root");
        self.stack.borrow_mut().truncate(1);
    }

    fn set_modal_style(&mut self, style: ModalStyle) {
        info!(surface = %self.label, ?style, "modal style");
    }

    fn stack(&self) -> Vec<Screen> {
        self.stack.borrow().clone()
    }
}

/// Pop the top screen the way a back swipe does. Returns the transition the
/// surface reports, or `None` when only the bottom screen is left.
pub fn back_swipe(stack: &Stack) -> Option<Transition> {
    let mut stack = stack.borrow_mut();
    if stack.len() < 2 {
        return None;
    }
    let from = stack.pop()?;
    let shown = stack.last()?.clone();
    info!(from = %from, shown = %shown, "back swipe");
    Some(Transition::new(shown, true).from_screen(from))
}

/// The application window.
#[derive(Default)]
pub struct LogWindow {
    /// Root screen, once set.
    root: RefCell<Option<Screen>>,
    /// Has the window been made key and visible?
    visible: Cell<bool>,
}

impl LogWindow {
    /// The window's root screen.
    pub fn root(&self) -> Option<Screen> {
        self.root.borrow().clone()
    }

    /// Is the window on screen?
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

impl Window for LogWindow {
    fn set_root(&self, screen: Screen) {
        info!(%screen, "window root");
        *self.root.borrow_mut() = Some(screen);
    }

    fn make_key_and_visible(&self) {
        info!("window visible");
        self.visible.set(true);
    }
}

/// Presents forked surfaces over the main one.
#[derive(Default)]
pub struct LogPresenter {
    /// Surfaces presented so far.
    presented: RefCell<Vec<SurfaceId>>,
}

impl LogPresenter {
    /// Surfaces presented so far, in order.
    pub fn presented(&self) -> Vec<SurfaceId> {
        self.presented.borrow().clone()
    }
}

impl Presenter for LogPresenter {
    fn present(&self, id: SurfaceId, surface: &mut dyn Surface, animated: bool) {
        info!(surface = ?id, stack = ?surface.stack(), animated, "present surface");
        self.presented.borrow_mut().push(id);
    }
}

/// A fixed-size region screens can be embedded into.
pub struct LogContainer {
    /// Frame in window coordinates.
    frame: Rect,
    /// Embedded screens.
    subviews: RefCell<Vec<Screen>>,
}

impl LogContainer {
    /// A container occupying `frame`.
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            subviews: RefCell::default(),
        }
    }

    /// Screens embedded so far.
    pub fn subviews(&self) -> Vec<Screen> {
        self.subviews.borrow().clone()
    }
}

impl Container for LogContainer {
    fn bounds(&self) -> Rect {
        self.frame.at_origin()
    }

    fn add_subview(&self, screen: Screen, frame: Rect, resizing: Resizing) {
        info!(%screen, ?frame, ?resizing, "embed");
        self.subviews.borrow_mut().push(screen);
    }
}
