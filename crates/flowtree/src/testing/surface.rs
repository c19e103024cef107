use std::{cell::RefCell, mem, rc::Rc};

use crate::{
    screen::{ModalStyle, Screen},
    surface::{Completion, Surface, Transition},
};

/// One call made against a [`TestSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceAction {
    /// `push`
    Push(Screen),
    /// `set_stack`
    SetStack(Vec<Screen>),
    /// `present`
    Present(Screen),
    /// `pop_to_root`
    PopToRoot,
    /// `set_modal_style`
    SetModalStyle(ModalStyle),
}

/// State shared between a [`TestSurface`] and the test driving it.
#[derive(Default)]
pub struct SurfaceLog {
    /// Current stack, bottom first.
    pub stack: Vec<Screen>,
    /// Screens presented modally, in order.
    pub presented: Vec<Screen>,
    /// Every call made against the surface.
    pub actions: Vec<SurfaceAction>,
    /// Surface-level modal style.
    pub modal_style: ModalStyle,
    /// Presentation completions not yet delivered.
    pending: Vec<Completion>,
}

impl SurfaceLog {
    /// Simulate an interactive back gesture: pop the top screen and return the
    /// transition the surface reports. `None` if there is nothing to pop.
    pub fn interactive_pop(&mut self) -> Option<Transition> {
        if self.stack.len() < 2 {
            return None;
        }
        let from = self.stack.pop()?;
        let shown = self.stack.last()?.clone();
        Some(Transition::new(shown, true).from_screen(from))
    }

    /// Simulate a push performed by the host outside any flow and return the
    /// reported transition.
    pub fn forward_push(&mut self, screen: Screen) -> Transition {
        let from = self.stack.last().cloned();
        self.stack.push(screen.clone());
        let transition = Transition::new(screen, true);
        match from {
            Some(from) => transition.from_screen(from),
            None => transition,
        }
    }

    /// Actions that put a screen on display.
    pub fn display_actions(&self) -> Vec<&SurfaceAction> {
        self.actions
            .iter()
            .filter(|a| !matches!(a, SurfaceAction::SetModalStyle(_)))
            .collect()
    }
}

/// A navigation surface backed by an in-memory stack.
///
/// Transitions complete instantly for the stack itself; modal completions are
/// held until [`TestSurface::finish_presentations`].
pub struct TestSurface {
    /// Shared state.
    log: Rc<RefCell<SurfaceLog>>,
}

impl TestSurface {
    /// Create returns the shared [`SurfaceLog`] and a `TestSurface` writing
    /// to it.
    pub fn create() -> (Rc<RefCell<SurfaceLog>>, Self) {
        Self::with_stack(Vec::new())
    }

    /// Like [`TestSurface::create`], with screens already on the stack.
    pub fn with_stack(stack: Vec<Screen>) -> (Rc<RefCell<SurfaceLog>>, Self) {
        let log = Rc::new(RefCell::new(SurfaceLog {
            stack,
            ..Default::default()
        }));
        (Rc::clone(&log), Self { log })
    }

    /// Deliver pending presentation completions, as the host does when the
    /// animation finishes. The log is released before any completion runs, so
    /// completions may inspect or drive the surface. Returns the number
    /// delivered.
    pub fn finish_presentations(log: &RefCell<SurfaceLog>) -> usize {
        let pending = mem::take(&mut log.borrow_mut().pending);
        let n = pending.len();
        for completion in pending {
            completion();
        }
        n
    }
}

impl Surface for TestSurface {
    fn push(&mut self, screen: Screen, _animated: bool) {
        let mut log = self.log.borrow_mut();
        log.stack.push(screen.clone());
        log.actions.push(SurfaceAction::Push(screen));
    }

    fn set_stack(&mut self, screens: Vec<Screen>, _animated: bool) {
        let mut log = self.log.borrow_mut();
        log.stack.clone_from(&screens);
        log.actions.push(SurfaceAction::SetStack(screens));
    }

    fn present(&mut self, screen: Screen, _animated: bool, completion: Option<Completion>) {
        let mut log = self.log.borrow_mut();
        log.presented.push(screen.clone());
        log.actions.push(SurfaceAction::Present(screen));
        if let Some(completion) = completion {
            log.pending.push(completion);
        }
    }

    fn pop_to_root(&mut self, _animated: bool) {
        let mut log = self.log.borrow_mut();
        log.stack.truncate(1);
        log.actions.push(SurfaceAction::PopToRoot);
    }

    fn set_modal_style(&mut self, style: ModalStyle) {
        let mut log = self.log.borrow_mut();
        log.modal_style = style;
        log.actions.push(SurfaceAction::SetModalStyle(style));
    }

    fn stack(&self) -> Vec<Screen> {
        self.log.borrow().stack.clone()
    }
}
