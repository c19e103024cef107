use std::cell::{Cell, RefCell};

use crate::{
    geom::Rect,
    host::{Container, Presenter, Window},
    id::SurfaceId,
    screen::{Resizing, Screen},
    surface::Surface,
};

/// A presenter that records the surfaces it was asked to show.
#[derive(Default)]
pub struct TestPresenter {
    /// Presented surfaces with the stack they showed at the time.
    pub presented: RefCell<Vec<(SurfaceId, Vec<Screen>)>>,
}

impl Presenter for TestPresenter {
    fn present(&self, id: SurfaceId, surface: &mut dyn Surface, _animated: bool) {
        self.presented.borrow_mut().push((id, surface.stack()));
    }
}

/// A window that records its root screen.
#[derive(Default)]
pub struct TestWindow {
    /// Current root.
    pub root: RefCell<Option<Screen>>,
    /// Set once the window was made key and visible.
    pub visible: Cell<bool>,
}

impl Window for TestWindow {
    fn set_root(&self, screen: Screen) {
        *self.root.borrow_mut() = Some(screen);
    }

    fn make_key_and_visible(&self) {
        self.visible.set(true);
    }
}

/// A container that records its subviews.
pub struct TestContainer {
    /// Frame of the container in its own parent.
    pub frame: Rect,
    /// Placed screens with their frame and resizing.
    pub subviews: RefCell<Vec<(Screen, Rect, Resizing)>>,
}

impl TestContainer {
    /// A container occupying `frame` in its parent.
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            subviews: RefCell::new(Vec::new()),
        }
    }
}

impl Container for TestContainer {
    fn bounds(&self) -> Rect {
        self.frame.at_origin()
    }

    fn add_subview(&self, screen: Screen, frame: Rect, resizing: Resizing) {
        self.subviews.borrow_mut().push((screen, frame, resizing));
    }
}
