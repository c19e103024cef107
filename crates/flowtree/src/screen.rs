//! Screen handles shared between flows and the host's view layer.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

/// Modal presentation styles a screen or surface can carry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalStyle {
    /// Let the host pick.
    #[default]
    Automatic,
    /// Cover the whole display.
    FullScreen,
    /// Partially covering sheet.
    PageSheet,
    /// Centered form-sized sheet.
    FormSheet,
    /// Cover the presenting context.
    CurrentContext,
    /// Cover the whole display, keeping the presenter's content underneath.
    OverFullScreen,
    /// Cover the presenting context, keeping its content underneath.
    OverCurrentContext,
    /// Anchored popover.
    Popover,
    /// No adaptation.
    None,
}

/// How an embedded screen follows its container's size.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resizing {
    /// Keep the initial frame.
    #[default]
    Fixed,
    /// Track the container's width and height.
    Flexible,
}

/// Shared state behind a [`Screen`] handle.
struct ScreenInner {
    /// Display name, used in logs and dumps.
    name: String,
    /// Style used when the screen is presented modally.
    modal_style: Cell<ModalStyle>,
    /// Containing screen, if the screen is embedded. Never an ownership edge.
    parent: RefCell<Weak<ScreenInner>>,
    /// Embedded child screens, in insertion order.
    children: RefCell<Vec<Screen>>,
}

/// A cheap, cloneable handle to a host screen.
///
/// Equality is identity: two handles are equal only if they refer to the same
/// screen, regardless of name.
#[derive(Clone)]
pub struct Screen {
    /// Shared screen state.
    inner: Rc<ScreenInner>,
}

impl Screen {
    /// Create a new screen.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ScreenInner {
                name: name.into(),
                modal_style: Cell::new(ModalStyle::default()),
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    /// The screen's display name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The style used when this screen is presented modally.
    pub fn modal_style(&self) -> ModalStyle {
        self.inner.modal_style.get()
    }

    /// Set the style used when this screen is presented modally.
    pub fn set_modal_style(&self, style: ModalStyle) {
        self.inner.modal_style.set(style);
    }

    /// The screen this one is embedded in, if it is still alive.
    pub fn parent(&self) -> Option<Self> {
        self.inner
            .parent
            .borrow()
            .upgrade()
            .map(|inner| Self { inner })
    }

    /// Screens embedded in this one.
    pub fn children(&self) -> Vec<Self> {
        self.inner.children.borrow().clone()
    }

    /// Embed `child` in this screen, recording the relationship on both sides.
    ///
    /// A child that was embedded elsewhere is moved.
    pub fn add_child(&self, child: &Self) {
        if let Some(old) = child.parent() {
            old.inner.children.borrow_mut().retain(|c| c != child);
        }
        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
        self.inner.children.borrow_mut().push(child.clone());
    }
}

impl PartialEq for Screen {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Screen {}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Screen").field(&self.inner.name).finish()
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.name)
    }
}
