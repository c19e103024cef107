//! Host collaborators used by the non-stack presentations.

use crate::{
    geom::Rect,
    id::SurfaceId,
    screen::{Resizing, Screen},
    surface::Surface,
};

/// Displays a whole surface on top of a foreign context.
pub trait Presenter {
    /// Show `surface`. The surface has already been set up to show the flow's
    /// initial screen.
    fn present(&self, id: SurfaceId, surface: &mut dyn Surface, animated: bool);
}

/// An application window that can host a root screen.
pub trait Window {
    /// Make `screen` the window's root.
    fn set_root(&self, screen: Screen);

    /// Make the window the key window and show it.
    fn make_key_and_visible(&self);
}

/// A region of a parent screen that embedded screens are placed into.
pub trait Container {
    /// The container's bounds, in its own coordinates.
    fn bounds(&self) -> Rect;

    /// Place `screen` in the container with the given frame and resizing behaviour.
    fn add_subview(&self, screen: Screen, frame: Rect, resizing: Resizing);
}
