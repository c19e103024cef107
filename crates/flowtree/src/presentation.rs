//! The closed set of ways a flow's initial screen is shown.

use std::{fmt, rc::Rc};

use tracing::trace;

use crate::{
    host::{Container, Presenter, Window},
    id::SurfaceId,
    screen::{ModalStyle, Resizing, Screen},
    surface::{Completion, Surface},
};

/// Display routine for [`Presentation::Custom`]. Receives the flow's surface,
/// the initial screen, the animation flag and the caller's completion.
pub type CustomShow = Rc<dyn Fn(&mut dyn Surface, Screen, bool, Option<Completion>)>;

/// How a flow first puts its initial screen on display. Fixed when the flow
/// is created.
#[derive(Clone)]
pub enum Presentation {
    /// Push onto the flow's surface.
    Push,
    /// Present modally over the flow's surface.
    Present(ModalStyle),
    /// Make the flow's whole surface show only the initial screen, then hand
    /// the surface to an external presenter. Used when a flow's stack has to
    /// appear over a foreign context, so the flow is normally created on a
    /// freshly registered surface.
    PresentWith {
        /// Presenter that displays the surface.
        presenter: Rc<dyn Presenter>,
        /// Modal style applied to the surface.
        style: ModalStyle,
    },
    /// Embed inside a parent screen, filling a container.
    Embed {
        /// Screen that adopts the initial screen.
        parent: Screen,
        /// Region the initial screen fills.
        container: Rc<dyn Container>,
    },
    /// Become a window's root screen.
    Root(Rc<dyn Window>),
    /// Display through a routine supplied with the flow. The routine runs
    /// inside `set_initial`, before it returns, and owns the completion.
    Custom(CustomShow),
}

impl Presentation {
    /// A custom presentation running `show`.
    pub fn custom(
        show: impl Fn(&mut dyn Surface, Screen, bool, Option<Completion>) + 'static,
    ) -> Self {
        Self::Custom(Rc::new(show))
    }

    /// Short name for logs and dumps.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Present(_) => "present",
            Self::PresentWith { .. } => "present_with",
            Self::Embed { .. } => "embed",
            Self::Root(_) => "root",
            Self::Custom(_) => "custom",
        }
    }

    /// Dispatch exactly one display action for `screen`.
    ///
    /// Completion timing differs by variant: `Push`, `Embed` and `Root` call it
    /// synchronously, `Present` hands it to the surface, and `PresentWith`
    /// drops it uncalled because the presenter owns the transition. `Custom`
    /// hands it to the display routine.
    pub(crate) fn show(
        &self,
        id: SurfaceId,
        surface: &mut dyn Surface,
        screen: Screen,
        animated: bool,
        completion: Option<Completion>,
    ) {
        match self {
            Self::Push => {
                surface.push(screen, animated);
                if let Some(completion) = completion {
                    completion();
                }
            }
            Self::Present(style) => {
                screen.set_modal_style(*style);
                surface.present(screen, animated, completion);
            }
            Self::PresentWith { presenter, style } => {
                surface.set_stack(vec![screen], true);
                surface.set_modal_style(*style);
                presenter.present(id, surface, true);
                if completion.is_some() {
                    trace!(surface = ?id, "completion is not tracked for present_with");
                }
            }
            Self::Embed { parent, container } => {
                parent.add_child(&screen);
                container.add_subview(screen, container.bounds(), Resizing::Flexible);
                if let Some(completion) = completion {
                    completion();
                }
            }
            Self::Root(window) => {
                window.set_root(screen);
                window.make_key_and_visible();
                if let Some(completion) = completion {
                    completion();
                }
            }
            Self::Custom(show) => show(surface, screen, animated, completion),
        }
    }
}

impl fmt::Debug for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(style) => f.debug_tuple("Present").field(style).finish(),
            Self::PresentWith { style, .. } => f
                .debug_struct("PresentWith")
                .field("style", style)
                .finish_non_exhaustive(),
            Self::Embed { parent, .. } => f
                .debug_struct("Embed")
                .field("parent", parent)
                .finish_non_exhaustive(),
            Self::Push => f.write_str("Push"),
            Self::Root(_) => f.write_str("Root"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}
