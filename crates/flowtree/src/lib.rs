//! flowtree: coordinator trees for screen-based navigation.
//!
//! A [`Flows`] arena holds a tree of flows. Each flow owns a segment of the
//! navigation graph through its [`Coordinator`], shows an initial screen on a
//! navigation [`Surface`] according to its [`Presentation`], and is torn down
//! either explicitly or when the host reports that the user navigated back
//! past that screen.
//!
//! # Quick Start
//!
//! - Register the host's stack with [`Flows::add_surface`].
//! - Describe a flow with [`Spawn`] and create it with [`Flows::launch`].
//! - Forward the surface's "did show" events to [`Flows::did_show`].
//!
//! # Module Organization
//!
//! - [`dump`] - Debug rendering of a flow tree
//! - [`testing`] - In-memory collaborators for tests

#![warn(missing_docs)]

/// Coordinator trait and dependency bag.
mod coordinator;
/// Tree access for running coordinators.
mod context;
/// Debug tree dumps.
pub mod dump;
/// Error types.
pub mod error;
/// Flow data.
mod flow;
/// The flow arena.
mod flows;
/// Container geometry.
pub mod geom;
/// Host collaborators.
mod host;
/// Flow and surface ids.
mod id;
/// Flow names.
mod name;
/// Presentation dispatch.
mod presentation;
/// Screen handles.
mod screen;
/// Flow construction.
mod spawn;
/// The navigation surface collaborator.
mod surface;
/// In-memory collaborators for tests.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::Context;
pub use coordinator::{Coordinator, Dependencies};
pub use error::{Error, Result};
pub use flow::{Flow, FlowState};
pub use flows::Flows;
pub use host::{Container, Presenter, Window};
pub use id::{FlowId, SurfaceId};
pub use name::FlowName;
pub use presentation::{CustomShow, Presentation};
pub use screen::{ModalStyle, Resizing, Screen};
pub use spawn::{OnStopped, Spawn};
pub use surface::{Completion, Surface, Transition};
