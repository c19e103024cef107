use std::{io, result::Result as StdResult};

use thiserror::Error;

use crate::id::{FlowId, SurfaceId};

/// Result type for flowtree operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors raised by misuse of the flow arena.
///
/// Programming errors in coordinator implementations, such as a custom
/// presentation without a display override, panic instead.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The flow id does not refer to a live flow.
    #[error("flow not found: {0:?}")]
    FlowNotFound(FlowId),

    /// The surface id does not refer to a registered surface.
    #[error("surface not found: {0:?}")]
    SurfaceNotFound(SurfaceId),

    /// The flow already has a parent.
    #[error("flow already attached: {0:?}")]
    AlreadyAttached(FlowId),

    /// Attaching the child would make a flow its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Requested parent.
        parent: FlowId,
        /// Requested child.
        child: FlowId,
    },

    /// The flow's coordinator is currently running and cannot be re-entered.
    #[error("coordinator is already running: {0:?}")]
    ReentrantCoordinator(FlowId),

    /// The flow's initial screen has already been recorded.
    #[error("initial screen already set: {0:?}")]
    InitialScreenSet(FlowId),

    /// The flow is tearing down and cannot take new children.
    #[error("flow is stopping: {0:?}")]
    Stopping(FlowId),

    /// The surface still has flows listening to it.
    #[error("surface in use: {0:?}")]
    SurfaceInUse(SurfaceId),

    /// Writing diagnostic output failed.
    #[error("io: {0}")]
    Io(String),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
