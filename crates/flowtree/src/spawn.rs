use crate::{
    coordinator::Coordinator,
    id::{FlowId, SurfaceId},
    presentation::Presentation,
};

/// Callback invoked once at the end of a flow's own teardown.
pub type OnStopped = Box<dyn FnOnce(FlowId)>;

/// Everything needed to create a flow.
///
/// ```ignore
/// let id = flows.create(
///     Spawn::new(surface, Presentation::Push, Checkout::new())
///         .when_stopped(|id| tracing::info!(?id, "checkout done")),
/// )?;
/// ```
pub struct Spawn {
    /// Surface the flow drives.
    pub(crate) surface: SurfaceId,
    /// How the flow's initial screen is shown.
    pub(crate) presentation: Presentation,
    /// Flow behaviour.
    pub(crate) coordinator: Box<dyn Coordinator>,
    /// Teardown callback.
    pub(crate) on_stopped: Option<OnStopped>,
}

impl Spawn {
    /// Describe a flow bound to `surface`.
    pub fn new(
        surface: SurfaceId,
        presentation: Presentation,
        coordinator: impl Coordinator,
    ) -> Self {
        Self::new_boxed(surface, presentation, Box::new(coordinator))
    }

    /// Describe a flow with an already boxed coordinator.
    pub fn new_boxed(
        surface: SurfaceId,
        presentation: Presentation,
        coordinator: Box<dyn Coordinator>,
    ) -> Self {
        Self {
            surface,
            presentation,
            coordinator,
            on_stopped: None,
        }
    }

    /// Run `f` with the flow's id once the flow has torn down, before it is
    /// unlinked from its parent.
    pub fn when_stopped(mut self, f: impl FnOnce(FlowId) + 'static) -> Self {
        self.on_stopped = Some(Box::new(f));
        self
    }

    /// The surface the flow will drive.
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }
}
