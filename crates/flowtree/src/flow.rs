use crate::{
    coordinator::Coordinator,
    id::{FlowId, SurfaceId},
    name::FlowName,
    presentation::Presentation,
    screen::Screen,
    spawn::OnStopped,
};

/// Lifecycle marker for a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Created, not yet started.
    Idle,
    /// `start` has run.
    Started,
    /// Teardown is in progress. The flow leaves the arena when it finishes.
    Stopping,
}

/// Flow data stored in the arena.
pub struct Flow {
    /// Coordinator behaviour. Empty while the coordinator is running.
    pub(crate) coordinator: Option<Box<dyn Coordinator>>,
    /// Cached coordinator name.
    pub(crate) name: FlowName,

    /// Parent in the arena tree. Never keeps the parent alive.
    pub(crate) parent: Option<FlowId>,
    /// Children in creation order.
    pub(crate) children: Vec<FlowId>,

    /// How the initial screen is shown.
    pub(crate) presentation: Presentation,
    /// Surface this flow drives.
    pub(crate) surface: SurfaceId,
    /// First screen the flow displayed. Set at most once.
    pub(crate) initial: Option<Screen>,

    /// Teardown callback.
    pub(crate) on_stopped: Option<OnStopped>,
    /// Lifecycle marker.
    pub(crate) state: FlowState,
}

impl Flow {
    /// Return the coordinator's name.
    pub fn name(&self) -> &FlowName {
        &self.name
    }

    /// Return the flow's parent, if any.
    pub fn parent(&self) -> Option<FlowId> {
        self.parent
    }

    /// Return the flow's children.
    pub fn children(&self) -> &[FlowId] {
        &self.children
    }

    /// Return the presentation the flow was created with.
    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Return the surface the flow drives.
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Return the initial screen, once shown.
    pub fn initial_screen(&self) -> Option<&Screen> {
        self.initial.as_ref()
    }

    /// Return the lifecycle state.
    pub fn state(&self) -> FlowState {
        self.state
    }
}
