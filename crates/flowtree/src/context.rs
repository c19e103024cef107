use std::rc::Rc;

use crate::{
    Flows,
    coordinator::Dependencies,
    error::Result,
    id::{FlowId, SurfaceId},
    screen::Screen,
    spawn::Spawn,
    surface::{Completion, Surface},
};

/// Tree access available to a coordinator while it runs.
///
/// Every operation acts on behalf of the flow that owns the running
/// coordinator unless it takes an explicit id.
pub trait Context {
    /// The flow whose coordinator is running.
    fn flow_id(&self) -> FlowId;

    /// The surface this flow drives.
    fn surface_id(&self) -> SurfaceId;

    /// The shared dependency bag.
    fn deps(&self) -> Rc<dyn Dependencies>;

    /// The flow's parent, if any.
    fn parent(&self) -> Option<FlowId>;

    /// The flow's children in creation order.
    fn children(&self) -> Vec<FlowId>;

    /// Record the initial screen and display it per the flow's presentation.
    fn set_initial(
        &mut self,
        screen: Screen,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<()>;

    /// Push a screen onto this flow's surface.
    fn push(&mut self, screen: Screen, animated: bool) -> Result<()>;

    /// Pop this flow's surface back to its bottom screen.
    fn pop_to_root(&mut self, animated: bool) -> Result<()>;

    /// Register a new surface for children that need their own stack. The
    /// surface is released when the last flow on it stops.
    fn fork_surface(&mut self, surface: Box<dyn Surface>) -> SurfaceId;

    /// Create a detached flow.
    fn create(&mut self, spawn: Spawn) -> Result<FlowId>;

    /// Attach a flow as a child of this flow.
    fn add_child(&mut self, child: FlowId) -> Result<()>;

    /// Remove a child of this flow. A no-op if it is not a child.
    fn remove_child(&mut self, child: FlowId) -> Result<()>;

    /// Start a flow.
    fn start_flow(&mut self, id: FlowId) -> Result<()>;

    /// Stop a flow and its subtree.
    fn stop_flow(&mut self, id: FlowId) -> Result<()>;

    /// Stop this flow.
    fn stop(&mut self) -> Result<()> {
        let id = self.flow_id();
        self.stop_flow(id)
    }
}

impl dyn Context + '_ {
    /// Build a flow on this flow's surface with `factory` without attaching it.
    pub fn create_child(&mut self, factory: impl FnOnce(SurfaceId) -> Spawn) -> Result<FlowId> {
        let spawn = factory(self.surface_id());
        self.create(spawn)
    }

    /// Create a flow, attach it as a child of this flow, and start it.
    pub fn launch_child(&mut self, spawn: Spawn) -> Result<FlowId> {
        let child = self.create(spawn)?;
        self.add_child(child)?;
        self.start_flow(child)?;
        Ok(child)
    }
}

/// [`Context`] implementation backed by the arena.
pub struct FlowContext<'a> {
    /// Arena being operated on.
    flows: &'a mut Flows,
    /// Flow whose coordinator is running.
    id: FlowId,
    /// Surface cached at construction.
    surface: SurfaceId,
}

impl<'a> FlowContext<'a> {
    /// Construct a context for a flow whose surface is already known.
    pub(crate) fn new(flows: &'a mut Flows, id: FlowId, surface: SurfaceId) -> Self {
        Self { flows, id, surface }
    }
}

impl Context for FlowContext<'_> {
    fn flow_id(&self) -> FlowId {
        self.id
    }

    fn surface_id(&self) -> SurfaceId {
        self.surface
    }

    fn deps(&self) -> Rc<dyn Dependencies> {
        self.flows.deps()
    }

    fn parent(&self) -> Option<FlowId> {
        self.flows.flow(self.id).and_then(|flow| flow.parent())
    }

    fn children(&self) -> Vec<FlowId> {
        self.flows
            .flow(self.id)
            .map(|flow| flow.children().to_vec())
            .unwrap_or_default()
    }

    fn set_initial(
        &mut self,
        screen: Screen,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<()> {
        self.flows.set_initial(self.id, screen, animated, completion)
    }

    fn push(&mut self, screen: Screen, animated: bool) -> Result<()> {
        self.flows.push(self.id, screen, animated)
    }

    fn pop_to_root(&mut self, animated: bool) -> Result<()> {
        self.flows.pop_to_root(self.id, animated)
    }

    fn fork_surface(&mut self, surface: Box<dyn Surface>) -> SurfaceId {
        self.flows.fork_surface(surface)
    }

    fn create(&mut self, spawn: Spawn) -> Result<FlowId> {
        self.flows.create(spawn)
    }

    fn add_child(&mut self, child: FlowId) -> Result<()> {
        self.flows.add_child(self.id, child)
    }

    fn remove_child(&mut self, child: FlowId) -> Result<()> {
        self.flows.remove_child(self.id, child)
    }

    fn start_flow(&mut self, id: FlowId) -> Result<()> {
        self.flows.start(id)
    }

    fn stop_flow(&mut self, id: FlowId) -> Result<()> {
        self.flows.stop(id)
    }
}
