use std::{any::Any, collections::HashSet, mem, rc::Rc};

use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::{
    context::{Context, FlowContext},
    coordinator::{Coordinator, Dependencies},
    error::{Error, Result},
    flow::{Flow, FlowState},
    id::{FlowId, SurfaceId},
    screen::Screen,
    spawn::{OnStopped, Spawn},
    surface::{Completion, Surface, Transition},
};

/// A registered surface and the flows listening to its transitions.
struct SurfaceSlot {
    /// The host surface.
    surface: Box<dyn Surface>,
    /// Flows bound to this surface, in creation order.
    listeners: Vec<FlowId>,
    /// Registered by a flow rather than the host. Released when its last
    /// listener stops.
    forked: bool,
}

/// The coordinator tree: an arena of flows plus the surfaces they drive.
///
/// All operations are expected to run on the host's UI thread; the arena is
/// `!Send`.
pub struct Flows {
    /// Flow storage arena.
    flows: SlotMap<FlowId, Flow>,
    /// Registered surfaces.
    surfaces: SlotMap<SurfaceId, SurfaceSlot>,
    /// Shared dependency bag.
    deps: Rc<dyn Dependencies>,
}

impl Default for Flows {
    fn default() -> Self {
        Self::new(())
    }
}

impl Flows {
    /// Construct an empty tree sharing `deps` with every flow.
    pub fn new(deps: impl Dependencies) -> Self {
        Self {
            flows: SlotMap::with_key(),
            surfaces: SlotMap::with_key(),
            deps: Rc::new(deps),
        }
    }

    /// The shared dependency bag.
    pub fn deps(&self) -> Rc<dyn Dependencies> {
        Rc::clone(&self.deps)
    }

    /// Register a surface. Flows bound to it are registered as its listeners
    /// when they are created.
    pub fn add_surface(&mut self, surface: impl Surface) -> SurfaceId {
        self.add_surface_boxed(Box::new(surface))
    }

    /// Register a boxed surface.
    pub fn add_surface_boxed(&mut self, surface: Box<dyn Surface>) -> SurfaceId {
        self.insert_surface(surface, false)
    }

    /// Register a surface forked off for a child flow's own stack. Unlike
    /// host surfaces, a fork is dropped as soon as the last flow listening to
    /// it has stopped.
    pub fn fork_surface(&mut self, surface: Box<dyn Surface>) -> SurfaceId {
        self.insert_surface(surface, true)
    }

    /// Unregister a surface and hand it back. Fails while flows still listen
    /// to it.
    pub fn remove_surface(&mut self, id: SurfaceId) -> Result<Box<dyn Surface>> {
        let slot = self.surfaces.get(id).ok_or(Error::SurfaceNotFound(id))?;
        if !slot.listeners.is_empty() {
            return Err(Error::SurfaceInUse(id));
        }
        let slot = self.surfaces.remove(id).ok_or(Error::SurfaceNotFound(id))?;
        debug!(surface = ?id, "surface removed");
        Ok(slot.surface)
    }

    /// Number of registered surfaces.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Store a surface slot.
    fn insert_surface(&mut self, surface: Box<dyn Surface>, forked: bool) -> SurfaceId {
        let id = self.surfaces.insert(SurfaceSlot {
            surface,
            listeners: Vec::new(),
            forked,
        });
        debug!(surface = ?id, forked, "surface registered");
        id
    }

    /// Borrow a registered surface.
    pub fn surface(&self, id: SurfaceId) -> Option<&dyn Surface> {
        self.surfaces.get(id).map(|slot| slot.surface.as_ref())
    }

    /// Borrow a registered surface as its concrete type.
    pub fn surface_as<S: Surface>(&self, id: SurfaceId) -> Option<&S> {
        let surface: &dyn Any = self.surfaces.get(id)?.surface.as_ref();
        surface.downcast_ref()
    }

    /// Flows listening to a surface, in creation order.
    pub fn listeners(&self, id: SurfaceId) -> &[FlowId] {
        self.surfaces
            .get(id)
            .map(|slot| slot.listeners.as_slice())
            .unwrap_or_default()
    }

    /// Return a flow's data.
    pub fn flow(&self, id: FlowId) -> Option<&Flow> {
        self.flows.get(id)
    }

    /// Is the flow alive?
    pub fn contains(&self, id: FlowId) -> bool {
        self.flows.contains_key(id)
    }

    /// Number of live flows.
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Are there no live flows?
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Live flows without a parent.
    pub fn roots(&self) -> Vec<FlowId> {
        self.flows
            .iter()
            .filter(|(_, flow)| flow.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// Return a flow's parent.
    pub fn parent(&self, id: FlowId) -> Option<FlowId> {
        self.flows.get(id).and_then(|flow| flow.parent)
    }

    /// Return a flow's children in creation order.
    pub fn children(&self, id: FlowId) -> &[FlowId] {
        self.flows
            .get(id)
            .map(|flow| flow.children.as_slice())
            .unwrap_or_default()
    }

    /// Return a flow's initial screen, once shown.
    pub fn initial_screen(&self, id: FlowId) -> Option<&Screen> {
        self.flows.get(id).and_then(|flow| flow.initial.as_ref())
    }

    /// Return the surface a flow drives.
    pub fn surface_of(&self, id: FlowId) -> Option<SurfaceId> {
        self.flows.get(id).map(|flow| flow.surface)
    }

    /// Borrow a flow's coordinator as its concrete type. `None` if the flow is
    /// gone, the coordinator is running, or the type does not match.
    pub fn coordinator<C: Coordinator>(&self, id: FlowId) -> Option<&C> {
        let coordinator: &dyn Any = self.flows.get(id)?.coordinator.as_deref()?;
        coordinator.downcast_ref()
    }

    /// Create a detached flow from `spawn` and register it as a listener on
    /// its surface.
    pub fn create(&mut self, spawn: Spawn) -> Result<FlowId> {
        let Spawn {
            surface,
            presentation,
            coordinator,
            on_stopped,
        } = spawn;
        if !self.surfaces.contains_key(surface) {
            return Err(Error::SurfaceNotFound(surface));
        }
        let name = coordinator.name();
        let id = self.flows.insert(Flow {
            coordinator: Some(coordinator),
            name,
            parent: None,
            children: Vec::new(),
            presentation,
            surface,
            initial: None,
            on_stopped,
            state: FlowState::Idle,
        });
        self.surfaces[surface].listeners.push(id);
        debug!(
            flow = ?id,
            name = %self.flows[id].name,
            presentation = self.flows[id].presentation.kind(),
            surface = ?surface,
            "flow created"
        );
        Ok(id)
    }

    /// Call `factory` with the parent's surface and create the flow it
    /// describes. The new flow is not attached; see [`Flows::add_child`].
    pub fn create_child(
        &mut self,
        parent: FlowId,
        factory: impl FnOnce(SurfaceId) -> Spawn,
    ) -> Result<FlowId> {
        let surface = self
            .surface_of(parent)
            .ok_or(Error::FlowNotFound(parent))?;
        self.create(factory(surface))
    }

    /// Create a flow, attach it under `parent` if given, and start it.
    pub fn launch(&mut self, parent: Option<FlowId>, spawn: Spawn) -> Result<FlowId> {
        let id = self.create(spawn)?;
        if let Some(parent) = parent {
            self.add_child(parent, id)?;
        }
        self.start(id)?;
        Ok(id)
    }

    /// Set or replace a flow's teardown callback.
    pub fn when_stopped(&mut self, id: FlowId, f: impl FnOnce(FlowId) + 'static) -> Result<()> {
        let flow = self.flows.get_mut(id).ok_or(Error::FlowNotFound(id))?;
        flow.on_stopped = Some(Box::new(f) as OnStopped);
        Ok(())
    }

    /// Append `child` to `parent`'s children.
    pub fn add_child(&mut self, parent: FlowId, child: FlowId) -> Result<()> {
        let parent_state = self
            .flows
            .get(parent)
            .ok_or(Error::FlowNotFound(parent))?
            .state;
        let child_parent = self
            .flows
            .get(child)
            .ok_or(Error::FlowNotFound(child))?
            .parent;
        if parent_state == FlowState::Stopping {
            return Err(Error::Stopping(parent));
        }
        if child_parent.is_some() {
            return Err(Error::AlreadyAttached(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }

        self.flows[child].parent = Some(parent);
        self.flows[parent].children.push(child);
        trace!(parent = ?parent, child = ?child, "child attached");
        self.ensure_invariants();
        Ok(())
    }

    /// Remove `child` from `parent`'s children by identity. A no-op if it is
    /// not a child of `parent`.
    pub fn remove_child(&mut self, parent: FlowId, child: FlowId) -> Result<()> {
        let node = self
            .flows
            .get_mut(parent)
            .ok_or(Error::FlowNotFound(parent))?;
        let Some(pos) = node.children.iter().position(|id| *id == child) else {
            trace!(parent = ?parent, child = ?child, "remove_child: not a child");
            return Ok(());
        };
        node.children.remove(pos);
        if let Some(node) = self.flows.get_mut(child)
            && node.parent == Some(parent)
        {
            node.parent = None;
        }
        trace!(parent = ?parent, child = ?child, "child removed");
        self.ensure_invariants();
        Ok(())
    }

    /// Run the flow's [`Coordinator::start`].
    pub fn start(&mut self, id: FlowId) -> Result<()> {
        debug!(flow = ?id, "starting");
        self.with_coordinator(id, |coordinator, ctx| coordinator.start(ctx))??;
        if let Some(flow) = self.flows.get_mut(id)
            && flow.state == FlowState::Idle
        {
            flow.state = FlowState::Started;
        }
        Ok(())
    }

    /// Tear a flow down.
    ///
    /// In order: stop every child depth-first in child order, clear the child
    /// list, run [`Coordinator::stopped`], run the `when_stopped` callback,
    /// then unlink from the parent. The flow then leaves the arena and stops
    /// listening to its surface; a forked surface with no listeners left is
    /// released. Stopping a flow that is already stopping or gone is a no-op.
    ///
    /// Teardown always runs to completion. The first error raised by a
    /// coordinator hook in the subtree is returned afterwards.
    pub fn stop(&mut self, id: FlowId) -> Result<()> {
        let Some(flow) = self.flows.get_mut(id) else {
            trace!(flow = ?id, "stop: flow already gone");
            return Ok(());
        };
        if flow.state == FlowState::Stopping {
            trace!(flow = ?id, "stop: already stopping");
            return Ok(());
        }
        flow.state = FlowState::Stopping;
        debug!(flow = ?id, name = %flow.name, "stopping");

        let mut result = Ok(());
        let children = flow.children.clone();
        for child in children {
            let stopped = self.stop(child);
            if result.is_ok() {
                result = stopped;
            }
        }

        // Children still listed are mid-teardown further up the stack.
        let remaining = self
            .flows
            .get_mut(id)
            .map(|flow| mem::take(&mut flow.children))
            .unwrap_or_default();
        for child in remaining {
            if let Some(child) = self.flows.get_mut(child) {
                child.parent = None;
            }
        }
        if self.flows.get(id).is_some_and(|flow| flow.coordinator.is_some()) {
            let hook = self.with_coordinator(id, |coordinator, ctx| coordinator.stopped(ctx))?;
            if result.is_ok() {
                result = hook;
            }
        } else {
            trace!(flow = ?id, "stop: coordinator is running, skipping its hook");
        }

        let flow = self.flows.get_mut(id).ok_or(Error::FlowNotFound(id))?;
        let on_stopped = flow.on_stopped.take();
        let parent = flow.parent;
        let surface = flow.surface;
        if let Some(on_stopped) = on_stopped {
            on_stopped(id);
        }
        if let Some(parent) = parent {
            self.remove_child(parent, id)?;
        }

        if let Some(slot) = self.surfaces.get_mut(surface) {
            slot.listeners.retain(|listener| *listener != id);
            if slot.forked && slot.listeners.is_empty() {
                self.surfaces.remove(surface);
                debug!(surface = ?surface, "forked surface released");
            }
        }
        self.flows.remove(id);
        debug!(flow = ?id, "stopped");
        self.ensure_invariants();
        result
    }

    /// Record `screen` as the flow's initial screen and display it according
    /// to the flow's presentation.
    pub fn set_initial(
        &mut self,
        id: FlowId,
        screen: Screen,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<()> {
        let flow = self.flows.get_mut(id).ok_or(Error::FlowNotFound(id))?;
        if flow.initial.is_some() {
            return Err(Error::InitialScreenSet(id));
        }
        let slot = self
            .surfaces
            .get_mut(flow.surface)
            .ok_or(Error::SurfaceNotFound(flow.surface))?;
        flow.initial = Some(screen.clone());
        debug!(
            flow = ?id,
            screen = %screen,
            presentation = flow.presentation.kind(),
            "showing initial screen"
        );
        flow.presentation.show(
            flow.surface,
            slot.surface.as_mut(),
            screen,
            animated,
            completion,
        );
        Ok(())
    }

    /// Push a screen onto the flow's surface.
    pub fn push(&mut self, id: FlowId, screen: Screen, animated: bool) -> Result<()> {
        let surface = self.surface_mut_of(id)?;
        surface.push(screen, animated);
        Ok(())
    }

    /// Pop the flow's surface back to its bottom screen.
    pub fn pop_to_root(&mut self, id: FlowId, animated: bool) -> Result<()> {
        let surface = self.surface_mut_of(id)?;
        surface.pop_to_root(animated);
        Ok(())
    }

    /// Handle a surface's "did show" event.
    ///
    /// When the transition's source screen is no longer on the surface's
    /// stack it was popped, possibly by a user gesture. Every flow listening
    /// on the surface whose initial screen is that source is stopped. Returns
    /// the stopped flows.
    pub fn did_show(&mut self, surface: SurfaceId, transition: &Transition) -> Result<Vec<FlowId>> {
        let slot = self
            .surfaces
            .get(surface)
            .ok_or(Error::SurfaceNotFound(surface))?;
        let Some(from) = &transition.from else {
            trace!(surface = ?surface, shown = %transition.shown, "did_show: no source screen");
            return Ok(Vec::new());
        };
        if slot.surface.contains(from) {
            trace!(surface = ?surface, from = %from, "did_show: forward transition");
            return Ok(Vec::new());
        }

        let popped: Vec<FlowId> = slot
            .listeners
            .iter()
            .copied()
            .filter(|id| {
                self.flows
                    .get(*id)
                    .is_some_and(|flow| flow.initial.as_ref() == Some(from))
            })
            .collect();

        let mut stopped = Vec::with_capacity(popped.len());
        for id in popped {
            if self
                .flows
                .get(id)
                .is_some_and(|flow| flow.state != FlowState::Stopping)
            {
                debug!(flow = ?id, screen = %from, "initial screen popped");
                self.stop(id)?;
                stopped.push(id);
            }
        }
        Ok(stopped)
    }

    /// Borrow the surface a flow drives.
    fn surface_mut_of(&mut self, id: FlowId) -> Result<&mut dyn Surface> {
        let surface = self
            .flows
            .get(id)
            .ok_or(Error::FlowNotFound(id))?
            .surface;
        let slot = self
            .surfaces
            .get_mut(surface)
            .ok_or(Error::SurfaceNotFound(surface))?;
        Ok(slot.surface.as_mut())
    }

    /// Take the coordinator out of its slot, run `f` with a context for the
    /// flow, and put the coordinator back if the flow still exists.
    fn with_coordinator<R>(
        &mut self,
        id: FlowId,
        f: impl FnOnce(&mut dyn Coordinator, &mut dyn Context) -> R,
    ) -> Result<R> {
        let flow = self.flows.get_mut(id).ok_or(Error::FlowNotFound(id))?;
        let surface = flow.surface;
        let mut coordinator = flow
            .coordinator
            .take()
            .ok_or(Error::ReentrantCoordinator(id))?;
        let out = {
            let mut ctx = FlowContext::new(self, id, surface);
            f(coordinator.as_mut(), &mut ctx)
        };
        if let Some(flow) = self.flows.get_mut(id) {
            flow.coordinator = Some(coordinator);
        }
        Ok(out)
    }

    /// Is `ancestor` on the parent chain of `node`?
    fn is_ancestor(&self, ancestor: FlowId, node: FlowId) -> bool {
        let mut current = self.flows.get(node).and_then(|flow| flow.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.flows.get(id).and_then(|flow| flow.parent);
        }
        false
    }

    /// Check structural invariants in debug builds.
    fn ensure_invariants(&self) {
        if cfg!(debug_assertions) {
            self.debug_assert_tree_invariants();
        }
    }

    /// Assert parent/child and listener links.
    fn debug_assert_tree_invariants(&self) {
        for (id, flow) in &self.flows {
            let mut seen = HashSet::with_capacity(flow.children.len());
            for child in &flow.children {
                debug_assert!(seen.insert(*child), "duplicate child {child:?} under {id:?}");
                debug_assert!(
                    self.flows.get(*child).is_some_and(|c| c.parent == Some(id)),
                    "child {child:?} parent mismatch under {id:?}"
                );
            }
            if let Some(parent) = flow.parent {
                debug_assert!(
                    self.flows
                        .get(parent)
                        .is_some_and(|p| p.children.contains(&id)),
                    "parent {parent:?} missing child {id:?}"
                );
            }
            debug_assert!(
                self.surfaces
                    .get(flow.surface)
                    .is_some_and(|slot| slot.listeners.contains(&id)),
                "flow {id:?} is not listening to its surface"
            );
        }
    }
}
