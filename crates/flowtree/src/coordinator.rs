//! The behaviour trait attached to every flow.

use std::any::{Any, type_name};

use crate::{context::Context, error::Result, name::FlowName};

/// Opaque, read-only capabilities shared by every flow in a tree.
pub trait Dependencies: Any {}

impl Dependencies for () {}

impl dyn Dependencies {
    /// Downcast to the concrete dependency type.
    pub fn downcast_ref<T: Dependencies>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref()
    }
}

/// Coordinators own a segment of the navigation graph.
///
/// The tree only ever talks to flows through this trait. Every coordinator
/// decides what its first screen is, so `start` has no default.
pub trait Coordinator: Any {
    /// Show the flow's initial screen, usually through
    /// [`Context::set_initial`], and spawn any children the flow starts with.
    fn start(&mut self, ctx: &mut dyn Context) -> Result<()>;

    /// Release whatever the coordinator itself put on display, such as a
    /// modal it presented. Runs once during teardown, after every child has
    /// stopped and before the `when_stopped` callback. The flow is already
    /// stopping, so it cannot take new children.
    fn stopped(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// Name used in logs and dumps.
    fn name(&self) -> FlowName {
        FlowName::of_type(type_name::<Self>())
    }
}
