use std::{cell::RefCell, rc::Rc};

use crate::{
    context::Context,
    coordinator::Coordinator,
    error::Result,
    id::SurfaceId,
    name::FlowName,
    presentation::Presentation,
    screen::Screen,
    spawn::Spawn,
};

/// Shared, ordered record of lifecycle events.
pub type Journal = Rc<RefCell<Vec<String>>>;

/// A coordinator that records `start` and teardown in a [`Journal`] and
/// optionally shows an initial screen.
pub struct Probe {
    /// Label used in the journal and as the flow name.
    label: String,
    /// Shared journal.
    journal: Journal,
    /// Screen shown on start, if any.
    screen: Option<Screen>,
}

impl Probe {
    /// A probe that shows nothing on start.
    pub fn new(label: &str, journal: &Journal) -> Self {
        Self {
            label: label.into(),
            journal: Rc::clone(journal),
            screen: None,
        }
    }

    /// Show `screen` as the initial screen on start.
    pub fn showing(mut self, screen: Screen) -> Self {
        self.screen = Some(screen);
        self
    }

    /// Describe a flow for this probe that journals `stopped <label>` when
    /// it tears down.
    pub fn spawn(self, surface: SurfaceId, presentation: Presentation) -> Spawn {
        let journal = Rc::clone(&self.journal);
        let label = self.label.clone();
        Spawn::new(surface, presentation, self)
            .when_stopped(move |_| journal.borrow_mut().push(format!("stopped {label}")))
    }
}

impl Coordinator for Probe {
    fn start(&mut self, ctx: &mut dyn Context) -> Result<()> {
        self.journal
            .borrow_mut()
            .push(format!("start {}", self.label));
        if let Some(screen) = self.screen.clone() {
            ctx.set_initial(screen, true, None)?;
        }
        Ok(())
    }

    fn name(&self) -> FlowName {
        FlowName::convert(&self.label)
    }
}
