use anyhow::{Context, Result};
use clap::ValueEnum;
use flowtree::{FlowId, Flows, Screen, SurfaceId};
use tracing::info;

use crate::{
    app::{AppDeps, AppFlow, Host, Route},
    host::{LogSurface, Stack, back_swipe},
};

/// A scripted sequence of user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// A new user pushes a screen inside onboarding, then swipes back to the
    /// welcome screen.
    Onboarding,
    /// A new user swipes back out of onboarding.
    BackSwipe,
    /// Settings open in a forked surface; a swipe inside it keeps the flow.
    Settings,
    /// Every section opens, then the whole app tears down.
    Teardown,
}

/// The state left behind by a scenario.
pub struct Outcome {
    /// The coordinator tree.
    pub flows: Flows,
    /// The app flow.
    pub app: FlowId,
    /// The main navigation surface.
    pub main: SurfaceId,
    /// Stack of the main surface.
    pub stack: Stack,
    /// Host collaborators.
    pub host: Host,
    /// Flows stopped by back navigation during the run.
    pub popped: Vec<FlowId>,
}

impl Outcome {
    /// Start the app with the given dependencies and routes.
    fn boot(deps: AppDeps, routes: Vec<Route>) -> Result<Self> {
        let mut flows = Flows::new(deps);
        let surface = LogSurface::new("main");
        let stack = surface.handle();
        let main = flows.add_surface(surface);
        let host = Host::default();
        let app = flows.launch(None, AppFlow::spawn(main, host.clone(), routes))?;
        Ok(Self {
            flows,
            app,
            main,
            stack,
            host,
            popped: Vec::new(),
        })
    }

    /// The only child of the app flow on `surface`, if any.
    pub fn child_on(&self, surface: SurfaceId) -> Option<FlowId> {
        self.flows
            .children(self.app)
            .iter()
            .copied()
            .find(|id| self.flows.surface_of(*id) == Some(surface))
    }

    /// Swipe back on the surface behind `stack` and let the tree react.
    fn swipe(&mut self, surface: SurfaceId, stack: &Stack) -> Result<()> {
        if let Some(transition) = back_swipe(stack) {
            let stopped = self.flows.did_show(surface, &transition)?;
            info!(stopped = stopped.len(), "transition finished");
            self.popped.extend(stopped);
        }
        Ok(())
    }
}

/// Run a scenario to completion.
pub fn run(scenario: Scenario) -> Result<Outcome> {
    info!(?scenario, "running");
    let new_user = AppDeps {
        user: "ada".into(),
        onboarded: false,
    };
    let returning = AppDeps {
        onboarded: true,
        ..new_user.clone()
    };
    match scenario {
        Scenario::Onboarding => {
            let mut outcome = Outcome::boot(new_user, Vec::new())?;
            let onboarding = outcome.child_on(outcome.main).context("no onboarding flow")?;
            outcome
                .flows
                .push(onboarding, Screen::new("permissions"), true)?;
            // Leaving the inner screen does not end onboarding.
            let stack = outcome.stack.clone();
            outcome.swipe(outcome.main, &stack)?;
            Ok(outcome)
        }
        Scenario::BackSwipe => {
            let mut outcome = Outcome::boot(new_user, Vec::new())?;
            let stack = outcome.stack.clone();
            outcome.swipe(outcome.main, &stack)?;
            Ok(outcome)
        }
        Scenario::Settings => {
            let mut outcome = Outcome::boot(returning, vec![Route::Settings])?;
            let forked = outcome
                .host
                .presenter
                .presented()
                .first()
                .copied()
                .context("settings surface was not presented")?;
            let settings = outcome.child_on(forked).context("no settings flow")?;
            let stack = outcome
                .flows
                .surface_as::<LogSurface>(forked)
                .map(LogSurface::handle)
                .context("settings surface is not a log surface")?;
            outcome.flows.push(settings, Screen::new("notifications"), true)?;
            outcome.swipe(forked, &stack)?;
            Ok(outcome)
        }
        Scenario::Teardown => {
            let mut outcome = Outcome::boot(
                new_user,
                vec![Route::Settings, Route::Profile, Route::Banner],
            )?;
            let app = outcome.app;
            outcome.flows.stop(app)?;
            Ok(outcome)
        }
    }
}
