use std::rc::Rc;

use flowtree::{
    Context, Coordinator, Dependencies, FlowName, ModalStyle, Presentation, Result, Screen,
    Spawn, SurfaceId, geom::Rect,
};
use tracing::info;

use crate::host::{LogContainer, LogPresenter, LogSurface, LogWindow};

/// Services shared by every flow in the app.
#[derive(Debug, Clone, Default)]
pub struct AppDeps {
    /// Signed-in user.
    pub user: String,
    /// Has the user finished onboarding?
    pub onboarded: bool,
}

impl Dependencies for AppDeps {}

/// Sections the app flow opens once it has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Settings, in their own forked surface.
    Settings,
    /// The user's profile, presented modally.
    Profile,
    /// A promotional banner embedded in the home screen.
    Banner,
}

/// Host objects the app flow hands out to its children.
#[derive(Clone)]
pub struct Host {
    /// Application window.
    pub window: Rc<LogWindow>,
    /// Presenter for forked surfaces.
    pub presenter: Rc<LogPresenter>,
    /// Banner slot on the home screen.
    pub banner: Rc<LogContainer>,
}

impl Default for Host {
    fn default() -> Self {
        Self {
            window: Rc::default(),
            presenter: Rc::default(),
            banner: Rc::new(LogContainer::new(Rect::new(0, 40, 320, 80))),
        }
    }
}

/// Top-level flow. Owns the window and the main navigation surface.
pub struct AppFlow {
    /// Host collaborators.
    host: Host,
    /// Sections opened on start.
    routes: Vec<Route>,
    /// First screen on the main surface.
    home: Screen,
}

impl AppFlow {
    /// Describe the app flow on the main surface.
    pub fn spawn(surface: SurfaceId, host: Host, routes: Vec<Route>) -> Spawn {
        let window = Rc::clone(&host.window);
        let app = Self {
            host,
            routes,
            home: Screen::new("home"),
        };
        Spawn::new(surface, Presentation::Root(window), app)
    }

    /// Launch the child flow for `route`.
    fn open(&self, ctx: &mut dyn Context, route: Route) -> Result<()> {
        match route {
            Route::Settings => {
                let forked = ctx.fork_surface(Box::new(LogSurface::new("settings")));
                let presenter = Rc::clone(&self.host.presenter);
                ctx.launch_child(SettingsFlow::spawn(forked, presenter))?;
            }
            Route::Profile => {
                let profile = ctx.create_child(ProfileFlow::spawn)?;
                ctx.add_child(profile)?;
                ctx.start_flow(profile)?;
            }
            Route::Banner => {
                let container = Rc::clone(&self.host.banner);
                let parent = self.home.clone();
                let surface = ctx.surface_id();
                ctx.launch_child(Spawn::new(
                    surface,
                    Presentation::Embed { parent, container },
                    BannerFlow,
                ))?;
            }
        }
        Ok(())
    }
}

impl Coordinator for AppFlow {
    fn start(&mut self, ctx: &mut dyn Context) -> Result<()> {
        ctx.set_initial(Screen::new("main"), false, None)?;
        ctx.push(self.home.clone(), false)?;

        let deps = ctx.deps();
        let onboarded = deps
            .downcast_ref::<AppDeps>()
            .is_some_and(|deps| deps.onboarded);
        if !onboarded {
            let surface = ctx.surface_id();
            ctx.launch_child(OnboardingFlow::spawn(surface))?;
        }
        for route in self.routes.clone() {
            self.open(ctx, route)?;
        }
        Ok(())
    }
}

/// Walks a new user through the welcome screens on the main surface.
pub struct OnboardingFlow;

impl OnboardingFlow {
    /// Describe an onboarding flow pushed onto `surface`.
    pub fn spawn(surface: SurfaceId) -> Spawn {
        Spawn::new(surface, Presentation::Push, Self)
            .when_stopped(|id| info!(flow = ?id, "onboarding finished"))
    }
}

impl Coordinator for OnboardingFlow {
    fn start(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let deps = ctx.deps();
        let user = deps
            .downcast_ref::<AppDeps>()
            .map(|deps| deps.user.clone())
            .unwrap_or_default();
        info!(%user, "onboarding");
        ctx.set_initial(Screen::new("welcome"), true, None)
    }
}

/// Settings, shown in a forked surface presented over the app.
pub struct SettingsFlow;

impl SettingsFlow {
    /// Describe a settings flow on the forked `surface`.
    pub fn spawn(surface: SurfaceId, presenter: Rc<LogPresenter>) -> Spawn {
        Spawn::new(
            surface,
            Presentation::PresentWith {
                presenter,
                style: ModalStyle::FormSheet,
            },
            Self,
        )
    }
}

impl Coordinator for SettingsFlow {
    fn start(&mut self, ctx: &mut dyn Context) -> Result<()> {
        ctx.set_initial(Screen::new("settings"), true, None)
    }

    fn name(&self) -> FlowName {
        FlowName::convert("settings")
    }
}

/// The user's profile, presented as a page sheet over the main surface.
pub struct ProfileFlow;

impl ProfileFlow {
    /// Describe a profile flow on `surface`.
    pub fn spawn(surface: SurfaceId) -> Spawn {
        Spawn::new(surface, Presentation::Present(ModalStyle::PageSheet), Self)
    }
}

impl Coordinator for ProfileFlow {
    fn start(&mut self, ctx: &mut dyn Context) -> Result<()> {
        ctx.set_initial(
            Screen::new("profile"),
            true,
            Some(Box::new(|| info!("profile on screen"))),
        )
    }

    fn stopped(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        info!("profile dismissed");
        Ok(())
    }
}

/// A banner embedded in the home screen.
pub struct BannerFlow;

impl Coordinator for BannerFlow {
    fn start(&mut self, ctx: &mut dyn Context) -> Result<()> {
        ctx.set_initial(Screen::new("banner"), false, None)
    }
}
