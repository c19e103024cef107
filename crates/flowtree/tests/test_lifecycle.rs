//! Integration tests for flow creation, attachment and teardown.

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use flowtree::{
        Context, Coordinator, Dependencies, Error, FlowId, Flows, Presentation, Result, Screen,
        Spawn,
        testing::{Journal, Probe, TestPresenter, TestSurface},
    };
    use pretty_assertions::assert_eq;

    /// Snapshot of the journal.
    fn journal_of(journal: &Journal) -> Vec<String> {
        journal.borrow().clone()
    }

    #[test]
    fn stop_unlinks_from_parent() -> Result<()> {
        let journal = Journal::default();
        let mut flows = Flows::default();
        let (home, detail) = (Screen::new("home"), Screen::new("detail"));
        let (_, surface) = TestSurface::with_stack(vec![home, detail]);
        let sid = flows.add_surface(surface);

        let root = flows.launch(None, Probe::new("root", &journal).spawn(sid, Presentation::Push))?;
        let child = flows.launch(
            Some(root),
            Probe::new("child", &journal)
                .showing(Screen::new("child"))
                .spawn(sid, Presentation::Push),
        )?;
        assert_eq!(flows.children(root), &[child]);
        assert_eq!(flows.parent(child), Some(root));

        flows.stop(child)?;
        assert!(flows.children(root).is_empty());
        assert!(!flows.contains(child));
        assert!(flows.children(child).is_empty());
        assert_eq!(
            journal_of(&journal),
            vec!["start root", "start child", "stopped child"]
        );
        Ok(())
    }

    #[test]
    fn stop_cascades_depth_first() -> Result<()> {
        let journal = Journal::default();
        let mut flows = Flows::default();
        let (_, surface) = TestSurface::create();
        let sid = flows.add_surface(surface);

        let launch = |flows: &mut Flows, parent: Option<FlowId>, label: &str| {
            flows.launch(parent, Probe::new(label, &journal).spawn(sid, Presentation::Push))
        };
        let root = launch(&mut flows, None, "root")?;
        let a = launch(&mut flows, Some(root), "a")?;
        launch(&mut flows, Some(a), "a1")?;
        launch(&mut flows, Some(a), "a2")?;
        let b = launch(&mut flows, Some(root), "b")?;
        launch(&mut flows, Some(b), "b1")?;
        journal.borrow_mut().clear();

        flows.stop(root)?;
        assert_eq!(
            journal_of(&journal),
            vec![
                "stopped a1",
                "stopped a2",
                "stopped a",
                "stopped b1",
                "stopped b",
                "stopped root"
            ]
        );
        assert!(flows.is_empty());
        assert!(flows.listeners(sid).is_empty());
        Ok(())
    }

    #[test]
    fn double_stop_is_a_noop() -> Result<()> {
        let journal = Journal::default();
        let mut flows = Flows::default();
        let (_, surface) = TestSurface::create();
        let sid = flows.add_surface(surface);
        let root = flows.launch(None, Probe::new("root", &journal).spawn(sid, Presentation::Push))?;
        let child = flows.launch(
            Some(root),
            Probe::new("child", &journal).spawn(sid, Presentation::Push),
        )?;
        let sibling = flows.launch(
            Some(root),
            Probe::new("sibling", &journal).spawn(sid, Presentation::Push),
        )?;

        flows.stop(child)?;
        flows.stop(child)?;
        assert_eq!(flows.children(root), &[sibling]);
        assert_eq!(
            journal_of(&journal)
                .iter()
                .filter(|l| *l == "stopped child")
                .count(),
            1
        );
        Ok(())
    }

    #[test]
    fn create_child_does_not_attach() -> Result<()> {
        let journal = Journal::default();
        let mut flows = Flows::default();
        let (_, surface) = TestSurface::create();
        let sid = flows.add_surface(surface);
        let root = flows.launch(None, Probe::new("root", &journal).spawn(sid, Presentation::Push))?;

        let child = flows.create_child(root, |surface| {
            Probe::new("child", &journal).spawn(surface, Presentation::Push)
        })?;
        assert_eq!(flows.surface_of(child), Some(sid));
        assert_eq!(flows.parent(child), None);
        assert!(flows.children(root).is_empty());
        assert_eq!(journal_of(&journal), vec!["start root"]);

        flows.add_child(root, child)?;
        assert_eq!(flows.children(root), &[child]);
        assert_eq!(flows.listeners(sid), &[root, child]);
        Ok(())
    }

    #[test]
    fn when_stopped_can_be_set_later() -> Result<()> {
        let mut flows = Flows::default();
        let journal = Journal::default();
        let (_, surface) = TestSurface::create();
        let sid = flows.add_surface(surface);
        let id = flows.create(Spawn::new(
            sid,
            Presentation::Push,
            Probe::new("plain", &journal),
        ))?;
        let seen = Rc::new(RefCell::new(None));
        let s = Rc::clone(&seen);
        flows.when_stopped(id, move |stopped| *s.borrow_mut() = Some(stopped))?;
        flows.stop(id)?;
        assert_eq!(*seen.borrow(), Some(id));
        Ok(())
    }

    /// Builds its children during start, the way app flows do.
    struct Shell {
        /// Shared journal.
        journal: Journal,
    }

    impl Coordinator for Shell {
        fn start(&mut self, ctx: &mut dyn Context) -> Result<()> {
            ctx.set_initial(Screen::new("shell"), false, None)?;
            let journal = Rc::clone(&self.journal);
            let surface = ctx.surface_id();
            ctx.launch_child(
                Probe::new("tabs", &journal)
                    .showing(Screen::new("tabs"))
                    .spawn(surface, Presentation::Push),
            )?;
            let detached = ctx.create_child(|surface| {
                Probe::new("later", &journal).spawn(surface, Presentation::Push)
            })?;
            ctx.add_child(detached)?;
            Ok(())
        }
    }

    #[test]
    fn coordinators_build_children_on_start() -> Result<()> {
        let journal = Journal::default();
        let mut flows = Flows::default();
        let (log, surface) = TestSurface::create();
        let sid = flows.add_surface(surface);
        let shell = flows.launch(
            None,
            Spawn::new(
                sid,
                Presentation::Push,
                Shell {
                    journal: Rc::clone(&journal),
                },
            ),
        )?;

        let children = flows.children(shell).to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(
            flows.flow(children[0]).map(|f| f.name().to_string()),
            Some("tabs".to_string())
        );
        assert_eq!(
            log.borrow().stack.iter().map(|s| s.name()).collect::<Vec<_>>(),
            vec!["shell", "tabs"]
        );
        assert_eq!(journal_of(&journal), vec!["start tabs"]);
        assert!(flows.coordinator::<Shell>(shell).is_some());
        Ok(())
    }

    /// Stops itself as soon as it starts.
    struct Bounce;

    impl Coordinator for Bounce {
        fn start(&mut self, ctx: &mut dyn Context) -> Result<()> {
            ctx.stop()
        }
    }

    #[test]
    fn coordinator_can_stop_itself_during_start() -> Result<()> {
        let mut flows = Flows::default();
        let (_, surface) = TestSurface::create();
        let sid = flows.add_surface(surface);
        let root = flows.launch(None, Spawn::new(sid, Presentation::Push, Bounce))?;
        assert!(!flows.contains(root));
        assert!(flows.is_empty());
        Ok(())
    }

    /// Tries to start itself from inside start.
    struct Recursive;

    impl Coordinator for Recursive {
        fn start(&mut self, ctx: &mut dyn Context) -> Result<()> {
            let id = ctx.flow_id();
            ctx.start_flow(id)
        }
    }

    #[test]
    fn reentrant_start_is_rejected() {
        let mut flows = Flows::default();
        let (_, surface) = TestSurface::create();
        let sid = flows.add_surface(surface);
        let id = flows
            .create(Spawn::new(sid, Presentation::Push, Recursive))
            .unwrap();
        assert_eq!(flows.start(id), Err(Error::ReentrantCoordinator(id)));
        assert!(flows.coordinator::<Recursive>(id).is_some());
    }

    #[test]
    fn initial_screen_is_set_once() -> Result<()> {
        let journal = Journal::default();
        let mut flows = Flows::default();
        let (log, surface) = TestSurface::create();
        let sid = flows.add_surface(surface);
        let first = Screen::new("first");
        let id = flows.launch(
            None,
            Probe::new("p", &journal)
                .showing(first.clone())
                .spawn(sid, Presentation::Push),
        )?;
        assert_eq!(
            flows.set_initial(id, Screen::new("second"), false, None),
            Err(Error::InitialScreenSet(id))
        );
        assert_eq!(flows.initial_screen(id), Some(&first));
        assert_eq!(log.borrow().stack, vec![first]);
        Ok(())
    }

    struct AppDeps {
        /// Signed-in account.
        account: &'static str,
    }

    impl Dependencies for AppDeps {}

    /// Reads the dependency bag on start.
    struct Greeter {
        /// Account seen on start.
        seen: Rc<RefCell<Option<String>>>,
    }

    impl Coordinator for Greeter {
        fn start(&mut self, ctx: &mut dyn Context) -> Result<()> {
            let deps = ctx.deps();
            *self.seen.borrow_mut() = deps
                .downcast_ref::<AppDeps>()
                .map(|d| d.account.to_string());
            Ok(())
        }
    }

    #[test]
    fn dependencies_are_shared() -> Result<()> {
        let mut flows = Flows::new(AppDeps { account: "ada" });
        let (_, surface) = TestSurface::create();
        let sid = flows.add_surface(surface);
        let seen = Rc::new(RefCell::new(None));
        flows.launch(
            None,
            Spawn::new(
                sid,
                Presentation::Push,
                Greeter {
                    seen: Rc::clone(&seen),
                },
            ),
        )?;
        assert_eq!(seen.borrow().as_deref(), Some("ada"));
        assert!(flows.deps().downcast_ref::<()>().is_none());
        Ok(())
    }

    #[test]
    fn push_and_pop_to_root_pass_through() -> Result<()> {
        let journal = Journal::default();
        let mut flows = Flows::default();
        let (log, surface) = TestSurface::create();
        let sid = flows.add_surface(surface);
        let home = Screen::new("home");
        let id = flows.launch(
            None,
            Probe::new("p", &journal)
                .showing(home.clone())
                .spawn(sid, Presentation::Push),
        )?;
        flows.push(id, Screen::new("a"), true)?;
        flows.push(id, Screen::new("b"), true)?;
        assert_eq!(log.borrow().stack.len(), 3);
        flows.pop_to_root(id, true)?;
        assert_eq!(log.borrow().stack, vec![home]);
        Ok(())
    }

    /// Journals its teardown hook and optionally runs an action in it.
    struct Teardown {
        /// Label used in the journal.
        label: String,
        /// Shared journal.
        journal: Journal,
        /// Runs inside the hook.
        on_hook: Option<fn(&mut dyn Context) -> Result<()>>,
    }

    impl Teardown {
        /// A journaling flow that also records `stopped <label>`.
        fn spawn(label: &str, journal: &Journal, sid: flowtree::SurfaceId) -> Spawn {
            let j = Rc::clone(journal);
            let l = label.to_string();
            Spawn::new(
                sid,
                Presentation::Push,
                Self {
                    label: label.into(),
                    journal: Rc::clone(journal),
                    on_hook: None,
                },
            )
            .when_stopped(move |_| j.borrow_mut().push(format!("stopped {l}")))
        }
    }

    impl Coordinator for Teardown {
        fn start(&mut self, _ctx: &mut dyn Context) -> Result<()> {
            Ok(())
        }

        fn stopped(&mut self, ctx: &mut dyn Context) -> Result<()> {
            self.journal
                .borrow_mut()
                .push(format!("hook {}", self.label));
            match self.on_hook {
                Some(action) => action(ctx),
                None => Ok(()),
            }
        }
    }

    #[test]
    fn stopped_hook_runs_once_in_cascade_order() -> Result<()> {
        let journal = Journal::default();
        let mut flows = Flows::default();
        let (_, surface) = TestSurface::create();
        let sid = flows.add_surface(surface);
        let root = flows.launch(None, Teardown::spawn("root", &journal, sid))?;
        let a = flows.launch(Some(root), Teardown::spawn("a", &journal, sid))?;
        flows.launch(Some(a), Teardown::spawn("a1", &journal, sid))?;
        flows.launch(Some(root), Teardown::spawn("b", &journal, sid))?;

        flows.stop(root)?;
        flows.stop(root)?;
        assert_eq!(
            journal_of(&journal),
            vec![
                "hook a1",
                "stopped a1",
                "hook a",
                "stopped a",
                "hook b",
                "stopped b",
                "hook root",
                "stopped root",
            ]
        );
        assert!(flows.is_empty());
        Ok(())
    }

    /// A [`Teardown`] flow on `sid` running `on_hook` when it stops.
    fn hooked(
        sid: flowtree::SurfaceId,
        journal: &Journal,
        on_hook: fn(&mut dyn Context) -> Result<()>,
    ) -> Spawn {
        Spawn::new(
            sid,
            Presentation::Push,
            Teardown {
                label: "hooked".into(),
                journal: Rc::clone(journal),
                on_hook: Some(on_hook),
            },
        )
    }

    #[test]
    fn stopped_hook_acts_on_the_surface() -> Result<()> {
        let journal = Journal::default();
        let mut flows = Flows::default();
        let home = Screen::new("home");
        let (log, surface) = TestSurface::with_stack(vec![home.clone()]);
        let sid = flows.add_surface(surface);
        let id = flows.launch(None, hooked(sid, &journal, |ctx| ctx.pop_to_root(false)))?;
        flows.push(id, Screen::new("sheet"), true)?;

        flows.stop(id)?;
        assert_eq!(log.borrow().stack, vec![home]);
        assert_eq!(journal_of(&journal), vec!["hook hooked"]);
        Ok(())
    }

    #[test]
    fn stopped_hook_errors_do_not_block_teardown() -> Result<()> {
        let journal = Journal::default();
        let mut flows = Flows::default();
        let (_, surface) = TestSurface::create();
        let sid = flows.add_surface(surface);
        let root = flows.launch(None, Teardown::spawn("root", &journal, sid))?;
        let child = flows.launch(
            Some(root),
            hooked(sid, &journal, |ctx| {
                let id = ctx.flow_id();
                ctx.start_flow(id)
            }),
        )?;

        assert_eq!(flows.stop(root), Err(Error::ReentrantCoordinator(child)));
        assert!(flows.is_empty());
        assert_eq!(
            journal_of(&journal),
            vec!["hook hooked", "hook root", "stopped root"]
        );
        Ok(())
    }

    /// Forks a surface on start and runs a child flow in it.
    struct Forks {
        /// Presenter for the forked surface.
        presenter: Rc<TestPresenter>,
    }

    impl Coordinator for Forks {
        fn start(&mut self, ctx: &mut dyn Context) -> Result<()> {
            let (_, fork) = TestSurface::create();
            let fork = ctx.fork_surface(Box::new(fork));
            ctx.launch_child(Spawn::new(
                fork,
                Presentation::PresentWith {
                    presenter: self.presenter.clone(),
                    style: flowtree::ModalStyle::FormSheet,
                },
                Probe::new("forked", &Journal::default()).showing(Screen::new("sheet")),
            ))
            .map(|_| ())
        }
    }

    #[test]
    fn forked_surfaces_are_released_with_their_flows() -> Result<()> {
        let journal = Journal::default();
        let mut flows = Flows::default();
        let (_, surface) = TestSurface::create();
        let main = flows.add_surface(surface);
        let root = flows.launch(None, Probe::new("root", &journal).spawn(main, Presentation::Push))?;
        let presenter = Rc::new(TestPresenter::default());

        for _ in 0..100 {
            let forks = flows.launch(
                Some(root),
                Spawn::new(
                    main,
                    Presentation::Push,
                    Forks {
                        presenter: Rc::clone(&presenter),
                    },
                ),
            )?;
            assert_eq!(flows.surface_count(), 2);
            flows.stop(forks)?;
        }
        assert_eq!(flows.surface_count(), 1);
        assert_eq!(presenter.presented.borrow().len(), 100);
        let last = presenter.presented.borrow()[99].0;
        assert!(flows.surface(last).is_none());
        assert!(flows.contains(root));
        Ok(())
    }

    #[test]
    fn host_surfaces_are_removed_explicitly() -> Result<()> {
        let journal = Journal::default();
        let mut flows = Flows::default();
        let (_, surface) = TestSurface::create();
        let sid = flows.add_surface(surface);
        let root = flows.launch(None, Probe::new("root", &journal).spawn(sid, Presentation::Push))?;

        assert!(matches!(
            flows.remove_surface(sid),
            Err(Error::SurfaceInUse(id)) if id == sid
        ));
        flows.stop(root)?;
        assert_eq!(flows.surface_count(), 1);
        assert!(flows.remove_surface(sid).is_ok());
        assert!(matches!(
            flows.remove_surface(sid),
            Err(Error::SurfaceNotFound(_))
        ));
        Ok(())
    }
}
