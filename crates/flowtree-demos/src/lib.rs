//! Demo flows for flowtree, driven against host collaborators that log
//! every navigation action.

/// A small app built from coordinators.
pub mod app;
/// Logging host collaborators.
pub mod host;
/// Scripted walkthroughs over the app.
pub mod scenario;
