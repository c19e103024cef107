/// Recording host collaborators.
pub mod host;
/// Journaling coordinator.
pub mod probe;
/// In-memory navigation surface.
pub mod surface;

pub use host::{TestContainer, TestPresenter, TestWindow};
pub use probe::{Journal, Probe};
pub use surface::{SurfaceAction, SurfaceLog, TestSurface};
