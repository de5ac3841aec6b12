pub mod registry;
#[allow(clippy::module_inception)]
pub mod supervisor;

pub use registry::Registry;
pub use supervisor::Supervisor;
