mod backoff;
mod error;
mod policy;
mod spawner;
mod tree;

pub use backoff::RestartBackoff;
pub use error::{SpawnerError, SupervisorError};
pub use policy::{ChildExit, RestartPolicy, SupervisorPolicy};
pub use spawner::Spawner;
pub use tree::{ChildBuilder, SupervisorTree};
