mod config;
mod context;
mod errors;

pub use config::{
    ActorConfig, ActorConfigBuilder, SpawnerConfig, SpawnerConfigBuilder, SupervisorConfig,
    SupervisorConfigBuilder, SystemConfig, SystemConfigBuilder,
};
pub use context::SystemContext;
pub use errors::SystemError;
