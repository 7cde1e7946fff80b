//! Validated configuration for actors, supervisors, and spawners (spec
//! §6.3 "Configuration surface"). Grounded on the teacher's
//! `SystemConfig`/`SystemConfigBuilder` pattern: a plain struct plus a
//! fluent builder whose `build()` calls `validate()`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::supervisor::{RestartPolicy, SupervisorPolicy};
use crate::util::Address;

/// Default actor initialization timeout.
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default actor shutdown timeout.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);
/// Default supervisor inbound queue capacity.
pub const DEFAULT_INBOUND_QUEUE_SIZE: usize = 1000;
/// Default supervisor event loop poll interval.
pub const DEFAULT_POLL_DURATION: Duration = Duration::from_millis(50);
/// Default spawner restart window (spec §4.8).
pub const DEFAULT_RESTART_PERIOD: Duration = Duration::from_secs(60);

/// Per-actor configuration shared by every actor, supervisors included
/// (spec §6.3 "Actor: {init_timeout, shutdown_timeout, ...}").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    /// How long `INITIALIZING` may run before it is treated as failed.
    pub init_timeout: Duration,
    /// How long `SHUTTING_DOWN` may run before the actor is force-dropped.
    pub shutdown_timeout: Duration,
    /// How long a link's unlink handshake may take. Must not exceed
    /// `shutdown_timeout` (spec §6.3 "unlink_timeout<=shutdown_timeout").
    pub unlink_timeout: Duration,
    /// A human-readable label, surfaced in monitoring events and logs.
    pub identity: String,
    /// Propagate this actor's non-normal shutdown reason as its
    /// supervisor's shutdown reason (spec §4.7 "escalate_failure").
    pub escalate_failure: bool,
    /// Force the supervisor to shut down when this actor terminates
    /// (spec §4.7 "autoshutdown_supervisor").
    pub autoshutdown_supervisor: bool,
    /// The spawner responsible for respawning this actor, if any.
    #[serde(skip)]
    pub spawner_address: Option<Address>,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            init_timeout: DEFAULT_INIT_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            unlink_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            identity: String::new(),
            escalate_failure: false,
            autoshutdown_supervisor: false,
            spawner_address: None,
        }
    }
}

impl ActorConfig {
    pub fn builder() -> ActorConfigBuilder {
        ActorConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.init_timeout.is_zero() {
            return Err("init_timeout must be > 0".to_string());
        }
        if self.shutdown_timeout.is_zero() {
            return Err("shutdown_timeout must be > 0".to_string());
        }
        if self.unlink_timeout > self.shutdown_timeout {
            return Err("unlink_timeout must not exceed shutdown_timeout".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ActorConfigBuilder {
    config: ActorConfig,
}

impl ActorConfigBuilder {
    pub fn init_timeout(mut self, timeout: Duration) -> Self {
        self.config.init_timeout = timeout;
        self
    }

    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    pub fn unlink_timeout(mut self, timeout: Duration) -> Self {
        self.config.unlink_timeout = timeout;
        self
    }

    pub fn identity(mut self, identity: impl Into<String>) -> Self {
        self.config.identity = identity.into();
        self
    }

    pub fn escalate_failure(mut self, escalate: bool) -> Self {
        self.config.escalate_failure = escalate;
        self
    }

    pub fn autoshutdown_supervisor(mut self, autoshutdown: bool) -> Self {
        self.config.autoshutdown_supervisor = autoshutdown;
        self
    }

    pub fn spawner_address(mut self, address: Address) -> Self {
        self.config.spawner_address = Some(address);
        self
    }

    pub fn build(self) -> Result<ActorConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Supervisor configuration: an [`ActorConfig`] plus the supervisor-only
/// fields (spec §6.3 "Supervisor: actor options plus {...}").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    pub actor: ActorConfig,
    /// How the supervisor reacts to a child failing to initialize.
    pub policy: SupervisorPolicy,
    /// Spawn and own a registry actor alongside this supervisor's children.
    pub create_registry: bool,
    /// Hold every child at `start_trigger` until all siblings initialize.
    pub synchronize_start: bool,
    /// An existing registry to register children with, if `create_registry` is false.
    #[serde(skip)]
    pub registry_address: Option<Address>,
    pub inbound_queue_size: usize,
    pub poll_duration: Duration,
    /// An externally-owned flag the loop adapter polls for shutdown requests.
    #[serde(skip)]
    pub shutdown_flag: Option<Address>,
    pub shutdown_poll_frequency: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            actor: ActorConfig::default(),
            policy: SupervisorPolicy::ShutdownFailed,
            create_registry: false,
            synchronize_start: false,
            registry_address: None,
            inbound_queue_size: DEFAULT_INBOUND_QUEUE_SIZE,
            poll_duration: DEFAULT_POLL_DURATION,
            shutdown_flag: None,
            shutdown_poll_frequency: DEFAULT_POLL_DURATION,
        }
    }
}

impl SupervisorConfig {
    pub fn builder() -> SupervisorConfigBuilder {
        SupervisorConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), String> {
        self.actor.validate()?;
        if self.create_registry && self.registry_address.is_some() {
            return Err("create_registry and registry_address are mutually exclusive".to_string());
        }
        if self.inbound_queue_size == 0 {
            return Err("inbound_queue_size must be > 0".to_string());
        }
        if self.poll_duration.is_zero() {
            return Err("poll_duration must be > 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SupervisorConfigBuilder {
    config: SupervisorConfig,
}

impl SupervisorConfigBuilder {
    pub fn actor(mut self, actor: ActorConfig) -> Self {
        self.config.actor = actor;
        self
    }

    pub fn policy(mut self, policy: SupervisorPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn create_registry(mut self, create: bool) -> Self {
        self.config.create_registry = create;
        self
    }

    pub fn synchronize_start(mut self, synchronize: bool) -> Self {
        self.config.synchronize_start = synchronize;
        self
    }

    pub fn registry_address(mut self, address: Address) -> Self {
        self.config.registry_address = Some(address);
        self
    }

    pub fn inbound_queue_size(mut self, size: usize) -> Self {
        self.config.inbound_queue_size = size;
        self
    }

    pub fn poll_duration(mut self, duration: Duration) -> Self {
        self.config.poll_duration = duration;
        self
    }

    pub fn shutdown_poll_frequency(mut self, duration: Duration) -> Self {
        self.config.shutdown_poll_frequency = duration;
        self
    }

    pub fn build(self) -> Result<SupervisorConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Spawner configuration (spec §6.3 "Spawner: {restart_policy,
/// restart_period, max_attempts, escalate_failure}").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerConfig {
    pub restart_policy: RestartPolicy,
    pub restart_period: Duration,
    /// Caps total restart attempts; `0` means uncapped (spec §4.8 "Period
    /// guard": "max_attempts > 0 caps total attempts").
    pub max_attempts: usize,
    pub escalate_failure: bool,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            restart_policy: RestartPolicy::Always,
            restart_period: DEFAULT_RESTART_PERIOD,
            max_attempts: 5,
            escalate_failure: false,
        }
    }
}

impl SpawnerConfig {
    pub fn builder() -> SpawnerConfigBuilder {
        SpawnerConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.restart_period.is_zero() {
            return Err("restart_period must be > 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SpawnerConfigBuilder {
    config: SpawnerConfig,
}

impl SpawnerConfigBuilder {
    pub fn restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.config.restart_policy = policy;
        self
    }

    pub fn restart_period(mut self, period: Duration) -> Self {
        self.config.restart_period = period;
        self
    }

    pub fn max_attempts(mut self, max: usize) -> Self {
        self.config.max_attempts = max;
        self
    }

    pub fn escalate_failure(mut self, escalate: bool) -> Self {
        self.config.escalate_failure = escalate;
        self
    }

    pub fn build(self) -> Result<SpawnerConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Top-level, system-wide configuration (spec §4.14 ambient
/// configuration). Grounded on the teacher's `SystemConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    pub default_actor: ActorConfig,
    pub default_supervisor: SupervisorConfig,
    pub default_spawner: SpawnerConfig,
    /// Overall system shutdown timeout, separate from any one actor's.
    pub shutdown_timeout: Duration,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            default_actor: ActorConfig::default(),
            default_supervisor: SupervisorConfig::default(),
            default_spawner: SpawnerConfig::default(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl SystemConfig {
    pub fn builder() -> SystemConfigBuilder {
        SystemConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), String> {
        self.default_actor.validate()?;
        self.default_supervisor.validate()?;
        self.default_spawner.validate()?;
        if self.shutdown_timeout.is_zero() {
            return Err("shutdown_timeout must be > 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SystemConfigBuilder {
    config: SystemConfig,
}

impl SystemConfigBuilder {
    pub fn default_actor(mut self, actor: ActorConfig) -> Self {
        self.config.default_actor = actor;
        self
    }

    pub fn default_supervisor(mut self, supervisor: SupervisorConfig) -> Self {
        self.config.default_supervisor = supervisor;
        self
    }

    pub fn default_spawner(mut self, spawner: SpawnerConfig) -> Self {
        self.config.default_spawner = spawner;
        self
    }

    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<SystemConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}
