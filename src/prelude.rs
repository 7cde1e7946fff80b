//! Convenient re-exports for building on top of this runtime.
//!
//! ```rust,ignore
//! use kestrel_rt::prelude::*;
//! ```
//!
//! # What's Included
//!
//! ## Core Actor System
//! - [`ActorContext`], [`ActorCore`], [`ActorCoreConfig`], [`ActorPhase`]
//!
//! ## Messaging
//! - [`Message`], [`Request`], [`Envelope`], [`Kind`], [`Outcome`]
//! - [`Handler`], [`HandlerFn`], [`Continuation`]
//! - [`ErrorCode`], [`ExtendedError`], [`ShutdownCode`]
//!
//! ## Locality & Delivery
//! - [`Address`], [`ActorId`], [`LocalityId`], [`RequestId`]
//! - [`LocalityHandle`], [`LocalityDirectory`], [`DeliveryEngine`]
//!
//! ## Plugins
//! - [`Plugin`], [`PluginHost`], [`PluginChain`], [`Reactions`]
//!
//! ## Subscriptions
//! - [`SubscriptionMap`], [`SubscriptionInfo`], [`Recipients`]
//!
//! ## Supervision
//! - [`RestartPolicy`], [`SupervisorPolicy`], [`ChildExit`], [`Spawner`]
//! - [`SupervisorTree`], [`ChildBuilder`]
//!
//! ## Registry
//! - [`Registry`], [`DiscoveryResolved`]
//!
//! ## Monitoring
//! - [`Monitor`], [`InMemoryMonitor`], [`NoopMonitor`], [`MonitoringEvent`], [`EventSeverity`]
//!
//! ## System
//! - [`SystemConfig`], [`ActorConfig`], [`SupervisorConfig`], [`SpawnerConfig`], [`SystemContext`], [`SystemError`]
//!
//! ## Loop adapter
//! - [`LoopAdapter`], [`TimerHandler`]

pub use crate::actor::{ActorContext, ActorCore, ActorCoreConfig, ActorPhase};

pub use crate::message::{
    Continuation, Envelope, ErrorCode, ExtendedError, Handler, HandlerFn, Kind, Message, Outcome,
    Request, ShutdownCode,
};

pub use crate::util::{ActorId, Address, LocalityId, RequestId};

pub use crate::locality::{DeliveryEngine, LocalityDirectory, LocalityHandle};

pub use crate::plugin::{Plugin, PluginChain, PluginHost, Reactions};

pub use crate::subscription::{Recipients, SubscriptionInfo, SubscriptionMap};

pub use crate::supervisor::{ChildBuilder, ChildExit, RestartPolicy, Spawner, SupervisorPolicy, SupervisorTree};

pub use crate::registry::{DiscoveryResolved, Registry};

pub use crate::monitoring::{EventSeverity, InMemoryMonitor, Monitor, MonitoringEvent, NoopMonitor};

pub use crate::system::{
    ActorConfig, SpawnerConfig, SupervisorConfig, SystemConfig, SystemContext, SystemError,
};

pub use crate::loop_adapter::{LoopAdapter, TimerHandler};
