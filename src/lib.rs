//! # kestrel-rt - Hierarchical, Plugin-Driven Actor Runtime
//!
//! A single-threaded-per-locality actor runtime built around an
//! explicit plugin chain rather than a fixed actor lifecycle: every
//! actor's activation, initialization, start, and shutdown walks are
//! driven by an ordered sequence of [`plugin::Plugin`]s, the same way
//! linking, registry access, and child supervision are — each is just
//! another plugin in the chain.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use kestrel_rt::prelude::*;
//!
//! #[derive(Debug)]
//! struct Ping;
//! #[derive(Debug, Clone)]
//! struct Pong;
//! impl Request for Ping {
//!     type Response = Pong;
//! }
//! ```
//!
//! # Module Organization
//!
//! ## Core Actor System
//! - [`actor`] - Actor phase tracking, per-locality context, and the lifecycle driver
//! - [`message`] - Messages, envelopes, handlers, and the chained extended error
//! - [`locality`] - Address/locality identity and the single-threaded delivery engine
//! - [`subscription`] - The subscription map every locality dispatches through
//!
//! ## Plugin-Driven Lifecycle
//! - [`plugin`] - The plugin chain, its reactions, and the builtin plugins (link, registry client, child manager, ...)
//! - [`timer`] - Timer identity and request/timeout pairing
//! - [`loop_adapter`] - The backend trait a locality's event loop implements
//!
//! ## Supervision
//! - [`supervisor`] - Supervision trees, restart policies, and the spawner
//! - [`registry`] - The registry actor's server-side name table
//!
//! ## Infrastructure
//! - [`system`] - System-wide configuration, context, and the top-level actor system
//! - [`monitoring`] - Event tracking for observability, mirrored per subsystem
//! - [`util`] - Identity types (`Address`, `ActorId`, ...) and shared serde helpers
//!
//! # Standards
//!
//! - 3-layer import organization (std -> third-party -> internal)
//! - `chrono::DateTime<Utc>` for all timestamps
//! - `thiserror`-derived error enums per fallible module, chained through
//!   [`message::ExtendedError`]
//! - `mod.rs` files hold declarations and re-exports only

pub mod actor;
pub mod locality;
pub mod loop_adapter;
pub mod message;
pub mod monitoring;
pub mod plugin;
pub mod registry;
pub mod subscription;
pub mod supervisor;
pub mod system;
pub mod timer;
pub mod util;

pub mod prelude;

pub use actor::{ActorContext, ActorCore, ActorCoreConfig, ActorPhase};
pub use message::{Envelope, ErrorCode, ExtendedError, Handler, Message, Request};
pub use system::{SystemConfig, SystemContext, SystemError};
pub use util::{ActorId, Address, LocalityId, RequestId};
