//! The subscription fabric: [`SubscriptionInfo`] (a materialized
//! subscription point) and the [`SubscriptionMap`] that indexes them for
//! dispatch (spec §3 "Subscription point", "Subscription info", §4.3).

mod error;
mod map;
mod point;

pub use error::SubscriptionError;
pub use map::{Recipients, SubscriptionMap};
pub use point::{OwnerTag, SubscriptionInfo, SubscriptionState};
