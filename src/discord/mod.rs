//! serenity gateway adapter.

pub mod convert;
mod handler;
mod port;
pub mod sync;

pub use handler::Handler;

use serenity::all::ShardManager;
use serenity::prelude::TypeMapKey;
use std::sync::Arc;

/// Lets handlers read shard heartbeat latency from the client's type map.
pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}
