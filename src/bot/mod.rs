pub mod args;
pub mod auth;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod handlers;
pub mod port;
pub mod shutdown;

#[cfg(test)]
pub mod testing;

pub use context::Settings;
pub use dispatch::Dispatcher;
pub use handlers::build_registry;
pub use shutdown::Shutdown;
