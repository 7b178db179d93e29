//! Handler module - command handling and dispatch.
//!
//! Provides:
//! - [`CommandHandler`] - the trait a handler implements (closures get it for free)
//! - [`HandlerRegistry`] - maps command identifiers to handlers
//! - [`Context`] - allows handlers to read arguments, reply, and ask
//!
//! # Example
//!
//! ```ignore
//! use cmdwire::handler::{Context, HandlerRegistry};
//!
//! let mut registry = HandlerRegistry::new();
//!
//! // Register a command handler.
//! registry.register(25, |ctx: &mut Context| {
//!     let value = ctx.read_i16()?;
//!     let reply = ctx.frame(26).arg_i16(value);
//!     ctx.reply(reply)
//! });
//! ```

mod context;
mod registry;

pub use context::Context;
pub use registry::HandlerRegistry;

use crate::error::Result;

/// A command handler invoked once per matching inbound frame.
///
/// Handlers run on the engine's single thread of control; [`Send`] and
/// [`Sync`] let the registry hand the engine itself across threads.
/// Any `Fn(&mut Context) -> Result<()>` qualifies through the blanket
/// implementation.
pub trait CommandHandler: Send + Sync {
    /// Handle one inbound frame.
    fn handle(&self, ctx: &mut Context<'_>) -> Result<()>;
}

impl<F> CommandHandler for F
where
    F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync,
{
    fn handle(&self, ctx: &mut Context<'_>) -> Result<()> {
        self(ctx)
    }
}
