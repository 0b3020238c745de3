//! The command execution contract
//!
//! Every operation is a struct implementing [`Execute`]: deserialize the
//! request into the command, execute it against a context, get a JSON value
//! back. Commands do all the work; the context provides access, not logic.

use serde_json::Value;

pub use async_trait::async_trait;

/// A command executable against a context `C`, failing with `E`
#[async_trait]
pub trait Execute<C, E>: Send + Sync {
    async fn execute(&self, ctx: &C) -> Result<Value, E>;
}
