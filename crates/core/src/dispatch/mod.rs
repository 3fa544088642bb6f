//! Voice tool-call dispatch
//!
//! Maps inbound tool invocations onto the availability and booking services
//! and renders speakable replies. Stateless between calls: every invocation
//! validates its own arguments and reloads the agent configuration.

pub mod dispatcher;
pub mod narration;

pub use dispatcher::ToolDispatcher;
