//! Agent engine: the tool-calling loop, its state and builder.

pub mod agent_loop;
pub mod builder;
pub mod events;
pub(crate) mod state;

pub use agent_loop::{AgentLoop, BUDGET_EXHAUSTED_RESPONSE, LoopOutcome, StopReason};
pub use builder::AgentLoopBuilder;
pub use events::{DisplaySink, NullSink, TaskInfo};
