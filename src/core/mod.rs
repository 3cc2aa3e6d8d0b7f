pub mod demo;
pub mod draw;
pub mod normalize;
pub mod orchestrator;
pub mod pretty;
pub mod prompt;
pub mod reading;

pub use crate::domain::ports::{ConfigProvider, InteractionLog, InterpretationClient};
pub use crate::utils::error::Result;
pub use draw::{DrawEngine, DrawOptions};
pub use orchestrator::Orchestrator;
