// Adapters layer: concrete implementations of the domain ports.

pub mod journal;
pub mod openai;

pub use journal::JsonlJournal;
pub use openai::ResponsesClient;
