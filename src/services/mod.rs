pub mod digest;
pub mod enrichment;
pub mod notifier;
pub mod pipeline;
pub mod providers;
pub mod ranking;
pub mod releases;
pub mod window;

pub use notifier::{Notifier, TelegramNotifier};
pub use pipeline::{Pipeline, PipelineSettings, RunReport};
