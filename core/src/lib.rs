//! Specification-to-Verilog pipeline: prompt, remote model, fence
//! extraction and single-slot persistence.

pub mod config;
pub mod error;
pub mod extract;
pub mod gauntlet;
pub mod generator;
pub mod history;
pub mod invoke;
pub mod logger;
pub mod persist;
pub mod prompts;
pub mod test_helpers;

pub use config::Config;
pub use error::{ErrorCode, GenError, Result};
pub use extract::{extract, extract_blocks, CodeBlocks, Extraction};
pub use generator::{Generation, Generator};
pub use history::{History, HistoryEntry};
pub use invoke::{GeminiClient, ModelInvoker};
pub use logger::Logger;
