//! Handler implementations

pub mod async_handler;
pub mod batch;
pub mod console;
pub mod discard;
pub mod level;
pub mod memory;
pub mod writer;

pub use async_handler::AsyncHandler;
pub use batch::{BatchHandler, BatchSink};
pub use console::ConsoleHandler;
pub use discard::DiscardHandler;
pub use level::LevelHandler;
pub use memory::MemoryHandler;
pub use writer::{BoxedWriter, WriterHandler};

pub use crate::core::{Handler, HandlerFunc, MultiHandler};
