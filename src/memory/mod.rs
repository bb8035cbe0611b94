//! Persistent memory.
//!
//! A single append-only markdown file, `AGENTS.md`, at the sandbox root.
//! Entries are written by the `save_memory` tool and read back into the
//! system instructions of every new orchestration instance.

mod store;

pub use store::{format_entry, MemoryError, MemoryStore, MEMORY_FILE_NAME, TIMESTAMP_FORMAT};
