//! Filesystem containment for tool execution.
//!
//! Every tool that touches the filesystem goes through [`Sandbox`]:
//!
//! - `resolve` confines a model-issued relative path to the working tree,
//!   following `..` and symlinks before checking containment.
//! - `check_writable` confines writes to a second, usually narrower, root.
//! - [`is_eligible_text_file`] keeps content search away from binaries and
//!   oversized files.

mod path;

pub use path::{
    is_eligible_text_file, Sandbox, SandboxError, BINARY_EXTENSIONS, DEFAULT_MAX_TEXT_FILE_BYTES,
};
