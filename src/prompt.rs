//! System instructions.

/// Operating instructions for every agent, top-level or delegated.
pub const BASE_SYSTEM_PROMPT: &str = "You are an AI Coding Agent. \
Ask clarifying questions when requirements or constraints are ambiguous. \
Before writing code, search the repository for relevant files, read only the minimum needed, \
and adhere to existing patterns and conventions.\n\n\
<use_parallel_tool_calls>\n\
Whenever multiple independent operations are needed, invoke relevant tools in parallel.\n\
Err on the side of parallel calls for read-only operations like reading multiple files.\n\
</use_parallel_tool_calls>";

/// Wraps saved memory for inclusion in the system instructions.
#[must_use]
pub fn memory_instructions(contents: &str) -> String {
    format!(
        "<project_memory>\nNotes saved in earlier sessions (from AGENTS.md):\n{}\n</project_memory>",
        contents.trim()
    )
}
