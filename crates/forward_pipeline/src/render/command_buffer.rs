//! Recorded command buffers
//!
//! Commands are recorded on the CPU and replayed by the frame context when
//! the buffer is executed. A buffer is reused across viewpoints and frames
//! by clearing it after each execution.

use crate::render::Color;

/// A single recorded command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Clear the current render target
    ClearRenderTarget {
        /// Clear the depth buffer
        clear_depth: bool,
        /// Clear the color buffer
        clear_color: bool,
        /// Color written when clearing color
        color: Color,
    },
    /// Open a named profiling sample
    BeginSample(String),
    /// Close a named profiling sample
    EndSample(String),
}

/// Named, replayable sequence of commands
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandBuffer {
    name: String,
    commands: Vec<Command>,
}

impl CommandBuffer {
    /// Create an empty buffer
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// Buffer name, shown by frame debuggers
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record a render target clear
    pub fn clear_render_target(&mut self, clear_depth: bool, clear_color: bool, color: Color) {
        self.commands.push(Command::ClearRenderTarget {
            clear_depth,
            clear_color,
            color,
        });
    }

    /// Record the start of a profiling sample
    pub fn begin_sample(&mut self, name: &str) {
        self.commands.push(Command::BeginSample(name.to_string()));
    }

    /// Record the end of a profiling sample
    pub fn end_sample(&mut self, name: &str) {
        self.commands.push(Command::EndSample(name.to_string()));
    }

    /// Recorded commands in recording order
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of recorded commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop all recorded commands. Keeps allocated capacity for reuse.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}
