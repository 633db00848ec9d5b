// src/config.rs

/// Default bound on combined expression nesting and call depth.
pub const DEFAULT_MAX_DEPTH: usize = 2048;

/// Per-session knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Deepest nesting the parser and evaluator will descend before giving
    /// up with `Error::StackDepthExceeded`.
    pub max_depth: usize,
}

impl SessionConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig { max_depth: DEFAULT_MAX_DEPTH }
    }
}
