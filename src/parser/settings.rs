//! Parser limits.

/// Parser settings.
#[derive(Debug, Clone)]
pub struct ParserSettings {
    /// Maximum nesting of parentheses, calls and unary minus. The default
    /// keeps a full-depth statement within a 2 MiB thread stack.
    pub max_depth: usize,
    /// Maximum statement length in bytes.
    pub max_input_len: usize,
}

impl Default for ParserSettings {
    fn default() -> Self {
        ParserSettings {
            max_depth: 32,
            max_input_len: 65_536,
        }
    }
}
