/// Whether the type checker runs before the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Check the program first and refuse to run it if any diagnostic is
    /// reported.
    #[default]
    Checked,
    /// Run the program without checking it.
    Unchecked,
}

/// The default limit on nested function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

/// Settings for a run.
///
/// # Example
/// ```
/// use tslite::options::{Mode, Options};
///
/// let options = Options::default().with_mode(Mode::Unchecked)
///                                 .with_max_call_depth(16);
///
/// assert_eq!(options.mode, Mode::Unchecked);
/// assert_eq!(options.max_call_depth, 16);
/// assert!(!options.echo_output);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Checked or unchecked execution.
    pub mode:           Mode,
    /// Calls nested deeper than this raise `StackOverflow`.
    pub max_call_depth: usize,
    /// Print every output line to stdout as it is produced, in addition to
    /// collecting it.
    pub echo_output:    bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { mode:           Mode::Checked,
               max_call_depth: DEFAULT_MAX_CALL_DEPTH,
               echo_output:    false, }
    }
}

impl Options {
    #[must_use]
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    #[must_use]
    pub const fn with_echo_output(mut self, echo_output: bool) -> Self {
        self.echo_output = echo_output;
        self
    }
}
