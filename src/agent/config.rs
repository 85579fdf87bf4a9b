//! Research run configuration.

/// Tools the engine may use during research.
pub const DEFAULT_ALLOWED_TOOLS: [&str; 2] = ["WebSearch", "WebFetch"];

/// Permission mode that lets the engine run without pausing for approval.
pub const UNATTENDED_PERMISSION_MODE: &str = "bypassPermissions";

/// Configuration for a research run.
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    /// Engine executable to launch
    pub engine_bin: String,
    /// Model override passed to the engine
    pub model: Option<String>,
    /// Tools the engine is allowed to call
    pub allowed_tools: Vec<String>,
    /// Engine permission mode
    pub permission_mode: String,
    /// Upper bound on engine turns (engine default when unset)
    pub max_turns: Option<u32>,
    /// Characters of each event shown in verbose previews
    pub preview_chars: usize,
    /// Log event previews while the engine runs
    pub verbose: bool,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            engine_bin: "claude".to_string(),
            model: None,
            allowed_tools: DEFAULT_ALLOWED_TOOLS.iter().map(|t| t.to_string()).collect(),
            permission_mode: UNATTENDED_PERMISSION_MODE.to_string(),
            max_turns: None,
            preview_chars: 200,
            verbose: false,
        }
    }
}

impl ResearchConfig {
    /// Create a new config with the default engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine executable.
    pub fn engine_bin(mut self, bin: impl Into<String>) -> Self {
        self.engine_bin = bin.into();
        self
    }

    /// Set the model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the maximum number of engine turns.
    pub fn max_turns(mut self, n: u32) -> Self {
        self.max_turns = Some(n);
        self
    }

    /// Set the verbose preview length.
    pub fn preview_chars(mut self, n: usize) -> Self {
        self.preview_chars = n;
        self
    }

    /// Enable or disable verbose previews.
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }
}
