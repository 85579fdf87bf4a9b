//! Error types for candidate research.

use thiserror::Error;

/// Errors that can abort a research run.
///
/// Unparseable engine output is not an error: the extractor degrades to a
/// sentinel record instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Neither a profile URL nor a name was supplied
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The engine process could not be started
    #[error("Failed to start research engine `{bin}`: {source}")]
    EngineSpawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading the engine's event stream failed
    #[error("Engine stream error: {0}")]
    EngineIo(#[from] std::io::Error),

    /// The engine exited unsuccessfully before completing the run
    #[error("Research engine exited with {}", describe_exit(.code, .stderr))]
    EngineExit { code: Option<i32>, stderr: String },

    /// Serializing the record failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe_exit(code: &Option<i32>, stderr: &str) -> String {
    let status = match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    };
    if stderr.is_empty() {
        status
    } else {
        format!("{status}: {stderr}")
    }
}

/// Result type for candidate research operations.
pub type Result<T> = std::result::Result<T, Error>;
