//! The external research engine.
//!
//! [`ReasoningEngine`] is the only way the rest of the crate talks to the
//! engine, so reduction and extraction can be driven by synthetic event
//! streams. [`ClaudeCli`] is the production transport: it runs the agent CLI
//! in print mode and reads its `stream-json` output line by line.

use crate::agent::{EngineEvent, Prompts, ResearchConfig};
use crate::error::{Error, Result};
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;
use std::collections::VecDeque;
use std::future::Future;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;

/// Events from a running engine, ending when the engine finishes.
pub type EventStream = BoxStream<'static, Result<EngineEvent>>;

/// Everything the engine needs to start a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub allowed_tools: Vec<String>,
    pub permission_mode: String,
    pub model: Option<String>,
    pub max_turns: Option<u32>,
}

impl EngineRequest {
    pub fn new(prompts: Prompts, config: &ResearchConfig) -> Self {
        Self {
            system_prompt: prompts.system,
            user_prompt: prompts.user,
            allowed_tools: config.allowed_tools.clone(),
            permission_mode: config.permission_mode.clone(),
            model: config.model.clone(),
            max_turns: config.max_turns,
        }
    }
}

/// An agentic engine that researches on its own and reports progress as a
/// stream of events.
pub trait ReasoningEngine {
    /// Start a run. The returned stream ends when the engine terminates.
    fn start(&self, request: &EngineRequest) -> impl Future<Output = Result<EventStream>> + Send;
}

/// Runs the `claude` CLI as the research engine.
#[derive(Debug, Clone)]
pub struct ClaudeCli {
    bin: String,
}

impl ClaudeCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Command-line arguments for a request.
    pub fn args(request: &EngineRequest) -> Vec<String> {
        let mut args = vec![
            "-p".to_string(),
            request.user_prompt.clone(),
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--verbose".to_string(),
            "--system-prompt".to_string(),
            request.system_prompt.clone(),
            "--allowedTools".to_string(),
            request.allowed_tools.join(","),
            "--permission-mode".to_string(),
            request.permission_mode.clone(),
        ];
        if let Some(model) = &request.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }
        if let Some(max_turns) = request.max_turns {
            args.push("--max-turns".to_string());
            args.push(max_turns.to_string());
        }
        args
    }
}

impl ReasoningEngine for ClaudeCli {
    async fn start(&self, request: &EngineRequest) -> Result<EventStream> {
        tracing::debug!(bin = %self.bin, tools = ?request.allowed_tools, "starting research engine");

        let mut child = Command::new(&self.bin)
            .args(Self::args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::EngineSpawn {
                bin: self.bin.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("engine stdout was not captured"))?;

        // Drained concurrently so a chatty engine can't block on a full pipe.
        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut buf).await;
            }
            buf
        });

        let state = CliStream {
            lines: BufReader::new(stdout).lines(),
            pending: VecDeque::new(),
            child: Some(child),
            stderr: Some(stderr_task),
        };
        Ok(stream::unfold(state, next_event).boxed())
    }
}

struct CliStream {
    lines: Lines<BufReader<ChildStdout>>,
    pending: VecDeque<EngineEvent>,
    /// `None` once the stream has ended
    child: Option<Child>,
    stderr: Option<JoinHandle<String>>,
}

async fn next_event(mut st: CliStream) -> Option<(Result<EngineEvent>, CliStream)> {
    loop {
        if let Some(event) = st.pending.pop_front() {
            return Some((Ok(event), st));
        }
        let mut child = st.child.take()?;

        match st.lines.next_line().await {
            Ok(Some(line)) => {
                st.pending.extend(parse_stream_line(&line));
                st.child = Some(child);
            }
            Ok(None) => {
                let status = match child.wait().await {
                    Ok(status) => status,
                    Err(e) => return Some((Err(e.into()), st)),
                };
                if status.success() {
                    return None;
                }
                let stderr = match st.stderr.take() {
                    Some(task) => task.await.unwrap_or_default(),
                    None => String::new(),
                };
                let err = Error::EngineExit {
                    code: status.code(),
                    stderr: stderr.trim().to_string(),
                };
                return Some((Err(err), st));
            }
            Err(e) => return Some((Err(e.into()), st)),
        }
    }
}

/// Translate one `stream-json` line into engine events.
///
/// Assistant messages yield one event per text or tool-use block, in block
/// order. Blank and non-JSON lines yield nothing.
pub fn parse_stream_line(line: &str) -> Vec<EngineEvent> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "skipping non-JSON engine output line");
            return Vec::new();
        }
    };

    match value.get("type").and_then(Value::as_str) {
        Some("assistant") => value
            .pointer("/message/content")
            .and_then(Value::as_array)
            .map(|blocks| blocks.iter().filter_map(content_block_event).collect())
            .unwrap_or_default(),
        Some("result") => {
            let subtype = value.get("subtype").and_then(Value::as_str);
            let result = value.get("result").and_then(Value::as_str);
            let event = match subtype {
                Some("success") => EngineEvent::FinalResult {
                    text: result.map(str::to_string),
                },
                other => EngineEvent::EngineError {
                    message: result.or(other).unwrap_or("unknown engine error").to_string(),
                },
            };
            vec![event]
        }
        Some(kind) => vec![EngineEvent::Other {
            kind: kind.to_string(),
        }],
        None => Vec::new(),
    }
}

fn content_block_event(block: &Value) -> Option<EngineEvent> {
    match block.get("type").and_then(Value::as_str)? {
        "text" => Some(EngineEvent::AssistantText {
            text: block.get("text")?.as_str()?.to_string(),
        }),
        "tool_use" => Some(EngineEvent::ToolUse {
            name: block.get("name")?.as_str()?.to_string(),
        }),
        _ => None,
    }
}
