//! Engine events and callbacks for observability.

use std::sync::{Arc, Mutex};

/// Events produced by the research engine while it works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A chunk of the engine's own text from one of its turns
    AssistantText { text: String },
    /// The engine invoked one of its tools (web search, page fetch)
    ToolUse { name: String },
    /// The run completed successfully; carries the engine's last output
    /// when it was a string
    FinalResult { text: Option<String> },
    /// The engine reported that the run failed
    EngineError { message: String },
    /// Anything else on the stream (system notices, tool results, ...)
    Other { kind: String },
}

/// Type alias for event callbacks
pub type EventCallback = Arc<dyn Fn(&EngineEvent) + Send + Sync>;

/// Storage for research callbacks
#[derive(Default, Clone)]
pub struct ResearchCallbacks {
    pub on_text: Option<EventCallback>,
    pub on_tool_use: Option<EventCallback>,
    pub on_final_result: Option<EventCallback>,
    pub on_error: Option<EventCallback>,
    /// Catch-all callback for any event
    pub on_event: Option<EventCallback>,
    /// Captured events, for inspecting a run after the fact
    pub(crate) captured_events: Option<Arc<Mutex<Vec<EngineEvent>>>>,
}

impl ResearchCallbacks {
    /// Emit an event to the appropriate callback(s)
    pub fn emit(&self, event: &EngineEvent) {
        if let Some(ref events) = self.captured_events
            && let Ok(mut events) = events.lock()
        {
            events.push(event.clone());
        }

        let specific = match event {
            EngineEvent::AssistantText { .. } => self.on_text.as_ref(),
            EngineEvent::ToolUse { .. } => self.on_tool_use.as_ref(),
            EngineEvent::FinalResult { .. } => self.on_final_result.as_ref(),
            EngineEvent::EngineError { .. } => self.on_error.as_ref(),
            EngineEvent::Other { .. } => None,
        };

        if let Some(cb) = specific {
            cb(event);
        }

        if let Some(cb) = &self.on_event {
            cb(event);
        }
    }
}

/// First `max_chars` characters of `text`, with `...` appended if cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Create verbose logging callbacks.
///
/// Previews go through `tracing`, which the binary routes to stderr.
pub fn verbose_callbacks(preview_chars: usize) -> ResearchCallbacks {
    ResearchCallbacks {
        on_text: Some(Arc::new(move |e| {
            if let EngineEvent::AssistantText { text } = e {
                tracing::info!("[Text]: {}", preview(text, preview_chars));
            }
        })),
        on_tool_use: Some(Arc::new(|e| {
            if let EngineEvent::ToolUse { name } = e {
                tracing::info!("[Tool]: {}", name);
            }
        })),
        on_final_result: Some(Arc::new(move |e| {
            if let EngineEvent::FinalResult { text } = e {
                match text {
                    Some(text) => tracing::info!("[Result]: {}", preview(text, preview_chars)),
                    None => tracing::info!("[Result]: (no text)"),
                }
            }
        })),
        on_error: Some(Arc::new(|e| {
            if let EngineEvent::EngineError { message } = e {
                tracing::error!("[Error]: {}", message);
            }
        })),
        ..Default::default()
    }
}
