//! Candidate research runs.
//!
//! A [`Researcher`] builds the prompts for a [`Subject`], hands them to a
//! [`ReasoningEngine`], reduces the engine's event stream to its final text
//! and extracts a [`ResearchRecord`] from it.

mod config;
mod events;
pub mod prompt;
mod reduce;

pub use config::{DEFAULT_ALLOWED_TOOLS, ResearchConfig, UNATTENDED_PERMISSION_MODE};
pub use events::{EngineEvent, EventCallback, ResearchCallbacks, preview, verbose_callbacks};
pub use prompt::Prompts;
pub use reduce::{StreamReducer, reduce, reduce_stream};

use crate::engine::{ClaudeCli, EngineRequest, ReasoningEngine};
use crate::error::Result;
use crate::extract::extract_with_source;
use crate::record::ResearchRecord;
use crate::subject::Subject;
use std::sync::{Arc, Mutex};

/// Runs candidate research against a reasoning engine.
pub struct Researcher<E = ClaudeCli> {
    engine: E,
    config: ResearchConfig,
    /// Callbacks for observability
    callbacks: ResearchCallbacks,
}

impl Researcher<ClaudeCli> {
    /// Create a researcher backed by the CLI engine named in `config`.
    pub fn new(config: ResearchConfig) -> Self {
        let engine = ClaudeCli::new(config.engine_bin.clone());
        Self::with_engine(engine, config)
    }
}

impl<E: ReasoningEngine> Researcher<E> {
    /// Create a researcher backed by any engine.
    pub fn with_engine(engine: E, config: ResearchConfig) -> Self {
        let callbacks = if config.verbose {
            verbose_callbacks(config.preview_chars)
        } else {
            ResearchCallbacks::default()
        };
        Self {
            engine,
            config,
            callbacks,
        }
    }

    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    // =========================================================================
    // Builder methods for callbacks
    // =========================================================================

    /// Set a callback for assistant text events.
    pub fn on_text<F>(mut self, f: F) -> Self
    where
        F: Fn(&EngineEvent) + Send + Sync + 'static,
    {
        self.callbacks.on_text = Some(Arc::new(f));
        self
    }

    /// Set a callback for tool use events.
    pub fn on_tool_use<F>(mut self, f: F) -> Self
    where
        F: Fn(&EngineEvent) + Send + Sync + 'static,
    {
        self.callbacks.on_tool_use = Some(Arc::new(f));
        self
    }

    /// Set a callback for the final result event.
    pub fn on_final_result<F>(mut self, f: F) -> Self
    where
        F: Fn(&EngineEvent) + Send + Sync + 'static,
    {
        self.callbacks.on_final_result = Some(Arc::new(f));
        self
    }

    /// Set a callback for engine error events.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&EngineEvent) + Send + Sync + 'static,
    {
        self.callbacks.on_error = Some(Arc::new(f));
        self
    }

    /// Set a catch-all callback for any event.
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&EngineEvent) + Send + Sync + 'static,
    {
        self.callbacks.on_event = Some(Arc::new(f));
        self
    }

    /// Keep a copy of every engine event for later inspection.
    pub fn capture_events(mut self, enabled: bool) -> Self {
        if enabled {
            self.callbacks.captured_events = Some(Arc::new(Mutex::new(Vec::new())));
        } else {
            self.callbacks.captured_events = None;
        }
        self
    }

    /// Take captured events.
    pub fn take_events(&self) -> Vec<EngineEvent> {
        if let Some(ref events) = self.callbacks.captured_events
            && let Ok(mut events) = events.lock()
        {
            return std::mem::take(&mut *events);
        }
        Vec::new()
    }

    // =========================================================================
    // Main run
    // =========================================================================

    /// Research `subject` and return the extracted record.
    ///
    /// Invalid subjects are rejected before the engine starts. A failed
    /// engine process aborts the run. An error result reported by the
    /// engine, or unparseable output, does not: the last text is extracted
    /// and may yield a degraded record.
    pub async fn run(&self, subject: &Subject) -> Result<ResearchRecord> {
        let prompts = prompt::build(subject)?;
        tracing::debug!(
            prompt_version = prompt::PROMPT_VERSION,
            user_prompt = %prompts.user,
            "built research prompts"
        );

        let request = EngineRequest::new(prompts, &self.config);
        let events = self.engine.start(&request).await?;
        let output = reduce_stream(events, &self.callbacks).await?;

        tracing::info!("Research complete. Parsing results...");
        let (record, source) = extract_with_source(&output);
        tracing::debug!(?source, name = %record.name, "extracted research record");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EventStream;
    use crate::error::Error;
    use crate::record::UNPARSED_WARNING;
    use futures::stream::{self, StreamExt};

    /// Replays a fixed event sequence and records what it was asked to do.
    #[derive(Default)]
    struct ScriptedEngine {
        events: Vec<EngineEvent>,
        fail_at_end: bool,
        request: Mutex<Option<EngineRequest>>,
    }

    impl ScriptedEngine {
        fn new(events: Vec<EngineEvent>) -> Self {
            Self {
                events,
                ..Default::default()
            }
        }

        fn request(&self) -> Option<EngineRequest> {
            self.request.lock().unwrap().clone()
        }
    }

    impl ReasoningEngine for &ScriptedEngine {
        async fn start(&self, request: &EngineRequest) -> Result<EventStream> {
            *self.request.lock().unwrap() = Some(request.clone());
            let mut items: Vec<Result<EngineEvent>> =
                self.events.iter().cloned().map(Ok).collect();
            if self.fail_at_end {
                items.push(Err(Error::EngineExit {
                    code: Some(2),
                    stderr: "connection reset".into(),
                }));
            }
            Ok(stream::iter(items).boxed())
        }
    }

    const FINAL: &str = "Done.\n\n```json\n{\"name\": \"Jane Doe\", \"tldr\": \"Engineer\", \"redFlags\": []}\n```";

    #[test]
    fn test_run_end_to_end() {
        let engine = ScriptedEngine::new(vec![
            EngineEvent::Other {
                kind: "system".into(),
            },
            EngineEvent::AssistantText {
                text: "Let me search.".into(),
            },
            EngineEvent::ToolUse {
                name: "WebSearch".into(),
            },
            EngineEvent::AssistantText {
                text: FINAL.into(),
            },
            EngineEvent::FinalResult {
                text: Some(FINAL.into()),
            },
        ]);
        let researcher = Researcher::with_engine(&engine, ResearchConfig::default());

        let record = tokio_test::block_on(researcher.run(&Subject::name("Jane Doe"))).unwrap();
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.tldr, "Engineer");
        assert!(record.red_flags.is_empty());

        let request = engine.request().unwrap();
        assert!(request.user_prompt.contains("there may be multiple people with this name"));
        assert!(!request.user_prompt.contains("Current Company"));
        assert_eq!(request.system_prompt, prompt::RESEARCH_SYSTEM_PROMPT);
        assert_eq!(request.allowed_tools, vec!["WebSearch", "WebFetch"]);
        assert_eq!(request.permission_mode, "bypassPermissions");
    }

    #[test]
    fn test_invalid_subject_never_starts_engine() {
        let engine = ScriptedEngine::new(vec![]);
        let researcher = Researcher::with_engine(&engine, ResearchConfig::default());

        let err = tokio_test::block_on(researcher.run(&Subject::name(""))).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(engine.request().is_none());
    }

    #[test]
    fn test_unparseable_output_degrades() {
        let engine = ScriptedEngine::new(vec![EngineEvent::AssistantText {
            text: "I could not find this person.".into(),
        }]);
        let researcher = Researcher::with_engine(&engine, ResearchConfig::default());

        let record =
            tokio_test::block_on(researcher.run(&Subject::url("https://linkedin.com/in/x")))
                .unwrap();
        assert_eq!(record.name, "Unknown");
        assert_eq!(record.tldr, "I could not find this person.");
        assert_eq!(record.red_flags, vec![UNPARSED_WARNING.to_string()]);
    }

    #[test]
    fn test_empty_stream_degrades() {
        let engine = ScriptedEngine::new(vec![]);
        let researcher = Researcher::with_engine(&engine, ResearchConfig::default());

        let record = tokio_test::block_on(researcher.run(&Subject::name("Jane Doe"))).unwrap();
        assert_eq!(record.name, "Unknown");
        assert_eq!(record.tldr, "");
    }

    #[test]
    fn test_engine_failure_propagates() {
        let engine = ScriptedEngine {
            events: vec![EngineEvent::AssistantText {
                text: FINAL.into(),
            }],
            fail_at_end: true,
            ..Default::default()
        };
        let researcher = Researcher::with_engine(&engine, ResearchConfig::default());

        let err = tokio_test::block_on(researcher.run(&Subject::name("Jane Doe"))).unwrap_err();
        assert!(matches!(err, Error::EngineExit { code: Some(2), .. }));
    }

    #[test]
    fn test_error_result_still_parses_last_text() {
        let engine = ScriptedEngine::new(vec![
            EngineEvent::AssistantText {
                text: FINAL.into(),
            },
            EngineEvent::EngineError {
                message: "error_max_turns".into(),
            },
        ]);
        let researcher = Researcher::with_engine(&engine, ResearchConfig::default());

        let record = tokio_test::block_on(researcher.run(&Subject::name("Jane Doe"))).unwrap();
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.tldr, "Engineer");
    }

    #[test]
    fn test_callbacks_and_capture() {
        let engine = ScriptedEngine::new(vec![
            EngineEvent::ToolUse {
                name: "WebSearch".into(),
            },
            EngineEvent::ToolUse {
                name: "WebFetch".into(),
            },
            EngineEvent::FinalResult {
                text: Some(FINAL.into()),
            },
        ]);
        let tools = Arc::new(Mutex::new(Vec::new()));
        let tools_clone = tools.clone();
        let researcher = Researcher::with_engine(&engine, ResearchConfig::default().verbose(true))
            .on_tool_use(move |e| {
                if let EngineEvent::ToolUse { name } = e {
                    tools_clone.lock().unwrap().push(name.clone());
                }
            })
            .capture_events(true);

        tokio_test::block_on(researcher.run(&Subject::name("Jane Doe"))).unwrap();
        assert_eq!(*tools.lock().unwrap(), vec!["WebSearch", "WebFetch"]);
        assert_eq!(researcher.take_events().len(), 3);
        assert!(researcher.take_events().is_empty());
    }
}
