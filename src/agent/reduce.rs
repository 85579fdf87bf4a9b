//! Reduce the engine's event stream to the text that holds its answer.
//!
//! Later assistant text supersedes earlier text. A final result, once seen,
//! is kept regardless of what arrives after it. Engine-reported errors do
//! not touch the candidate, so text gathered before them still gets parsed.

use super::events::{EngineEvent, ResearchCallbacks};
use crate::error::Result;
use futures::{Stream, StreamExt};

/// Incremental last-write-wins reducer over engine events.
#[derive(Debug, Default, Clone)]
pub struct StreamReducer {
    candidate: String,
    final_result: bool,
}

impl StreamReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the candidate output.
    pub fn observe(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::AssistantText { text } if !self.final_result => {
                self.candidate.clone_from(text);
            }
            EngineEvent::FinalResult { text: Some(text) } => {
                self.candidate.clone_from(text);
                self.final_result = true;
            }
            _ => {}
        }
    }

    /// The current candidate output.
    pub fn output(&self) -> &str {
        &self.candidate
    }

    /// Whether a final result has been observed.
    pub fn has_final_result(&self) -> bool {
        self.final_result
    }

    pub fn finish(self) -> String {
        self.candidate
    }
}

/// Reduce a finished sequence of events.
pub fn reduce<'a>(events: impl IntoIterator<Item = &'a EngineEvent>) -> String {
    let mut reducer = StreamReducer::new();
    for event in events {
        reducer.observe(event);
    }
    reducer.finish()
}

/// Consume a live event stream until it ends, reporting every event to
/// `callbacks` before folding it in.
///
/// Stream errors (transport faults, a failed engine exit) abort the
/// reduction and nothing partial is returned. An engine-reported error
/// result is only logged.
pub async fn reduce_stream<S>(stream: S, callbacks: &ResearchCallbacks) -> Result<String>
where
    S: Stream<Item = Result<EngineEvent>>,
{
    let mut stream = std::pin::pin!(stream);
    let mut reducer = StreamReducer::new();
    let mut count = 0usize;

    while let Some(event) = stream.next().await {
        let event = event?;
        count += 1;
        callbacks.emit(&event);

        if let EngineEvent::EngineError { message } = &event {
            tracing::warn!(%message, "engine reported an error result, keeping last output");
        }
        reducer.observe(&event);
    }

    tracing::debug!(
        events = count,
        final_result = reducer.has_final_result(),
        chars = reducer.output().len(),
        "engine stream finished"
    );
    Ok(reducer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use futures::stream;
    use std::sync::{Arc, Mutex};

    fn text(t: &str) -> EngineEvent {
        EngineEvent::AssistantText { text: t.into() }
    }

    fn result(t: &str) -> EngineEvent {
        EngineEvent::FinalResult {
            text: Some(t.into()),
        }
    }

    #[test]
    fn test_final_result_wins() {
        assert_eq!(reduce(&[text("A"), text("B"), result("C")]), "C");
    }

    #[test]
    fn test_last_text_wins_without_final_result() {
        assert_eq!(reduce(&[text("A"), text("B")]), "B");
    }

    #[test]
    fn test_final_result_wins_regardless_of_order() {
        assert_eq!(reduce(&[text("A"), result("C"), text("B")]), "C");
    }

    #[test]
    fn test_final_result_without_text_keeps_candidate() {
        let events = [text("A"), EngineEvent::FinalResult { text: None }];
        assert_eq!(reduce(&events), "A");
    }

    #[test]
    fn test_empty_and_non_text_sequences() {
        assert_eq!(reduce(&[] as &[EngineEvent]), "");
        let events = [
            EngineEvent::ToolUse {
                name: "WebSearch".into(),
            },
            EngineEvent::Other {
                kind: "system".into(),
            },
        ];
        assert_eq!(reduce(&events), "");
    }

    #[test]
    fn test_tool_use_does_not_reset_candidate() {
        let events = [
            text("A"),
            EngineEvent::ToolUse {
                name: "WebFetch".into(),
            },
        ];
        assert_eq!(reduce(&events), "A");
    }

    #[test]
    fn test_reduce_stream_reports_every_event() {
        let seen = Arc::new(Mutex::new(0usize));
        let seen_clone = seen.clone();
        let callbacks = ResearchCallbacks {
            on_event: Some(Arc::new(move |_: &EngineEvent| *seen_clone.lock().unwrap() += 1)),
            ..Default::default()
        };

        let events = vec![
            Ok(text("A")),
            Ok(EngineEvent::ToolUse {
                name: "WebSearch".into(),
            }),
            Ok(text("B")),
            Ok(result("C")),
        ];
        let output = tokio_test::block_on(reduce_stream(stream::iter(events), &callbacks)).unwrap();

        assert_eq!(output, "C");
        assert_eq!(*seen.lock().unwrap(), 4);
    }

    #[test]
    fn test_reduce_stream_matches_verbose_and_silent() {
        let events = || {
            stream::iter(vec![
                Ok(text("A")),
                Ok(text("B")),
                Ok(EngineEvent::ToolUse {
                    name: "WebFetch".into(),
                }),
            ])
        };
        let silent =
            tokio_test::block_on(reduce_stream(events(), &ResearchCallbacks::default())).unwrap();
        let verbose = tokio_test::block_on(reduce_stream(
            events(),
            &crate::agent::events::verbose_callbacks(5),
        ))
        .unwrap();
        assert_eq!(silent, verbose);
        assert_eq!(silent, "B");
    }

    #[test]
    fn test_reduce_stream_propagates_stream_error() {
        let events = vec![
            Ok(text("A")),
            Err(Error::EngineExit {
                code: Some(1),
                stderr: "boom".into(),
            }),
        ];
        let err = tokio_test::block_on(reduce_stream(
            stream::iter(events),
            &ResearchCallbacks::default(),
        ))
        .unwrap_err();
        assert!(matches!(err, Error::EngineExit { code: Some(1), .. }));
    }

    #[test]
    fn test_reduce_stream_keeps_text_after_engine_error() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let errors_clone = errors.clone();
        let callbacks = ResearchCallbacks {
            on_error: Some(Arc::new(move |e: &EngineEvent| {
                if let EngineEvent::EngineError { message } = e {
                    errors_clone.lock().unwrap().push(message.clone());
                }
            })),
            ..Default::default()
        };

        let events = vec![
            Ok(text("A")),
            Ok(EngineEvent::EngineError {
                message: "error_max_turns".into(),
            }),
        ];
        let output =
            tokio_test::block_on(reduce_stream(stream::iter(events), &callbacks)).unwrap();
        assert_eq!(output, "A");
        assert_eq!(*errors.lock().unwrap(), vec!["error_max_turns".to_string()]);
    }
}
