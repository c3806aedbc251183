/// Interaction state for the converter window
///
/// The UI never mutates flags directly. Every change goes through the
/// transitions on [`Session`], which keeps illegal combinations (an error
/// and a result at once, a result while converting) unrepresentable.

use iced::widget::image::Handle;

use crate::convert::{Conversion, ConvertError, ConvertedArtifact, SourceFile};

pub const NO_FILE_MESSAGE: &str = "Please select a file first.";
pub const UNSUPPORTED_MESSAGE: &str = "Conversion failed or unsupported file type.";
pub const FAILURE_MESSAGE: &str = "Error during conversion. Please try again.";

/// Displayable handle for a converted artifact.
///
/// Lives inside [`InteractionState::Succeeded`] and is released when that
/// state is replaced.
#[derive(Debug, Clone)]
pub struct PreviewRef {
    handle: Handle,
}

impl PreviewRef {
    fn new(artifact: &ConvertedArtifact) -> Self {
        Self {
            handle: Handle::from_bytes(artifact.bytes.to_vec()),
        }
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

/// Where the user is in the select / convert cycle
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    FileSelected(SourceFile),
    Converting(SourceFile),
    Succeeded {
        file: SourceFile,
        artifact: ConvertedArtifact,
        preview: PreviewRef,
    },
    Failed {
        file: Option<SourceFile>,
        message: &'static str,
    },
}

/// What the gate reported back, reduced to what the UI needs
#[derive(Debug, Clone)]
pub enum ConversionOutcome {
    Converted(ConvertedArtifact),
    Unsupported,
    /// Read or encoder failure; the cause is logged, not shown
    Failed(String),
}

impl From<Result<Conversion, ConvertError>> for ConversionOutcome {
    fn from(result: Result<Conversion, ConvertError>) -> Self {
        match result {
            Ok(Conversion::Converted(artifact)) => ConversionOutcome::Converted(artifact),
            Ok(Conversion::Unsupported { .. }) => ConversionOutcome::Unsupported,
            Err(e) => ConversionOutcome::Failed(e.to_string()),
        }
    }
}

/// A conversion the UI should start
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub generation: u64,
    pub file: SourceFile,
}

/// Owns the interaction state and the request generation counter
#[derive(Debug, Default)]
pub struct Session {
    state: InteractionState,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Replace the selected file from any state.
    ///
    /// Any artifact, preview or error is dropped, and a conversion still in
    /// flight becomes stale.
    pub fn select_file(&mut self, file: SourceFile) {
        tracing::info!(
            file = file.name(),
            declared = file.declared_type().unwrap_or("unknown"),
            "file selected"
        );
        self.generation += 1;
        self.state = InteractionState::FileSelected(file);
    }

    /// Handle a press on the convert button.
    ///
    /// Returns the request to run, or `None` when nothing should start.
    pub fn trigger(&mut self) -> Option<ConvertRequest> {
        if self.is_converting() {
            return None;
        }
        let Some(file) = self.file().cloned() else {
            self.state = InteractionState::Failed {
                file: None,
                message: NO_FILE_MESSAGE,
            };
            return None;
        };

        self.generation += 1;
        self.state = InteractionState::Converting(file.clone());

        Some(ConvertRequest {
            generation: self.generation,
            file,
        })
    }

    /// Apply the result of the request tagged `generation`.
    ///
    /// Returns `false` when the result belongs to a superseded request and
    /// was ignored.
    pub fn finish(&mut self, generation: u64, outcome: ConversionOutcome) -> bool {
        let InteractionState::Converting(file) = &self.state else {
            tracing::debug!(generation, "ignoring result, no conversion in flight");
            return false;
        };
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "ignoring stale conversion result");
            return false;
        }
        let file = file.clone();

        self.state = match outcome {
            ConversionOutcome::Converted(artifact) => {
                let preview = PreviewRef::new(&artifact);
                InteractionState::Succeeded {
                    file,
                    artifact,
                    preview,
                }
            }
            ConversionOutcome::Unsupported => InteractionState::Failed {
                file: Some(file),
                message: UNSUPPORTED_MESSAGE,
            },
            ConversionOutcome::Failed(cause) => {
                tracing::error!(file = file.name(), %cause, "error during image conversion");
                InteractionState::Failed {
                    file: Some(file),
                    message: FAILURE_MESSAGE,
                }
            }
        };

        true
    }

    pub fn file(&self) -> Option<&SourceFile> {
        match &self.state {
            InteractionState::Idle => None,
            InteractionState::FileSelected(file)
            | InteractionState::Converting(file)
            | InteractionState::Succeeded { file, .. } => Some(file),
            InteractionState::Failed { file, .. } => file.as_ref(),
        }
    }

    pub fn is_converting(&self) -> bool {
        matches!(self.state, InteractionState::Converting(_))
    }

    /// The convert button is enabled only with a file and nothing in flight
    pub fn can_convert(&self) -> bool {
        self.file().is_some() && !self.is_converting()
    }

    pub fn error(&self) -> Option<&'static str> {
        match &self.state {
            InteractionState::Failed { message, .. } => Some(*message),
            _ => None,
        }
    }

    pub fn artifact(&self) -> Option<&ConvertedArtifact> {
        match &self.state {
            InteractionState::Succeeded { artifact, .. } => Some(artifact),
            _ => None,
        }
    }

    pub fn preview(&self) -> Option<&PreviewRef> {
        match &self.state {
            InteractionState::Succeeded { preview, .. } => Some(preview),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn file(name: &str) -> SourceFile {
        SourceFile::from_bytes(name, None, b"content".to_vec())
    }

    fn artifact(name: &str) -> ConvertedArtifact {
        ConvertedArtifact {
            name: name.to_string(),
            media_type: "image/png",
            bytes: Arc::from(&b"png"[..]),
        }
    }

    #[test]
    fn test_starts_idle_and_disabled() {
        let session = Session::new();
        assert!(matches!(session.state(), InteractionState::Idle));
        assert!(!session.can_convert());
        assert_eq!(session.error(), None);
        assert!(session.artifact().is_none());
    }

    #[test]
    fn test_select_enables_convert() {
        let mut session = Session::new();
        session.select_file(file("test.png"));
        assert!(session.can_convert());
        assert_eq!(session.file().map(SourceFile::name), Some("test.png"));
    }

    #[test]
    fn test_trigger_without_file_sets_error() {
        let mut session = Session::new();

        assert!(session.trigger().is_none());
        assert_eq!(session.error(), Some(NO_FILE_MESSAGE));
        assert!(!session.can_convert());

        // Pressing again keeps the same error and still starts nothing
        assert!(session.trigger().is_none());
        assert_eq!(session.error(), Some(NO_FILE_MESSAGE));
    }

    #[test]
    fn test_successful_conversion() {
        let mut session = Session::new();
        session.select_file(file("test.jpeg"));

        let request = session.trigger().unwrap();
        assert_eq!(request.file.name(), "test.jpeg");
        assert!(session.is_converting());
        assert!(!session.can_convert());

        assert!(session.finish(request.generation, ConversionOutcome::Converted(artifact("test.png"))));

        assert_eq!(session.artifact().map(|a| a.name.as_str()), Some("test.png"));
        assert!(session.preview().is_some());
        assert_eq!(session.error(), None);
        assert!(session.can_convert());
    }

    #[test]
    fn test_unsupported_conversion() {
        let mut session = Session::new();
        session.select_file(file("unknown.xyz"));
        let request = session.trigger().unwrap();

        session.finish(request.generation, ConversionOutcome::Unsupported);

        assert_eq!(session.error(), Some(UNSUPPORTED_MESSAGE));
        assert!(session.artifact().is_none());
        assert!(session.can_convert());
    }

    #[test]
    fn test_failed_conversion_hides_cause() {
        let mut session = Session::new();
        session.select_file(file("input.jpeg"));
        let request = session.trigger().unwrap();

        session.finish(request.generation, ConversionOutcome::Failed("decoder blew up".into()));

        assert_eq!(session.error(), Some(FAILURE_MESSAGE));
        assert!(session.preview().is_none());
        assert!(session.can_convert());
    }

    #[test]
    fn test_new_selection_clears_success() {
        let mut session = Session::new();
        session.select_file(file("input1.jpeg"));
        let request = session.trigger().unwrap();
        session.finish(request.generation, ConversionOutcome::Converted(artifact("input1.png")));

        session.select_file(file("input2.gif"));

        assert!(matches!(session.state(), InteractionState::FileSelected(f) if f.name() == "input2.gif"));
        assert!(session.artifact().is_none());
        assert!(session.preview().is_none());
        assert_eq!(session.error(), None);
        assert!(session.can_convert());
    }

    #[test]
    fn test_new_selection_clears_error() {
        let mut session = Session::new();
        session.trigger();
        assert!(session.error().is_some());

        session.select_file(file("a.png"));
        assert_eq!(session.error(), None);
    }

    #[test]
    fn test_trigger_ignored_while_converting() {
        let mut session = Session::new();
        session.select_file(file("a.png"));
        let first = session.trigger().unwrap();

        assert!(session.trigger().is_none());
        assert!(session.is_converting());
        assert!(session.finish(first.generation, ConversionOutcome::Unsupported));
    }

    #[test]
    fn test_retry_after_failure() {
        let mut session = Session::new();
        session.select_file(file("a.png"));
        let first = session.trigger().unwrap();
        session.finish(first.generation, ConversionOutcome::Failed("io".into()));

        let second = session.trigger().unwrap();
        assert_eq!(second.file.name(), "a.png");
        assert!(second.generation > first.generation);
        assert_eq!(session.error(), None);
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut session = Session::new();
        session.select_file(file("old.jpeg"));
        let stale = session.trigger().unwrap();

        session.select_file(file("new.gif"));
        assert!(!session.finish(stale.generation, ConversionOutcome::Converted(artifact("old.png"))));
        assert!(matches!(session.state(), InteractionState::FileSelected(f) if f.name() == "new.gif"));

        let fresh = session.trigger().unwrap();
        assert!(!session.finish(stale.generation, ConversionOutcome::Unsupported));
        assert!(session.is_converting());
        assert!(session.finish(fresh.generation, ConversionOutcome::Converted(artifact("new.png"))));
        assert_eq!(session.artifact().map(|a| a.name.as_str()), Some("new.png"));
    }

    #[test]
    fn test_outcome_from_gate_result() {
        let converted = ConversionOutcome::from(Ok(Conversion::Converted(artifact("x.png"))));
        assert!(matches!(converted, ConversionOutcome::Converted(_)));

        let unsupported = ConversionOutcome::from(Ok(Conversion::Unsupported { sniffed: None }));
        assert!(matches!(unsupported, ConversionOutcome::Unsupported));

        let failed = ConversionOutcome::from(Err(ConvertError::Task("boom".into())));
        assert!(matches!(failed, ConversionOutcome::Failed(ref cause) if cause.contains("boom")));
    }
}
