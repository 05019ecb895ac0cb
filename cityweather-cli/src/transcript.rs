use async_trait::async_trait;
use cityweather_core::{RecognitionError, Transcriber};
use inquire::{InquireError, Text};

/// Transcript supplied on the command line.
#[derive(Debug)]
pub struct GivenTranscript(pub String);

#[async_trait]
impl Transcriber for GivenTranscript {
    async fn transcribe(&self) -> Result<String, RecognitionError> {
        if self.0.trim().is_empty() {
            return Err(RecognitionError::NoSpeech);
        }
        Ok(self.0.clone())
    }
}

/// Stands in for a speech service: the user types what they would have said.
#[derive(Debug, Default)]
pub struct PromptTranscriber;

#[async_trait]
impl Transcriber for PromptTranscriber {
    async fn transcribe(&self) -> Result<String, RecognitionError> {
        let answer = tokio::task::spawn_blocking(|| {
            Text::new("Say something:")
                .with_help_message("e.g. \"what is the weather in Tokyo\"")
                .prompt()
        })
        .await
        .map_err(|e| RecognitionError::Failed(e.to_string()))?;

        match answer {
            Ok(text) if text.trim().is_empty() => Err(RecognitionError::NoSpeech),
            Ok(text) => Ok(text),
            Err(InquireError::NotTTY) => {
                Err(RecognitionError::Unavailable("no terminal attached".into()))
            }
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Err(RecognitionError::NoSpeech)
            }
            Err(e) => Err(RecognitionError::Failed(e.to_string())),
        }
    }
}
