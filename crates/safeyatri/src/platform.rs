//! Contracts for capabilities the host platform may or may not provide.

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::session::Language;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Transcript {
    Interim(String),
    Final(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("{0} is not supported on this device")]
    Unsupported(&'static str),
    #[error("{0} permission was denied")]
    Denied(&'static str),
}

/// Streams transcripts until the utterance ends (channel closes).
pub trait SpeechToText: Send + Sync {
    fn listen(&self, language: Language) -> Result<mpsc::Receiver<Transcript>, CapabilityError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

pub trait InstallPrompt: Send + Sync {
    fn prompt(&self) -> Result<InstallOutcome, CapabilityError>;
}

/// Stand-in for hosts without speech or install support.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl SpeechToText for Unavailable {
    fn listen(&self, _language: Language) -> Result<mpsc::Receiver<Transcript>, CapabilityError> {
        Err(CapabilityError::Unsupported("speech recognition"))
    }
}

impl InstallPrompt for Unavailable {
    fn prompt(&self) -> Result<InstallOutcome, CapabilityError> {
        Err(CapabilityError::Unsupported("app installation"))
    }
}

/// Text input fed by dictation: interim text is replaced on every update,
/// final text is committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictationBuffer {
    committed: String,
    interim: String,
}

impl DictationBuffer {
    pub fn apply(&mut self, transcript: Transcript) {
        match transcript {
            Transcript::Interim(text) => self.interim = text,
            Transcript::Final(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    if !self.committed.is_empty() {
                        self.committed.push(' ');
                    }
                    self.committed.push_str(text);
                }
                self.interim.clear();
            }
        }
    }

    pub fn text(&self) -> String {
        match (self.committed.is_empty(), self.interim.trim().is_empty()) {
            (_, true) => self.committed.clone(),
            (true, false) => self.interim.trim().to_string(),
            (false, false) => format!("{} {}", self.committed, self.interim.trim()),
        }
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }
}

/// Listen until the platform ends the utterance and return the committed
/// text. Yields `None` when `cancel` fires first; whatever was heard so far
/// is discarded.
pub async fn dictate(
    speech: &dyn SpeechToText,
    language: Language,
    cancel: &CancellationToken,
) -> Result<Option<String>, CapabilityError> {
    let mut transcripts = speech.listen(language)?;
    let mut buffer = DictationBuffer::default();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(heard = buffer.text().len(), "dictation interrupted");
                return Ok(None);
            }
            next = transcripts.recv() => match next {
                Some(transcript) => buffer.apply(transcript),
                None => break,
            },
        }
    }

    Ok(Some(buffer.committed().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Scripted(Vec<Transcript>);

    impl SpeechToText for Scripted {
        fn listen(
            &self,
            _language: Language,
        ) -> Result<mpsc::Receiver<Transcript>, CapabilityError> {
            let (tx, rx) = mpsc::channel(self.0.len().max(1));
            for transcript in &self.0 {
                tx.try_send(transcript.clone()).expect("channel sized for script");
            }
            Ok(rx)
        }
    }

    /// Delivers its script but leaves the channel open, like a microphone
    /// that is still listening.
    #[derive(Default)]
    struct StillListening {
        script: Vec<Transcript>,
        open: Mutex<Option<mpsc::Sender<Transcript>>>,
    }

    impl SpeechToText for StillListening {
        fn listen(
            &self,
            _language: Language,
        ) -> Result<mpsc::Receiver<Transcript>, CapabilityError> {
            let (tx, rx) = mpsc::channel(self.script.len().max(1));
            for transcript in &self.script {
                tx.try_send(transcript.clone()).expect("channel sized for script");
            }
            *self.open.lock().expect("sender mutex poisoned") = Some(tx);
            Ok(rx)
        }
    }

    #[test]
    fn interim_text_is_replaced_until_final() {
        let mut buffer = DictationBuffer::default();
        buffer.apply(Transcript::Interim("near".into()));
        buffer.apply(Transcript::Interim("nearest bus".into()));
        assert_eq!(buffer.text(), "nearest bus");
        buffer.apply(Transcript::Final("nearest bus stop".into()));
        buffer.apply(Transcript::Interim("please".into()));
        assert_eq!(buffer.text(), "nearest bus stop please");
        assert_eq!(buffer.committed(), "nearest bus stop");
    }

    #[tokio::test]
    async fn dictation_returns_committed_text() {
        let speech = Scripted(vec![
            Transcript::Interim("find".into()),
            Transcript::Final("find ATM".into()),
            Transcript::Interim("near".into()),
        ]);
        let text = dictate(&speech, Language::Hi, &CancellationToken::new())
            .await
            .expect("speech available");
        assert_eq!(text.as_deref(), Some("find ATM"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_dictation_discards_committed_text() {
        let speech = StillListening {
            script: vec![Transcript::Final("find ATM".into())],
            ..StillListening::default()
        };
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            canceller.cancel();
        });

        let text = dictate(&speech, Language::En, &token)
            .await
            .expect("speech available");
        assert_eq!(text, None);
    }

    #[tokio::test]
    async fn unavailable_platform_reports_unsupported() {
        let err = dictate(&Unavailable, Language::En, &CancellationToken::new())
            .await
            .expect_err("no speech support");
        assert_eq!(err, CapabilityError::Unsupported("speech recognition"));
        assert!(Unavailable.prompt().is_err());
    }
}
