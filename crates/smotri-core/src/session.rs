use std::path::PathBuf;

use tracing::{info, warn};

use crate::{
    chat::ChatComplete,
    error::{Result, SmotriError},
    prompt::{self, CHAT_APOLOGY, ERROR_MARKER},
    staging,
    summarizer::Summarize,
    types::{ChatTurn, SummaryArtifact, VideoIdentity},
};

/// Lifecycle of one session. A differing video identity from any state
/// forces a hard reset back through `Identified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No video submitted.
    Empty,
    /// Identity set, summary absent.
    Identified,
    /// Summary request in flight.
    Summarizing,
    /// Summary present, chat enabled.
    Ready,
}

/// In-memory aggregate of the current video identity, its derived summary,
/// and the ordered chat transcript. Mutated only by the controller.
#[derive(Debug, Default)]
pub struct Session {
    identity: Option<VideoIdentity>,
    summary: Option<SummaryArtifact>,
    transcript: Vec<ChatTurn>,
}

impl Session {
    pub fn identity(&self) -> Option<&VideoIdentity> {
        self.identity.as_ref()
    }

    pub fn summary(&self) -> Option<&SummaryArtifact> {
        self.summary.as_ref()
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Same identity as the current video; nothing re-ran.
    Unchanged,
    /// New identity accepted and a summary (or failure artifact) stored.
    Summarized,
}

/// Owns the session and mediates between user input and the two remote
/// clients. Operations take `&mut self`, so one session processes one
/// operation at a time; there is no internal locking to get wrong.
pub struct SessionController<S, C> {
    session: Session,
    state: SessionState,
    staging_root: PathBuf,
    summarizer: S,
    chat: C,
}

impl<S: Summarize, C: ChatComplete> SessionController<S, C> {
    pub fn new(summarizer: S, chat: C) -> Self {
        Self {
            session: Session::default(),
            state: SessionState::Empty,
            staging_root: staging::staging_root(),
            summarizer,
            chat,
        }
    }

    /// Override the staging location (tests use a temp dir).
    pub fn with_staging_root(mut self, root: PathBuf) -> Self {
        self.staging_root = root;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current summary text, if a summarization has completed.
    pub fn summary_text(&self) -> Option<&str> {
        self.session.summary.as_ref().map(SummaryArtifact::text)
    }

    /// Accept a video. Re-submitting the current identity is a no-op; a new
    /// identity discards the previous summary and transcript, stages the
    /// bytes, and runs the summarizer exactly once. A summarizer failure is
    /// recorded as a failure artifact and the session still becomes `Ready`,
    /// with the error text standing in for the summary.
    pub async fn submit_video(
        &mut self,
        identity: VideoIdentity,
        bytes: &[u8],
    ) -> Result<SubmitOutcome> {
        if self.session.identity.as_ref() == Some(&identity) {
            return Ok(SubmitOutcome::Unchanged);
        }

        let video_path = staging::stage_video(&self.staging_root, &identity, bytes).await?;

        // Hard reset of all derived state before any remote work.
        self.session.summary = None;
        self.session.transcript.clear();
        self.session.identity = Some(identity.clone());
        self.state = SessionState::Identified;

        info!(identity = %identity, "summarizing new video");
        self.state = SessionState::Summarizing;
        let artifact = match self.summarizer.summarize(&video_path).await {
            Ok(text) => SummaryArtifact::Report(text),
            Err(e) => {
                warn!(identity = %identity, error = %e, "summarization failed");
                SummaryArtifact::Failed(format!("{ERROR_MARKER}{e}"))
            }
        };
        self.session.summary = Some(artifact);
        self.state = SessionState::Ready;
        Ok(SubmitOutcome::Summarized)
    }

    /// Answer one question about the current summary. Rejected until a
    /// summary exists; after that it never hard-fails, recording a fixed
    /// apology as the assistant turn when the chat provider errors.
    pub async fn ask(&mut self, question: &str) -> Result<String> {
        let Some(summary) = &self.session.summary else {
            return Err(SmotriError::SummaryNotReady);
        };
        let system = prompt::system_instruction(summary.text());

        self.session.transcript.push(ChatTurn::user(question));
        let history = &self.session.transcript[..self.session.transcript.len() - 1];

        let answer = match self.chat.respond(&system, history, question).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "chat completion failed");
                CHAT_APOLOGY.to_string()
            }
        };

        self.session.transcript.push(ChatTurn::assistant(answer.clone()));
        Ok(answer)
    }

    /// Withdraw the video: discard identity, summary, and transcript.
    pub fn clear(&mut self) {
        self.session = Session::default();
        self.state = SessionState::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    /// Answers with a fixed text, or fails every call when `response` is None.
    struct MockSummarizer {
        calls: Arc<AtomicUsize>,
        response: Option<String>,
    }

    impl MockSummarizer {
        fn returning(text: &str) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: Arc::clone(&calls),
                    response: Some(text.to_string()),
                },
                calls,
            )
        }

        fn failing() -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                response: None,
            }
        }
    }

    #[async_trait]
    impl Summarize for MockSummarizer {
        async fn summarize(&self, _video_path: &std::path::Path) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Some(text) => Ok(text.clone()),
                None => Err(SmotriError::ProcessingFailed {
                    state: "FAILED".to_string(),
                }),
            }
        }
    }

    /// Records every (system, history length, question) it sees and answers
    /// from a scripted list, erroring once the script runs out.
    struct MockChat {
        seen: Arc<Mutex<Vec<(String, usize, String)>>>,
        answers: Mutex<Vec<String>>,
    }

    impl MockChat {
        fn scripted(answers: &[&str]) -> (Self, Arc<Mutex<Vec<(String, usize, String)>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    seen: Arc::clone(&seen),
                    answers: Mutex::new(answers.iter().rev().map(|s| s.to_string()).collect()),
                },
                seen,
            )
        }
    }

    #[async_trait]
    impl ChatComplete for MockChat {
        async fn respond(
            &self,
            system: &str,
            history: &[ChatTurn],
            question: &str,
        ) -> Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), history.len(), question.to_string()));
            self.answers
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| SmotriError::ChatFailed {
                    reason: "scripted failure".to_string(),
                })
        }
    }

    fn controller(
        summarizer: MockSummarizer,
        chat: MockChat,
        tmp: &tempfile::TempDir,
    ) -> SessionController<MockSummarizer, MockChat> {
        SessionController::new(summarizer, chat).with_staging_root(tmp.path().to_path_buf())
    }

    #[tokio::test]
    async fn resubmitting_same_identity_is_a_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let (summarizer, calls) = MockSummarizer::returning("report");
        let (chat, _) = MockChat::scripted(&["a1"]);
        let mut ctl = controller(summarizer, chat, &tmp);

        let first = ctl
            .submit_video(VideoIdentity::from("A"), b"bytes")
            .await
            .unwrap();
        ctl.ask("q1").await.unwrap();
        let second = ctl
            .submit_video(VideoIdentity::from("A"), b"bytes")
            .await
            .unwrap();

        assert_eq!(first, SubmitOutcome::Summarized);
        assert_eq!(second, SubmitOutcome::Unchanged);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Derived state survives the repeat submission untouched.
        assert_eq!(ctl.summary_text(), Some("report"));
        assert_eq!(ctl.session().transcript().len(), 2);
    }

    #[tokio::test]
    async fn new_identity_resets_summary_and_transcript() {
        let tmp = tempfile::tempdir().unwrap();
        let (summarizer, calls) = MockSummarizer::returning("report");
        let (chat, _) = MockChat::scripted(&["a1"]);
        let mut ctl = controller(summarizer, chat, &tmp);

        ctl.submit_video(VideoIdentity::from("A"), b"one")
            .await
            .unwrap();
        ctl.ask("q1").await.unwrap();
        assert_eq!(ctl.session().transcript().len(), 2);

        ctl.submit_video(VideoIdentity::from("B"), b"two")
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(ctl.session().identity().map(|i| i.as_str()), Some("B"));
        assert!(ctl.session().transcript().is_empty());
        assert_eq!(ctl.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn ask_is_rejected_before_any_summary_exists() {
        let tmp = tempfile::tempdir().unwrap();
        let (summarizer, _) = MockSummarizer::returning("report");
        let (chat, seen) = MockChat::scripted(&["a1"]);
        let mut ctl = controller(summarizer, chat, &tmp);

        let err = ctl.ask("too early").await.unwrap_err();
        assert!(matches!(err, SmotriError::SummaryNotReady));
        assert!(seen.lock().unwrap().is_empty());
        assert!(ctl.session().transcript().is_empty());
    }

    #[tokio::test]
    async fn transcript_alternates_in_ask_order() {
        let tmp = tempfile::tempdir().unwrap();
        let (summarizer, _) = MockSummarizer::returning("report");
        let (chat, _) = MockChat::scripted(&["a1", "a2", "a3"]);
        let mut ctl = controller(summarizer, chat, &tmp);

        ctl.submit_video(VideoIdentity::from("A"), b"bytes")
            .await
            .unwrap();
        for q in ["q1", "q2", "q3"] {
            ctl.ask(q).await.unwrap();
        }

        let expected = vec![
            ChatTurn::user("q1"),
            ChatTurn::assistant("a1"),
            ChatTurn::user("q2"),
            ChatTurn::assistant("a2"),
            ChatTurn::user("q3"),
            ChatTurn::assistant("a3"),
        ];
        assert_eq!(ctl.session().transcript(), expected.as_slice());
    }

    #[tokio::test]
    async fn each_call_carries_all_prior_turns_and_the_summary() {
        let tmp = tempfile::tempdir().unwrap();
        let (summarizer, _) = MockSummarizer::returning("the summary text");
        let (chat, seen) = MockChat::scripted(&["a1", "a2", "a3"]);
        let mut ctl = controller(summarizer, chat, &tmp);

        ctl.submit_video(VideoIdentity::from("A"), b"bytes")
            .await
            .unwrap();
        for q in ["q1", "q2", "q3"] {
            ctl.ask(q).await.unwrap();
        }

        let seen = seen.lock().unwrap();
        for (k, (system, history_len, question)) in seen.iter().enumerate() {
            // k-th question sees 2k prior turns plus itself as the question.
            assert_eq!(*history_len, 2 * k);
            assert_eq!(question, &format!("q{}", k + 1));
            assert!(system.contains("the summary text"));
        }
    }

    #[tokio::test]
    async fn chat_failure_records_apology_instead_of_dangling_user_turn() {
        let tmp = tempfile::tempdir().unwrap();
        let (summarizer, _) = MockSummarizer::returning("report");
        // One scripted answer; the second call fails.
        let (chat, _) = MockChat::scripted(&["a1"]);
        let mut ctl = controller(summarizer, chat, &tmp);

        ctl.submit_video(VideoIdentity::from("A"), b"bytes")
            .await
            .unwrap();
        ctl.ask("q1").await.unwrap();
        let answer = ctl.ask("q2").await.unwrap();

        assert_eq!(answer, CHAT_APOLOGY);
        let transcript = ctl.session().transcript();
        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript[3], ChatTurn::assistant(CHAT_APOLOGY));
    }

    #[tokio::test]
    async fn failed_summarization_still_reaches_ready_with_error_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let summarizer = MockSummarizer::failing();
        let (chat, seen) = MockChat::scripted(&["a1"]);
        let mut ctl = controller(summarizer, chat, &tmp);

        ctl.submit_video(VideoIdentity::from("A"), b"bytes")
            .await
            .unwrap();

        assert_eq!(ctl.state(), SessionState::Ready);
        let summary = ctl.session().summary().unwrap();
        assert!(summary.is_failed());
        assert!(summary.text().starts_with(ERROR_MARKER));

        // Chat stays enabled; the error text feeds the system instruction.
        ctl.ask("what happened?").await.unwrap();
        let seen = seen.lock().unwrap();
        assert!(seen[0].0.contains(ERROR_MARKER));
    }

    #[tokio::test]
    async fn clear_returns_to_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let (summarizer, _) = MockSummarizer::returning("report");
        let (chat, _) = MockChat::scripted(&["a1"]);
        let mut ctl = controller(summarizer, chat, &tmp);

        ctl.submit_video(VideoIdentity::from("A"), b"bytes")
            .await
            .unwrap();
        ctl.ask("q1").await.unwrap();
        ctl.clear();

        assert_eq!(ctl.state(), SessionState::Empty);
        assert!(ctl.session().identity().is_none());
        assert!(ctl.session().summary().is_none());
        assert!(ctl.session().transcript().is_empty());
    }
}
