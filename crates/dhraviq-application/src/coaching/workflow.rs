//! Coaching workflow controller.
//!
//! Drives a help request for one question through
//! session check → cache check → gate check → fetch → cache write → reveal,
//! suspending at the gate until a contact is captured.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use super::state::{CoachingSnapshot, HelpPhase};
use crate::catalog::QuestionCatalog;
use crate::gate::GateManager;
use crate::notice::Notice;
use crate::session::SessionManager;
use dhraviq_core::analysis::CoachResponse;
use dhraviq_core::coach::CoachingApi;
use dhraviq_core::error::{DhraviqError, Result};
use dhraviq_core::identity::Email;
use dhraviq_core::question::QuestionRef;
use dhraviq_core::session::Session;
use dhraviq_core::store::LocalStore;
use dhraviq_core::upload::{ProfileInput, domain_profile_text};
use dhraviq_infrastructure::extract_resume_text;

const MAX_NOTICES: usize = 20;

/// How a help request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum HelpOutcome {
    Revealed {
        answer: CoachResponse,
        from_cache: bool,
    },
    /// The gate is open; the request resumes after a contact is saved.
    AwaitingContact,
    NoSession,
    Failed(String),
}

type InFlight = Shared<BoxFuture<'static, HelpOutcome>>;

struct Inner {
    store: Arc<dyn LocalStore>,
    coach: Arc<dyn CoachingApi>,
    gate: Arc<GateManager>,
    sessions: Arc<SessionManager>,
    catalog: Arc<QuestionCatalog>,
    snapshot: watch::Sender<Arc<CoachingSnapshot>>,
    /// One pending run per (question, session).
    in_flight: Mutex<HashMap<(String, String), InFlight>>,
}

#[derive(Clone)]
pub struct CoachingWorkflow {
    inner: Arc<Inner>,
}

impl CoachingWorkflow {
    pub fn new(
        store: Arc<dyn LocalStore>,
        coach: Arc<dyn CoachingApi>,
        gate: Arc<GateManager>,
        sessions: Arc<SessionManager>,
        catalog: Arc<QuestionCatalog>,
    ) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(CoachingSnapshot::default()));
        Self {
            inner: Arc::new(Inner {
                store,
                coach,
                gate,
                sessions,
                catalog,
                snapshot,
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<CoachingSnapshot>> {
        self.inner.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> Arc<CoachingSnapshot> {
        self.inner.snapshot.borrow().clone()
    }

    /// Requests coaching for a namespaced question id.
    ///
    /// A second request for the same question and session while one is
    /// pending shares its outcome instead of starting another fetch.
    pub async fn request_help(&self, question_id: &str) -> HelpOutcome {
        let inner = &self.inner;

        let Some(session) = inner.sessions.current() else {
            inner.update(|s| {
                s.entry(question_id).phase = HelpPhase::Failed;
                push_notice(
                    s,
                    Notice::error("No session", "No session found. Upload a resume first."),
                );
            });
            return HelpOutcome::NoSession;
        };

        let key = (question_id.to_string(), session.id.clone());
        let run = {
            let mut in_flight = inner
                .in_flight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match in_flight.get(&key) {
                Some(pending) => pending.clone(),
                None => {
                    inner.set_phase(&session.id, question_id, HelpPhase::CheckingSession);
                    let run = Inner::run(
                        self.inner.clone(),
                        question_id.to_string(),
                        session,
                        key.clone(),
                    )
                    .boxed()
                    .shared();
                    in_flight.insert(key, run.clone());
                    run
                }
            }
        };
        run.await
    }

    /// Saves the contact and resumes the pending request, if any.
    ///
    /// Returns the outcome of the resumed request.
    pub async fn submit_contact(&self, raw_email: &str) -> Result<Option<HelpOutcome>> {
        let inner = &self.inner;
        let email = match Email::parse(raw_email) {
            Ok(email) => email,
            Err(e) => {
                inner.update(|s| {
                    push_notice(
                        s,
                        Notice::error("Invalid email", "Please enter a valid email address."),
                    )
                });
                return Err(e);
            }
        };

        if !inner.gate.save_contact(&email).await {
            inner.update(|s| {
                push_notice(
                    s,
                    Notice::error("Error saving email", "Please try again or contact support."),
                )
            });
            return Err(DhraviqError::Gate("contact could not be saved".to_string()));
        }

        let mut pending = None;
        inner.update(|s| {
            pending = s.pending_question.take();
            s.gate_open = false;
            push_notice(
                s,
                Notice::info("Email saved", "You now have access to AI coaching answers!"),
            );
        });

        match pending {
            Some(question_id) => Ok(Some(self.request_help(&question_id).await)),
            None => Ok(None),
        }
    }

    /// Clears the current session along with its coaching state.
    pub async fn clear_session(&self) -> Result<()> {
        let result = self.inner.sessions.clear_session().await;
        self.inner.update(|_| {});
        result
    }

    /// Closes the gate and drops the pending request.
    pub fn dismiss_gate(&self) {
        self.inner.update(|s| {
            if let Some(question_id) = s.pending_question.take() {
                s.entry(&question_id).phase = HelpPhase::Idle;
            }
            s.gate_open = false;
        });
    }

    /// Flips whether a revealed answer is shown. Returns the new visibility.
    pub fn toggle_answer_visibility(&self, question_id: &str) -> bool {
        let mut visible = false;
        self.inner.update(|s| {
            if let Some(help) = s.help.get_mut(question_id) {
                if help.answer.is_some() {
                    help.visible = !help.visible;
                    visible = help.visible;
                }
            }
        });
        visible
    }

    /// Analyzes a resume or a domain profile and makes the result the current session.
    pub async fn analyze_profile(&self, input: ProfileInput) -> Result<Arc<Session>> {
        let inner = &self.inner;
        inner.update(|s| s.analyzing = true);

        let result = inner.analyze(input).await;
        match &result {
            Ok(session) => {
                let score = session.analysis.evaluation.dhraviq_score;
                let band = session.analysis.evaluation.readiness();
                inner.update(|s| {
                    s.analyzing = false;
                    push_notice(
                        s,
                        Notice::info(
                            "Analysis complete",
                            format!("Your Dhraviq score is {score} ({band})."),
                        ),
                    );
                });
            }
            Err(e) => {
                tracing::error!("Profile analysis failed: {}", e);
                let title = if e.is_validation() {
                    "Invalid upload"
                } else {
                    "Analysis failed"
                };
                let message = e.to_string();
                inner.update(|s| {
                    s.analyzing = false;
                    push_notice(s, Notice::error(title, message));
                });
            }
        }
        result
    }
}

fn push_notice(snapshot: &mut CoachingSnapshot, notice: Notice) {
    snapshot.notices.push(notice);
    if snapshot.notices.len() > MAX_NOTICES {
        let excess = snapshot.notices.len() - MAX_NOTICES;
        snapshot.notices.drain(..excess);
    }
}

impl Inner {
    /// Applies `f` to a copy of the snapshot and publishes the copy.
    ///
    /// Per-question state left over from a previous session is dropped first.
    fn update(&self, f: impl FnOnce(&mut CoachingSnapshot)) {
        let current = self.sessions.current().map(|session| session.id.clone());
        self.publish(current, f);
    }

    /// Like [`Inner::update`], but skipped once `session_id` is no longer current.
    fn update_for(&self, session_id: &str, f: impl FnOnce(&mut CoachingSnapshot)) {
        let current = self.sessions.current().map(|session| session.id.clone());
        if current.as_deref() != Some(session_id) {
            tracing::debug!(session_id, "Session changed, dropping coaching update");
            return;
        }
        self.publish(current, f);
    }

    fn publish(&self, session_id: Option<String>, f: impl FnOnce(&mut CoachingSnapshot)) {
        self.snapshot.send_modify(|current| {
            let mut next = CoachingSnapshot::clone(current);
            next.follow_session(session_id);
            f(&mut next);
            *current = Arc::new(next);
        });
    }

    fn set_phase(&self, session_id: &str, question_id: &str, phase: HelpPhase) {
        tracing::debug!(question_id, ?phase, "Help phase");
        self.update_for(session_id, |s| s.entry(question_id).phase = phase);
    }

    async fn run(
        self: Arc<Self>,
        question_id: String,
        session: Arc<Session>,
        key: (String, String),
    ) -> HelpOutcome {
        let outcome = self.steps(&question_id, &session).await;
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&key);
        outcome
    }

    async fn steps(&self, question_id: &str, session: &Session) -> HelpOutcome {
        let question = match QuestionRef::parse(question_id) {
            Ok(question_ref) => self.catalog.resolve(&question_ref, session).await,
            Err(e) => Err(e),
        };
        let question = match question {
            Ok(Some(question)) => question,
            Ok(None) => {
                return self.fail_unknown(session, question_id, "This question is not available.");
            }
            Err(e) => return self.fail_unknown(session, question_id, &e.to_string()),
        };

        self.set_phase(&session.id, question_id, HelpPhase::CheckingCache);
        match self.store.get_answer(question_id, &session.id).await {
            Ok(Some(cached)) => {
                let answer = CoachResponse::from_cached_text(&cached);
                self.reveal(session, question_id, answer.clone());
                return HelpOutcome::Revealed {
                    answer,
                    from_cache: true,
                };
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(question_id, "Answer cache unavailable: {}", e),
        }

        self.set_phase(&session.id, question_id, HelpPhase::CheckingGate);
        if !self.gate.has_contact().await {
            self.update_for(&session.id, |s| {
                s.entry(question_id).phase = HelpPhase::AwaitingContact;
                s.gate_open = true;
                s.pending_question = Some(question_id.to_string());
            });
            return HelpOutcome::AwaitingContact;
        }

        self.set_phase(&session.id, question_id, HelpPhase::Fetching);
        let answer = match self
            .coach
            .get_question_help(&question.text, &session.resume_text)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(question_id, "Coaching request failed: {}", e);
                let message = e.to_string();
                self.update_for(&session.id, |s| {
                    s.entry(question_id).phase = HelpPhase::Idle;
                    push_notice(s, Notice::error("Failed to get help", message.clone()));
                });
                return HelpOutcome::Failed(message);
            }
        };

        self.set_phase(&session.id, question_id, HelpPhase::Caching);
        if let Err(e) = self
            .store
            .save_answer(question_id, &session.id, &answer.to_cached_text())
            .await
        {
            tracing::warn!(question_id, "Failed to cache answer: {}", e);
        }

        self.reveal(session, question_id, answer.clone());
        HelpOutcome::Revealed {
            answer,
            from_cache: false,
        }
    }

    fn reveal(&self, session: &Session, question_id: &str, answer: CoachResponse) {
        self.update_for(&session.id, |s| {
            let help = s.entry(question_id);
            help.phase = HelpPhase::Revealed;
            help.answer = Some(answer);
            help.visible = true;
        });
    }

    fn fail_unknown(&self, session: &Session, question_id: &str, message: &str) -> HelpOutcome {
        self.update_for(&session.id, |s| {
            s.entry(question_id).phase = HelpPhase::Failed;
            push_notice(s, Notice::error("Unknown question", message));
        });
        HelpOutcome::Failed(message.to_string())
    }

    async fn analyze(&self, input: ProfileInput) -> Result<Arc<Session>> {
        let profile_text = match input {
            ProfileInput::Resume(upload) => extract_resume_text(&upload).await?,
            ProfileInput::Domain { domain, level } => domain_profile_text(domain, level),
        };
        let analysis = self.coach.analyze_resume(&profile_text).await?;
        self.sessions.create_session(&profile_text, analysis).await
    }
}
