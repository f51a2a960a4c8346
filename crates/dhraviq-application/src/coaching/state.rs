//! Observable state of the coaching workflow.

use std::collections::BTreeMap;

use crate::notice::Notice;
use dhraviq_core::analysis::CoachResponse;

/// Where a help request for one question stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HelpPhase {
    #[default]
    Idle,
    CheckingSession,
    CheckingCache,
    CheckingGate,
    /// Suspended until the user leaves an email.
    AwaitingContact,
    Fetching,
    Caching,
    Revealed,
    Failed,
}

impl HelpPhase {
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            HelpPhase::CheckingSession
                | HelpPhase::CheckingCache
                | HelpPhase::CheckingGate
                | HelpPhase::Fetching
                | HelpPhase::Caching
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuestionHelp {
    pub phase: HelpPhase,
    pub answer: Option<CoachResponse>,
    pub visible: bool,
}

/// Everything a front end renders for coaching.
///
/// Published as an immutable `Arc`; every change produces a new snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoachingSnapshot {
    /// Session the per-question state belongs to.
    pub session_id: Option<String>,
    /// Keyed by namespaced question reference.
    pub help: BTreeMap<String, QuestionHelp>,
    pub gate_open: bool,
    /// Question to resume once a contact is saved.
    pub pending_question: Option<String>,
    pub analyzing: bool,
    /// Oldest first.
    pub notices: Vec<Notice>,
}

impl CoachingSnapshot {
    pub fn phase(&self, question_id: &str) -> HelpPhase {
        self.help
            .get(question_id)
            .map(|h| h.phase)
            .unwrap_or_default()
    }

    pub fn answer(&self, question_id: &str) -> Option<&CoachResponse> {
        self.help.get(question_id)?.answer.as_ref()
    }

    pub fn is_visible(&self, question_id: &str) -> bool {
        self.help.get(question_id).is_some_and(|h| h.visible)
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Resets per-session state when the current session has changed.
    pub(crate) fn follow_session(&mut self, session_id: Option<String>) {
        if self.session_id != session_id {
            self.help.clear();
            self.pending_question = None;
            self.gate_open = false;
            self.session_id = session_id;
        }
    }

    pub(crate) fn entry(&mut self, question_id: &str) -> &mut QuestionHelp {
        self.help.entry(question_id.to_string()).or_default()
    }
}
