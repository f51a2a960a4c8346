//! Hand-written test doubles for the service traits.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;

use dhraviq_core::analysis::{AnalysisResult, CoachResponse, Evaluation};
use dhraviq_core::coach::CoachingApi;
use dhraviq_core::error::{DhraviqError, Endpoint, Result};
use dhraviq_core::identity::{ContactDirectory, ContactRecord, Identity, IdentityProvider};
use dhraviq_core::question::{Category, Difficulty, Question};
use dhraviq_core::reference::CompanyPack;
use dhraviq_core::session::Session;
use dhraviq_core::store::LocalStore;

pub fn sample_analysis(question_count: usize) -> AnalysisResult {
    AnalysisResult {
        evaluation: Evaluation {
            dhraviq_score: 74,
            ats_score: 70,
            content_score: 78,
            impact_score: 69,
        },
        summary: "Strong systems background.".to_string(),
        questions: (1..=question_count)
            .map(|i| {
                Question::new(
                    format!("q{i}"),
                    Category::Technical,
                    Difficulty::Medium,
                    format!("Question number {i}?"),
                )
            })
            .collect(),
    }
}

/// In-memory store. Every write bumps a counter; failures can be switched on.
#[derive(Default)]
pub struct MockStore {
    sessions: Mutex<HashMap<String, Session>>,
    answers: Mutex<HashMap<(String, String), String>>,
    companies: Mutex<HashMap<String, CompanyPack>>,
    hr_bank: Mutex<Vec<Question>>,
    clock: AtomicUsize,
    pub answer_reads: AtomicUsize,
    pub answer_writes: AtomicUsize,
    pub fail_all: AtomicBool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&self) -> Result<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            Err(DhraviqError::storage("store unavailable"))
        } else {
            Ok(())
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[async_trait]
impl LocalStore for MockStore {
    async fn save_session(
        &self,
        id: &str,
        resume_text: &str,
        analysis: &AnalysisResult,
    ) -> Result<Session> {
        self.check()?;
        let now = self.clock.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let mut sessions = self.sessions.lock().unwrap();
        let created_at = sessions.get(id).map(|s| s.created_at).unwrap_or(now);
        let session = Session {
            id: id.to_string(),
            resume_text: resume_text.to_string(),
            analysis: analysis.clone(),
            created_at,
            last_accessed: now,
        };
        sessions.insert(id.to_string(), session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>> {
        self.check()?;
        Ok(self.sessions.lock().unwrap().get(id).cloned())
    }

    async fn get_last_session(&self) -> Result<Option<Session>> {
        self.check()?;
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .max_by(|a, b| {
                a.last_accessed
                    .cmp(&b.last_accessed)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .cloned())
    }

    async fn delete_session(&self, id: &str) -> Result<()> {
        self.check()?;
        self.sessions.lock().unwrap().remove(id);
        Ok(())
    }

    async fn save_answer(&self, question_id: &str, session_id: &str, answer: &str) -> Result<()> {
        self.answer_writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.answers.lock().unwrap().insert(
            (question_id.to_string(), session_id.to_string()),
            answer.to_string(),
        );
        Ok(())
    }

    async fn get_answer(&self, question_id: &str, session_id: &str) -> Result<Option<String>> {
        self.answer_reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .answers
            .lock()
            .unwrap()
            .get(&(question_id.to_string(), session_id.to_string()))
            .cloned())
    }

    async fn save_company_data(&self, company: &CompanyPack) -> Result<()> {
        self.check()?;
        self.companies
            .lock()
            .unwrap()
            .insert(company.id.clone(), company.clone());
        Ok(())
    }

    async fn get_company_data(&self, company_id: &str) -> Result<Option<CompanyPack>> {
        self.check()?;
        Ok(self.companies.lock().unwrap().get(company_id).cloned())
    }

    async fn get_all_companies(&self) -> Result<Vec<CompanyPack>> {
        self.check()?;
        let mut companies: Vec<CompanyPack> =
            self.companies.lock().unwrap().values().cloned().collect();
        companies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(companies)
    }

    async fn preload_hr_bank(&self, questions: &[Question]) -> Result<()> {
        self.check()?;
        let mut bank = self.hr_bank.lock().unwrap();
        for question in questions {
            bank.retain(|q| q.id != question.id);
            bank.push(question.clone());
        }
        bank.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(())
    }

    async fn get_hr_bank(&self) -> Result<Vec<Question>> {
        self.check()?;
        Ok(self.hr_bank.lock().unwrap().clone())
    }

    async fn clear_old_sessions(&self, _max_age: Duration) -> Result<usize> {
        self.check()?;
        Ok(0)
    }
}

/// Coaching API double that counts calls.
///
/// When `gate` is set, each help call waits for a permit before answering.
#[derive(Default)]
pub struct MockCoach {
    pub analyze_calls: AtomicUsize,
    pub help_calls: AtomicUsize,
    pub fail_help: AtomicBool,
    pub fail_analyze: AtomicBool,
    pub questions: usize,
    pub gate: Option<Semaphore>,
    pub last_profile: Mutex<Option<String>>,
}

impl MockCoach {
    pub fn new(questions: usize) -> Self {
        Self {
            questions,
            ..Self::default()
        }
    }

    /// Help calls block until [`MockCoach::release`] is called.
    pub fn held(questions: usize) -> Self {
        Self {
            questions,
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn help_calls(&self) -> usize {
        self.help_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CoachingApi for MockCoach {
    async fn analyze_resume(&self, _resume_text: &str) -> Result<AnalysisResult> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_analyze.load(Ordering::SeqCst) {
            return Err(DhraviqError::request(
                Endpoint::Analysis,
                Some(502),
                "Bad Gateway",
            ));
        }
        Ok(sample_analysis(self.questions))
    }

    async fn get_question_help(
        &self,
        question_text: &str,
        profile_text: &str,
    ) -> Result<CoachResponse> {
        self.help_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_profile.lock().unwrap() = Some(profile_text.to_string());
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| DhraviqError::internal(e.to_string()))?
                .forget();
        }
        if self.fail_help.load(Ordering::SeqCst) {
            return Err(DhraviqError::request(
                Endpoint::Coaching,
                Some(503),
                "Service Unavailable",
            ));
        }
        Ok(CoachResponse {
            model_answer: format!("Answer to: {question_text}"),
            key_points: vec!["structure".to_string()],
            ..CoachResponse::default()
        })
    }
}

pub struct MockIdentityProvider {
    user_id: Option<String>,
    pub calls: AtomicUsize,
}

impl MockIdentityProvider {
    pub fn succeeding(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            user_id: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn provision(&self) -> Result<Identity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match &self.user_id {
            Some(id) => Ok(Identity::provisioned(id.clone(), "token")),
            None => Err(DhraviqError::IdentityProvision("offline".to_string())),
        }
    }
}

#[derive(Default)]
pub struct MockContactDirectory {
    records: Mutex<HashMap<String, ContactRecord>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl MockContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user_id: &str, record: ContactRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(user_id.to_string(), record);
    }

    pub fn stored(&self, user_id: &str) -> Option<ContactRecord> {
        self.records.lock().unwrap().get(user_id).cloned()
    }
}

#[async_trait]
impl ContactDirectory for MockContactDirectory {
    async fn put_contact(&self, identity: &Identity, record: &ContactRecord) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DhraviqError::Gate("directory unavailable".to_string()));
        }
        self.insert(&identity.user_id, record.clone());
        Ok(())
    }

    async fn get_contact(&self, identity: &Identity) -> Result<Option<ContactRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DhraviqError::request(Endpoint::Identity, None, "offline"));
        }
        Ok(self.stored(&identity.user_id))
    }
}
