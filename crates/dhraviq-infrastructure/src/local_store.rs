//! AsyncDirStorage-based LocalStore implementation.
//!
//! One JSON document per record, one directory per collection:
//!
//! ```text
//! <data dir>/
//! ├── sessions/<session id>.json
//! ├── answers/<v5 key of (question id, session id)>.json
//! ├── companies/<company id>.json
//! └── hr_bank/<question id>.json
//! ```
//!
//! The store opens lazily. The first operation creates the directories,
//! registers the migrators and builds the session index; concurrent first
//! calls share that single open.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use uuid::Uuid;
use version_migrate::AsyncDirStorage;

use crate::dto::{
    create_answer_migrator, create_company_migrator, create_hr_question_migrator,
    create_session_migrator,
};
use crate::paths::{Collection, DhraviqPaths};
use crate::session_index::SessionIndex;
use dhraviq_core::analysis::AnalysisResult;
use dhraviq_core::answer::CachedAnswer;
use dhraviq_core::clock::{Clock, SystemClock};
use dhraviq_core::error::{DhraviqError, Result};
use dhraviq_core::question::Question;
use dhraviq_core::reference::CompanyPack;
use dhraviq_core::session::Session;
use dhraviq_core::store::LocalStore;

const SESSION_ENTITY: &str = "session";
const ANSWER_ENTITY: &str = "answer";
const COMPANY_ENTITY: &str = "company";
const HR_QUESTION_ENTITY: &str = "hr_question";

/// File key for a record identified by several parts.
///
/// Each part is length-prefixed before hashing, so `("a-b", "c")` and
/// `("a", "b-c")` never share a key.
pub(crate) fn storage_key(parts: &[&str]) -> String {
    let mut encoded = String::new();
    for part in parts {
        encoded.push_str(&part.len().to_string());
        encoded.push(':');
        encoded.push_str(part);
    }
    Uuid::new_v5(&Uuid::NAMESPACE_OID, encoded.as_bytes()).to_string()
}

/// File key for a single id: the id itself when it is a plain file name.
pub(crate) fn record_key(id: &str) -> String {
    let plain = !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if plain {
        id.to_string()
    } else {
        storage_key(&[id])
    }
}

/// Maps a failed load to `None` when the record simply does not exist.
fn found<T>(result: std::result::Result<T, version_migrate::MigrationError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            let err = DhraviqError::from(e);
            if err.is_not_found_or_missing() {
                Ok(None)
            } else {
                Err(err)
            }
        }
    }
}

struct Collections {
    sessions: AsyncDirStorage,
    answers: AsyncDirStorage,
    companies: AsyncDirStorage,
    hr_bank: AsyncDirStorage,
    /// Guards every session write so the index and the files agree.
    index: Mutex<SessionIndex>,
}

impl Collections {
    async fn open(paths: &DhraviqPaths) -> Result<Self> {
        let sessions = paths
            .create_async_dir_storage(Collection::Sessions, create_session_migrator())
            .await?;
        let answers = paths
            .create_async_dir_storage(Collection::Answers, create_answer_migrator())
            .await?;
        let companies = paths
            .create_async_dir_storage(Collection::Companies, create_company_migrator())
            .await?;
        let hr_bank = paths
            .create_async_dir_storage(Collection::HrBank, create_hr_question_migrator())
            .await?;

        let mut index = SessionIndex::new();
        for (_, session) in sessions.load_all::<Session>(SESSION_ENTITY).await? {
            index.upsert(&session.id, session.last_accessed);
        }
        tracing::debug!(sessions = index.len(), "Local store opened");

        Ok(Self {
            sessions,
            answers,
            companies,
            hr_bank,
            index: Mutex::new(index),
        })
    }
}

/// AsyncDirStorage-based local store.
pub struct AsyncDirLocalStore {
    paths: DhraviqPaths,
    clock: Arc<dyn Clock>,
    collections: OnceCell<Collections>,
}

impl AsyncDirLocalStore {
    /// Creates a store under `base_dir`, or the platform data directory when `None`.
    ///
    /// Nothing touches the disk until the first operation.
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self::with_clock(base_dir, Arc::new(SystemClock))
    }

    pub fn with_clock(base_dir: Option<&Path>, clock: Arc<dyn Clock>) -> Self {
        Self {
            paths: DhraviqPaths::new(base_dir),
            clock,
            collections: OnceCell::new(),
        }
    }

    async fn open(&self) -> Result<&Collections> {
        self.collections
            .get_or_try_init(|| Collections::open(&self.paths))
            .await
            .map_err(|e| {
                tracing::warn!("Local store unavailable: {}", e);
                e
            })
    }

    async fn load_session(collections: &Collections, id: &str) -> Result<Option<Session>> {
        found(
            collections
                .sessions
                .load::<Session>(SESSION_ENTITY, &record_key(id))
                .await,
        )
    }
}

#[async_trait]
impl LocalStore for AsyncDirLocalStore {
    async fn save_session(
        &self,
        id: &str,
        resume_text: &str,
        analysis: &AnalysisResult,
    ) -> Result<Session> {
        let collections = self.open().await?;
        let mut index = collections.index.lock().await;

        let now = self.clock.now_millis();
        let created_at = if index.contains(id) {
            Self::load_session(collections, id)
                .await?
                .map(|existing| existing.created_at)
                .unwrap_or(now)
        } else {
            now
        };

        let session = Session {
            id: id.to_string(),
            resume_text: resume_text.to_string(),
            analysis: analysis.clone(),
            created_at,
            last_accessed: now,
        };
        collections
            .sessions
            .save(SESSION_ENTITY, &record_key(id), &session)
            .await?;
        index.upsert(id, now);

        tracing::debug!(session_id = %id, "Session saved");
        Ok(session)
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>> {
        let collections = self.open().await?;
        Self::load_session(collections, id).await
    }

    async fn get_last_session(&self) -> Result<Option<Session>> {
        let collections = self.open().await?;
        let mut index = collections.index.lock().await;
        while let Some(id) = index.latest().map(str::to_string) {
            if let Some(session) = Self::load_session(collections, &id).await? {
                return Ok(Some(session));
            }
            tracing::warn!(session_id = %id, "Indexed session is gone from disk");
            index.remove(&id);
        }
        Ok(None)
    }

    async fn delete_session(&self, id: &str) -> Result<()> {
        let collections = self.open().await?;
        let mut index = collections.index.lock().await;
        if let Err(e) = collections.sessions.delete(&record_key(id)).await {
            let err = DhraviqError::from(e);
            if !err.is_not_found_or_missing() {
                return Err(err);
            }
        }
        index.remove(id);
        tracing::debug!(session_id = %id, "Session deleted");
        Ok(())
    }

    async fn save_answer(&self, question_id: &str, session_id: &str, answer: &str) -> Result<()> {
        let collections = self.open().await?;
        let record = CachedAnswer {
            question_id: question_id.to_string(),
            session_id: session_id.to_string(),
            answer_text: answer.to_string(),
            created_at: self.clock.now_millis(),
        };
        collections
            .answers
            .save(
                ANSWER_ENTITY,
                &storage_key(&[question_id, session_id]),
                &record,
            )
            .await?;
        Ok(())
    }

    async fn get_answer(&self, question_id: &str, session_id: &str) -> Result<Option<String>> {
        let collections = self.open().await?;
        let record = found(
            collections
                .answers
                .load::<CachedAnswer>(ANSWER_ENTITY, &storage_key(&[question_id, session_id]))
                .await,
        )?;
        Ok(record.and_then(|answer| {
            if answer.is_for(question_id, session_id) {
                Some(answer.answer_text)
            } else {
                tracing::warn!(
                    question_id,
                    session_id,
                    "Cached answer belongs to another pair, ignoring"
                );
                None
            }
        }))
    }

    async fn save_company_data(&self, company: &CompanyPack) -> Result<()> {
        let collections = self.open().await?;
        let mut record = company.clone();
        record.updated_at = self.clock.now_millis();
        collections
            .companies
            .save(COMPANY_ENTITY, &record_key(&company.id), &record)
            .await?;
        Ok(())
    }

    async fn get_company_data(&self, company_id: &str) -> Result<Option<CompanyPack>> {
        let collections = self.open().await?;
        found(
            collections
                .companies
                .load::<CompanyPack>(COMPANY_ENTITY, &record_key(company_id))
                .await,
        )
    }

    async fn get_all_companies(&self) -> Result<Vec<CompanyPack>> {
        let collections = self.open().await?;
        let mut companies: Vec<CompanyPack> = collections
            .companies
            .load_all::<CompanyPack>(COMPANY_ENTITY)
            .await?
            .into_iter()
            .map(|(_, company)| company)
            .collect();
        companies.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(companies)
    }

    async fn preload_hr_bank(&self, questions: &[Question]) -> Result<()> {
        let collections = self.open().await?;
        for question in questions {
            collections
                .hr_bank
                .save(HR_QUESTION_ENTITY, &record_key(&question.id), question)
                .await?;
        }
        tracing::debug!(count = questions.len(), "HR bank preloaded");
        Ok(())
    }

    async fn get_hr_bank(&self) -> Result<Vec<Question>> {
        let collections = self.open().await?;
        let mut questions: Vec<Question> = collections
            .hr_bank
            .load_all::<Question>(HR_QUESTION_ENTITY)
            .await?
            .into_iter()
            .map(|(_, question)| question)
            .collect();
        questions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(questions)
    }

    async fn clear_old_sessions(&self, max_age: Duration) -> Result<usize> {
        let collections = self.open().await?;
        let mut index = collections.index.lock().await;

        let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        let cutoff = self.clock.now_millis().saturating_sub(max_age_ms);

        let mut removed = 0;
        for id in index.older_than(cutoff) {
            if let Err(e) = collections.sessions.delete(&record_key(&id)).await {
                let err = DhraviqError::from(e);
                if !err.is_not_found_or_missing() {
                    return Err(err);
                }
            }
            index.remove(&id);
            removed += 1;
        }

        if removed > 0 {
            tracing::info!(removed, "Pruned old sessions");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhraviq_core::analysis::Evaluation;
    use dhraviq_core::clock::{DAY_MS, ManualClock};
    use dhraviq_core::question::{Category, Difficulty};
    use dhraviq_core::reference::PackDifficulty;
    use dhraviq_core::store::DEFAULT_MAX_SESSION_AGE;
    use tempfile::TempDir;

    fn analysis(summary: &str) -> AnalysisResult {
        AnalysisResult {
            evaluation: Evaluation {
                dhraviq_score: 72,
                ats_score: 80,
                content_score: 65,
                impact_score: 70,
            },
            summary: summary.to_string(),
            questions: vec![
                Question::new("q1", Category::Technical, Difficulty::Medium, "Explain CAP.")
                    .with_tags(["distributed"]),
            ],
        }
    }

    fn store_at(dir: &TempDir, clock: Arc<ManualClock>) -> AsyncDirLocalStore {
        AsyncDirLocalStore::with_clock(Some(dir.path()), clock)
    }

    #[test]
    fn test_storage_key_separates_parts() {
        assert_ne!(storage_key(&["a-b", "c"]), storage_key(&["a", "b-c"]));
        assert_ne!(storage_key(&["q1", "s1"]), storage_key(&["s1", "q1"]));
        assert_eq!(storage_key(&["q1", "s1"]), storage_key(&["q1", "s1"]));
    }

    #[test]
    fn test_record_key_keeps_plain_ids() {
        assert_eq!(record_key("session_1_abc"), "session_1_abc");
        assert_ne!(record_key("../etc"), "../etc");
        assert_ne!(record_key("company:google"), "company:google");
    }

    #[tokio::test]
    async fn test_session_round_trip_and_created_at_preserved() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(1_000));
        let store = store_at(&dir, clock.clone());

        let first = store.save_session("s1", "resume", &analysis("v1")).await.unwrap();
        assert_eq!(first.created_at, 1_000);

        clock.advance(500);
        let second = store.save_session("s1", "resume v2", &analysis("v2")).await.unwrap();
        assert_eq!(second.created_at, 1_000);
        assert_eq!(second.last_accessed, 1_500);

        let loaded = store.get_session("s1").await.unwrap().unwrap();
        assert_eq!(loaded, second);
        assert_eq!(loaded.analysis.questions[0].tags.len(), 1);
        assert!(store.get_session("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_last_session_is_most_recently_accessed() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(1));
        let store = store_at(&dir, clock.clone());

        store.save_session("s1", "r", &analysis("a")).await.unwrap();
        clock.set(2);
        store.save_session("s2", "r", &analysis("b")).await.unwrap();
        let last = store.get_last_session().await.unwrap().unwrap();
        assert_eq!(last.id, "s2");

        clock.set(3);
        store.save_session("s1", "r", &analysis("a2")).await.unwrap();
        let last = store.get_last_session().await.unwrap().unwrap();
        assert_eq!(last.id, "s1");
        assert_eq!(last.created_at, 1);
        assert_eq!(last.last_accessed, 3);
        assert_eq!(last.analysis.summary, "a2");
    }

    #[tokio::test]
    async fn test_last_session_skips_file_removed_behind_the_store() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(1));
        let store = store_at(&dir, clock.clone());

        store.save_session("older", "r", &analysis("o")).await.unwrap();
        clock.set(2);
        store.save_session("newer", "r", &analysis("n")).await.unwrap();

        let sessions_dir = DhraviqPaths::new(Some(dir.path()))
            .collection_dir(Collection::Sessions)
            .unwrap();
        for entry in std::fs::read_dir(&sessions_dir).unwrap() {
            let path = entry.unwrap().path();
            if path.file_name().unwrap().to_string_lossy().starts_with("newer") {
                std::fs::remove_file(path).unwrap();
            }
        }

        let last = store.get_last_session().await.unwrap().unwrap();
        assert_eq!(last.id, "older");
        assert!(store.get_session("newer").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_index_is_rebuilt_on_reopen() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(10));
        {
            let store = store_at(&dir, clock.clone());
            store.save_session("older", "r", &analysis("o")).await.unwrap();
            clock.set(20);
            store.save_session("newer", "r", &analysis("n")).await.unwrap();
        }

        let reopened = store_at(&dir, clock);
        let last = reopened.get_last_session().await.unwrap().unwrap();
        assert_eq!(last.id, "newer");
    }

    #[tokio::test]
    async fn test_empty_store_has_no_last_session() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, Arc::new(ManualClock::new(0)));
        assert!(store.get_last_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_session() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, Arc::new(ManualClock::new(5)));
        store.save_session("s1", "r", &analysis("x")).await.unwrap();

        store.delete_session("s1").await.unwrap();
        assert!(store.get_session("s1").await.unwrap().is_none());
        assert!(store.get_last_session().await.unwrap().is_none());
        store.delete_session("s1").await.unwrap();
    }

    #[tokio::test]
    async fn test_answers_are_keyed_by_pair() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, Arc::new(ManualClock::new(0)));

        store.save_answer("q1", "s1", "A").await.unwrap();
        assert_eq!(store.get_answer("q1", "s1").await.unwrap().as_deref(), Some("A"));
        assert_eq!(store.get_answer("q2", "s1").await.unwrap(), None);
        assert_eq!(store.get_answer("q1", "s2").await.unwrap(), None);

        store.save_answer("q1", "s1", "B").await.unwrap();
        assert_eq!(store.get_answer("q1", "s1").await.unwrap().as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_answer_keys_do_not_collide_on_dashes() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, Arc::new(ManualClock::new(0)));

        store.save_answer("a-b", "c", "first").await.unwrap();
        store.save_answer("a", "b-c", "second").await.unwrap();
        assert_eq!(store.get_answer("a-b", "c").await.unwrap().as_deref(), Some("first"));
        assert_eq!(store.get_answer("a", "b-c").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_clear_old_sessions_uses_cutoff() {
        let dir = TempDir::new().unwrap();
        let now = 100 * DAY_MS;
        let clock = Arc::new(ManualClock::new(now - 31 * DAY_MS));
        let store = store_at(&dir, clock.clone());

        store.save_session("stale", "r", &analysis("s")).await.unwrap();
        clock.set(now - 29 * DAY_MS);
        store.save_session("fresh", "r", &analysis("f")).await.unwrap();
        clock.set(now);

        let removed = store.clear_old_sessions(DEFAULT_MAX_SESSION_AGE).await.unwrap();
        assert_eq!(removed, 1);
        assert!(store.get_session("stale").await.unwrap().is_none());
        assert!(store.get_session("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear_old_sessions_does_not_protect_newest() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let store = store_at(&dir, clock.clone());
        store.save_session("only", "r", &analysis("o")).await.unwrap();

        clock.set(DAY_MS);
        let removed = store
            .clear_old_sessions(Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.get_last_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_companies_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, Arc::new(ManualClock::new(77)));

        for (id, name) in [("z", "Zeta"), ("a", "Acme"), ("m", "Meta")] {
            store
                .save_company_data(&CompanyPack {
                    id: id.to_string(),
                    name: name.to_string(),
                    logo: String::new(),
                    description: String::new(),
                    difficulty: PackDifficulty::Mixed,
                    featured: false,
                    questions: Vec::new(),
                    updated_at: 0,
                })
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .get_all_companies()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Acme", "Meta", "Zeta"]);

        let meta = store.get_company_data("m").await.unwrap().unwrap();
        assert_eq!(meta.updated_at, 77);
        assert!(store.get_company_data("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_hr_bank_preload_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, Arc::new(ManualClock::new(0)));
        let bank = vec![
            Question::new("hr-2", Category::Hr, Difficulty::Easy, "Why us?"),
            Question::new("hr-1", Category::Behavioral, Difficulty::Medium, "A conflict?"),
        ];

        store.preload_hr_bank(&bank).await.unwrap();
        store.preload_hr_bank(&bank).await.unwrap();

        let loaded = store.get_hr_bank().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "hr-1");
        assert_eq!(loaded[1].text, "Why us?");
    }

    #[tokio::test]
    async fn test_concurrent_first_calls_share_one_open() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_at(&dir, Arc::new(ManualClock::new(1))));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .save_answer(&format!("q{i}"), "s", "text")
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..8 {
            assert!(store.get_answer(&format!("q{i}"), "s").await.unwrap().is_some());
        }
    }
}
