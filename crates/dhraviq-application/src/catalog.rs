//! Question catalog across the session analysis, company packs and the HR bank.

use std::sync::Arc;

use dhraviq_core::error::Result;
use dhraviq_core::question::{
    Question, QuestionFilter, QuestionRef, QuestionSource, SourcedQuestion,
};
use dhraviq_core::reference::ReferencePacks;
use dhraviq_core::session::Session;
use dhraviq_core::store::LocalStore;

/// Which sources a listing covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogScope {
    #[default]
    All,
    Analysis,
    /// One company, or every company when `None`.
    Company(Option<String>),
    Hr,
}

impl CatalogScope {
    fn includes_analysis(&self) -> bool {
        matches!(self, CatalogScope::All | CatalogScope::Analysis)
    }

    fn includes_hr(&self) -> bool {
        matches!(self, CatalogScope::All | CatalogScope::Hr)
    }

    fn includes_company(&self, company_id: &str) -> bool {
        match self {
            CatalogScope::All | CatalogScope::Company(None) => true,
            CatalogScope::Company(Some(id)) => id == company_id,
            _ => false,
        }
    }
}

/// Counts of what a reference import wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub companies: usize,
    pub hr_questions: usize,
}

pub struct QuestionCatalog {
    store: Arc<dyn LocalStore>,
}

impl QuestionCatalog {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Lists matching questions, analysis first, then companies by name, then the HR bank.
    pub async fn list(
        &self,
        session: Option<&Session>,
        scope: &CatalogScope,
        filter: &QuestionFilter,
    ) -> Result<Vec<SourcedQuestion>> {
        let mut listed = Vec::new();

        if scope.includes_analysis() {
            if let Some(session) = session {
                listed.extend(
                    filter
                        .apply(&session.analysis.questions)
                        .into_iter()
                        .map(|q| SourcedQuestion::new(QuestionSource::AnalysisDerived, q.clone())),
                );
            }
        }

        if !matches!(scope, CatalogScope::Analysis | CatalogScope::Hr) {
            for company in self.store.get_all_companies().await? {
                if !scope.includes_company(&company.id) {
                    continue;
                }
                let source = QuestionSource::CompanyPack {
                    company_id: company.id.clone(),
                };
                listed.extend(
                    filter
                        .apply(&company.questions)
                        .into_iter()
                        .map(|q| SourcedQuestion::new(source.clone(), q.clone())),
                );
            }
        }

        if scope.includes_hr() {
            let bank = self.store.get_hr_bank().await?;
            listed.extend(
                filter
                    .apply(&bank)
                    .into_iter()
                    .map(|q| SourcedQuestion::new(QuestionSource::HrBank, q.clone())),
            );
        }

        Ok(listed)
    }

    /// Finds the question a namespaced reference points at.
    pub async fn resolve(
        &self,
        question: &QuestionRef,
        session: &Session,
    ) -> Result<Option<Question>> {
        match &question.source {
            QuestionSource::AnalysisDerived => Ok(session.analysis.question(&question.id).cloned()),
            QuestionSource::CompanyPack { company_id } => Ok(self
                .store
                .get_company_data(company_id)
                .await?
                .and_then(|company| company.questions.into_iter().find(|q| q.id == question.id))),
            QuestionSource::HrBank => Ok(self
                .store
                .get_hr_bank()
                .await?
                .into_iter()
                .find(|q| q.id == question.id)),
        }
    }

    /// Writes reference packs into the store. Re-importing the same packs is harmless.
    pub async fn import_packs(&self, packs: &ReferencePacks) -> Result<ImportSummary> {
        for company in &packs.companies {
            self.store.save_company_data(company).await?;
        }
        if !packs.hr_bank.is_empty() {
            self.store.preload_hr_bank(&packs.hr_bank).await?;
        }
        tracing::info!(
            companies = packs.companies.len(),
            hr_questions = packs.hr_bank.len(),
            "Reference packs imported"
        );
        Ok(ImportSummary {
            companies: packs.companies.len(),
            hr_questions: packs.hr_bank.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockStore, sample_analysis};
    use dhraviq_core::question::{Category, Difficulty};
    use dhraviq_core::reference::{CompanyPack, PackDifficulty};

    fn packs() -> ReferencePacks {
        ReferencePacks {
            companies: vec![CompanyPack {
                id: "google".to_string(),
                name: "Google".to_string(),
                logo: "G".to_string(),
                description: String::new(),
                difficulty: PackDifficulty::Hard,
                featured: true,
                questions: vec![
                    Question::new("q1", Category::Technical, Difficulty::Hard, "Design Search."),
                ],
                updated_at: 0,
            }],
            hr_bank: vec![Question::new("q1", Category::Hr, Difficulty::Easy, "Why here?")],
        }
    }

    fn session() -> Session {
        Session {
            id: "s1".to_string(),
            resume_text: "resume".to_string(),
            analysis: sample_analysis(2),
            created_at: 0,
            last_accessed: 0,
        }
    }

    #[tokio::test]
    async fn test_same_raw_id_resolves_per_source() {
        let store = Arc::new(MockStore::new());
        let catalog = QuestionCatalog::new(store);
        catalog.import_packs(&packs()).await.unwrap();
        let session = session();

        let analysis = catalog.resolve(&QuestionRef::analysis("q1"), &session).await.unwrap();
        let company = catalog
            .resolve(&QuestionRef::company("google", "q1"), &session)
            .await
            .unwrap();
        let hr = catalog.resolve(&QuestionRef::hr("q1"), &session).await.unwrap();

        assert_eq!(analysis.unwrap().text, "Question number 1?");
        assert_eq!(company.unwrap().text, "Design Search.");
        assert_eq!(hr.unwrap().text, "Why here?");
        assert!(catalog
            .resolve(&QuestionRef::company("meta", "q1"), &session)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_scopes_and_filters() {
        let store = Arc::new(MockStore::new());
        let catalog = QuestionCatalog::new(store);
        catalog.import_packs(&packs()).await.unwrap();
        let session = session();
        let all = QuestionFilter::default();

        let everything = catalog.list(Some(&session), &CatalogScope::All, &all).await.unwrap();
        assert_eq!(everything.len(), 4);
        assert_eq!(everything[0].question_ref().to_string(), "analysis:q1");
        assert_eq!(everything[2].question_ref().to_string(), "company:google:q1");
        assert_eq!(everything[3].question_ref().to_string(), "hr:q1");

        let hard = QuestionFilter {
            difficulty: Some(Difficulty::Hard),
            ..Default::default()
        };
        let companies = catalog
            .list(None, &CatalogScope::Company(Some("google".to_string())), &hard)
            .await
            .unwrap();
        assert_eq!(companies.len(), 1);

        let no_session = catalog.list(None, &CatalogScope::Analysis, &all).await.unwrap();
        assert!(no_session.is_empty());
    }

    #[tokio::test]
    async fn test_import_is_idempotent() {
        let store = Arc::new(MockStore::new());
        let catalog = QuestionCatalog::new(store.clone());
        let summary = catalog.import_packs(&packs()).await.unwrap();
        catalog.import_packs(&packs()).await.unwrap();

        assert_eq!(summary, ImportSummary { companies: 1, hr_questions: 1 });
        assert_eq!(store.get_hr_bank().await.unwrap().len(), 1);
        assert_eq!(store.get_all_companies().await.unwrap().len(), 1);
    }
}
