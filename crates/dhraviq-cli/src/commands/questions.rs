use anyhow::{Result, bail};
use serde_json::json;

use crate::output::Output;
use dhraviq_application::{AppContext, CatalogScope};
use dhraviq_core::question::{Category, Difficulty, QuestionFilter};

pub struct Query {
    pub source: String,
    pub company: Option<String>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl Query {
    fn scope(&self) -> Result<CatalogScope> {
        Ok(match self.source.as_str() {
            "all" if self.company.is_none() => CatalogScope::All,
            "all" | "company" => CatalogScope::Company(self.company.clone()),
            "analysis" => CatalogScope::Analysis,
            "hr" => CatalogScope::Hr,
            other => bail!("unknown source '{other}' (expected analysis, company, hr or all)"),
        })
    }

    fn filter(&self) -> Result<QuestionFilter> {
        Ok(QuestionFilter {
            search: self.search.clone(),
            difficulty: self
                .difficulty
                .as_deref()
                .map(str::parse::<Difficulty>)
                .transpose()?,
            category: self
                .category
                .as_deref()
                .map(str::parse::<Category>)
                .transpose()?,
        })
    }
}

pub async fn run(ctx: &AppContext, query: Query, out: Output) -> Result<()> {
    let session = ctx.sessions.current();
    let listed = ctx
        .catalog
        .list(session.as_deref(), &query.scope()?, &query.filter()?)
        .await?;

    let value = json!(listed
        .iter()
        .map(|sourced| json!({
            "ref": sourced.question_ref().to_string(),
            "question": sourced.question,
        }))
        .collect::<Vec<_>>());
    out.emit(value, || {
        if listed.is_empty() {
            return "No questions match.".to_string();
        }
        listed
            .iter()
            .map(|sourced| {
                let q = &sourced.question;
                format!(
                    "{:<28} [{} / {}] {}",
                    sourced.question_ref().to_string(),
                    q.category,
                    q.difficulty,
                    q.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}
