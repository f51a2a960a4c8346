use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;

use crate::output::Output;
use dhraviq_application::AppContext;
use dhraviq_core::reference::ReferencePacks;

pub async fn import(ctx: &AppContext, file: &Path, out: Output) -> Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let packs: ReferencePacks = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid pack file", file.display()))?;

    let summary = ctx.catalog.import_packs(&packs).await?;
    out.emit(
        json!({ "companies": summary.companies, "hrQuestions": summary.hr_questions }),
        || {
            format!(
                "Imported {} compan(ies) and {} HR question(s).",
                summary.companies, summary.hr_questions
            )
        },
    )
}

pub async fn list(ctx: &AppContext, out: Output) -> Result<()> {
    let companies = ctx.store.get_all_companies().await?;
    let hr_count = ctx.store.get_hr_bank().await?.len();

    let value = json!({
        "companies": companies.iter().map(|c| json!({
            "id": c.id,
            "name": c.name,
            "difficulty": c.difficulty,
            "featured": c.featured,
            "questions": c.questions.len(),
        })).collect::<Vec<_>>(),
        "hrQuestions": hr_count,
    });
    out.emit(value, || {
        let mut lines: Vec<String> = companies
            .iter()
            .map(|c| {
                format!(
                    "{:<16} {:<24} {:>3} questions{}",
                    c.id,
                    c.name,
                    c.questions.len(),
                    if c.featured { "  *" } else { "" }
                )
            })
            .collect();
        lines.push(format!("HR bank: {hr_count} questions"));
        lines.join("\n")
    })
}
