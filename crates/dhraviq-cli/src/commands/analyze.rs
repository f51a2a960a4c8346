use anyhow::{Context, Result, bail};
use serde_json::json;
use std::path::PathBuf;

use crate::output::Output;
use dhraviq_application::AppContext;
use dhraviq_core::session::Session;
use dhraviq_core::upload::{ProfileInput, ResumeUpload, RoleLevel, TargetDomain};

pub async fn run(
    ctx: &AppContext,
    resume: Option<PathBuf>,
    domain: Option<String>,
    level: Option<String>,
    out: Output,
) -> Result<()> {
    let input = match (resume, domain, level) {
        (Some(path), _, _) => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            ProfileInput::Resume(ResumeUpload::new(file_name, bytes))
        }
        (None, Some(domain), Some(level)) => ProfileInput::Domain {
            domain: domain.parse::<TargetDomain>()?,
            level: level.parse::<RoleLevel>()?,
        },
        _ => bail!("pass --resume <file>, or --domain and --level"),
    };

    let session = ctx.workflow.analyze_profile(input).await?;
    print_session(&session, out)
}

pub fn score(ctx: &AppContext, out: Output) -> Result<()> {
    let Some(session) = ctx.sessions.current() else {
        bail!("No session found. Upload a resume first.");
    };
    print_session(&session, out)
}

fn print_session(session: &Session, out: Output) -> Result<()> {
    let analysis = &session.analysis;
    let evaluation = &analysis.evaluation;
    let value = json!({
        "sessionId": session.id,
        "evaluation": evaluation,
        "readiness": evaluation.readiness().label(),
        "summary": analysis.summary,
        "questions": analysis.questions,
    });
    out.emit(value, || {
        let mut text = format!(
            "Session {}\n\
             Dhraviq score: {} ({})\n\
             ATS: {}  Content: {}  Impact: {}\n\n{}\n",
            session.id,
            evaluation.dhraviq_score,
            evaluation.readiness(),
            evaluation.ats_score,
            evaluation.content_score,
            evaluation.impact_score,
            analysis.summary,
        );
        for question in &analysis.questions {
            text.push_str(&format!(
                "\n  analysis:{:<8} [{} / {}] {}",
                question.id, question.category, question.difficulty, question.text
            ));
        }
        text
    })
}
