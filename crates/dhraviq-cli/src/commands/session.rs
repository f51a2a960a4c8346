use anyhow::Result;
use serde_json::json;
use std::time::Duration;

use crate::output::Output;
use dhraviq_application::AppContext;
use dhraviq_core::clock::DAY_MS;
use dhraviq_core::config::ClearSessionMode;

pub fn show(ctx: &AppContext, out: Output) -> Result<()> {
    let session = ctx.sessions.current();
    let value = match &session {
        Some(s) => json!({
            "id": s.id,
            "createdAt": s.created_at,
            "lastAccessed": s.last_accessed,
            "score": s.analysis.evaluation.dhraviq_score,
            "questions": s.analysis.questions.len(),
        }),
        None => json!(null),
    };
    out.emit(value, || match &session {
        Some(s) => format!(
            "{}  score {}  {} questions",
            s.id,
            s.analysis.evaluation.dhraviq_score,
            s.analysis.questions.len()
        ),
        None => "No session.".to_string(),
    })
}

pub async fn clear(ctx: &AppContext, out: Output) -> Result<()> {
    let cleared = ctx.sessions.current().map(|s| s.id.clone());
    ctx.workflow.clear_session().await?;
    let purged = ctx.sessions.clear_mode() == ClearSessionMode::PurgePersisted;
    out.emit(json!({ "cleared": cleared, "purged": purged }), || match (&cleared, purged) {
        (None, _) => "No session to clear.".to_string(),
        (Some(id), true) => format!("Session {id} deleted."),
        (Some(id), false) => format!("Session {id} cleared; its data stays on disk."),
    })
}

pub async fn prune(ctx: &AppContext, days: Option<u64>, out: Output) -> Result<()> {
    let max_age = match days {
        Some(days) => Duration::from_millis(days.saturating_mul(DAY_MS as u64)),
        None => ctx.config.session_max_age,
    };
    let removed = ctx.store.clear_old_sessions(max_age).await?;
    out.emit(json!({ "removed": removed }), || {
        format!("Removed {removed} old session(s).")
    })
}
