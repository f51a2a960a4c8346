use anyhow::Result;
use serde_json::json;

use crate::output::Output;
use dhraviq_application::AppContext;

pub async fn set(ctx: &AppContext, email: &str, out: Output) -> Result<()> {
    ctx.workflow.submit_contact(email).await?;
    let saved = ctx.gate.get_contact().await;
    out.emit(json!({ "email": saved.as_ref().map(|e| e.as_str()) }), || {
        "Email saved. You now have access to AI coaching answers!".to_string()
    })
}

pub async fn show(ctx: &AppContext, out: Output) -> Result<()> {
    let identity = ctx.gate.ensure_identity().await;
    let email = ctx.gate.get_contact().await;
    let value = json!({
        "userId": identity.user_id,
        "local": identity.is_local(),
        "email": email.as_ref().map(|e| e.as_str()),
    });
    out.emit(value, || match &email {
        Some(email) => format!("{email} ({})", identity.user_id),
        None => format!("No contact saved ({})", identity.user_id),
    })
}
