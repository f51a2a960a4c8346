use anyhow::{Result, bail};
use serde_json::json;

use crate::output::Output;
use dhraviq_application::{AppContext, HelpOutcome};
use dhraviq_core::analysis::CoachResponse;

pub async fn run(
    ctx: &AppContext,
    question: &str,
    email: Option<&str>,
    out: Output,
) -> Result<()> {
    let mut outcome = ctx.workflow.request_help(question).await;

    if outcome == HelpOutcome::AwaitingContact {
        let Some(email) = email else {
            ctx.workflow.dismiss_gate();
            bail!(
                "Coaching answers unlock once you leave an email. \
                 Re-run with --email <address> or run `dhraviq contact set <address>`."
            );
        };
        outcome = match ctx.workflow.submit_contact(email).await? {
            Some(resumed) => resumed,
            None => ctx.workflow.request_help(question).await,
        };
    }

    match outcome {
        HelpOutcome::Revealed { answer, from_cache } => {
            print_answer(question, &answer, from_cache, out)
        }
        HelpOutcome::NoSession => bail!("No session found. Upload a resume first."),
        HelpOutcome::Failed(message) => bail!(message),
        HelpOutcome::AwaitingContact => bail!("Coaching is still locked for this identity."),
    }
}

fn print_answer(
    question: &str,
    answer: &CoachResponse,
    from_cache: bool,
    out: Output,
) -> Result<()> {
    let value = json!({
        "ref": question,
        "cached": from_cache,
        "answer": answer,
    });
    out.emit(value, || {
        let mut text = format!("{}\n", answer.model_answer);
        let sections = [
            ("Key points", &answer.key_points),
            ("Pitfalls", &answer.pitfalls),
            ("Good phrases", &answer.good_phrases),
            ("Likely follow-ups", &answer.followups),
        ];
        for (title, items) in sections {
            if items.is_empty() {
                continue;
            }
            text.push_str(&format!("\n{title}:\n"));
            for item in items {
                text.push_str(&format!("  - {item}\n"));
            }
        }
        if from_cache {
            text.push_str("\n(cached)");
        }
        text.trim_end().to_string()
    })
}
