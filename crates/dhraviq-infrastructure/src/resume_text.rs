//! Text extraction for uploaded resumes.

use dhraviq_core::error::{DhraviqError, Result};
use dhraviq_core::upload::{ResumeFormat, ResumeUpload};

/// Validates an upload and returns its text.
///
/// PDF parsing runs on the blocking pool; a parser panic is reported as an
/// unreadable file rather than taking the caller down.
pub async fn extract_resume_text(upload: &ResumeUpload) -> Result<String> {
    let format = upload.validate()?;
    let text = match format {
        ResumeFormat::PlainText => String::from_utf8_lossy(&upload.bytes).into_owned(),
        ResumeFormat::Pdf => {
            let bytes = upload.bytes.clone();
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|_| DhraviqError::validation("The PDF could not be read."))?
                .map_err(|e| DhraviqError::validation(format!("The PDF could not be read: {}", e)))?
        }
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(DhraviqError::validation(
            "No text could be read from the resume. Please upload a text-based file.",
        ));
    }
    tracing::debug!(file = %upload.file_name, chars = text.len(), "Resume text extracted");
    Ok(text.to_string())
}
