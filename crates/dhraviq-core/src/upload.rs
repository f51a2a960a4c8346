//! Profile input: an uploaded resume or a target domain and seniority.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DhraviqError, Result};

/// Largest accepted resume upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Resume formats the core can turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    PlainText,
}

/// A resume file as handed over by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ResumeUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Checks size and type before any text extraction.
    pub fn validate(&self) -> Result<ResumeFormat> {
        if self.bytes.is_empty() {
            return Err(DhraviqError::validation("The uploaded file is empty."));
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(DhraviqError::validation(
                "File too large. Please upload a file smaller than 10MB.",
            ));
        }

        let mime = mime_guess::from_path(&self.file_name).first_or_octet_stream();
        match (mime.type_().as_str(), mime.subtype().as_str()) {
            ("application", "pdf") => Ok(ResumeFormat::Pdf),
            ("text", _) => Ok(ResumeFormat::PlainText),
            ("application", "msword")
            | ("application", "vnd.openxmlformats-officedocument.wordprocessingml.document") => {
                Err(DhraviqError::validation(
                    "Word documents are not supported. Please upload a PDF or plain text resume.",
                ))
            }
            _ => Err(DhraviqError::validation(format!(
                "Invalid file type '{}'. Please upload a PDF or plain text resume.",
                mime
            ))),
        }
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($variant:ident => $value:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DhraviqError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_lowercase().as_str() {
                    $($value => Ok($name::$variant),)+
                    other => Err(DhraviqError::validation(format!(
                        concat!("Unknown ", $what, " '{}'"),
                        other
                    ))),
                }
            }
        }
    };
}

choice_enum! {
    /// Career domain picked instead of uploading a resume.
    TargetDomain, "domain" {
        Frontend => "frontend", "Frontend Development";
        Backend => "backend", "Backend Development";
        Fullstack => "fullstack", "Full Stack Development";
        Mobile => "mobile", "Mobile Development";
        Devops => "devops", "DevOps Engineering";
        Data => "data", "Data Science";
        Ml => "ml", "Machine Learning";
        Security => "security", "Cybersecurity";
        Product => "product", "Product Management";
        Design => "design", "UI/UX Design";
    }
}

choice_enum! {
    /// Seniority picked together with a [`TargetDomain`].
    RoleLevel, "role level" {
        Junior => "junior", "Junior (0-2 years)";
        Mid => "mid", "Mid-level (2-5 years)";
        Senior => "senior", "Senior (5-8 years)";
        Lead => "lead", "Lead/Principal (8+ years)";
        Manager => "manager", "Engineering Manager";
    }
}

/// What the user gives us to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileInput {
    Resume(ResumeUpload),
    Domain {
        domain: TargetDomain,
        level: RoleLevel,
    },
}

/// Profile text sent in place of a resume when only a domain and level are known.
pub fn domain_profile_text(domain: TargetDomain, level: RoleLevel) -> String {
    format!(
        "Target role: {} in {}.\n\
         No resume was provided. The candidate is preparing for {} interviews \
         at the {} level and wants questions that reflect typical expectations \
         for that role.",
        level.label(),
        domain.label(),
        domain.label(),
        level.label(),
    )
}
