//! HTTP client for the analysis (`/phase1`) and coaching (`/phase2`) endpoints.

use async_trait::async_trait;
use dhraviq_core::analysis::{AnalysisResult, CoachResponse, Evaluation};
use dhraviq_core::coach::CoachingApi;
use dhraviq_core::config::AppConfig;
use dhraviq_core::error::{DhraviqError, Endpoint, Result};
use dhraviq_core::question::Question;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Coaching API over HTTP.
///
/// One request per call. No retries and no caching; callers own both.
#[derive(Clone)]
pub struct HttpCoachingClient {
    client: Client,
    base_url: String,
}

impl HttpCoachingClient {
    /// Creates a client for an absolute base URL (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DhraviqError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(config.resolved_api_base(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, R>(&self, endpoint: Endpoint, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, "{} request", endpoint.label());

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| DhraviqError::request(endpoint, None, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "{} request rejected", endpoint.label());
            return Err(DhraviqError::request(
                endpoint,
                Some(status.as_u16()),
                status_text(status),
            ));
        }

        response.json::<R>().await.map_err(|err| {
            DhraviqError::request(endpoint, None, format!("invalid response body: {err}"))
        })
    }
}

/// The reason phrase of a status, or its number when it has none.
fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string())
}

#[async_trait]
impl CoachingApi for HttpCoachingClient {
    async fn analyze_resume(&self, resume_text: &str) -> Result<AnalysisResult> {
        let response: Phase1Response = self
            .post(Endpoint::Analysis, "phase1", &Phase1Request { resume_text })
            .await?;
        Ok(response.into())
    }

    async fn get_question_help(
        &self,
        question_text: &str,
        profile_text: &str,
    ) -> Result<CoachResponse> {
        let response: Phase2Response = self
            .post(
                Endpoint::Coaching,
                "phase2",
                &Phase2Request {
                    question: question_text,
                    profile_text,
                },
            )
            .await?;
        Ok(response.coach.into())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Phase1Request<'a> {
    resume_text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Phase2Request<'a> {
    question: &'a str,
    profile_text: &'a str,
}

#[derive(Deserialize)]
struct EvaluationPayload {
    dhraviq_score: f64,
    ats_score: f64,
    content_score: f64,
    impact_score: f64,
}

#[derive(Deserialize)]
struct Phase1Response {
    evaluation: EvaluationPayload,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    questions: Vec<Question>,
}

impl From<Phase1Response> for AnalysisResult {
    fn from(response: Phase1Response) -> Self {
        let e = response.evaluation;
        AnalysisResult {
            evaluation: Evaluation {
                dhraviq_score: Evaluation::normalize_score(e.dhraviq_score),
                ats_score: Evaluation::normalize_score(e.ats_score),
                content_score: Evaluation::normalize_score(e.content_score),
                impact_score: Evaluation::normalize_score(e.impact_score),
            },
            summary: response.summary,
            questions: response.questions,
        }
    }
}

#[derive(Deserialize)]
struct CoachPayload {
    model_answer_60s: String,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default)]
    common_pitfalls: Vec<String>,
    #[serde(default)]
    good_phrases: Vec<String>,
    #[serde(default)]
    followups_to_expect: Vec<String>,
}

#[derive(Deserialize)]
struct Phase2Response {
    coach: CoachPayload,
}

impl From<CoachPayload> for CoachResponse {
    fn from(coach: CoachPayload) -> Self {
        CoachResponse {
            model_answer: coach.model_answer_60s,
            key_points: coach.key_points,
            pitfalls: coach.common_pitfalls,
            good_phrases: coach.good_phrases,
            followups: coach.followups_to_expect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubResponse, spawn_stub};
    use dhraviq_core::question::Category;

    const PHASE1_BODY: &str = r#"{
        "evaluation": {"dhraviq_score": 72.6, "ats_score": 81, "content_score": 64.2, "impact_score": 101},
        "summary": "Solid backend profile.",
        "questions": [
            {"id": "q1", "category": "technical", "difficulty": "hard", "question": "Design a rate limiter.", "tags": ["system-design"]},
            {"id": "q2", "category": "behavioral", "difficulty": "easy", "question": "Tell me about a failure.", "tags": []}
        ]
    }"#;

    const PHASE2_BODY: &str = r#"{
        "coach": {
            "model_answer_60s": "Start with the token bucket.",
            "key_points": ["throughput"],
            "common_pitfalls": ["ignoring bursts"],
            "good_phrases": ["trade-off"],
            "followups_to_expect": ["distributed?"]
        }
    }"#;

    #[tokio::test]
    async fn test_analyze_resume_posts_resume_text() {
        let stub = spawn_stub(vec![StubResponse::ok(PHASE1_BODY)]).await;
        let client = HttpCoachingClient::new(format!("{}/api/", stub.base_url), None).unwrap();

        let analysis = client.analyze_resume("Jane Doe, Rust").await.unwrap();
        assert_eq!(analysis.evaluation.dhraviq_score, 73);
        assert_eq!(analysis.evaluation.impact_score, 100);
        assert_eq!(analysis.questions.len(), 2);
        assert_eq!(analysis.questions[1].category, Category::Behavioral);

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/api/phase1");
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["resumeText"], "Jane Doe, Rust");
    }

    #[tokio::test]
    async fn test_question_help_maps_coach_fields() {
        let stub = spawn_stub(vec![StubResponse::ok(PHASE2_BODY)]).await;
        let client = HttpCoachingClient::new(&stub.base_url, None).unwrap();

        let coach = client
            .get_question_help("Design a rate limiter.", "profile")
            .await
            .unwrap();
        assert_eq!(coach.model_answer, "Start with the token bucket.");
        assert_eq!(coach.pitfalls, vec!["ignoring bursts"]);
        assert_eq!(coach.followups, vec!["distributed?"]);

        let body: serde_json::Value = serde_json::from_str(&stub.requests()[0].body).unwrap();
        assert_eq!(body["question"], "Design a rate limiter.");
        assert_eq!(body["profileText"], "profile");
    }

    #[tokio::test]
    async fn test_non_success_status_becomes_request_error() {
        let stub = spawn_stub(vec![StubResponse::status(500, "{}")]).await;
        let client = HttpCoachingClient::new(&stub.base_url, None).unwrap();

        let err = client.analyze_resume("x").await.unwrap_err();
        assert_eq!(err.to_string(), "Phase 1 API failed: Internal Server Error");
        match err {
            DhraviqError::Request { status, .. } => assert_eq!(status, Some(500)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_request_error() {
        let stub = spawn_stub(vec![StubResponse::ok("not json")]).await;
        let client = HttpCoachingClient::new(&stub.base_url, None).unwrap();

        let err = client.get_question_help("q", "p").await.unwrap_err();
        assert!(err.is_request());
        assert!(err.to_string().starts_with("Phase 2 API failed"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        let client = HttpCoachingClient::new("http://127.0.0.1:9", Some(Duration::from_secs(2)))
            .unwrap();
        let err = client.analyze_resume("x").await.unwrap_err();
        match err {
            DhraviqError::Request { status, .. } => assert_eq!(status, None),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_config_resolves_relative_base() {
        let client = HttpCoachingClient::from_config(&AppConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }
}
