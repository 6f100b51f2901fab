use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonialDraft {
    pub name: String,
    pub role: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A testimonial the server accepted, with the token that proves ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub testimonial: Testimonial,
    pub token: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("testimonials service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Rejected(String),
    #[error("unexpected response: {0}")]
    Malformed(&'static str),
}

/// CRUD verbs over the testimonial resource.
#[async_trait]
pub trait TestimonialApi: Send + Sync {
    async fn create(&self, draft: &TestimonialDraft) -> Result<Created, ApiError>;
    async fn delete(&self, token: &str) -> Result<(), ApiError>;
}

#[derive(Deserialize)]
struct CreateResponse {
    success: bool,
    testimonial: Option<Testimonial>,
    token: Option<String>,
    error: Option<String>,
}

impl CreateResponse {
    fn into_created(self) -> Result<Created, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.error.unwrap_or_else(|| "could not add the testimonial".to_string()),
            ));
        }
        let testimonial = self.testimonial.ok_or(ApiError::Malformed("missing testimonial"))?;
        let token = self.token.ok_or(ApiError::Malformed("missing token"))?;
        Ok(Created { testimonial, token })
    }
}

#[derive(Deserialize)]
struct DeleteResponse {
    success: bool,
    error: Option<String>,
}

/// JSON client for `POST /testimonials` and `DELETE /testimonials/{token}`.
#[derive(Debug, Clone)]
pub struct HttpTestimonialApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTestimonialApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: reqwest::Client::new(), base_url }
    }

    fn collection_url(&self) -> String {
        format!("{}/testimonials", self.base_url)
    }
}

#[async_trait]
impl TestimonialApi for HttpTestimonialApi {
    async fn create(&self, draft: &TestimonialDraft) -> Result<Created, ApiError> {
        debug!(url = %self.collection_url(), "creating testimonial");
        let response: CreateResponse = self
            .client
            .post(self.collection_url())
            .json(draft)
            .send()
            .await?
            .json()
            .await?;

        response.into_created()
    }

    async fn delete(&self, token: &str) -> Result<(), ApiError> {
        let url = format!("{}/{}", self.collection_url(), token);
        debug!(%url, "deleting testimonial");
        let response: DeleteResponse = self.client.delete(url).send().await?.json().await?;
        if response.success {
            Ok(())
        } else {
            Err(ApiError::Rejected(
                response.error.unwrap_or_else(|| "could not delete the testimonial".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Created, ApiError> {
        serde_json::from_str::<CreateResponse>(json).unwrap().into_created()
    }

    #[test]
    fn accepted_response_carries_token() {
        let created = parse(
            r#"{"success": true, "token": "a1b2",
                "testimonial": {"id": 3, "name": "Eva", "role": "Hotel", "text": "Great footage",
                                "created_at": "2026-05-01T10:00:00"}}"#,
        )
        .unwrap();
        assert_eq!(created.token, "a1b2");
        assert_eq!(created.testimonial.id, 3);
    }

    #[test]
    fn server_error_message_is_kept() {
        let err = parse(r#"{"success": false, "error": "All fields are required"}"#).unwrap_err();
        assert_eq!(err.to_string(), "All fields are required");
    }

    #[test]
    fn success_without_token_is_malformed() {
        let err = parse(r#"{"success": true, "testimonial": {"id": 1, "name": "a", "role": "b", "text": "c"}}"#)
            .unwrap_err();
        assert!(matches!(err, ApiError::Malformed("missing token")));
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let api = HttpTestimonialApi::new("http://localhost:5000/api/");
        assert_eq!(api.collection_url(), "http://localhost:5000/api/testimonials");
    }
}
