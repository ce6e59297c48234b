use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::READWISE_BASE_URL;
use crate::Result;

/// Maximum page size supported by the Readwise API
const PAGE_SIZE: usize = 1000;

/// Pause between highlight pages to stay under the API rate limit
const PAGE_DELAY: Duration = Duration::from_secs(1);

/// A source entity (book, article, podcast episode) that highlights belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,

    /// Category tag ("books", "articles", "podcasts", ...); absent for some sources
    #[serde(default)]
    pub category: Option<String>,
}

/// A saved excerpt of text associated with a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub id: i64,
    pub book_id: i64,
    pub text: String,
}

/// One page of a Readwise list endpoint
#[derive(Debug, Deserialize)]
struct ListPage<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,

    /// URL of the next page, absent on the last one
    next: Option<String>,
}

/// The Readwise operations the pipeline depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HighlightStore: Send + Sync {
    /// Fetch all books
    async fn list_books(&self) -> Result<Vec<Book>>;

    /// Fetch all highlights
    async fn list_highlights(&self) -> Result<Vec<Highlight>>;

    /// Replace a highlight's text, returning the updated resource
    async fn update_highlight(&self, id: i64, text: &str) -> Result<Highlight>;
}

/// HTTP client for the Readwise REST API
pub struct ReadwiseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ReadwiseClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, READWISE_BASE_URL)
    }

    /// Point the client at a non-default base URL (used by tests)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn get_page<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<ListPage<T>> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Token {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("Readwise request failed: HTTP {} for {}", response.status(), url);
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl HighlightStore for ReadwiseClient {
    async fn list_books(&self) -> Result<Vec<Book>> {
        // One page at the maximum size covers every library seen in practice.
        let url = format!("{}/books/?page_size={}", self.base_url, PAGE_SIZE);
        let page: ListPage<Book> = self.get_page(&url).await?;
        Ok(page.results)
    }

    async fn list_highlights(&self) -> Result<Vec<Highlight>> {
        let mut highlights = Vec::new();
        let mut page_number = 1;

        loop {
            let url = format!(
                "{}/highlights/?page={}&page_size={}",
                self.base_url, page_number, PAGE_SIZE
            );
            println!("Getting highlights, page {page_number}...");
            let page: ListPage<Highlight> = self.get_page(&url).await?;

            if page.results.is_empty() {
                break;
            }

            highlights.extend(page.results);
            if page.next.is_none() {
                break;
            }

            page_number += 1;
            tokio::time::sleep(PAGE_DELAY).await;
        }

        tracing::debug!("Fetched {} highlights over {} page(s)", highlights.len(), page_number);
        Ok(highlights)
    }

    async fn update_highlight(&self, id: i64, text: &str) -> Result<Highlight> {
        let url = format!("{}/highlights/{}/", self.base_url, id);
        let response = self
            .client
            .patch(&url)
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Readwise update failed: HTTP {} for highlight {}",
                response.status(),
                id
            );
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ReadwiseClient {
        ReadwiseClient::with_base_url("test-token", server.uri())
    }

    #[tokio::test]
    async fn list_books_returns_single_page() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/books/"))
            .and(matchers::query_param("page_size", "1000"))
            .and(matchers::header("authorization", "Token test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": 2,
                "next": null,
                "results": [
                    {"id": 1, "category": "podcasts", "title": "Some Show"},
                    {"id": 2, "category": "books"},
                ],
            })))
            .mount(&server)
            .await;

        let books = client_for(&server).list_books().await.unwrap();
        assert_eq!(
            books,
            vec![
                Book { id: 1, category: Some("podcasts".into()) },
                Book { id: 2, category: Some("books".into()) },
            ]
        );
    }

    #[tokio::test]
    async fn list_highlights_accumulates_pages_in_order() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/highlights/"))
            .and(matchers::query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "next": "https://readwise.io/api/v2/highlights/?page=2",
                "results": [
                    {"id": 10, "book_id": 1, "text": "first"},
                    {"id": 11, "book_id": 1, "text": "second"},
                ],
            })))
            .mount(&server)
            .await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/highlights/"))
            .and(matchers::query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "next": null,
                "results": [
                    {"id": 12, "book_id": 2, "text": "third"},
                ],
            })))
            .mount(&server)
            .await;

        let highlights = client_for(&server).list_highlights().await.unwrap();
        let ids: Vec<i64> = highlights.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[tokio::test]
    async fn list_highlights_stops_on_empty_page() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/highlights/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "next": null,
                "results": [],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let highlights = client_for(&server).list_highlights().await.unwrap();
        assert!(highlights.is_empty());
    }

    #[tokio::test]
    async fn list_highlights_propagates_http_errors() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/highlights/"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client_for(&server).list_highlights().await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn update_highlight_patches_text() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("PATCH"))
            .and(matchers::path("/highlights/42/"))
            .and(matchers::header("authorization", "Token test-token"))
            .and(matchers::body_json(serde_json::json!({"text": "cleaned"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 42, "book_id": 7, "text": "cleaned",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let updated = client_for(&server)
            .update_highlight(42, "cleaned")
            .await
            .unwrap();
        assert_eq!(updated.text, "cleaned");
    }

    #[tokio::test]
    async fn update_highlight_reports_unknown_id() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("PATCH"))
            .and(matchers::path("/highlights/999/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .update_highlight(999, "cleaned")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
