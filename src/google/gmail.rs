//! Read-only Gmail v1 client for the signed-in user (`users/me`).

use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;

use super::types::{
    GmailLabel, GmailMessageMetadata, LabelsResponse, MessageSummary, MessagesListResponse,
};
use super::{read_json, GoogleError};

const METADATA_HEADERS: [&str; 4] = ["From", "To", "Subject", "Date"];

/// Parallel metadata fetches per listing.
const FETCH_CONCURRENCY: usize = 8;

pub struct GmailClient {
    http: Client,
    base: String,
    access_token: String,
}

impl GmailClient {
    pub fn new(http: Client, base: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/users/me/{}", self.base, path)
    }

    pub async fn list_labels(&self) -> Result<Vec<GmailLabel>, GoogleError> {
        let response = self
            .http
            .get(self.url("labels"))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|source| GoogleError::Transport {
                endpoint: "labels.list",
                source,
            })?;

        let body: LabelsResponse = read_json("labels.list", response).await?;
        Ok(body.labels.unwrap_or_default())
    }

    /// Message ids matching an optional label and Gmail search query.
    pub async fn list_message_ids(
        &self,
        label_id: Option<&str>,
        q: Option<&str>,
        max_results: u32,
    ) -> Result<Vec<String>, GoogleError> {
        let mut query: Vec<(&str, String)> = vec![("maxResults", max_results.to_string())];
        if let Some(label) = label_id {
            query.push(("labelIds", label.to_string()));
        }
        if let Some(q) = q {
            query.push(("q", q.to_string()));
        }

        let response = self
            .http
            .get(self.url("messages"))
            .bearer_auth(&self.access_token)
            .query(&query)
            .send()
            .await
            .map_err(|source| GoogleError::Transport {
                endpoint: "messages.list",
                source,
            })?;

        let body: MessagesListResponse = read_json("messages.list", response).await?;
        tracing::debug!(estimate = ?body.result_size_estimate, "listed messages");
        Ok(body
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.id)
            .collect())
    }

    pub async fn get_message_metadata(
        &self,
        id: &str,
    ) -> Result<GmailMessageMetadata, GoogleError> {
        let mut query = vec![("format", "metadata")];
        query.extend(METADATA_HEADERS.iter().map(|h| ("metadataHeaders", *h)));

        let response = self
            .http
            .get(self.url(&format!("messages/{id}")))
            .bearer_auth(&self.access_token)
            .query(&query)
            .send()
            .await
            .map_err(|source| GoogleError::Transport {
                endpoint: "messages.get",
                source,
            })?;

        read_json("messages.get", response).await
    }

    /// List messages then fetch each one's headers. Order follows the listing.
    pub async fn list_message_summaries(
        &self,
        label_id: Option<&str>,
        q: Option<&str>,
        max_results: u32,
    ) -> Result<Vec<MessageSummary>, GoogleError> {
        let ids = self.list_message_ids(label_id, q, max_results).await?;

        stream::iter(ids)
            .map(|id| async move { self.get_message_metadata(&id).await })
            .buffered(FETCH_CONCURRENCY)
            .map_ok(MessageSummary::from)
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn list_labels_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/users/me/labels")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"labels":[{"id":"INBOX","name":"INBOX","type":"system"}]}"#)
            .create_async()
            .await;

        let client = GmailClient::new(Client::new(), server.url(), "tok");
        let labels = client.list_labels().await.unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].id, "INBOX");
        assert_eq!(labels[0].label_type.as_deref(), Some("system"));
    }

    #[tokio::test]
    async fn missing_labels_field_is_empty_list() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/users/me/labels")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let client = GmailClient::new(Client::new(), server.url(), "tok");
        assert!(client.list_labels().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn summaries_follow_listing_order() {
        let mut server = mockito::Server::new_async().await;
        let _list = server
            .mock("GET", "/users/me/messages")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("labelIds".into(), "INBOX".into()),
                Matcher::UrlEncoded("maxResults".into(), "2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"messages":[{"id":"a","threadId":"ta"},{"id":"b","threadId":"tb"}]}"#)
            .create_async()
            .await;
        let _a = server
            .mock("GET", "/users/me/messages/a")
            .match_query(Matcher::UrlEncoded("format".into(), "metadata".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"a","threadId":"ta","payload":{"headers":[{"name":"Subject","value":"First"}]}}"#)
            .create_async()
            .await;
        let _b = server
            .mock("GET", "/users/me/messages/b")
            .match_query(Matcher::UrlEncoded("format".into(), "metadata".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"b","threadId":"tb","payload":{"headers":[{"name":"Subject","value":"Second"}]}}"#)
            .create_async()
            .await;

        let client = GmailClient::new(Client::new(), server.url(), "tok");
        let out = client
            .list_message_summaries(Some("INBOX"), None, 2)
            .await
            .unwrap();
        let subjects: Vec<&str> = out.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, vec!["First", "Second"]);
        assert_eq!(out[0].from, "");
    }

    #[tokio::test]
    async fn upstream_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/users/me/labels")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let client = GmailClient::new(Client::new(), server.url(), "tok");
        assert!(matches!(
            client.list_labels().await,
            Err(GoogleError::Status { .. })
        ));
    }
}
