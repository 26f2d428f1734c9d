//! Wire types for Google's token endpoint and the Gmail v1 API.

use serde::{Deserialize, Serialize};

/// Access/refresh token pair as persisted in the session cookie.
///
/// Field names follow the JSON layout Google's Node client stores, so cookies
/// written by the old site still decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Expiry as milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}

/// Tokens are treated as expired this long before their real expiry.
const EXPIRY_SKEW_MS: i64 = 60_000;

impl OAuthTokens {
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expiry_date
            .is_some_and(|expiry| expiry <= now_ms + EXPIRY_SKEW_MS)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp_millis())
    }
}

/// Response body of `POST /token`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
    pub id_token: Option<String>,
}

impl TokenResponse {
    /// Convert to persisted tokens, anchoring `expires_in` at `now_ms`.
    pub fn into_tokens(self, now_ms: i64) -> OAuthTokens {
        OAuthTokens {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            scope: self.scope,
            token_type: self.token_type,
            id_token: self.id_token,
            expiry_date: self.expires_in.map(|secs| now_ms + secs * 1000),
        }
    }
}

/// A Gmail label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailLabel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub label_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_list_visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_list_visibility: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LabelsResponse {
    #[serde(default)]
    pub labels: Option<Vec<GmailLabel>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesListResponse {
    #[serde(default)]
    pub messages: Option<Vec<MessageRef>>,
    #[serde(default)]
    pub result_size_estimate: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GmailHeader {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagePayload {
    #[serde(default)]
    pub headers: Option<Vec<GmailHeader>>,
}

/// `users.messages.get` with `format=metadata`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailMessageMetadata {
    pub id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub label_ids: Option<Vec<String>>,
    #[serde(default)]
    pub internal_date: Option<String>,
    #[serde(default)]
    pub payload: Option<MessagePayload>,
}

impl GmailMessageMetadata {
    /// First header value named `name` (case-insensitive), or `""`.
    pub fn header(&self, name: &str) -> &str {
        self.payload
            .as_ref()
            .and_then(|p| p.headers.as_ref())
            .and_then(|hs| hs.iter().find(|h| h.name.eq_ignore_ascii_case(name)))
            .map(|h| h.value.as_str())
            .unwrap_or("")
    }
}

/// Flattened message row returned by `POST /api/gmail/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    pub id: String,
    pub thread_id: Option<String>,
    pub snippet: Option<String>,
    pub label_ids: Option<Vec<String>>,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub date: String,
    pub internal_date: Option<String>,
}

impl From<GmailMessageMetadata> for MessageSummary {
    fn from(m: GmailMessageMetadata) -> Self {
        let from = m.header("From").to_string();
        let to = m.header("To").to_string();
        let subject = m.header("Subject").to_string();
        let date = m.header("Date").to_string();
        Self {
            id: m.id,
            thread_id: m.thread_id,
            snippet: m.snippet,
            label_ids: m.label_ids,
            from,
            to,
            subject,
            date,
            internal_date: m.internal_date,
        }
    }
}
