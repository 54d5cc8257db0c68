//! Signin and GraphQL client
//!
//! `ApiClient` speaks to the backend through an [`HttpTransport`], which the
//! binary backs with reqwest and the tests back with canned replies.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::utils::mask_token;

/// Raw HTTP reply handed back by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP capability the client needs: POST a JSON body
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: &Value,
    ) -> Result<HttpReply, ApiError>;
}

/// reqwest-backed transport used outside of tests
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: &Value,
    ) -> Result<HttpReply, ApiError> {
        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(token) = bearer {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpReply { status, body })
    }
}

/// The signin collaborator, as seen by the session
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchange credentials for a bearer token
    async fn signin(&self, identity: &str, password: &str) -> Result<String, ApiError>;
}

#[derive(Debug, Serialize)]
struct SigninRequest<'a> {
    identity: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorItem>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorItem {
    message: String,
}

pub struct ApiClient<T: HttpTransport = ReqwestTransport> {
    transport: T,
    base: String,
}

impl ApiClient<ReqwestTransport> {
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_transport(base, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn with_transport(base: impl Into<String>, transport: T) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        ApiClient { transport, base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Run one GraphQL document and decode its `data` object
    pub async fn graphql<D: DeserializeOwned>(
        &self,
        token: &str,
        query: &str,
        variables: Value,
    ) -> Result<D, ApiError> {
        let url = format!("{}/graphql", self.base);
        let body = serde_json::to_value(GraphqlRequest {
            query,
            variables: &variables,
        })
        .map_err(|e| ApiError::Malformed(e.to_string()))?;

        tracing::debug!(url = %url, token = %mask_token(token), "Sending GraphQL request");
        let reply = self.transport.post_json(&url, Some(token), &body).await?;
        tracing::debug!(status = reply.status, bytes = reply.body.len(), "GraphQL reply");

        let data = decode_graphql_reply(&reply)?;
        serde_json::from_value(data).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl<T: HttpTransport> Authenticator for ApiClient<T> {
    async fn signin(&self, identity: &str, password: &str) -> Result<String, ApiError> {
        let url = format!("{}/auth/signin", self.base);
        let body = serde_json::to_value(SigninRequest { identity, password })
            .map_err(|e| ApiError::Malformed(e.to_string()))?;

        let reply = self.transport.post_json(&url, None, &body).await?;
        if !reply.is_success() {
            tracing::warn!(status = reply.status, "Signin rejected");
            return Err(ApiError::InvalidCredentials);
        }

        extract_token(&reply.body)
    }
}

/// Apply the failure rules to a GraphQL reply and return its `data`
fn decode_graphql_reply(reply: &HttpReply) -> Result<Value, ApiError> {
    let parsed: Option<GraphqlResponse> = serde_json::from_str(&reply.body).ok();

    let Some(response) = parsed else {
        if reply.is_success() {
            return Err(ApiError::Malformed("response is not GraphQL JSON".to_string()));
        }
        return Err(ApiError::Status(reply.status));
    };

    if let Some(first) = response.errors.into_iter().next() {
        return Err(ApiError::Graphql(first.message));
    }
    if !reply.is_success() {
        return Err(ApiError::Status(reply.status));
    }

    match response.data {
        Some(Value::Null) | None => Err(ApiError::MissingData),
        Some(data) => Ok(data),
    }
}

/// Token from `{token}`, `{jwt}`, or a bare (possibly quoted) body
fn extract_token(body: &str) -> Result<String, ApiError> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["token", "jwt"] {
            if let Some(Value::String(token)) = map.get(key) {
                if !token.trim().is_empty() {
                    return Ok(token.trim().to_string());
                }
            }
        }
        return Err(ApiError::Malformed("signin response has no token".to_string()));
    }

    let token = body.trim_matches(|c: char| c == '"' || c.is_whitespace());
    if token.is_empty() {
        return Err(ApiError::Malformed("signin response has no token".to_string()));
    }
    Ok(token.to_string())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Transport that replays canned replies and records every request
    #[derive(Default)]
    pub struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<HttpReply, ApiError>>>,
        pub requests: Mutex<Vec<(String, Option<String>, Value)>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, status: u16, body: Value) -> Self {
            self.reply_raw(status, &body.to_string())
        }

        pub fn reply_raw(self, status: u16, body: &str) -> Self {
            self.replies.lock().unwrap().push_back(Ok(HttpReply {
                status,
                body: body.to_string(),
            }));
            self
        }

        pub fn fail(self, err: ApiError) -> Self {
            self.replies.lock().unwrap().push_back(Err(err));
            self
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn post_json(
            &self,
            url: &str,
            bearer: Option<&str>,
            body: &Value,
        ) -> Result<HttpReply, ApiError> {
            self.requests.lock().unwrap().push((
                url.to_string(),
                bearer.map(str::to_string),
                body.clone(),
            ));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no scripted reply".to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedTransport;
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Users {
        user: Vec<crate::models::User>,
    }

    #[tokio::test]
    async fn test_graphql_sends_bearer_and_variables() {
        let transport = ScriptedTransport::new()
            .reply(200, json!({"data": {"user": [{"id": 7, "login": "jdoe"}]}}));
        let client = ApiClient::with_transport("http://backend/", transport);

        let users: Users = client
            .graphql("tok", crate::queries::ME, json!({"limit": 3}))
            .await
            .unwrap();
        assert_eq!(users.user[0].login, "jdoe");

        let requests = client.transport.requests.lock().unwrap();
        let (url, bearer, body) = &requests[0];
        assert_eq!(url, "http://backend/graphql");
        assert_eq!(bearer.as_deref(), Some("tok"));
        assert_eq!(body["variables"]["limit"], 3);
    }

    #[tokio::test]
    async fn test_graphql_error_list_surfaces_first_message() {
        let transport = ScriptedTransport::new().reply(
            200,
            json!({"errors": [{"message": "X"}, {"message": "Y"}], "data": null}),
        );
        let client = ApiClient::with_transport("http://backend", transport);
        let result: Result<Value, _> = client.graphql("tok", "query", json!({})).await;
        assert_eq!(result.unwrap_err(), ApiError::Graphql("X".to_string()));
    }

    #[tokio::test]
    async fn test_graphql_status_and_missing_data() {
        let transport = ScriptedTransport::new()
            .reply_raw(503, "upstream unavailable")
            .reply(200, json!({"errors": []}))
            .reply(401, json!({"errors": [{"message": "JWTExpired"}]}));
        let client = ApiClient::with_transport("http://backend", transport);

        let first: Result<Value, _> = client.graphql("tok", "q", json!({})).await;
        assert_eq!(first.unwrap_err(), ApiError::Status(503));

        let second: Result<Value, _> = client.graphql("tok", "q", json!({})).await;
        assert_eq!(second.unwrap_err(), ApiError::MissingData);

        let third: Result<Value, _> = client.graphql("tok", "q", json!({})).await;
        assert_eq!(third.unwrap_err().to_string(), "JWTExpired");
    }

    #[tokio::test]
    async fn test_signin_variants() {
        let transport = ScriptedTransport::new()
            .reply(200, json!({"token": "abc"}))
            .reply(200, json!({"jwt": "def"}))
            .reply_raw(200, "\"ghi\"\n")
            .reply_raw(403, "{\"error\": \"User does not exist\"}");
        let client = ApiClient::with_transport("http://backend", transport);

        assert_eq!(client.signin("me", "pw").await.unwrap(), "abc");
        assert_eq!(client.signin("me", "pw").await.unwrap(), "def");
        assert_eq!(client.signin("me", "pw").await.unwrap(), "ghi");
        assert_eq!(
            client.signin("me", "pw").await.unwrap_err(),
            ApiError::InvalidCredentials
        );

        let requests = client.transport.requests.lock().unwrap();
        assert_eq!(requests[0].0, "http://backend/auth/signin");
        assert_eq!(requests[0].1, None);
        assert_eq!(requests[0].2, json!({"identity": "me", "password": "pw"}));
    }

    #[test]
    fn test_extract_token_rejects_empty() {
        assert!(extract_token("").is_err());
        assert!(extract_token("{\"token\": \"\"}").is_err());
        assert!(extract_token("{}").is_err());
    }
}
