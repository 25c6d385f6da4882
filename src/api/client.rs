//! HTTP client for the lists REST API

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::types::{
    CreateListParams, ListBody, ListEdit, MergeListsBody, MergeListsParams, SnapshotPayload,
    UsersListBody, UsersListParams, View,
};
use crate::types::ApiError;
use listsync_core::{List, ListType};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server base URL, e.g. `http://localhost:3000`
    pub base_url: String,
    /// Bearer token sent on every request
    pub auth_token: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            auth_token: None,
            timeout_ms: 30_000,
        }
    }
}

/// The REST surface the engine consumes
///
/// Seam for the coordinator and poller; tests drive them against a
/// recording mock instead of the network.
#[async_trait]
pub trait ListsApi: Send + Sync {
    /// Fetch the full snapshot for a view
    async fn fetch_snapshot(&self, view: View) -> Result<SnapshotPayload, ApiError>;

    /// Flip the acceptance flag on a share record (accept/reject/unshare)
    async fn set_accepted(
        &self,
        list_id: &str,
        users_list_id: &str,
        accepted: bool,
    ) -> Result<(), ApiError>;

    /// Owner-only destructive delete
    async fn delete_list(&self, list_id: &str) -> Result<(), ApiError>;

    /// General edit; also used to mark a list complete
    async fn edit_list(&self, list_id: &str, edit: &ListEdit) -> Result<(), ApiError>;

    /// Clone a completed list into a new incomplete one
    async fn refresh_list(&self, list_id: &str) -> Result<List, ApiError>;

    /// Merge same-typed lists into one
    async fn merge_lists(&self, list_ids: &str, new_list_name: &str) -> Result<List, ApiError>;

    /// Create a new list
    async fn create_list(&self, name: &str, list_type: ListType) -> Result<List, ApiError>;
}

/// `ListsApi` over HTTP with reqwest
pub struct HttpListsApi {
    config: ApiConfig,
    client: Client,
}

impl HttpListsApi {
    /// Build the client; fails only on an unbuildable TLS/headers setup
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = config.auth_token {
            let value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::Unexpected(format!("invalid auth token: {e}")))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Map a response to a typed body or an `ApiError::Status`
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(status_error(status, body))
        }
    }

    /// Like `handle_response` but for endpoints whose body we discard
    async fn handle_empty(&self, response: Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(status_error(status, body))
    }
}

/// Build a status error, extracting a validation field map when present
fn status_error(status: StatusCode, body: String) -> ApiError {
    let validation = serde_json::from_str::<HashMap<String, String>>(&body).ok();
    ApiError::Status {
        status: status.as_u16(),
        message: body,
        validation,
    }
}

#[async_trait]
impl ListsApi for HttpListsApi {
    async fn fetch_snapshot(&self, view: View) -> Result<SnapshotPayload, ApiError> {
        let url = self.url(view.path());
        debug!(url = %url, "fetching snapshot");
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn set_accepted(
        &self,
        list_id: &str,
        users_list_id: &str,
        accepted: bool,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("/lists/{list_id}/users_lists/{users_list_id}"));
        let body = UsersListBody {
            users_list: UsersListParams {
                has_accepted: accepted,
            },
        };
        let response = self.client.patch(&url).json(&body).send().await?;
        self.handle_empty(response).await
    }

    async fn delete_list(&self, list_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/lists/{list_id}"));
        let response = self.client.delete(&url).send().await?;
        self.handle_empty(response).await
    }

    async fn edit_list(&self, list_id: &str, edit: &ListEdit) -> Result<(), ApiError> {
        let url = self.url(&format!("/lists/{list_id}"));
        let body = ListBody { list: edit };
        let response = self.client.put(&url).json(&body).send().await?;
        self.handle_empty(response).await
    }

    async fn refresh_list(&self, list_id: &str) -> Result<List, ApiError> {
        let url = self.url(&format!("/lists/{list_id}/refresh_list"));
        let response = self.client.post(&url).send().await?;
        self.handle_response(response).await
    }

    async fn merge_lists(&self, list_ids: &str, new_list_name: &str) -> Result<List, ApiError> {
        let url = self.url("/lists/merge_lists");
        let body = MergeListsBody {
            merge_lists: MergeListsParams {
                list_ids: list_ids.to_string(),
                new_list_name: new_list_name.to_string(),
            },
        };
        let response = self.client.post(&url).json(&body).send().await?;
        self.handle_response(response).await
    }

    async fn create_list(&self, name: &str, list_type: ListType) -> Result<List, ApiError> {
        let url = self.url("/lists");
        let body = ListBody {
            list: CreateListParams {
                name: name.to_string(),
                list_type,
            },
        };
        let response = self.client.post(&url).json(&body).send().await?;
        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let api = HttpListsApi::new(ApiConfig {
            base_url: "http://example.test".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(api.url("/lists"), "http://example.test/lists");
        assert_eq!(
            api.url("/lists/7/users_lists/9"),
            "http://example.test/lists/7/users_lists/9"
        );
    }

    #[test]
    fn test_status_error_parses_validation_map() {
        let err = status_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"name":"can't be blank"}"#.to_string(),
        );
        match err {
            ApiError::Status {
                status, validation, ..
            } => {
                assert_eq!(status, 422);
                let fields = validation.unwrap();
                assert_eq!(fields["name"], "can't be blank");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_error_without_structured_body() {
        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "oops".to_string());
        match err {
            ApiError::Status {
                status, validation, ..
            } => {
                assert_eq!(status, 500);
                assert!(validation.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unencodable_auth_token() {
        let result = HttpListsApi::new(ApiConfig {
            auth_token: Some("bad\ntoken".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ApiError::Unexpected(_))));
    }
}
