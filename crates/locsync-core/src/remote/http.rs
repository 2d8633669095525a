//! HTTP remote using a blocking reqwest client

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    KeySyncPushRequest, KeySyncPushResponse, KeySyncResolveRequest, KeySyncResolveResponse,
    ProjectMetadata, RemoteService,
};
use crate::cancel::CancellationToken;
use crate::config::RemoteSection;
use crate::{Error, Result};

/// Remote project reached over HTTP with a bearer token
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    base: Url,
    project: String,
    token: String,
}

impl HttpRemote {
    /// Build a client for the configured remote.
    ///
    /// Fails with [`Error::Authentication`] for a blank token and
    /// [`Error::Configuration`] for an unusable URL, before any request.
    pub fn new(remote: &RemoteSection, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::Authentication {
                message: "no access token; pass --token or set LOCSYNC_TOKEN".into(),
            });
        }

        let base = Url::parse(&remote.url)
            .map_err(|e| Error::configuration(format!("invalid remote url '{}': {e}", remote.url)))?;
        if base.cannot_be_a_base() {
            return Err(Error::configuration(format!(
                "remote url '{}' cannot carry a path",
                remote.url
            )));
        }

        let client = Client::builder()
            .timeout(remote.timeout())
            .user_agent(concat!("locsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Network {
                url: remote.url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base,
            project: remote.project.clone(),
            token,
        })
    }

    /// `{base}/api/projects/{project}/{suffix...}` with each segment escaped.
    fn endpoint(&self, suffix: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "projects", self.project.as_str()])
                .extend(suffix);
        }
        url
    }

    fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<T> {
        cancel.check()?;
        debug!("Requesting {}", url);

        let response = request
            .bearer_auth(&self.token)
            .send() // blocks up to the client timeout, cancellation or not
            .map_err(|e| Error::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        cancel.check()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(status, body, &self.project));
        }

        response.json::<T>().map_err(|e| Error::Http {
            status: status.as_u16(),
            message: format!("unreadable response body: {e}"),
        })
    }
}

/// Map a non-success status to the error the user can act on.
pub(crate) fn status_error(status: StatusCode, body: String, project: &str) -> Error {
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        body.trim().to_string()
    };

    match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized,
        StatusCode::FORBIDDEN => Error::Forbidden {
            project: project.to_string(),
        },
        StatusCode::NOT_FOUND => Error::ProjectNotFound {
            project: project.to_string(),
        },
        StatusCode::CONFLICT => Error::RemoteConflict { message },
        _ => Error::Http {
            status: status.as_u16(),
            message,
        },
    }
}

impl RemoteService for HttpRemote {
    fn get_project(&self, cancel: &CancellationToken) -> Result<ProjectMetadata> {
        let url = self.endpoint(&[]);
        self.send(self.client.get(url.clone()), &url, cancel)
    }

    fn key_sync_push(
        &self,
        request: &KeySyncPushRequest,
        cancel: &CancellationToken,
    ) -> Result<KeySyncPushResponse> {
        let url = self.endpoint(&["keysync", "push"]);
        self.send(self.client.post(url.clone()).json(request), &url, cancel)
    }

    fn key_sync_resolve(
        &self,
        request: &KeySyncResolveRequest,
        cancel: &CancellationToken,
    ) -> Result<KeySyncResolveResponse> {
        let url = self.endpoint(&["keysync", "resolve"]);
        self.send(self.client.post(url.clone()).json(request), &url, cancel)
    }
}
