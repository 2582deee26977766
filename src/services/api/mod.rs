//! HTTP client for the Flowstate REST backend.
//!
//! Every request carries the stored bearer token. A 401/403 clears the token
//! and notifies the session observer registered at construction.

mod token;

pub use token::TokenStore;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Called once per request that comes back unauthorized.
pub type SessionObserver = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session expired or unauthorized (HTTP {0})")]
    SessionExpired(u16),
    #[error("{method} {url} failed with HTTP status {status}")]
    Status {
        method: Method,
        url: String,
        status: u16,
    },
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired(_))
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: TokenStore,
    on_session_expired: Option<SessionObserver>,
}

impl ApiClient {
    /// Build a client for `base_url`. No request timeout is applied; a hung
    /// request simply never completes.
    pub fn new(base_url: impl Into<String>, tokens: TokenStore) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(None).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
            on_session_expired: None,
        })
    }

    /// Register the session-expired observer. Set once at startup.
    pub fn with_session_observer(mut self, observer: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Arc::new(observer));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send()?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            log::warn!("{} {} was rejected ({}); session expired", method, path, status);
            if let Err(err) = self.tokens.clear() {
                log::error!("Failed to clear expired token: {:#}", err);
            }
            if let Some(observer) = &self.on_session_expired {
                observer();
            }
            return Err(ApiError::SessionExpired(status.as_u16()));
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                method,
                url: self.url(path),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path).query(query);
        let response = self.send(Method::GET, path, builder)?;
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let builder = self.request(Method::PUT, path).json(body);
        self.send(Method::PUT, path, builder)?;
        Ok(())
    }

    pub fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, path).json(body);
        self.send(Method::POST, path, builder)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot local HTTP server for client tests.

    use std::io::Read;
    use std::thread::{self, JoinHandle};

    #[derive(Debug, Clone)]
    pub struct Captured {
        pub method: String,
        pub url: String,
        pub authorization: Option<String>,
        pub body: String,
    }

    /// Serve exactly one request with `status` and `body`; returns the base
    /// URL and a handle yielding what the client sent.
    pub fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<Captured>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();

        let handle = thread::spawn(move || {
            let mut request = server.recv().unwrap();
            let authorization = request
                .headers()
                .iter()
                .find(|header| header.field.equiv("Authorization"))
                .map(|header| header.value.as_str().to_string());
            let mut received = String::new();
            request.as_reader().read_to_string(&mut received).unwrap();

            let captured = Captured {
                method: request.method().to_string(),
                url: request.url().to_string(),
                authorization,
                body: received,
            };

            let response = tiny_http::Response::from_string(body).with_status_code(status);
            request.respond(response).unwrap();
            captured
        });

        (format!("http://{}", addr), handle)
    }
}
