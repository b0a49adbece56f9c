//! HTTP client abstraction for making requests to the CCL Prep backend

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use std::collections::HashMap;
use url::Url;

use crate::error::Error;
use crate::response::ApiEnvelope;

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Option<HashMap<String, String>>,
    body: Option<Vec<u8>>,
    multipart: Option<Form>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        Self {
            client,
            url: url.to_string(),
            method,
            headers: HeaderMap::new(),
            query_params: None,
            body: None,
            multipart: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }

    /// Add query parameters to the request
    pub fn query(mut self, params: HashMap<String, String>) -> Self {
        self.query_params = Some(params);
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(body)?;
        self.body = Some(json);
        self.headers
            .insert("Content-Type", HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// Attach a multipart form body (audio uploads)
    pub fn multipart(mut self, form: Form) -> Self {
        self.multipart = Some(form);
        self
    }

    /// Build the request
    fn build(self) -> Result<RequestBuilder, Error> {
        let mut url = Url::parse(&self.url)?;

        if let Some(params) = &self.query_params {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in params {
                query_pairs.append_pair(key, value);
            }
        }

        let mut req = self.client.request(self.method, url.as_str());
        req = req.headers(self.headers);

        if let Some(form) = self.multipart {
            req = req.multipart(form);
        } else if let Some(body) = self.body {
            req = req.body(body);
        }

        Ok(req)
    }

    /// Execute the request and parse the `{success, message, data}` envelope.
    ///
    /// A non-2xx status or a `success: false` envelope becomes `Error::Api`
    /// carrying whatever message the server included.
    pub async fn execute_api(self) -> Result<ApiEnvelope, Error> {
        let req = self.build()?;
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiEnvelope>(&text)
                .ok()
                .and_then(|env| env.message)
                .unwrap_or_else(|| text.clone());
            return Err(Error::api(status.as_u16(), message));
        }

        let envelope: ApiEnvelope = serde_json::from_str(&text)?;
        if !envelope.success {
            return Err(Error::api(status.as_u16(), envelope.message_or_empty()));
        }

        Ok(envelope)
    }

    /// Execute the request and return the raw response
    pub async fn execute_raw(self) -> Result<reqwest::Response, Error> {
        let req = self.build()?;
        let response = req.send().await?;
        Ok(response)
    }
}

/// Helper for creating HTTP requests
pub struct Fetch;

impl Fetch {
    /// Create a GET request
    pub fn get<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::GET)
    }

    /// Create a POST request
    pub fn post<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::POST)
    }

    /// Create a PUT request
    pub fn put<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::PUT)
    }

    /// Create a PATCH request
    pub fn patch<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::PATCH)
    }

    /// Create a DELETE request
    pub fn delete<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}
