//! Shared request context handed to every resource client

use std::sync::Arc;

use reqwest::Client;

use crate::auth::SessionStore;
use crate::cache::QueryCache;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};
use crate::mutation::MutationCoordinator;
use crate::notify::{Notification, NotificationSink};

/// Everything a resource client needs to issue requests and reconcile state
#[derive(Clone)]
pub(crate) struct Context {
    pub http: Client,
    pub base_url: String,
    pub options: ClientOptions,
    pub session: SessionStore,
    pub cache: QueryCache,
    pub mutations: MutationCoordinator,
    pub sink: Arc<dyn NotificationSink>,
}

impl Context {
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.options.api_prefix, path)
    }

    fn with_auth<'a>(&self, builder: FetchBuilder<'a>) -> FetchBuilder<'a> {
        match self.session.access_token() {
            Some(token) => builder.bearer_auth(&token),
            None => builder,
        }
    }

    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        self.with_auth(Fetch::get(&self.http, &self.endpoint(path)))
    }

    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        self.with_auth(Fetch::post(&self.http, &self.endpoint(path)))
    }

    pub fn put(&self, path: &str) -> FetchBuilder<'_> {
        self.with_auth(Fetch::put(&self.http, &self.endpoint(path)))
    }

    pub fn patch(&self, path: &str) -> FetchBuilder<'_> {
        self.with_auth(Fetch::patch(&self.http, &self.endpoint(path)))
    }

    pub fn delete(&self, path: &str) -> FetchBuilder<'_> {
        self.with_auth(Fetch::delete(&self.http, &self.endpoint(path)))
    }

    /// Fail a client-side check: raise the transient notification and return
    /// the validation error without touching the network.
    pub fn fail_validation<T>(&self, message: &str) -> Result<T, Error> {
        self.sink.publish(Notification::error(message));
        Err(Error::validation(message))
    }
}
