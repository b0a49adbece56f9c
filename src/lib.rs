//! CCL Prep Rust Client Library
//!
//! A Rust client for the CCL Prep practice platform's REST backend, covering
//! the admin and end-user surfaces: languages, dialogues, segments,
//! vocabulary, mock tests, rapid reviews, subscriptions, transactions, and
//! contact messages, plus the auth flows (register, OTP verification,
//! password reset).
//!
//! Reads are served through a keyed remote-resource cache with a freshness
//! window and in-flight deduplication; writes go through a mutation
//! coordinator that invalidates (or optimistically patches) the matching
//! cache entries and raises transient notifications when they settle.

pub mod auth;
pub mod cache;
pub mod config;
mod context;
pub mod error;
pub mod fetch;
pub mod media;
pub mod models;
pub mod mutation;
pub mod notify;
pub mod resources;
pub mod response;

use std::sync::Arc;

use reqwest::Client;

use crate::auth::{Auth, SessionStore};
use crate::cache::QueryCache;
use crate::config::ClientOptions;
use crate::context::Context;
use crate::mutation::MutationCoordinator;
use crate::notify::{LogSink, NotificationSink};
use crate::resources::{
    ContactClient, DialoguesClient, LanguagesClient, MockTestsClient, RapidReviewsClient,
    SegmentsClient, SubscriptionsClient, TransactionsClient, VocabularyClient,
};

/// The main entry point for the CCL Prep client
pub struct CclPrep {
    ctx: Context,
}

impl CclPrep {
    /// Create a new client against a backend base URL
    ///
    /// # Example
    ///
    /// ```
    /// use ccl_prep_client::CclPrep;
    ///
    /// let client = CclPrep::new("https://api.cclprep.example");
    /// ```
    pub fn new(base_url: &str) -> Self {
        Self::new_with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options
    pub fn new_with_options(base_url: &str, options: ClientOptions) -> Self {
        Self::new_with_sink(base_url, options, Arc::new(LogSink))
    }

    /// Create a new client routing notifications into a custom sink
    pub fn new_with_sink(
        base_url: &str,
        options: ClientOptions,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().unwrap_or_default();

        let cache = QueryCache::new(options.stale_time, options.retry_once);
        let mutations = MutationCoordinator::new(cache.clone(), sink.clone());
        let session = SessionStore::new();

        let ctx = Context {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            options,
            session,
            cache,
            mutations,
            sink,
        };

        Self { ctx }
    }

    /// The auth client for registration, OTP verification, and sign-in
    pub fn auth(&self) -> Auth {
        Auth::new(self.ctx.clone())
    }

    /// Language administration
    pub fn languages(&self) -> LanguagesClient {
        LanguagesClient::new(self.ctx.clone())
    }

    /// Dialogue administration
    pub fn dialogues(&self) -> DialoguesClient {
        DialoguesClient::new(self.ctx.clone())
    }

    /// Segment administration
    pub fn segments(&self) -> SegmentsClient {
        SegmentsClient::new(self.ctx.clone())
    }

    /// Vocabulary CRUD
    pub fn vocabulary(&self) -> VocabularyClient {
        VocabularyClient::new(self.ctx.clone())
    }

    /// Mock test CRUD
    pub fn mock_tests(&self) -> MockTestsClient {
        MockTestsClient::new(self.ctx.clone())
    }

    /// Rapid review CRUD
    pub fn rapid_reviews(&self) -> RapidReviewsClient {
        RapidReviewsClient::new(self.ctx.clone())
    }

    /// Subscription reads and cancellation
    pub fn subscriptions(&self) -> SubscriptionsClient {
        SubscriptionsClient::new(self.ctx.clone())
    }

    /// Transaction reads and amendments
    pub fn transactions(&self) -> TransactionsClient {
        TransactionsClient::new(self.ctx.clone())
    }

    /// Contact message listing and deletion
    pub fn contact(&self) -> ContactClient {
        ContactClient::new(self.ctx.clone())
    }

    /// The shared query cache (read, invalidate, or subscribe to events)
    pub fn cache(&self) -> &QueryCache {
        &self.ctx.cache
    }

    /// The shared session store
    pub fn session(&self) -> &SessionStore {
        &self.ctx.session
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::cache::{CacheEvent, QueryKey};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::notify::{Notification, NotificationSink, Severity};
    pub use crate::CclPrep;
}
