//! Rapid review CRUD
//!
//! A rapid review bundles segments from across dialogues. It must reference
//! at least one segment; that check runs locally before any request.

use std::collections::HashMap;

use crate::cache::QueryKey;
use crate::context::Context;
use crate::error::Error;
use crate::models::{RapidReview, RapidReviewDraft};
use crate::response::{unwrap_list, unwrap_object};

const RESOURCE: &str = "rapidReviews";

/// Client for `/rapidReview`
pub struct RapidReviewsClient {
    ctx: Context,
}

impl RapidReviewsClient {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Cache key for the rapid reviews of one language
    pub fn list_key(language_id: i64) -> QueryKey {
        QueryKey::list(RESOURCE).with_param("languageId", language_id)
    }

    /// List the rapid reviews of a language (cached)
    pub async fn list(&self, language_id: i64) -> Result<Vec<RapidReview>, Error> {
        let ctx = self.ctx.clone();
        self.ctx
            .cache
            .get_or_fetch(&Self::list_key(language_id), || {
                let ctx = ctx.clone();
                async move {
                    let mut params = HashMap::new();
                    params.insert("languageId".to_string(), language_id.to_string());
                    let envelope = ctx.get("/rapidReview").query(params).execute_api().await?;
                    unwrap_list(&envelope, "rapidReviews")
                }
            })
            .await
    }

    /// Create a rapid review
    pub async fn create(&self, draft: RapidReviewDraft) -> Result<RapidReview, Error> {
        self.ensure_has_segments(&draft)?;

        let language_id = draft.language_id;
        let ctx = self.ctx.clone();
        let op = async move {
            let envelope = ctx
                .post("/rapidReview")
                .json(&draft)?
                .execute_api()
                .await?;
            unwrap_object(&envelope, "rapidReview")
        };
        self.ctx
            .mutations
            .run(op, &[Self::list_key(language_id)], "Rapid review created")
            .await
    }

    /// Update a rapid review
    pub async fn update(&self, id: i64, draft: RapidReviewDraft) -> Result<RapidReview, Error> {
        self.ensure_has_segments(&draft)?;

        let language_id = draft.language_id;
        let ctx = self.ctx.clone();
        let op = async move {
            let envelope = ctx
                .put(&format!("/rapidReview/{}", id))
                .json(&draft)?
                .execute_api()
                .await?;
            unwrap_object(&envelope, "rapidReview")
        };
        self.ctx
            .mutations
            .run(
                op,
                &[Self::list_key(language_id), QueryKey::detail(RESOURCE, id)],
                "Rapid review updated",
            )
            .await
    }

    /// Delete a rapid review
    pub async fn delete(&self, id: i64, language_id: i64) -> Result<(), Error> {
        let ctx = self.ctx.clone();
        let op = async move {
            ctx.delete(&format!("/rapidReview/{}", id))
                .execute_api()
                .await?;
            Ok(())
        };
        self.ctx
            .mutations
            .run(op, &[Self::list_key(language_id)], "Rapid review deleted")
            .await
    }

    fn ensure_has_segments(&self, draft: &RapidReviewDraft) -> Result<(), Error> {
        if draft.segments.is_empty() {
            return self
                .ctx
                .fail_validation("A rapid review needs at least one segment");
        }
        Ok(())
    }
}
