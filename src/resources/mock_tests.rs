//! Mock test CRUD
//!
//! A mock test pairs two dialogues. The pair must differ; that check runs
//! locally before any request is dispatched.

use std::collections::HashMap;

use crate::cache::QueryKey;
use crate::context::Context;
use crate::error::Error;
use crate::models::{MockTest, MockTestDraft};
use crate::response::{unwrap_list, unwrap_object};

const RESOURCE: &str = "mockTests";

/// Client for `/mockTest`
pub struct MockTestsClient {
    ctx: Context,
}

impl MockTestsClient {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Cache key for one user's mock tests in one language
    pub fn list_key(user_id: i64, language_id: i64) -> QueryKey {
        QueryKey::list(RESOURCE)
            .with_param("userId", user_id)
            .with_param("languageId", language_id)
    }

    /// List mock tests for a user and language (cached)
    pub async fn list(&self, user_id: i64, language_id: i64) -> Result<Vec<MockTest>, Error> {
        let ctx = self.ctx.clone();
        self.ctx
            .cache
            .get_or_fetch(&Self::list_key(user_id, language_id), || {
                let ctx = ctx.clone();
                async move {
                    let mut params = HashMap::new();
                    params.insert("userId".to_string(), user_id.to_string());
                    params.insert("languageId".to_string(), language_id.to_string());
                    let envelope = ctx.get("/mockTest").query(params).execute_api().await?;
                    unwrap_list(&envelope, "mockTests")
                }
            })
            .await
    }

    /// Create a mock test
    pub async fn create(&self, user_id: i64, draft: MockTestDraft) -> Result<MockTest, Error> {
        self.ensure_distinct_dialogues(&draft)?;

        let language_id = draft.language_id;
        let ctx = self.ctx.clone();
        let op = async move {
            let envelope = ctx.post("/mockTest").json(&draft)?.execute_api().await?;
            unwrap_object(&envelope, "mockTest")
        };
        self.ctx
            .mutations
            .run(
                op,
                &[Self::list_key(user_id, language_id)],
                "Mock test created",
            )
            .await
    }

    /// Update a mock test
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        draft: MockTestDraft,
    ) -> Result<MockTest, Error> {
        self.ensure_distinct_dialogues(&draft)?;

        let language_id = draft.language_id;
        let ctx = self.ctx.clone();
        let op = async move {
            let envelope = ctx
                .patch(&format!("/mockTest/{}", id))
                .json(&draft)?
                .execute_api()
                .await?;
            unwrap_object(&envelope, "mockTest")
        };
        self.ctx
            .mutations
            .run(
                op,
                &[
                    Self::list_key(user_id, language_id),
                    QueryKey::detail(RESOURCE, id),
                ],
                "Mock test updated",
            )
            .await
    }

    /// Delete a mock test
    pub async fn delete(&self, id: i64, user_id: i64, language_id: i64) -> Result<(), Error> {
        let ctx = self.ctx.clone();
        let op = async move {
            ctx.delete(&format!("/mockTest/{}", id))
                .execute_api()
                .await?;
            Ok(())
        };
        self.ctx
            .mutations
            .run(
                op,
                &[Self::list_key(user_id, language_id)],
                "Mock test deleted",
            )
            .await
    }

    /// Cross-field check: the two dialogues of a mock test must differ.
    /// Short-circuits locally; no request is sent on failure.
    fn ensure_distinct_dialogues(&self, draft: &MockTestDraft) -> Result<(), Error> {
        if draft.dialogue_id == draft.dialogue_id_2 {
            return self
                .ctx
                .fail_validation("A mock test needs two different dialogues");
        }
        Ok(())
    }
}
