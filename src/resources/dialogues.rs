//! Dialogue administration

use crate::cache::QueryKey;
use crate::context::Context;
use crate::error::Error;
use crate::models::{Dialogue, DialogueDraft};
use crate::response::{unwrap_list, unwrap_object};

const RESOURCE: &str = "dialogues";

/// Client for `/admin/dialogues`
pub struct DialoguesClient {
    ctx: Context,
}

impl DialoguesClient {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Cache key for the dialogue listing of one language
    pub fn list_key(language_id: i64) -> QueryKey {
        QueryKey::list(RESOURCE).with_param("languageId", language_id)
    }

    /// List the dialogues of a language (cached)
    pub async fn list(&self, language_id: i64) -> Result<Vec<Dialogue>, Error> {
        let ctx = self.ctx.clone();
        self.ctx
            .cache
            .get_or_fetch(&Self::list_key(language_id), || {
                let ctx = ctx.clone();
                async move {
                    let mut params = std::collections::HashMap::new();
                    params.insert("languageId".to_string(), language_id.to_string());
                    let envelope = ctx
                        .get("/admin/dialogues")
                        .query(params)
                        .execute_api()
                        .await?;
                    unwrap_list(&envelope, "dialogues")
                }
            })
            .await
    }

    /// Create a dialogue
    pub async fn create(&self, draft: DialogueDraft) -> Result<Dialogue, Error> {
        let language_id = draft.language_id;
        let ctx = self.ctx.clone();
        let op = async move {
            let envelope = ctx
                .post("/admin/dialogues")
                .json(&draft)?
                .execute_api()
                .await?;
            unwrap_object(&envelope, "dialogue")
        };
        self.ctx
            .mutations
            .run(op, &[Self::list_key(language_id)], "Dialogue created")
            .await
    }

    /// Update a dialogue
    pub async fn update(&self, id: i64, draft: DialogueDraft) -> Result<Dialogue, Error> {
        let language_id = draft.language_id;
        let ctx = self.ctx.clone();
        let op = async move {
            let envelope = ctx
                .put(&format!("/admin/dialogues/{}", id))
                .json(&draft)?
                .execute_api()
                .await?;
            unwrap_object(&envelope, "dialogue")
        };
        self.ctx
            .mutations
            .run(
                op,
                &[Self::list_key(language_id), QueryKey::detail(RESOURCE, id)],
                "Dialogue updated",
            )
            .await
    }

    /// Delete a dialogue; every cached dialogue listing is invalidated
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        let ctx = self.ctx.clone();
        let op = async move {
            ctx.delete(&format!("/admin/dialogues/{}", id))
                .execute_api()
                .await?;
            Ok(())
        };
        let result = self.ctx.mutations.run(op, &[], "Dialogue deleted").await;
        if result.is_ok() {
            self.ctx.cache.invalidate_resource(RESOURCE);
        }
        result
    }
}
