//! Language administration

use crate::cache::QueryKey;
use crate::context::Context;
use crate::error::Error;
use crate::models::{Language, LanguageDraft};
use crate::response::{unwrap_list, unwrap_object};

const RESOURCE: &str = "languages";

/// Client for `/admin/languages`
pub struct LanguagesClient {
    ctx: Context,
}

impl LanguagesClient {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Cache key for the language listing
    pub fn list_key() -> QueryKey {
        QueryKey::list(RESOURCE)
    }

    /// List all languages (cached)
    pub async fn list(&self) -> Result<Vec<Language>, Error> {
        let ctx = self.ctx.clone();
        self.ctx
            .cache
            .get_or_fetch(&Self::list_key(), || {
                let ctx = ctx.clone();
                async move {
                    let envelope = ctx.get("/admin/languages").execute_api().await?;
                    unwrap_list(&envelope, "languages")
                }
            })
            .await
    }

    /// Create a language; the listing is invalidated on success
    pub async fn create(&self, draft: LanguageDraft) -> Result<Language, Error> {
        self.ensure_unique_name(&draft.name, None)?;

        let ctx = self.ctx.clone();
        let op = async move {
            let envelope = ctx
                .post("/admin/languages")
                .json(&draft)?
                .execute_api()
                .await?;
            unwrap_object(&envelope, "language")
        };
        self.ctx
            .mutations
            .run(op, &[Self::list_key()], "Language created")
            .await
    }

    /// Update a language
    pub async fn update(&self, id: i64, draft: LanguageDraft) -> Result<Language, Error> {
        self.ensure_unique_name(&draft.name, Some(id))?;

        let ctx = self.ctx.clone();
        let op = async move {
            let envelope = ctx
                .put(&format!("/admin/languages/{}", id))
                .json(&draft)?
                .execute_api()
                .await?;
            unwrap_object(&envelope, "language")
        };
        self.ctx
            .mutations
            .run(
                op,
                &[Self::list_key(), QueryKey::detail(RESOURCE, id)],
                "Language updated",
            )
            .await
    }

    /// Delete a language
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        let ctx = self.ctx.clone();
        let op = async move {
            ctx.delete(&format!("/admin/languages/{}", id))
                .execute_api()
                .await?;
            Ok(())
        };
        let result = self
            .ctx
            .mutations
            .run(op, &[], "Language deleted")
            .await;
        if result.is_ok() {
            self.ctx.cache.invalidate_resource(RESOURCE);
        }
        result
    }

    /// Best-effort uniqueness check against the cached listing. The backend
    /// owns the real invariant; this only saves a doomed round trip.
    fn ensure_unique_name(&self, name: &str, exclude_id: Option<i64>) -> Result<(), Error> {
        let cached: Option<Vec<Language>> = self.ctx.cache.read_as(&Self::list_key());
        if let Some(existing) = cached {
            let clash = existing.iter().any(|language| {
                Some(language.id) != exclude_id && language.name.eq_ignore_ascii_case(name)
            });
            if clash {
                return self
                    .ctx
                    .fail_validation("A language with this name already exists");
            }
        }
        Ok(())
    }
}
