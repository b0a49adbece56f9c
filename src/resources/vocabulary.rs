//! Vocabulary CRUD
//!
//! Vocabulary entries carry two optional audio clips (original and converted
//! pronunciation); create/update travels as multipart like segments do.

use reqwest::multipart::{Form, Part};
use std::collections::HashMap;

use crate::cache::QueryKey;
use crate::context::Context;
use crate::error::Error;
use crate::media::RecordedClip;
use crate::models::{Vocabulary, VocabularyDraft};
use crate::response::{unwrap_list, unwrap_object};

const RESOURCE: &str = "vocabulary";

/// Client for `/vocabulary`
pub struct VocabularyClient {
    ctx: Context,
}

impl VocabularyClient {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Cache key for one user's vocabulary in one language
    pub fn list_key(user_id: i64, language_id: i64) -> QueryKey {
        QueryKey::list(RESOURCE)
            .with_param("userId", user_id)
            .with_param("languageId", language_id)
    }

    /// List a user's vocabulary for a language (cached)
    pub async fn list(&self, user_id: i64, language_id: i64) -> Result<Vec<Vocabulary>, Error> {
        let ctx = self.ctx.clone();
        self.ctx
            .cache
            .get_or_fetch(&Self::list_key(user_id, language_id), || {
                let ctx = ctx.clone();
                async move {
                    let mut params = HashMap::new();
                    params.insert("userId".to_string(), user_id.to_string());
                    params.insert("languageId".to_string(), language_id.to_string());
                    let envelope = ctx.get("/vocabulary").query(params).execute_api().await?;
                    unwrap_list(&envelope, "vocabulary")
                }
            })
            .await
    }

    /// Create a vocabulary entry
    pub async fn create(
        &self,
        user_id: i64,
        draft: VocabularyDraft,
        original_audio: Option<RecordedClip>,
        converted_audio: Option<RecordedClip>,
    ) -> Result<Vocabulary, Error> {
        let language_id = draft.language_id;
        let form = build_form(&draft, original_audio, converted_audio)?;

        let ctx = self.ctx.clone();
        let op = async move {
            let envelope = ctx
                .post("/vocabulary")
                .multipart(form)
                .execute_api()
                .await?;
            unwrap_object(&envelope, "vocabulary")
        };
        self.ctx
            .mutations
            .run(
                op,
                &[Self::list_key(user_id, language_id)],
                "Vocabulary added",
            )
            .await
    }

    /// Update a vocabulary entry; audio parts are only replaced when provided
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        draft: VocabularyDraft,
        original_audio: Option<RecordedClip>,
        converted_audio: Option<RecordedClip>,
    ) -> Result<Vocabulary, Error> {
        let language_id = draft.language_id;
        let form = build_form(&draft, original_audio, converted_audio)?;

        let ctx = self.ctx.clone();
        let op = async move {
            let envelope = ctx
                .put(&format!("/vocabulary/{}", id))
                .multipart(form)
                .execute_api()
                .await?;
            unwrap_object(&envelope, "vocabulary")
        };
        self.ctx
            .mutations
            .run(
                op,
                &[Self::list_key(user_id, language_id)],
                "Vocabulary updated",
            )
            .await
    }

    /// Delete a vocabulary entry
    pub async fn delete(&self, id: i64, user_id: i64, language_id: i64) -> Result<(), Error> {
        let ctx = self.ctx.clone();
        let op = async move {
            ctx.delete(&format!("/vocabulary/{}", id))
                .execute_api()
                .await?;
            Ok(())
        };
        self.ctx
            .mutations
            .run(
                op,
                &[Self::list_key(user_id, language_id)],
                "Vocabulary deleted",
            )
            .await
    }
}

fn build_form(
    draft: &VocabularyDraft,
    original_audio: Option<RecordedClip>,
    converted_audio: Option<RecordedClip>,
) -> Result<Form, Error> {
    let mut form = Form::new()
        .text("languageId", draft.language_id.to_string())
        .text("originalWord", draft.original_word.clone())
        .text("convertedWord", draft.converted_word.clone());

    if let Some(description) = &draft.description {
        form = form.text("description", description.clone());
    }
    if let Some(clip) = original_audio {
        form = form.part("originalAudio", clip_part(clip)?);
    }
    if let Some(clip) = converted_audio {
        form = form.part("convertedAudio", clip_part(clip)?);
    }

    Ok(form)
}

fn clip_part(clip: RecordedClip) -> Result<Part, Error> {
    Part::bytes(clip.data)
        .file_name(clip.file_name)
        .mime_str(&clip.mime_type)
        .map_err(Error::from)
}
