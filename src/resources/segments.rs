//! Segment administration
//!
//! Segment create/update travels as multipart: text fields plus up to two
//! audio parts (the recorded original and the suggested answer).

use reqwest::multipart::{Form, Part};
use std::collections::HashMap;

use crate::cache::QueryKey;
use crate::context::Context;
use crate::error::Error;
use crate::media::RecordedClip;
use crate::models::{Segment, SegmentDraft};
use crate::response::{unwrap_list, unwrap_object};

const RESOURCE: &str = "segments";

/// Client for `/admin/segments`
pub struct SegmentsClient {
    ctx: Context,
}

impl SegmentsClient {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Cache key for the segment listing of one dialogue
    pub fn list_key(dialogue_id: i64) -> QueryKey {
        QueryKey::list(RESOURCE).with_param("dialogueId", dialogue_id)
    }

    /// List the segments of a dialogue (cached)
    pub async fn list(&self, dialogue_id: i64) -> Result<Vec<Segment>, Error> {
        let ctx = self.ctx.clone();
        self.ctx
            .cache
            .get_or_fetch(&Self::list_key(dialogue_id), || {
                let ctx = ctx.clone();
                async move {
                    let mut params = HashMap::new();
                    params.insert("dialogueId".to_string(), dialogue_id.to_string());
                    let envelope = ctx
                        .get("/admin/segments")
                        .query(params)
                        .execute_api()
                        .await?;
                    unwrap_list(&envelope, "segments")
                }
            })
            .await
    }

    /// Create a segment, optionally attaching recorded audio
    pub async fn create(
        &self,
        draft: SegmentDraft,
        audio: Option<RecordedClip>,
        suggested_audio: Option<RecordedClip>,
    ) -> Result<Segment, Error> {
        let dialogue_id = draft.dialogue_id;
        let form = build_form(&draft, audio, suggested_audio)?;

        let ctx = self.ctx.clone();
        let op = async move {
            let envelope = ctx
                .post("/admin/segments")
                .multipart(form)
                .execute_api()
                .await?;
            unwrap_object(&envelope, "segment")
        };
        self.ctx
            .mutations
            .run(op, &[Self::list_key(dialogue_id)], "Segment created")
            .await
    }

    /// Update a segment; audio parts are only replaced when provided
    pub async fn update(
        &self,
        id: i64,
        draft: SegmentDraft,
        audio: Option<RecordedClip>,
        suggested_audio: Option<RecordedClip>,
    ) -> Result<Segment, Error> {
        let dialogue_id = draft.dialogue_id;
        let form = build_form(&draft, audio, suggested_audio)?;

        let ctx = self.ctx.clone();
        let op = async move {
            let envelope = ctx
                .put(&format!("/admin/segments/{}", id))
                .multipart(form)
                .execute_api()
                .await?;
            unwrap_object(&envelope, "segment")
        };
        self.ctx
            .mutations
            .run(op, &[Self::list_key(dialogue_id)], "Segment updated")
            .await
    }

    /// Delete a segment from its dialogue
    pub async fn delete(&self, id: i64, dialogue_id: i64) -> Result<(), Error> {
        let ctx = self.ctx.clone();
        let op = async move {
            ctx.delete(&format!("/admin/segments/{}", id))
                .execute_api()
                .await?;
            Ok(())
        };
        self.ctx
            .mutations
            .run(op, &[Self::list_key(dialogue_id)], "Segment deleted")
            .await
    }
}

fn build_form(
    draft: &SegmentDraft,
    audio: Option<RecordedClip>,
    suggested_audio: Option<RecordedClip>,
) -> Result<Form, Error> {
    let mut form = Form::new()
        .text("dialogueId", draft.dialogue_id.to_string())
        .text("textContent", draft.text_content.clone())
        .text("segmentOrder", draft.segment_order.to_string());

    if let Some(clip) = audio {
        form = form.part("audio", clip_part(clip)?);
    }
    if let Some(clip) = suggested_audio {
        form = form.part("suggestedAudio", clip_part(clip)?);
    }

    Ok(form)
}

fn clip_part(clip: RecordedClip) -> Result<Part, Error> {
    Part::bytes(clip.data)
        .file_name(clip.file_name)
        .mime_str(&clip.mime_type)
        .map_err(Error::from)
}
