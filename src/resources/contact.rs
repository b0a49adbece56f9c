//! Contact message listing and deletion
//!
//! The listing is server-paginated: page number and search text are part of
//! the cache key, so each page/search combination is an independent cached
//! entry. Deletion is the one optimistic path in the client: the row is
//! removed from the cached page (and the total decremented) before the
//! request resolves, and the page is restored verbatim if it fails.

use serde_json::Value;
use std::collections::HashMap;

use crate::cache::QueryKey;
use crate::context::Context;
use crate::error::Error;
use crate::models::{ContactMessage, ContactPage};
use crate::response::{unwrap_list, unwrap_object, ApiEnvelope};

const RESOURCE: &str = "messages";

/// Client for `/contact`
pub struct ContactClient {
    ctx: Context,
}

impl ContactClient {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Cache key for one page of the listing, under one search filter
    pub fn page_key(page: u32, search: Option<&str>) -> QueryKey {
        let key = QueryKey::list(RESOURCE).with_param("page", page);
        match search {
            Some(text) if !text.trim().is_empty() => key.with_param("search", text.trim()),
            _ => key,
        }
    }

    /// Fetch one page of contact messages (cached per page + search)
    pub async fn page(&self, page: u32, search: Option<&str>) -> Result<ContactPage, Error> {
        let search_owned = search.map(str::to_string);
        let ctx = self.ctx.clone();
        self.ctx
            .cache
            .get_or_fetch(&Self::page_key(page, search), || {
                let ctx = ctx.clone();
                let search = search_owned.clone();
                async move {
                    let mut params = HashMap::new();
                    params.insert("page".to_string(), page.to_string());
                    if let Some(text) = &search {
                        if !text.trim().is_empty() {
                            params.insert("search".to_string(), text.trim().to_string());
                        }
                    }
                    let envelope = ctx.get("/contact").query(params).execute_api().await?;
                    normalize_page(&envelope)
                }
            })
            .await
    }

    /// Read one contact message
    pub async fn get(&self, id: i64) -> Result<ContactMessage, Error> {
        let ctx = self.ctx.clone();
        self.ctx
            .cache
            .get_or_fetch(&QueryKey::detail(RESOURCE, id), || {
                let ctx = ctx.clone();
                async move {
                    let envelope = ctx.get(&format!("/contact/{}", id)).execute_api().await?;
                    unwrap_object(&envelope, "message")
                }
            })
            .await
    }

    /// Delete a message from the page the caller is looking at, optimistically
    pub async fn delete(&self, id: i64, page: u32, search: Option<&str>) -> Result<(), Error> {
        let key = Self::page_key(page, search);
        let ctx = self.ctx.clone();
        let op = async move {
            ctx.delete(&format!("/contact/{}", id))
                .execute_api()
                .await?;
            Ok(())
        };

        self.ctx
            .mutations
            .run_optimistic(
                &key,
                |value| remove_from_page(value, id),
                op,
                "Message deleted",
            )
            .await
    }
}

/// Normalize the paginated listing into the one cached shape
fn normalize_page(envelope: &ApiEnvelope) -> Result<ContactPage, Error> {
    let messages: Vec<ContactMessage> = unwrap_list(envelope, "messages")?;
    let total = envelope
        .data
        .as_ref()
        .and_then(|data| {
            data.get("total")
                .or_else(|| data.get("totalMessages"))
                .and_then(Value::as_i64)
        })
        .unwrap_or(messages.len() as i64);
    Ok(ContactPage { messages, total })
}

/// Speculative patch: drop the row and decrement the count field
fn remove_from_page(value: &mut Value, id: i64) {
    if let Some(messages) = value.get_mut("messages").and_then(Value::as_array_mut) {
        messages.retain(|msg| msg.get("id").and_then(Value::as_i64) != Some(id));
    }
    if let Some(total) = value.get("total").and_then(Value::as_i64) {
        value["total"] = Value::from((total - 1).max(0));
    }
}
