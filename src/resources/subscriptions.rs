//! Subscription reads and cancellation
//!
//! Cancellation goes through the payment provider's controller, hence the
//! `stripe` path segment. With `cancel_now == false` the subscription runs
//! until the period end; the cached entry is patched in place to
//! `cancelAtPeriodEnd: true` so the UI reflects it without a refetch.

use serde::Serialize;
use serde_json::Value;

use crate::cache::QueryKey;
use crate::context::Context;
use crate::error::Error;
use crate::models::{Subscription, SubscriptionStatus};
use crate::response::{unwrap_list, unwrap_object};

const RESOURCE: &str = "subscriptions";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelPayload {
    user_id: i64,
    cancel_now: bool,
}

/// Client for `/subscriptions` and `/stripe/subscriptions`
pub struct SubscriptionsClient {
    ctx: Context,
}

impl SubscriptionsClient {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Cache key for the full subscription listing
    pub fn list_key() -> QueryKey {
        QueryKey::list(RESOURCE)
    }

    /// Cache key for one user's subscriptions
    pub fn user_key(user_id: i64) -> QueryKey {
        QueryKey::list(RESOURCE).with_param("userId", user_id)
    }

    /// Cache key for one user's access status
    pub fn status_key(user_id: i64) -> QueryKey {
        QueryKey::view(RESOURCE, "status").with_param("userId", user_id)
    }

    /// List all subscriptions (cached, admin view)
    pub async fn list(&self) -> Result<Vec<Subscription>, Error> {
        let ctx = self.ctx.clone();
        self.ctx
            .cache
            .get_or_fetch(&Self::list_key(), || {
                let ctx = ctx.clone();
                async move {
                    let envelope = ctx.get("/subscriptions/").execute_api().await?;
                    unwrap_list(&envelope, "subscriptions")
                }
            })
            .await
    }

    /// List one user's subscriptions (cached)
    pub async fn for_user(&self, user_id: i64) -> Result<Vec<Subscription>, Error> {
        let ctx = self.ctx.clone();
        self.ctx
            .cache
            .get_or_fetch(&Self::user_key(user_id), || {
                let ctx = ctx.clone();
                async move {
                    let envelope = ctx
                        .get(&format!("/subscriptions/user/{}", user_id))
                        .execute_api()
                        .await?;
                    unwrap_list(&envelope, "subscriptions")
                }
            })
            .await
    }

    /// Read one user's access status (cached)
    pub async fn status(&self, user_id: i64) -> Result<SubscriptionStatus, Error> {
        let ctx = self.ctx.clone();
        self.ctx
            .cache
            .get_or_fetch(&Self::status_key(user_id), || {
                let ctx = ctx.clone();
                async move {
                    let envelope = ctx
                        .get(&format!("/subscriptions/status/{}", user_id))
                        .execute_api()
                        .await?;
                    unwrap_object(&envelope, "status")
                }
            })
            .await
    }

    /// Cancel a subscription.
    ///
    /// `cancel_now == false` schedules cancellation at the period end and
    /// patches cached entries to `cancelAtPeriodEnd: true`; `true` ends the
    /// subscription immediately, so every cached subscription view is
    /// invalidated instead.
    pub async fn cancel(&self, id: i64, user_id: i64, cancel_now: bool) -> Result<(), Error> {
        let payload = CancelPayload {
            user_id,
            cancel_now,
        };
        let ctx = self.ctx.clone();
        let op = async move {
            ctx.patch(&format!("/stripe/subscriptions/cancel/{}", id))
                .json(&payload)?
                .execute_api()
                .await?;
            Ok(())
        };

        let result = self
            .ctx
            .mutations
            .run(op, &[], "Subscription cancelled")
            .await;

        if result.is_ok() {
            if cancel_now {
                self.ctx.cache.invalidate_resource(RESOURCE);
            } else {
                self.mark_cancel_at_period_end(id, user_id);
            }
        }
        result
    }

    /// Flip `cancelAtPeriodEnd` on the cached copies of one subscription
    fn mark_cancel_at_period_end(&self, id: i64, user_id: i64) {
        for key in [Self::list_key(), Self::user_key(user_id)] {
            let Some(snapshot) = self.ctx.cache.read(&key) else {
                continue;
            };
            let mut value = snapshot.value;
            if let Some(rows) = value.as_array_mut() {
                for row in rows {
                    if row.get("id").and_then(Value::as_i64) == Some(id) {
                        row["cancelAtPeriodEnd"] = Value::Bool(true);
                    }
                }
                self.ctx.cache.write_value(&key, value);
            }
        }
    }
}
