//! Transaction reads and admin amendments

use crate::cache::QueryKey;
use crate::context::Context;
use crate::error::Error;
use crate::models::{Transaction, TransactionUpdate};
use crate::response::{unwrap_list, unwrap_object};

const RESOURCE: &str = "transactions";

/// Client for `/transaction`
pub struct TransactionsClient {
    ctx: Context,
}

impl TransactionsClient {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Cache key for the transaction listing
    pub fn list_key() -> QueryKey {
        QueryKey::list(RESOURCE)
    }

    /// List all transactions (cached)
    pub async fn list(&self) -> Result<Vec<Transaction>, Error> {
        let ctx = self.ctx.clone();
        self.ctx
            .cache
            .get_or_fetch(&Self::list_key(), || {
                let ctx = ctx.clone();
                async move {
                    let envelope = ctx.get("/transaction").execute_api().await?;
                    unwrap_list(&envelope, "transactions")
                }
            })
            .await
    }

    /// Read one transaction (cached)
    pub async fn get(&self, id: i64) -> Result<Transaction, Error> {
        let ctx = self.ctx.clone();
        self.ctx
            .cache
            .get_or_fetch(&QueryKey::detail(RESOURCE, id), || {
                let ctx = ctx.clone();
                async move {
                    let envelope = ctx
                        .get(&format!("/transaction/{}", id))
                        .execute_api()
                        .await?;
                    unwrap_object(&envelope, "transaction")
                }
            })
            .await
    }

    /// Amend a transaction's status or amount
    pub async fn update(&self, id: i64, update: TransactionUpdate) -> Result<Transaction, Error> {
        let ctx = self.ctx.clone();
        let op = async move {
            let envelope = ctx
                .put(&format!("/transaction/{}", id))
                .json(&update)?
                .execute_api()
                .await?;
            unwrap_object(&envelope, "transaction")
        };
        self.ctx
            .mutations
            .run(
                op,
                &[Self::list_key(), QueryKey::detail(RESOURCE, id)],
                "Transaction updated",
            )
            .await
    }

    /// Delete a transaction record
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        let ctx = self.ctx.clone();
        let op = async move {
            ctx.delete(&format!("/transaction/{}", id))
                .execute_api()
                .await?;
            Ok(())
        };
        let result = self.ctx.mutations.run(op, &[], "Transaction deleted").await;
        if result.is_ok() {
            self.ctx.cache.invalidate_resource(RESOURCE);
        }
        result
    }
}
