use async_trait::async_trait;

use reelhouse_core::{CustomerId, StoreResult};

use crate::Customer;

/// Storage port for customers.
///
/// Handlers and processors receive this behind `Arc<dyn CustomerStore>`;
/// implementations live in `reelhouse-infra`.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Insert a new customer. Fails with `Conflict` if the id already exists.
    async fn insert(&self, customer: Customer) -> StoreResult<()>;

    /// Fetch a customer by id.
    async fn get(&self, id: CustomerId) -> StoreResult<Option<Customer>>;

    /// All customers, unordered.
    async fn list(&self) -> StoreResult<Vec<Customer>>;
}
