mod memory;

pub use memory::MemoryRouteStore;

use crate::error::Result;
use crate::models::Route;
use async_trait::async_trait;
use uuid::Uuid;

/// Where generated routes go once selected.
/// Listing is most recent first.
#[async_trait]
pub trait RouteStore: Send + Sync {
    async fn save(&self, route: Route) -> Result<()>;

    async fn get(&self, id: Uuid) -> Result<Option<Route>>;

    async fn list(&self) -> Result<Vec<Route>>;

    async fn list_favorites(&self) -> Result<Vec<Route>>;

    /// `true` if a route was removed
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Mark a route as favorite, optionally renaming it. `None` if unknown.
    async fn set_favorite(&self, id: Uuid, name: Option<String>) -> Result<Option<Route>>;

    /// Fingerprint lists of the `limit` most recent routes, most recent first
    async fn recent_fingerprints(&self, limit: usize) -> Result<Vec<Vec<String>>>;

    async fn count(&self) -> usize;

    fn backend_name(&self) -> &'static str;
}
