use super::RouteStore;
use crate::error::Result;
use crate::models::Route;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory route history, oldest first internally.
///
/// Bounded: once full, saving evicts the oldest route that is not a
/// favorite. Favorites are only dropped when nothing else is left.
pub struct MemoryRouteStore {
    routes: RwLock<Vec<Route>>,
    max_routes: usize,
}

impl MemoryRouteStore {
    pub fn new(max_routes: usize) -> Self {
        MemoryRouteStore {
            routes: RwLock::new(Vec::new()),
            max_routes: max_routes.max(1),
        }
    }
}

#[async_trait]
impl RouteStore for MemoryRouteStore {
    async fn save(&self, route: Route) -> Result<()> {
        let mut routes = self.routes.write().await;

        while routes.len() >= self.max_routes {
            let victim = routes
                .iter()
                .position(|r| !r.is_favorite)
                .unwrap_or(0);
            let evicted = routes.remove(victim);
            tracing::debug!(id = %evicted.id, "Route store full, evicted oldest route");
        }

        tracing::debug!(id = %route.id, "Stored route ({} total)", routes.len() + 1);
        routes.push(route);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Route>> {
        let routes = self.routes.read().await;
        Ok(routes.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Route>> {
        let routes = self.routes.read().await;
        Ok(routes.iter().rev().cloned().collect())
    }

    async fn list_favorites(&self) -> Result<Vec<Route>> {
        let routes = self.routes.read().await;
        Ok(routes.iter().rev().filter(|r| r.is_favorite).cloned().collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut routes = self.routes.write().await;
        let before = routes.len();
        routes.retain(|r| r.id != id);
        Ok(routes.len() != before)
    }

    async fn set_favorite(&self, id: Uuid, name: Option<String>) -> Result<Option<Route>> {
        let mut routes = self.routes.write().await;
        Ok(routes.iter_mut().find(|r| r.id == id).map(|route| {
            route.is_favorite = true;
            if name.is_some() {
                route.name = name;
            }
            route.clone()
        }))
    }

    async fn recent_fingerprints(&self, limit: usize) -> Result<Vec<Vec<String>>> {
        let routes = self.routes.read().await;
        Ok(routes
            .iter()
            .rev()
            .take(limit)
            .map(|r| r.fingerprints.clone())
            .collect())
    }

    async fn count(&self) -> usize {
        self.routes.read().await.len()
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
