/// HTTP endpoint paths for the owner registry.
pub mod endpoints {
    pub const OWNERS: &str = "/api/owners";
    pub const OWNER: &str = "/api/owners/:id";
    pub const HEALTH: &str = "/api/health";
}

/// Path of a single owner resource.
pub fn owner_path(id: impl std::fmt::Display) -> String {
    format!("{}/{id}", endpoints::OWNERS)
}

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}
