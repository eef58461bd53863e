use sqlx::SqlitePool;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Shared secret expected in `x-api-key`. `None` leaves the API open.
    pub api_key: Option<String>,
}

impl AppState {
    pub fn new(db: SqlitePool, api_key: Option<String>) -> Self {
        AppState {
            db,
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }
}
