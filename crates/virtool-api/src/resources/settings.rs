// Server settings endpoints

use serde_json::{Map, Value};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::Settings;

impl ApiClient {
    /// `GET /api/settings`
    pub async fn get_settings(&self) -> Result<Settings, Error> {
        self.get("settings").await
    }

    /// `PATCH /api/settings` with only the keys being changed.
    pub async fn update_settings(&self, changes: &Map<String, Value>) -> Result<Settings, Error> {
        debug!(keys = ?changes.keys().collect::<Vec<_>>(), "updating settings");
        self.patch("settings", changes).await
    }
}
