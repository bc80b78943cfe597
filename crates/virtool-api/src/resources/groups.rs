// Group endpoints

use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::Group;

impl ApiClient {
    /// `GET /api/groups`
    pub async fn list_groups(&self) -> Result<Vec<Group>, Error> {
        self.get("groups").await
    }

    /// `POST /api/groups` with `{"group_id": "..."}`
    pub async fn create_group(&self, group_id: &str) -> Result<Group, Error> {
        debug!(group_id, "creating group");
        self.post("groups", &json!({ "group_id": group_id })).await
    }

    /// Toggle a single permission.
    ///
    /// `PATCH /api/groups/{id}` with `{"permissions": {"<name>": bool}}`
    pub async fn set_group_permission(
        &self,
        group_id: &str,
        permission: &str,
        value: bool,
    ) -> Result<Group, Error> {
        debug!(group_id, permission, value, "setting group permission");
        self.patch(
            &format!("groups/{group_id}"),
            &json!({ "permissions": { permission: value } }),
        )
        .await
    }

    /// `DELETE /api/groups/{id}`
    pub async fn remove_group(&self, group_id: &str) -> Result<(), Error> {
        debug!(group_id, "removing group");
        self.delete(&format!("groups/{group_id}")).await
    }
}
