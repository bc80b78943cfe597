// Reference endpoints
//
// A reference is a curated collection of OTUs. Imports create a reference
// from an uploaded file and return immediately; the server fills it in
// through a background job.

use serde_json::json;
use tracing::debug;

use super::find_params;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Page, Reference, ReferenceCreate};

impl ApiClient {
    /// `GET /api/refs?find=&page=`
    pub async fn list_references(
        &self,
        find: Option<&str>,
        page: u32,
    ) -> Result<Page<Reference>, Error> {
        debug!(?find, page, "listing references");
        self.get_with_params("refs", &find_params(find, page)).await
    }

    /// `GET /api/refs/{id}`
    pub async fn get_reference(&self, ref_id: &str) -> Result<Reference, Error> {
        self.get(&format!("refs/{ref_id}")).await
    }

    /// `POST /api/refs`
    pub async fn create_reference(&self, body: &ReferenceCreate) -> Result<Reference, Error> {
        debug!(name = %body.name, "creating reference");
        self.post("refs", body).await
    }

    /// Create a reference from a previously uploaded export file.
    ///
    /// `POST /api/refs` with `{"name", "description", "import_from"}`
    pub async fn import_reference(
        &self,
        name: &str,
        description: &str,
        import_from: &str,
    ) -> Result<Reference, Error> {
        debug!(name, import_from, "importing reference");
        self.post(
            "refs",
            &json!({
                "name": name,
                "description": description,
                "import_from": import_from,
            }),
        )
        .await
    }

    /// `DELETE /api/refs/{id}`
    pub async fn remove_reference(&self, ref_id: &str) -> Result<(), Error> {
        debug!(ref_id, "removing reference");
        self.delete(&format!("refs/{ref_id}")).await
    }
}
