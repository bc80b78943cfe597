// Isolate endpoints (children of an OTU)

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Isolate, IsolateFields};

impl ApiClient {
    /// `POST /api/otus/{otu}/isolates`
    pub async fn add_isolate(
        &self,
        otu_id: &str,
        fields: &IsolateFields,
    ) -> Result<Isolate, Error> {
        debug!(otu_id, source_type = %fields.source_type, "adding isolate");
        self.post(&format!("otus/{otu_id}/isolates"), fields).await
    }

    /// `PATCH /api/otus/{otu}/isolates/{isolate}`
    pub async fn edit_isolate(
        &self,
        otu_id: &str,
        isolate_id: &str,
        fields: &IsolateFields,
    ) -> Result<Isolate, Error> {
        debug!(otu_id, isolate_id, "editing isolate");
        self.patch(&format!("otus/{otu_id}/isolates/{isolate_id}"), fields)
            .await
    }

    /// `PUT /api/otus/{otu}/isolates/{isolate}/default`
    pub async fn set_isolate_as_default(
        &self,
        otu_id: &str,
        isolate_id: &str,
    ) -> Result<Isolate, Error> {
        debug!(otu_id, isolate_id, "setting default isolate");
        self.put_empty(&format!("otus/{otu_id}/isolates/{isolate_id}/default"))
            .await
    }

    /// `DELETE /api/otus/{otu}/isolates/{isolate}`
    pub async fn remove_isolate(&self, otu_id: &str, isolate_id: &str) -> Result<(), Error> {
        debug!(otu_id, isolate_id, "removing isolate");
        self.delete(&format!("otus/{otu_id}/isolates/{isolate_id}"))
            .await
    }
}
