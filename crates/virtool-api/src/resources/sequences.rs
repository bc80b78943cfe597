// Sequence endpoints (children of an isolate)

use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Sequence, SequenceFields};

impl ApiClient {
    /// `POST /api/otus/{otu}/isolates/{isolate}/sequences`
    ///
    /// The accession becomes the sequence id.
    pub async fn add_sequence(
        &self,
        otu_id: &str,
        isolate_id: &str,
        fields: &SequenceFields,
    ) -> Result<Sequence, Error> {
        debug!(otu_id, isolate_id, accession = %fields.accession, "adding sequence");
        let body = json!({
            "id": fields.accession,
            "definition": fields.definition,
            "host": fields.host,
            "sequence": fields.sequence,
            "segment": fields.segment,
        });
        self.post(
            &format!("otus/{otu_id}/isolates/{isolate_id}/sequences"),
            &body,
        )
        .await
    }

    /// `PATCH /api/otus/{otu}/isolates/{isolate}/sequences/{sequence}`
    ///
    /// The accession cannot change, so it is not sent.
    pub async fn edit_sequence(
        &self,
        otu_id: &str,
        isolate_id: &str,
        sequence_id: &str,
        fields: &SequenceFields,
    ) -> Result<Sequence, Error> {
        debug!(otu_id, isolate_id, sequence_id, "editing sequence");
        let body = json!({
            "definition": fields.definition,
            "host": fields.host,
            "sequence": fields.sequence,
            "segment": fields.segment,
        });
        self.patch(
            &format!("otus/{otu_id}/isolates/{isolate_id}/sequences/{sequence_id}"),
            &body,
        )
        .await
    }

    /// `DELETE /api/otus/{otu}/isolates/{isolate}/sequences/{sequence}`
    pub async fn remove_sequence(
        &self,
        otu_id: &str,
        isolate_id: &str,
        sequence_id: &str,
    ) -> Result<(), Error> {
        debug!(otu_id, isolate_id, sequence_id, "removing sequence");
        self.delete(&format!(
            "otus/{otu_id}/isolates/{isolate_id}/sequences/{sequence_id}"
        ))
        .await
    }
}
