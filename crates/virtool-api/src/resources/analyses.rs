// Analysis endpoints
//
// Analyses are listed and started per sample but fetched and removed by
// their own id.

use serde_json::json;
use tracing::debug;

use super::find_params;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Analysis, Page};

impl ApiClient {
    /// `GET /api/samples/{id}/analyses?page=`
    pub async fn find_analyses(&self, sample_id: &str, page: u32) -> Result<Page<Analysis>, Error> {
        debug!(sample_id, page, "finding analyses");
        self.get_with_params(
            &format!("samples/{sample_id}/analyses"),
            &find_params(None, page),
        )
        .await
    }

    /// `GET /api/analyses/{id}`
    pub async fn get_analysis(&self, analysis_id: &str) -> Result<Analysis, Error> {
        self.get(&format!("analyses/{analysis_id}")).await
    }

    /// Start an analysis of a sample against a reference.
    ///
    /// `POST /api/samples/{id}/analyses` with `{"algorithm", "ref_id"}`
    pub async fn analyze(
        &self,
        sample_id: &str,
        algorithm: &str,
        ref_id: &str,
    ) -> Result<Analysis, Error> {
        debug!(sample_id, algorithm, ref_id, "starting analysis");
        self.post(
            &format!("samples/{sample_id}/analyses"),
            &json!({ "algorithm": algorithm, "ref_id": ref_id }),
        )
        .await
    }

    /// `DELETE /api/analyses/{id}`
    pub async fn remove_analysis(&self, analysis_id: &str) -> Result<(), Error> {
        debug!(analysis_id, "removing analysis");
        self.delete(&format!("analyses/{analysis_id}")).await
    }
}
