// Sample endpoints

use tracing::debug;

use super::find_params;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Page, Sample, SampleCreate, SampleUpdate};

impl ApiClient {
    /// `GET /api/samples?find=&page=`
    pub async fn find_samples(&self, find: Option<&str>, page: u32) -> Result<Page<Sample>, Error> {
        debug!(?find, page, "finding samples");
        self.get_with_params("samples", &find_params(find, page))
            .await
    }

    /// `GET /api/samples/{id}`
    pub async fn get_sample(&self, sample_id: &str) -> Result<Sample, Error> {
        self.get(&format!("samples/{sample_id}")).await
    }

    /// `POST /api/samples`
    pub async fn create_sample(&self, body: &SampleCreate) -> Result<Sample, Error> {
        debug!(name = %body.name, "creating sample");
        self.post("samples", body).await
    }

    /// `PATCH /api/samples/{id}`
    pub async fn edit_sample(&self, sample_id: &str, body: &SampleUpdate) -> Result<Sample, Error> {
        debug!(sample_id, "editing sample");
        self.patch(&format!("samples/{sample_id}"), body).await
    }

    /// `DELETE /api/samples/{id}`
    pub async fn remove_sample(&self, sample_id: &str) -> Result<(), Error> {
        debug!(sample_id, "removing sample");
        self.delete(&format!("samples/{sample_id}")).await
    }
}
