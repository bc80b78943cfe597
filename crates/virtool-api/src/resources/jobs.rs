// Job endpoints

use tracing::debug;

use super::find_params;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ClearedJobs, Job, Page};

impl ApiClient {
    /// `GET /api/jobs?find=&page=`
    pub async fn find_jobs(&self, find: Option<&str>, page: u32) -> Result<Page<Job>, Error> {
        debug!(?find, page, "finding jobs");
        self.get_with_params("jobs", &find_params(find, page)).await
    }

    /// `GET /api/jobs/{id}`
    pub async fn get_job(&self, job_id: &str) -> Result<Job, Error> {
        self.get(&format!("jobs/{job_id}")).await
    }

    /// `POST /api/jobs/{id}/cancel`
    pub async fn cancel_job(&self, job_id: &str) -> Result<Job, Error> {
        debug!(job_id, "cancelling job");
        self.post_empty(&format!("jobs/{job_id}/cancel")).await
    }

    /// `DELETE /api/jobs/{id}`
    pub async fn remove_job(&self, job_id: &str) -> Result<(), Error> {
        debug!(job_id, "removing job");
        self.delete(&format!("jobs/{job_id}")).await
    }

    /// Remove finished jobs in bulk.
    ///
    /// `filter` is one of `complete`, `failed` or `finished`; `None` clears
    /// every job the server considers removable.
    ///
    /// `DELETE /api/jobs?filter=`
    pub async fn clear_jobs(&self, filter: Option<&str>) -> Result<ClearedJobs, Error> {
        debug!(?filter, "clearing jobs");
        let params: Vec<(&str, String)> = filter
            .map(|f| vec![("filter", f.to_owned())])
            .unwrap_or_default();
        self.delete_with_params("jobs", &params).await
    }
}
