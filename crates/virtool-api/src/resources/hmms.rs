// HMM endpoints
//
// The HMM profile set is installed once per server from an official
// release. Progress is reported through the `status` document that
// accompanies every HMM page.

use serde_json::Value;
use tracing::debug;

use super::find_params;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Hmm, HmmPage};

impl ApiClient {
    /// `GET /api/hmms?find=&page=`
    pub async fn find_hmms(&self, find: Option<&str>, page: u32) -> Result<HmmPage, Error> {
        debug!(?find, page, "finding hmms");
        self.get_with_params("hmms", &find_params(find, page)).await
    }

    /// `GET /api/hmms/{id}`
    pub async fn get_hmm(&self, hmm_id: &str) -> Result<Hmm, Error> {
        self.get(&format!("hmms/{hmm_id}")).await
    }

    /// Start installing the latest HMM release.
    ///
    /// `POST /api/hmms/status/updates`
    pub async fn install_hmms(&self) -> Result<Value, Error> {
        debug!("installing hmms");
        self.post_empty("hmms/status/updates").await
    }
}
