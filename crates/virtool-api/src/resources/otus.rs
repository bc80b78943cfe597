// OTU endpoints
//
// OTUs are listed under their reference but addressed directly by id once
// known. History and revert are reference-scoped.

use tracing::debug;

use super::find_params;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{GenbankRecord, HistoryChange, Otu, OtuCreate, OtuName, OtuUpdate, Page};

impl ApiClient {
    /// `GET /api/refs/{ref}/otus?find=&page=`
    pub async fn find_otus(
        &self,
        ref_id: &str,
        find: Option<&str>,
        page: u32,
    ) -> Result<Page<Otu>, Error> {
        debug!(ref_id, ?find, page, "finding otus");
        self.get_with_params(&format!("refs/{ref_id}/otus"), &find_params(find, page))
            .await
    }

    /// Id/name pairs for every OTU in a reference.
    ///
    /// `GET /api/refs/{ref}/otus?names=true`
    pub async fn list_otu_names(&self, ref_id: &str) -> Result<Vec<OtuName>, Error> {
        self.get_with_params(
            &format!("refs/{ref_id}/otus"),
            &[("names", "true".to_owned())],
        )
        .await
    }

    /// `GET /api/otus/{id}`
    pub async fn get_otu(&self, otu_id: &str) -> Result<Otu, Error> {
        self.get(&format!("otus/{otu_id}")).await
    }

    /// `GET /api/refs/{ref}/otus/{otu}/history`
    pub async fn get_otu_history(
        &self,
        ref_id: &str,
        otu_id: &str,
    ) -> Result<Vec<HistoryChange>, Error> {
        self.get(&format!("refs/{ref_id}/otus/{otu_id}/history"))
            .await
    }

    /// `GET /api/genbank/{accession}`
    pub async fn get_genbank(&self, accession: &str) -> Result<GenbankRecord, Error> {
        debug!(accession, "looking up genbank accession");
        self.get(&format!("genbank/{accession}")).await
    }

    /// `POST /api/refs/{ref}/otus`
    pub async fn create_otu(&self, ref_id: &str, body: &OtuCreate) -> Result<Otu, Error> {
        debug!(ref_id, name = %body.name, "creating otu");
        self.post(&format!("refs/{ref_id}/otus"), body).await
    }

    /// `PATCH /api/otus/{id}`
    pub async fn edit_otu(&self, otu_id: &str, body: &OtuUpdate) -> Result<Otu, Error> {
        debug!(otu_id, "editing otu");
        self.patch(&format!("otus/{otu_id}"), body).await
    }

    /// `DELETE /api/otus/{id}`
    pub async fn remove_otu(&self, otu_id: &str) -> Result<(), Error> {
        debug!(otu_id, "removing otu");
        self.delete(&format!("otus/{otu_id}")).await
    }

    /// Roll an OTU back to the state before `version`.
    ///
    /// `DELETE /api/refs/{ref}/history/{otu}.{version}`
    pub async fn revert_otu(&self, ref_id: &str, otu_id: &str, version: u32) -> Result<(), Error> {
        debug!(ref_id, otu_id, version, "reverting otu");
        self.delete(&format!("refs/{ref_id}/history/{otu_id}.{version}"))
            .await
    }
}
