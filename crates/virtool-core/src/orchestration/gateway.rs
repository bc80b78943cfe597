// ── Gateway ──
//
// The seam between orchestration and the network. `ApiGateway` routes
// each request to one `ApiClient` method; tests substitute a fake.

use std::future::Future;

use virtool_api::ApiClient;

use crate::action::{Request, Response};
use crate::error::CoreError;

/// Performs the network call for one request.
pub trait Gateway: Send + Sync + 'static {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response, CoreError>> + Send;
}

/// Gateway backed by the Virtool REST client.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: ApiClient,
}

impl ApiGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl Gateway for ApiGateway {
    async fn execute(&self, request: Request) -> Result<Response, CoreError> {
        route_request(&self.client, request).await
    }
}

/// Route a request to the matching API call.
#[allow(clippy::too_many_lines)]
async fn route_request(client: &ApiClient, request: Request) -> Result<Response, CoreError> {
    let removed = request
        .removed_id()
        .map(|id| Response::Removed { id: id.to_owned() });

    let response = match request {
        // ── References ───────────────────────────────────────────────
        Request::ListReferences(query) => Response::References(
            client
                .list_references(query.find.as_deref(), query.page)
                .await?,
        ),
        Request::GetReference { ref_id } => {
            Response::Reference(client.get_reference(&ref_id).await?)
        }
        Request::CreateReference(body) => {
            Response::Reference(client.create_reference(&body).await?)
        }
        Request::ImportReference {
            name,
            description,
            import_from,
        } => Response::Reference(
            client
                .import_reference(&name, &description, &import_from)
                .await?,
        ),
        Request::RemoveReference { ref_id } => {
            client.remove_reference(&ref_id).await?;
            return Ok(removed.unwrap_or(Response::Accepted));
        }

        // ── OTUs ─────────────────────────────────────────────────────
        Request::FindOtus { ref_id, query } => Response::Otus(
            client
                .find_otus(&ref_id, query.find.as_deref(), query.page)
                .await?,
        ),
        Request::ListOtuNames { ref_id } => {
            Response::OtuNames(client.list_otu_names(&ref_id).await?)
        }
        Request::GetOtu { otu_id } => Response::Otu(client.get_otu(&otu_id).await?),
        Request::GetOtuHistory { ref_id, otu_id } => {
            Response::OtuHistory(client.get_otu_history(&ref_id, &otu_id).await?)
        }
        Request::GetGenbank { accession } => {
            Response::Genbank(client.get_genbank(&accession).await?)
        }
        Request::CreateOtu { ref_id, otu } => {
            Response::Otu(client.create_otu(&ref_id, &otu).await?)
        }
        Request::EditOtu { otu_id, changes } => {
            Response::Otu(client.edit_otu(&otu_id, &changes).await?)
        }
        Request::RemoveOtu { otu_id, .. } => {
            client.remove_otu(&otu_id).await?;
            return Ok(removed.unwrap_or(Response::Accepted));
        }
        Request::RevertOtu {
            ref_id,
            otu_id,
            version,
        } => {
            client.revert_otu(&ref_id, &otu_id, version).await?;
            Response::Accepted
        }

        // ── Isolates ─────────────────────────────────────────────────
        Request::AddIsolate { otu_id, isolate } => {
            Response::Isolate(client.add_isolate(&otu_id, &isolate).await?)
        }
        Request::EditIsolate {
            otu_id,
            isolate_id,
            isolate,
        } => Response::Isolate(client.edit_isolate(&otu_id, &isolate_id, &isolate).await?),
        Request::SetIsolateAsDefault { otu_id, isolate_id } => Response::Isolate(
            client
                .set_isolate_as_default(&otu_id, &isolate_id)
                .await?,
        ),
        Request::RemoveIsolate { otu_id, isolate_id } => {
            client.remove_isolate(&otu_id, &isolate_id).await?;
            return Ok(removed.unwrap_or(Response::Accepted));
        }

        // ── Sequences ────────────────────────────────────────────────
        Request::AddSequence {
            otu_id,
            isolate_id,
            sequence,
        } => Response::Sequence(client.add_sequence(&otu_id, &isolate_id, &sequence).await?),
        Request::EditSequence {
            otu_id,
            isolate_id,
            sequence_id,
            sequence,
        } => Response::Sequence(
            client
                .edit_sequence(&otu_id, &isolate_id, &sequence_id, &sequence)
                .await?,
        ),
        Request::RemoveSequence {
            otu_id,
            isolate_id,
            sequence_id,
        } => {
            client
                .remove_sequence(&otu_id, &isolate_id, &sequence_id)
                .await?;
            return Ok(removed.unwrap_or(Response::Accepted));
        }

        // ── Groups ───────────────────────────────────────────────────
        Request::ListGroups => Response::Groups(client.list_groups().await?),
        Request::CreateGroup { group_id } => Response::Group(client.create_group(&group_id).await?),
        Request::SetGroupPermission {
            group_id,
            permission,
            value,
        } => Response::Group(
            client
                .set_group_permission(&group_id, &permission, value)
                .await?,
        ),
        Request::RemoveGroup { group_id } => {
            client.remove_group(&group_id).await?;
            return Ok(removed.unwrap_or(Response::Accepted));
        }

        // ── Samples ──────────────────────────────────────────────────
        Request::FindSamples(query) => Response::Samples(
            client
                .find_samples(query.find.as_deref(), query.page)
                .await?,
        ),
        Request::GetSample { sample_id } => Response::Sample(client.get_sample(&sample_id).await?),
        Request::CreateSample(body) => Response::Sample(client.create_sample(&body).await?),
        Request::EditSample { sample_id, changes } => {
            Response::Sample(client.edit_sample(&sample_id, &changes).await?)
        }
        Request::RemoveSample { sample_id } => {
            client.remove_sample(&sample_id).await?;
            return Ok(removed.unwrap_or(Response::Accepted));
        }

        // ── Analyses ─────────────────────────────────────────────────
        Request::FindAnalyses { sample_id, page } => {
            Response::Analyses(client.find_analyses(&sample_id, page).await?)
        }
        Request::GetAnalysis { analysis_id } => {
            Response::Analysis(client.get_analysis(&analysis_id).await?)
        }
        Request::Analyze {
            sample_id,
            algorithm,
            ref_id,
        } => Response::Analysis(client.analyze(&sample_id, &algorithm, &ref_id).await?),
        Request::RemoveAnalysis { analysis_id } => {
            client.remove_analysis(&analysis_id).await?;
            return Ok(removed.unwrap_or(Response::Accepted));
        }

        // ── Jobs ─────────────────────────────────────────────────────
        Request::FindJobs(query) => {
            Response::Jobs(client.find_jobs(query.find.as_deref(), query.page).await?)
        }
        Request::GetJob { job_id } => Response::Job(client.get_job(&job_id).await?),
        Request::CancelJob { job_id } => Response::Job(client.cancel_job(&job_id).await?),
        Request::RemoveJob { job_id } => {
            client.remove_job(&job_id).await?;
            return Ok(removed.unwrap_or(Response::Accepted));
        }
        Request::ClearJobs { filter } => {
            Response::JobsCleared(client.clear_jobs(filter.as_deref()).await?.removed)
        }

        // ── HMMs ─────────────────────────────────────────────────────
        Request::FindHmms(query) => {
            Response::Hmms(client.find_hmms(query.find.as_deref(), query.page).await?)
        }
        Request::GetHmm { hmm_id } => Response::Hmm(client.get_hmm(&hmm_id).await?),
        Request::InstallHmms => Response::HmmInstall(client.install_hmms().await?),

        // ── Settings ─────────────────────────────────────────────────
        Request::GetSettings => Response::Settings(client.get_settings().await?),
        Request::UpdateSettings(changes) => {
            Response::Settings(client.update_settings(&changes).await?)
        }
    };

    Ok(response)
}
