// ── Domain model ──
//
// Server documents are stored exactly as the API returns them, so the
// wire types from `virtool-api` double as the domain types. This module
// adds the identity trait the reducers key on and the pagination cursor.

mod pagination;

pub use pagination::{FindQuery, Pagination};

pub use virtool_api::models::{
    Analysis, ClearedJobs, GenbankRecord, Group, HistoryChange, Hmm, HmmPage, HmmProcess,
    HmmRelease, HmmStatus, Isolate, IsolateFields, Job, Otu, OtuCreate, OtuName, OtuUpdate, Page,
    Reference, ReferenceCreate, ResourceRef, Sample, SampleCreate, SampleUpdate, Sequence,
    SequenceFields, Settings, HMM_INSTALL_STEPS,
};

/// A server-owned record identified by an opaque id.
pub trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

macro_rules! impl_document {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Document for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )+
    };
}

impl_document!(Reference, Otu, Group, Sample, Analysis, Job, Hmm);
