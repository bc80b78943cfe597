// ── Action vocabulary ──
//
// Every change to the store is an `Action`. User code dispatches
// `Requested`; the orchestration layer answers with exactly one of
// `Succeeded`, `Failed` or `Discarded` for the same `OperationId`.

pub mod requests;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};

use crate::error::ErrorRecord;
use crate::model::{
    Analysis, GenbankRecord, Group, HistoryChange, Hmm, HmmPage, Isolate, Job, Otu, OtuName,
    Page, Reference, Sample, Sequence, Settings,
};

pub use requests::Request;

// ── Identity ─────────────────────────────────────────────────────────

/// Id assigned by the store to each REQUESTED dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperationId(pub u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

// ── Intent ───────────────────────────────────────────────────────────

/// A named category of user-initiated operation.
///
/// Canonical names are SCREAMING_SNAKE_CASE (`CREATE_GROUP`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    // References
    ListReferences,
    GetReference,
    CreateReference,
    ImportReference,
    RemoveReference,
    // OTUs
    FindOtus,
    ListOtuNames,
    GetOtu,
    GetOtuHistory,
    GetGenbank,
    CreateOtu,
    EditOtu,
    RemoveOtu,
    RevertOtu,
    // Isolates
    AddIsolate,
    EditIsolate,
    SetIsolateAsDefault,
    RemoveIsolate,
    // Sequences
    AddSequence,
    EditSequence,
    RemoveSequence,
    // Groups
    ListGroups,
    CreateGroup,
    SetGroupPermission,
    RemoveGroup,
    // Samples
    FindSamples,
    GetSample,
    CreateSample,
    EditSample,
    RemoveSample,
    // Analyses
    FindAnalyses,
    GetAnalysis,
    Analyze,
    RemoveAnalysis,
    // Jobs
    FindJobs,
    GetJob,
    CancelJob,
    RemoveJob,
    ClearJobs,
    // HMMs
    FindHmms,
    GetHmm,
    InstallHmms,
    // Settings
    GetSettings,
    UpdateSettings,
}

impl Intent {
    /// Store key under which a failure of this intent is recorded.
    pub fn error_key(self) -> String {
        format!("{}_ERROR", self.as_ref())
    }
}

/// Lifecycle phase of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Requested,
    Succeeded,
    Failed,
}

/// Why the orchestration layer dropped a request without calling the API
/// or without honouring its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiscardReason {
    Throttled,
    Superseded,
}

// ── Navigation ───────────────────────────────────────────────────────

/// Dialogs the presentation layer can show.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Modal {
    CreateReference,
    ImportReference,
    CreateOtu,
    EditOtu,
    AddIsolate,
    AddSequence,
    CreateGroup,
    CreateSample,
    CreateAnalysis,
}

/// Router side effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Navigation {
    /// Go to a path. Open modals are closed.
    Push(String),
    OpenModal(Modal),
    CloseModal(Modal),
}

// ── Response ─────────────────────────────────────────────────────────

/// Server payload carried by a SUCCEEDED action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    References(Page<Reference>),
    Reference(Reference),
    Otus(Page<Otu>),
    OtuNames(Vec<OtuName>),
    Otu(Otu),
    OtuHistory(Vec<HistoryChange>),
    Genbank(GenbankRecord),
    Isolate(Isolate),
    Sequence(Sequence),
    Groups(Vec<Group>),
    Group(Group),
    Samples(Page<Sample>),
    Sample(Sample),
    Analyses(Page<Analysis>),
    Analysis(Analysis),
    Jobs(Page<Job>),
    Job(Job),
    JobsCleared(Vec<String>),
    Hmms(HmmPage),
    Hmm(Hmm),
    HmmInstall(Value),
    Settings(Settings),
    /// A removal; `id` is the removed document.
    Removed { id: String },
    /// The server accepted a request that returns no document.
    Accepted,
}

// ── Action ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Requested {
        op: OperationId,
        request: Request,
    },
    Succeeded {
        op: OperationId,
        intent: Intent,
        response: Response,
    },
    Failed {
        op: OperationId,
        intent: Intent,
        error: ErrorRecord,
    },
    /// A policy dropped the request or threw away its result.
    Discarded {
        op: OperationId,
        intent: Intent,
        reason: DiscardReason,
    },
    PendingChanged {
        op: OperationId,
        intent: Intent,
        pending: bool,
    },
    /// Client-side validation failed; nothing was requested.
    Rejected {
        intent: Intent,
        error: ErrorRecord,
    },
    Navigate(Navigation),
}

impl Action {
    pub fn op(&self) -> Option<OperationId> {
        match self {
            Self::Requested { op, .. }
            | Self::Succeeded { op, .. }
            | Self::Failed { op, .. }
            | Self::Discarded { op, .. }
            | Self::PendingChanged { op, .. } => Some(*op),
            Self::Rejected { .. } | Self::Navigate(_) => None,
        }
    }

    pub fn intent(&self) -> Option<Intent> {
        match self {
            Self::Requested { request, .. } => Some(request.intent()),
            Self::Succeeded { intent, .. }
            | Self::Failed { intent, .. }
            | Self::Discarded { intent, .. }
            | Self::PendingChanged { intent, .. }
            | Self::Rejected { intent, .. } => Some(*intent),
            Self::Navigate(_) => None,
        }
    }

    /// Lifecycle phase, for the three lifecycle variants only.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Requested { .. } => Some(Phase::Requested),
            Self::Succeeded { .. } => Some(Phase::Succeeded),
            Self::Failed { .. } => Some(Phase::Failed),
            _ => None,
        }
    }

    /// Whether this action ends the operation it belongs to.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded { .. } | Self::Failed { .. } | Self::Discarded { .. }
        )
    }

    /// `LIST_GROUPS_REQUESTED`-style label for logs.
    pub fn label(&self) -> String {
        match (self.intent(), self.phase()) {
            (Some(intent), Some(phase)) => format!("{intent}_{phase}"),
            (Some(intent), None) => match self {
                Self::Discarded { .. } => format!("{intent}_DISCARDED"),
                Self::PendingChanged { .. } => format!("{intent}_PENDING"),
                _ => format!("{intent}_REJECTED"),
            },
            (None, _) => "NAVIGATE".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_names_are_screaming_snake() {
        assert_eq!(Intent::CreateGroup.as_ref(), "CREATE_GROUP");
        assert_eq!(Intent::GetOtuHistory.to_string(), "GET_OTU_HISTORY");
        assert_eq!(Intent::CreateGroup.error_key(), "CREATE_GROUP_ERROR");
    }

    #[test]
    fn action_labels() {
        let action = Action::Discarded {
            op: OperationId(1),
            intent: Intent::CreateOtu,
            reason: DiscardReason::Throttled,
        };
        assert_eq!(action.label(), "CREATE_OTU_DISCARDED");
        assert!(action.is_terminal());
        assert_eq!(action.phase(), None);

        let failed = Action::Failed {
            op: OperationId(2),
            intent: Intent::RemoveOtu,
            error: ErrorRecord {
                message: "Not found".into(),
                status: Some(404),
                code: None,
            },
        };
        assert_eq!(failed.label(), "REMOVE_OTU_FAILED");
    }
}
