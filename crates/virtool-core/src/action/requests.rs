// ── Request payloads ──
//
// One variant per intent. Validation mirrors the checks the presentation
// layer performs before anything is sent; the server remains the final
// authority.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Intent;
use crate::error::CoreError;
use crate::model::{
    FindQuery, IsolateFields, OtuCreate, OtuUpdate, ReferenceCreate, SampleCreate, SampleUpdate,
    SequenceFields,
};

/// The group whose permissions are fixed by the server.
pub const ADMINISTRATOR_GROUP: &str = "administrator";

/// Parameters of a REQUESTED action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    // ── References ───────────────────────────────────────────────────
    ListReferences(FindQuery),
    GetReference {
        ref_id: String,
    },
    CreateReference(ReferenceCreate),
    ImportReference {
        name: String,
        description: String,
        import_from: String,
    },
    RemoveReference {
        ref_id: String,
    },

    // ── OTUs ─────────────────────────────────────────────────────────
    FindOtus {
        ref_id: String,
        query: FindQuery,
    },
    ListOtuNames {
        ref_id: String,
    },
    GetOtu {
        otu_id: String,
    },
    GetOtuHistory {
        ref_id: String,
        otu_id: String,
    },
    GetGenbank {
        accession: String,
    },
    CreateOtu {
        ref_id: String,
        otu: OtuCreate,
    },
    EditOtu {
        otu_id: String,
        changes: OtuUpdate,
    },
    RemoveOtu {
        ref_id: String,
        otu_id: String,
    },
    RevertOtu {
        ref_id: String,
        otu_id: String,
        version: u32,
    },

    // ── Isolates ─────────────────────────────────────────────────────
    AddIsolate {
        otu_id: String,
        isolate: IsolateFields,
    },
    EditIsolate {
        otu_id: String,
        isolate_id: String,
        isolate: IsolateFields,
    },
    SetIsolateAsDefault {
        otu_id: String,
        isolate_id: String,
    },
    RemoveIsolate {
        otu_id: String,
        isolate_id: String,
    },

    // ── Sequences ────────────────────────────────────────────────────
    AddSequence {
        otu_id: String,
        isolate_id: String,
        sequence: SequenceFields,
    },
    EditSequence {
        otu_id: String,
        isolate_id: String,
        sequence_id: String,
        sequence: SequenceFields,
    },
    RemoveSequence {
        otu_id: String,
        isolate_id: String,
        sequence_id: String,
    },

    // ── Groups ───────────────────────────────────────────────────────
    ListGroups,
    CreateGroup {
        group_id: String,
    },
    SetGroupPermission {
        group_id: String,
        permission: String,
        value: bool,
    },
    RemoveGroup {
        group_id: String,
    },

    // ── Samples ──────────────────────────────────────────────────────
    FindSamples(FindQuery),
    GetSample {
        sample_id: String,
    },
    CreateSample(SampleCreate),
    EditSample {
        sample_id: String,
        changes: SampleUpdate,
    },
    RemoveSample {
        sample_id: String,
    },

    // ── Analyses ─────────────────────────────────────────────────────
    FindAnalyses {
        sample_id: String,
        page: u32,
    },
    GetAnalysis {
        analysis_id: String,
    },
    Analyze {
        sample_id: String,
        algorithm: String,
        ref_id: String,
    },
    RemoveAnalysis {
        analysis_id: String,
    },

    // ── Jobs ─────────────────────────────────────────────────────────
    FindJobs(FindQuery),
    GetJob {
        job_id: String,
    },
    CancelJob {
        job_id: String,
    },
    RemoveJob {
        job_id: String,
    },
    ClearJobs {
        filter: Option<String>,
    },

    // ── HMMs ─────────────────────────────────────────────────────────
    FindHmms(FindQuery),
    GetHmm {
        hmm_id: String,
    },
    InstallHmms,

    // ── Settings ─────────────────────────────────────────────────────
    GetSettings,
    UpdateSettings(Map<String, Value>),
}

impl Request {
    pub fn intent(&self) -> Intent {
        match self {
            Self::ListReferences(_) => Intent::ListReferences,
            Self::GetReference { .. } => Intent::GetReference,
            Self::CreateReference(_) => Intent::CreateReference,
            Self::ImportReference { .. } => Intent::ImportReference,
            Self::RemoveReference { .. } => Intent::RemoveReference,
            Self::FindOtus { .. } => Intent::FindOtus,
            Self::ListOtuNames { .. } => Intent::ListOtuNames,
            Self::GetOtu { .. } => Intent::GetOtu,
            Self::GetOtuHistory { .. } => Intent::GetOtuHistory,
            Self::GetGenbank { .. } => Intent::GetGenbank,
            Self::CreateOtu { .. } => Intent::CreateOtu,
            Self::EditOtu { .. } => Intent::EditOtu,
            Self::RemoveOtu { .. } => Intent::RemoveOtu,
            Self::RevertOtu { .. } => Intent::RevertOtu,
            Self::AddIsolate { .. } => Intent::AddIsolate,
            Self::EditIsolate { .. } => Intent::EditIsolate,
            Self::SetIsolateAsDefault { .. } => Intent::SetIsolateAsDefault,
            Self::RemoveIsolate { .. } => Intent::RemoveIsolate,
            Self::AddSequence { .. } => Intent::AddSequence,
            Self::EditSequence { .. } => Intent::EditSequence,
            Self::RemoveSequence { .. } => Intent::RemoveSequence,
            Self::ListGroups => Intent::ListGroups,
            Self::CreateGroup { .. } => Intent::CreateGroup,
            Self::SetGroupPermission { .. } => Intent::SetGroupPermission,
            Self::RemoveGroup { .. } => Intent::RemoveGroup,
            Self::FindSamples(_) => Intent::FindSamples,
            Self::GetSample { .. } => Intent::GetSample,
            Self::CreateSample(_) => Intent::CreateSample,
            Self::EditSample { .. } => Intent::EditSample,
            Self::RemoveSample { .. } => Intent::RemoveSample,
            Self::FindAnalyses { .. } => Intent::FindAnalyses,
            Self::GetAnalysis { .. } => Intent::GetAnalysis,
            Self::Analyze { .. } => Intent::Analyze,
            Self::RemoveAnalysis { .. } => Intent::RemoveAnalysis,
            Self::FindJobs(_) => Intent::FindJobs,
            Self::GetJob { .. } => Intent::GetJob,
            Self::CancelJob { .. } => Intent::CancelJob,
            Self::RemoveJob { .. } => Intent::RemoveJob,
            Self::ClearJobs { .. } => Intent::ClearJobs,
            Self::FindHmms(_) => Intent::FindHmms,
            Self::GetHmm { .. } => Intent::GetHmm,
            Self::InstallHmms => Intent::InstallHmms,
            Self::GetSettings => Intent::GetSettings,
            Self::UpdateSettings(_) => Intent::UpdateSettings,
        }
    }

    /// Id of the document a removal targets.
    pub fn removed_id(&self) -> Option<&str> {
        match self {
            Self::RemoveReference { ref_id } => Some(ref_id),
            Self::RemoveOtu { otu_id, .. } => Some(otu_id),
            Self::RemoveIsolate { isolate_id, .. } => Some(isolate_id),
            Self::RemoveSequence { sequence_id, .. } => Some(sequence_id),
            Self::RemoveGroup { group_id } => Some(group_id),
            Self::RemoveSample { sample_id } => Some(sample_id),
            Self::RemoveAnalysis { analysis_id } => Some(analysis_id),
            Self::RemoveJob { job_id } => Some(job_id),
            _ => None,
        }
    }

    /// Client-side checks run before a REQUESTED action is dispatched.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::CreateGroup { group_id } => validate_group_id(group_id),
            Self::SetGroupPermission { group_id, .. } | Self::RemoveGroup { group_id }
                if group_id == ADMINISTRATOR_GROUP =>
            {
                Err(CoreError::validation(
                    "The administrator group cannot be modified",
                ))
            }
            Self::CreateOtu { otu, .. } => required(&otu.name, "Name required"),
            Self::EditOtu { changes, .. } => match &changes.name {
                Some(name) => required(name, "Name required"),
                None => Ok(()),
            },
            Self::AddSequence { sequence, .. } => {
                required(&sequence.accession, "Accession required")?;
                validate_nucleotides(&sequence.sequence)
            }
            Self::EditSequence { sequence, .. } => validate_nucleotides(&sequence.sequence),
            Self::CreateSample(sample) => required(&sample.name, "Name required"),
            Self::EditSample { changes, .. } => match &changes.name {
                Some(name) => required(name, "Name required"),
                None => Ok(()),
            },
            Self::CreateReference(reference) => required(&reference.name, "Name required"),
            Self::ImportReference {
                name, import_from, ..
            } => {
                required(name, "Name required")?;
                required(import_from, "Import file required")
            }
            _ => Ok(()),
        }
    }
}

fn required(value: &str, message: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::validation(message))
    } else {
        Ok(())
    }
}

fn validate_group_id(group_id: &str) -> Result<(), CoreError> {
    if group_id.is_empty() {
        return Err(CoreError::validation("Group id missing"));
    }
    if group_id.contains(' ') {
        return Err(CoreError::validation("Group names may not contain spaces"));
    }
    Ok(())
}

fn validate_nucleotides(sequence: &str) -> Result<(), CoreError> {
    let valid = sequence
        .chars()
        .all(|c| matches!(c.to_ascii_uppercase(), 'A' | 'T' | 'C' | 'G' | 'N'));
    if valid {
        Ok(())
    } else {
        Err(CoreError::validation(
            "Sequence may only contain ATCGN characters",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), CoreError>) -> String {
        match result {
            Err(CoreError::Validation { message }) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn group_id_rules() {
        let create = |id: &str| Request::CreateGroup {
            group_id: id.into(),
        };
        assert_eq!(message(create("").validate()), "Group id missing");
        assert_eq!(
            message(create("lab manager").validate()),
            "Group names may not contain spaces"
        );
        assert!(create("technicians").validate().is_ok());
    }

    #[test]
    fn administrator_is_protected() {
        let toggle = Request::SetGroupPermission {
            group_id: ADMINISTRATOR_GROUP.into(),
            permission: "modify_otu".into(),
            value: false,
        };
        assert!(toggle.validate().is_err());

        let remove = Request::RemoveGroup {
            group_id: ADMINISTRATOR_GROUP.into(),
        };
        assert!(remove.validate().is_err());

        let other = Request::RemoveGroup {
            group_id: "technicians".into(),
        };
        assert!(other.validate().is_ok());
    }

    #[test]
    fn sequence_rules() {
        let add = |accession: &str, sequence: &str| Request::AddSequence {
            otu_id: "otu".into(),
            isolate_id: "iso".into(),
            sequence: SequenceFields {
                accession: accession.into(),
                sequence: sequence.into(),
                ..SequenceFields::default()
            },
        };
        assert_eq!(message(add("", "ATCG").validate()), "Accession required");
        assert_eq!(
            message(add("KX269872", "ATCGX").validate()),
            "Sequence may only contain ATCGN characters"
        );
        assert!(add("KX269872", "atcgnATCGN").validate().is_ok());
    }

    #[test]
    fn names_required() {
        let otu = Request::CreateOtu {
            ref_id: "ref".into(),
            otu: OtuCreate {
                name: "  ".into(),
                abbreviation: "F".into(),
            },
        };
        assert_eq!(message(otu.validate()), "Name required");

        let sample = Request::CreateSample(SampleCreate::default());
        assert!(sample.validate().is_err());

        let rename = Request::EditOtu {
            otu_id: "otu".into(),
            changes: OtuUpdate {
                name: None,
                abbreviation: Some("PVF".into()),
                schema: None,
            },
        };
        assert!(rename.validate().is_ok());
    }

    #[test]
    fn removed_id() {
        let req = Request::RemoveIsolate {
            otu_id: "otu".into(),
            isolate_id: "iso".into(),
        };
        assert_eq!(req.removed_id(), Some("iso"));
        assert_eq!(Request::ListGroups.removed_id(), None);
    }
}
