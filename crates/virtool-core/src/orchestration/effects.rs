// ── Follow-up effects ──
//
// What happens after an intent succeeds: close the dialog that started
// it, leave a page whose document is gone, or refetch a parent document
// that the response does not carry.

use crate::action::{Modal, Navigation, Request};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FollowUp {
    Navigate(Navigation),
    Refetch(Request),
}

pub(crate) fn after_success(request: &Request) -> Vec<FollowUp> {
    match request {
        Request::CreateReference(_) => close(Modal::CreateReference),
        Request::ImportReference { .. } => close(Modal::ImportReference),
        Request::RemoveReference { .. } => push("/refs".into()),

        Request::CreateOtu { .. } => close(Modal::CreateOtu),
        Request::RemoveOtu { ref_id, .. } => push(format!("/refs/{ref_id}/otus")),

        Request::AddIsolate { otu_id, .. }
        | Request::EditIsolate { otu_id, .. }
        | Request::SetIsolateAsDefault { otu_id, .. }
        | Request::RemoveIsolate { otu_id, .. }
        | Request::AddSequence { otu_id, .. }
        | Request::EditSequence { otu_id, .. }
        | Request::RemoveSequence { otu_id, .. } => vec![refetch_otu(otu_id)],

        Request::RevertOtu { ref_id, otu_id, .. } => vec![
            refetch_otu(otu_id),
            FollowUp::Refetch(Request::GetOtuHistory {
                ref_id: ref_id.clone(),
                otu_id: otu_id.clone(),
            }),
        ],

        Request::CreateSample(_) => close(Modal::CreateSample),
        Request::RemoveSample { .. } => push("/samples".into()),
        Request::RemoveJob { .. } => push("/jobs".into()),

        Request::Analyze { sample_id, .. } => vec![FollowUp::Refetch(Request::FindAnalyses {
            sample_id: sample_id.clone(),
            page: 0,
        })],

        _ => Vec::new(),
    }
}

fn close(modal: Modal) -> Vec<FollowUp> {
    vec![FollowUp::Navigate(Navigation::CloseModal(modal))]
}

fn push(path: String) -> Vec<FollowUp> {
    vec![FollowUp::Navigate(Navigation::Push(path))]
}

fn refetch_otu(otu_id: &str) -> FollowUp {
    FollowUp::Refetch(Request::GetOtu {
        otu_id: otu_id.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_otu_returns_to_reference() {
        let request = Request::RemoveOtu {
            ref_id: "ref1".into(),
            otu_id: "otu1".into(),
        };
        assert_eq!(
            after_success(&request),
            vec![FollowUp::Navigate(Navigation::Push("/refs/ref1/otus".into()))]
        );
    }

    #[test]
    fn sequence_mutation_refetches_otu() {
        let request = Request::RemoveSequence {
            otu_id: "otu1".into(),
            isolate_id: "iso".into(),
            sequence_id: "KX1".into(),
        };
        assert_eq!(after_success(&request), vec![refetch_otu("otu1")]);
    }

    #[test]
    fn fetches_have_no_follow_up() {
        assert!(after_success(&Request::ListGroups).is_empty());
    }
}
