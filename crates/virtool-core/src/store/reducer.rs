// ── Reducer ──
//
// `reduce` is a pure function of the previous snapshot and one action.
// Only slices that actually change are copied (`Arc::make_mut`); all
// others keep their pointer.

use std::sync::Arc;

use super::state::AppState;
use crate::action::{Action, Intent, Navigation, OperationId, Response};
use crate::error::ErrorRecord;
use crate::orchestration::policy::tracks_pending;

pub fn reduce(state: &AppState, action: &Action) -> AppState {
    let mut next = state.clone();

    match action {
        Action::Requested { op, request } => {
            if tracks_pending(request.intent()) {
                set_pending(&mut next, *op, request.intent());
            }
        }
        Action::Succeeded {
            op,
            intent,
            response,
        } => {
            clear_pending(&mut next, *op);
            clear_error(&mut next, *intent);
            apply_response(&mut next, *intent, response);
        }
        Action::Failed { op, intent, error } => {
            clear_pending(&mut next, *op);
            record_error(&mut next, *intent, error);
        }
        Action::Discarded { op, .. } => clear_pending(&mut next, *op),
        Action::PendingChanged {
            op,
            intent,
            pending,
        } => {
            if *pending {
                set_pending(&mut next, *op, *intent);
            } else {
                clear_pending(&mut next, *op);
            }
        }
        Action::Rejected { intent, error } => record_error(&mut next, *intent, error),
        Action::Navigate(navigation) => navigate(&mut next, navigation),
    }

    next
}

// ── Bookkeeping ──────────────────────────────────────────────────────

fn set_pending(state: &mut AppState, op: OperationId, intent: Intent) {
    if state.pending.get(&op) != Some(&intent) {
        Arc::make_mut(&mut state.pending).insert(op, intent);
    }
}

fn clear_pending(state: &mut AppState, op: OperationId) {
    if state.pending.contains_key(&op) {
        Arc::make_mut(&mut state.pending).remove(&op);
    }
}

fn record_error(state: &mut AppState, intent: Intent, error: &ErrorRecord) {
    Arc::make_mut(&mut state.errors).insert(intent.error_key(), error.clone());
}

fn clear_error(state: &mut AppState, intent: Intent) {
    let key = intent.error_key();
    if state.errors.contains_key(&key) {
        Arc::make_mut(&mut state.errors).remove(&key);
    }
}

fn navigate(state: &mut AppState, navigation: &Navigation) {
    let router = Arc::make_mut(&mut state.router);
    match navigation {
        Navigation::Push(path) => {
            router.path.clone_from(path);
            router.modals.clear();
        }
        Navigation::OpenModal(modal) => {
            router.modals.insert(*modal);
        }
        Navigation::CloseModal(modal) => {
            router.modals.remove(modal);
        }
    }
}

// ── Server data ──────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
fn apply_response(state: &mut AppState, intent: Intent, response: &Response) {
    match response {
        // References
        Response::References(page) => Arc::make_mut(&mut state.references).replace_page(page),
        Response::Reference(reference) if intent == Intent::GetReference => {
            Arc::make_mut(&mut state.references).set_detail(reference);
        }
        Response::Reference(reference) => Arc::make_mut(&mut state.references).upsert(reference),

        // OTUs
        Response::Otus(page) => Arc::make_mut(&mut state.otus).list.replace_page(page),
        Response::OtuNames(names) => Arc::make_mut(&mut state.otus).names = Some(names.clone()),
        Response::Otu(otu) if intent == Intent::GetOtu => {
            Arc::make_mut(&mut state.otus).list.set_detail(otu);
        }
        Response::Otu(otu) => Arc::make_mut(&mut state.otus).list.upsert(otu),
        Response::OtuHistory(changes) => {
            Arc::make_mut(&mut state.otus).history = Some(changes.clone());
        }
        Response::Genbank(record) => {
            Arc::make_mut(&mut state.otus).last_genbank = Some(record.clone());
        }
        // The parent OTU is refetched; its stored copy stays the last server payload.
        Response::Isolate(_) | Response::Sequence(_) => {}

        // Groups
        Response::Groups(groups) => Arc::make_mut(&mut state.groups).replace_all(groups),
        Response::Group(group) => Arc::make_mut(&mut state.groups).upsert(group),

        // Samples & analyses
        Response::Samples(page) => Arc::make_mut(&mut state.samples).replace_page(page),
        Response::Sample(sample) if intent == Intent::GetSample => {
            Arc::make_mut(&mut state.samples).set_detail(sample);
        }
        Response::Sample(sample) => Arc::make_mut(&mut state.samples).upsert(sample),
        Response::Analyses(page) => Arc::make_mut(&mut state.analyses).replace_page(page),
        Response::Analysis(analysis) if intent == Intent::GetAnalysis => {
            Arc::make_mut(&mut state.analyses).set_detail(analysis);
        }
        Response::Analysis(analysis) => Arc::make_mut(&mut state.analyses).upsert(analysis),

        // Jobs
        Response::Jobs(page) => Arc::make_mut(&mut state.jobs).replace_page(page),
        Response::Job(job) if intent == Intent::GetJob => {
            Arc::make_mut(&mut state.jobs).set_detail(job);
        }
        Response::Job(job) => Arc::make_mut(&mut state.jobs).upsert(job),
        Response::JobsCleared(ids) => {
            let jobs = Arc::make_mut(&mut state.jobs);
            for id in ids {
                jobs.remove(id);
            }
        }

        // HMMs
        Response::Hmms(page) => {
            let hmms = Arc::make_mut(&mut state.hmms);
            hmms.list.replace_page(&page.page);
            hmms.status.clone_from(&page.status);
        }
        Response::Hmm(hmm) => Arc::make_mut(&mut state.hmms).list.set_detail(hmm),
        Response::HmmInstall(_) | Response::Accepted => {}

        // Settings
        Response::Settings(settings) => state.settings = Arc::new(Some(settings.clone())),

        Response::Removed { id } => remove_document(state, intent, id),
    }
}

fn remove_document(state: &mut AppState, intent: Intent, id: &str) {
    match intent {
        Intent::RemoveReference if state.references.contains(id) => {
            Arc::make_mut(&mut state.references).remove(id);
        }
        Intent::RemoveOtu if state.otus.list.contains(id) => {
            Arc::make_mut(&mut state.otus).list.remove(id);
        }
        Intent::RemoveGroup if state.groups.contains(id) => {
            Arc::make_mut(&mut state.groups).remove(id);
        }
        Intent::RemoveSample if state.samples.contains(id) => {
            Arc::make_mut(&mut state.samples).remove(id);
        }
        Intent::RemoveAnalysis if state.analyses.contains(id) => {
            Arc::make_mut(&mut state.analyses).remove(id);
        }
        Intent::RemoveJob if state.jobs.contains(id) => {
            Arc::make_mut(&mut state.jobs).remove(id);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use serde_json::{Map, json};

    use super::*;
    use crate::action::{Modal, Request};
    use crate::model::{FindQuery, Group, Otu, Page, Pagination, Reference};

    fn otu(id: &str, name: &str) -> Otu {
        serde_json::from_value(json!({ "id": id, "name": name, "abbreviation": "" }))
            .unwrap_or_else(|e| panic!("bad fixture: {e}"))
    }

    fn succeeded(op: u64, intent: Intent, response: Response) -> Action {
        Action::Succeeded {
            op: OperationId(op),
            intent,
            response,
        }
    }

    fn not_found() -> ErrorRecord {
        ErrorRecord {
            message: "Not found".into(),
            status: Some(404),
            code: Some("not_found".into()),
        }
    }

    #[test]
    fn list_success_replaces_wholesale() {
        let page = Page {
            documents: vec![otu("a", "Alpha"), otu("b", "Beta")],
            page: 2,
            page_count: 5,
            per_page: 25,
            found_count: 42,
            total_count: 100,
        };
        let state = reduce(
            &AppState::default(),
            &succeeded(1, Intent::FindOtus, Response::Otus(page.clone())),
        );

        assert_eq!(state.otus.list.documents.as_ref(), Some(&page.documents));
        assert_eq!(
            state.otus.list.cursor,
            Some(Pagination {
                page: 2,
                page_count: 5,
                per_page: 25,
                found_count: 42,
                total_count: 100,
            })
        );

        let smaller = Page {
            documents: vec![otu("c", "Gamma")],
            page: 1,
            page_count: 1,
            per_page: 25,
            found_count: 1,
            total_count: 100,
        };
        let state = reduce(
            &state,
            &succeeded(2, Intent::FindOtus, Response::Otus(smaller)),
        );
        let ids: Vec<_> = state
            .otus
            .list
            .documents
            .iter()
            .flatten()
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn untouched_slices_keep_identity() {
        let before = AppState::default();
        let after = reduce(
            &before,
            &succeeded(1, Intent::ListGroups, Response::Groups(Vec::new())),
        );

        assert!(!Arc::ptr_eq(&before.groups, &after.groups));
        assert!(Arc::ptr_eq(&before.references, &after.references));
        assert!(Arc::ptr_eq(&before.pending, &after.pending));
        assert!(Arc::ptr_eq(&before.errors, &after.errors));
    }

    #[test]
    fn create_appends_and_edit_merges() {
        let state = reduce(
            &AppState::default(),
            &succeeded(1, Intent::CreateOtu, Response::Otu(otu("x", "Foo"))),
        );
        let state = reduce(
            &state,
            &succeeded(2, Intent::EditOtu, Response::Otu(otu("x", "Foo renamed"))),
        );

        let docs = state.otus.list.documents.clone().unwrap_or_default();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "Foo renamed");
    }

    #[test]
    fn get_sets_detail_and_refreshes_list_entry() {
        let mut state = AppState::default();
        Arc::make_mut(&mut state.otus)
            .list
            .replace_all(&[otu("x", "Old")]);

        let state = reduce(
            &state,
            &succeeded(1, Intent::GetOtu, Response::Otu(otu("x", "New"))),
        );
        assert_eq!(state.otus.list.detail.as_ref().map(|o| o.name.as_str()), Some("New"));
        assert_eq!(state.otus.list.get("x").map(|o| o.name.as_str()), Some("New"));
    }

    #[test]
    fn remove_filters_by_id() {
        let mut state = AppState::default();
        Arc::make_mut(&mut state.otus)
            .list
            .replace_all(&[otu("x", "X"), otu("y", "Y")]);

        let state = reduce(
            &state,
            &succeeded(
                1,
                Intent::RemoveOtu,
                Response::Removed { id: "x".into() },
            ),
        );
        assert!(!state.otus.list.contains("x"));
        assert!(state.otus.list.contains("y"));
    }

    #[test]
    fn isolate_success_leaves_otu_untouched() {
        let mut state = AppState::default();
        Arc::make_mut(&mut state.otus).list.set_detail(&otu("x", "X"));
        let isolate = serde_json::from_value(json!({ "id": "iso", "source_type": "isolate" }))
            .unwrap_or_else(|e| panic!("bad fixture: {e}"));

        let after = reduce(
            &state,
            &succeeded(1, Intent::AddIsolate, Response::Isolate(isolate)),
        );
        assert!(Arc::ptr_eq(&state.otus, &after.otus));
    }

    #[test]
    fn failure_records_error_and_success_clears_it() {
        let state = reduce(
            &AppState::default(),
            &Action::Failed {
                op: OperationId(1),
                intent: Intent::RemoveGroup,
                error: not_found(),
            },
        );
        assert_eq!(state.errors.get("REMOVE_GROUP_ERROR"), Some(&not_found()));
        assert_eq!(state.error(Intent::RemoveGroup), Some(&not_found()));

        let state = reduce(
            &state,
            &succeeded(
                2,
                Intent::RemoveGroup,
                Response::Removed { id: "g".into() },
            ),
        );
        assert!(state.error(Intent::RemoveGroup).is_none());
    }

    #[test]
    fn failure_leaves_data_untouched() {
        let mut state = AppState::default();
        Arc::make_mut(&mut state.groups).replace_all(&[Group {
            id: "technicians".into(),
            permissions: BTreeMap::new(),
            extra: Map::new(),
        }]);

        let after = reduce(
            &state,
            &Action::Failed {
                op: OperationId(1),
                intent: Intent::RemoveGroup,
                error: not_found(),
            },
        );
        assert!(Arc::ptr_eq(&state.groups, &after.groups));
    }

    #[test]
    fn pending_lifecycle() {
        let request = Request::RemoveOtu {
            ref_id: "r".into(),
            otu_id: "x".into(),
        };
        let state = reduce(
            &AppState::default(),
            &Action::Requested {
                op: OperationId(7),
                request,
            },
        );
        assert!(state.is_op_pending(OperationId(7)));
        assert!(state.is_pending(Intent::RemoveOtu));

        let state = reduce(
            &state,
            &Action::Failed {
                op: OperationId(7),
                intent: Intent::RemoveOtu,
                error: not_found(),
            },
        );
        assert!(!state.is_pending(Intent::RemoveOtu));
    }

    #[test]
    fn untracked_requests_do_not_set_pending() {
        let state = reduce(
            &AppState::default(),
            &Action::Requested {
                op: OperationId(1),
                request: Request::ListReferences(FindQuery::default()),
            },
        );
        assert!(state.pending.is_empty());
    }

    #[test]
    fn navigation_push_closes_modals() {
        let state = reduce(
            &AppState::default(),
            &Action::Navigate(Navigation::OpenModal(Modal::CreateOtu)),
        );
        assert!(state.router.modals.contains(&Modal::CreateOtu));

        let state = reduce(&state, &Action::Navigate(Navigation::Push("/refs".into())));
        assert_eq!(state.router.path, "/refs");
        assert!(state.router.modals.is_empty());
    }

    #[test]
    fn reference_create_round_trip() {
        let created: Reference = serde_json::from_value(json!({
            "id": "r1",
            "name": "Plant viruses",
            "organism": "virus"
        }))
        .unwrap_or_else(|e| panic!("bad fixture: {e}"));

        let state = reduce(
            &AppState::default(),
            &succeeded(
                1,
                Intent::CreateReference,
                Response::Reference(created.clone()),
            ),
        );
        assert_eq!(state.references.documents, Some(vec![created]));
    }
}
