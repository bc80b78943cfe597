// Endpoint families of the Virtool API
//
// Each module adds inherent methods to `ApiClient` for one resource.
// Doc comments carry the exact method and path of the request.

pub mod analyses;
pub mod groups;
pub mod hmms;
pub mod isolates;
pub mod jobs;
pub mod otus;
pub mod references;
pub mod samples;
pub mod sequences;
pub mod settings;

/// Query parameters for find/list endpoints.
///
/// An empty search term and page 0 are omitted so the server applies its
/// own defaults.
pub(crate) fn find_params(find: Option<&str>, page: u32) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(2);
    if let Some(term) = find.map(str::trim).filter(|t| !t.is_empty()) {
        params.push(("find", term.to_owned()));
    }
    if page > 0 {
        params.push(("page", page.to_string()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::find_params;

    #[test]
    fn find_params_skip_defaults() {
        assert!(find_params(None, 0).is_empty());
        assert!(find_params(Some("  "), 0).is_empty());
        assert_eq!(
            find_params(Some("tomato"), 2),
            vec![("find", "tomato".to_owned()), ("page", "2".to_owned())]
        );
    }
}
