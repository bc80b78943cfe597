// Integration tests for `ApiClient` using wiremock.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use virtool_api::models::{IsolateFields, OtuCreate, OtuUpdate, SequenceFields};
use virtool_api::{ApiClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── URL handling ────────────────────────────────────────────────────

#[test]
fn test_base_url_normalization() {
    let plain = ApiClient::with_client("https://virtool.example.org", reqwest::Client::new())
        .unwrap();
    assert_eq!(plain.base_url().as_str(), "https://virtool.example.org/api/");

    let already =
        ApiClient::with_client("https://lab.example.org/virtool/api/", reqwest::Client::new())
            .unwrap();
    assert_eq!(already.base_url().as_str(), "https://lab.example.org/virtool/api/");
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_references_sends_find_and_page() {
    let (server, client) = setup().await;

    let body = json!({
        "documents": [
            { "id": "ref1", "name": "Tomato viruses", "data_type": "genome" }
        ],
        "page": 2,
        "page_count": 5,
        "per_page": 25,
        "found_count": 42,
        "total_count": 100
    });

    Mock::given(method("GET"))
        .and(path("/api/refs"))
        .and(query_param("find", "tomato"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.list_references(Some("tomato"), 2).await.unwrap();

    assert_eq!(page.page, 2);
    assert_eq!(page.page_count, 5);
    assert_eq!(page.found_count, 42);
    assert_eq!(page.total_count, 100);
    assert_eq!(page.documents[0].name, "Tomato viruses");
}

#[tokio::test]
async fn test_get_otu_keeps_server_payload() {
    let (server, client) = setup().await;

    let body = json!({
        "id": "otu1",
        "name": "Prunus virus F",
        "abbreviation": "PVF",
        "version": 3,
        "most_recent_change": { "id": "otu1.3" },
        "isolates": [
            {
                "id": "iso1",
                "source_type": "isolate",
                "source_name": "A",
                "default": true,
                "sequences": [
                    {
                        "id": "KX269872",
                        "definition": "Prunus virus F segment RNA2",
                        "host": "sweet cherry",
                        "sequence": "ATCG"
                    }
                ]
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/otus/otu1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let otu = client.get_otu("otu1").await.unwrap();

    assert_eq!(serde_json::to_value(&otu).unwrap(), body);
    assert_eq!(otu.isolates[0].sequences[0].id, "KX269872");
}

#[tokio::test]
async fn test_create_otu_posts_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/refs/ref1/otus"))
        .and(body_json(json!({ "name": "Foo", "abbreviation": "F" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "new1",
            "name": "Foo",
            "abbreviation": "F"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let otu = client
        .create_otu(
            "ref1",
            &OtuCreate {
                name: "Foo".into(),
                abbreviation: "F".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(otu.id, "new1");
}

#[tokio::test]
async fn test_edit_otu_sends_only_changed_fields() {
    let (server, client) = setup().await;

    let schema = json!([{ "name": "RNA1", "molecule": "ssRNA", "required": true }]);
    Mock::given(method("PATCH"))
        .and(path("/api/otus/otu1"))
        .and(body_json(json!({ "abbreviation": "PVF", "schema": schema })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "otu1",
            "name": "Prunus virus F",
            "abbreviation": "PVF",
            "schema": schema
        })))
        .expect(1)
        .mount(&server)
        .await;

    let otu = client
        .edit_otu(
            "otu1",
            &OtuUpdate {
                name: None,
                abbreviation: Some("PVF".into()),
                schema: Some(schema.as_array().unwrap().clone()),
            },
        )
        .await
        .unwrap();

    assert_eq!(otu.extra["schema"], schema);
}

#[tokio::test]
async fn test_add_sequence_sends_accession_as_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/otus/otu1/isolates/iso1/sequences"))
        .and(body_json(json!({
            "id": "KX269872",
            "definition": "segment RNA2",
            "host": "cherry",
            "sequence": "ATCGN",
            "segment": null
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "KX269872",
            "definition": "segment RNA2",
            "host": "cherry",
            "sequence": "ATCGN"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fields = SequenceFields {
        accession: "KX269872".into(),
        definition: "segment RNA2".into(),
        host: "cherry".into(),
        sequence: "ATCGN".into(),
        segment: None,
    };
    let seq = client.add_sequence("otu1", "iso1", &fields).await.unwrap();
    assert_eq!(seq.sequence, "ATCGN");
}

#[tokio::test]
async fn test_set_isolate_as_default_uses_put() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/otus/otu1/isolates/iso2/default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "iso2",
            "source_type": "clone",
            "source_name": "8",
            "default": true,
            "sequences": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let isolate = client.set_isolate_as_default("otu1", "iso2").await.unwrap();
    assert!(isolate.default);
}

#[tokio::test]
async fn test_edit_isolate_patches_fields() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/otus/otu1/isolates/iso1"))
        .and(body_json(json!({ "source_type": "strain", "source_name": "B" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "iso1",
            "source_type": "strain",
            "source_name": "B",
            "default": false
        })))
        .mount(&server)
        .await;

    let isolate = client
        .edit_isolate(
            "otu1",
            "iso1",
            &IsolateFields {
                source_type: "strain".into(),
                source_name: "B".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(isolate.display_name(), "Strain B");
}

#[tokio::test]
async fn test_set_group_permission_body() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/groups/technicians"))
        .and(body_json(json!({ "permissions": { "modify_otu": true } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "technicians",
            "permissions": { "modify_otu": true, "remove_file": false }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let group = client
        .set_group_permission("technicians", "modify_otu", true)
        .await
        .unwrap();
    assert_eq!(group.permissions.get("modify_otu"), Some(&true));
    assert_eq!(group.permissions.get("remove_file"), Some(&false));
}

#[tokio::test]
async fn test_remove_accepts_empty_204() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/samples/s1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.remove_sample("s1").await.unwrap();
}

#[tokio::test]
async fn test_clear_jobs_filter() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/jobs"))
        .and(query_param("filter", "finished"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "removed": ["j1", "j2"] })))
        .mount(&server)
        .await;

    let cleared = client.clear_jobs(Some("finished")).await.unwrap();
    assert_eq!(cleared.removed, vec!["j1".to_owned(), "j2".to_owned()]);
}

#[tokio::test]
async fn test_find_hmms_includes_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/hmms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [],
            "page": 1,
            "page_count": 0,
            "per_page": 25,
            "found_count": 0,
            "total_count": 0,
            "status": {
                "installed": null,
                "process": { "step": "install_profiles", "progress": 0.25 },
                "release": { "name": "v0.2.1", "size": 85_000_000 }
            }
        })))
        .mount(&server)
        .await;

    let page = client.find_hmms(None, 0).await.unwrap();
    let status = page.status.unwrap();
    assert_eq!(status.install_percent(), Some(65.0));
    assert_eq!(status.release.unwrap().size, Some(85_000_000));
}

#[tokio::test]
async fn test_login_with_cookie_jar() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/account/login"))
        .and(body_json(json!({ "username": "bob", "password": "hunter2", "remember": false })))
        .respond_with(
            ResponseTemplate::new(201).append_header("set-cookie", "session_id=abc; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), &TransportConfig::default()).unwrap();
    client
        .login("bob", &SecretString::from("hunter2".to_owned()))
        .await
        .unwrap();
}

// ── Error handling tests ────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_body_is_decoded() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/otus/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "id": "not_found",
            "message": "Not found"
        })))
        .mount(&server)
        .await;

    let err = client.remove_otu("gone").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.api_error_code(), Some("not_found"));
    match err {
        Error::Api { status, message, .. } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not found");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = client.get_settings().await.unwrap_err();
    match err {
        Error::Api { status, message, code } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
            assert_eq!(code, None);
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "id": "unauthorized",
            "message": "Requires authorization"
        })))
        .mount(&server)
        .await;

    let err = client.list_groups().await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_rejected_login_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/account/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "id": "bad_request",
            "message": "Invalid username or password"
        })))
        .mount(&server)
        .await;

    let err = client
        .login("bob", &SecretString::from("wrong".to_owned()))
        .await
        .unwrap_err();
    match err {
        Error::Authentication { message } => assert_eq!(message, "Invalid username or password"),
        other => panic!("expected Authentication, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/jobs/j1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = client.get_job("j1").await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "{not json"),
        other => panic!("expected Deserialization, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = ApiClient::with_client("http://127.0.0.1:9", reqwest::Client::new()).unwrap();
    let err = client.list_groups().await.unwrap_err();
    assert!(err.is_transport());
}
