//! Client requests against a local canned-response HTTP server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use rstest::rstest;
use txsync_core::{
    LanguageId, MetadataUpdate, Project, ProjectSlug, Resource, ResourceSlug, StoreError,
    SyncSettings, TranslationId, TranslationStore, TranslationUpdate,
};
use txsync_transifex::{TransifexClient, BULK_LIMIT};

/// One request as seen by the server.
#[derive(Debug)]
struct Recorded {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

struct Server {
    base_url: String,
    listener: TcpListener,
}

impl Server {
    fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base_url = format!("http://{}", listener.local_addr().expect("addr"));
        Self { base_url, listener }
    }

    /// Answer one connection per canned response, in order.
    fn serve(self, responses: Vec<(u16, String)>) -> JoinHandle<Vec<Recorded>> {
        thread::spawn(move || {
            let mut seen = Vec::new();
            for (status, body) in responses {
                let (stream, _) = self.listener.accept().expect("accept");
                let mut reader = BufReader::new(stream.try_clone().expect("clone"));

                let mut request_line = String::new();
                reader.read_line(&mut request_line).expect("request line");
                let mut headers = Vec::new();
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).expect("header");
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((k, v)) = line.split_once(':') {
                        headers.push((k.trim().to_string(), v.trim().to_string()));
                    }
                }
                let length = headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, v)| v.parse::<usize>().ok())
                    .unwrap_or(0);
                let mut body_bytes = vec![0; length];
                reader.read_exact(&mut body_bytes).expect("body");

                let mut stream = stream;
                write!(
                    stream,
                    "HTTP/1.1 {status} X\r\nContent-Type: application/vnd.api+json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                )
                .expect("write response");
                stream.flush().expect("flush");

                seen.push(Recorded {
                    request_line: request_line.trim_end().to_string(),
                    headers,
                    body: String::from_utf8(body_bytes).expect("utf8 body"),
                });
            }
            seen
        })
    }
}

fn client(base_url: &str) -> TransifexClient {
    let settings = SyncSettings {
        api_base_url: base_url.to_string(),
        ..SyncSettings::default()
    };
    TransifexClient::new(&settings, "secret")
}

fn project() -> Project {
    Project {
        id: "o:open-edx:p:openedx-translations".to_string(),
        slug: ProjectSlug::from("openedx-translations"),
        name: "Open edX Translations".to_string(),
    }
}

#[test]
fn get_project_sends_token_and_decodes() {
    let server = Server::bind();
    let base = server.base_url.clone();
    let handle = server.serve(vec![(
        200,
        r#"{"data": {"type": "projects", "id": "o:open-edx:p:openedx-translations",
            "attributes": {"slug": "openedx-translations", "name": "Open edX Translations"}}}"#
            .to_string(),
    )]);

    let project = client(&base)
        .get_project(&ProjectSlug::from("openedx-translations"))
        .expect("project");
    assert_eq!(project.id, "o:open-edx:p:openedx-translations");
    assert_eq!(project.name, "Open edX Translations");

    let seen = handle.join().expect("server");
    assert_eq!(
        seen[0].request_line,
        "GET /projects/o:open-edx:p:openedx-translations HTTP/1.1"
    );
    assert_eq!(seen[0].header("authorization"), Some("Bearer secret"));
}

#[rstest]
#[case::not_found(404, true)]
#[case::server_error(500, false)]
fn error_statuses_are_classified(#[case] status: u16, #[case] not_found: bool) {
    let server = Server::bind();
    let base = server.base_url.clone();
    let handle = server.serve(vec![(status, r#"{"errors": [{"detail": "nope"}]}"#.to_string())]);

    let err = client(&base)
        .get_project(&ProjectSlug::from("openedx-translations-sumac"))
        .unwrap_err();
    handle.join().expect("server");

    assert_eq!(err.is_not_found(), not_found, "got: {err}");
    if let StoreError::Api { status: got, message } = &err {
        assert_eq!(*got, status);
        assert!(message.contains("nope"));
    }
}

#[test]
fn list_languages_follows_next_links() {
    let server = Server::bind();
    let base = server.base_url.clone();
    let handle = server.serve(vec![
        (
            200,
            format!(r#"{{"data": [{{"id": "l:ar"}}], "links": {{"next": "{base}/page-2"}}}}"#),
        ),
        (200, r#"{"data": [{"id": "l:fr"}], "links": {"next": null}}"#.to_string()),
    ]);

    let languages = client(&base).list_languages(&project()).expect("languages");
    assert_eq!(
        languages,
        vec![LanguageId::parse("ar"), LanguageId::parse("fr")]
    );

    let seen = handle.join().expect("server");
    assert_eq!(seen[1].request_line, "GET /page-2 HTTP/1.1");
}

#[test]
fn bulk_update_is_chunked_with_bulk_profile() {
    let updates: Vec<TranslationUpdate> = (0..BULK_LIMIT + 1)
        .map(|i| TranslationUpdate {
            id: TranslationId::from(format!("t{i}")),
            attributes: MetadataUpdate {
                reviewed: Some(true),
                proofread: None,
            },
        })
        .collect();

    let server = Server::bind();
    let base = server.base_url.clone();
    let handle = server.serve(vec![
        (200, r#"{"data": []}"#.to_string()),
        (200, r#"{"data": []}"#.to_string()),
    ]);

    client(&base)
        .bulk_update_translations(&updates)
        .expect("bulk update");

    let seen = handle.join().expect("server");
    assert_eq!(seen.len(), 2);
    for request in &seen {
        assert_eq!(request.request_line, "PATCH /resource_translations HTTP/1.1");
        assert!(request
            .header("content-type")
            .is_some_and(|ct| ct.contains("profile=\"bulk\"")));
    }
    let first: serde_json::Value = serde_json::from_str(&seen[0].body).expect("json");
    let second: serde_json::Value = serde_json::from_str(&seen[1].body).expect("json");
    assert_eq!(first["data"].as_array().map(Vec::len), Some(BULK_LIMIT));
    assert_eq!(second["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(second["data"][0]["attributes"], serde_json::json!({"reviewed": true}));
}

#[test]
fn missing_collection_owner_is_named_in_not_found() {
    let server = Server::bind();
    let base = server.base_url.clone();
    let handle = server.serve(vec![(404, r#"{"errors": []}"#.to_string())]);

    let resource = Resource {
        id: "o:open-edx:p:openedx-translations:r:frontend-app-learning".to_string(),
        slug: ResourceSlug::from("frontend-app-learning"),
        name: "frontend-app-learning".to_string(),
        project: ProjectSlug::from("openedx-translations"),
    };
    let err = client(&base)
        .get_translations(&resource, &LanguageId::parse("ar"))
        .unwrap_err();
    handle.join().expect("server");

    match err {
        StoreError::NotFound { kind, id } => {
            assert_eq!(kind, "resource");
            assert_eq!(id, resource.id);
        }
        other => panic!("unexpected error: {other}"),
    }
}
