//! Integration tests for the mirror traversal
//!
//! These tests use wiremock to stand in for a listing server and run the
//! full mirror cycle end-to-end against a temporary directory.
//!
//! Directory URLs are advertised through their HEAD reply: an autoindex
//! page comes back as gzip-compressed HTML, which is what flips a
//! tentative file classification over to a folder.

use dirmirror::config::{AuthConfig, Config, Filters, JobConfig};
use dirmirror::crawler::Coordinator;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted at the mock server
fn create_test_config(base_url: &str, directory: &str) -> Config {
    Config {
        job: JobConfig {
            url: format!("{}/", base_url),
            directory: directory.to_string(),
        },
        auth: None,
        filters: Filters::default().with_builtins(),
    }
}

/// Mounts a plain listing page at the given path
async fn mount_listing(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts the HEAD reply that marks a URL as a listing page
///
/// Compressed HTML without "htm" in the name classifies as a folder.
async fn mount_folder_probe(server: &MockServer, at: &str) {
    Mock::given(method("HEAD"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts HEAD and GET replies for a downloadable file
///
/// The HEAD mock carries the same body so the server reports the real
/// content length without transmitting the bytes.
async fn mount_file(server: &MockServer, at: &str, body: &[u8]) {
    Mock::given(method("HEAD"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_mirror_of_nested_listing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    // Root lists a subdirectory and a file; parent links must be ignored
    mount_listing(
        &server,
        "/",
        r#"<html><body><pre>
        <a href="../">Parent Directory</a>
        <a href="sub/">sub/</a>
        <a href="readme.txt">readme.txt</a>
        </pre></body></html>"#,
    )
    .await;

    mount_folder_probe(&server, "/sub/").await;
    mount_listing(
        &server,
        "/sub/",
        r#"<html><body><pre>
        <a href="../">Parent Directory</a>
        <a href="data.bin">data.bin</a>
        </pre></body></html>"#,
    )
    .await;

    mount_file(&server, "/readme.txt", b"hello listing").await;
    mount_file(&server, "/sub/data.bin", &[0u8, 1, 2, 3, 4]).await;

    let config = create_test_config(&server.uri(), &dir.path().to_string_lossy());
    let mut coordinator = Coordinator::new(config, true).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Mirror failed");

    // The remote tree is recreated under the target directory
    let readme = std::fs::read(dir.path().join("readme.txt")).expect("readme.txt missing");
    assert_eq!(readme, b"hello listing");

    let data = std::fs::read(dir.path().join("sub").join("data.bin")).expect("data.bin missing");
    assert_eq!(data, [0u8, 1, 2, 3, 4]);

    assert_eq!(stats.directories_explored, 2);
    assert_eq!(stats.files_downloaded, 2);
    assert_eq!(stats.files_failed, 0);
    assert_eq!(stats.bytes_mirrored, 18);
}

#[tokio::test]
async fn test_unreachable_file_is_counted_failed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    mount_listing(
        &server,
        "/",
        r#"<a href="good.txt">good.txt</a><a href="gone.txt">gone.txt</a>"#,
    )
    .await;
    mount_file(&server, "/good.txt", b"still here").await;

    // No mocks for gone.txt: every request for it earns a 404. The failed
    // probe keeps the tentative file classification, and the transfer then
    // fails on its own HEAD.
    let config = create_test_config(&server.uri(), &dir.path().to_string_lossy());
    let mut coordinator = Coordinator::new(config, true).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Mirror failed");

    assert_eq!(stats.files_downloaded, 1);
    assert_eq!(stats.files_failed, 1);
    assert!(dir.path().join("good.txt").exists());
    assert!(!dir.path().join("gone.txt").exists());
    assert!(!dir.path().join("gone.txt.tmp").exists());
}

#[tokio::test]
async fn test_excluded_extension_is_never_requested() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    mount_listing(
        &server,
        "/",
        r#"<a href="wanted.txt">wanted.txt</a><a href="skip.iso">skip.iso</a>"#,
    )
    .await;
    mount_file(&server, "/wanted.txt", b"kept").await;

    // The excluded name must produce no traffic at all, not even a probe
    Mock::given(method("HEAD"))
        .and(path("/skip.iso"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/skip.iso"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri(), &dir.path().to_string_lossy());
    config.filters.exclude_extensions.push(".iso".to_string());

    let mut coordinator = Coordinator::new(config, true).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Mirror failed");

    assert_eq!(stats.entries_excluded, 1);
    assert_eq!(stats.files_downloaded, 1);
    assert!(!dir.path().join("skip.iso").exists());

    // Dropping the server verifies the expect(0) mocks
}

#[tokio::test]
async fn test_deep_tree_maps_to_nested_directories() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    mount_listing(&server, "/", r#"<a href="a/">a/</a>"#).await;
    mount_folder_probe(&server, "/a/").await;
    mount_listing(&server, "/a/", r#"<a href="b/">b/</a>"#).await;
    mount_folder_probe(&server, "/a/b/").await;
    mount_listing(&server, "/a/b/", r#"<a href="leaf.txt">leaf.txt</a>"#).await;
    mount_file(&server, "/a/b/leaf.txt", b"deep").await;

    let config = create_test_config(&server.uri(), &dir.path().to_string_lossy());
    let mut coordinator = Coordinator::new(config, true).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Mirror failed");

    let leaf = std::fs::read(dir.path().join("a").join("b").join("leaf.txt"))
        .expect("leaf.txt missing from nested directory");
    assert_eq!(leaf, b"deep");
    assert_eq!(stats.directories_explored, 3);
}

#[tokio::test]
async fn test_failed_listing_degrades_to_no_descent() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    mount_listing(
        &server,
        "/",
        r#"<a href="broken/">broken/</a><a href="ok.txt">ok.txt</a>"#,
    )
    .await;
    mount_folder_probe(&server, "/broken/").await;

    // The directory classifies fine but its listing request blows up
    Mock::given(method("GET"))
        .and(path("/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    mount_file(&server, "/ok.txt", b"survivor").await;

    let config = create_test_config(&server.uri(), &dir.path().to_string_lossy());
    let mut coordinator = Coordinator::new(config, true).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Mirror failed");

    // The walk carries on with the remaining entries
    assert_eq!(stats.files_downloaded, 1);
    assert_eq!(stats.directories_explored, 1);
    assert!(dir.path().join("ok.txt").exists());
    assert!(!dir.path().join("broken").exists());
}

#[tokio::test]
async fn test_basic_auth_is_sent_on_every_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    // "user:pass" base64-encoded
    let credentials = "Basic dXNlcjpwYXNz";

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("authorization", credentials))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="secret.txt">secret.txt</a>"#),
        )
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/secret.txt"))
        .and(header("authorization", credentials))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"classified".to_vec()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/secret.txt"))
        .and(header("authorization", credentials))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"classified".to_vec()))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri(), &dir.path().to_string_lossy());
    config.auth = Some(AuthConfig {
        username: "user".to_string(),
        password: "pass".to_string(),
    });

    // Unauthenticated requests would miss every mock and 404
    let mut coordinator = Coordinator::new(config, true).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Mirror failed");

    assert_eq!(stats.files_downloaded, 1);
    let secret = std::fs::read(dir.path().join("secret.txt")).expect("secret.txt missing");
    assert_eq!(secret, b"classified");
}

#[tokio::test]
async fn test_marker_name_descends_without_head_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    mount_listing(&server, "/", r#"<a href="1.0.0">1.0.0</a>"#).await;

    // To a HEAD this entry reads as a plain file, the reply that would
    // overturn a tentative folder. Marker names are pinned and must never
    // be asked.
    Mock::given(method("HEAD"))
        .and(path("/1.0.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "identity")
                .insert_header("content-type", "application/octet-stream"),
        )
        .expect(0)
        .mount(&server)
        .await;

    mount_listing(&server, "/1.0.0", r#"<a href="notes.txt">notes.txt</a>"#).await;
    mount_file(&server, "/1.0.0/notes.txt", b"versioned").await;

    let mut config = create_test_config(&server.uri(), &dir.path().to_string_lossy());
    config.filters.folder_markers.push("1.0.0".to_string());

    let mut coordinator = Coordinator::new(config, true).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Mirror failed");

    // The entry is walked as a directory, never downloaded as a file
    let notes =
        std::fs::read(dir.path().join("1.0.0").join("notes.txt")).expect("notes.txt missing");
    assert_eq!(notes, b"versioned");
    assert_eq!(stats.directories_explored, 2);
    assert_eq!(stats.files_downloaded, 1);
    assert!(!dir.path().join("1.0.0.tmp").exists());

    // Dropping the server verifies the expect(0) mock
}
