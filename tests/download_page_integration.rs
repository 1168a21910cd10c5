//! Integration tests for the download-page adapter against a mock HTTP
//! server.

use upstream_forge::{DownloadPage, ForgeError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn links_resolve_against_the_page_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/downloads/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <a href="/x">Name</a>
                <a href="tool-1.2.tar.gz">Tool 1.2</a>
                <a href="https://mirror.example.com/tool.zip">Mirror</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let page = DownloadPage::new(&format!("{}/downloads/", server.uri())).unwrap();
    let links = page.get_web_page_links().await.unwrap();

    assert_eq!(links.len(), 3);
    assert_eq!(links.get("Name"), Some(format!("{}/x", server.uri()).as_str()));
    assert_eq!(
        links.get("Tool 1.2"),
        Some(format!("{}/downloads/tool-1.2.tar.gz", server.uri()).as_str())
    );
    assert_eq!(links.get("Mirror"), Some("https://mirror.example.com/tool.zip"));
}

#[tokio::test]
async fn unusable_anchors_are_skipped_silently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/downloads/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/textless"></a>
               <a href="/nested"><img src="icon.png"></a>
               <a href="/ok">Keep me</a>"#,
        ))
        .mount(&server)
        .await;

    let page = DownloadPage::new(&format!("{}/downloads/", server.uri())).unwrap();
    let links = page.get_web_page_links().await.unwrap();

    assert_eq!(links.len(), 1);
    assert!(links.get("Keep me").is_some());
}

#[tokio::test]
async fn non_2xx_page_fetch_is_an_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/downloads/"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let page = DownloadPage::new(&format!("{}/downloads/", server.uri())).unwrap();
    let err = page.get_web_page_links().await.unwrap_err();
    assert!(matches!(err, ForgeError::Http { status: 403, .. }));
}

#[test]
fn relative_page_url_is_rejected_at_construction() {
    assert!(matches!(
        DownloadPage::new("downloads/index.html"),
        Err(ForgeError::InvalidProject(_))
    ));
}
