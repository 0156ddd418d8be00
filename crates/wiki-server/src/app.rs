//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// Route table:
/// - `GET /` redirects to the front page
/// - `GET /view/{title}`, `GET /edit/{title}`, `POST /save/{title}`
/// - anything else is a 404
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::pages::front_page))
        .route("/view/{*title}", get(handlers::pages::view_page))
        .route("/edit/{*title}", get(handlers::pages::edit_page))
        .route("/save/{*title}", post(handlers::pages::save_page))
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode, header};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;
    use wiki_storage::{FsPageStore, MockPageStore, PageStore, StorageErrorKind, Title};

    use super::*;
    use crate::templates::Templates;

    fn app_with_store(store: Arc<dyn PageStore>) -> Router {
        let state = Arc::new(AppState {
            store,
            templates: Templates::bundled().unwrap(),
            front_page: Title::parse("FrontPage").unwrap(),
        });
        create_router(state)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_owned()))
            .unwrap()
    }

    fn post_raw(uri: &str, content_type: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_owned())).unwrap()
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response<Body>) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_view_missing_redirects_to_edit() {
        let app = app_with_store(Arc::new(MockPageStore::new()));

        let response = app.oneshot(get("/view/missing-title")).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/edit/missing-title");
    }

    #[tokio::test]
    async fn test_view_existing_renders_page() {
        let app = app_with_store(Arc::new(MockPageStore::new().with_page("Home", "Welcome!")));

        let response = app.oneshot(get("/view/Home")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        let html = body_text(response).await;
        assert!(html.contains("<h1>Home</h1>"));
        assert!(html.contains("Welcome!"));
    }

    #[tokio::test]
    async fn test_view_escapes_body() {
        let app = app_with_store(Arc::new(
            MockPageStore::new().with_page("x", "<b onclick=\"evil()\">hi</b>"),
        ));

        let html = body_text(app.oneshot(get("/view/x")).await.unwrap()).await;

        assert!(!html.contains("<b onclick"));
        assert!(html.contains("&lt;b onclick="));
    }

    #[tokio::test]
    async fn test_view_storage_failure_is_500() {
        let app = app_with_store(Arc::new(
            MockPageStore::new().fail_with(StorageErrorKind::PermissionDenied),
        ));

        let response = app.oneshot(get("/view/Home")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("Permission denied"));
    }

    #[tokio::test]
    async fn test_edit_missing_renders_empty_form() {
        let app = app_with_store(Arc::new(MockPageStore::new()));

        let response = app.oneshot(get("/edit/missing-title")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Editing missing-title"));
        assert!(html.contains("<textarea name=\"body\" rows=\"20\" cols=\"80\"></textarea>"));
    }

    #[tokio::test]
    async fn test_edit_existing_prefills_body() {
        let app = app_with_store(Arc::new(MockPageStore::new().with_page("Home", "old text")));

        let html = body_text(app.oneshot(get("/edit/Home")).await.unwrap()).await;

        assert!(html.contains(">old text</textarea>"));
    }

    #[tokio::test]
    async fn test_edit_storage_failure_is_500() {
        let app = app_with_store(Arc::new(
            MockPageStore::new().fail_with(StorageErrorKind::Other),
        ));

        let response = app.oneshot(get("/edit/Home")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_save_stores_body_and_redirects() {
        let store = Arc::new(MockPageStore::new());
        let app = app_with_store(Arc::<MockPageStore>::clone(&store));

        let response = app
            .oneshot(post_form("/save/my-page", "body=Hello"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/view/my-page");
        assert_eq!(store.body("my-page"), Some(b"Hello".to_vec()));
    }

    #[tokio::test]
    async fn test_save_without_body_field_stores_empty_page() {
        let store = Arc::new(MockPageStore::new().with_page("p", "previous"));
        let app = app_with_store(Arc::<MockPageStore>::clone(&store));

        let response = app.oneshot(post_form("/save/p", "")).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(store.body("p"), Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_save_multipart_form() {
        let store = Arc::new(MockPageStore::new().with_page("p", "precious"));
        let app = app_with_store(Arc::<MockPageStore>::clone(&store));
        let payload = "--XBOUNDARY\r\n\
            Content-Disposition: form-data; name=\"body\"\r\n\r\n\
            Hello\r\n\
            --XBOUNDARY--\r\n";

        let response = app
            .oneshot(post_raw(
                "/save/p",
                Some("multipart/form-data; boundary=XBOUNDARY"),
                payload,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/view/p");
        assert_eq!(store.body("p"), Some(b"Hello".to_vec()));
    }

    #[tokio::test]
    async fn test_save_multipart_skips_file_parts() {
        let store = Arc::new(MockPageStore::new());
        let app = app_with_store(Arc::<MockPageStore>::clone(&store));
        let payload = "--XBOUNDARY\r\n\
            Content-Disposition: form-data; name=\"body\"; filename=\"a.txt\"\r\n\r\n\
            from file\r\n\
            --XBOUNDARY\r\n\
            Content-Disposition: form-data; name=\"body\"\r\n\r\n\
            from field\r\n\
            --XBOUNDARY--\r\n";

        let response = app
            .oneshot(post_raw(
                "/save/p",
                Some("multipart/form-data; boundary=XBOUNDARY"),
                payload,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(store.body("p"), Some(b"from field".to_vec()));
    }

    #[tokio::test]
    async fn test_save_malformed_multipart_keeps_page() {
        let store = Arc::new(MockPageStore::new().with_page("p", "precious"));
        let app = app_with_store(Arc::<MockPageStore>::clone(&store));

        let response = app
            .oneshot(post_raw("/save/p", Some("multipart/form-data"), "body=Hello"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.body("p"), Some(b"precious".to_vec()));
    }

    #[tokio::test]
    async fn test_save_unsupported_content_type_keeps_page() {
        let store = Arc::new(MockPageStore::new().with_page("p", "precious"));
        let app = app_with_store(Arc::<MockPageStore>::clone(&store));

        let response = app
            .oneshot(post_raw(
                "/save/p",
                Some("application/json"),
                "{\"body\":\"Hello\"}",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(store.body("p"), Some(b"precious".to_vec()));
    }

    #[tokio::test]
    async fn test_save_without_content_type_reads_form() {
        let store = Arc::new(MockPageStore::new());
        let app = app_with_store(Arc::<MockPageStore>::clone(&store));

        let response = app
            .oneshot(post_raw("/save/p", None, "body=Hi+there"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(store.body("p"), Some(b"Hi there".to_vec()));
    }

    #[tokio::test]
    async fn test_save_duplicate_body_takes_first() {
        let store = Arc::new(MockPageStore::new());
        let app = app_with_store(Arc::<MockPageStore>::clone(&store));

        let response = app
            .oneshot(post_form("/save/p", "body=first&body=second"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(store.body("p"), Some(b"first".to_vec()));
    }

    #[tokio::test]
    async fn test_save_body_from_query_string() {
        let store = Arc::new(MockPageStore::new());
        let app = app_with_store(Arc::<MockPageStore>::clone(&store));

        let response = app
            .oneshot(post_form("/save/p?body=Hi", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(store.body("p"), Some(b"Hi".to_vec()));
    }

    #[tokio::test]
    async fn test_save_form_body_beats_query_string() {
        let store = Arc::new(MockPageStore::new());
        let app = app_with_store(Arc::<MockPageStore>::clone(&store));

        let response = app
            .oneshot(post_form("/save/p?body=query", "body=form"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(store.body("p"), Some(b"form".to_vec()));
    }

    #[tokio::test]
    async fn test_save_undecodable_path_is_404() {
        let store = Arc::new(MockPageStore::new());
        let app = app_with_store(Arc::<MockPageStore>::clone(&store));

        let response = app
            .oneshot(post_form("/save/%FF", "body=x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_save_storage_failure_is_500() {
        let app = app_with_store(Arc::new(
            MockPageStore::new().fail_with(StorageErrorKind::PermissionDenied),
        ));

        let response = app
            .oneshot(post_form("/save/p", "body=x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("Permission denied"));
    }

    #[tokio::test]
    async fn test_invalid_paths_are_404() {
        for uri in [
            "/view/",
            "/view/bad%20title",
            "/view/page.txt",
            "/view/..%2Fsecret",
            "/delete/page",
            "/viewpage",
            "/static/app.js",
            "/view/%FF",
            "/edit/a%C3",
        ] {
            let app = app_with_store(Arc::new(MockPageStore::new()));
            let response = app.oneshot(get(uri)).await.unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {uri}");
        }
    }

    #[tokio::test]
    async fn test_invalid_save_path_is_404() {
        let app = app_with_store(Arc::new(MockPageStore::new()));

        let response = app
            .oneshot(post_form("/save/no.dots", "body=x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_root_redirects_to_front_page() {
        let app = app_with_store(Arc::new(MockPageStore::new()));

        let response = app.oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/view/FrontPage");
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let app = app_with_store(Arc::new(MockPageStore::new()));

        let response = app.oneshot(get("/edit/Home")).await.unwrap();

        let headers = response.headers();
        assert!(headers.contains_key("content-security-policy"));
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
    }

    #[tokio::test]
    async fn test_save_then_view_on_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn PageStore> = Arc::new(FsPageStore::new(temp_dir.path().to_path_buf()));
        let app = app_with_store(store);

        let saved = app
            .clone()
            .oneshot(post_form("/save/my-page", "body=Hello"))
            .await
            .unwrap();
        assert_eq!(saved.status(), StatusCode::FOUND);

        let viewed = app.oneshot(get("/view/my-page")).await.unwrap();
        assert_eq!(viewed.status(), StatusCode::OK);
        assert!(body_text(viewed).await.contains("Hello"));
    }

    #[tokio::test]
    async fn test_save_nested_title_on_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn PageStore> = Arc::new(FsPageStore::new(temp_dir.path().to_path_buf()));
        let app = app_with_store(store);

        let saved = app
            .clone()
            .oneshot(post_form("/save/dir/page", "body=nested+content"))
            .await
            .unwrap();
        assert_eq!(saved.status(), StatusCode::FOUND);
        assert_eq!(location(&saved), "/view/dir/page");
        assert_eq!(
            std::fs::read(temp_dir.path().join("dir").join("page.txt")).unwrap(),
            b"nested content"
        );

        let viewed = app.oneshot(get("/view/dir/page")).await.unwrap();
        assert_eq!(viewed.status(), StatusCode::OK);
        assert!(body_text(viewed).await.contains("nested content"));
    }
}
