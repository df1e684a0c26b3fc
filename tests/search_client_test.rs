#[cfg(test)]
mod search_client {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Multipart, State},
        http::StatusCode,
        routing::post,
        Router,
    };
    use listing_viewer::{
        config::create_test_config,
        geometry::LatLng,
        map::LayerMap,
        search::{HttpSearchClient, SearchBackend, SearchForm},
        viewer::{ListingViewer, Phase},
    };
    use tokio::net::TcpListener;

    #[derive(Debug, Clone, PartialEq)]
    struct ReceivedField {
        name: String,
        file_name: Option<String>,
        text: String,
    }

    type Received = Arc<Mutex<Vec<ReceivedField>>>;

    const BODY: &str = r#"{
        "properties": [
            {"id": 1, "url": "https://www.openrent.co.uk/1",
             "latitude": 51.54, "longitude": -0.14,
             "price": 1000, "bedrooms": 1, "studio": true, "shared": false,
             "live": true, "furnished": false},
            {"id": "2", "url": "https://www.openrent.co.uk/2",
             "latitude": 51.535, "longitude": -0.145,
             "price": "1450", "bedrooms": "2", "studio": 0, "shared": 1}
        ],
        "polygons": [
            {"external": [[51.53, -0.15], [51.53, -0.13], [51.55, -0.13], [51.55, -0.15]],
             "internals": []}
        ]
    }"#;

    async fn record(
        State(received): State<Received>,
        mut multipart: Multipart,
    ) -> (StatusCode, String) {
        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(|f| f.to_string());
            let text = field.text().await.unwrap_or_default();
            received.lock().unwrap().push(ReceivedField {
                name,
                file_name,
                text,
            });
        }
        (StatusCode::OK, BODY.to_string())
    }

    async fn spawn_stub(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}/search", addr)
    }

    fn fixture() -> String {
        format!("{}/tests/fixtures/area.kml", env!("CARGO_MANIFEST_DIR"))
    }

    #[tokio::test]
    async fn posts_area_file_as_multipart() {
        let received: Received = Arc::new(Mutex::new(vec![]));
        let app = Router::new()
            .route("/search", post(record))
            .with_state(received.clone());
        let client = HttpSearchClient::new(&spawn_stub(app).await);

        let form = SearchForm::from_kml_file("file", fixture())
            .await
            .unwrap()
            .with_field("label", "camden");
        let dataset = client.search(form).await.unwrap();

        let received = received.lock().unwrap().clone();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].name, "file");
        assert_eq!(received[0].file_name.as_deref(), Some("area.kml"));
        assert!(received[0].text.contains("<kml"));
        assert_eq!(received[1].name, "label");
        assert_eq!(received[1].text, "camden");

        assert_eq!(dataset.properties.len(), 2);
        assert_eq!(dataset.polygons.len(), 1);
        assert_eq!(dataset.polygons[0].external[0], LatLng::new(51.53, -0.15));
    }

    #[tokio::test]
    async fn accepts_string_and_numeric_flags() {
        let received: Received = Arc::new(Mutex::new(vec![]));
        let app = Router::new()
            .route("/search", post(record))
            .with_state(received);
        let client = HttpSearchClient::new(&spawn_stub(app).await);

        let dataset = client.search(SearchForm::new()).await.unwrap();

        let second = &dataset.properties[1];
        assert_eq!(second.id, 2);
        assert_eq!(second.price, 1450);
        assert_eq!(second.bedrooms, 2);
        assert!(!second.studio);
        assert!(second.shared);
        assert!(!second.live);
    }

    #[tokio::test]
    async fn error_status_is_an_error() {
        let app = Router::new().route(
            "/search",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = HttpSearchClient::new(&spawn_stub(app).await);

        assert!(client.search(SearchForm::new()).await.is_err());
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let app = Router::new().route(
            "/search",
            post(|| async { (StatusCode::OK, r#"{"properties": []}"#) }),
        );
        let client = HttpSearchClient::new(&spawn_stub(app).await);

        let err = client.search(SearchForm::new()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("malformed"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = HttpSearchClient::new(&format!("http://{}/search", addr));

        assert!(client.search(SearchForm::new()).await.is_err());
    }

    #[tokio::test]
    async fn missing_area_file_is_an_error() {
        assert!(SearchForm::from_kml_file("file", "does/not/exist.kml").await.is_err());
    }

    #[tokio::test]
    async fn viewer_renders_http_results() {
        let received: Received = Arc::new(Mutex::new(vec![]));
        let app = Router::new()
            .route("/search", post(record))
            .with_state(received);
        let client = HttpSearchClient::new(&spawn_stub(app).await);
        let config = create_test_config();
        let mut viewer = ListingViewer::new(&config.map, LayerMap::new(config.map.tile_max_zoom));
        viewer.form_mut().set_studio(true).set_rent_range("500", "1500");

        let summary = viewer
            .submit_search(&client, SearchForm::from_kml_file("file", fixture()).await.unwrap())
            .await
            .unwrap();

        assert_eq!(viewer.phase(), Phase::Loaded);
        assert_eq!(summary.markers, 1);
        assert_eq!(summary.regions, 1);
        assert!(viewer
            .map()
            .viewport()
            .unwrap()
            .contains(LatLng::new(51.54, -0.14)));
    }
}
