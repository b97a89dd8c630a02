use featureboard_api::{serve, AppState};
use featureboard_client::{
    ClientError, CreateFeatureRequest, FeatureBoardClient, FeatureFilter, FeatureStatus,
    UpdateFeatureRequest,
};
use tokio::net::TcpListener;

async fn start_client() -> FeatureBoardClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(
        listener,
        AppState::in_memory().unwrap(),
        std::future::pending(),
    ));
    FeatureBoardClient::new(format!("http://{addr}")).unwrap()
}

fn api_error(err: ClientError) -> (u16, String) {
    match err {
        ClientError::Api { status, message } => (status, message),
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn health_check() {
    let client = start_client().await;
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.message, "FeatureBoard API is running");
}

#[tokio::test]
async fn full_lifecycle_through_client() {
    let client = start_client().await;

    let created = client
        .create_feature(&CreateFeatureRequest {
            description: Some("Per-user theme".into()),
            module: Some("ui".into()),
            priority: Some(4),
            ..CreateFeatureRequest::new("Dark mode")
        })
        .await
        .unwrap();
    assert_eq!(created.title, "Dark mode");
    assert_eq!(created.status, FeatureStatus::Todo);
    assert_eq!(created.priority, 4);

    assert_eq!(client.get_feature(created.id).await.unwrap(), created);

    let updated = client
        .update_feature(
            created.id,
            &UpdateFeatureRequest {
                status: Some(FeatureStatus::Doing),
                description: Some(None),
                ..UpdateFeatureRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, FeatureStatus::Doing);
    assert_eq!(updated.description, None);
    assert_eq!(updated.module, "ui");

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.by_status.doing, 1);
    assert_eq!(stats.by_status.total(), 1);
    assert_eq!(stats.by_module.get("ui"), Some(&1));

    let deleted = client.delete_feature(created.id).await.unwrap();
    assert_eq!(deleted.message, "Feature deleted successfully");

    let (status, message) = api_error(client.get_feature(created.id).await.unwrap_err());
    assert_eq!(status, 404);
    assert_eq!(message, "Feature not found");
}

#[tokio::test]
async fn list_passes_filters() {
    let client = start_client().await;
    for (title, module, status) in [
        ("a", "billing", FeatureStatus::Todo),
        ("b", "billing", FeatureStatus::Done),
        ("c", "search", FeatureStatus::Done),
    ] {
        client
            .create_feature(&CreateFeatureRequest {
                module: Some(module.into()),
                status: Some(status),
                ..CreateFeatureRequest::new(title)
            })
            .await
            .unwrap();
    }

    let all = client.list_features(&FeatureFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let done = client
        .list_features(&FeatureFilter {
            status: Some(FeatureStatus::Done),
            module: Some(String::new()),
        })
        .await
        .unwrap();
    assert_eq!(done.len(), 2);
    assert!(done.iter().all(|f| f.status == FeatureStatus::Done));

    let billing_done = client
        .list_features(&FeatureFilter {
            status: Some(FeatureStatus::Done),
            module: Some("billing".into()),
        })
        .await
        .unwrap();
    assert_eq!(billing_done.len(), 1);
    assert_eq!(billing_done[0].title, "b");
}

#[tokio::test]
async fn server_error_messages_are_raised_verbatim() {
    let client = start_client().await;

    let err = client
        .create_feature(&CreateFeatureRequest::new("   "))
        .await
        .unwrap_err();
    let (status, message) = api_error(err);
    assert_eq!(status, 400);
    assert_eq!(message, "Title is required and must be a non-empty string");

    let err = client
        .create_feature(&CreateFeatureRequest {
            priority: Some(9),
            ..CreateFeatureRequest::new("x")
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Priority must be an integer between 1 and 5");
    assert_eq!(err.status(), Some(400));

    let err = client
        .update_feature(42, &UpdateFeatureRequest::default())
        .await
        .unwrap_err();
    assert_eq!(api_error(err), (404, "Feature not found".to_string()));
}

#[tokio::test]
async fn unreachable_server_is_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = FeatureBoardClient::new(format!("http://{addr}")).unwrap();
    assert!(matches!(
        client.health().await,
        Err(ClientError::Http(_))
    ));
}
