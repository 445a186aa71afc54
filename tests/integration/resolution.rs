use super::support::{Fixture, GROUP, VERSION};
use loadtree::config::{SessionConfig, UpdatePolicy};
use loadtree::{ApiError, ArtifactCoordinate, ContextRequest, RepositorySpec};

#[tokio::test]
async fn multi_repository_request_keeps_declaration_order() {
    let fixture = Fixture::new();
    fixture.publish("first", "d1");
    fixture.publish("first", "d2");
    fixture.publish("second", "d3");
    let service = fixture.service();

    let spec = RepositorySpec::Many(vec![
        fixture.repo_config("first", &["d2", "d1"]),
        fixture.repo_config("second", &["d3"]),
    ]);
    let resolved = service.resolve(&spec).await.unwrap();

    let ids: Vec<&str> = resolved
        .iter()
        .map(|r| r.coordinate.artifact_id.as_str())
        .collect();
    assert_eq!(ids, vec!["d2", "d1", "d3"]);
    for artifact in &resolved {
        let path = artifact.url.to_file_path().unwrap();
        assert!(path.starts_with(dunce::canonicalize(fixture.store_dir()).unwrap()));
        assert_eq!(
            std::fs::read(path).unwrap(),
            artifact.coordinate.artifact_id.as_bytes()
        );
    }
}

#[tokio::test]
async fn failure_in_later_repository_registers_nothing() {
    let fixture = Fixture::new();
    fixture.publish("first", "d1");
    let service = fixture.service();

    let request = ContextRequest::new(
        "lib",
        None,
        RepositorySpec::Many(vec![
            fixture.repo_config("first", &["d1"]),
            fixture.repo_config("second", &["missing"]),
        ]),
    );
    let err = service.create(request).await.unwrap_err();

    match err {
        ApiError::ResolutionFailure {
            coordinate,
            repository,
            ..
        } => {
            assert_eq!(coordinate, format!("{}:missing:jar:{}", GROUP, VERSION));
            assert_eq!(repository, "second");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!service.contains("lib"));
}

#[tokio::test]
async fn offline_session_uses_only_the_store() {
    let fixture = Fixture::new();
    fixture.publish("central", "d1");

    let online = fixture.service();
    online
        .resolve(&RepositorySpec::One(fixture.repo_config("central", &["d1"])))
        .await
        .unwrap();

    let offline = fixture.service_with(&SessionConfig {
        offline: true,
        ..SessionConfig::default()
    });
    offline
        .resolve(&RepositorySpec::One(fixture.repo_config("central", &["d1"])))
        .await
        .unwrap();

    fixture.publish("central", "d2");
    let err = offline
        .resolve(&RepositorySpec::One(fixture.repo_config("central", &["d2"])))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ResolutionFailure { .. }));
}

#[tokio::test]
async fn update_policy_always_refetches() {
    let fixture = Fixture::new();
    fixture.publish("central", "d1");
    let spec = RepositorySpec::One(fixture.repo_config("central", &["d1"]));

    let service = fixture.service_with(&SessionConfig {
        update_policy: UpdatePolicy::Always,
        ..SessionConfig::default()
    });
    service.resolve(&spec).await.unwrap();

    let coordinate = ArtifactCoordinate::new(GROUP, "d1", VERSION);
    let remote = fixture.repo_dir("central").join(coordinate.relative_path());
    std::fs::write(&remote, b"changed").unwrap();

    let resolved = service.resolve(&spec).await.unwrap();
    let local = resolved[0].url.to_file_path().unwrap();
    assert_eq!(std::fs::read(local).unwrap(), b"changed");
}

#[tokio::test]
async fn unsupported_layout_is_a_resolution_failure() {
    let fixture = Fixture::new();
    fixture.publish("central", "d1");
    let service = fixture.service();

    let mut config = fixture.repo_config("central", &["d1"]);
    config.repo_type = Some("legacy".to_string());
    let err = service
        .resolve(&RepositorySpec::One(config))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ResolutionFailure { cause, .. } if cause.contains("legacy")));
}
