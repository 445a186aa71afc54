use super::support::Fixture;
use loadtree::store::metadata::ArtifactMetadata;
use loadtree::store::PayloadSource;
use loadtree::{ApiError, ArtifactCoordinate};

#[test]
fn install_replaces_content_and_merges_versions() {
    let fixture = Fixture::new();
    let service = fixture.service();
    let v1 = ArtifactCoordinate::new("org.example", "lib", "1.0");
    let v2 = ArtifactCoordinate::new("org.example", "lib", "2.0");

    let first = PayloadSource::from_bytes(b"first").unwrap();
    let first_temp = first.path().to_path_buf();
    let path = service.install(&v1, first).unwrap();
    assert!(!first_temp.exists());

    std::fs::write(path.parent().unwrap().join("stale.txt"), b"x").unwrap();
    let path = service
        .install(&v1, PayloadSource::from_bytes(b"second").unwrap())
        .unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"second");
    assert!(!path.parent().unwrap().join("stale.txt").exists());

    service
        .install(&v2, PayloadSource::from_bytes(b"third").unwrap())
        .unwrap();

    let metadata = ArtifactMetadata::parse(&service.metadata("org.example", "lib").unwrap()).unwrap();
    assert_eq!(metadata.versions, vec!["1.0", "2.0"]);
    assert_eq!(metadata.latest.as_deref(), Some("2.0"));
    assert_eq!(metadata.release.as_deref(), Some("2.0"));
    assert_eq!(metadata.last_updated.as_ref().map(|s| s.len()), Some(14));

    assert_eq!(service.list_installed().unwrap(), vec![v1, v2]);
}

#[test]
fn failed_install_still_disposes_payload() {
    let fixture = Fixture::new();
    let service = fixture.service();

    let payload = PayloadSource::from_bytes(b"jar").unwrap();
    let temp = payload.path().to_path_buf();
    let err = service
        .install(&ArtifactCoordinate::new("org.example", "", "1.0"), payload)
        .unwrap_err();

    assert!(matches!(err, ApiError::InstallFailure { .. }));
    assert!(!temp.exists());
}

#[test]
fn metadata_for_unknown_artifact_is_not_found() {
    let fixture = Fixture::new();
    let service = fixture.service();

    let err = service.metadata("org.example", "nothing").unwrap_err();
    assert!(matches!(
        err,
        ApiError::MetadataNotFound { ref group_id, ref artifact_id }
            if group_id == "org.example" && artifact_id == "nothing"
    ));
}

#[test]
fn installing_a_copy_keeps_the_source_file() {
    let fixture = Fixture::new();
    let service = fixture.service();
    let source = fixture.temp.path().join("lib.jar");
    std::fs::write(&source, b"jar").unwrap();

    service
        .install(
            &ArtifactCoordinate::new("org.example", "lib", "1.0"),
            PayloadSource::copy_of(&source).unwrap(),
        )
        .unwrap();
    assert!(source.exists());
}
