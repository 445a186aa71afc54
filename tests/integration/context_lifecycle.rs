use super::support::{load_path_files, Fixture};
use loadtree::context::Loader;
use loadtree::ParentLink;
use std::sync::Arc;

fn fixture() -> Fixture {
    let fixture = Fixture::new();
    for artifact in ["d1", "d2", "d3", "d4"] {
        fixture.publish("central", artifact);
    }
    fixture
}

#[tokio::test]
async fn nested_contexts_are_removed_with_their_root() {
    let fixture = fixture();
    let service = fixture.service();

    service
        .create(fixture.request("libA", None, &["d1", "d2"]))
        .await
        .unwrap();
    service
        .create(fixture.request("libB", Some("libA"), &["d3"]))
        .await
        .unwrap();

    assert_eq!(service.names(), vec!["libA", "libA/libB"]);
    assert_eq!(load_path_files(&service, "libA"), vec!["d1-1.0.jar", "d2-1.0.jar"]);
    assert_eq!(load_path_files(&service, "libA/libB"), vec!["d3-1.0.jar"]);

    assert_eq!(service.remove("libA"), 2);
    assert!(service.names().is_empty());
    assert_eq!(service.remove("libA"), 0);
}

#[tokio::test]
async fn recreating_a_root_drops_its_descendants() {
    let fixture = fixture();
    let service = fixture.service();

    service
        .create(fixture.request("libA", None, &["d1", "d2"]))
        .await
        .unwrap();
    service
        .create(fixture.request("libB", Some("libA"), &["d3"]))
        .await
        .unwrap();
    service
        .create(fixture.request("libA", None, &["d4"]))
        .await
        .unwrap();

    assert_eq!(service.names(), vec!["libA"]);
    assert_eq!(load_path_files(&service, "libA"), vec!["d4-1.0.jar"]);
}

#[tokio::test]
async fn recreating_a_nested_context_keeps_its_parent() {
    let fixture = fixture();
    let service = fixture.service();

    service.create(fixture.request("libA", None, &["d1"])).await.unwrap();
    service
        .create(fixture.request("libB", Some("libA"), &["d2"]))
        .await
        .unwrap();
    service
        .create(fixture.request("libC", Some("libA/libB"), &["d3"]))
        .await
        .unwrap();
    service
        .create(fixture.request("libB", Some("libA"), &["d4"]))
        .await
        .unwrap();

    assert_eq!(service.names(), vec!["libA", "libA/libB"]);
    assert_eq!(load_path_files(&service, "libA/libB"), vec!["d4-1.0.jar"]);
}

#[tokio::test]
async fn bare_segment_removal_matches_anywhere() {
    let fixture = fixture();
    let service = fixture.service();

    service.create(fixture.request("a", None, &["d1"])).await.unwrap();
    service.create(fixture.request("x", None, &["d1"])).await.unwrap();
    service.create(fixture.request("a", Some("x"), &["d2"])).await.unwrap();

    assert_eq!(service.remove("a"), 2);
    assert_eq!(service.names(), vec!["x"]);
}

#[tokio::test]
async fn host_parent_composes_under_system() {
    let fixture = fixture();
    let service = fixture.service();

    let name = service
        .create(fixture.request("plugin", Some("system"), &["d1"]))
        .await
        .unwrap();

    assert_eq!(name, "system/plugin");
    assert_eq!(service.get(&name).unwrap().parent, ParentLink::Host);
}

#[tokio::test]
async fn child_loader_delegates_to_parent_first() {
    let fixture = fixture();
    let service = fixture.service();

    service.create(fixture.request("libA", None, &["d1"])).await.unwrap();
    service
        .create(fixture.request("libB", Some("libA"), &["d1", "d2"]))
        .await
        .unwrap();

    let (child, parent) = service.with_registry(|registry| {
        (
            registry.get("libA/libB").unwrap().loader(),
            registry.get("libA").unwrap().loader(),
        )
    });
    let found = child.locate("d1-1.0.jar").unwrap();
    assert_eq!(found, parent.load_path()[0]);
    assert!(child.locate("d2-1.0.jar").is_some());
    assert!(parent.locate("d2-1.0.jar").is_none());
}

#[tokio::test]
async fn removed_context_releases_its_loader() {
    let fixture = fixture();
    let service = fixture.service();

    service.create(fixture.request("libA", None, &["d1"])).await.unwrap();
    let loader = service.with_registry(|registry| registry.get("libA").unwrap().loader());
    let weak = Arc::downgrade(&loader);
    drop(loader);

    service.remove("libA");
    assert!(weak.upgrade().is_none());
}
