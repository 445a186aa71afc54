use super::support::{file_url, Fixture};
use clap::Parser;
use loadtree::tooling::cli::{Cli, CliContext, Commands};
use std::fs;

fn fixture() -> Fixture {
    let fixture = Fixture::new();
    for artifact in ["d1", "d2", "d3"] {
        fixture.publish("central", artifact);
    }
    fixture
}

#[tokio::test]
async fn apply_yaml_script_json_contract() {
    let fixture = fixture();
    let url = file_url(&fixture.repo_dir("central"));
    let script = fixture.temp.path().join("script.yaml");
    fs::write(
        &script,
        format!(
            r#"
operations:
  - op: create
    request:
      name: libA
      data:
        url: "{url}"
        dependencies:
          - {{ groupId: org.example, artifactId: d1, version: "1.0" }}
          - {{ groupId: org.example, artifactId: d2, version: "1.0" }}
  - op: create
    request:
      name: libB
      parent: libA
      data:
        - url: "{url}"
          proxyPort: "8080"
          dependencies:
            - {{ groupId: org.example, artifactId: d3, version: "1.0" }}
  - op: remove
    name: libB
"#
        ),
    )
    .unwrap();

    let cli = CliContext::with_service(fixture.service());
    let output = cli
        .execute(&Commands::Apply {
            script,
            format: "json".to_string(),
        })
        .await
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let outcomes = parsed["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0]["op"], "create");
    assert_eq!(outcomes[0]["load_path"], 2);
    assert_eq!(outcomes[1]["name"], "libA/libB");
    assert_eq!(outcomes[2]["removed"], 1);

    let contexts = parsed["contexts"].as_array().unwrap();
    assert_eq!(contexts.len(), 1);
    assert_eq!(contexts[0]["name"], "libA");
    assert_eq!(contexts[0]["parent"]["kind"], "none");
}

#[tokio::test]
async fn resolve_json_request_renders_table() {
    let fixture = fixture();
    let request = fixture.temp.path().join("request.json");
    fs::write(
        &request,
        serde_json::json!({
            "name": "lib",
            "data": {
                "id": "central",
                "url": file_url(&fixture.repo_dir("central")),
                "dependencies": [
                    {"groupId": "org.example", "artifactId": "d1", "version": "1.0"}
                ]
            }
        })
        .to_string(),
    )
    .unwrap();

    let cli = CliContext::with_service(fixture.service());
    let output = cli
        .execute(&Commands::Resolve {
            request,
            format: "text".to_string(),
        })
        .await
        .unwrap();

    assert!(output.contains("org.example:d1:jar:1.0"));
    assert!(output.contains("d1-1.0.jar"));
    assert!(cli.service().names().is_empty());
}

#[tokio::test]
async fn toml_request_with_missing_dependencies_is_a_request_error() {
    let fixture = fixture();
    let request = fixture.temp.path().join("request.toml");
    fs::write(&request, "name = \"lib\"\n\n[data]\nid = \"central\"\n").unwrap();

    let cli = CliContext::with_service(fixture.service());
    let err = cli
        .execute(&Commands::Resolve {
            request,
            format: "text".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, loadtree::ApiError::RequestError(_)));
}

#[test]
fn global_flags_fold_into_config() {
    let fixture = Fixture::new();
    let config_path = fixture.temp.path().join("config.toml");
    fs::write(
        &config_path,
        "[store]\nroot = \"/tmp/from-file\"\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();
    let store = fixture.store_dir();

    let cli = Cli::try_parse_from([
        "loadtree".to_string(),
        "--config".to_string(),
        config_path.display().to_string(),
        "--store".to_string(),
        store.display().to_string(),
        "--offline".to_string(),
        "--log-format".to_string(),
        "json".to_string(),
        "store".to_string(),
        "list".to_string(),
    ])
    .unwrap();
    let config = cli.load_config().unwrap();

    assert_eq!(config.store.root, store);
    assert!(config.session.offline);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, "json");
}
