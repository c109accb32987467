//! Integration test: inspect containers and images in a temporary data root.
//!
//! Builds a data root holding two containers (one with a creation
//! artifact) and one OCI image, then drives both the library entry point
//! and the `a3s-inspect` binary against it.

use std::path::{Path, PathBuf};
use std::process::Command;

use a3s_inspect_cli::commands::inspect;
use a3s_inspect_core::{CreateConfig, InspectionRequest, KindConstraint, CREATE_CONFIG_KEY};
use a3s_inspect_runtime::ContainerRecord;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;

const IMAGE_DIGEST: &str = "sha256:feedbeef";

fn container(root: &Path, id: &str, name: &str, age_minutes: i64) -> ContainerRecord {
    ContainerRecord {
        id: id.to_string(),
        short_id: ContainerRecord::make_short_id(id),
        name: name.to_string(),
        image: "alpine:latest".to_string(),
        image_id: IMAGE_DIGEST.to_string(),
        status: "stopped".to_string(),
        pid: None,
        cmd: vec!["/bin/sh".to_string()],
        volumes: vec![],
        restart_count: 0,
        box_dir: root.join("boxes").join(id),
        created_at: Utc::now() - Duration::minutes(age_minutes),
        started_at: None,
    }
}

/// Write a single-layer OCI layout under `dir`.
fn write_oci_layout(dir: &Path) {
    std::fs::create_dir_all(dir.join("blobs/sha256")).unwrap();
    std::fs::write(dir.join("oci-layout"), r#"{"imageLayoutVersion":"1.0.0"}"#).unwrap();

    let config = json!({
        "architecture": "arm64",
        "os": "linux",
        "config": { "Cmd": ["/bin/sh"], "Env": ["PATH=/bin"] },
        "rootfs": { "type": "layers", "diff_ids": ["sha256:l1"] }
    })
    .to_string();
    std::fs::write(dir.join("blobs/sha256/cfg"), &config).unwrap();

    let manifest = json!({
        "schemaVersion": 2,
        "mediaType": "application/vnd.oci.image.manifest.v1+json",
        "config": {
            "mediaType": "application/vnd.oci.image.config.v1+json",
            "digest": "sha256:cfg",
            "size": config.len()
        },
        "layers": [{
            "mediaType": "application/vnd.oci.image.layer.v1.tar+gzip",
            "digest": "sha256:l1",
            "size": 1
        }]
    })
    .to_string();
    std::fs::write(dir.join("blobs/sha256/man"), &manifest).unwrap();

    let index = json!({
        "schemaVersion": 2,
        "manifests": [{
            "mediaType": "application/vnd.oci.image.manifest.v1+json",
            "digest": "sha256:man",
            "size": manifest.len()
        }]
    });
    std::fs::write(dir.join("index.json"), index.to_string()).unwrap();
}

/// Data root with containers `web` (with artifact) and `worker` (newest,
/// no artifact), and image `alpine:latest`.
fn setup_root() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    let web = container(root, "11111111-aaaa", "web", 10);
    let worker = container(root, "22222222-bbbb", "worker", 1);
    std::fs::create_dir_all(web.artifacts_dir()).unwrap();
    std::fs::create_dir_all(worker.artifacts_dir()).unwrap();

    let create = CreateConfig {
        name: "web".to_string(),
        image: "alpine:latest".to_string(),
        command: vec!["/bin/sh".to_string()],
        env: vec!["MODE=test".to_string()],
        ..Default::default()
    };
    std::fs::write(
        web.artifacts_dir().join(CREATE_CONFIG_KEY),
        serde_json::to_vec(&create).unwrap(),
    )
    .unwrap();

    std::fs::write(
        root.join("boxes.json"),
        serde_json::to_string_pretty(&vec![web, worker]).unwrap(),
    )
    .unwrap();

    let image_dir = root.join("images/sha256/feedbeef");
    write_oci_layout(&image_dir);
    let index = json!({
        "images": [{
            "reference": "docker.io/library/alpine:latest",
            "digest": IMAGE_DIGEST,
            "size_bytes": 2048,
            "pulled_at": Utc::now(),
            "path": image_dir,
        }]
    });
    std::fs::write(root.join("images/index.json"), index.to_string()).unwrap();

    tmp
}

fn request(names: &[&str], kind: KindConstraint) -> InspectionRequest {
    InspectionRequest::new(names.iter().map(|s| s.to_string()).collect(), kind, false, false)
        .unwrap()
}

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_a3s-inspect"))
}

fn run_bin(root: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(bin())
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run a3s-inspect");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

#[tokio::test]
async fn test_container_json_merges_creation_config() {
    let tmp = setup_root();
    let out = inspect(
        Some(tmp.path()),
        &request(&["web"], KindConstraint::ContainerOnly),
        "",
    )
    .await
    .unwrap();

    let parsed: Value = serde_json::from_str(&out).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["Name"], "web");
    assert_eq!(items[0]["ImageID"], IMAGE_DIGEST);
    assert_eq!(items[0]["Config"]["Env"], json!(["MODE=test"]));
    assert!(items[0].get("HostConfig").is_some());
    assert!(items[0].get("SizeRw").is_none());
    assert!(out.ends_with('\n'));
}

#[tokio::test]
async fn test_container_template_image_alias() {
    let tmp = setup_root();
    let out = inspect(
        Some(tmp.path()),
        &request(&["web"], KindConstraint::ContainerOnly),
        "{{.Image}} {{.ImageName}}",
    )
    .await
    .unwrap();
    // live `Image` holds the reference; the alias reads `ImageID`
    assert_eq!(out, format!("{IMAGE_DIGEST} alpine:latest\n"));
}

#[tokio::test]
async fn test_either_falls_back_to_image() {
    let tmp = setup_root();
    let out = inspect(
        Some(tmp.path()),
        &request(&["alpine"], KindConstraint::Either),
        "{{.Id}} {{.Architecture}}",
    )
    .await
    .unwrap();
    assert_eq!(out, format!("{IMAGE_DIGEST} arm64\n"));
}

#[tokio::test]
async fn test_missing_artifact_fails_the_batch() {
    let tmp = setup_root();
    let err = inspect(
        Some(tmp.path()),
        &request(&["worker"], KindConstraint::ContainerOnly),
        "",
    )
    .await
    .unwrap_err();
    assert!(err
        .to_string()
        .starts_with("error reading creation artifact for container 22222222-bbbb"));
}

#[tokio::test]
async fn test_collect_all_policy_from_config_file() {
    let tmp = setup_root();
    std::fs::write(tmp.path().join("inspect.yaml"), "batch_policy: collect-all\n").unwrap();

    let err = inspect(
        Some(tmp.path()),
        &request(&["nope", "web", "ghost"], KindConstraint::ContainerOnly),
        "",
    )
    .await
    .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("\"nope\""));
    assert!(msg.contains("\"ghost\""));
}

#[test]
fn test_binary_image_inspect() {
    let tmp = setup_root();
    let (stdout, stderr, ok) = run_bin(tmp.path(), &["image", "inspect", "alpine"]);
    assert!(ok, "stderr: {stderr}");

    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed[0]["RepoTags"], json!(["docker.io/library/alpine:latest"]));
    assert_eq!(parsed[0]["LayerCount"], 1);
}

#[test]
fn test_binary_latest() {
    let tmp = setup_root();
    let (stdout, _stderr, ok) =
        run_bin(tmp.path(), &["inspect", "--latest", "--format", "{{.Name}}"]);
    // newest container has no creation artifact
    assert!(!ok);
    assert!(stdout.is_empty());

    let (_stdout, stderr, ok) = run_bin(tmp.path(), &["inspect", "--latest", "web"]);
    assert!(!ok);
    assert!(stderr.contains("you cannot provide additional arguments with --latest"));
}

#[test]
fn test_binary_reports_unknown_name() {
    let tmp = setup_root();
    let (stdout, stderr, ok) = run_bin(tmp.path(), &["inspect", "nginx"]);
    assert!(!ok);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Error: error getting image \"nginx\""));
}

#[test]
fn test_binary_rejects_unknown_type() {
    let tmp = setup_root();
    let (_stdout, stderr, ok) = run_bin(tmp.path(), &["inspect", "-t", "volume", "web"]);
    assert!(!ok);
    assert!(stderr.contains("the only recognized types are"));
}

#[test]
fn test_binary_missing_names_reported_before_type() {
    let tmp = setup_root();
    let (_stdout, stderr, ok) = run_bin(tmp.path(), &["inspect", "-t", "bogus"]);
    assert!(!ok);
    assert!(stderr.contains("container or image name must be specified"));
    assert!(!stderr.contains("recognized types"));
}

#[test]
fn test_binary_container_size() {
    let tmp = setup_root();
    let rw = tmp.path().join("boxes/11111111-aaaa/rw");
    std::fs::create_dir_all(&rw).unwrap();
    std::fs::write(rw.join("file"), vec![0u8; 64]).unwrap();

    let (stdout, stderr, ok) = run_bin(
        tmp.path(),
        &["container", "inspect", "-s", "-f", "{{.SizeRw}}", "web"],
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout, "64\n");
}
