use crate::common::{DEPLOYMENT_YAML, HPA_YAML, POOL_YAML, TestProject};
use anyhow::Result;
use artibind::manifest::KubernetesManifest;

fn setup() -> Result<TestProject> {
    let project = TestProject::new()?;
    project.write_file("deployment.yaml", DEPLOYMENT_YAML)?;
    project.write_file("pool.yaml", POOL_YAML)?;
    Ok(project)
}

#[test]
fn test_replace_binds_pool_into_manifest() -> Result<()> {
    let project = setup()?;

    let output = project.run_artibind(&[
        "replace",
        "deployment.yaml",
        "--artifacts",
        "pool.yaml",
        "--account",
        "my-account",
    ])?;
    output
        .assert_success()
        .assert_stderr_contains("Bound 3 artifact(s)")
        .assert_stderr_contains("docker/image nginx -> nginx:1.19.1");

    let manifest = KubernetesManifest::parse(&output.stdout)?;
    assert_eq!(manifest.get_str("spec.template.spec.containers.0.image"), Some("nginx:1.19.1"));
    assert_eq!(
        manifest.get_str("spec.template.spec.containers.0.envFrom.0.configMapRef.name"),
        Some("my-config-map-v003")
    );
    assert_eq!(manifest.get_str("spec.template.spec.volumes.0.secret.secretName"), Some("my-secret-v001"));
    Ok(())
}

#[test]
fn test_replace_respects_account_scope() -> Result<()> {
    let project = setup()?;

    let output = project.run_artibind(&[
        "replace",
        "deployment.yaml",
        "--artifacts",
        "pool.yaml",
        "--account",
        "other-account",
    ])?;
    output.assert_success().assert_stderr_contains("Bound 2 artifact(s)");

    let manifest = KubernetesManifest::parse(&output.stdout)?;
    assert_eq!(
        manifest.get_str("spec.template.spec.containers.0.envFrom.0.configMapRef.name"),
        Some("my-config-map")
    );
    Ok(())
}

#[test]
fn test_replace_match_name_only_keeps_tagged_image() -> Result<()> {
    let project = setup()?;

    let output = project.run_artibind(&[
        "replace",
        "deployment.yaml",
        "--artifacts",
        "pool.yaml",
        "--binding",
        "match-name-only",
    ])?;
    output.assert_success();

    let manifest = KubernetesManifest::parse(&output.stdout)?;
    assert_eq!(manifest.get_str("spec.template.spec.containers.0.image"), Some("nginx:1.18.0"));
    Ok(())
}

#[test]
fn test_replace_writes_output_file_as_json() -> Result<()> {
    let project = setup()?;

    project
        .run_artibind(&[
            "--quiet",
            "replace",
            "deployment.yaml",
            "--artifacts",
            "pool.yaml",
            "--format",
            "json",
            "--output",
            "bound.json",
        ])?
        .assert_success();

    let written: serde_json::Value = serde_json::from_str(&project.read_file("bound.json")?)?;
    assert_eq!(written["spec"]["template"]["spec"]["containers"][0]["image"], "nginx:1.19.1");
    Ok(())
}

#[test]
fn test_replace_multi_document_leaves_autoscaler_alone() -> Result<()> {
    let project = setup()?;
    project.write_file("bundle.yaml", &format!("{DEPLOYMENT_YAML}---\n{HPA_YAML}"))?;

    let output = project.run_artibind(&["replace", "bundle.yaml", "--artifacts", "pool.yaml"])?;
    output.assert_success();

    let documents = KubernetesManifest::parse_documents(&output.stdout, "stdout")?;
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[1].get_str("spec.scaleTargetRef.name"), Some("my-app-deployment"));
    Ok(())
}

#[test]
fn test_replace_with_empty_pool_is_identity() -> Result<()> {
    let project = setup()?;
    project.write_file("empty.yaml", "[]\n")?;

    let output = project.run_artibind(&["replace", "deployment.yaml", "--artifacts", "empty.yaml"])?;
    output.assert_success().assert_stderr_contains("No artifacts bound");

    let original = KubernetesManifest::parse(DEPLOYMENT_YAML)?;
    assert_eq!(KubernetesManifest::parse(&output.stdout)?, original);
    Ok(())
}
