//! Reference discovery across workload kinds and pod spec fields.

use artibind::artifact::ArtifactType;
use artibind::manifest::KubernetesManifest;
use artibind::replacer::{ArtifactReplacer, DockerImageBinding, Replacer};
use artibind::test_utils::{ContainerBuilder, WorkloadBuilder, hpa, image_artifact, kubernetes_artifact};

fn names_of(replacer: &ArtifactReplacer, manifest: &KubernetesManifest, artifact_type: &ArtifactType) -> Vec<String> {
    replacer
        .find_all(manifest)
        .into_iter()
        .filter(|a| a.artifact_type() == artifact_type)
        .map(|a| a.name().to_string())
        .collect()
}

#[test]
fn every_workload_kind_is_scanned() {
    let workloads = [
        WorkloadBuilder::pod("w"),
        WorkloadBuilder::deployment("w"),
        WorkloadBuilder::replica_set("w"),
        WorkloadBuilder::stateful_set("w"),
        WorkloadBuilder::daemon_set("w"),
        WorkloadBuilder::job("w"),
        WorkloadBuilder::cron_job("w"),
    ];

    let replacer = ArtifactReplacer::kubernetes_default();
    for workload in workloads {
        let manifest = workload.container(ContainerBuilder::new("c", "busybox:1.36")).build();
        assert_eq!(
            names_of(&replacer, &manifest, &ArtifactType::DockerImage),
            vec!["busybox"],
            "{}",
            manifest.full_resource_name()
        );
    }
}

#[test]
fn every_container_is_rewritten() {
    let deployment = WorkloadBuilder::deployment("web")
        .init_container(ContainerBuilder::new("migrate", "app:1.0"))
        .container(ContainerBuilder::new("web", "app:1.0"))
        .container(ContainerBuilder::new("sidecar", "envoy:1.27"))
        .container(ContainerBuilder::new("worker", "app"))
        .build();

    let result = ArtifactReplacer::kubernetes_default().replace_all(
        DockerImageBinding::MatchNameAndTag,
        &deployment,
        &[image_artifact("app", "app:2.0")],
        "",
        "",
    );

    let manifest = &result.manifest;
    assert_eq!(manifest.get_str("spec.template.spec.initContainers.0.image"), Some("app:2.0"));
    assert_eq!(manifest.get_str("spec.template.spec.containers.0.image"), Some("app:2.0"));
    assert_eq!(manifest.get_str("spec.template.spec.containers.1.image"), Some("envoy:1.27"));
    assert_eq!(manifest.get_str("spec.template.spec.containers.2.image"), Some("app:2.0"));
    assert_eq!(result.bound_artifacts.len(), 1);
}

#[test]
fn containers_without_images_are_skipped() {
    let pod = WorkloadBuilder::pod("p")
        .container(ContainerBuilder::without_image("a"))
        .container(ContainerBuilder::new("b", "nginx"))
        .build();
    let found = ArtifactReplacer::new(vec![Replacer::docker_image()]).find_all(&pod);
    assert_eq!(found.len(), 1);
}

#[test]
fn config_map_and_secret_references_everywhere() {
    let stateful_set = WorkloadBuilder::stateful_set("db")
        .container(
            ContainerBuilder::new("db", "postgres:16")
                .env_from_config_map("db-env")
                .env_from_secret("db-env-secret")
                .config_map_key_env("MODE", "db-settings", "mode")
                .secret_key_env("PASSWORD", "db-password", "password")
                .literal_env("PLAIN", "value"),
        )
        .config_map_volume("conf", "db-conf")
        .secret_volume("tls", "db-tls")
        .projected_volume("bundle", &["bundle-cm"], &["bundle-secret"])
        .build();

    let replacer = ArtifactReplacer::kubernetes_default();
    assert_eq!(
        names_of(&replacer, &stateful_set, &ArtifactType::ConfigMap),
        vec!["bundle-cm", "db-conf", "db-env", "db-settings"]
    );
    assert_eq!(
        names_of(&replacer, &stateful_set, &ArtifactType::Secret),
        vec!["bundle-secret", "db-env-secret", "db-password", "db-tls"]
    );
}

#[test]
fn secret_references_are_rewritten_in_place() {
    let job = WorkloadBuilder::job("migrate")
        .container(ContainerBuilder::new("m", "migrate:1").secret_key_env("TOKEN", "api-token", "token"))
        .secret_volume("creds", "api-token")
        .build();
    let pool = [kubernetes_artifact(ArtifactType::Secret, "api-token", "api-token-v009", Some("batch"), None)];

    let result = ArtifactReplacer::kubernetes_default().replace_all(
        DockerImageBinding::MatchNameAndTag,
        &job,
        &pool,
        "batch",
        "acct",
    );

    let manifest = &result.manifest;
    assert_eq!(
        manifest.get_str("spec.template.spec.containers.0.env.0.valueFrom.secretKeyRef.name"),
        Some("api-token-v009")
    );
    assert_eq!(manifest.get_str("spec.template.spec.containers.0.env.0.valueFrom.secretKeyRef.key"), Some("token"));
    assert_eq!(manifest.get_str("spec.template.spec.volumes.0.secret.secretName"), Some("api-token-v009"));
    assert_eq!(result.bound_artifacts.len(), 1);
}

#[test]
fn config_map_artifact_does_not_bind_secret_of_same_name() {
    let pod = WorkloadBuilder::pod("p")
        .container(ContainerBuilder::new("c", "nginx").env_from_secret("shared"))
        .build();
    let pool = [kubernetes_artifact(ArtifactType::ConfigMap, "shared", "shared-v002", None, None)];

    let result =
        ArtifactReplacer::kubernetes_default().replace_all(DockerImageBinding::MatchNameAndTag, &pod, &pool, "", "");
    assert_eq!(result.manifest, pod);
    assert!(result.bound_artifacts.is_empty());
}

#[test]
fn scale_target_kinds() {
    let replacer = ArtifactReplacer::kubernetes_default();
    assert_eq!(names_of(&replacer, &hpa("ReplicaSet", "rs"), &ArtifactType::ReplicaSet), vec!["rs"]);
    assert_eq!(names_of(&replacer, &hpa("StatefulSet", "ss"), &ArtifactType::StatefulSet), vec!["ss"]);
    assert!(replacer.find_all(&hpa("DaemonSet", "ds")).is_empty());
}

#[test]
fn manifests_without_references_find_nothing() {
    let config_map = KubernetesManifest::parse("apiVersion: v1\nkind: ConfigMap\nmetadata: { name: c }\ndata: { k: v }\n")
        .unwrap();
    assert!(ArtifactReplacer::kubernetes_default().find_all(&config_map).is_empty());
}
