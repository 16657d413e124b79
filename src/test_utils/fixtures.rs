//! Fluent builders for manifests and artifacts used in tests.
//!
//! ```rust,no_run
//! use artibind::test_utils::{ContainerBuilder, WorkloadBuilder};
//!
//! let deployment = WorkloadBuilder::deployment("web")
//!     .namespace("staging")
//!     .container(ContainerBuilder::new("web", "nginx:1.18.0").env_from_config_map("web-config"))
//!     .config_map_volume("settings", "web-settings")
//!     .build();
//! ```

use crate::artifact::{Artifact, ArtifactType};
use crate::constants::ACCOUNT_METADATA_KEY;
use crate::manifest::KubernetesManifest;
use serde_json::{Map, Value, json};

/// Builder for one container entry.
#[derive(Debug, Clone)]
pub struct ContainerBuilder {
    name: String,
    image: Option<String>,
    env_from: Vec<Value>,
    env: Vec<Value>,
}

impl ContainerBuilder {
    /// Container with a name and image.
    pub fn new(name: &str, image: &str) -> Self {
        Self {
            image: Some(image.to_string()),
            ..Self::without_image(name)
        }
    }

    /// Container with no `image` field.
    pub fn without_image(name: &str) -> Self {
        Self {
            name: name.to_string(),
            image: None,
            env_from: Vec::new(),
            env: Vec::new(),
        }
    }

    /// `envFrom: [{configMapRef: {name}}]`
    pub fn env_from_config_map(mut self, config_map: &str) -> Self {
        self.env_from.push(json!({ "configMapRef": { "name": config_map } }));
        self
    }

    /// `envFrom: [{secretRef: {name}}]`
    pub fn env_from_secret(mut self, secret: &str) -> Self {
        self.env_from.push(json!({ "secretRef": { "name": secret } }));
        self
    }

    /// An env var read from a config map key.
    pub fn config_map_key_env(mut self, var: &str, config_map: &str, key: &str) -> Self {
        self.env.push(json!({
            "name": var,
            "valueFrom": { "configMapKeyRef": { "name": config_map, "key": key } }
        }));
        self
    }

    /// An env var read from a secret key.
    pub fn secret_key_env(mut self, var: &str, secret: &str, key: &str) -> Self {
        self.env.push(json!({
            "name": var,
            "valueFrom": { "secretKeyRef": { "name": secret, "key": key } }
        }));
        self
    }

    /// A literal env var.
    pub fn literal_env(mut self, var: &str, value: &str) -> Self {
        self.env.push(json!({ "name": var, "value": value }));
        self
    }

    fn into_value(self) -> Value {
        let mut container = Map::new();
        container.insert("name".into(), Value::String(self.name));
        if let Some(image) = self.image {
            container.insert("image".into(), Value::String(image));
        }
        if !self.env_from.is_empty() {
            container.insert("envFrom".into(), Value::Array(self.env_from));
        }
        if !self.env.is_empty() {
            container.insert("env".into(), Value::Array(self.env));
        }
        Value::Object(container)
    }
}

#[derive(Debug, Clone, Copy)]
enum PodSpecAt {
    Spec,
    Template,
    JobTemplate,
}

/// Builder for a workload with a pod spec.
#[derive(Debug, Clone)]
pub struct WorkloadBuilder {
    api_version: &'static str,
    kind: &'static str,
    name: String,
    namespace: Option<String>,
    at: PodSpecAt,
    containers: Vec<Value>,
    init_containers: Vec<Value>,
    volumes: Vec<Value>,
}

impl WorkloadBuilder {
    fn new(api_version: &'static str, kind: &'static str, name: &str, at: PodSpecAt) -> Self {
        Self {
            api_version,
            kind,
            name: name.to_string(),
            namespace: None,
            at,
            containers: Vec::new(),
            init_containers: Vec::new(),
            volumes: Vec::new(),
        }
    }

    /// `apps/v1` Deployment
    pub fn deployment(name: &str) -> Self {
        Self::new("apps/v1", "Deployment", name, PodSpecAt::Template)
    }

    /// `apps/v1` ReplicaSet
    pub fn replica_set(name: &str) -> Self {
        Self::new("apps/v1", "ReplicaSet", name, PodSpecAt::Template)
    }

    /// `apps/v1` StatefulSet
    pub fn stateful_set(name: &str) -> Self {
        Self::new("apps/v1", "StatefulSet", name, PodSpecAt::Template)
    }

    /// `apps/v1` DaemonSet
    pub fn daemon_set(name: &str) -> Self {
        Self::new("apps/v1", "DaemonSet", name, PodSpecAt::Template)
    }

    /// `batch/v1` Job
    pub fn job(name: &str) -> Self {
        Self::new("batch/v1", "Job", name, PodSpecAt::Template)
    }

    /// `batch/v1` CronJob
    pub fn cron_job(name: &str) -> Self {
        Self::new("batch/v1", "CronJob", name, PodSpecAt::JobTemplate)
    }

    /// `v1` Pod
    pub fn pod(name: &str) -> Self {
        Self::new("v1", "Pod", name, PodSpecAt::Spec)
    }

    /// Set `metadata.namespace`.
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    /// Append a container.
    pub fn container(mut self, container: ContainerBuilder) -> Self {
        self.containers.push(container.into_value());
        self
    }

    /// Append an init container.
    pub fn init_container(mut self, container: ContainerBuilder) -> Self {
        self.init_containers.push(container.into_value());
        self
    }

    /// Append a config map volume.
    pub fn config_map_volume(mut self, volume: &str, config_map: &str) -> Self {
        self.volumes.push(json!({ "name": volume, "configMap": { "name": config_map } }));
        self
    }

    /// Append a secret volume.
    pub fn secret_volume(mut self, volume: &str, secret: &str) -> Self {
        self.volumes.push(json!({ "name": volume, "secret": { "secretName": secret } }));
        self
    }

    /// Append a projected volume sourcing the given config maps and secrets.
    pub fn projected_volume(mut self, volume: &str, config_maps: &[&str], secrets: &[&str]) -> Self {
        let sources: Vec<Value> = config_maps
            .iter()
            .map(|name| json!({ "configMap": { "name": name } }))
            .chain(secrets.iter().map(|name| json!({ "secret": { "name": name } })))
            .collect();
        self.volumes.push(json!({ "name": volume, "projected": { "sources": sources } }));
        self
    }

    /// Build the manifest.
    pub fn build(self) -> KubernetesManifest {
        let mut pod_spec = Map::new();
        if !self.init_containers.is_empty() {
            pod_spec.insert("initContainers".into(), Value::Array(self.init_containers));
        }
        pod_spec.insert("containers".into(), Value::Array(self.containers));
        if !self.volumes.is_empty() {
            pod_spec.insert("volumes".into(), Value::Array(self.volumes));
        }
        let pod_spec = Value::Object(pod_spec);

        let spec = match self.at {
            PodSpecAt::Spec => pod_spec,
            PodSpecAt::Template => json!({ "template": { "spec": pod_spec } }),
            PodSpecAt::JobTemplate => {
                json!({ "schedule": "*/5 * * * *", "jobTemplate": { "spec": { "template": { "spec": pod_spec } } } })
            }
        };

        let mut metadata = json!({ "name": self.name });
        if let Some(namespace) = self.namespace {
            metadata["namespace"] = Value::String(namespace);
        }

        KubernetesManifest::from_value(json!({
            "apiVersion": self.api_version,
            "kind": self.kind,
            "metadata": metadata,
            "spec": spec,
        }))
        .expect("workload root is a mapping")
    }
}

/// A `HorizontalPodAutoscaler` targeting `kind`/`name`.
pub fn hpa(target_kind: &str, target_name: &str) -> KubernetesManifest {
    KubernetesManifest::from_value(json!({
        "apiVersion": "autoscaling/v2",
        "kind": "HorizontalPodAutoscaler",
        "metadata": { "name": format!("{target_name}-hpa") },
        "spec": {
            "scaleTargetRef": { "apiVersion": "apps/v1", "kind": target_kind, "name": target_name },
            "minReplicas": 1,
            "maxReplicas": 5
        }
    }))
    .expect("autoscaler root is a mapping")
}

/// A docker image artifact.
pub fn image_artifact(name: &str, reference: &str) -> Artifact {
    Artifact::builder().artifact_type(ArtifactType::DockerImage).name(name).reference(reference).build()
}

/// A `kubernetes/*` artifact, optionally scoped to a namespace and account.
pub fn kubernetes_artifact(
    artifact_type: ArtifactType,
    name: &str,
    reference: &str,
    location: Option<&str>,
    account: Option<&str>,
) -> Artifact {
    let mut builder = Artifact::builder().artifact_type(artifact_type).name(name).reference(reference);
    if let Some(location) = location {
        builder = builder.location(location);
    }
    if let Some(account) = account {
        builder = builder.put_metadata(ACCOUNT_METADATA_KEY, account);
    }
    builder.build()
}
