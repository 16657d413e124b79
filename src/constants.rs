//! Global constants used throughout the artibind codebase.
//!
//! Names of configuration files, environment variables and well-known
//! artifact metadata keys are defined here so that the CLI, the configuration
//! layer and the binding policy agree on them.

/// Name of the configuration file inside the artibind config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name used under the home directory (`~/.artibind`).
pub const CONFIG_DIR_NAME: &str = ".artibind";

/// Directory name used under the local data directory on Windows.
pub const WINDOWS_CONFIG_DIR_NAME: &str = "artibind";

/// Environment variable that points at an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "ARTIBIND_CONFIG";

/// Environment variable overriding the docker image binding mode.
pub const DOCKER_IMAGE_BINDING_ENV: &str = "ARTIBIND_DOCKER_IMAGE_BINDING";

/// Artifact metadata key holding the account an artifact belongs to.
pub const ACCOUNT_METADATA_KEY: &str = "account";

/// Prefix shared by every cluster-internal artifact type.
///
/// Only artifacts with this prefix are subject to namespace and account
/// scoping during binding.
pub const KUBERNETES_TYPE_PREFIX: &str = "kubernetes/";
