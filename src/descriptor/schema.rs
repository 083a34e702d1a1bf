//! Descriptor schema types.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;

/// Default infrastructure provider when the descriptor is silent.
pub const DEFAULT_INFRA_PROVIDER: &str = "bicep";

/// The parsed project descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectDescriptor {
    /// Project name, for display only.
    #[serde(default)]
    pub name: String,

    /// Services in declaration order.
    #[serde(default, deserialize_with = "ordered_map")]
    pub services: Vec<(String, Service)>,

    /// Project-level lifecycle hooks in declaration order.
    #[serde(default, deserialize_with = "ordered_map")]
    pub hooks: Vec<(String, HookSpec)>,

    /// Infrastructure configuration.
    #[serde(default)]
    pub infra: Infra,

    /// Version requirements declared by the project.
    #[serde(default, rename = "requiredVersions")]
    pub required_versions: RequiredVersions,
}

impl ProjectDescriptor {
    /// The effective infra provider: the declared one, or bicep.
    pub fn infra_provider(&self) -> &str {
        if self.infra.provider.is_empty() {
            DEFAULT_INFRA_PROVIDER
        } else {
            &self.infra.provider
        }
    }
}

/// Infrastructure section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Infra {
    #[serde(default)]
    pub provider: String,
}

/// Version requirements: the orchestrating CLI's own range plus required
/// extensions (id → comparator range), in declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequiredVersions {
    #[serde(default)]
    pub azd: String,

    #[serde(default, deserialize_with = "ordered_map")]
    pub extensions: Vec<(String, String)>,
}

/// One service entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Service {
    /// Implementation language (open set; unrecognized values plan nothing).
    #[serde(default)]
    pub language: String,

    /// Hosting target.
    #[serde(default)]
    pub host: HostKind,

    /// Source path, for display only.
    #[serde(default)]
    pub project: String,

    /// Pre-built container image. Non-empty exempts the service from
    /// local build tooling requirements.
    #[serde(default)]
    pub image: String,

    /// Service-level lifecycle hooks in declaration order.
    #[serde(default, deserialize_with = "ordered_map")]
    pub hooks: Vec<(String, HookSpec)>,

    /// Docker build configuration.
    #[serde(default)]
    pub docker: DockerConfig,
}

/// Hosting targets the planner understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    Containerapp,
    Aks,
    Function,
    Staticwebapp,
    #[serde(other)]
    #[default]
    Other,
}

impl HostKind {
    /// Whether the service's artifact is a container image built locally.
    pub fn is_container_host(self) -> bool {
        matches!(self, HostKind::Containerapp | HostKind::Aks)
    }
}

/// Docker build configuration for a service.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DockerConfig {
    /// Build remotely; no local container tooling required.
    #[serde(default)]
    pub remote: bool,
}

/// A lifecycle hook: a command plus an optional shell override.
///
/// Accepts both YAML shapes the descriptor allows:
///
/// ```yaml
/// hooks:
///   prebuild: ./scripts/generate.sh          # bare command
///   predeploy:
///     shell: pwsh                             # full form
///     run: ./scripts/stamp.ps1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookSpec {
    /// Shell to run under. Absent means the OS default.
    pub shell: Option<String>,
    /// The command to run.
    pub run: String,
}

impl<'de> Deserialize<'de> for HookSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Command(String),
            Full {
                #[serde(default)]
                shell: Option<String>,
                #[serde(default)]
                run: String,
            },
        }

        match Raw::deserialize(deserializer)? {
            Raw::Command(run) => Ok(HookSpec { shell: None, run }),
            Raw::Full { shell, run } => Ok(HookSpec { shell, run }),
        }
    }
}

/// Deserialize a YAML mapping into a `Vec<(String, T)>`, preserving
/// declaration order.
fn ordered_map<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct OrderedMapVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a mapping")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DESCRIPTOR: &str = r#"
name: todo-app
services:
  web:
    language: ts
    host: containerapp
    project: ./src/web
  api:
    language: python
    host: function
    project: ./src/api
    hooks:
      prebuild: ./scripts/codegen.sh
hooks:
  preprovision:
    shell: pwsh
    run: ./scripts/stamp.ps1
  predeploy: ./scripts/notify.sh
infra:
  provider: terraform
requiredVersions:
  azd: ">= 1.10.0"
  extensions:
    azure.ai: ">= 0.3.0"
    azure.data: "~1.2"
"#;

    #[test]
    fn parses_full_descriptor() {
        let d: ProjectDescriptor = serde_yaml::from_str(FULL_DESCRIPTOR).unwrap();
        assert_eq!(d.name, "todo-app");
        assert_eq!(d.services.len(), 2);
        assert_eq!(d.infra_provider(), "terraform");
        assert_eq!(d.required_versions.azd, ">= 1.10.0");
    }

    #[test]
    fn services_keep_declaration_order() {
        let d: ProjectDescriptor = serde_yaml::from_str(FULL_DESCRIPTOR).unwrap();
        assert_eq!(d.services[0].0, "web");
        assert_eq!(d.services[1].0, "api");
    }

    #[test]
    fn extensions_keep_declaration_order() {
        let d: ProjectDescriptor = serde_yaml::from_str(FULL_DESCRIPTOR).unwrap();
        let ids: Vec<&str> = d
            .required_versions
            .extensions
            .iter()
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(ids, vec!["azure.ai", "azure.data"]);
    }

    #[test]
    fn hook_bare_string_form() {
        let d: ProjectDescriptor = serde_yaml::from_str(FULL_DESCRIPTOR).unwrap();
        let (name, hook) = &d.hooks[1];
        assert_eq!(name, "predeploy");
        assert_eq!(hook.shell, None);
        assert_eq!(hook.run, "./scripts/notify.sh");
    }

    #[test]
    fn hook_full_form() {
        let d: ProjectDescriptor = serde_yaml::from_str(FULL_DESCRIPTOR).unwrap();
        let (name, hook) = &d.hooks[0];
        assert_eq!(name, "preprovision");
        assert_eq!(hook.shell.as_deref(), Some("pwsh"));
        assert_eq!(hook.run, "./scripts/stamp.ps1");
    }

    #[test]
    fn service_level_hooks_parse() {
        let d: ProjectDescriptor = serde_yaml::from_str(FULL_DESCRIPTOR).unwrap();
        let api = &d.services[1].1;
        assert_eq!(api.hooks.len(), 1);
        assert_eq!(api.hooks[0].1.run, "./scripts/codegen.sh");
    }

    #[test]
    fn host_kind_parses_known_values() {
        let d: ProjectDescriptor = serde_yaml::from_str(FULL_DESCRIPTOR).unwrap();
        assert_eq!(d.services[0].1.host, HostKind::Containerapp);
        assert_eq!(d.services[1].1.host, HostKind::Function);
        assert!(d.services[0].1.host.is_container_host());
        assert!(!d.services[1].1.host.is_container_host());
    }

    #[test]
    fn unknown_host_kind_maps_to_other() {
        let yaml = "services:\n  app:\n    host: appservice\n";
        let d: ProjectDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(d.services[0].1.host, HostKind::Other);
    }

    #[test]
    fn infra_provider_defaults_to_bicep() {
        let d: ProjectDescriptor = serde_yaml::from_str("name: bare").unwrap();
        assert_eq!(d.infra_provider(), "bicep");
    }

    #[test]
    fn docker_remote_defaults_false() {
        let yaml = "services:\n  web:\n    host: containerapp\n";
        let d: ProjectDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert!(!d.services[0].1.docker.remote);
    }

    #[test]
    fn docker_remote_parses() {
        let yaml = "services:\n  web:\n    host: aks\n    docker:\n      remote: true\n";
        let d: ProjectDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert!(d.services[0].1.docker.remote);
    }

    #[test]
    fn empty_descriptor_is_valid() {
        let d: ProjectDescriptor = serde_yaml::from_str("{}").unwrap();
        assert!(d.services.is_empty());
        assert!(d.hooks.is_empty());
        assert!(d.required_versions.extensions.is_empty());
    }
}
