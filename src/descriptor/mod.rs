//! Project descriptor (azure.yaml) schema and loading.
//!
//! The descriptor is read-only input to the engine: it is loaded once per
//! invocation and walked by the planner. Mapping-valued fields keep their
//! YAML declaration order because planning order (and therefore strict
//! fail-fast order) follows it.

pub mod loader;
pub mod schema;

pub use loader::{find_descriptor, load_descriptor, parse_descriptor};
pub use schema::{
    DockerConfig, HookSpec, HostKind, Infra, ProjectDescriptor, RequiredVersions, Service,
};
