//! Descriptors for system resources: scripts, tasks, capabilities, cleanup
//! policies and the mail server configuration.

use reqwest::Method;
use serde_json::Value;

use super::{Lookup, ResourceDescriptor};
use crate::endpoints;
use crate::error::{Error, Result};

/// Provisioning scripts, addressed by name.
pub struct Script;

impl ResourceDescriptor for Script {
    fn kind(&self) -> &str {
        "script"
    }

    fn collection_path(&self) -> String {
        endpoints::SCRIPTS.to_string()
    }
}

/// Scheduled tasks.
///
/// Tasks are declared by name but addressed on the wire by a server-assigned
/// id, so update and delete take the segment from the observed state.
pub struct Task;

impl ResourceDescriptor for Task {
    fn kind(&self) -> &str {
        "task"
    }

    fn collection_path(&self) -> String {
        endpoints::TASKS.to_string()
    }

    fn instance_segment(&self, identity: &str, observed: Option<&Value>) -> String {
        observed
            .and_then(|item| item.get("id"))
            .and_then(Value::as_str)
            .unwrap_or(identity)
            .to_string()
    }
}

/// Capabilities.
///
/// A capability is identified by its `type` in the listing but addressed on
/// the wire by a server-assigned `id`, like tasks.
pub struct Capability;

impl ResourceDescriptor for Capability {
    fn kind(&self) -> &str {
        "capability"
    }

    fn collection_path(&self) -> String {
        endpoints::CAPABILITIES.to_string()
    }

    fn identity(&self, desired: &Value) -> Result<String> {
        desired
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidSpec("capability spec has no 'type'".to_string()))
    }

    fn matches_identity(&self, identity: &str, item: &Value) -> bool {
        item.get("type").and_then(Value::as_str) == Some(identity)
    }

    fn instance_segment(&self, identity: &str, observed: Option<&Value>) -> String {
        observed
            .and_then(|item| item.get("id"))
            .and_then(Value::as_str)
            .unwrap_or(identity)
            .to_string()
    }
}

/// Cleanup policies, addressed by name.
pub struct CleanupPolicy;

impl ResourceDescriptor for CleanupPolicy {
    fn kind(&self) -> &str {
        "cleanup-policy"
    }

    fn collection_path(&self) -> String {
        endpoints::CLEANUP_POLICIES.to_string()
    }
}

/// The mail server configuration: a single unnamed object that is replaced
/// with PUT and reset with DELETE. The SMTP credential is write-only.
pub struct Email;

impl ResourceDescriptor for Email {
    fn kind(&self) -> &str {
        "email"
    }

    fn collection_path(&self) -> String {
        endpoints::EMAIL.to_string()
    }

    fn instance_path(&self, _segment: &str) -> String {
        self.collection_path()
    }

    fn lookup(&self) -> Lookup {
        Lookup::Singleton
    }

    fn create_method(&self) -> Method {
        Method::PUT
    }

    fn identity(&self, _desired: &Value) -> Result<String> {
        Ok("email".to_string())
    }

    fn secret_paths(&self) -> &[&str] {
        &["password"]
    }
}
