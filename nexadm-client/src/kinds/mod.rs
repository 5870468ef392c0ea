//! Resource descriptors for the administrable kinds.
//!
//! Each descriptor isolates one kind's wire quirks (paths, identity, field
//! translation, conditional suppression) so the reconciler never
//! special-cases a kind by name or path contents.

pub mod blobstore;
pub mod repository;
pub mod routing_rule;
pub mod security;
pub mod system;

use serde_json::Value;

use crate::error::{Error, Result};

/// How the current remote state of one instance is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// List the whole collection and filter with the identity predicate.
    /// More than one match is a contract violation.
    List,
    /// Read `instance_path(id)` directly; 404 means absent. Used where the
    /// collection listing omits the instance configuration.
    Instance,
    /// A single, unnamed configuration object at the collection path.
    Singleton,
}

/// Per-kind adapter consumed by the reconciler.
pub trait ResourceDescriptor: Send + Sync {
    /// Registry and log name, e.g. `routing-rule`.
    fn kind(&self) -> &str;

    /// Endpoint for listing the kind, relative to the base URL.
    fn collection_path(&self) -> String;

    /// Endpoint the creating write is issued against.
    fn create_path(&self) -> String {
        self.collection_path()
    }

    /// Endpoint for one instance, given its URL segment.
    fn instance_path(&self, segment: &str) -> String {
        format!("{}/{}", self.collection_path(), segment)
    }

    /// Endpoint the delete is issued against. Defaults to the instance path;
    /// kinds whose API only deletes at an untyped route override this.
    fn delete_path(&self, segment: &str) -> String {
        self.instance_path(segment)
    }

    fn lookup(&self) -> Lookup {
        Lookup::List
    }

    /// HTTP method for the creating write.
    fn create_method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    /// The identity value of the desired instance, typically its name.
    fn identity(&self, desired: &Value) -> Result<String> {
        desired
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidSpec(format!("{} spec has no 'name'", self.kind())))
    }

    /// Whether a listed item is the instance with the given identity.
    fn matches_identity(&self, identity: &str, item: &Value) -> bool {
        item.get("name").and_then(Value::as_str) == Some(identity)
    }

    /// URL segment addressing the instance for update/delete. Defaults to
    /// the identity; kinds addressed by a server-assigned id override this
    /// and read it from the observed state.
    fn instance_segment(&self, identity: &str, _observed: Option<&Value>) -> String {
        identity.to_string()
    }

    /// Translate the desired spec into the request body for the creating
    /// write. Key renaming and conditional field suppression happen here.
    fn to_wire(&self, desired: &Value) -> Value {
        desired.clone()
    }

    /// Request body for the replacing write. Defaults to the create body.
    fn update_wire(&self, wire: &Value) -> Value {
        wire.clone()
    }

    /// Scrub server-only quirks from the observed state before comparison.
    fn normalize_observed(&self, observed: Value) -> Value {
        observed
    }

    /// Dotted paths of fields the remote never echoes back.
    fn secret_paths(&self) -> &[&str] {
        &[]
    }

    /// Unwrap the instances from a parsed listing body. Handles both a bare
    /// array (wrapped under `json` by the transport) and paged `items`.
    fn items(&self, list_body: &Value) -> Vec<Value> {
        list_body
            .get("json")
            .and_then(Value::as_array)
            .or_else(|| list_body.get("items").and_then(Value::as_array))
            .map(|items| items.to_vec())
            .unwrap_or_default()
    }
}

/// Look up the descriptor for a manifest kind name.
pub fn descriptor_for(kind: &str) -> Option<Box<dyn ResourceDescriptor>> {
    match kind {
        "routing-rule" => Some(Box::new(routing_rule::RoutingRule)),
        "role" => Some(Box::new(security::Role)),
        "user" => Some(Box::new(security::User)),
        "ldap" => Some(Box::new(security::LdapServer)),
        "script" => Some(Box::new(system::Script)),
        "task" => Some(Box::new(system::Task)),
        // Accepted under both spellings; the listing endpoint is plural.
        "capability" | "capabilities" => Some(Box::new(system::Capability)),
        "cleanup-policy" => Some(Box::new(system::CleanupPolicy)),
        "email" => Some(Box::new(system::Email)),
        "blobstore-file" => Some(Box::new(blobstore::FileBlobStore)),
        other => repository::from_kind(other)
            .map(|descriptor| Box::new(descriptor) as Box<dyn ResourceDescriptor>),
    }
}

/// All kind names the registry accepts, for diagnostics.
pub fn known_kinds() -> Vec<String> {
    let mut kinds: Vec<String> = [
        "routing-rule",
        "role",
        "user",
        "ldap",
        "script",
        "task",
        "capability",
        "cleanup-policy",
        "email",
        "blobstore-file",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect();
    kinds.extend(repository::known_kinds());
    kinds
}
