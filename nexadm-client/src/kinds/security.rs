//! Descriptors for security resources: roles, users, LDAP servers.

use serde_json::Value;

use super::ResourceDescriptor;
use crate::endpoints;
use crate::error::{Error, Result};

/// Roles are addressed by their `id`, not their display name.
pub struct Role;

impl ResourceDescriptor for Role {
    fn kind(&self) -> &str {
        "role"
    }

    fn collection_path(&self) -> String {
        endpoints::ROLES.to_string()
    }

    fn identity(&self, desired: &Value) -> Result<String> {
        desired
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidSpec("role spec has no 'id'".to_string()))
    }

    fn matches_identity(&self, identity: &str, item: &Value) -> bool {
        item.get("id").and_then(Value::as_str) == Some(identity)
    }
}

/// Users are addressed by `userId`. The password is write-only: the server
/// never returns it, so a non-empty password in the spec always forces an
/// update.
pub struct User;

impl ResourceDescriptor for User {
    fn kind(&self) -> &str {
        "user"
    }

    fn collection_path(&self) -> String {
        endpoints::USERS.to_string()
    }

    fn identity(&self, desired: &Value) -> Result<String> {
        desired
            .get("userId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidSpec("user spec has no 'userId'".to_string()))
    }

    fn matches_identity(&self, identity: &str, item: &Value) -> bool {
        item.get("userId").and_then(Value::as_str) == Some(identity)
    }

    fn secret_paths(&self) -> &[&str] {
        &["password"]
    }
}

/// LDAP server bindings. The bind credential is write-only.
pub struct LdapServer;

impl ResourceDescriptor for LdapServer {
    fn kind(&self) -> &str {
        "ldap"
    }

    fn collection_path(&self) -> String {
        endpoints::LDAP_SERVERS.to_string()
    }

    fn secret_paths(&self) -> &[&str] {
        &["authPassword"]
    }
}
