//! Endpoint table for the Nexus administrative REST API.
//!
//! Paths are relative to the configured base URL. Descriptors reference
//! these constants; nothing in the engine branches on path contents.

pub const ROUTING_RULES: &str = "service/rest/v1/routing-rules";
pub const ROLES: &str = "service/rest/v1/security/roles";
pub const USERS: &str = "service/rest/v1/security/users";
pub const LDAP_SERVERS: &str = "service/rest/v1/security/ldap";
pub const SCRIPTS: &str = "service/rest/v1/script";
pub const TASKS: &str = "service/rest/v1/tasks";
pub const CLEANUP_POLICIES: &str = "service/rest/v1/cleanup-policies";
pub const BLOBSTORES: &str = "service/rest/v1/blobstores";
pub const CAPABILITIES: &str = "service/rest/v1/capabilities";
pub const EMAIL: &str = "service/rest/v1/email";
pub const REPOSITORIES: &str = "service/rest/v1/repositories";
