//! Routing rule descriptor.

use super::ResourceDescriptor;
use crate::endpoints;

/// Routing rules are the simplest kind: exact-name identity, no secrets,
/// wire shape identical to the declared spec.
pub struct RoutingRule;

impl ResourceDescriptor for RoutingRule {
    fn kind(&self) -> &str {
        "routing-rule"
    }

    fn collection_path(&self) -> String {
        endpoints::ROUTING_RULES.to_string()
    }
}
