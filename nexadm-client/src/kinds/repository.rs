//! Repository descriptors: one per supported format and variant.
//!
//! All repository kinds share the same convergence shape; what differs is
//! the typed endpoint, the identity predicate (name plus format/type, since
//! the listing spans every format) and a few wire quirks handled in
//! `to_wire`.

use serde_json::{Map, Value};

use super::ResourceDescriptor;
use crate::endpoints;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoVariant {
    Hosted,
    Proxy,
    Group,
}

impl RepoVariant {
    fn as_str(self) -> &'static str {
        match self {
            RepoVariant::Hosted => "hosted",
            RepoVariant::Proxy => "proxy",
            RepoVariant::Group => "group",
        }
    }
}

/// The format/variant combinations the remote API exposes.
const SUPPORTED: &[(&str, &[RepoVariant])] = &[
    ("docker", &[RepoVariant::Group, RepoVariant::Hosted, RepoVariant::Proxy]),
    ("go", &[RepoVariant::Proxy]),
    ("maven", &[RepoVariant::Hosted, RepoVariant::Proxy]),
    ("npm", &[RepoVariant::Group, RepoVariant::Proxy]),
    ("nuget", &[RepoVariant::Hosted, RepoVariant::Proxy]),
    ("p2", &[RepoVariant::Proxy]),
    ("pypi", &[RepoVariant::Group, RepoVariant::Hosted]),
    ("raw", &[RepoVariant::Hosted, RepoVariant::Proxy]),
    ("rubygems", &[RepoVariant::Hosted]),
];

pub struct Repository {
    format: &'static str,
    variant: RepoVariant,
    kind_name: String,
}

impl Repository {
    pub fn new(format: &'static str, variant: RepoVariant) -> Self {
        Self {
            format,
            variant,
            kind_name: format!("repository-{}-{}", format, variant.as_str()),
        }
    }

    fn typed_path(&self) -> String {
        format!(
            "{}/{}/{}",
            endpoints::REPOSITORIES,
            self.format,
            self.variant.as_str()
        )
    }
}

/// Parse a `repository-{format}-{variant}` kind name against the supported
/// matrix.
pub fn from_kind(kind: &str) -> Option<Repository> {
    let rest = kind.strip_prefix("repository-")?;
    let (format, variant) = rest.rsplit_once('-')?;
    let variant = match variant {
        "hosted" => RepoVariant::Hosted,
        "proxy" => RepoVariant::Proxy,
        "group" => RepoVariant::Group,
        _ => return None,
    };
    SUPPORTED
        .iter()
        .find(|(name, variants)| *name == format && variants.contains(&variant))
        .map(|(name, _)| Repository::new(*name, variant))
}

pub fn known_kinds() -> Vec<String> {
    SUPPORTED
        .iter()
        .flat_map(|(format, variants)| {
            variants
                .iter()
                .map(move |variant| format!("repository-{}-{}", format, variant.as_str()))
        })
        .collect()
}

impl ResourceDescriptor for Repository {
    fn kind(&self) -> &str {
        &self.kind_name
    }

    fn collection_path(&self) -> String {
        endpoints::REPOSITORIES.to_string()
    }

    fn create_path(&self) -> String {
        self.typed_path()
    }

    fn instance_path(&self, segment: &str) -> String {
        format!("{}/{}", self.typed_path(), segment)
    }

    fn matches_identity(&self, identity: &str, item: &Value) -> bool {
        item.get("name").and_then(Value::as_str) == Some(identity)
            && item.get("format").and_then(Value::as_str) == Some(self.format)
            && item.get("type").and_then(Value::as_str) == Some(self.variant.as_str())
    }

    fn to_wire(&self, desired: &Value) -> Value {
        let mut wire = camelize_keys(desired);
        if self.variant == RepoVariant::Hosted {
            suppress_latest_policy(&mut wire);
        }
        wire
    }

    fn secret_paths(&self) -> &[&str] {
        match self.variant {
            // Remote-proxy credentials are never echoed back.
            RepoVariant::Proxy => &["httpClient.authentication.password"],
            _ => &[],
        }
    }
}

/// The server only reports `storage.latestPolicy` when `writePolicy` is
/// `ALLOW_ONCE`; declaring it with any other write policy would register as
/// permanent drift, so it is dropped from the wire up front.
fn suppress_latest_policy(wire: &mut Value) {
    let Some(storage) = wire.get_mut("storage").and_then(Value::as_object_mut) else {
        return;
    };
    let write_policy = storage.get("writePolicy").and_then(Value::as_str);
    if write_policy != Some("ALLOW_ONCE") {
        storage.remove("latestPolicy");
    }
}

/// Recursively rename snake_case members to the API's camelCase. Keys with
/// no underscores pass through unchanged, so camelCase manifests work too.
fn camelize_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, member) in map {
                out.insert(camelize(key), camelize_keys(member));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(camelize_keys).collect()),
        other => other.clone(),
    }
}

fn camelize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
