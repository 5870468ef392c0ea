//! File blob store descriptor.

use serde_json::Value;

use super::{Lookup, ResourceDescriptor};
use crate::endpoints;

/// File-backed blob stores.
///
/// The collection listing only reports usage statistics, so the current
/// configuration is read from the typed instance endpoint instead. Update
/// requests must not carry `name`; the instance read does not return it
/// either, so it is also dropped before comparison.
pub struct FileBlobStore;

impl FileBlobStore {
    fn typed_path(&self) -> String {
        format!("{}/file", endpoints::BLOBSTORES)
    }
}

impl ResourceDescriptor for FileBlobStore {
    fn kind(&self) -> &str {
        "blobstore-file"
    }

    fn collection_path(&self) -> String {
        endpoints::BLOBSTORES.to_string()
    }

    fn create_path(&self) -> String {
        self.typed_path()
    }

    fn instance_path(&self, segment: &str) -> String {
        format!("{}/{}", self.typed_path(), segment)
    }

    // Reads and updates are typed; the API has no typed DELETE route.
    fn delete_path(&self, segment: &str) -> String {
        format!("{}/{}", endpoints::BLOBSTORES, segment)
    }

    fn lookup(&self) -> Lookup {
        Lookup::Instance
    }

    fn to_wire(&self, desired: &Value) -> Value {
        let mut wire = desired.clone();
        if let Some(map) = wire.as_object_mut() {
            // The store path defaults to the store name.
            if !map.contains_key("path") {
                if let Some(name) = map.get("name").cloned() {
                    map.insert("path".to_string(), name);
                }
            }
        }
        wire
    }

    fn update_wire(&self, wire: &Value) -> Value {
        let mut update = wire.clone();
        if let Some(map) = update.as_object_mut() {
            map.remove("name");
        }
        update
    }
}
