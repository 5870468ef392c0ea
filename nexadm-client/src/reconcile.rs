//! The convergence state machine.
//!
//! One invocation reconciles exactly one declared resource instance: read
//! the current remote state, decide whether it already matches intent, and
//! issue at most one create, update or delete through the transport.

use reqwest::Method;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::canonical::{canonicalize, split_secrets};
use crate::diff::matches;
use crate::error::{remote_message, Error, Result};
use crate::kinds::{Lookup, ResourceDescriptor};
use crate::transport::HttpClient;

/// Declared target state for one resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Present,
    Absent,
}

/// Result of one convergence attempt.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Whether a write was issued against the remote.
    pub changed: bool,
    /// The remote's view of the instance after convergence, or the wire
    /// body when the remote answered without content.
    pub body: Value,
}

impl Outcome {
    fn unchanged(body: Value) -> Self {
        Self {
            changed: false,
            body,
        }
    }

    fn changed(body: Value) -> Self {
        Self {
            changed: true,
            body,
        }
    }
}

pub struct Reconciler<'a> {
    client: &'a HttpClient,
}

impl<'a> Reconciler<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Converge one resource instance toward the declared intent.
    pub async fn reconcile(
        &self,
        descriptor: &dyn ResourceDescriptor,
        desired: &Value,
        intent: Intent,
    ) -> Result<Outcome> {
        let identity = descriptor.identity(desired)?;
        let observed = self.observe(descriptor, &identity).await?;
        match intent {
            Intent::Present => {
                self.converge_present(descriptor, &identity, desired, observed)
                    .await
            }
            Intent::Absent => self.converge_absent(descriptor, &identity, observed).await,
        }
    }

    /// Locate the current remote state of the instance, if any.
    async fn observe(
        &self,
        descriptor: &dyn ResourceDescriptor,
        identity: &str,
    ) -> Result<Option<Value>> {
        let kind = descriptor.kind();
        match descriptor.lookup() {
            Lookup::List => {
                let (status, body) = self
                    .client
                    .send(&descriptor.collection_path(), Method::GET, None)
                    .await?;
                if !status.is_success() {
                    return Err(Error::from_status(
                        status,
                        &body,
                        &format!("failed to list {kind} resources"),
                    ));
                }

                let mut found = None;
                for item in descriptor.items(&body) {
                    if !descriptor.matches_identity(identity, &item) {
                        continue;
                    }
                    if found.is_some() {
                        return Err(Error::Conflict {
                            message: format!(
                                "identity '{identity}' matched more than one {kind} resource, refusing to act"
                            ),
                        });
                    }
                    found = Some(item);
                }
                Ok(found)
            }
            Lookup::Instance | Lookup::Singleton => {
                let path = match descriptor.lookup() {
                    Lookup::Singleton => descriptor.collection_path(),
                    _ => descriptor.instance_path(identity),
                };
                let (status, body) = self.client.send(&path, Method::GET, None).await?;
                match status.as_u16() {
                    200 => Ok(Some(body)),
                    404 => Ok(None),
                    _ => Err(Error::from_status(
                        status,
                        &body,
                        &format!("failed to read {kind} '{identity}'"),
                    )),
                }
            }
        }
    }

    async fn converge_present(
        &self,
        descriptor: &dyn ResourceDescriptor,
        identity: &str,
        desired: &Value,
        observed: Option<Value>,
    ) -> Result<Outcome> {
        let wire = descriptor.to_wire(desired);

        match observed {
            None => self.create(descriptor, identity, &wire).await,
            Some(found) => {
                let update = descriptor.update_wire(&wire);
                let (update_cmp, secret_present) =
                    split_secrets(&update, descriptor.secret_paths());
                let desired_cmp = canonicalize(&update_cmp);
                let observed_cmp = canonicalize(&descriptor.normalize_observed(found.clone()));

                if matches(&desired_cmp, &observed_cmp) && !secret_present {
                    debug!(
                        kind = %descriptor.kind(),
                        name = %identity,
                        "already converged, no action"
                    );
                    return Ok(Outcome::unchanged(found));
                }

                self.update(descriptor, identity, &update, Some(&found)).await
            }
        }
    }

    async fn converge_absent(
        &self,
        descriptor: &dyn ResourceDescriptor,
        identity: &str,
        observed: Option<Value>,
    ) -> Result<Outcome> {
        let kind = descriptor.kind();
        let Some(found) = observed else {
            debug!(kind = %kind, name = %identity, "already absent, no action");
            return Ok(Outcome::unchanged(Value::Object(Map::new())));
        };

        info!(kind = %kind, name = %identity, "deleting resource");
        let segment = descriptor.instance_segment(identity, Some(&found));
        let (status, body) = self
            .client
            .send(&descriptor.delete_path(&segment), Method::DELETE, None)
            .await?;
        match status.as_u16() {
            200 | 204 => Ok(Outcome::changed(body)),
            // Deleting something already gone is the desired outcome.
            404 => {
                debug!(kind = %kind, name = %identity, "resource vanished before delete");
                Ok(Outcome::unchanged(body))
            }
            _ => Err(Error::from_status(
                status,
                &body,
                &format!("failed to delete {kind} '{identity}'"),
            )),
        }
    }

    async fn create(
        &self,
        descriptor: &dyn ResourceDescriptor,
        identity: &str,
        wire: &Value,
    ) -> Result<Outcome> {
        let kind = descriptor.kind();
        info!(kind = %kind, name = %identity, "creating resource");
        let (status, body) = self
            .client
            .send(&descriptor.create_path(), descriptor.create_method(), Some(wire))
            .await?;
        match status.as_u16() {
            200 | 201 => Ok(Outcome::changed(body)),
            204 => Ok(Outcome::changed(wire.clone())),
            400 => Err(Error::Validation {
                message: format!(
                    "failed to create {kind} '{identity}': a resource with the same identity \
                     may already exist, or required fields are missing: {}",
                    remote_message(&body)
                ),
            }),
            _ => Err(Error::from_status(
                status,
                &body,
                &format!("failed to create {kind} '{identity}'"),
            )),
        }
    }

    async fn update(
        &self,
        descriptor: &dyn ResourceDescriptor,
        identity: &str,
        update: &Value,
        observed: Option<&Value>,
    ) -> Result<Outcome> {
        let kind = descriptor.kind();
        info!(kind = %kind, name = %identity, "updating resource");
        let segment = descriptor.instance_segment(identity, observed);
        let (status, body) = self
            .client
            .send(&descriptor.instance_path(&segment), Method::PUT, Some(update))
            .await?;
        match status.as_u16() {
            200 | 201 => Ok(Outcome::changed(body)),
            204 => Ok(Outcome::changed(update.clone())),
            // The instance disappeared between read and write. Surfacing the
            // race instead of re-reconciling keeps an external actor's
            // conflicting change visible.
            404 => Err(Error::Conflict {
                message: format!("{kind} '{identity}' disappeared during reconcile"),
            }),
            _ => Err(Error::from_status(
                status,
                &body,
                &format!("failed to update {kind} '{identity}'"),
            )),
        }
    }
}
