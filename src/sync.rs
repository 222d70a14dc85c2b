//! Keeps host IDs in the annotations of the StatefulSet owning the pods.
//!
//! Each pod gets its own `<prefix>/<pod name>` annotation. Writes are JSON
//! merge patches limited to `metadata.annotations`, so annotations put there
//! by anyone else survive.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::StatefulSet;

use crate::{
    err::{HostIdError, HostIdResult},
    host_id::{CommandRunner, HostId, HostIdExtractor},
    owner::StatefulSetRef,
    utils::ObjectMetaHostIdExt,
};

/// The two StatefulSet operations host ID tracking needs.
#[async_trait::async_trait]
pub trait StatefulSetStore: Send + Sync {
    async fn get_stateful_set(&self, target: &StatefulSetRef) -> HostIdResult<Option<StatefulSet>>;

    /// Applies `patch` as a JSON merge patch.
    async fn patch_annotations(
        &self,
        target: &StatefulSetRef,
        patch: &serde_json::Value,
    ) -> HostIdResult<StatefulSet>;
}

pub fn annotation_key(prefix: &str, member: &str) -> String {
    format!("{prefix}/{member}")
}

pub fn annotation_patch(key: &str, value: &str) -> serde_json::Value {
    let annotations = BTreeMap::from([(key.to_string(), value.to_string())]);
    serde_json::json!({
        "metadata": {
            "annotations": annotations,
        }
    })
}

pub struct AnnotationSync<S> {
    store: S,
    prefix: String,
}

impl<S: StatefulSetStore> AnnotationSync<S> {
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    async fn existing(&self, target: &StatefulSetRef) -> HostIdResult<StatefulSet> {
        self.store
            .get_stateful_set(target)
            .await?
            .ok_or_else(|| HostIdError::NotFound(format!("StatefulSet {target}")))
    }

    /// Reads the local host ID and stores it under this member's annotation.
    #[tracing::instrument(skip(self, extractor, target), fields(stateful_set = %target), err)]
    pub async fn populate<R: CommandRunner>(
        &self,
        extractor: &HostIdExtractor<R>,
        target: &StatefulSetRef,
        member: &str,
    ) -> HostIdResult<HostId> {
        let host_id = extractor.extract().await?;
        let key = annotation_key(&self.prefix, member);
        self.existing(target).await?;

        let patch = annotation_patch(&key, host_id.as_str());
        tracing::trace!("Patching StatefulSet: {patch}");
        let patched = self.store.patch_annotations(target, &patch).await?;
        tracing::trace!("Resulting annotations: {:?}", patched.metadata.annotations);
        tracing::info!(%host_id, "Stored host ID as {key}");

        Ok(host_id)
    }

    /// Reads back the host ID previously stored for this member.
    #[tracing::instrument(skip(self, target), fields(stateful_set = %target), err)]
    pub async fn fetch(&self, target: &StatefulSetRef, member: &str) -> HostIdResult<HostId> {
        let key = annotation_key(&self.prefix, member);
        let stateful_set = self.existing(target).await?;

        stateful_set
            .metadata
            .annotation(&key)
            .map(HostId::from)
            .ok_or_else(|| HostIdError::MissingAnnotation {
                member: member.to_string(),
                stateful_set: target.to_string(),
            })
    }
}
