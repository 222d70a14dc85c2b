use std::fmt;

use k8s_openapi::api::core::v1::{ObjectReference, Pod};
use kube::ResourceExt;
use serde::Deserialize;

use crate::{
    consts,
    err::{HostIdError, HostIdResult},
    utils::ObjectMetaHostIdExt,
};

/// Namespaced name of a StatefulSet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatefulSetRef {
    pub namespace: String,
    pub name: String,
}

impl StatefulSetRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for StatefulSetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Value of the `kubernetes.io/created-by` annotation.
#[derive(Debug, Deserialize)]
struct SerializedReference {
    reference: ObjectReference,
}

/// Finds the StatefulSet owning `pod`.
///
/// Owner references win. Pods created by older controllers only carry the
/// `kubernetes.io/created-by` annotation, which is used as a fallback.
/// `default_namespace` is used when neither the pod nor the reference
/// specify one.
pub fn stateful_set_of(pod: &Pod, default_namespace: &str) -> HostIdResult<StatefulSetRef> {
    let pod_namespace = pod.namespace().unwrap_or_else(|| default_namespace.to_string());

    if let Some(owner) = pod.metadata.stateful_set_owner() {
        tracing::debug!(owner = owner.name.as_str(), "Using owner reference");
        return Ok(StatefulSetRef::new(pod_namespace, owner.name.clone()));
    }

    let Some(created_by) = pod.metadata.annotation(consts::CREATED_BY_ANNOTATION) else {
        return Err(HostIdError::NotFound(format!(
            "pod {} has no StatefulSet owner reference nor the {} annotation",
            pod.name_any(),
            consts::CREATED_BY_ANNOTATION
        )));
    };
    let reference = serde_json::from_str::<SerializedReference>(created_by)?.reference;

    if let Some(kind) = reference.kind.as_deref()
        && kind != consts::STATEFUL_SET_KIND
    {
        return Err(HostIdError::NotFound(format!(
            "pod {} was created by a {kind}, not a StatefulSet",
            pod.name_any()
        )));
    }
    let Some(name) = reference.name else {
        return Err(HostIdError::NotFound(format!(
            "{} annotation of pod {} has no name",
            consts::CREATED_BY_ANNOTATION,
            pod.name_any()
        )));
    };
    tracing::debug!(owner = name.as_str(), "Using {} annotation", consts::CREATED_BY_ANNOTATION);
    Ok(StatefulSetRef::new(
        reference.namespace.unwrap_or(pod_namespace),
        name,
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use k8s_openapi::{
        api::core::v1::Pod, apimachinery::pkg::apis::meta::v1::OwnerReference,
    };
    use kube::api::ObjectMeta;
    use rstest::rstest;

    use super::{StatefulSetRef, stateful_set_of};
    use crate::err::HostIdError;

    fn pod(
        namespace: Option<&str>,
        owners: Option<Vec<OwnerReference>>,
        created_by: Option<&str>,
    ) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some("cassandra-0".to_string()),
                namespace: namespace.map(str::to_string),
                owner_references: owners,
                annotations: created_by.map(|value| {
                    BTreeMap::from([(
                        "kubernetes.io/created-by".to_string(),
                        value.to_string(),
                    )])
                }),
                ..ObjectMeta::default()
            },
            ..Pod::default()
        }
    }

    fn stateful_set_owner(name: &str) -> OwnerReference {
        OwnerReference {
            api_version: "apps/v1".to_string(),
            kind: "StatefulSet".to_string(),
            name: name.to_string(),
            uid: "5c3d9f0e-8e0b-4bd1-a2e8-3c0f0f7f8e11".to_string(),
            controller: Some(true),
            block_owner_deletion: Some(true),
        }
    }

    const CREATED_BY: &str = r#"{"kind":"SerializedReference","apiVersion":"v1","reference":{"kind":"StatefulSet","namespace":"db","name":"cassandra","uid":"5c3d9f0e-8e0b-4bd1-a2e8-3c0f0f7f8e11","apiVersion":"apps","resourceVersion":"1020"}}"#;

    #[test]
    fn owner_reference() {
        let pod = pod(Some("db"), Some(vec![stateful_set_owner("cassandra")]), None);
        assert_eq!(
            stateful_set_of(&pod, "default").unwrap(),
            StatefulSetRef::new("db", "cassandra")
        );
    }

    #[test]
    fn owner_reference_wins_over_annotation() {
        let pod = pod(
            Some("db"),
            Some(vec![stateful_set_owner("cassandra-new")]),
            Some(CREATED_BY),
        );
        assert_eq!(stateful_set_of(&pod, "default").unwrap().name, "cassandra-new");
    }

    #[test]
    fn owner_reference_without_pod_namespace() {
        let pod = pod(None, Some(vec![stateful_set_owner("cassandra")]), None);
        assert_eq!(
            stateful_set_of(&pod, "fallback").unwrap(),
            StatefulSetRef::new("fallback", "cassandra")
        );
    }

    #[test]
    fn created_by_annotation() {
        let pod = pod(Some("other"), None, Some(CREATED_BY));
        assert_eq!(
            stateful_set_of(&pod, "default").unwrap(),
            StatefulSetRef::new("db", "cassandra")
        );
    }

    #[test]
    fn created_by_without_namespace() {
        let pod = pod(
            Some("db"),
            None,
            Some(r#"{"kind":"SerializedReference","reference":{"kind":"StatefulSet","name":"cassandra"}}"#),
        );
        assert_eq!(
            stateful_set_of(&pod, "default").unwrap(),
            StatefulSetRef::new("db", "cassandra")
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(r#"{"kind":"SerializedReference","reference":{"kind":"ReplicaSet","name":"web"}}"#))]
    #[case(Some(r#"{"kind":"SerializedReference","reference":{"kind":"StatefulSet"}}"#))]
    fn no_owner(#[case] created_by: Option<&str>) {
        let pod = pod(Some("db"), None, created_by);
        let err = stateful_set_of(&pod, "default").unwrap_err();
        assert!(matches!(err, HostIdError::NotFound(_)), "{err:?}");
    }

    #[test]
    fn malformed_created_by() {
        let pod = pod(Some("db"), None, Some("not json"));
        let err = stateful_set_of(&pod, "default").unwrap_err();
        assert!(matches!(err, HostIdError::SerdeJsonError(_)), "{err:?}");
    }

    #[test]
    fn display() {
        assert_eq!(StatefulSetRef::new("db", "cassandra").to_string(), "db/cassandra");
    }
}
