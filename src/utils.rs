use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::ObjectMeta;

use crate::consts;

pub trait ObjectMetaHostIdExt {
    fn annotation(&self, key: &str) -> Option<&str>;

    /// StatefulSet among the owner references, the controlling one if several match.
    fn stateful_set_owner(&self) -> Option<&OwnerReference>;
}

impl ObjectMetaHostIdExt for ObjectMeta {
    fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations
            .as_ref()
            .and_then(|ann| ann.get(key))
            .map(String::as_str)
    }

    fn stateful_set_owner(&self) -> Option<&OwnerReference> {
        let stateful_sets = || {
            self.owner_references
                .iter()
                .flatten()
                .filter(|owner| owner.kind == consts::STATEFUL_SET_KIND)
        };
        stateful_sets()
            .find(|owner| owner.controller == Some(true))
            .or_else(|| stateful_sets().next())
    }
}
