use std::path::Path;

use k8s_openapi::api::{apps::v1::StatefulSet, core::v1::Pod};
use kube::{
    Api, Client, Config,
    api::{Patch, PatchParams},
    config::{KubeConfigOptions, Kubeconfig},
};

use crate::{
    err::{HostIdError, HostIdResult},
    owner::StatefulSetRef,
    sync::StatefulSetStore,
};

const FIELD_MANAGER: &str = "cassandra-hostid";

/// Builds a client from `kubeconfig` if given, otherwise from the
/// in-cluster environment or the default kubeconfig.
pub async fn connect(kubeconfig: Option<&Path>) -> HostIdResult<Client> {
    let Some(path) = kubeconfig else {
        return Client::try_default()
            .await
            .map_err(|err| HostIdError::Auth(err.to_string()));
    };

    let kubeconfig = Kubeconfig::read_from(path).map_err(|err| {
        HostIdError::Auth(format!("failed to read kubeconfig {}: {err}", path.display()))
    })?;
    let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|err| {
            HostIdError::Auth(format!("invalid kubeconfig {}: {err}", path.display()))
        })?;
    Client::try_from(config).map_err(|err| HostIdError::Auth(err.to_string()))
}

#[tracing::instrument(skip(client), err)]
pub async fn find_pod(client: &Client, namespace: &str, name: &str) -> HostIdResult<Pod> {
    Api::<Pod>::namespaced(client.clone(), namespace)
        .get_opt(name)
        .await?
        .ok_or_else(|| HostIdError::NotFound(format!("pod {namespace}/{name}")))
}

/// StatefulSets served by the Kubernetes API.
#[derive(Clone)]
pub struct KubeStatefulSets {
    client: Client,
}

impl KubeStatefulSets {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, target: &StatefulSetRef) -> Api<StatefulSet> {
        Api::namespaced(self.client.clone(), &target.namespace)
    }
}

#[async_trait::async_trait]
impl StatefulSetStore for KubeStatefulSets {
    async fn get_stateful_set(&self, target: &StatefulSetRef) -> HostIdResult<Option<StatefulSet>> {
        Ok(self.api(target).get_opt(&target.name).await?)
    }

    async fn patch_annotations(
        &self,
        target: &StatefulSetRef,
        patch: &serde_json::Value,
    ) -> HostIdResult<StatefulSet> {
        self.api(target)
            .patch(
                &target.name,
                &PatchParams {
                    field_manager: Some(FIELD_MANAGER.to_string()),
                    ..PatchParams::default()
                },
                &Patch::Merge(patch),
            )
            .await
            .map_err(|err| HostIdError::Apply(target.to_string(), err))
    }
}
