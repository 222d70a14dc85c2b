use crate::{
    args::HostIdArgs,
    cluster,
    err::{HostIdError, HostIdResult},
};

pub struct Context {
    pub args: HostIdArgs,
    pub client: kube::Client,
    pub pod_name: String,
}

impl Context {
    pub async fn new(args: HostIdArgs) -> HostIdResult<Self> {
        let pod_name = required_pod_name(&args)?;
        let client = cluster::connect(args.kubeconfig.as_deref()).await?;
        Ok(Context {
            args,
            client,
            pod_name,
        })
    }
}

fn required_pod_name(args: &HostIdArgs) -> HostIdResult<String> {
    args.pod
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| HostIdError::Config("you must specify a pod name".to_string()))
}
