use std::path::PathBuf;

#[derive(clap::Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
/// Cassandra host ID keeper.
///
/// Stores the host ID of the local Cassandra node in an annotation
/// of the StatefulSet owning this pod, and reads it back so that
/// a replaced pod can rejoin the ring with the same identity.
pub struct HostIdArgs {
    /// Path to a kubeconfig file. In-cluster configuration is used when absent.
    #[arg(long, env = "KUBECONFIG_PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Path to cassandra nodetool.
    #[arg(long, env = "HOSTID_NODETOOL", default_value = "/usr/bin/nodetool")]
    pub nodetool: PathBuf,

    /// Namespace of the pod.
    #[arg(long, env = "HOSTID_NAMESPACE", default_value = "default")]
    pub namespace: String,

    /// Name of the pod we are running in.
    #[arg(long, env = "HOSTID_POD_NAME")]
    pub pod: Option<String>,

    /// Whether to populate the StatefulSet annotations with our host ID.
    #[arg(
        long,
        env = "HOSTID_POPULATE",
        default_value_t = true,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub populate: bool,

    /// Whether to fetch our host ID from the StatefulSet annotations and print it.
    #[arg(
        long,
        env = "HOSTID_FETCH",
        default_value_t = true,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub fetch: bool,

    /// Prefix of the annotations tracking host IDs, the pod name is appended after a slash.
    #[arg(long, env = "HOSTID_PREFIX", default_value = "cassandra")]
    pub prefix: String,

    /// Log level.
    #[arg(long, env = "HOSTID_LOG_LEVEL", default_value_t = tracing::level_filters::LevelFilter::INFO)]
    pub log_level: tracing::level_filters::LevelFilter,
}
