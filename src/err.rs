pub type HostIdResult<T> = Result<T, HostIdError>;

#[derive(Debug, thiserror::Error)]
pub enum HostIdError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Unable to create Kubernetes client: {0}")]
    Auth(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Failed to execute {command}: {reason}")]
    Execution { command: String, reason: String },
    #[error("Couldn't find a Cassandra host ID in the output of {0}")]
    HostIdNotFound(String),
    #[error("Failed to patch StatefulSet {0}")]
    Apply(String, #[source] kube::Error),
    #[error("Host ID for {member} not present in annotations of StatefulSet {stateful_set}")]
    MissingAnnotation {
        member: String,
        stateful_set: String,
    },
    #[error("Kubernetes API error")]
    KubeError(#[from] kube::Error),
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}
