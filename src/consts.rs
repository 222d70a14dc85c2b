/// Subcommand passed to nodetool to make it print the local node's status,
/// including its host ID.
pub const NODETOOL_INFO: &str = "info";

/// Canonical 8-4-4-4-12 hexadecimal UUID.
pub const UUID_PATTERN: &str =
    "[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12}";

/// Legacy annotation set by older controllers on the pods they create.
/// Holds a JSON serialized reference to the owning object.
pub const CREATED_BY_ANNOTATION: &str = "kubernetes.io/created-by";

pub const STATEFUL_SET_KIND: &str = "StatefulSet";
