use clap::Parser;

use crate::{
    args::HostIdArgs,
    cluster::KubeStatefulSets,
    host_id::{HostIdExtractor, ProcessRunner},
    sync::AnnotationSync,
};

mod args;
mod cluster;
mod consts;
mod ctx;
mod err;
mod host_id;
mod owner;
mod sync;
mod utils;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = HostIdArgs::parse();
    // stdout carries the fetched host ID only
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("CLI argument: {:?}", args);

    let ctx = ctx::Context::new(args).await?;

    let pod = cluster::find_pod(&ctx.client, &ctx.args.namespace, &ctx.pod_name).await?;
    let stateful_set = owner::stateful_set_of(&pod, &ctx.args.namespace)?;
    tracing::info!(pod = ctx.pod_name.as_str(), %stateful_set, "Resolved owning StatefulSet");

    let sync = AnnotationSync::new(KubeStatefulSets::new(ctx.client.clone()), &ctx.args.prefix);

    if ctx.args.populate {
        let extractor = HostIdExtractor::new(ProcessRunner, &ctx.args.nodetool);
        sync.populate(&extractor, &stateful_set, &ctx.pod_name).await?;
    }

    if ctx.args.fetch {
        let host_id = sync.fetch(&stateful_set, &ctx.pod_name).await?;
        println!("{host_id}");
    }

    Ok(())
}
