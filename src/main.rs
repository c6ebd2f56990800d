use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use readme_site_render::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    readme_site_render::run(args).await
}
