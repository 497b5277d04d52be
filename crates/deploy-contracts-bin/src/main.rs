use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = deploy_contracts::arguments::Arguments::parse();
    observe::tracing::initialize(
        "warn,deploy_contracts=debug,deployer=debug",
        tracing::Level::ERROR.into(),
    );
    tracing::info!("running deploy-contracts with validated arguments:\n{}", args);
    deploy_contracts::main(args).await
}
