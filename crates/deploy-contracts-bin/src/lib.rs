//! The deployment step itself: connect to the test network, pick the first
//! pre-funded account, and deploy the configured contract with that account
//! as its initial owner. An external runner sequencing multiple steps only
//! needs the process exit code; the deployed address is logged.

pub mod arguments;

use {
    alloy::providers::Provider,
    anyhow::{Context, Result},
    contracts::ArtifactStore,
    deployer::{ConfirmationPolicy, Deployer},
};

pub async fn main(args: arguments::Arguments) -> Result<()> {
    let provider = ethrpc::provider(&args.node_url);

    let accounts = provider
        .get_accounts()
        .await
        .context("failed to fetch the account list from the node")?;
    tracing::debug!(count = accounts.len(), "fetched node accounts");

    let artifact = ArtifactStore::new(&args.artifacts_path)
        .artifact(&args.contract)
        .context("failed to load the contract artifact")?;

    let deployer = Deployer::with_policy(
        provider,
        ConfirmationPolicy {
            confirmations: args.confirmations,
            timeout: Some(args.confirmation_timeout),
        },
    );
    let record = deployer
        .deploy(&artifact, &accounts)
        .await
        .with_context(|| format!("failed to deploy {}", args.contract))?;

    tracing::info!(
        contract = %args.contract,
        address = %record.address,
        tx = %record.receipt.transaction_hash,
        "contract deployed"
    );
    Ok(())
}
