use {
    clap::Parser,
    std::{path::PathBuf, time::Duration},
    url::Url,
};

#[derive(Parser)]
pub struct Arguments {
    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Directory the external build step wrote the contract artifacts to.
    #[clap(long, env, default_value = "build/contracts")]
    pub artifacts_path: PathBuf,

    /// Name of the contract to deploy.
    #[clap(long, env, default_value = "CertificateRegistry")]
    pub contract: String,

    /// Number of block confirmations to wait for before considering the
    /// deployment final.
    #[clap(long, env, default_value = "1")]
    pub confirmations: u64,

    /// How long to wait for the creation transaction to be confirmed.
    #[clap(
        long,
        env,
        default_value = "60s",
        value_parser = humantime::parse_duration,
    )]
    pub confirmation_timeout: Duration,
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            node_url,
            artifacts_path,
            contract,
            confirmations,
            confirmation_timeout,
        } = self;

        writeln!(f, "node_url: {}", node_url)?;
        writeln!(f, "artifacts_path: {}", artifacts_path.display())?;
        writeln!(f, "contract: {}", contract)?;
        writeln!(f, "confirmations: {}", confirmations)?;
        writeln!(f, "confirmation_timeout: {:?}", confirmation_timeout)?;
        Ok(())
    }
}
