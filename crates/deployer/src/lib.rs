//! Submission of contract creation transactions.
//!
//! The deployment of a compiled artifact is a single linear operation:
//! ABI-encode the constructor argument, submit one creation transaction and
//! suspend until the network confirms it. The first address of the node's
//! account list doubles as the transaction sender and the constructor
//! argument, mirroring how dev nodes hand out pre-funded accounts.

use {
    alloy::{
        dyn_abi::{DynSolValue, JsonAbiExt},
        network::TransactionBuilder,
        primitives::{Address, Bytes},
        providers::Provider,
        rpc::types::{TransactionReceipt, TransactionRequest},
        transports::{RpcError, TransportError},
    },
    contracts::ContractArtifact,
    ethrpc::AlloyProvider,
    std::time::Duration,
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum DeployError {
    /// The connected node exposed no accounts, so there is nothing to use
    /// as the transaction sender and constructor argument.
    #[error("account list is empty")]
    EmptyAccountList,
    /// The artifact's constructor cannot consume the single address
    /// argument this deployment passes.
    #[error("constructor argument mismatch: {0}")]
    ConstructorMismatch(String),
    /// The transaction could not be submitted or confirmed: the node was
    /// unreachable, rejected the transaction without revert data, or the
    /// confirmation wait timed out.
    #[error("network error: {0}")]
    Network(String),
    /// The contract's constructor logic reverted during execution.
    #[error("contract constructor reverted")]
    ConstructorReverted { data: Option<Bytes> },
}

/// The result of a successful deployment. Not persisted anywhere; ownership
/// passes to whatever sequenced the deployment step.
#[derive(Clone, Debug)]
pub struct DeploymentRecord {
    pub address: Address,
    pub receipt: TransactionReceipt,
}

/// How long and how thoroughly to wait for the creation transaction to be
/// considered final.
#[derive(Clone, Debug)]
pub struct ConfirmationPolicy {
    pub confirmations: u64,
    pub timeout: Option<Duration>,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            confirmations: 1,
            timeout: Some(Duration::from_secs(60)),
        }
    }
}

pub struct Deployer {
    provider: AlloyProvider,
    policy: ConfirmationPolicy,
}

impl Deployer {
    pub fn new(provider: AlloyProvider) -> Self {
        Self::with_policy(provider, Default::default())
    }

    pub fn with_policy(provider: AlloyProvider, policy: ConfirmationPolicy) -> Self {
        Self { provider, policy }
    }

    /// Deploys the artifact, passing `accounts[0]` as the constructor
    /// argument, and waits for the creation transaction to be confirmed.
    ///
    /// Submits exactly one transaction per call. Re-invoking with the same
    /// artifact deploys a second, independent instance at a new address.
    pub async fn deploy(
        &self,
        artifact: &ContractArtifact,
        accounts: &[Address],
    ) -> Result<DeploymentRecord, DeployError> {
        let request = deployment_request(artifact, accounts)?;
        tracing::debug!(
            contract = %artifact.contract_name,
            from = ?request.from,
            "submitting contract creation transaction"
        );

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(classify_rpc_error)?;
        let tx_hash = *pending.tx_hash();
        tracing::debug!(?tx_hash, "waiting for transaction to be confirmed");

        let receipt = pending
            .with_required_confirmations(self.policy.confirmations)
            .with_timeout(self.policy.timeout)
            .get_receipt()
            .await
            .map_err(|err| DeployError::Network(err.to_string()))?;

        into_record(receipt)
    }
}

/// Builds the creation transaction: artifact bytecode followed by the
/// ABI-encoded constructor argument `accounts[0]`, sent from that same
/// account so the node signs with its own key.
fn deployment_request(
    artifact: &ContractArtifact,
    accounts: &[Address],
) -> Result<TransactionRequest, DeployError> {
    let initial_owner = *accounts.first().ok_or(DeployError::EmptyAccountList)?;

    let constructor = artifact.abi.constructor.as_ref().ok_or_else(|| {
        DeployError::ConstructorMismatch("artifact constructor takes no arguments".to_string())
    })?;
    let args = constructor
        .abi_encode_input(&[DynSolValue::Address(initial_owner)])
        .map_err(|err| DeployError::ConstructorMismatch(err.to_string()))?;

    let code = [artifact.bytecode.as_ref(), &args].concat();
    Ok(TransactionRequest::default()
        .with_from(initial_owner)
        .with_deploy_code(code))
}

/// Constructor reverts surface as RPC error responses carrying revert data
/// (instamining test nodes reject the creation right at submission).
/// Everything else is a node or transport problem.
fn classify_rpc_error(err: TransportError) -> DeployError {
    match &err {
        RpcError::ErrorResp(resp) => match resp.as_revert_data() {
            Some(data) => DeployError::ConstructorReverted { data: Some(data) },
            None => DeployError::Network(err.to_string()),
        },
        _ => DeployError::Network(err.to_string()),
    }
}

fn into_record(receipt: TransactionReceipt) -> Result<DeploymentRecord, DeployError> {
    if !receipt.status() {
        return Err(DeployError::ConstructorReverted { data: None });
    }
    let address = receipt.contract_address.ok_or_else(|| {
        DeployError::Network("receipt of the creation transaction names no contract".to_string())
    })?;
    Ok(DeploymentRecord { address, receipt })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::{
            consensus::{Eip658Value, Receipt, ReceiptEnvelope, ReceiptWithBloom},
            primitives::{B256, TxKind},
            providers::mock::Asserter,
            rpc::json_rpc::ErrorPayload,
        },
        serde_json::json,
    };

    fn artifact() -> ContractArtifact {
        serde_json::from_value(json!({
            "contractName": "CertificateRegistry",
            "abi": [{
                "inputs": [{
                    "internalType": "address",
                    "name": "initialOwner",
                    "type": "address"
                }],
                "stateMutability": "nonpayable",
                "type": "constructor"
            }],
            "bytecode": "0x600a600c600039600a6000f3",
        }))
        .unwrap()
    }

    fn receipt(status: bool, contract_address: Option<Address>) -> TransactionReceipt {
        TransactionReceipt {
            inner: ReceiptEnvelope::Legacy(ReceiptWithBloom {
                receipt: Receipt {
                    status: Eip658Value::Eip658(status),
                    cumulative_gas_used: 21_000,
                    logs: vec![],
                },
                logs_bloom: Default::default(),
            }),
            transaction_hash: B256::repeat_byte(0x42),
            transaction_index: Some(0),
            block_hash: Some(B256::repeat_byte(0x11)),
            block_number: Some(1),
            gas_used: 21_000,
            effective_gas_price: 1,
            blob_gas_used: None,
            blob_gas_price: None,
            from: Address::repeat_byte(0xaa),
            to: None,
            contract_address,
        }
    }

    #[test]
    fn creation_request_uses_first_account_as_owner_and_sender() {
        let owner = Address::repeat_byte(0xaa);
        let other = Address::repeat_byte(0xbb);
        let artifact = artifact();

        let request = deployment_request(&artifact, &[owner, other]).unwrap();

        assert_eq!(request.from, Some(owner));
        assert_eq!(request.to, Some(TxKind::Create));

        let data = request.input.input().unwrap();
        let (bytecode, args) = data.split_at(artifact.bytecode.len());
        assert_eq!(bytecode, artifact.bytecode.as_ref());

        let mut encoded_owner = [0_u8; 32];
        encoded_owner[12..].copy_from_slice(owner.as_slice());
        assert_eq!(args, encoded_owner);
    }

    #[test]
    fn empty_account_list_fails_before_building_a_transaction() {
        assert!(matches!(
            deployment_request(&artifact(), &[]),
            Err(DeployError::EmptyAccountList),
        ));
    }

    #[test]
    fn constructor_without_parameters_is_a_mismatch() {
        let artifact: ContractArtifact = serde_json::from_value(json!({
            "contractName": "NoConstructorArgs",
            "abi": [],
            "bytecode": "0x600a600c600039600a6000f3",
        }))
        .unwrap();

        assert!(matches!(
            deployment_request(&artifact, &[Address::repeat_byte(0xaa)]),
            Err(DeployError::ConstructorMismatch(_)),
        ));
    }

    #[tokio::test]
    async fn deploy_with_empty_account_list_submits_nothing() {
        // No responses are queued, so any RPC request the deployer made
        // would surface as a network error instead of the precondition
        // violation.
        let deployer = Deployer::new(ethrpc::mocked_provider(Asserter::new()));

        let result = deployer.deploy(&artifact(), &[]).await;

        assert!(matches!(result, Err(DeployError::EmptyAccountList)));
    }

    #[tokio::test]
    async fn submission_failure_is_a_network_error() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("connection refused");
        let deployer = Deployer::new(ethrpc::mocked_provider(asserter));

        let result = deployer
            .deploy(&artifact(), &[Address::repeat_byte(0xaa)])
            .await;

        assert!(matches!(result, Err(DeployError::Network(_))));
    }

    #[test]
    fn rpc_error_with_revert_data_is_a_constructor_revert() {
        // Error(string) selector followed by an encoded reason.
        let resp = ErrorPayload {
            code: 3,
            message: "execution reverted".into(),
            data: Some(
                serde_json::value::to_raw_value(
                    "0x08c379a000000000000000000000000000000000000000000000000000000000",
                )
                .unwrap(),
            ),
        };

        assert!(matches!(
            classify_rpc_error(RpcError::ErrorResp(resp)),
            DeployError::ConstructorReverted { data: Some(_) },
        ));
    }

    #[test]
    fn rpc_error_without_revert_data_is_a_network_error() {
        assert!(matches!(
            classify_rpc_error(RpcError::ErrorResp(ErrorPayload::internal_error())),
            DeployError::Network(_),
        ));
    }

    #[test]
    fn successful_receipt_yields_the_deployed_address() {
        let deployed = Address::repeat_byte(0xcc);

        let record = into_record(receipt(true, Some(deployed))).unwrap();

        assert_eq!(record.address, deployed);
        assert_eq!(record.receipt.transaction_hash, B256::repeat_byte(0x42));
    }

    #[test]
    fn reverted_receipt_is_a_constructor_revert() {
        assert!(matches!(
            into_record(receipt(false, None)),
            Err(DeployError::ConstructorReverted { data: None }),
        ));
    }

    #[test]
    fn receipt_without_contract_address_is_a_network_error() {
        assert!(matches!(
            into_record(receipt(true, None)),
            Err(DeployError::Network(_)),
        ));
    }
}
