//! Client facade dispatching the marketplace operations
//!
//! The facade resolves the signer and fee payer once at the call boundary,
//! lets the operation probe the chain and assemble its instruction list, then
//! hands the result to [`submit`]. Each call runs inside a tracing span with
//! its own correlation id.

use solana_sdk::{commitment_config::CommitmentConfig, signer::Signer};
use std::sync::Arc;
use tracing::Instrument;

use crate::config::Config;
use crate::constants::DEFAULT_COMPUTE_UNIT_LIMIT;
use crate::host::{ChainRpc, Identity, ProgramRegistry, SolanaRpcHost, TransactionConfirmer};
use crate::operations::{
    AcceptOfferContext, AcceptOfferInput, BuyContext, BuyInput, CancelOfferInput,
    CloseListingInput, CreateListingContext, CreateListingInput, MakeOfferContext, MakeOfferInput,
    Operation, OperationEnv, UpdateListingContext, UpdateListingInput, UpdateOfferInput,
};
use crate::pdas::RewardCenterPdas;
use crate::structured_logging::OperationLogger;
use crate::tx_builder::{
    submit, OperationOptions, OperationOutput, RewardCenterResult, TransactionBuilder,
};

/// Entry point for reward center operations
pub struct RewardCenterClient {
    rpc: Arc<dyn ChainRpc>,
    confirmer: Arc<dyn TransactionConfirmer>,
    identity: Identity,
    pdas: RewardCenterPdas,
    commitment: CommitmentConfig,
    compute_unit_limit: u32,
}

impl RewardCenterClient {
    pub fn new(
        rpc: Arc<dyn ChainRpc>,
        confirmer: Arc<dyn TransactionConfirmer>,
        identity: Identity,
        programs: ProgramRegistry,
    ) -> Self {
        Self {
            rpc,
            confirmer,
            identity,
            pdas: RewardCenterPdas::new(programs),
            commitment: CommitmentConfig::finalized(),
            compute_unit_limit: DEFAULT_COMPUTE_UNIT_LIMIT,
        }
    }

    /// Client over a live RPC host built from validated configuration
    pub fn from_config(config: &Config, identity: Identity) -> RewardCenterResult<Self> {
        config.validate()?;
        let commitment = config.commitment()?;
        let host = Arc::new(SolanaRpcHost::new(
            config.rpc.url.clone(),
            commitment,
            config.poll_interval(),
        ));
        Ok(Self::new(host.clone(), host, identity, config.program_registry()?)
            .with_commitment(commitment)
            .with_compute_unit_limit(config.transaction.compute_unit_limit))
    }

    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_compute_unit_limit(mut self, units: u32) -> Self {
        self.compute_unit_limit = units;
        self
    }

    /// Address derivation bound to this client's programs
    pub fn pdas(&self) -> &RewardCenterPdas {
        &self.pdas
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    fn env(&self) -> OperationEnv<'_> {
        OperationEnv {
            rpc: self.rpc.as_ref(),
            pdas: &self.pdas,
            compute_unit_limit: self.compute_unit_limit,
        }
    }

    /// Resolve identities and assemble the instruction list without sending
    pub async fn prepare<O: Operation>(
        &self,
        input: &O,
        options: &OperationOptions,
    ) -> RewardCenterResult<TransactionBuilder<O::Context>> {
        let signer = self.identity.resolve_signer(input.signer(), O::SIGNER_ROLE)?;
        let payer = self.identity.resolve_fee_payer(options.payer.as_ref());
        input.prepare(self.env(), signer, payer).await
    }

    /// Run one operation end to end
    pub async fn execute<O: Operation>(
        &self,
        input: &O,
        options: &OperationOptions,
    ) -> RewardCenterResult<OperationOutput<O::Context>> {
        let logger = OperationLogger::new(O::NAME);
        let span = logger.span();
        let result = self.execute_logged(input, options, &logger).instrument(span).await;
        if let Err(err) = &result {
            logger.log_failure(err);
        }
        result
    }

    async fn execute_logged<O: Operation>(
        &self,
        input: &O,
        options: &OperationOptions,
        logger: &OperationLogger,
    ) -> RewardCenterResult<OperationOutput<O::Context>> {
        let signer = self.identity.resolve_signer(input.signer(), O::SIGNER_ROLE)?;
        let payer = self.identity.resolve_fee_payer(options.payer.as_ref());
        logger.log_start(
            &signer.pubkey().to_string(),
            payer.as_ref().map(|p| p.pubkey().to_string()).as_deref(),
        );

        let builder = input.prepare(self.env(), signer, payer).await?;
        logger.log_instructions(&builder.keys());

        let commitment = options.commitment.unwrap_or(self.commitment);
        let output = submit(
            self.rpc.as_ref(),
            self.confirmer.as_ref(),
            builder,
            input.address_lookup_table(),
            commitment,
            &options.cancellation,
        )
        .await?;

        logger.log_success(&output.signature(), output.response.slot);
        Ok(output)
    }

    pub async fn create_listing(
        &self,
        input: &CreateListingInput,
        options: &OperationOptions,
    ) -> RewardCenterResult<OperationOutput<CreateListingContext>> {
        self.execute(input, options).await
    }

    pub async fn update_listing(
        &self,
        input: &UpdateListingInput,
        options: &OperationOptions,
    ) -> RewardCenterResult<OperationOutput<UpdateListingContext>> {
        self.execute(input, options).await
    }

    pub async fn close_listing(
        &self,
        input: &CloseListingInput,
        options: &OperationOptions,
    ) -> RewardCenterResult<OperationOutput<()>> {
        self.execute(input, options).await
    }

    pub async fn make_offer(
        &self,
        input: &MakeOfferInput,
        options: &OperationOptions,
    ) -> RewardCenterResult<OperationOutput<MakeOfferContext>> {
        self.execute(input, options).await
    }

    pub async fn update_offer(
        &self,
        input: &UpdateOfferInput,
        options: &OperationOptions,
    ) -> RewardCenterResult<OperationOutput<()>> {
        self.execute(input, options).await
    }

    pub async fn cancel_offer(
        &self,
        input: &CancelOfferInput,
        options: &OperationOptions,
    ) -> RewardCenterResult<OperationOutput<()>> {
        self.execute(input, options).await
    }

    pub async fn accept_offer(
        &self,
        input: &AcceptOfferInput,
        options: &OperationOptions,
    ) -> RewardCenterResult<OperationOutput<AcceptOfferContext>> {
        self.execute(input, options).await
    }

    pub async fn buy(
        &self,
        input: &BuyInput,
        options: &OperationOptions,
    ) -> RewardCenterResult<OperationOutput<BuyContext>> {
        self.execute(input, options).await
    }
}
