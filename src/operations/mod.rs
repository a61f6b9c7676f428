//! Marketplace operations
//!
//! Every operation is a short fixed pipeline: resolve signer, derive
//! addresses, conditionally include setup instructions, include the core
//! marketplace instruction. Each module exposes a pure `build` function that
//! takes the results of any account-existence probes as plain booleans, and
//! an [`Operation`] impl whose `prepare` runs those probes against the chain
//! before calling `build`.

use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signer::Signer};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account,
};

use crate::host::{ChainRpc, DynSigner};
use crate::pdas::{RewardCenterPdas, TradeStateSeeds};
use crate::tx_builder::{InstructionRecord, RewardCenterResult, TransactionBuilder};

pub mod accept_offer;
pub mod buy;
pub mod cancel_offer;
pub mod close_listing;
pub mod create_listing;
pub mod make_offer;
pub mod update_listing;
pub mod update_offer;

pub use accept_offer::{AcceptOfferContext, AcceptOfferInput, AcceptOfferProbes};
pub use buy::{BuyContext, BuyInput};
pub use cancel_offer::CancelOfferInput;
pub use close_listing::CloseListingInput;
pub use create_listing::{CreateListingContext, CreateListingInput};
pub use make_offer::{MakeOfferContext, MakeOfferInput};
pub use update_listing::{UpdateListingContext, UpdateListingInput};
pub use update_offer::UpdateOfferInput;

/// Auction house accounts most operations reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionHouseAccounts {
    pub address: Pubkey,
    pub authority: Pubkey,
    pub fee_account: Pubkey,
    pub treasury_mint: Pubkey,
}

/// Capabilities an operation needs while preparing its instruction list
#[derive(Clone, Copy)]
pub struct OperationEnv<'a> {
    pub rpc: &'a dyn ChainRpc,
    pub pdas: &'a RewardCenterPdas,
    pub compute_unit_limit: u32,
}

/// A high-level marketplace operation
#[async_trait]
pub trait Operation: Send + Sync {
    /// Builder context merged into the output
    type Context: Send;

    /// Operation name used in spans and logs
    const NAME: &'static str;

    /// Role of the party that signs the core instruction
    const SIGNER_ROLE: &'static str;

    fn address_lookup_table(&self) -> &Pubkey;

    /// Explicit signer overriding the ambient identity
    fn signer(&self) -> Option<&DynSigner>;

    /// Probe the chain as needed and assemble the instruction list
    async fn prepare(
        &self,
        env: OperationEnv<'_>,
        signer: DynSigner,
        payer: Option<DynSigner>,
    ) -> RewardCenterResult<TransactionBuilder<Self::Context>>;
}

/// Associated token account of `owner` for `mint`
pub fn token_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// Record creating `owner`'s associated account for `mint`, funded by `owner`
pub(crate) fn create_token_account_record(
    owner: &DynSigner,
    mint: &Pubkey,
    key: &'static str,
) -> InstructionRecord {
    let owner_key = owner.pubkey();
    let ix = create_associated_token_account(&owner_key, &owner_key, mint, &spl_token::ID);
    InstructionRecord::new(ix, vec![owner.clone()], key)
}

/// Trade-state seeds with the given wallet and token-account seed
pub(crate) fn trade_state_seeds<'a>(
    wallet: &'a Pubkey,
    auction_house: &'a AuctionHouseAccounts,
    token_account: &'a Pubkey,
    token_mint: &'a Pubkey,
) -> TradeStateSeeds<'a> {
    TradeStateSeeds {
        wallet,
        auction_house: &auction_house.address,
        token_account,
        treasury_mint: &auction_house.treasury_mint,
        token_mint,
        token_size: crate::constants::TOKEN_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::Keypair;
    use std::sync::Arc;

    #[test]
    fn test_token_account_record_is_self_funded() {
        let owner: DynSigner = Arc::new(Keypair::new());
        let mint = Pubkey::new_unique();
        let record = create_token_account_record(&owner, &mint, "sellerATA");

        assert_eq!(record.key, "sellerATA");
        assert_eq!(record.instruction.program_id, spl_associated_token_account::ID);
        assert_eq!(record.instruction.accounts[0].pubkey, owner.pubkey());
        assert!(record.instruction.accounts[0].is_signer);
        assert_eq!(
            record.instruction.accounts[1].pubkey,
            token_account(&owner.pubkey(), &mint)
        );
        assert_eq!(record.instruction.accounts[2].pubkey, owner.pubkey());
    }
}
