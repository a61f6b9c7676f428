//! Change the price of an existing listing

use async_trait::async_trait;
use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, signer::Signer};

use crate::host::DynSigner;
use crate::operations::{Operation, OperationEnv};
use crate::pdas::RewardCenterPdas;
use crate::price::to_base_units;
use crate::program::{self, UpdateListingAccounts, UpdateListingParams};
use crate::tx_builder::{InstructionRecord, RewardCenterResult, TransactionBuilder};

#[derive(Clone)]
pub struct UpdateListingInput {
    /// New asking price as a decimal string
    pub amount: String,
    pub auction_house: Pubkey,
    pub metadata: Pubkey,
    pub associated_token_account: Pubkey,
    pub seller: Option<DynSigner>,
    pub address_lookup_table: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingContext {
    pub buyer_price: u64,
}

pub fn build(
    pdas: &RewardCenterPdas,
    input: &UpdateListingInput,
    seller: &DynSigner,
    payer: Option<DynSigner>,
) -> RewardCenterResult<TransactionBuilder<UpdateListingContext>> {
    let new_price = to_base_units(&input.amount)?;
    let seller_key = seller.pubkey();
    let reward_center = pdas.reward_center(&input.auction_house)?.address;
    let listing = pdas.listing_address(&seller_key, &input.metadata, &reward_center)?;

    let accounts = UpdateListingAccounts {
        wallet: seller_key,
        listing: listing.address,
        reward_center,
        metadata: input.metadata,
        token_account: input.associated_token_account,
        auction_house: input.auction_house,
    };

    let mut builder = TransactionBuilder::new(UpdateListingContext {
        buyer_price: new_price,
    })
    .set_fee_payer(payer);
    builder.add(InstructionRecord::new(
        program::update_listing(pdas.programs(), &accounts, UpdateListingParams { new_price })?,
        vec![seller.clone()],
        "updateListing",
    ));
    Ok(builder)
}

#[async_trait]
impl Operation for UpdateListingInput {
    type Context = UpdateListingContext;
    const NAME: &'static str = "update_listing";
    const SIGNER_ROLE: &'static str = "seller";

    fn address_lookup_table(&self) -> &Pubkey {
        &self.address_lookup_table
    }

    fn signer(&self) -> Option<&DynSigner> {
        self.seller.as_ref()
    }

    async fn prepare(
        &self,
        env: OperationEnv<'_>,
        signer: DynSigner,
        payer: Option<DynSigner>,
    ) -> RewardCenterResult<TransactionBuilder<Self::Context>> {
        build(env.pdas, self, &signer, payer)
    }
}
