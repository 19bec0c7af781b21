use crowdsale::{CrowdsaleContract, CrowdsaleContractClient};
use sale_shared::{RoundConfig, RoundState};
use sale_token::{SaleToken, SaleTokenClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env, String,
};
use vesting::{VestingContract, VestingContractClient};

use super::constants::*;

/// The three contracts wired together, plus a Stellar asset used for payment.
pub struct SaleHarness<'a> {
    pub env: Env,
    pub owner: Address,
    pub sale: CrowdsaleContractClient<'a>,
    pub vesting: VestingContractClient<'a>,
    pub token: SaleTokenClient<'a>,
    pub payment: token::Client<'a>,
    payment_admin: token::StellarAssetClient<'a>,
}

impl<'a> SaleHarness<'a> {
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().with_mut(|l| l.timestamp = GENESIS);

        let owner = Address::generate(&env);

        let token_id = env.register_contract(None, SaleToken);
        let token = SaleTokenClient::new(&env, &token_id);
        token.initialize(
            &owner,
            &7u32,
            &String::from_str(&env, "Launch Token"),
            &String::from_str(&env, "LNCH"),
            &TOKEN_SUPPLY,
        );

        let payment_id = env
            .register_stellar_asset_contract_v2(owner.clone())
            .address();

        let sale_id = env.register_contract(None, CrowdsaleContract);
        let vesting_id = env.register_contract(None, VestingContract);

        let sale = CrowdsaleContractClient::new(&env, &sale_id);
        sale.initialize(&owner, &vesting_id, &token_id, &payment_id);
        sale.fund_calls(&owner, &CALL_UNITS);

        let vesting = VestingContractClient::new(&env, &vesting_id);
        vesting.initialize(&owner, &sale_id, &token_id, &MONTH);
        vesting.fund_calls(&owner, &CALL_UNITS);
        token.transfer(&owner, &vesting_id, &TOKEN_SUPPLY);

        Self {
            env: env.clone(),
            owner,
            sale,
            vesting,
            token,
            payment: token::Client::new(&env, &payment_id),
            payment_admin: token::StellarAssetClient::new(&env, &payment_id),
        }
    }

    pub fn paid_round(&self, supply: u128, price: u128) -> RoundConfig {
        RoundConfig {
            name: String::from_str(&self.env, "Private"),
            supply,
            cliff_months: 1,
            vesting_months: 4,
            unlock_rate: 20,
            start_date: ROUND_START,
            price,
            is_free: false,
            whitelist_only: false,
        }
    }

    pub fn free_round(&self, supply: u128) -> RoundConfig {
        RoundConfig {
            name: String::from_str(&self.env, "Team"),
            price: 0,
            is_free: true,
            ..self.paid_round(supply, 0)
        }
    }

    /// Creates a round, relays every queued call and moves it to `state`.
    pub fn open_round(&self, config: &RoundConfig, state: RoundState) -> u32 {
        self.sale.create_round(&self.owner, config);
        self.relay();
        let round_id = self.sale.get_round_count() - 1;
        if state != RoundState::Inactive {
            self.sale.change_round_state(&self.owner, &round_id, &state);
            self.relay();
        }
        round_id
    }

    pub fn funded_buyer(&self, amount: i128) -> Address {
        let buyer = Address::generate(&self.env);
        self.payment_admin.mint(&buyer, &amount);
        buyer
    }

    /// Dispatches everything queued on both contracts until both outboxes
    /// are empty. Returns the number of calls run.
    pub fn relay(&self) -> u32 {
        let mut total = 0;
        loop {
            let ran = self.sale.dispatch_pending(&u32::MAX) + self.vesting.dispatch_pending(&u32::MAX);
            if ran == 0 {
                return total;
            }
            total += ran;
        }
    }

    /// Moves the ledger to `months` whole months after the round start.
    pub fn months_after_start(&self, months: u64) {
        self.env
            .ledger()
            .with_mut(|l| l.timestamp = ROUND_START + months * MONTH);
    }
}
