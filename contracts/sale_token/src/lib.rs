#![no_std]

//! Fixed-supply fungible token sold by the crowdsale and paid out by the
//! vesting contract. The whole supply is minted to the admin at
//! initialization; there is no later minting or burning.

use soroban_sdk::{
    contract, contracterror, contractimpl, contractmeta, contracttype, symbol_short, Address, Env,
    String,
};

contractmeta!(
    key = "Description",
    val = "Sale Token - fixed-supply token distributed through the crowdsale"
);

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TokenError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidAmount = 3,
    InsufficientBalance = 4,
    InsufficientAllowance = 5,
}

#[derive(Clone)]
#[contracttype]
pub struct TokenMetadata {
    pub decimal: u32,
    pub name: String,
    pub symbol: String,
}

#[contracttype]
pub enum DataKey {
    Admin,
    Metadata,
    TotalSupply,
    Balance(Address),
    Allowance(Address, Address),
}

#[derive(Clone)]
#[contracttype]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub amount: i128,
}

#[derive(Clone)]
#[contracttype]
pub struct ApprovalEvent {
    pub owner: Address,
    pub spender: Address,
    pub amount: i128,
}

fn read_balance(env: &Env, id: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(id.clone()))
        .unwrap_or(0)
}

fn write_balance(env: &Env, id: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Balance(id.clone()), &amount);
}

fn read_allowance(env: &Env, owner: &Address, spender: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Allowance(owner.clone(), spender.clone()))
        .unwrap_or(0)
}

fn move_balance(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), TokenError> {
    if amount <= 0 {
        return Err(TokenError::InvalidAmount);
    }
    let from_balance = read_balance(env, from);
    if from_balance < amount {
        return Err(TokenError::InsufficientBalance);
    }
    write_balance(env, from, from_balance - amount);
    let to_balance = read_balance(env, to)
        .checked_add(amount)
        .ok_or(TokenError::InvalidAmount)?;
    write_balance(env, to, to_balance);

    env.events().publish(
        ("TOKEN", symbol_short!("transfer")),
        TransferEvent {
            from: from.clone(),
            to: to.clone(),
            amount,
        },
    );
    Ok(())
}

fn metadata(env: &Env) -> Result<TokenMetadata, TokenError> {
    env.storage()
        .instance()
        .get(&DataKey::Metadata)
        .ok_or(TokenError::NotInitialized)
}

#[contract]
pub struct SaleToken;

#[contractimpl]
impl SaleToken {
    pub fn initialize(
        env: Env,
        admin: Address,
        decimal: u32,
        name: String,
        symbol: String,
        total_supply: i128,
    ) -> Result<(), TokenError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(TokenError::AlreadyInitialized);
        }
        if total_supply <= 0 {
            return Err(TokenError::InvalidAmount);
        }
        admin.require_auth();

        let metadata = TokenMetadata {
            decimal,
            name,
            symbol,
        };
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Metadata, &metadata);
        env.storage()
            .instance()
            .set(&DataKey::TotalSupply, &total_supply);
        write_balance(&env, &admin, total_supply);

        env.events()
            .publish(("TOKEN", symbol_short!("init")), (admin, total_supply));
        Ok(())
    }

    pub fn total_supply(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0)
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        read_balance(&env, &id)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), TokenError> {
        from.require_auth();
        move_balance(&env, &from, &to, amount)
    }

    /// Sets the amount `spender` may move out of `owner`'s balance. Zero clears it.
    pub fn approve(
        env: Env,
        owner: Address,
        spender: Address,
        amount: i128,
    ) -> Result<(), TokenError> {
        owner.require_auth();
        if amount < 0 {
            return Err(TokenError::InvalidAmount);
        }
        env.storage()
            .persistent()
            .set(&DataKey::Allowance(owner.clone(), spender.clone()), &amount);

        env.events().publish(
            ("TOKEN", symbol_short!("approve")),
            ApprovalEvent {
                owner,
                spender,
                amount,
            },
        );
        Ok(())
    }

    pub fn allowance(env: Env, owner: Address, spender: Address) -> i128 {
        read_allowance(&env, &owner, &spender)
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), TokenError> {
        spender.require_auth();
        let allowed = read_allowance(&env, &from, &spender);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance);
        }
        move_balance(&env, &from, &to, amount)?;
        env.storage()
            .persistent()
            .set(&DataKey::Allowance(from, spender), &(allowed - amount));
        Ok(())
    }

    pub fn decimals(env: Env) -> Result<u32, TokenError> {
        Ok(metadata(&env)?.decimal)
    }

    pub fn name(env: Env) -> Result<String, TokenError> {
        Ok(metadata(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, TokenError> {
        Ok(metadata(&env)?.symbol)
    }
}
