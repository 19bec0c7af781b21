use crate::types::*;
use sale_shared::SaleError;
use soroban_sdk::{Address, Env, Vec};

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn get_owner(env: &Env) -> Result<Address, SaleError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(SaleError::NotInitialized)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn get_config(env: &Env) -> Result<SaleConfig, SaleError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(SaleError::NotInitialized)
}

pub fn set_config(env: &Env, config: &SaleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_round_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::RoundCount)
        .unwrap_or(0)
}

pub fn set_round_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::RoundCount, &count);
}

pub fn get_total_allocation(env: &Env) -> u128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalAllocation)
        .unwrap_or(0)
}

pub fn set_total_allocation(env: &Env, amount: u128) {
    env.storage()
        .instance()
        .set(&DataKey::TotalAllocation, &amount);
}

pub fn get_total_leftover(env: &Env) -> u128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalLeftover)
        .unwrap_or(0)
}

pub fn set_total_leftover(env: &Env, amount: u128) {
    env.storage().instance().set(&DataKey::TotalLeftover, &amount);
}

pub fn get_round(env: &Env, round_id: u32) -> Option<SaleRound> {
    env.storage().persistent().get(&DataKey::Round(round_id))
}

pub fn load_round(env: &Env, round_id: u32) -> Result<SaleRound, SaleError> {
    get_round(env, round_id).ok_or(SaleError::NotFound)
}

/// Writes a round after checking the supply invariants.
pub fn set_round(env: &Env, round_id: u32, round: &SaleRound) -> Result<(), SaleError> {
    if round.allocated > round.supply || round.sold > round.allocated {
        return Err(SaleError::InsufficientSupply);
    }
    env.storage()
        .persistent()
        .set(&DataKey::Round(round_id), round);
    Ok(())
}

pub fn get_members(env: &Env, round_id: u32) -> Option<Vec<Address>> {
    env.storage().persistent().get(&DataKey::Members(round_id))
}

pub fn set_members(env: &Env, round_id: u32, members: &Vec<Address>) {
    env.storage()
        .persistent()
        .set(&DataKey::Members(round_id), members);
}

pub fn is_member(env: &Env, member: &Address, round_id: u32) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::IsMember(member.clone(), round_id))
        .unwrap_or(false)
}

pub fn add_member(env: &Env, member: &Address, round_id: u32) {
    let mut members = get_members(env, round_id).unwrap_or(Vec::new(env));
    members.push_back(member.clone());
    set_members(env, round_id, &members);
    env.storage()
        .persistent()
        .set(&DataKey::IsMember(member.clone(), round_id), &true);
}

pub fn remove_member(env: &Env, member: &Address, round_id: u32) {
    if let Some(members) = get_members(env, round_id) {
        let mut kept = Vec::new(env);
        for m in members.iter() {
            if m != *member {
                kept.push_back(m);
            }
        }
        set_members(env, round_id, &kept);
    }
    env.storage()
        .persistent()
        .remove(&DataKey::IsMember(member.clone(), round_id));
}

pub fn get_whitelist(env: &Env, round_id: u32) -> Option<Vec<Address>> {
    env.storage().persistent().get(&DataKey::Whitelist(round_id))
}

pub fn set_whitelist(env: &Env, round_id: u32, whitelist: &Vec<Address>) {
    env.storage()
        .persistent()
        .set(&DataKey::Whitelist(round_id), whitelist);
}

pub fn is_whitelisted(env: &Env, beneficiary: &Address, round_id: u32) -> bool {
    get_whitelist(env, round_id)
        .map(|list| list.contains(beneficiary))
        .unwrap_or(false)
}
