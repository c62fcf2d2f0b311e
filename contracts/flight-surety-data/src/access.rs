//! Operational switch, owner checks and the authorized-caller whitelist.
//!
//! Every mutating entry point of the state layer runs
//! [`require_operational`] and then [`require_authorized_caller`] before it
//! touches any record. Both re-read storage on each call.

use soroban_sdk::{log, symbol_short, Address, Env};

use crate::errors::ContractError;
use crate::storage::DataKey;

pub fn is_operational(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Operational)
        .unwrap_or(false)
}

pub fn require_operational(env: &Env) -> Result<(), ContractError> {
    if !is_operational(env) {
        return Err(ContractError::NotOperational);
    }
    Ok(())
}

pub fn owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Owner)
}

/// The caller must be the stored owner and must have signed the call.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
    let owner = owner(env).ok_or(ContractError::NotAuthorized)?;
    if *caller != owner {
        return Err(ContractError::NotAuthorized);
    }
    caller.require_auth();
    Ok(())
}

pub fn set_operational(env: &Env, mode: bool) {
    if is_operational(env) == mode {
        return;
    }
    env.storage().instance().set(&DataKey::Operational, &mode);
    log!(env, "operating status changed", mode);
    env.events().publish((symbol_short!("op_mode"),), (mode,));
}

pub fn is_authorized_caller(env: &Env, caller: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::AuthorizedCaller(caller.clone()))
}

/// The immediate caller must be whitelisted. When the caller is the
/// invoking contract `require_auth` is satisfied by the host.
pub fn require_authorized_caller(env: &Env, caller: &Address) -> Result<(), ContractError> {
    if !is_authorized_caller(env, caller) {
        return Err(ContractError::NotAuthorizedCaller);
    }
    caller.require_auth();
    Ok(())
}

/// Both gates every mutating operation passes through, in order.
pub fn require_mutable(env: &Env, caller: &Address) -> Result<(), ContractError> {
    require_operational(env)?;
    require_authorized_caller(env, caller)
}

pub fn authorize(env: &Env, contract: &Address) {
    env.storage()
        .persistent()
        .set(&DataKey::AuthorizedCaller(contract.clone()), &true);
    env.events()
        .publish((symbol_short!("auth_add"),), (contract.clone(),));
}

pub fn deauthorize(env: &Env, contract: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::AuthorizedCaller(contract.clone()));
    env.events()
        .publish((symbol_short!("auth_rem"),), (contract.clone(),));
}
