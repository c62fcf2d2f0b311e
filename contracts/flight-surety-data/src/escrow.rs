//! Passenger policies, payout credit and withdrawals.
//!
//! The business layer deposits the full payment into this contract before
//! calling [`buy`]. Whatever exceeds the cap goes straight back to the
//! passenger in the same invocation, so the escrow never holds the excess.

use soroban_sdk::{log, symbol_short, token, Address, Env, Vec};

use crate::config;
use crate::errors::ContractError;
use crate::registry;
use crate::storage::DataKey;
use crate::types::{FlightKey, FlightStatus, InsurancePolicy};

/// Splits a payment into the retained premium and the refund.
pub fn split_premium(amount: i128, cap: i128) -> (i128, i128) {
    let premium = amount.min(cap);
    (premium, amount - premium)
}

/// Payout for a premium under a `numerator / denominator` ratio,
/// rounded down.
pub fn payout_for(premium: i128, numerator: i128, denominator: i128) -> Result<i128, ContractError> {
    premium
        .checked_mul(numerator)
        .and_then(|v| v.checked_div(denominator))
        .ok_or(ContractError::ArithmeticOverflow)
}

pub fn token_address(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(ContractError::NotInitialized)
}

pub fn load_policy(env: &Env, key: &FlightKey, passenger: &Address) -> Option<InsurancePolicy> {
    env.storage()
        .persistent()
        .get(&DataKey::Policy(key.clone(), passenger.clone()))
}

fn save_policy(env: &Env, policy: &InsurancePolicy) {
    env.storage().persistent().set(
        &DataKey::Policy(policy.flight.clone(), policy.passenger.clone()),
        policy,
    );
}

pub fn insurees(env: &Env, key: &FlightKey) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Insurees(key.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

pub fn balance(env: &Env, passenger: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(passenger.clone()))
        .unwrap_or(0)
}

/// Records a purchase and returns the refunded excess.
///
/// Cover can only be bought while the flight's status is still `Unknown`.
/// A policy that was already paid out takes no further premium, even after
/// the flight is re-scheduled.
pub fn buy(
    env: &Env,
    passenger: &Address,
    key: &FlightKey,
    amount: i128,
) -> Result<i128, ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    let flight = registry::require_registered(env, key)?;
    if flight.status != FlightStatus::Unknown {
        return Err(ContractError::FlightSettled);
    }

    let cfg = config::load(env);
    let (premium, refund) = split_premium(amount, cfg.insurance_cap);

    let mut policy = match load_policy(env, key, passenger) {
        Some(policy) if policy.payout_credited => {
            return Err(ContractError::FlightSettled);
        }
        Some(policy) => policy,
        None => {
            let mut passengers = insurees(env, key);
            passengers.push_back(passenger.clone());
            env.storage()
                .persistent()
                .set(&DataKey::Insurees(key.clone()), &passengers);

            InsurancePolicy {
                flight: key.clone(),
                passenger: passenger.clone(),
                amount_paid: 0,
                payout: 0,
                payout_credited: false,
            }
        }
    };

    policy.amount_paid = policy
        .amount_paid
        .checked_add(premium)
        .ok_or(ContractError::ArithmeticOverflow)?;
    save_policy(env, &policy);

    if refund > 0 {
        let token_client = token::Client::new(env, &token_address(env)?);
        token_client.transfer(&env.current_contract_address(), passenger, &refund);
    }

    env.events().publish(
        (symbol_short!("ins"), symbol_short!("bought")),
        (passenger.clone(), key.airline.clone(), key.code.clone(), premium, refund),
    );

    Ok(refund)
}

/// Credits every uncredited policy on the flight and returns the total.
pub(crate) fn credit_insurees(env: &Env, key: &FlightKey) -> Result<i128, ContractError> {
    let cfg = config::load(env);
    let mut total: i128 = 0;

    for passenger in insurees(env, key).iter() {
        let mut policy = match load_policy(env, key, &passenger) {
            Some(policy) if !policy.payout_credited => policy,
            _ => continue,
        };

        let payout = payout_for(
            policy.amount_paid,
            cfg.payout_numerator,
            cfg.payout_denominator,
        )?;
        policy.payout = payout;
        policy.payout_credited = true;
        save_policy(env, &policy);

        let credited = balance(env, &passenger)
            .checked_add(payout)
            .ok_or(ContractError::ArithmeticOverflow)?;
        env.storage()
            .persistent()
            .set(&DataKey::Balance(passenger.clone()), &credited);

        total = total
            .checked_add(payout)
            .ok_or(ContractError::ArithmeticOverflow)?;

        env.events().publish(
            (symbol_short!("ins"), symbol_short!("credited")),
            (passenger, key.airline.clone(), key.code.clone(), payout),
        );
    }

    log!(env, "insurees credited", key.code.clone(), total);
    Ok(total)
}

/// Pays out the whole withdrawable balance. The balance is cleared before
/// the transfer so a re-entrant call sees nothing left.
pub fn withdraw(env: &Env, passenger: &Address) -> Result<i128, ContractError> {
    let amount = balance(env, passenger);
    if amount <= 0 {
        return Ok(0);
    }

    env.storage()
        .persistent()
        .remove(&DataKey::Balance(passenger.clone()));

    let token_client = token::Client::new(env, &token_address(env)?);
    token_client.transfer(&env.current_contract_address(), passenger, &amount);

    env.events().publish(
        (symbol_short!("ins"), symbol_short!("withdrawn")),
        (passenger.clone(), amount),
    );

    Ok(amount)
}
