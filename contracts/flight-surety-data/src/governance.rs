//! Airline membership: sponsorship, multi-party voting and funding.
//!
//! The first members join on the word of a single funded sponsor. Once
//! `multiparty_threshold` airlines are members, a candidate needs approvals
//! from at least half of the currently funded airlines:
//!
//! ```text
//! votes * 2 >= funded_count
//! ```
//!
//! Each sponsor counts once per candidate no matter how often it votes.

use soroban_sdk::{log, symbol_short, Address, Env, String, Vec};

use crate::config;
use crate::errors::ContractError;
use crate::storage::{self, DataKey};
use crate::types::{Airline, AirlineStatus, RegistrationResult};

/// Integer consensus rule, no rounding.
pub fn has_consensus(votes: u32, funded_count: u32) -> bool {
    (votes as u64) * 2 >= funded_count as u64
}

pub fn load(env: &Env, address: &Address) -> Option<Airline> {
    env.storage()
        .persistent()
        .get(&DataKey::Airline(address.clone()))
}

fn save(env: &Env, airline: &Airline) {
    env.storage()
        .persistent()
        .set(&DataKey::Airline(airline.address.clone()), airline);
}

pub fn status(env: &Env, address: &Address) -> Option<AirlineStatus> {
    load(env, address).map(|airline| airline.status)
}

pub fn is_registered(env: &Env, address: &Address) -> bool {
    matches!(
        status(env, address),
        Some(AirlineStatus::Registered) | Some(AirlineStatus::Funded)
    )
}

pub fn is_funded(env: &Env, address: &Address) -> bool {
    status(env, address) == Some(AirlineStatus::Funded)
}

pub fn require_funded(env: &Env, address: &Address) -> Result<(), ContractError> {
    if !is_funded(env, address) {
        return Err(ContractError::NotFunded);
    }
    Ok(())
}

pub fn airline_count(env: &Env) -> u32 {
    storage::get_count(env, &DataKey::AirlineCount)
}

pub fn funded_count(env: &Env) -> u32 {
    storage::get_count(env, &DataKey::FundedCount)
}

/// Registers the founding member at initialization, outside of any vote.
pub fn register_genesis(env: &Env, address: &Address, name: String) {
    let airline = Airline {
        address: address.clone(),
        name,
        status: AirlineStatus::Registered,
        votes: Vec::new(env),
        funds: 0,
    };
    save(env, &airline);
    env.storage().instance().set(&DataKey::AirlineCount, &1u32);
    env.storage().instance().set(&DataKey::FundedCount, &0u32);
}

pub fn register(
    env: &Env,
    sponsor: &Address,
    candidate: &Address,
    name: String,
) -> Result<RegistrationResult, ContractError> {
    require_funded(env, sponsor)?;

    let mut airline = match load(env, candidate) {
        Some(existing) if existing.status != AirlineStatus::Applied => {
            return Err(ContractError::AlreadyRegistered);
        }
        Some(existing) => existing,
        None => Airline {
            address: candidate.clone(),
            name,
            status: AirlineStatus::Applied,
            votes: Vec::new(env),
            funds: 0,
        },
    };

    if !airline.votes.contains(sponsor) {
        airline.votes.push_back(sponsor.clone());
    }
    let num_votes = airline.votes.len();

    let cfg = config::load(env);
    let success = airline_count(env) < cfg.multiparty_threshold
        || has_consensus(num_votes, funded_count(env));

    if success {
        airline.status = AirlineStatus::Registered;
        storage::increment_count(env, &DataKey::AirlineCount);
        log!(env, "airline registered", candidate.clone(), num_votes);
        env.events().publish(
            (symbol_short!("airline"), symbol_short!("regist")),
            (candidate.clone(), sponsor.clone(), num_votes),
        );
    } else {
        env.events().publish(
            (symbol_short!("airline"), symbol_short!("voted")),
            (candidate.clone(), sponsor.clone(), num_votes),
        );
    }

    save(env, &airline);

    Ok(RegistrationResult { success, num_votes })
}

/// Moves a registered airline to `Funded`. The funding threshold applies
/// to that first deposit only: once funded, any positive amount is accepted
/// as a top-up and leaves the airline's standing unchanged.
pub fn fund(env: &Env, address: &Address, amount: i128) -> Result<(), ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }

    let mut airline = load(env, address).ok_or(ContractError::NotRegistered)?;

    match airline.status {
        AirlineStatus::Applied => return Err(ContractError::NotRegistered),
        AirlineStatus::Registered => {
            if amount < config::load(env).funding_threshold {
                return Err(ContractError::InsufficientFunding);
            }
            airline.status = AirlineStatus::Funded;
            storage::increment_count(env, &DataKey::FundedCount);
        }
        AirlineStatus::Funded => {}
    }

    airline.funds = airline
        .funds
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    save(env, &airline);

    env.events().publish(
        (symbol_short!("airline"), symbol_short!("funded")),
        (address.clone(), amount),
    );

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_consensus_boundaries() {
        assert!(!has_consensus(1, 4));
        assert!(has_consensus(2, 4));
        assert!(!has_consensus(2, 5));
        assert!(has_consensus(3, 5));
        assert!(has_consensus(0, 0));
    }

    proptest! {
        #[test]
        fn consensus_matches_half_of_funded(votes in 0u32..1000, funded in 0u32..1000) {
            prop_assert_eq!(has_consensus(votes, funded), 2 * votes >= funded);
        }

        #[test]
        fn consensus_is_monotonic_in_votes(votes in 0u32..1000, funded in 0u32..1000) {
            if has_consensus(votes, funded) {
                prop_assert!(has_consensus(votes + 1, funded));
            }
        }
    }
}
