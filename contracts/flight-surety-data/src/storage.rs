//! Storage keys and the small counters kept in instance storage.
//!
//! Contract-wide settings and counters live in instance storage. Records
//! that grow with usage (airlines, flights, policies, oracles, requests)
//! live in persistent storage under their own key.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{FlightKey, FlightStatus, RequestKey};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    Token,
    Operational,
    Config,
    /// Airlines that are Registered or Funded
    AirlineCount,
    FundedCount,
    OracleCount,
    RequestNonce,
    AuthorizedCaller(Address),
    Airline(Address),
    Flight(FlightKey),
    Policy(FlightKey, Address),
    /// Passengers holding a policy on a flight, in purchase order
    Insurees(FlightKey),
    /// Withdrawable payout credit
    Balance(Address),
    Oracle(Address),
    Request(RequestKey),
    Responses(RequestKey, FlightStatus),
}

pub fn get_count(env: &Env, key: &DataKey) -> u32 {
    env.storage().instance().get(key).unwrap_or(0)
}

pub fn increment_count(env: &Env, key: &DataKey) -> u32 {
    let next = get_count(env, key).saturating_add(1);
    env.storage().instance().set(key, &next);
    next
}
