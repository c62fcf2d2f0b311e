use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::errors::ContractError;
use crate::governance;
use crate::storage::DataKey;
use crate::types::{Flight, FlightKey, FlightStatus};

pub fn flight_key(airline: &Address, code: &Symbol) -> FlightKey {
    FlightKey {
        airline: airline.clone(),
        code: code.clone(),
    }
}

pub fn load(env: &Env, key: &FlightKey) -> Option<Flight> {
    env.storage().persistent().get(&DataKey::Flight(key.clone()))
}

pub fn is_registered(env: &Env, key: &FlightKey) -> bool {
    env.storage().persistent().has(&DataKey::Flight(key.clone()))
}

pub fn require_registered(env: &Env, key: &FlightKey) -> Result<Flight, ContractError> {
    load(env, key).ok_or(ContractError::FlightNotRegistered)
}

/// Creates the flight, or re-schedules it when the key already exists.
/// Either way the status starts over at `Unknown`.
pub fn register(
    env: &Env,
    airline: &Address,
    code: &Symbol,
    timestamp: u64,
) -> Result<(), ContractError> {
    governance::require_funded(env, airline)?;

    let flight = Flight {
        airline: airline.clone(),
        code: code.clone(),
        timestamp,
        status: FlightStatus::Unknown,
        updated_at: env.ledger().timestamp(),
    };
    env.storage()
        .persistent()
        .set(&DataKey::Flight(flight_key(airline, code)), &flight);

    env.events().publish(
        (symbol_short!("flight"), symbol_short!("regist")),
        (airline.clone(), code.clone(), timestamp),
    );

    Ok(())
}

pub(crate) fn set_status(
    env: &Env,
    key: &FlightKey,
    status: FlightStatus,
) -> Result<Flight, ContractError> {
    let mut flight = require_registered(env, key)?;
    flight.status = status;
    flight.updated_at = env.ledger().timestamp();
    env.storage()
        .persistent()
        .set(&DataKey::Flight(key.clone()), &flight);
    Ok(flight)
}
