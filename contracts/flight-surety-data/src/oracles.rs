//! Oracle registration and quorum-based status finalization.
//!
//! Each oracle holds three indexes. A status request carries one index and
//! only oracles holding that index may answer it. Responses are tallied per
//! status code; the first code whose set of distinct respondents reaches
//! `min_responses` finalizes the request:
//!
//! ```text
//! Open ──(quorum on code C)──► Resolved(C)
//! ```
//!
//! Responses to a resolved request are accepted and ignored.
//!
//! Index derivation is a pure function of its inputs (a SHA-256 digest of
//! the oracle or flight identity plus a sequence number), so assignments are
//! reproducible yet not known before the sequence number is.

use soroban_sdk::{log, symbol_short, xdr::ToXdr, Address, Bytes, Env, Symbol, Vec};

use crate::config;
use crate::errors::ContractError;
use crate::escrow;
use crate::registry;
use crate::storage::{self, DataKey};
use crate::types::{FlightStatus, OracleRegistration, OracleRequest, RequestKey};

pub const INDEXES_PER_ORACLE: u32 = 3;

fn index_from_seed(env: &Env, seed: &Bytes, index_range: u32) -> u32 {
    let digest = env.crypto().sha256(seed).to_array();
    u32::from(digest[0]) % index_range
}

/// Indexes for the oracle registered as number `sequence`.
pub fn assigned_indexes(env: &Env, oracle: &Address, sequence: u32, index_range: u32) -> Vec<u32> {
    let mut indexes = Vec::new(env);
    for k in 0..INDEXES_PER_ORACLE {
        let mut seed = oracle.clone().to_xdr(env);
        seed.extend_from_array(&sequence.to_be_bytes());
        seed.extend_from_array(&k.to_be_bytes());
        indexes.push_back(index_from_seed(env, &seed, index_range));
    }
    indexes
}

/// Index for the `nonce`-th status request.
pub fn request_index(
    env: &Env,
    airline: &Address,
    code: &Symbol,
    timestamp: u64,
    nonce: u32,
    index_range: u32,
) -> u32 {
    let mut seed = airline.clone().to_xdr(env);
    seed.append(&code.clone().to_xdr(env));
    seed.extend_from_array(&timestamp.to_be_bytes());
    seed.extend_from_array(&nonce.to_be_bytes());
    index_from_seed(env, &seed, index_range)
}

pub fn load(env: &Env, oracle: &Address) -> Option<OracleRegistration> {
    env.storage()
        .persistent()
        .get(&DataKey::Oracle(oracle.clone()))
}

pub fn oracle_count(env: &Env) -> u32 {
    storage::get_count(env, &DataKey::OracleCount)
}

pub fn register(env: &Env, oracle: &Address, fee: i128) -> Result<Vec<u32>, ContractError> {
    let cfg = config::load(env);
    if fee < cfg.oracle_registration_fee {
        return Err(ContractError::InsufficientFee);
    }
    if load(env, oracle).is_some() {
        return Err(ContractError::OracleAlreadyRegistered);
    }

    let sequence = oracle_count(env);
    let indexes = assigned_indexes(env, oracle, sequence, cfg.index_range);

    let registration = OracleRegistration {
        oracle: oracle.clone(),
        indexes: indexes.clone(),
        registered_at: env.ledger().timestamp(),
    };
    env.storage()
        .persistent()
        .set(&DataKey::Oracle(oracle.clone()), &registration);
    storage::increment_count(env, &DataKey::OracleCount);

    env.events().publish(
        (symbol_short!("oracle"), symbol_short!("regist")),
        (oracle.clone(), indexes.clone()),
    );

    Ok(indexes)
}

pub fn load_request(env: &Env, key: &RequestKey) -> Option<OracleRequest> {
    env.storage().persistent().get(&DataKey::Request(key.clone()))
}

pub fn respondents(env: &Env, key: &RequestKey, status: FlightStatus) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Responses(key.clone(), status))
        .unwrap_or_else(|| Vec::new(env))
}

/// Opens a request and emits the event oracles listen for. Asking again
/// under a key that already exists leaves that request as it is.
pub fn request_status(
    env: &Env,
    airline: &Address,
    code: &Symbol,
    timestamp: u64,
) -> Result<u32, ContractError> {
    registry::require_registered(env, &registry::flight_key(airline, code))?;

    let cfg = config::load(env);
    let nonce = storage::increment_count(env, &DataKey::RequestNonce);
    let index = request_index(env, airline, code, timestamp, nonce, cfg.index_range);

    let key = RequestKey {
        index,
        airline: airline.clone(),
        code: code.clone(),
        timestamp,
    };
    if load_request(env, &key).is_none() {
        let request = OracleRequest {
            key: key.clone(),
            opened_at: env.ledger().timestamp(),
            resolved: false,
            status: FlightStatus::Unknown,
        };
        env.storage()
            .persistent()
            .set(&DataKey::Request(key), &request);
    }

    env.events().publish(
        (symbol_short!("oracle"), symbol_short!("request")),
        (airline.clone(), code.clone(), timestamp, index),
    );

    Ok(index)
}

/// Tallies one response. Returns true only for the response that
/// finalized the request.
pub fn submit_response(
    env: &Env,
    oracle: &Address,
    key: &RequestKey,
    status: FlightStatus,
) -> Result<bool, ContractError> {
    let registration = load(env, oracle).ok_or(ContractError::OracleNotRegistered)?;
    if !registration.indexes.contains(key.index) {
        return Err(ContractError::IndexMismatch);
    }

    let mut request = load_request(env, key).ok_or(ContractError::UnknownRequest)?;
    if request.resolved {
        log!(env, "response after resolution ignored", oracle.clone());
        return Ok(false);
    }

    let mut responded = respondents(env, key, status);
    if !responded.contains(oracle) {
        responded.push_back(oracle.clone());
        env.storage()
            .persistent()
            .set(&DataKey::Responses(key.clone(), status), &responded);
    }

    env.events().publish(
        (symbol_short!("oracle"), symbol_short!("report")),
        (key.airline.clone(), key.code.clone(), key.timestamp, status, oracle.clone()),
    );

    if responded.len() < config::load(env).min_responses {
        return Ok(false);
    }

    request.resolved = true;
    request.status = status;
    env.storage()
        .persistent()
        .set(&DataKey::Request(key.clone()), &request);

    let flight_key = registry::flight_key(&key.airline, &key.code);
    registry::set_status(env, &flight_key, status)?;

    if status == FlightStatus::LateAirline {
        escrow::credit_insurees(env, &flight_key)?;
    }

    log!(env, "flight status finalized", key.code.clone(), status);
    env.events().publish(
        (symbol_short!("flight"), symbol_short!("status")),
        (key.airline.clone(), key.code.clone(), key.timestamp, status),
    );

    Ok(true)
}
