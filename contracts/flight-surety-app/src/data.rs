//! Interface of the FlightSurety data contract as seen from the business
//! layer.
//!
//! The types below mirror the data contract's definitions for cross-contract
//! (de)serialization. Field names, variants and discriminants must match
//! the data contract exactly.

use soroban_sdk::{contractclient, contracttype, Address, Env, String, Symbol, Vec};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistrationResult {
    pub success: bool,
    pub num_votes: u32,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FlightStatus {
    Unknown = 0,
    OnTime = 10,
    LateAirline = 20,
    LateWeather = 30,
    LateTechnical = 40,
    LateOther = 50,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InsuranceConfig {
    pub funding_threshold: i128,
    pub insurance_cap: i128,
    pub payout_numerator: i128,
    pub payout_denominator: i128,
    pub oracle_registration_fee: i128,
    pub min_responses: u32,
    pub multiparty_threshold: u32,
    pub index_range: u32,
}

/// Entry points of the data contract used by this contract. A failing call
/// traps and aborts the whole invocation, token transfers included.
#[allow(dead_code)]
#[contractclient(name = "DataClient")]
pub trait DataContract {
    fn is_operational(env: Env) -> bool;
    fn get_token(env: Env) -> Option<Address>;
    fn get_config(env: Env) -> InsuranceConfig;

    fn register_airline(
        env: Env,
        caller: Address,
        sponsor: Address,
        candidate: Address,
        name: String,
    ) -> RegistrationResult;
    fn fund_airline(env: Env, caller: Address, airline: Address, amount: i128);
    fn is_airline_registered(env: Env, airline: Address) -> bool;
    fn is_airline_funded(env: Env, airline: Address) -> bool;
    fn get_funded_airline_count(env: Env) -> u32;

    fn register_flight(env: Env, caller: Address, airline: Address, code: Symbol, timestamp: u64);
    fn is_flight_registered(env: Env, airline: Address, code: Symbol) -> bool;

    fn buy_insurance(
        env: Env,
        caller: Address,
        passenger: Address,
        airline: Address,
        code: Symbol,
        amount: i128,
    ) -> i128;
    fn withdraw(env: Env, caller: Address, passenger: Address) -> i128;
    fn get_insuree_balance(env: Env, airline: Address, code: Symbol, passenger: Address) -> i128;
    fn get_balance(env: Env, passenger: Address) -> i128;

    fn register_oracle(env: Env, caller: Address, oracle: Address, fee: i128) -> Vec<u32>;
    fn get_oracle_indexes(env: Env, oracle: Address) -> Vec<u32>;
    fn request_flight_status(
        env: Env,
        caller: Address,
        airline: Address,
        code: Symbol,
        timestamp: u64,
    ) -> u32;
    fn submit_oracle_response(
        env: Env,
        caller: Address,
        oracle: Address,
        index: u32,
        airline: Address,
        code: Symbol,
        timestamp: u64,
        status: FlightStatus,
    ) -> bool;
}
