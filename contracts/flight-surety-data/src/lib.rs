//! FlightSurety Data Contract
//!
//! State layer of a cooperative flight-insurance marketplace. Airlines join
//! a membership pool under a multi-party voting rule, register flights,
//! passengers buy capped insurance, and a panel of independent oracles
//! reaches quorum on each flight's status, which triggers payouts.
//!
//! The contract holds every record and every escrowed token. Mutating entry
//! points take the immediate `caller` as their first argument: it must be
//! on the authorized-caller whitelist maintained by the owner, which in
//! practice is the business-layer contract. Queries are open to anyone and
//! stay available while the contract is paused.

#![no_std]

mod access;
pub mod config;
mod errors;
mod escrow;
mod governance;
mod oracles;
mod registry;
mod storage;
mod types;

use soroban_sdk::{contract, contractimpl, symbol_short, token, Address, Env, String, Symbol, Vec};

pub use errors::ContractError;
pub use types::{
    Airline, AirlineStatus, Flight, FlightKey, FlightStatus, InsuranceConfig, InsurancePolicy,
    OracleRegistration, OracleRequest, RegistrationResult, RequestKey,
};

use storage::DataKey;

#[contract]
pub struct FlightSuretyData;

#[contractimpl]
impl FlightSuretyData {
    /// Initialize the contract.
    ///
    /// # Arguments
    /// * `owner` - Account allowed to pause the contract, manage callers and policy constants
    /// * `token` - Token contract holding escrowed funds
    /// * `genesis_airline` - First member, registered without a vote
    /// * `genesis_name` - Display name of the first member
    pub fn initialize(
        env: Env,
        owner: Address,
        token: Address,
        genesis_airline: Address,
        genesis_name: String,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(ContractError::AlreadyInitialized);
        }

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::Operational, &true);
        config::store(&env, &config::default_config());
        governance::register_genesis(&env, &genesis_airline, genesis_name);

        env.events()
            .publish((symbol_short!("init"),), (owner, token, genesis_airline));

        Ok(())
    }

    // -- Operational guard ---------------------------------------------------

    /// Pause or resume every mutating operation (owner only).
    pub fn set_operating_status(env: Env, caller: Address, mode: bool) -> Result<(), ContractError> {
        access::require_owner(&env, &caller)?;
        access::set_operational(&env, mode);
        Ok(())
    }

    pub fn is_operational(env: Env) -> bool {
        access::is_operational(&env)
    }

    // -- Caller authorization ------------------------------------------------

    /// Whitelist a contract allowed to mutate state (owner only).
    pub fn authorize_caller(env: Env, caller: Address, contract: Address) -> Result<(), ContractError> {
        access::require_owner(&env, &caller)?;
        access::authorize(&env, &contract);
        Ok(())
    }

    /// Remove a contract from the whitelist (owner only).
    pub fn deauthorize_caller(env: Env, caller: Address, contract: Address) -> Result<(), ContractError> {
        access::require_owner(&env, &caller)?;
        access::deauthorize(&env, &contract);
        Ok(())
    }

    pub fn is_caller_authorized(env: Env, contract: Address) -> bool {
        access::is_authorized_caller(&env, &contract)
    }

    // -- Configuration -------------------------------------------------------

    /// Replace the policy constants (owner only).
    pub fn set_config(env: Env, caller: Address, config: InsuranceConfig) -> Result<(), ContractError> {
        access::require_owner(&env, &caller)?;
        config::validate(&config)?;
        config::store(&env, &config);
        env.events().publish((symbol_short!("cfg_set"),), (config,));
        Ok(())
    }

    pub fn get_config(env: Env) -> InsuranceConfig {
        config::load(&env)
    }

    pub fn get_owner(env: Env) -> Option<Address> {
        access::owner(&env)
    }

    pub fn get_token(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::Token)
    }

    // -- Airline governance --------------------------------------------------

    /// Sponsor a candidate airline.
    ///
    /// Registration is immediate while the pool is small; afterwards the
    /// sponsor's vote is recorded and the candidate is registered once half
    /// of the funded airlines approved it.
    ///
    /// # Arguments
    /// * `caller` - Authorized business-layer contract
    /// * `sponsor` - Funded airline vouching for the candidate
    /// * `candidate` - Airline applying for membership
    /// * `name` - Display name, kept from the first application
    pub fn register_airline(
        env: Env,
        caller: Address,
        sponsor: Address,
        candidate: Address,
        name: String,
    ) -> Result<RegistrationResult, ContractError> {
        access::require_mutable(&env, &caller)?;
        governance::register(&env, &sponsor, &candidate, name)
    }

    /// Record an airline's funding deposit, already transferred to this
    /// contract by the caller.
    pub fn fund_airline(
        env: Env,
        caller: Address,
        airline: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        access::require_mutable(&env, &caller)?;
        governance::fund(&env, &airline, amount)
    }

    pub fn get_airline(env: Env, airline: Address) -> Option<Airline> {
        governance::load(&env, &airline)
    }

    pub fn is_airline_registered(env: Env, airline: Address) -> bool {
        governance::is_registered(&env, &airline)
    }

    pub fn is_airline_funded(env: Env, airline: Address) -> bool {
        governance::is_funded(&env, &airline)
    }

    /// Number of airlines that are Registered or Funded.
    pub fn get_airline_count(env: Env) -> u32 {
        governance::airline_count(&env)
    }

    pub fn get_funded_airline_count(env: Env) -> u32 {
        governance::funded_count(&env)
    }

    /// Distinct sponsors that approved the candidate so far.
    pub fn get_votes(env: Env, candidate: Address) -> u32 {
        governance::load(&env, &candidate)
            .map(|airline| airline.votes.len())
            .unwrap_or(0)
    }

    // -- Flight registry -----------------------------------------------------

    pub fn register_flight(
        env: Env,
        caller: Address,
        airline: Address,
        code: Symbol,
        timestamp: u64,
    ) -> Result<(), ContractError> {
        access::require_mutable(&env, &caller)?;
        registry::register(&env, &airline, &code, timestamp)
    }

    pub fn get_flight(env: Env, airline: Address, code: Symbol) -> Option<Flight> {
        registry::load(&env, &registry::flight_key(&airline, &code))
    }

    pub fn is_flight_registered(env: Env, airline: Address, code: Symbol) -> bool {
        registry::is_registered(&env, &registry::flight_key(&airline, &code))
    }

    // -- Insurance escrow ----------------------------------------------------

    /// Record a purchase whose payment was already transferred to this
    /// contract. Returns the excess over the cap, which is sent back to the
    /// passenger before returning.
    pub fn buy_insurance(
        env: Env,
        caller: Address,
        passenger: Address,
        airline: Address,
        code: Symbol,
        amount: i128,
    ) -> Result<i128, ContractError> {
        access::require_mutable(&env, &caller)?;
        escrow::buy(&env, &passenger, &registry::flight_key(&airline, &code), amount)
    }

    /// Transfer the passenger's whole withdrawable balance. Returns the
    /// amount sent, zero when nothing was credited.
    pub fn withdraw(env: Env, caller: Address, passenger: Address) -> Result<i128, ContractError> {
        access::require_mutable(&env, &caller)?;
        escrow::withdraw(&env, &passenger)
    }

    pub fn get_policy(
        env: Env,
        airline: Address,
        code: Symbol,
        passenger: Address,
    ) -> Option<InsurancePolicy> {
        escrow::load_policy(&env, &registry::flight_key(&airline, &code), &passenger)
    }

    /// Payout credited to the passenger for this flight, zero until the
    /// flight finalizes as late because of the airline.
    pub fn get_insuree_balance(env: Env, airline: Address, code: Symbol, passenger: Address) -> i128 {
        escrow::load_policy(&env, &registry::flight_key(&airline, &code), &passenger)
            .map(|policy| policy.payout)
            .unwrap_or(0)
    }

    /// Withdrawable balance of a passenger.
    pub fn get_balance(env: Env, passenger: Address) -> i128 {
        escrow::balance(&env, &passenger)
    }

    /// Tokens currently held by the escrow.
    pub fn get_escrow_balance(env: Env) -> i128 {
        match env.storage().instance().get::<_, Address>(&DataKey::Token) {
            Some(token_addr) => {
                token::Client::new(&env, &token_addr).balance(&env.current_contract_address())
            }
            None => 0,
        }
    }

    // -- Oracle consensus ----------------------------------------------------

    /// Register an oracle whose fee was already transferred to this
    /// contract. Returns its three assigned indexes.
    pub fn register_oracle(
        env: Env,
        caller: Address,
        oracle: Address,
        fee: i128,
    ) -> Result<Vec<u32>, ContractError> {
        access::require_mutable(&env, &caller)?;
        oracles::register(&env, &oracle, fee)
    }

    pub fn get_oracle_indexes(env: Env, oracle: Address) -> Result<Vec<u32>, ContractError> {
        oracles::load(&env, &oracle)
            .map(|registration| registration.indexes)
            .ok_or(ContractError::OracleNotRegistered)
    }

    pub fn get_oracle_count(env: Env) -> u32 {
        oracles::oracle_count(&env)
    }

    /// Open a status request for a registered flight and emit the event
    /// oracles answer. Returns the index oracles must hold to respond.
    pub fn request_flight_status(
        env: Env,
        caller: Address,
        airline: Address,
        code: Symbol,
        timestamp: u64,
    ) -> Result<u32, ContractError> {
        access::require_mutable(&env, &caller)?;
        oracles::request_status(&env, &airline, &code, timestamp)
    }

    /// Tally an oracle's opinion on a flight's status.
    ///
    /// # Returns
    /// true if this response brought its status code to quorum and
    /// finalized the request
    #[allow(clippy::too_many_arguments)]
    pub fn submit_oracle_response(
        env: Env,
        caller: Address,
        oracle: Address,
        index: u32,
        airline: Address,
        code: Symbol,
        timestamp: u64,
        status: FlightStatus,
    ) -> Result<bool, ContractError> {
        access::require_mutable(&env, &caller)?;
        let key = RequestKey {
            index,
            airline,
            code,
            timestamp,
        };
        oracles::submit_response(&env, &oracle, &key, status)
    }

    pub fn get_oracle_request(
        env: Env,
        index: u32,
        airline: Address,
        code: Symbol,
        timestamp: u64,
    ) -> Option<OracleRequest> {
        oracles::load_request(
            &env,
            &RequestKey {
                index,
                airline,
                code,
                timestamp,
            },
        )
    }

    /// Distinct oracles that reported `status` for a request.
    pub fn get_response_count(
        env: Env,
        index: u32,
        airline: Address,
        code: Symbol,
        timestamp: u64,
        status: FlightStatus,
    ) -> u32 {
        let key = RequestKey {
            index,
            airline,
            code,
            timestamp,
        };
        oracles::respondents(&env, &key, status).len()
    }
}
