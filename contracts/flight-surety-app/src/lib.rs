//! FlightSurety App Contract
//!
//! Business layer of the FlightSurety insurance marketplace. It is the
//! surface airlines, passengers and oracles talk to: it checks who is
//! acting, moves their tokens into the escrow held by the data contract and
//! forwards each operation there, presenting its own contract address as
//! the authorized caller. The business rules can be redeployed without
//! migrating any state.

#![no_std]

mod data;

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, token, Address, Env, String, Symbol, Vec,
};

pub use data::{DataClient, FlightStatus, InsuranceConfig, RegistrationResult};

/// Codes start at 100 so they never collide with errors propagated from
/// the data contract.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 100,
    NotAuthorized = 101,
    DataContractNotSet = 102,
    NotOperational = 103,
}

#[contract]
pub struct FlightSuretyApp;

#[contractimpl]
impl FlightSuretyApp {
    /// Initialize the contract with its owner.
    pub fn initialize(env: Env, owner: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&symbol_short!("owner")) {
            return Err(ContractError::AlreadyInitialized);
        }
        env.storage()
            .instance()
            .set(&symbol_short!("owner"), &owner);

        env.events().publish((symbol_short!("app_init"),), (owner,));

        Ok(())
    }

    /// Point the business layer at a data contract (owner only).
    ///
    /// The data contract must separately whitelist this contract's address.
    pub fn set_data_contract(env: Env, data_contract: Address) -> Result<(), ContractError> {
        let owner: Address = env
            .storage()
            .instance()
            .get(&symbol_short!("owner"))
            .ok_or(ContractError::NotAuthorized)?;

        owner.require_auth();

        env.storage()
            .instance()
            .set(&symbol_short!("data"), &data_contract);

        env.events()
            .publish((symbol_short!("data_set"),), (data_contract,));

        Ok(())
    }

    pub fn get_data_contract(env: Env) -> Option<Address> {
        env.storage().instance().get(&symbol_short!("data"))
    }

    pub fn is_operational(env: Env) -> Result<bool, ContractError> {
        Ok(Self::data(&env)?.is_operational())
    }

    // -- Airlines ------------------------------------------------------------

    /// Sponsor a candidate airline. The result reports consensus progress
    /// even when the candidate is not registered yet.
    ///
    /// # Arguments
    /// * `sponsor` - Funded airline casting the vote (must authorize)
    /// * `candidate` - Airline applying for membership
    /// * `name` - Display name of the candidate
    pub fn register_airline(
        env: Env,
        sponsor: Address,
        candidate: Address,
        name: String,
    ) -> Result<RegistrationResult, ContractError> {
        let data = Self::operational_data(&env)?;
        sponsor.require_auth();

        Ok(data.register_airline(&env.current_contract_address(), &sponsor, &candidate, &name))
    }

    /// Deposit the airline's funding into the escrow.
    ///
    /// # Arguments
    /// * `airline` - Registered airline paying in (must authorize)
    /// * `amount` - At least the funding threshold on first funding
    pub fn add_initial_funds(env: Env, airline: Address, amount: i128) -> Result<(), ContractError> {
        let data = Self::operational_data(&env)?;
        airline.require_auth();

        Self::collect(&env, &data, &airline, amount)?;
        data.fund_airline(&env.current_contract_address(), &airline, &amount);

        Ok(())
    }

    pub fn is_airline_registered(env: Env, airline: Address) -> Result<bool, ContractError> {
        Ok(Self::data(&env)?.is_airline_registered(&airline))
    }

    pub fn is_airline_funded(env: Env, airline: Address) -> Result<bool, ContractError> {
        Ok(Self::data(&env)?.is_airline_funded(&airline))
    }

    pub fn get_funded_airline_count(env: Env) -> Result<u32, ContractError> {
        Ok(Self::data(&env)?.get_funded_airline_count())
    }

    // -- Flights -------------------------------------------------------------

    pub fn register_flight(
        env: Env,
        airline: Address,
        code: Symbol,
        timestamp: u64,
    ) -> Result<(), ContractError> {
        let data = Self::operational_data(&env)?;
        airline.require_auth();

        data.register_flight(&env.current_contract_address(), &airline, &code, &timestamp);

        Ok(())
    }

    pub fn is_flight_registered(env: Env, airline: Address, code: Symbol) -> Result<bool, ContractError> {
        Ok(Self::data(&env)?.is_flight_registered(&airline, &code))
    }

    // -- Insurance -----------------------------------------------------------

    /// Buy insurance on a flight. The whole `amount` moves into the escrow
    /// and the part above the cap is sent back in the same transaction.
    ///
    /// # Returns
    /// The refunded excess
    pub fn buy_insurance(
        env: Env,
        passenger: Address,
        airline: Address,
        code: Symbol,
        amount: i128,
    ) -> Result<i128, ContractError> {
        let data = Self::operational_data(&env)?;
        passenger.require_auth();

        Self::collect(&env, &data, &passenger, amount)?;
        let refund = data.buy_insurance(
            &env.current_contract_address(),
            &passenger,
            &airline,
            &code,
            &amount,
        );

        Ok(refund)
    }

    /// Withdraw every credited payout. Returns the amount sent.
    pub fn withdraw(env: Env, passenger: Address) -> Result<i128, ContractError> {
        let data = Self::operational_data(&env)?;
        passenger.require_auth();

        Ok(data.withdraw(&env.current_contract_address(), &passenger))
    }

    pub fn get_insuree_balance(
        env: Env,
        airline: Address,
        code: Symbol,
        passenger: Address,
    ) -> Result<i128, ContractError> {
        Ok(Self::data(&env)?.get_insuree_balance(&airline, &code, &passenger))
    }

    pub fn get_balance(env: Env, passenger: Address) -> Result<i128, ContractError> {
        Ok(Self::data(&env)?.get_balance(&passenger))
    }

    // -- Oracles -------------------------------------------------------------

    pub fn registration_fee(env: Env) -> Result<i128, ContractError> {
        Ok(Self::data(&env)?.get_config().oracle_registration_fee)
    }

    /// Register the caller as an oracle, paying `fee` into the escrow.
    /// Returns the indexes of the requests it may answer.
    pub fn register_oracle(env: Env, oracle: Address, fee: i128) -> Result<Vec<u32>, ContractError> {
        let data = Self::operational_data(&env)?;
        oracle.require_auth();

        Self::collect(&env, &data, &oracle, fee)?;
        Ok(data.register_oracle(&env.current_contract_address(), &oracle, &fee))
    }

    pub fn get_my_indexes(env: Env, oracle: Address) -> Result<Vec<u32>, ContractError> {
        Ok(Self::data(&env)?.get_oracle_indexes(&oracle))
    }

    /// Ask the oracles for a flight's status. Anyone may trigger a request;
    /// oracles holding the returned index answer it.
    pub fn fetch_flight_status(
        env: Env,
        airline: Address,
        code: Symbol,
        timestamp: u64,
    ) -> Result<u32, ContractError> {
        let data = Self::operational_data(&env)?;

        Ok(data.request_flight_status(&env.current_contract_address(), &airline, &code, &timestamp))
    }

    /// Submit an oracle's opinion on a flight's status.
    ///
    /// # Returns
    /// true if this response finalized the flight's status
    #[allow(clippy::too_many_arguments)]
    pub fn submit_oracle_response(
        env: Env,
        oracle: Address,
        index: u32,
        airline: Address,
        code: Symbol,
        timestamp: u64,
        status: FlightStatus,
    ) -> Result<bool, ContractError> {
        let data = Self::operational_data(&env)?;
        oracle.require_auth();

        Ok(data.submit_oracle_response(
            &env.current_contract_address(),
            &oracle,
            &index,
            &airline,
            &code,
            &timestamp,
            &status,
        ))
    }

    // Helper functions

    fn data(env: &Env) -> Result<DataClient<'_>, ContractError> {
        let address: Address = env
            .storage()
            .instance()
            .get(&symbol_short!("data"))
            .ok_or(ContractError::DataContractNotSet)?;
        Ok(DataClient::new(env, &address))
    }

    fn operational_data(env: &Env) -> Result<DataClient<'_>, ContractError> {
        let data = Self::data(env)?;
        if !data.is_operational() {
            return Err(ContractError::NotOperational);
        }
        Ok(data)
    }

    /// Moves `amount` from `payer` into the escrow held by the data contract.
    fn collect(env: &Env, data: &DataClient, payer: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Ok(());
        }
        let token_address = data.get_token().ok_or(ContractError::DataContractNotSet)?;
        token::Client::new(env, &token_address).transfer(payer, &data.address, &amount);
        Ok(())
    }
}

#[cfg(test)]
mod test;
