//! Fuzz target for airline membership governance.
//!
//! Drives the data contract with arbitrary sequences of sponsorships and
//! funding deposits over a small pool of airlines and checks that the
//! membership counters stay consistent with the stored records.
//!
//! Invariants checked after every step:
//! - funded airlines are always registered
//! - the registered and funded counters match the pool
//! - membership is never revoked
//! - a candidate never holds more votes than there are funded airlines

#![no_main]

use arbitrary::Arbitrary;
use flight_surety_data::{config::UNIT, FlightSuretyData, FlightSuretyDataClient};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{testutils::Address as _, Address, Env, String};

const POOL_SIZE: usize = 8;
const MAX_OPS: usize = 64;

#[derive(Debug, Arbitrary)]
enum Op {
    Register { sponsor: u8, candidate: u8 },
    Fund { airline: u8, amount: u8 },
}

#[derive(Debug, Arbitrary)]
struct FuzzGovernanceInput {
    ops: Vec<Op>,
}

fuzz_target!(|input: FuzzGovernanceInput| {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let app = Address::generate(&env);
    let token = env.register_stellar_asset_contract_v2(Address::generate(&env));

    let pool: Vec<Address> = (0..POOL_SIZE).map(|_| Address::generate(&env)).collect();

    let contract_id = env.register(FlightSuretyData, ());
    let client = FlightSuretyDataClient::new(&env, &contract_id);
    client.initialize(
        &owner,
        &token.address(),
        &pool[0],
        &String::from_str(&env, "Genesis"),
    );
    client.authorize_caller(&owner, &app);

    let name = String::from_str(&env, "Airline");
    let mut registered = [false; POOL_SIZE];
    registered[0] = true;

    for op in input.ops.iter().take(MAX_OPS) {
        match op {
            Op::Register { sponsor, candidate } => {
                let sponsor = &pool[*sponsor as usize % POOL_SIZE];
                let candidate = &pool[*candidate as usize % POOL_SIZE];
                let _ = client.try_register_airline(&app, sponsor, candidate, &name);
            }
            Op::Fund { airline, amount } => {
                // Whole units around the threshold
                let amount = (*amount as i128 % 16) * UNIT;
                let airline = &pool[*airline as usize % POOL_SIZE];
                let _ = client.try_fund_airline(&app, airline, &amount);
            }
        }

        let mut registered_count = 0u32;
        let mut funded_count = 0u32;
        for (i, airline) in pool.iter().enumerate() {
            let is_registered = client.is_airline_registered(airline);
            let is_funded = client.is_airline_funded(airline);

            assert!(!is_funded || is_registered, "funded airline is not registered");
            assert!(!registered[i] || is_registered, "membership was revoked");
            registered[i] = is_registered;

            registered_count += is_registered as u32;
            funded_count += is_funded as u32;
        }

        assert_eq!(client.get_airline_count(), registered_count);
        assert_eq!(client.get_funded_airline_count(), funded_count);

        for airline in pool.iter() {
            assert!(client.get_votes(airline) <= funded_count);
        }
    }
});
