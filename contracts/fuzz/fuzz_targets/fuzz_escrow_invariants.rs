//! Fuzz target for the insurance escrow.
//!
//! Passengers buy arbitrary amounts of insurance on one flight, oracles
//! report arbitrary statuses and passengers withdraw at arbitrary points.
//! The escrow must always hold enough tokens to honour every credited
//! balance, no single purchase may retain more than the insurance cap, and
//! payouts never exceed 3/2 of the premiums retained.

#![no_main]

use arbitrary::Arbitrary;
use flight_surety_data::{config::UNIT, FlightStatus, FlightSuretyData, FlightSuretyDataClient};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{symbol_short, testutils::Address as _, token, Address, Env, String};

const PASSENGERS: usize = 4;
const ORACLES: usize = 5;
const MAX_OPS: usize = 48;
const DEPARTURE: u64 = 1_700_000_000;

#[derive(Debug, Arbitrary)]
enum Op {
    Buy { passenger: u8, amount: u32 },
    Respond { oracle: u8, status: u8 },
    Withdraw { passenger: u8 },
}

#[derive(Debug, Arbitrary)]
struct FuzzEscrowInput {
    ops: Vec<Op>,
}

fn status_from(raw: u8) -> FlightStatus {
    match raw % 6 {
        0 => FlightStatus::Unknown,
        1 => FlightStatus::OnTime,
        2 => FlightStatus::LateAirline,
        3 => FlightStatus::LateWeather,
        4 => FlightStatus::LateTechnical,
        _ => FlightStatus::LateOther,
    }
}

fuzz_target!(|input: FuzzEscrowInput| {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let app = Address::generate(&env);
    let airline = Address::generate(&env);
    let token = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let token_admin = token::StellarAssetClient::new(&env, &token.address());
    let token_client = token::Client::new(&env, &token.address());

    let contract_id = env.register(FlightSuretyData, ());
    let client = FlightSuretyDataClient::new(&env, &contract_id);
    client.initialize(
        &owner,
        &token.address(),
        &airline,
        &String::from_str(&env, "Genesis"),
    );
    client.authorize_caller(&owner, &app);

    // Every oracle holds index 0
    let mut cfg = client.get_config();
    cfg.index_range = 1;
    client.set_config(&owner, &cfg);

    token_admin.mint(&contract_id, &cfg.funding_threshold);
    client.fund_airline(&app, &airline, &cfg.funding_threshold);

    let code = symbol_short!("ND1309");
    client.register_flight(&app, &airline, &code, &DEPARTURE);

    let oracles: Vec<Address> = (0..ORACLES).map(|_| Address::generate(&env)).collect();
    for oracle in oracles.iter() {
        token_admin.mint(&contract_id, &cfg.oracle_registration_fee);
        client.register_oracle(&app, oracle, &cfg.oracle_registration_fee);
    }
    let index = client.request_flight_status(&app, &airline, &code, &DEPARTURE);

    let passengers: Vec<Address> = (0..PASSENGERS).map(|_| Address::generate(&env)).collect();

    let mut retained = 0i128;
    let mut paid_out = 0i128;

    for op in input.ops.iter().take(MAX_OPS) {
        match op {
            Op::Buy { passenger, amount } => {
                let passenger = &passengers[*passenger as usize % PASSENGERS];
                let amount = *amount as i128 % (3 * UNIT);
                let held_before = token_client.balance(&contract_id);
                if amount > 0 {
                    token_admin.mint(&contract_id, &amount);
                }

                if let Ok(Ok(refund)) =
                    client.try_buy_insurance(&app, passenger, &airline, &code, &amount)
                {
                    assert!(refund >= 0 && refund <= amount);
                    assert!(amount - refund <= cfg.insurance_cap);
                    retained += amount - refund;
                    assert_eq!(
                        token_client.balance(&contract_id),
                        held_before + amount - refund
                    );
                }
            }
            Op::Respond { oracle, status } => {
                let oracle = &oracles[*oracle as usize % ORACLES];
                let _ = client.try_submit_oracle_response(
                    &app,
                    oracle,
                    &index,
                    &airline,
                    &code,
                    &DEPARTURE,
                    &status_from(*status),
                );
            }
            Op::Withdraw { passenger } => {
                let passenger = &passengers[*passenger as usize % PASSENGERS];
                let owed = client.get_balance(passenger);
                let before = token_client.balance(passenger);
                let sent = client.withdraw(&app, passenger);
                assert_eq!(sent, owed);
                assert_eq!(token_client.balance(passenger), before + sent);
                assert_eq!(client.get_balance(passenger), 0);
                paid_out += sent;
            }
        }

        let mut owed = 0i128;
        for passenger in passengers.iter() {
            owed += client.get_balance(passenger);
            if let Some(policy) = client.get_policy(&airline, &code, passenger) {
                assert!(policy.payout == 0 || policy.payout_credited);
            }
        }
        assert!(token_client.balance(&contract_id) >= owed);
        assert!(owed + paid_out <= retained * 3 / 2);
    }
});
