extern crate std;

use super::*;
use flight_surety_data::{config::UNIT, FlightSuretyData, FlightSuretyDataClient};
use soroban_sdk::{symbol_short, testutils::Address as _, token, Address, Env, String};

const DEPARTURE: u64 = 1_700_000_000;

struct TestContext<'a> {
    env: &'a Env,
    app: FlightSuretyAppClient<'a>,
    app_id: Address,
    data: FlightSuretyDataClient<'a>,
    data_id: Address,
    owner: Address,
    genesis: Address,
    token: token::Client<'a>,
    token_admin: token::StellarAssetClient<'a>,
}

fn setup(env: &Env) -> TestContext<'_> {
    env.mock_all_auths();

    let owner = Address::generate(env);
    let genesis = Address::generate(env);

    let token_contract = env.register_stellar_asset_contract_v2(Address::generate(env));
    let token_addr = token_contract.address();

    let data_id = env.register(FlightSuretyData, ());
    let data = FlightSuretyDataClient::new(env, &data_id);
    data.initialize(
        &owner,
        &token_addr,
        &genesis,
        &String::from_str(env, "Genesis Air"),
    );

    let app_id = env.register(FlightSuretyApp, ());
    let app = FlightSuretyAppClient::new(env, &app_id);
    app.initialize(&owner);

    data.authorize_caller(&owner, &app_id);
    app.set_data_contract(&data_id);

    let token_admin = token::StellarAssetClient::new(env, &token_addr);
    token_admin.mint(&genesis, &(100 * UNIT));

    TestContext {
        env,
        app,
        app_id,
        data,
        data_id,
        owner,
        genesis,
        token: token::Client::new(env, &token_addr),
        token_admin,
    }
}

impl TestContext<'_> {
    fn new_account(&self, balance: i128) -> Address {
        let account = Address::generate(self.env);
        if balance > 0 {
            self.token_admin.mint(&account, &balance);
        }
        account
    }

    fn name(&self) -> String {
        String::from_str(self.env, "Airline")
    }

    fn flight(&self) -> Symbol {
        symbol_short!("ND1309")
    }

    fn fund_genesis_and_flight(&self) {
        self.app.add_initial_funds(&self.genesis, &(10 * UNIT));
        self.app
            .register_flight(&self.genesis, &self.flight(), &DEPARTURE);
    }
}

#[test]
fn test_requires_data_contract() {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let app_id = env.register(FlightSuretyApp, ());
    let app = FlightSuretyAppClient::new(&env, &app_id);
    app.initialize(&owner);

    assert_eq!(app.get_data_contract(), None);
    assert_eq!(
        app.try_is_operational(),
        Err(Ok(ContractError::DataContractNotSet))
    );
    assert_eq!(
        app.try_register_flight(&owner, &symbol_short!("ND1309"), &DEPARTURE),
        Err(Ok(ContractError::DataContractNotSet))
    );

    let ctx = setup(&env);
    assert_eq!(ctx.app.get_data_contract(), Some(ctx.data_id.clone()));
    assert_eq!(ctx.app.is_operational(), true);
}

#[test]
fn test_initialize_twice_fails() {
    let env = Env::default();
    let ctx = setup(&env);

    assert_eq!(
        ctx.app.try_initialize(&ctx.owner),
        Err(Ok(ContractError::AlreadyInitialized))
    );
}

#[test]
fn test_paused_data_contract_blocks_app() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.fund_genesis_and_flight();
    let passenger = ctx.new_account(UNIT);

    ctx.data.set_operating_status(&ctx.owner, &false);
    assert_eq!(ctx.app.is_operational(), false);

    assert_eq!(
        ctx.app
            .try_buy_insurance(&passenger, &ctx.genesis, &ctx.flight(), &UNIT),
        Err(Ok(ContractError::NotOperational))
    );
    assert_eq!(
        ctx.app
            .try_fetch_flight_status(&ctx.genesis, &ctx.flight(), &DEPARTURE),
        Err(Ok(ContractError::NotOperational))
    );
    assert_eq!(ctx.token.balance(&passenger), UNIT);

    // Queries keep working
    assert_eq!(ctx.app.is_airline_funded(&ctx.genesis), true);

    ctx.data.set_operating_status(&ctx.owner, &true);
    assert_eq!(
        ctx.app
            .buy_insurance(&passenger, &ctx.genesis, &ctx.flight(), &UNIT),
        0
    );
}

#[test]
fn test_app_must_be_authorized_by_data_contract() {
    let env = Env::default();
    let ctx = setup(&env);

    ctx.data.deauthorize_caller(&ctx.owner, &ctx.app_id);

    let genesis_before = ctx.token.balance(&ctx.genesis);
    assert!(ctx
        .app
        .try_add_initial_funds(&ctx.genesis, &(10 * UNIT))
        .is_err());
    assert_eq!(ctx.token.balance(&ctx.genesis), genesis_before);
    assert_eq!(ctx.app.is_airline_funded(&ctx.genesis), false);
}

#[test]
fn test_airline_funding_and_registration() {
    let env = Env::default();
    let ctx = setup(&env);

    // Unfunded sponsors cannot vouch for anyone
    let second = ctx.new_account(20 * UNIT);
    assert!(ctx
        .app
        .try_register_airline(&ctx.genesis, &second, &ctx.name())
        .is_err());
    assert_eq!(ctx.app.is_airline_registered(&second), false);

    // Insufficient funding is rolled back together with its transfer
    assert!(ctx
        .app
        .try_add_initial_funds(&ctx.genesis, &(5 * UNIT))
        .is_err());
    assert_eq!(ctx.token.balance(&ctx.genesis), 100 * UNIT);

    ctx.app.add_initial_funds(&ctx.genesis, &(10 * UNIT));
    assert_eq!(ctx.token.balance(&ctx.genesis), 90 * UNIT);
    assert_eq!(ctx.token.balance(&ctx.data_id), 10 * UNIT);
    assert_eq!(ctx.app.get_funded_airline_count(), 1);

    let mut members = std::vec![ctx.genesis.clone()];
    for _ in 0..3 {
        let airline = ctx.new_account(20 * UNIT);
        let result = ctx
            .app
            .register_airline(&ctx.genesis, &airline, &ctx.name());
        assert_eq!(
            result,
            RegistrationResult {
                success: true,
                num_votes: 1
            }
        );
        ctx.app.add_initial_funds(&airline, &(10 * UNIT));
        members.push(airline);
    }
    assert_eq!(ctx.app.get_funded_airline_count(), 4);

    let fifth = ctx.new_account(0);
    let first = ctx.app.register_airline(&members[0], &fifth, &ctx.name());
    assert_eq!(
        first,
        RegistrationResult {
            success: false,
            num_votes: 1
        }
    );
    assert_eq!(ctx.app.is_airline_registered(&fifth), false);

    let second_vote = ctx.app.register_airline(&members[1], &fifth, &ctx.name());
    assert_eq!(
        second_vote,
        RegistrationResult {
            success: true,
            num_votes: 2
        }
    );
    assert_eq!(ctx.app.is_airline_registered(&fifth), true);

    assert!(ctx
        .app
        .try_register_airline(&members[2], &fifth, &ctx.name())
        .is_err());
}

#[test]
fn test_buy_insurance_refunds_excess() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.fund_genesis_and_flight();
    assert_eq!(ctx.app.is_flight_registered(&ctx.genesis, &ctx.flight()), true);

    let passenger = ctx.new_account(5 * UNIT);
    let escrow_before = ctx.token.balance(&ctx.data_id);

    let refund = ctx
        .app
        .buy_insurance(&passenger, &ctx.genesis, &ctx.flight(), &(25 * UNIT / 10));

    assert_eq!(refund, 15 * UNIT / 10);
    assert_eq!(ctx.token.balance(&passenger), 4 * UNIT);
    assert_eq!(ctx.token.balance(&ctx.data_id), escrow_before + UNIT);
    assert_eq!(ctx.token.balance(&ctx.app_id), 0);
    assert_eq!(
        ctx.app
            .get_insuree_balance(&ctx.genesis, &ctx.flight(), &passenger),
        0
    );
}

#[test]
fn test_buy_insurance_on_unknown_flight_rolls_back() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.app.add_initial_funds(&ctx.genesis, &(10 * UNIT));
    let passenger = ctx.new_account(5 * UNIT);

    assert!(ctx
        .app
        .try_buy_insurance(&passenger, &ctx.genesis, &symbol_short!("XX0000"), &UNIT)
        .is_err());
    assert_eq!(ctx.token.balance(&passenger), 5 * UNIT);
}

#[test]
fn test_oracle_flow_pays_out_late_airline() {
    let env = Env::default();
    let ctx = setup(&env);

    // Every oracle holds index 0, so any three can reach quorum
    let mut cfg = ctx.data.get_config();
    cfg.index_range = 1;
    ctx.data.set_config(&ctx.owner, &cfg);

    ctx.fund_genesis_and_flight();
    let passenger = ctx.new_account(UNIT);
    ctx.app
        .buy_insurance(&passenger, &ctx.genesis, &ctx.flight(), &UNIT);
    assert_eq!(ctx.token.balance(&passenger), 0);

    let fee = ctx.app.registration_fee();
    assert_eq!(fee, UNIT);

    let mut oracles = std::vec::Vec::new();
    for _ in 0..4 {
        let oracle = ctx.new_account(fee);
        let indexes = ctx.app.register_oracle(&oracle, &fee);
        assert_eq!(indexes.len(), 3);
        assert_eq!(ctx.app.get_my_indexes(&oracle), indexes);
        assert_eq!(ctx.token.balance(&oracle), 0);
        oracles.push(oracle);
    }

    let index = ctx
        .app
        .fetch_flight_status(&ctx.genesis, &ctx.flight(), &DEPARTURE);
    assert_eq!(index, 0);

    let mut finalized = std::vec::Vec::new();
    for oracle in oracles.iter() {
        finalized.push(ctx.app.submit_oracle_response(
            oracle,
            &index,
            &ctx.genesis,
            &ctx.flight(),
            &DEPARTURE,
            &FlightStatus::LateAirline,
        ));
    }
    assert_eq!(finalized, std::vec![false, false, true, false]);

    assert_eq!(ctx.app.get_balance(&passenger), 15 * UNIT / 10);
    assert_eq!(
        ctx.app
            .get_insuree_balance(&ctx.genesis, &ctx.flight(), &passenger),
        15 * UNIT / 10
    );

    assert_eq!(ctx.app.withdraw(&passenger), 15 * UNIT / 10);
    assert_eq!(ctx.token.balance(&passenger), 15 * UNIT / 10);
    assert_eq!(ctx.app.get_balance(&passenger), 0);
    assert_eq!(ctx.app.withdraw(&passenger), 0);
}

#[test]
fn test_register_oracle_with_low_fee_fails() {
    let env = Env::default();
    let ctx = setup(&env);
    let oracle = ctx.new_account(UNIT);

    assert!(ctx.app.try_register_oracle(&oracle, &(UNIT / 2)).is_err());
    assert_eq!(ctx.token.balance(&oracle), UNIT);
    assert!(ctx.app.try_get_my_indexes(&oracle).is_err());
}

#[test]
fn test_response_with_unassigned_index_fails() {
    let env = Env::default();
    let ctx = setup(&env);

    let mut cfg = ctx.data.get_config();
    cfg.index_range = 1;
    ctx.data.set_config(&ctx.owner, &cfg);

    ctx.fund_genesis_and_flight();
    let oracle = ctx.new_account(UNIT);
    ctx.app.register_oracle(&oracle, &UNIT);
    ctx.app
        .fetch_flight_status(&ctx.genesis, &ctx.flight(), &DEPARTURE);

    assert!(ctx
        .app
        .try_submit_oracle_response(
            &oracle,
            &3,
            &ctx.genesis,
            &ctx.flight(),
            &DEPARTURE,
            &FlightStatus::OnTime
        )
        .is_err());
}
