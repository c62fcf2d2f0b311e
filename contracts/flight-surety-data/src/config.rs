//! Policy constants and their validation.

use soroban_sdk::Env;

use crate::errors::ContractError;
use crate::storage::DataKey;
use crate::types::InsuranceConfig;

/// One whole token in its smallest unit (7 decimals, as Stellar assets).
pub const UNIT: i128 = 10_000_000;

pub const FUNDING_THRESHOLD: i128 = 10 * UNIT;
pub const INSURANCE_CAP: i128 = UNIT;
pub const ORACLE_REGISTRATION_FEE: i128 = UNIT;

/// Payout ratio for flights late because of the airline: 3/2 = 1.5x.
pub const PAYOUT_NUMERATOR: i128 = 3;
pub const PAYOUT_DENOMINATOR: i128 = 2;

pub const MIN_RESPONSES: u32 = 3;
pub const MULTIPARTY_THRESHOLD: u32 = 4;
pub const INDEX_RANGE: u32 = 10;

pub fn default_config() -> InsuranceConfig {
    InsuranceConfig {
        funding_threshold: FUNDING_THRESHOLD,
        insurance_cap: INSURANCE_CAP,
        payout_numerator: PAYOUT_NUMERATOR,
        payout_denominator: PAYOUT_DENOMINATOR,
        oracle_registration_fee: ORACLE_REGISTRATION_FEE,
        min_responses: MIN_RESPONSES,
        multiparty_threshold: MULTIPARTY_THRESHOLD,
        index_range: INDEX_RANGE,
    }
}

pub fn validate(config: &InsuranceConfig) -> Result<(), ContractError> {
    let amounts_positive = config.funding_threshold > 0
        && config.insurance_cap > 0
        && config.oracle_registration_fee > 0
        && config.payout_numerator > 0
        && config.payout_denominator > 0;

    // Indexes are taken from a single digest byte.
    let index_range_ok = config.index_range >= 1 && config.index_range <= 256;

    if !amounts_positive
        || !index_range_ok
        || config.min_responses == 0
        || config.multiparty_threshold == 0
    {
        return Err(ContractError::InvalidConfig);
    }
    Ok(())
}

pub fn load(env: &Env) -> InsuranceConfig {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .unwrap_or_else(default_config)
}

pub fn store(env: &Env, config: &InsuranceConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}
