//! Ledger records shared by every component of the state layer.

use soroban_sdk::{contracttype, Address, String, Symbol, Vec};

/// Membership state of an airline.
///
/// ```text
/// Applied ──(votes reach consensus)──► Registered ──(funding)──► Funded
/// ```
///
/// There are no backward transitions.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AirlineStatus {
    /// Waiting for enough distinct sponsors to approve.
    Applied = 0,
    /// Member of the pool, cannot act until funded.
    Registered = 1,
    /// Member that deposited the funding threshold.
    Funded = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Airline {
    pub address: Address,
    pub name: String,
    pub status: AirlineStatus,
    /// Distinct sponsors that approved this airline, in arrival order.
    pub votes: Vec<Address>,
    /// Total amount deposited through funding, top-ups included.
    pub funds: i128,
}

/// Outcome of a registration attempt. A failed consensus is not an error:
/// `success` stays false and `num_votes` reports progress.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistrationResult {
    pub success: bool,
    pub num_votes: u32,
}

/// Flight status codes as reported by oracles.
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

/// A flight is identified by its operator and code. The scheduled timestamp
/// is a mutable attribute so that registering again re-schedules the flight.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlightKey {
    pub airline: Address,
    pub code: Symbol,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Flight {
    pub airline: Address,
    pub code: Symbol,
    pub timestamp: u64,
    pub status: FlightStatus,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InsurancePolicy {
    pub flight: FlightKey,
    pub passenger: Address,
    /// Premium retained by the escrow, never more than the cap per purchase.
    pub amount_paid: i128,
    /// Amount credited to the passenger when the flight finalized as late.
    pub payout: i128,
    pub payout_credited: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleRegistration {
    pub oracle: Address,
    /// Three indexes in `0..index_range`; duplicates are possible.
    pub indexes: Vec<u32>,
    pub registered_at: u64,
}

/// Correlates a status request with the responses submitted for it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestKey {
    pub index: u32,
    pub airline: Address,
    pub code: Symbol,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleRequest {
    pub key: RequestKey,
    pub opened_at: u64,
    /// Terminal once set.
    pub resolved: bool,
    /// Finalized status; `Unknown` while the request is open.
    pub status: FlightStatus,
}

/// Policy constants. Amounts are in the smallest unit of the escrow token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InsuranceConfig {
    pub funding_threshold: i128,
    pub insurance_cap: i128,
    pub payout_numerator: i128,
    pub payout_denominator: i128,
    pub oracle_registration_fee: i128,
    /// Quorum of identical responses needed to finalize a request.
    pub min_responses: u32,
    /// Number of members after which new airlines need votes.
    pub multiparty_threshold: u32,
    /// Oracle indexes are drawn from `0..index_range`.
    pub index_range: u32,
}
