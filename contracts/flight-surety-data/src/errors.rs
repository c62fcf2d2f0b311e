use soroban_sdk::contracterror;

/// Contract errors. Returning any of them aborts the invocation and rolls
/// back every write and transfer it made.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    NotOperational = 1,
    NotAuthorized = 2,
    NotAuthorizedCaller = 3,
    AlreadyInitialized = 4,
    AlreadyRegistered = 5,
    /// Reserved. Funding a funded airline is accepted as a top-up.
    AlreadyFunded = 6,
    NotRegistered = 7,
    NotFunded = 8,
    InsufficientFunding = 9,
    FlightNotRegistered = 10,
    InvalidAmount = 11,
    InsufficientFee = 12,
    OracleAlreadyRegistered = 13,
    OracleNotRegistered = 14,
    IndexMismatch = 15,
    UnknownRequest = 16,
    ArithmeticOverflow = 17,
    InvalidConfig = 18,
    /// The flight already has a final status, or the passenger's policy on
    /// it was already paid out.
    FlightSettled = 19,
    NotInitialized = 20,
}
