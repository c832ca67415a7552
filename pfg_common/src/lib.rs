mod amount;
pub mod helpers;
pub mod op;
mod secret;

pub use amount::{Amount, AmountParseError, MAX_AMOUNT_DIGITS};
pub use secret::Secret;
