//! AthenaMist agent core.
//!
//! - `brain`: rule-based intent parsing of user requests and heuristics over
//!   model replies. Pure and synchronous.
//! - `providers`: AthenaMist and Gemini chat clients.
//! - `actors`: the assistant actor that ties both together.

pub mod actors;
pub mod brain;
pub mod config;
pub mod error;
pub mod providers;

pub use brain::{parse, IntentCategory, IntentParser, ParamValue, Parameters, ParsedIntent};
pub use error::AppError;

#[cfg(test)]
mod tests;
