//! Test Module
//!
//! Cross-module test suites for the agent core.
//!
//! ## Test Categories
//! - `brain_tests`: End-to-end intent parsing and its properties
//! - `provider_tests`: AthenaMist and Gemini clients against a mock server
//! - `assistant_tests`: Assistant actor with mock backends
//! - `config_tests`: Config persistence and credential lookup

pub mod assistant_tests;
pub mod brain_tests;
