//! Shared test harness modules for the ProdHealth CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod helpers;
mod history_unit;
mod unit;
