//! Compliance obligation engine for UAE, KSA and Egypt entities.
//!
//! Given an entity and its annual turnover, [`core::calculate_obligations`]
//! returns the filings it owes with their next due dates; the status helpers
//! summarize a tracked obligation list into a compliance score and risk level.

pub mod core;
