//! Resume contact extraction.
//!
//! `heuristics` pulls fields out of flat text with ordered regex rules,
//! `locator` finds aliased keys in arbitrarily nested payloads, and
//! `orchestrator` picks between the two per request. `pipeline` wires the
//! text and structured sources around them for uploaded files.

pub mod handlers;
pub mod heuristics;
pub mod locator;
pub mod orchestrator;
pub mod pipeline;
