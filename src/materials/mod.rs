//! Materials Module
//!
//! Outbound access to the Materials Project oxidation-state endpoint.
//!
//! The relay handler talks to an [`OxidationStateSource`] rather than to
//! `reqwest` directly, so the HTTP layer can be exercised without a network.

pub mod client;

pub use client::{
    MaterialsProjectClient, OxidationStateSource, SourceError, UpstreamResponse, LICENSE_FILTER,
    OXIDATION_STATES_PATH, PAGE_SIZE,
};
