//! Core data models and the lookup race.

pub mod fetch;
pub mod http;
pub mod logging;
pub mod models;
pub mod race;
pub mod source;

pub use fetch::{FetchOutcome, FetchReport};
pub use models::{
    Address, AttemptRecord, LookupPayload, LookupStatus, NormalizedAddress, RobotOutput,
};
pub use race::{RaceOptions, RaceOutcome, RaceReport, resolve};
pub use source::{AddressSource, Source, SourceHandle};
