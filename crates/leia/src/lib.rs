//! Schema registry, payload validation and message multiplexing.
//!
//! leia keeps versioned message schemas, validates JSON payloads against
//! them, and fans one source message out into messages for every consumer
//! schema derived from it before dispatching them to backends.
//!
//! # Crate Structure
//!
//! - [`models`]: schema keys, attributes, records and messages
//! - [`validator`]: structural payload validation
//! - [`registry`]: schema lifecycle state machine and repository contract
//! - [`refresher`]: background snapshot refresh
//! - [`processor`]: backend dispatch (HTTP executor behind the `http` feature)
//! - [`client`]: transformation and multiplexing engine

/// Re-export model types.
pub mod models {
    pub use leia_models::*;
}

/// Re-export validator types.
pub mod validator {
    pub use leia_validator::*;
}

/// Re-export registry lifecycle types.
pub mod registry {
    pub use leia_core::*;
}

/// Re-export refresher types.
pub mod refresher {
    pub use leia_refresher::*;
}

/// Re-export dispatch types.
pub mod processor {
    pub use leia_processor::*;
}

/// Re-export multiplexing client types.
pub mod client {
    pub use leia_client::*;
}
