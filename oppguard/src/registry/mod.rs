//! Registry of in-flight outbound transfers.
//!
//! A sender registers a [`TransferResource`] under a [`TransferId`] when a
//! send begins, the transport fetches it to pull bytes, and the sender
//! removes it when the send finishes or aborts. Removal closes the stream.
//!
//! ```text
//! Absent --put--> Registered --remove (stream closed)--> Absent
//!                 Registered --put (no implicit close)--> Registered
//! ```

pub mod resource;
pub mod store;

pub use resource::{ResourceStatus, TransferId, TransferResource, TransferStream};
pub use store::{
    CloseOutcome, PutOutcome, RegistryOptions, Removal, TransferRegistry, DEFAULT_CLOSE_TIMEOUT,
};
