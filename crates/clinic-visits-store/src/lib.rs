//! # Clinic Visits Store
//!
//! Client for the spreadsheet-backed store that holds visit records. The
//! store is a single HTTP endpoint that multiplexes on an `action` parameter:
//!
//! ```text
//! save    POST form {action=save, type, ...fields}   (GET fallback + unique_id)
//! getdata GET  ?action=getdata&sheet=&timestamp=     → {success, data, error?}
//! delete  GET  ?action=delete&sheet=&row=&timestamp= (POST fallback)
//! ```
//!
//! The wire is abstracted behind [`Transport`] so the client logic can be
//! exercised against [`MockTransport`].

pub mod client;
pub mod envelope;
pub mod error;
pub mod transport;

pub use client::{StoreClient, StoreReply, StoreTimeouts};
pub use envelope::Envelope;
pub use error::{StoreError, StoreResult};
pub use transport::{HttpReply, Method, MockResponse, MockTransport, ReqwestTransport, Transport};
