//! PayPal Adaptive APIs client for Rust.
//!
//! This crate wraps PayPal's classic Adaptive Payments, Adaptive Accounts
//! and Permissions services behind async and sync (blocking) clients. It
//! formats requests, attaches the security-credential headers, computes
//! the X-PAYPAL-AUTHORIZATION signature for delegated calls, dispatches a
//! single HTTPS POST per operation, and normalizes the response into a
//! success value or a typed error.
//!
//! Payloads and results are [`serde_json::Value`] trees: the provider's
//! operation payloads are open-ended mappings, and every request gets the
//! default `requestEnvelope` merged in before dispatch.
//!
//! # Quick Start (async)
//!
//! ```no_run
//! use paypal_adaptive::{Client, ClientConfig, Credential};
//! use serde_json::json;
//!
//! # async fn example() -> paypal_adaptive::Result<()> {
//! let client = Client::with_config(
//!     Credential::new("user_api1.example.com", "password", "signature"),
//!     ClientConfig::default().with_sandbox(true),
//! )?;
//!
//! let payment = client.pay(json!({
//!     "actionType": "PAY",
//!     "currencyCode": "USD",
//!     "receiverList": {
//!         "receiver": [{"email": "seller@example.com", "amount": "10.00"}]
//!     },
//!     "returnUrl": "https://example.com/done",
//!     "cancelUrl": "https://example.com/cancel",
//! })).await?;
//!
//! // Redirect the payer here to approve the created payment.
//! println!("approve at: {}", payment["paymentApprovalUrl"]);
//! # Ok(())
//! # }
//! ```
//!
//! Delegated calls carry a `token`/`tokenSecret` pair in the payload; the
//! pair is stripped before the request goes out and exchanged for a
//! signed authorization header:
//!
//! ```no_run
//! # use paypal_adaptive::{Client, ClientConfig, Credential};
//! # use serde_json::json;
//! # async fn example(client: Client) -> paypal_adaptive::Result<()> {
//! let data = client.get_basic_personal_data(json!({
//!     "token": "delegated-token",
//!     "tokenSecret": "delegated-token-secret",
//!     "attributeList": {"attribute": ["http://axschema.org/namePerson/first"]},
//! })).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod credential;
pub mod error;

#[cfg(feature = "blocking")]
pub mod blocking;

mod merge;
mod ops;
mod request;
mod response;
mod sign;

pub use client::Client;
pub use config::{ClientConfig, SANDBOX_APP_ID};
pub use credential::{Credential, CredentialProvider, EnvProvider, StaticProvider, TokenCredential};
pub use error::{AdaptiveError, Result};
pub use ops::ApiGroup;
pub use response::HTTP_STATUS_FIELD;

// Compile-time assertions: key types must be Send + Sync for use across threads.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<Client>;
    let _ = assert_send_sync::<AdaptiveError>;
    let _ = assert_send_sync::<Credential>;
    let _ = assert_send_sync::<ClientConfig>;
};
