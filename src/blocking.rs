//! Synchronous (blocking) client for the PayPal Adaptive APIs.
//!
//! Only available when the `blocking` feature is enabled. Mirrors the
//! async [`crate::Client`] API using `reqwest::blocking`; dispatch,
//! signing and response classification share the same code paths.
//!
//! # Example
//!
//! ```no_run
//! use paypal_adaptive::blocking::Client;
//! use paypal_adaptive::{ClientConfig, Credential};
//! use serde_json::json;
//!
//! fn main() -> paypal_adaptive::Result<()> {
//!     let client = Client::with_config(
//!         Credential::new("user_api1.example.com", "password", "signature"),
//!         ClientConfig::default().with_sandbox(true),
//!     )?;
//!
//!     let details = client.payment_details(json!({"payKey": "AP-1234567890"}))?;
//!     println!("status: {}", details["status"]);
//!     Ok(())
//! }
//! ```

use serde_json::Value;

use crate::config::ClientConfig;
use crate::credential::{Credential, CredentialProvider, EnvProvider};
use crate::error::{AdaptiveError, Result};
use crate::ops::{self, OperationSpec, apply_post_process};
use crate::request::{apply_envelope, build_request};
use crate::response::classify;

/// Synchronous client for the PayPal Adaptive APIs.
pub struct Client {
    http: reqwest::blocking::Client,
    config: ClientConfig,
    credential: Credential,
}

impl Client {
    /// Creates a new blocking client with the default configuration.
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_config(credential, ClientConfig::default())
    }

    /// Creates a new blocking client with a custom configuration.
    pub fn with_config(credential: Credential, config: ClientConfig) -> Result<Self> {
        credential.validate()?;
        config.resolved_app_id()?;
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AdaptiveError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            config,
            credential,
        })
    }

    /// Creates a new blocking client from environment variables, with the
    /// same variable set as [`crate::Client::from_env`].
    pub fn from_env() -> Result<Self> {
        let credential = EnvProvider.resolve()?;
        let mut config = ClientConfig::default();
        if let Ok(app_id) = std::env::var("PAYPAL_APPLICATION_ID") {
            config = config.with_app_id(app_id);
        }
        if let Ok(sandbox) = std::env::var("PAYPAL_SANDBOX") {
            config = config.with_sandbox(sandbox == "1" || sandbox.eq_ignore_ascii_case("true"));
        }
        Self::with_config(credential, config)
    }

    /// Calls a table-registered operation by name, e.g. `"Pay"`.
    pub fn call(&self, operation: &str, payload: Value) -> Result<Value> {
        let spec = ops::lookup(operation).ok_or_else(|| {
            AdaptiveError::Validation(format!("unknown operation: {}", operation))
        })?;
        self.dispatch(spec, payload)
    }

    /// Calls a raw provider route, e.g. `"AdaptivePayments/Pay"`.
    pub fn call_path(&self, operation_path: &str, payload: Value) -> Result<Value> {
        self.execute(operation_path, payload)
    }

    /// Creates an adaptive payment.
    pub fn pay(&self, payload: Value) -> Result<Value> {
        self.call("Pay", payload)
    }

    /// Looks up a payment by pay key, transaction id or tracking id.
    pub fn payment_details(&self, payload: Value) -> Result<Value> {
        self.call("PaymentDetails", payload)
    }

    /// Executes a previously created payment.
    pub fn execute_payment(&self, payload: Value) -> Result<Value> {
        self.call("ExecutePayment", payload)
    }

    /// Sets up a preapproval.
    pub fn preapproval(&self, payload: Value) -> Result<Value> {
        self.call("Preapproval", payload)
    }

    /// Looks up a preapproval by its key.
    pub fn preapproval_details(&self, payload: Value) -> Result<Value> {
        self.call("PreapprovalDetails", payload)
    }

    /// Refunds all or part of a payment.
    pub fn refund(&self, payload: Value) -> Result<Value> {
        self.call("Refund", payload)
    }

    /// Asks the provider for a permissions-request token.
    pub fn request_permissions(&self, payload: Value) -> Result<Value> {
        self.call("RequestPermissions", payload)
    }

    /// Exchanges a request token for a delegated access token.
    pub fn get_access_token(&self, payload: Value) -> Result<Value> {
        self.call("GetAccessToken", payload)
    }

    /// Fetches basic personal data on behalf of a delegating account.
    pub fn get_basic_personal_data(&self, payload: Value) -> Result<Value> {
        self.call("GetBasicPersonalData", payload)
    }

    fn dispatch(&self, spec: &'static OperationSpec, payload: Value) -> Result<Value> {
        let payload = apply_envelope(payload);
        spec.check_payload(&payload)?;
        let mut result = self.execute(&spec.path(), payload)?;
        apply_post_process(&self.config, spec.post, &mut result);
        Ok(result)
    }

    fn execute(&self, operation_path: &str, payload: Value) -> Result<Value> {
        let outbound =
            build_request(&self.config, &self.credential, operation_path, payload, None)?;

        let mut request = self.http.post(self.config.endpoint(operation_path));
        for (name, value) in &outbound.headers {
            request = request.header(*name, value.as_str());
        }

        let response = request.body(outbound.body).send()?;
        let status = response.status().as_u16();
        let text = response.text()?;

        classify(&self.config.response_format, status, text)
    }
}
