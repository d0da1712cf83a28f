use serde_json::Value;

use crate::config::ClientConfig;
use crate::credential::{Credential, CredentialProvider, EnvProvider};
use crate::error::{AdaptiveError, Result};
use crate::ops::{self, OperationSpec, apply_post_process};
use crate::request::{apply_envelope, build_request};
use crate::response::classify;

/// Async client for the PayPal Adaptive APIs.
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
    credential: Credential,
}

impl Client {
    /// Creates a new client with the default configuration.
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_config(credential, ClientConfig::default())
    }

    /// Creates a new client with a custom configuration.
    ///
    /// Fails when the credential is incomplete or when no application id
    /// can be resolved for the configured environment.
    pub fn with_config(credential: Credential, config: ClientConfig) -> Result<Self> {
        credential.validate()?;
        config.resolved_app_id()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AdaptiveError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            config,
            credential,
        })
    }

    /// Creates a new client from environment variables.
    ///
    /// Reads the credential from `PAYPAL_USER_ID` / `PAYPAL_PASSWORD` /
    /// `PAYPAL_SIGNATURE`, the application id from
    /// `PAYPAL_APPLICATION_ID`, and enables the sandbox when
    /// `PAYPAL_SANDBOX` is `1` or `true`.
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

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Calls a table-registered operation by name, e.g. `"Pay"`.
    ///
    /// The payload gets the default request envelope, is checked against
    /// the operation's required-field rule, and the result receives the
    /// operation's post-processing (redirect URLs for `Pay` and
    /// `Preapproval`).
    pub async fn call(&self, operation: &str, payload: Value) -> Result<Value> {
        let spec = ops::lookup(operation).ok_or_else(|| {
            AdaptiveError::Validation(format!("unknown operation: {}", operation))
        })?;
        self.dispatch(spec, payload).await
    }

    /// Calls a raw provider route, e.g. `"AdaptivePayments/Pay"`, with no
    /// table validation or post-processing.
    pub async fn call_path(&self, operation_path: &str, payload: Value) -> Result<Value> {
        self.execute(operation_path, payload).await
    }

    /// Creates an adaptive payment. When the provider answers with a
    /// `CREATED` payment, the result carries `paymentApprovalUrl` to
    /// redirect the payer to.
    pub async fn pay(&self, payload: Value) -> Result<Value> {
        self.call("Pay", payload).await
    }

    /// Looks up a payment by pay key, transaction id or tracking id.
    pub async fn payment_details(&self, payload: Value) -> Result<Value> {
        self.call("PaymentDetails", payload).await
    }

    /// Executes a previously created payment.
    pub async fn execute_payment(&self, payload: Value) -> Result<Value> {
        self.call("ExecutePayment", payload).await
    }

    /// Sets up a preapproval. The result carries `preapprovalUrl` when a
    /// preapproval key came back.
    pub async fn preapproval(&self, payload: Value) -> Result<Value> {
        self.call("Preapproval", payload).await
    }

    /// Looks up a preapproval by its key.
    pub async fn preapproval_details(&self, payload: Value) -> Result<Value> {
        self.call("PreapprovalDetails", payload).await
    }

    /// Refunds all or part of a payment.
    pub async fn refund(&self, payload: Value) -> Result<Value> {
        self.call("Refund", payload).await
    }

    /// Asks the provider for a permissions-request token.
    pub async fn request_permissions(&self, payload: Value) -> Result<Value> {
        self.call("RequestPermissions", payload).await
    }

    /// Exchanges a request token for a delegated access token.
    pub async fn get_access_token(&self, payload: Value) -> Result<Value> {
        self.call("GetAccessToken", payload).await
    }

    /// Fetches basic personal data on behalf of a delegating account.
    pub async fn get_basic_personal_data(&self, payload: Value) -> Result<Value> {
        self.call("GetBasicPersonalData", payload).await
    }

    async fn dispatch(&self, spec: &'static OperationSpec, payload: Value) -> Result<Value> {
        // Defaults are merged before the presence check; execute merges
        // again, which is a no-op.
        let payload = apply_envelope(payload);
        spec.check_payload(&payload)?;
        let mut result = self.execute(&spec.path(), payload).await?;
        apply_post_process(&self.config, spec.post, &mut result);
        Ok(result)
    }

    async fn execute(&self, operation_path: &str, payload: Value) -> Result<Value> {
        let outbound =
            build_request(&self.config, &self.credential, operation_path, payload, None)?;

        let mut request = self.http.post(self.config.endpoint(operation_path));
        for (name, value) in &outbound.headers {
            request = request.header(*name, value.as_str());
        }

        let response = request.body(outbound.body).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        classify(&self.config.response_format, status, text)
    }
}
