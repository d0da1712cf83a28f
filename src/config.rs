use std::time::Duration;

use crate::error::{AdaptiveError, Result};

/// Application id PayPal shares for all sandbox callers.
pub const SANDBOX_APP_ID: &str = "APP-80W284485P519543T";

/// Configuration for the Adaptive API client.
///
/// Defaults target the production environment; flip [`with_sandbox`] to
/// route everything (hostname, redirect templates, shared app id) to the
/// sandbox instead.
///
/// [`with_sandbox`]: ClientConfig::with_sandbox
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Route requests to the provider sandbox.
    pub sandbox: bool,

    /// PayPal application id. Required outside the sandbox; the sandbox
    /// falls back to [`SANDBOX_APP_ID`].
    pub app_id: Option<String>,

    /// Production API hostname.
    pub host: String,

    /// Sandbox API hostname.
    pub sandbox_host: String,

    /// Payment approval redirect template; `%s` is replaced by the pay key.
    pub approval_url: String,
    pub sandbox_approval_url: String,

    /// Preapproval redirect template; `%s` is replaced by the preapproval key.
    pub preapproval_url: String,
    pub sandbox_preapproval_url: String,

    /// Outbound body encoding, sent in X-PAYPAL-REQUEST-DATA-FORMAT.
    pub request_format: String,

    /// Expected response encoding, sent in X-PAYPAL-RESPONSE-DATA-FORMAT.
    pub response_format: String,

    /// X-PAYPAL-SANDBOX-EMAIL-ADDRESS header value, if any.
    pub sandbox_email: Option<String>,

    /// X-PAYPAL-DEVICE-IPADDRESS header value, if any.
    pub device_ip: Option<String>,

    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            sandbox: false,
            app_id: None,
            host: "svcs.paypal.com".to_string(),
            sandbox_host: "svcs.sandbox.paypal.com".to_string(),
            approval_url: "https://www.paypal.com/cgi-bin/webscr?cmd=_ap-payment&paykey=%s"
                .to_string(),
            sandbox_approval_url:
                "https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_ap-payment&paykey=%s"
                    .to_string(),
            preapproval_url:
                "https://www.paypal.com/cgi-bin/webscr?cmd=_ap-preapproval&preapprovalkey=%s"
                    .to_string(),
            sandbox_preapproval_url:
                "https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_ap-preapproval&preapprovalkey=%s"
                    .to_string(),
            request_format: "JSON".to_string(),
            response_format: "JSON".to_string(),
            sandbox_email: None,
            device_ip: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Switches between sandbox and production environments.
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Sets the application id.
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Overrides the production hostname.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Overrides the sandbox hostname.
    pub fn with_sandbox_host(mut self, host: impl Into<String>) -> Self {
        self.sandbox_host = host.into();
        self
    }

    /// Sets the request and response data formats.
    pub fn with_formats(
        mut self,
        request_format: impl Into<String>,
        response_format: impl Into<String>,
    ) -> Self {
        self.request_format = request_format.into();
        self.response_format = response_format.into();
        self
    }

    /// Sets the sandbox email header value.
    pub fn with_sandbox_email(mut self, email: impl Into<String>) -> Self {
        self.sandbox_email = Some(email.into());
        self
    }

    /// Sets the device IP header value.
    pub fn with_device_ip(mut self, device_ip: impl Into<String>) -> Self {
        self.device_ip = Some(device_ip.into());
        self
    }

    /// Sets the HTTP request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The hostname calls are routed to in the configured environment.
    pub(crate) fn endpoint_host(&self) -> &str {
        if self.sandbox {
            &self.sandbox_host
        } else {
            &self.host
        }
    }

    /// Full URL for an operation path, e.g. `AdaptivePayments/Pay`.
    ///
    /// Hostname overrides may carry an explicit scheme so tests can target
    /// a plain-HTTP mock server.
    pub(crate) fn endpoint(&self, operation_path: &str) -> String {
        let host = self.endpoint_host();
        if host.contains("://") {
            format!("{}/{}", host.trim_end_matches('/'), operation_path)
        } else {
            format!("https://{}/{}", host, operation_path)
        }
    }

    /// Payment approval redirect template for the configured environment.
    pub(crate) fn payment_approval_url(&self) -> &str {
        if self.sandbox {
            &self.sandbox_approval_url
        } else {
            &self.approval_url
        }
    }

    /// Preapproval redirect template for the configured environment.
    pub(crate) fn preapproval_redirect_url(&self) -> &str {
        if self.sandbox {
            &self.sandbox_preapproval_url
        } else {
            &self.preapproval_url
        }
    }

    /// The application id sent with every call.
    ///
    /// Missing app id is a construction-time failure outside the sandbox.
    pub(crate) fn resolved_app_id(&self) -> Result<String> {
        match (&self.app_id, self.sandbox) {
            (Some(app_id), _) => Ok(app_id.clone()),
            (None, true) => Ok(SANDBOX_APP_ID.to_string()),
            (None, false) => Err(AdaptiveError::Config(
                "appId is required outside the sandbox".into(),
            )),
        }
    }
}
