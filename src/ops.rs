//! Declarative operation table for the three Adaptive API groups.
//!
//! Every callable operation is one row: its name, the route prefix it is
//! served under, the required-field rule checked before dispatch, and the
//! post-processing applied to its result. The clients iterate this table
//! instead of hand-writing near-identical methods per operation.

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{AdaptiveError, Result};

/// API group an operation is routed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiGroup {
    AdaptivePayments,
    AdaptiveAccounts,
    Permissions,
}

impl ApiGroup {
    pub(crate) fn prefix(self) -> &'static str {
        match self {
            ApiGroup::AdaptivePayments => "AdaptivePayments",
            ApiGroup::AdaptiveAccounts => "AdaptiveAccounts",
            ApiGroup::Permissions => "Permissions",
        }
    }
}

/// Required-field rule checked against the payload before dispatch.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FieldRule {
    /// No payload requirements.
    None,
    /// At least one of the named fields must be present.
    AnyOf(&'static [&'static str]),
}

/// Result post-processing applied after a successful call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostProcess {
    None,
    /// Attach `paymentApprovalUrl` when the payment was created.
    PaymentApprovalUrl,
    /// Attach `preapprovalUrl` when a preapproval key came back.
    PreapprovalUrl,
}

/// One row of the operation table.
pub(crate) struct OperationSpec {
    pub name: &'static str,
    pub group: ApiGroup,
    pub rule: FieldRule,
    pub post: PostProcess,
}

const fn op(
    name: &'static str,
    group: ApiGroup,
    rule: FieldRule,
    post: PostProcess,
) -> OperationSpec {
    OperationSpec {
        name,
        group,
        rule,
        post,
    }
}

/// Fields that identify an existing payment.
const PAYMENT_ID_FIELDS: &[&str] = &["payKey", "transactionId", "trackingId"];
/// Field that identifies an existing preapproval.
const PREAPPROVAL_ID_FIELDS: &[&str] = &["preapprovalKey"];

pub(crate) const OPERATIONS: &[OperationSpec] = &[
    // Adaptive Payments
    op(
        "CancelPreapproval",
        ApiGroup::AdaptivePayments,
        FieldRule::AnyOf(PREAPPROVAL_ID_FIELDS),
        PostProcess::None,
    ),
    op(
        "ConvertCurrency",
        ApiGroup::AdaptivePayments,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "ExecutePayment",
        ApiGroup::AdaptivePayments,
        FieldRule::AnyOf(PAYMENT_ID_FIELDS),
        PostProcess::None,
    ),
    op(
        "GetFundingPlans",
        ApiGroup::AdaptivePayments,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "GetPaymentOptions",
        ApiGroup::AdaptivePayments,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "GetShippingAddresses",
        ApiGroup::AdaptivePayments,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "Pay",
        ApiGroup::AdaptivePayments,
        FieldRule::None,
        PostProcess::PaymentApprovalUrl,
    ),
    op(
        "PaymentDetails",
        ApiGroup::AdaptivePayments,
        FieldRule::AnyOf(PAYMENT_ID_FIELDS),
        PostProcess::None,
    ),
    op(
        "Preapproval",
        ApiGroup::AdaptivePayments,
        FieldRule::None,
        PostProcess::PreapprovalUrl,
    ),
    op(
        "PreapprovalDetails",
        ApiGroup::AdaptivePayments,
        FieldRule::AnyOf(PREAPPROVAL_ID_FIELDS),
        PostProcess::None,
    ),
    op(
        "Refund",
        ApiGroup::AdaptivePayments,
        FieldRule::AnyOf(PAYMENT_ID_FIELDS),
        PostProcess::None,
    ),
    op(
        "SetPaymentOptions",
        ApiGroup::AdaptivePayments,
        FieldRule::None,
        PostProcess::None,
    ),
    // Adaptive Accounts
    op(
        "AddBankAccount",
        ApiGroup::AdaptiveAccounts,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "AddPaymentCard",
        ApiGroup::AdaptiveAccounts,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "CheckComplianceStatus",
        ApiGroup::AdaptiveAccounts,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "CreateAccount",
        ApiGroup::AdaptiveAccounts,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "GetUserAgreement",
        ApiGroup::AdaptiveAccounts,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "GetVerifiedStatus",
        ApiGroup::AdaptiveAccounts,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "SetFundingSourceConfirmed",
        ApiGroup::AdaptiveAccounts,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "UpdateComplianceStatus",
        ApiGroup::AdaptiveAccounts,
        FieldRule::None,
        PostProcess::None,
    ),
    // Permissions
    op(
        "CancelPermissions",
        ApiGroup::Permissions,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "GetAccessToken",
        ApiGroup::Permissions,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "GetAdvancedPersonalData",
        ApiGroup::Permissions,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "GetBasicPersonalData",
        ApiGroup::Permissions,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "GetPermissions",
        ApiGroup::Permissions,
        FieldRule::None,
        PostProcess::None,
    ),
    op(
        "RequestPermissions",
        ApiGroup::Permissions,
        FieldRule::None,
        PostProcess::None,
    ),
];

/// Finds an operation by its provider name, e.g. `"Pay"`.
pub(crate) fn lookup(name: &str) -> Option<&'static OperationSpec> {
    OPERATIONS.iter().find(|operation| operation.name == name)
}

impl OperationSpec {
    /// Route segment for this operation, e.g. `AdaptivePayments/Pay`.
    pub(crate) fn path(&self) -> String {
        format!("{}/{}", self.group.prefix(), self.name)
    }

    /// Checks the payload against this operation's required-field rule.
    pub(crate) fn check_payload(&self, payload: &Value) -> Result<()> {
        match self.rule {
            FieldRule::None => Ok(()),
            FieldRule::AnyOf(fields) => {
                let present = payload
                    .as_object()
                    .map(|map| fields.iter().any(|field| map.contains_key(*field)))
                    .unwrap_or(false);
                if present {
                    Ok(())
                } else {
                    Err(AdaptiveError::Validation(format!(
                        "{} requires one of: {}",
                        self.name,
                        fields.join(", ")
                    )))
                }
            }
        }
    }
}

/// Attaches redirect URLs for flows that hand the payer over to the
/// provider's approval pages.
pub(crate) fn apply_post_process(config: &ClientConfig, post: PostProcess, result: &mut Value) {
    match post {
        PostProcess::None => {}
        PostProcess::PaymentApprovalUrl => {
            let created =
                result.get("paymentExecStatus").and_then(Value::as_str) == Some("CREATED");
            let pay_key = result
                .get("payKey")
                .and_then(Value::as_str)
                .map(str::to_owned);
            if created
                && let Some(pay_key) = pay_key
                && let Some(map) = result.as_object_mut()
            {
                let url = config.payment_approval_url().replacen("%s", &pay_key, 1);
                map.insert("paymentApprovalUrl".to_string(), Value::String(url));
            }
        }
        PostProcess::PreapprovalUrl => {
            let key = result
                .get("preapprovalKey")
                .and_then(Value::as_str)
                .map(str::to_owned);
            if let Some(key) = key
                && let Some(map) = result.as_object_mut()
            {
                let url = config.preapproval_redirect_url().replacen("%s", &key, 1);
                map.insert("preapprovalUrl".to_string(), Value::String(url));
            }
        }
    }
}
