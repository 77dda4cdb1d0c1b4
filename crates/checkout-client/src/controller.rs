//! Checkout Controller
//!
//! Explicit state machine for one payment attempt. The processor's widget
//! drives it through four callbacks; every transition is a named method so
//! tests can exercise the whole lifecycle without a widget present.

use std::sync::Arc;

use checkout_core::error::{CheckoutError, Result};
use checkout_core::{CaptureResult, OrderId, PaymentRequest};

use crate::api::RelayApi;

/// Lifecycle of a single payment attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// Fresh attempt, nothing sent yet
    Idle,
    /// Create call in flight
    Creating,
    /// Order exists; the user is inside the processor's approval UI
    AwaitingApproval,
    /// Capture call in flight; cancellation is no longer possible
    Capturing,
    /// Capture completed with terminal success status
    Succeeded,
    /// Creation, capture, or the widget itself failed
    Failed,
    /// User abandoned the flow before approval
    Cancelled,
}

impl CheckoutPhase {
    /// Terminal phases accept no further events
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CheckoutPhase::Succeeded | CheckoutPhase::Failed | CheckoutPhase::Cancelled
        )
    }
}

/// Controller for one payment attempt.
///
/// Holds the payment request by value: the amount the user confirmed is
/// the amount this attempt will charge, no matter what the surrounding UI
/// does afterwards. Construct a fresh controller per attempt and discard
/// it when the amount changes or the attempt reaches a terminal phase.
pub struct CheckoutController {
    api: Arc<dyn RelayApi>,
    request: PaymentRequest,
    /// Unique per attempt; forwarded as the create idempotency token
    attempt_id: String,
    phase: CheckoutPhase,
    order_id: Option<OrderId>,
    result: Option<CaptureResult>,
    error: Option<String>,
}

impl CheckoutController {
    /// Create a controller for a single attempt at this payment request
    pub fn new(api: Arc<dyn RelayApi>, request: PaymentRequest) -> Self {
        Self {
            api,
            request,
            attempt_id: uuid::Uuid::new_v4().to_string(),
            phase: CheckoutPhase::Idle,
            order_id: None,
            result: None,
            error: None,
        }
    }

    /// Widget callback: it needs an order id to bind the approval UI to.
    ///
    /// Valid once, from `Idle`. On success the returned id is also kept so
    /// later approval callbacks can be checked against it.
    pub async fn on_create_order(&mut self) -> Result<OrderId> {
        if self.phase != CheckoutPhase::Idle {
            return Err(CheckoutError::Validation(format!(
                "create requested in phase {:?}; each attempt creates exactly one order",
                self.phase
            )));
        }

        self.phase = CheckoutPhase::Creating;
        tracing::debug!(attempt_id = %self.attempt_id, amount = %self.request.amount, "Creating order");

        match self.api.create_order(&self.request, &self.attempt_id).await {
            Ok(created) => {
                tracing::info!(order_id = %created.id, "Order created, awaiting approval");
                self.order_id = Some(created.id.clone());
                self.phase = CheckoutPhase::AwaitingApproval;
                Ok(created.id)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Widget callback: the user approved the payment inside the
    /// processor's UI.
    ///
    /// Only honored in `AwaitingApproval` and only for the order id this
    /// controller issued; stale or foreign callbacks leave the state
    /// untouched. A capture that comes back 2xx with a non-`COMPLETED`
    /// status is a soft decline and fails the attempt, though the capture
    /// result stays available for inspection.
    pub async fn on_approve(&mut self, order_id: &OrderId) -> Result<CaptureResult> {
        if self.phase != CheckoutPhase::AwaitingApproval
            || self.order_id.as_ref() != Some(order_id)
        {
            tracing::debug!(
                order_id = %order_id,
                phase = ?self.phase,
                "Ignoring approval callback for an order this attempt does not own"
            );
            return Err(CheckoutError::Validation(
                "approval does not match the active attempt".into(),
            ));
        }

        self.phase = CheckoutPhase::Capturing;
        tracing::debug!(order_id = %order_id, "Capturing payment");

        match self.api.capture_order(order_id).await {
            Ok(result) => {
                if result.status.is_terminal_success() {
                    tracing::info!(order_id = %order_id, "Payment succeeded");
                    self.phase = CheckoutPhase::Succeeded;
                    self.result = Some(result.clone());
                    Ok(result)
                } else {
                    let err = CheckoutError::Upstream(format!(
                        "capture finished with status {}",
                        result.status
                    ));
                    tracing::warn!(order_id = %order_id, status = %result.status, "Capture declined");
                    self.result = Some(result);
                    self.fail(&err);
                    Err(err)
                }
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Widget callback: the user abandoned the flow.
    ///
    /// Free before approval - no server call was or will be made for this
    /// attempt. Once capture has been issued, cancellation is impossible
    /// and the event is ignored.
    pub fn on_cancel(&mut self) {
        match self.phase {
            CheckoutPhase::Idle | CheckoutPhase::Creating | CheckoutPhase::AwaitingApproval => {
                tracing::info!(attempt_id = %self.attempt_id, "Checkout cancelled by user");
                self.phase = CheckoutPhase::Cancelled;
            }
            _ => {
                tracing::debug!(phase = ?self.phase, "Cancel ignored");
            }
        }
    }

    /// Widget callback: rendering or network fault inside the widget,
    /// unrelated to business logic
    pub fn on_error(&mut self, message: impl Into<String>) {
        if self.phase.is_terminal() {
            tracing::debug!(phase = ?self.phase, "Widget error after terminal phase ignored");
            return;
        }

        let message = message.into();
        tracing::warn!(attempt_id = %self.attempt_id, "Widget error: {}", message);
        self.error = Some(message);
        self.phase = CheckoutPhase::Failed;
    }

    fn fail(&mut self, err: &CheckoutError) {
        self.error = Some(err.user_message());
        self.phase = CheckoutPhase::Failed;
    }

    /// Current phase of the attempt
    pub fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    /// The payment request this attempt was constructed with
    pub fn request(&self) -> &PaymentRequest {
        &self.request
    }

    /// Order id issued for this attempt, if creation succeeded
    pub fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref()
    }

    /// Capture result, present after a capture response was received -
    /// including soft declines, so callers can inspect the reported status
    pub fn result(&self) -> Option<&CaptureResult> {
        self.result.as_ref()
    }

    /// User-visible failure message, present in `Failed`
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Attempt identifier, also used as the create idempotency token
    pub fn attempt_id(&self) -> &str {
        &self.attempt_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use checkout_core::{
        Amount, CapturedAmount, CurrencyCode, OrderCreated, OrderStatus, Payer,
    };

    /// Scripted relay double: each response is consumed once
    struct FakeRelay {
        create_response: Mutex<Option<Result<OrderCreated>>>,
        capture_response: Mutex<Option<Result<CaptureResult>>>,
        create_calls: AtomicUsize,
        capture_calls: AtomicUsize,
    }

    impl FakeRelay {
        fn new() -> Self {
            Self {
                create_response: Mutex::new(None),
                capture_response: Mutex::new(None),
                create_calls: AtomicUsize::new(0),
                capture_calls: AtomicUsize::new(0),
            }
        }

        fn script_create(&self, response: Result<OrderCreated>) {
            *self.create_response.lock().unwrap() = Some(response);
        }

        fn script_capture(&self, response: Result<CaptureResult>) {
            *self.capture_response.lock().unwrap() = Some(response);
        }
    }

    #[async_trait]
    impl RelayApi for FakeRelay {
        async fn create_order(
            &self,
            _request: &PaymentRequest,
            _request_id: &str,
        ) -> Result<OrderCreated> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.create_response
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(CheckoutError::Upstream("unscripted create".into())))
        }

        async fn capture_order(&self, _order_id: &OrderId) -> Result<CaptureResult> {
            self.capture_calls.fetch_add(1, Ordering::SeqCst);
            self.capture_response
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(CheckoutError::Upstream("unscripted capture".into())))
        }
    }

    fn payment_request() -> PaymentRequest {
        PaymentRequest::new(Amount::new(dec!(10)).unwrap(), CurrencyCode::usd())
    }

    fn created(id: &str) -> OrderCreated {
        OrderCreated {
            id: OrderId::parse(id).unwrap(),
            status: OrderStatus::Created,
        }
    }

    fn capture_with_status(id: &str, status: OrderStatus) -> CaptureResult {
        CaptureResult {
            success: true,
            order_id: OrderId::parse(id).unwrap(),
            status,
            payer: Payer {
                email: "jane@example.com".into(),
                name: "Jane Doe".into(),
            },
            amount: CapturedAmount {
                value: Amount::parse("10.00").unwrap(),
                currency: CurrencyCode::usd(),
            },
        }
    }

    fn controller(relay: &Arc<FakeRelay>) -> CheckoutController {
        CheckoutController::new(relay.clone(), payment_request())
    }

    #[tokio::test]
    async fn happy_path_reaches_succeeded() {
        let relay = Arc::new(FakeRelay::new());
        relay.script_create(Ok(created("ORDER123")));
        relay.script_capture(Ok(capture_with_status("ORDER123", OrderStatus::Completed)));

        let mut checkout = controller(&relay);
        assert_eq!(*checkout.phase(), CheckoutPhase::Idle);

        let order_id = checkout.on_create_order().await.unwrap();
        assert_eq!(*checkout.phase(), CheckoutPhase::AwaitingApproval);

        let result = checkout.on_approve(&order_id).await.unwrap();
        assert_eq!(*checkout.phase(), CheckoutPhase::Succeeded);
        assert_eq!(result.payer.name, "Jane Doe");
        assert_eq!(checkout.result().unwrap().order_id.as_str(), "ORDER123");
        assert_eq!(relay.capture_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn create_failure_fails_the_attempt() {
        let relay = Arc::new(FakeRelay::new());
        relay.script_create(Err(CheckoutError::Upstream("AUTHENTICATION_FAILURE".into())));

        let mut checkout = controller(&relay);
        assert!(checkout.on_create_order().await.is_err());

        assert_eq!(*checkout.phase(), CheckoutPhase::Failed);
        assert!(checkout.error_message().is_some());
        assert_eq!(relay.capture_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancel_before_approval_issues_no_capture() {
        let relay = Arc::new(FakeRelay::new());
        relay.script_create(Ok(created("ORDER123")));

        let mut checkout = controller(&relay);
        checkout.on_create_order().await.unwrap();
        checkout.on_cancel();

        assert_eq!(*checkout.phase(), CheckoutPhase::Cancelled);
        assert_eq!(relay.capture_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancel_from_idle_is_free() {
        let relay = Arc::new(FakeRelay::new());
        let mut checkout = controller(&relay);
        checkout.on_cancel();

        assert_eq!(*checkout.phase(), CheckoutPhase::Cancelled);
        assert_eq!(relay.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stale_approval_callbacks_are_ignored() {
        let relay = Arc::new(FakeRelay::new());
        relay.script_create(Ok(created("ORDER-A")));
        relay.script_capture(Ok(capture_with_status("ORDER-A", OrderStatus::Completed)));

        let mut checkout = controller(&relay);
        checkout.on_create_order().await.unwrap();

        // Approval for an order from some earlier widget render
        let foreign = OrderId::parse("ORDER-B").unwrap();
        assert!(checkout.on_approve(&foreign).await.is_err());
        assert_eq!(*checkout.phase(), CheckoutPhase::AwaitingApproval);
        assert_eq!(relay.capture_calls.load(Ordering::SeqCst), 0);

        // The genuine approval still goes through afterwards
        let own = OrderId::parse("ORDER-A").unwrap();
        checkout.on_approve(&own).await.unwrap();
        assert_eq!(*checkout.phase(), CheckoutPhase::Succeeded);
    }

    #[tokio::test]
    async fn approval_without_created_order_is_ignored() {
        let relay = Arc::new(FakeRelay::new());
        let mut checkout = controller(&relay);

        let id = OrderId::parse("ORDER123").unwrap();
        assert!(checkout.on_approve(&id).await.is_err());
        assert_eq!(*checkout.phase(), CheckoutPhase::Idle);
        assert_eq!(relay.capture_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn capture_failure_fails_without_completed_order() {
        let relay = Arc::new(FakeRelay::new());
        relay.script_create(Ok(created("ORDER123")));
        relay.script_capture(Err(CheckoutError::Upstream("capture timed out".into())));

        let mut checkout = controller(&relay);
        let order_id = checkout.on_create_order().await.unwrap();
        assert!(checkout.on_approve(&order_id).await.is_err());

        assert_eq!(*checkout.phase(), CheckoutPhase::Failed);
        // No order is marked complete client-side
        assert!(checkout.result().is_none());
        assert!(checkout.error_message().is_some());
    }

    #[tokio::test]
    async fn soft_decline_fails_but_keeps_the_result() {
        let relay = Arc::new(FakeRelay::new());
        relay.script_create(Ok(created("ORDER123")));
        relay.script_capture(Ok(capture_with_status("ORDER123", OrderStatus::Declined)));

        let mut checkout = controller(&relay);
        let order_id = checkout.on_create_order().await.unwrap();

        // Transport-level success, processor says DECLINED
        assert!(checkout.on_approve(&order_id).await.is_err());
        assert_eq!(*checkout.phase(), CheckoutPhase::Failed);
        assert_eq!(
            checkout.result().unwrap().status,
            OrderStatus::Declined,
            "declined capture stays inspectable"
        );
    }

    #[tokio::test]
    async fn widget_error_fails_the_attempt() {
        let relay = Arc::new(FakeRelay::new());
        relay.script_create(Ok(created("ORDER123")));

        let mut checkout = controller(&relay);
        checkout.on_create_order().await.unwrap();
        checkout.on_error("SDK failed to render");

        assert_eq!(*checkout.phase(), CheckoutPhase::Failed);
        assert_eq!(checkout.error_message(), Some("SDK failed to render"));
        assert_eq!(relay.capture_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn each_attempt_creates_exactly_one_order() {
        let relay = Arc::new(FakeRelay::new());
        relay.script_create(Ok(created("ORDER123")));

        let mut checkout = controller(&relay);
        checkout.on_create_order().await.unwrap();

        assert!(checkout.on_create_order().await.is_err());
        assert_eq!(*checkout.phase(), CheckoutPhase::AwaitingApproval);
        assert_eq!(relay.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn terminal_phases_ignore_further_events() {
        let relay = Arc::new(FakeRelay::new());
        relay.script_create(Ok(created("ORDER123")));
        relay.script_capture(Ok(capture_with_status("ORDER123", OrderStatus::Completed)));

        let mut checkout = controller(&relay);
        let order_id = checkout.on_create_order().await.unwrap();
        checkout.on_approve(&order_id).await.unwrap();

        checkout.on_cancel();
        checkout.on_error("late widget fault");
        assert_eq!(*checkout.phase(), CheckoutPhase::Succeeded);
        assert!(checkout.error_message().is_none());
    }

    #[test]
    fn fresh_controllers_get_fresh_attempt_ids() {
        let relay = Arc::new(FakeRelay::new());
        let first = controller(&relay);
        let second = controller(&relay);
        assert_ne!(first.attempt_id(), second.attempt_id());
    }
}
