//! Checkout route handlers.
//!
//! The flow is a four-step wizard held in the session (see
//! [`cornerstore_core::checkout`]). Each POST applies one sequencer
//! transition and redirects back to `GET /checkout`, which renders whatever
//! step the sequencer is on. Forms that fail the presence gate re-render in
//! place with the missing fields listed.
//!
//! Payment settles on a spawned task that owns its own handle to the
//! session. The pending state is saved before the task starts, so a
//! duplicate submission from another request sees it and is refused, and a
//! client that disconnects mid-settlement still finds the outcome stored.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use cornerstore_core::checkout::{
    PaymentDetails, SettlementState, ShippingDetails, StepProgress,
};
use cornerstore_core::{CheckoutError, CheckoutSequencer, CheckoutStage, Price};
use tower_sessions::Session;
use tracing::{Instrument, Span, instrument};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::routes::cart::CartView;
use crate::services::{
    SessionCart, discard_checkout, load_cart, load_checkout, save_cart, store_checkout,
};
use crate::state::AppState;

/// One entry of the step indicator.
#[derive(Clone)]
pub struct StepView {
    pub number: usize,
    pub name: &'static str,
    /// `done`, `current` or `upcoming`.
    pub progress: &'static str,
}

/// Settlement result shown on the confirmation step.
#[derive(Clone)]
pub struct ConfirmationView {
    pub reference: String,
    pub amount: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub stage: &'static str,
    pub steps: Vec<StepView>,
    pub cart: CartView,
    pub shipping: ShippingDetails,
    /// Card holder and expiry are echoed back; the number is masked and the
    /// CVV is never re-rendered.
    pub card_holder: String,
    pub expiry_date: String,
    pub card_last4: String,
    pub missing: Vec<&'static str>,
    pub failure: Option<String>,
    pub processing: bool,
    pub confirmation: Option<ConfirmationView>,
    pub cart_count: u32,
}

impl CheckoutTemplate {
    fn new(sequencer: &CheckoutSequencer, cart: &SessionCart) -> Self {
        let stage = sequencer.stage();
        let confirmation = match sequencer.settlement() {
            SettlementState::Succeeded { amount, reference } => Some(ConfirmationView {
                reference: reference.clone(),
                amount: amount.to_string(),
            }),
            _ => None,
        };
        let payment = sequencer.payment();

        Self {
            stage: stage.as_str(),
            steps: CheckoutStage::ALL
                .iter()
                .map(|&step| StepView {
                    number: step.number(),
                    name: step.as_str(),
                    progress: match stage.progress_of(step) {
                        StepProgress::Done => "done",
                        StepProgress::Current => "current",
                        StepProgress::Upcoming => "upcoming",
                    },
                })
                .collect(),
            cart: CartView::from_ledger(cart),
            shipping: sequencer.shipping().clone(),
            card_holder: payment.card_holder.clone(),
            expiry_date: payment.expiry_date.clone(),
            card_last4: payment.card_last4(),
            missing: Vec::new(),
            failure: sequencer.failure_reason().map(String::from),
            processing: sequencer.is_processing(),
            confirmation,
            cart_count: cart.item_count(),
        }
    }

    fn with_missing(mut self, labels: Vec<&'static str>) -> Self {
        self.missing = labels;
        self
    }
}

/// Open or resume checkout.
///
/// An empty cart cannot start checkout and is sent back to the cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Response> {
    let cart = load_cart(&session).await;

    let sequencer = match load_checkout(&session).await {
        Some(sequencer) if !abandoned(&sequencer, &cart) => sequencer,
        Some(_) => {
            tracing::info!("Cart emptied mid-checkout, closing flow");
            discard_checkout(&session).await?;
            return Ok(Redirect::to("/cart").into_response());
        }
        None => match CheckoutSequencer::open(&cart) {
            Ok(sequencer) => {
                store_checkout(&session, &sequencer).await?;
                add_breadcrumb("checkout", "Opened checkout", None);
                sequencer
            }
            Err(CheckoutError::EmptyCart) => return Ok(Redirect::to("/cart").into_response()),
            Err(e) => return Err(e.into()),
        },
    };

    Ok(CheckoutTemplate::new(&sequencer, &cart).into_response())
}

/// Review -> shipping.
#[instrument(skip(session))]
pub async fn continue_to_shipping(session: Session) -> Result<Response> {
    let Some(mut sequencer) = load_checkout(&session).await else {
        return Ok(Redirect::to("/checkout").into_response());
    };

    sequencer.continue_to_shipping()?;
    store_checkout(&session, &sequencer).await?;
    add_breadcrumb("checkout", "Continued to shipping", None);

    Ok(Redirect::to("/checkout").into_response())
}

/// Submit the shipping form.
#[instrument(skip(session, details))]
pub async fn submit_shipping(
    session: Session,
    Form(details): Form<ShippingDetails>,
) -> Result<Response> {
    let Some(mut sequencer) = load_checkout(&session).await else {
        return Ok(Redirect::to("/checkout").into_response());
    };

    match sequencer.submit_shipping(details) {
        Ok(()) => {
            store_checkout(&session, &sequencer).await?;
            add_breadcrumb("checkout", "Submitted shipping", None);
            Ok(Redirect::to("/checkout").into_response())
        }
        Err(CheckoutError::MissingShippingFields(missing)) => {
            store_checkout(&session, &sequencer).await?;
            let cart = load_cart(&session).await;
            let labels = missing.iter().map(|f| f.label()).collect();
            Ok(CheckoutTemplate::new(&sequencer, &cart)
                .with_missing(labels)
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Submit the payment form and settle.
///
/// Waits out the processor's settlement delay. On success the cart is
/// cleared and the flow moves to confirmation; on failure it stays on the
/// payment step with the reason shown. The outcome is recorded even if this
/// request is dropped before it resolves.
#[instrument(skip(state, session, details))]
pub async fn submit_payment(
    State(state): State<AppState>,
    session: Session,
    Form(details): Form<PaymentDetails>,
) -> Result<Response> {
    let Some(mut sequencer) = load_checkout(&session).await else {
        return Ok(Redirect::to("/checkout").into_response());
    };
    let cart = load_cart(&session).await;

    if abandoned(&sequencer, &cart) {
        return Err(CheckoutError::EmptyCart.into());
    }

    let amount = cart.total();
    match sequencer.submit_payment(details, amount) {
        Ok(()) => {}
        Err(CheckoutError::MissingPaymentFields(missing)) => {
            store_checkout(&session, &sequencer).await?;
            let labels = missing.iter().map(|f| f.label()).collect();
            return Ok(CheckoutTemplate::new(&sequencer, &cart)
                .with_missing(labels)
                .into_response());
        }
        Err(e) => {
            tracing::warn!(error = %e, "Payment submission refused");
            return Err(e.into());
        }
    }

    // Make the pending state visible to concurrent requests before waiting
    store_checkout(&session, &sequencer).await?;
    if let Err(e) = session.save().await {
        tracing::warn!(error = %e, "Failed to save pending settlement");
    }
    add_breadcrumb(
        "checkout",
        "Payment submitted",
        Some(&[("amount", amount.to_string().as_str())]),
    );

    let settlement = tokio::spawn(
        settle_and_record(state, session, sequencer, cart, amount).instrument(Span::current()),
    );
    settlement.await??;

    Ok(Redirect::to("/checkout").into_response())
}

/// Run the processor and write the outcome back to the session store.
async fn settle_and_record(
    state: AppState,
    session: Session,
    mut sequencer: CheckoutSequencer,
    mut cart: SessionCart,
    amount: Price,
) -> Result<()> {
    let outcome = state
        .payments()
        .settle(amount, sequencer.payment())
        .await;
    sequencer.complete_settlement(outcome, &mut cart)?;

    save_cart(&session, cart).await;
    store_checkout(&session, &sequencer).await?;
    // The response layer only saves for requests that are still alive
    session.save().await?;

    tracing::info!(stage = ?sequencer.stage(), "Settlement recorded");
    Ok(())
}

/// Dismiss the flow.
///
/// Refused while a settlement is pending.
#[instrument(skip(session))]
pub async fn close(session: Session) -> Result<Response> {
    if let Some(sequencer) = load_checkout(&session).await {
        sequencer.ensure_closable()?;
        discard_checkout(&session).await?;
        add_breadcrumb("checkout", "Closed checkout", None);
    }

    Ok(Redirect::to("/").into_response())
}

/// A flow whose cart was emptied before payment went through.
fn abandoned(sequencer: &CheckoutSequencer, cart: &SessionCart) -> bool {
    cart.is_empty()
        && sequencer.stage() != CheckoutStage::Confirmation
        && !sequencer.is_processing()
}
