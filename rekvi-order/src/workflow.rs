use crate::models::{
    AddressChoice, OrderDraft, OrderGateway, OrderPayload, OrderReceipt, ZipLookupGateway,
};
use crate::validate::{self, PhonePolicy, ValidationError};
use rekvi_basket::BasketService;
use rekvi_core::remote::RemoteError;
use rekvi_shared::UserNo;
use serde::{Deserialize, Serialize};

/// Confirmation dialog states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    Draft,
    AddressCaptured,
    FinalConfirmed,
    Submitted,
    Cancelled,
}

impl WorkflowState {
    fn name(self) -> &'static str {
        match self {
            WorkflowState::Draft => "DRAFT",
            WorkflowState::AddressCaptured => "ADDRESS_CAPTURED",
            WorkflowState::FinalConfirmed => "FINAL_CONFIRMED",
            WorkflowState::Submitted => "SUBMITTED",
            WorkflowState::Cancelled => "CANCELLED",
        }
    }
}

/// The part of the draft that survives address capture. Later stages only
/// retain the composed address text, never the original fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrozenDraft {
    pub user_no: UserNo,
    pub customer_name: String,
    pub resolved_address_text: String,
    pub phone: Option<String>,
    pub email: String,
    pub total_item_count: i64,
}

impl FrozenDraft {
    /// Confirmation copy shown after submission. Names the phone number as
    /// the notification channel when no email was given.
    pub fn notification_message(&self) -> String {
        let email = self.email.trim();
        if email.is_empty() {
            format!(
                "The order has been placed. You will receive a message on {} upon delivery.",
                self.phone.as_deref().unwrap_or("")
            )
        } else {
            format!(
                "The order has been placed. A confirmation will be sent to {}.",
                email
            )
        }
    }
}

/// Drives the three-stage order confirmation:
/// `Draft → AddressCaptured → FinalConfirmed → Submitted`, with `Cancelled`
/// reachable from every pre-submission state. Each validation failure leaves
/// the draft in `Draft` unchanged.
#[derive(Debug)]
pub struct ConfirmationWorkflow {
    state: WorkflowState,
    draft: OrderDraft,
    policy: PhonePolicy,
    resolved_address_text: Option<String>,
    normalized_phone: Option<String>,
}

impl ConfirmationWorkflow {
    /// Open the dialog. Rejected when the basket holds no items.
    pub fn begin(draft: OrderDraft, policy: PhonePolicy) -> Result<Self, WorkflowError> {
        if draft.total_item_count <= 0 {
            return Err(WorkflowError::EmptyBasket);
        }
        Ok(Self {
            state: WorkflowState::Draft,
            draft,
            policy,
            resolved_address_text: None,
            normalized_phone: None,
        })
    }

    /// Rebuild a workflow in `FinalConfirmed` from a previously captured
    /// draft, ready for submission.
    pub fn resume(frozen: FrozenDraft, policy: PhonePolicy) -> Self {
        let draft = OrderDraft {
            user_no: frozen.user_no,
            customer_name: frozen.customer_name,
            address_choice: AddressChoice::Registered,
            registered_address: None,
            alternative_address: Default::default(),
            contact: crate::models::ContactInfo {
                email: frozen.email,
                phone: String::new(),
            },
            total_item_count: frozen.total_item_count,
        };
        Self {
            state: WorkflowState::FinalConfirmed,
            draft,
            policy,
            resolved_address_text: Some(frozen.resolved_address_text),
            normalized_phone: frozen.phone,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// `Draft → AddressCaptured`. Validation order is fixed and
    /// short-circuits on the first failure: address resolution, postal code
    /// format, postal code lookup, email, phone.
    pub async fn confirm_address(
        &mut self,
        zip_lookup: &dyn ZipLookupGateway,
    ) -> Result<(), WorkflowError> {
        self.expect_state(WorkflowState::Draft, "ADDRESS_CAPTURED")?;

        let (resolved, zip) = self.resolve_address()?;

        validate::validate_zip_format(&zip)?;
        match zip_lookup.resolve(&zip).await {
            Ok(Some(city)) if !city.trim().is_empty() => {}
            _ => return Err(ValidationError::UnknownZip(zip).into()),
        }

        validate::validate_email(&self.draft.contact.email)?;
        let phone = validate::normalize_phone(&self.draft.contact.phone, self.policy)?;

        self.resolved_address_text = Some(resolved);
        self.normalized_phone = phone;
        self.state = WorkflowState::AddressCaptured;
        Ok(())
    }

    /// Compose the address text and pick the postal code to validate from
    /// the chosen address.
    fn resolve_address(&self) -> Result<(String, String), ValidationError> {
        match self.draft.address_choice {
            AddressChoice::Registered => {
                let reg = self
                    .draft
                    .registered_address
                    .as_ref()
                    .filter(|a| !a.street.trim().is_empty())
                    .ok_or(ValidationError::MissingRegisteredAddress)?;
                Ok((
                    format!("{}, {} {}", reg.street, reg.zip, reg.city),
                    reg.zip.clone(),
                ))
            }
            AddressChoice::Alternative => {
                let alt = &self.draft.alternative_address;
                if alt.street.trim().is_empty()
                    || alt.zip.trim().is_empty()
                    || alt.city.trim().is_empty()
                {
                    return Err(ValidationError::IncompleteAlternativeAddress);
                }
                Ok((
                    format!("{}, {} {}", alt.street, alt.zip, alt.city),
                    alt.zip.clone(),
                ))
            }
        }
    }

    /// The captured draft, available once the address step has passed.
    pub fn frozen(&self) -> Result<FrozenDraft, WorkflowError> {
        if !matches!(
            self.state,
            WorkflowState::AddressCaptured | WorkflowState::FinalConfirmed
        ) {
            return Err(self.invalid_transition("FROZEN_VIEW"));
        }
        let resolved = self
            .resolved_address_text
            .clone()
            .ok_or_else(|| self.invalid_transition("FROZEN_VIEW"))?;
        Ok(FrozenDraft {
            user_no: self.draft.user_no.clone(),
            customer_name: self.draft.customer_name.clone(),
            resolved_address_text: resolved,
            phone: self.normalized_phone.clone(),
            email: self.draft.contact.email.trim().to_string(),
            total_item_count: self.draft.total_item_count,
        })
    }

    /// `AddressCaptured → FinalConfirmed`. Pure display step, no mutation of
    /// the captured data.
    pub fn confirm_final(&mut self) -> Result<(), WorkflowError> {
        self.expect_state(WorkflowState::AddressCaptured, "FINAL_CONFIRMED")?;
        self.state = WorkflowState::FinalConfirmed;
        Ok(())
    }

    /// Abandon the dialog. Allowed from every pre-submission state.
    pub fn cancel(&mut self) -> Result<(), WorkflowError> {
        match self.state {
            WorkflowState::Draft
            | WorkflowState::AddressCaptured
            | WorkflowState::FinalConfirmed => {
                self.state = WorkflowState::Cancelled;
                Ok(())
            }
            _ => Err(self.invalid_transition("CANCELLED")),
        }
    }

    /// `FinalConfirmed → Submitted`. Splits the composed address back into
    /// its parts and submits the order. On failure the workflow stays in
    /// `FinalConfirmed`; resubmission is permitted.
    pub async fn submit(
        &mut self,
        orders: &dyn OrderGateway,
        basket: &BasketService,
    ) -> Result<OrderReceipt, WorkflowError> {
        self.expect_state(WorkflowState::FinalConfirmed, "SUBMITTED")?;
        let resolved = self
            .resolved_address_text
            .clone()
            .ok_or_else(|| self.invalid_transition("SUBMITTED"))?;

        let (street, zip, city) = split_resolved_address(&resolved);
        let payload = OrderPayload {
            user_no: self.draft.user_no.clone(),
            name: self.draft.customer_name.clone(),
            name2: String::new(),
            street,
            zip,
            city,
            att: String::new(),
            phone: self.normalized_phone.clone().unwrap_or_default(),
            email: self.draft.contact.email.trim().to_string(),
        };

        let receipt = orders.submit(&payload).await?;
        self.state = WorkflowState::Submitted;
        tracing::info!(
            user = %self.draft.user_no,
            order_number = %receipt.order_number,
            "order submitted"
        );

        // One basket refresh after a successful submission; a read failure
        // here does not undo the order.
        if let Err(err) = basket.refresh_snapshot(&self.draft.user_no).await {
            tracing::error!(user = %self.draft.user_no, error = %err, "basket refresh after order submission failed");
        }

        Ok(receipt)
    }

    fn expect_state(&self, expected: WorkflowState, to: &str) -> Result<(), WorkflowError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.invalid_transition(to))
        }
    }

    fn invalid_transition(&self, to: &str) -> WorkflowError {
        WorkflowError::InvalidTransition {
            from: self.state.name().to_string(),
            to: to.to_string(),
        }
    }
}

/// The lossy reconstruction of street / zip / city from the composed text:
/// split on the first comma, then the remainder on the first space. Must not
/// be re-derived from the original fields, which are gone by this point.
fn split_resolved_address(text: &str) -> (String, String, String) {
    let (street, rest) = match text.split_once(',') {
        Some((street, rest)) => (street.trim(), rest.trim()),
        None => (text.trim(), ""),
    };
    let (zip, city) = match rest.split_once(' ') {
        Some((zip, city)) => (zip.trim(), city.trim()),
        None => (rest, ""),
    };
    (street.to_string(), zip.to_string(), city.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Basket is empty")]
    EmptyBasket,

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}
