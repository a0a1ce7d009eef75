use async_trait::async_trait;
use rekvi_core::remote::RemoteError;
use rekvi_core::user::RegisteredAddress;
use rekvi_shared::UserNo;
use serde::{Deserialize, Serialize};

/// Which delivery address the order goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressChoice {
    Registered,
    Alternative,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlternativeAddress {
    pub street: String,
    pub zip: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
}

/// The in-progress order capture. Owned exclusively by the workflow for the
/// duration of the dialog sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub user_no: UserNo,
    pub customer_name: String,
    pub address_choice: AddressChoice,
    pub registered_address: Option<RegisteredAddress>,
    pub alternative_address: AlternativeAddress,
    pub contact: ContactInfo,
    pub total_item_count: i64,
}

/// The order-creation payload as the remote order service expects it. Field
/// set is a fixed contract; the unused name/att slots stay empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPayload {
    pub user_no: UserNo,
    pub name: String,
    pub name2: String,
    pub street: String,
    pub zip: String,
    pub city: String,
    pub att: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_number: String,
}

/// The remote order-submission collaborator.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn submit(&self, payload: &OrderPayload) -> Result<OrderReceipt, RemoteError>;
}

/// Postal-code lookup. `Ok(None)` means the code does not exist; callers
/// treat an `Err` the same way.
#[async_trait]
pub trait ZipLookupGateway: Send + Sync {
    async fn resolve(&self, zip: &str) -> Result<Option<String>, RemoteError>;
}
