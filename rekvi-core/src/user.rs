use crate::remote::RemoteError;
use async_trait::async_trait;
use rekvi_shared::pii::Masked;
use rekvi_shared::UserNo;
use serde::{Deserialize, Serialize};

/// Address the user is registered under at the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredAddress {
    pub street: String,
    pub house_no: String,
    pub zip: String,
    pub city: String,
}

/// Delivery address defaults the user has saved for alternative delivery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryDefaults {
    pub street: String,
    pub zip: String,
    pub city: String,
}

/// The registered user record as served by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_no: UserNo,
    pub name: String,
    pub department: String,
    pub registered: RegisteredAddress,
    pub delivery_defaults: DeliveryDefaults,
    pub phone: Masked<String>,
    pub email: Masked<String>,
}

/// Contact fields the user may change from the profile screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub delivery_street: String,
    pub delivery_zip: String,
    pub delivery_city: String,
    pub phone: Masked<String>,
    pub email: Masked<String>,
}

#[async_trait]
pub trait UserGateway: Send + Sync {
    async fn fetch(&self, user: &UserNo) -> Result<UserProfile, RemoteError>;

    async fn update_contact(
        &self,
        user: &UserNo,
        update: &ContactUpdate,
    ) -> Result<(), RemoteError>;
}
