use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rekvi_core::remote::RemoteError;
use rekvi_shared::{MaterialId, UserNo};
use serde::{Deserialize, Serialize};

/// Header status value the backend uses for shipped (closed) orders.
const STATUS_SHIPPED: &str = "SHIP";

/// A previously placed order with its nested line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_number: String,
    pub user_no: UserNo,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderLine>,
}

impl OrderRecord {
    /// Shipped orders are closed; the overview hides them by default.
    pub fn is_closed(&self) -> bool {
        self.status == STATUS_SHIPPED
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub material_id: MaterialId,
    pub material_no: String,
    pub display_name: String,
    pub quantity: i64,
    pub track_traces: Vec<TrackTrace>,
}

/// Carrier tracking link attached to an order line once it ships.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackTrace {
    pub url: String,
    pub status_text: String,
    pub quantity: String,
    pub created_date: String,
}

#[async_trait]
pub trait OrderHistoryGateway: Send + Sync {
    async fn query(&self, user: &UserNo) -> Result<Vec<OrderRecord>, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_orders_are_closed() {
        let order = OrderRecord {
            order_number: "5000001".to_string(),
            user_no: UserNo::from("0000123"),
            status: "SHIP".to_string(),
            created_at: Utc::now(),
            items: Vec::new(),
        };
        assert!(order.is_closed());

        let open = OrderRecord {
            status: "CONF".to_string(),
            ..order
        };
        assert!(!open.is_closed());
    }
}
