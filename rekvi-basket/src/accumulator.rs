use crate::models::{BasketGateway, BasketLine, BasketWrite};
use rekvi_core::remote::RemoteError;
use rekvi_shared::{MaterialId, UserNo};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Translates basket intents into signed delta writes and keeps a per-user
/// snapshot of the remote basket.
///
/// There are no optimistic updates: a snapshot only changes after a
/// successful read from the remote, and it is always replaced wholesale so
/// readers never observe a half-applied refresh.
pub struct BasketService {
    gateway: Arc<dyn BasketGateway>,
    snapshots: RwLock<HashMap<UserNo, Arc<Vec<BasketLine>>>>,
}

impl BasketService {
    pub fn new(gateway: Arc<dyn BasketGateway>) -> Self {
        Self {
            gateway,
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    /// Add one unit multiple of a material to the basket.
    pub async fn add_line(
        &self,
        user: &UserNo,
        material_id: MaterialId,
        unit_multiple: i64,
    ) -> Result<(), BasketError> {
        if unit_multiple <= 0 {
            return Err(BasketError::InvalidUnitMultiple(unit_multiple));
        }
        self.submit_delta(user, material_id, unit_multiple).await
    }

    /// Remove one unit multiple from the basket.
    ///
    /// No floor check happens here: whether the resulting quantity is valid
    /// is the remote's call, not ours.
    pub async fn decrease_line(
        &self,
        user: &UserNo,
        material_id: MaterialId,
        unit_multiple: i64,
    ) -> Result<(), BasketError> {
        if unit_multiple <= 0 {
            return Err(BasketError::InvalidUnitMultiple(unit_multiple));
        }
        self.submit_delta(user, material_id, -unit_multiple).await
    }

    /// Remove a line entirely by negating its current quantity.
    ///
    /// `current_quantity` is the raw quantity text from the snapshot; if it
    /// does not parse to a positive integer nothing is submitted.
    pub async fn remove_line(
        &self,
        user: &UserNo,
        material_id: MaterialId,
        current_quantity: &str,
    ) -> Result<(), BasketError> {
        let quantity: i64 = current_quantity
            .trim()
            .parse()
            .map_err(|_| BasketError::EmptyBasket)?;
        if quantity <= 0 {
            return Err(BasketError::EmptyBasket);
        }
        self.submit_delta(user, material_id, -quantity).await
    }

    /// Submit one delta write, then refresh the snapshot. A write failure
    /// leaves the snapshot untouched.
    async fn submit_delta(
        &self,
        user: &UserNo,
        material_id: MaterialId,
        quantity_delta: i64,
    ) -> Result<(), BasketError> {
        let write = BasketWrite {
            user_no: user.clone(),
            material_id,
            quantity_delta,
        };
        self.gateway.create(&write).await?;
        tracing::debug!(user = %user, material = %material_id, delta = quantity_delta, "basket delta applied");
        self.refresh_snapshot(user).await?;
        Ok(())
    }

    /// Re-read all basket lines for the user and replace the local snapshot
    /// in one step.
    pub async fn refresh_snapshot(&self, user: &UserNo) -> Result<(), BasketError> {
        let lines = self.gateway.query(user).await?;
        let mut snapshots = self.snapshots.write().await;
        snapshots.insert(user.clone(), Arc::new(lines));
        Ok(())
    }

    /// The last successfully refreshed snapshot; empty if never refreshed.
    pub async fn snapshot(&self, user: &UserNo) -> Arc<Vec<BasketLine>> {
        let snapshots = self.snapshots.read().await;
        snapshots.get(user).cloned().unwrap_or_default()
    }

    /// Total number of items (summed quantities) in the snapshot.
    pub async fn total_quantity(&self, user: &UserNo) -> i64 {
        self.snapshot(user).await.iter().map(|l| l.quantity).sum()
    }

    pub(crate) fn gateway(&self) -> &Arc<dyn BasketGateway> {
        &self.gateway
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BasketError {
    #[error("Unit multiple must be positive, got {0}")]
    InvalidUnitMultiple(i64),

    #[error("Basket is empty")]
    EmptyBasket,

    #[error("No items to copy")]
    NothingToCopy,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records writes and serves canned lines; materials in `rejected` fail
    /// with an OData-style error document.
    pub struct RecordingGateway {
        pub writes: Mutex<Vec<BasketWrite>>,
        pub queries: Mutex<u32>,
        pub lines: Mutex<Vec<BasketLine>>,
        pub rejected: Mutex<Vec<MaterialId>>,
    }

    impl RecordingGateway {
        pub fn new() -> Self {
            Self {
                writes: Mutex::new(Vec::new()),
                queries: Mutex::new(0),
                lines: Mutex::new(Vec::new()),
                rejected: Mutex::new(Vec::new()),
            }
        }

        pub fn reject(&self, id: MaterialId) {
            self.rejected.lock().unwrap().push(id);
        }

        pub fn write_count(&self) -> usize {
            self.writes.lock().unwrap().len()
        }

        pub fn query_count(&self) -> u32 {
            *self.queries.lock().unwrap()
        }

        pub fn delta_sum(&self) -> i64 {
            self.writes
                .lock()
                .unwrap()
                .iter()
                .map(|w| w.quantity_delta)
                .sum()
        }
    }

    #[async_trait]
    impl BasketGateway for RecordingGateway {
        async fn create(&self, write: &BasketWrite) -> Result<(), RemoteError> {
            if self.rejected.lock().unwrap().contains(&write.material_id) {
                return Err(RemoteError::from_body(
                    400,
                    r#"{"error":{"innererror":{"errordetails":[{"message":"Material is no longer available"}]}}}"#,
                ));
            }
            self.writes.lock().unwrap().push(write.clone());
            Ok(())
        }

        async fn query(&self, _user: &UserNo) -> Result<Vec<BasketLine>, RemoteError> {
            *self.queries.lock().unwrap() += 1;
            Ok(self.lines.lock().unwrap().clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingGateway;
    use super::*;

    fn service() -> (Arc<RecordingGateway>, BasketService) {
        let gateway = Arc::new(RecordingGateway::new());
        let service = BasketService::new(gateway.clone());
        (gateway, service)
    }

    #[tokio::test]
    async fn add_then_decrease_nets_to_zero() {
        let (gateway, service) = service();
        let user = UserNo::from("0000123");
        let material = MaterialId::new();

        service.add_line(&user, material, 10).await.unwrap();
        service.decrease_line(&user, material, 10).await.unwrap();

        assert_eq!(gateway.write_count(), 2);
        assert_eq!(gateway.delta_sum(), 0);
    }

    #[tokio::test]
    async fn non_positive_unit_multiple_is_rejected() {
        let (gateway, service) = service();
        let user = UserNo::from("0000123");
        let material = MaterialId::new();

        let err = service.add_line(&user, material, 0).await.unwrap_err();
        assert!(matches!(err, BasketError::InvalidUnitMultiple(0)));

        let err = service.decrease_line(&user, material, -5).await.unwrap_err();
        assert!(matches!(err, BasketError::InvalidUnitMultiple(-5)));

        assert_eq!(gateway.write_count(), 0);
    }

    #[tokio::test]
    async fn remove_rejects_non_positive_and_non_numeric_quantities() {
        let (gateway, service) = service();
        let user = UserNo::from("0000123");
        let material = MaterialId::new();

        for raw in ["0", "-3", "abc", ""] {
            let err = service.remove_line(&user, material, raw).await.unwrap_err();
            assert!(matches!(err, BasketError::EmptyBasket), "input {:?}", raw);
        }
        assert_eq!(gateway.write_count(), 0);
        assert_eq!(gateway.query_count(), 0);
    }

    #[tokio::test]
    async fn remove_negates_the_full_current_quantity() {
        let (gateway, service) = service();
        let user = UserNo::from("0000123");
        let material = MaterialId::new();

        service.remove_line(&user, material, "5").await.unwrap();

        let writes = gateway.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].quantity_delta, -5);
    }

    #[tokio::test]
    async fn failed_write_leaves_snapshot_untouched() {
        let (gateway, service) = service();
        let user = UserNo::from("0000123");
        let material = MaterialId::new();

        *gateway.lines.lock().unwrap() = vec![BasketLine {
            user_no: user.clone(),
            material_id: material,
            quantity: 10,
            unit_multiple: 10,
            display_name: "Gloves".to_string(),
        }];
        service.refresh_snapshot(&user).await.unwrap();

        gateway.reject(material);
        let err = service.add_line(&user, material, 10).await.unwrap_err();
        let BasketError::Remote(remote) = err else {
            panic!("expected remote error");
        };
        assert_eq!(
            remote.user_message("fallback"),
            "Material is no longer available"
        );

        let snapshot = service.snapshot(&user).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].quantity, 10);
    }

    #[tokio::test]
    async fn refresh_replaces_snapshot_wholesale() {
        let (gateway, service) = service();
        let user = UserNo::from("0000123");

        *gateway.lines.lock().unwrap() = vec![BasketLine {
            user_no: user.clone(),
            material_id: MaterialId::new(),
            quantity: 20,
            unit_multiple: 10,
            display_name: "Gloves".to_string(),
        }];
        service.refresh_snapshot(&user).await.unwrap();
        assert_eq!(service.total_quantity(&user).await, 20);

        *gateway.lines.lock().unwrap() = Vec::new();
        service.refresh_snapshot(&user).await.unwrap();
        assert!(service.snapshot(&user).await.is_empty());
    }
}
