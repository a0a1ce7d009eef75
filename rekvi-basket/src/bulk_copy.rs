use crate::accumulator::{BasketError, BasketService};
use crate::models::BasketWrite;
use rekvi_shared::{MaterialId, UserNo};
use serde::{Deserialize, Serialize};

/// One historical order line to be copied back into the basket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyLine {
    pub material_id: MaterialId,
    /// The originally ordered quantity, submitted unchanged as the delta.
    pub quantity: i64,
    pub display_name: String,
}

/// Consolidated outcome of one bulk copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCopyResult {
    pub succeeded: usize,
    /// Display names of the lines that failed, in input order.
    pub failed_items: Vec<String>,
}

impl BulkCopyResult {
    /// Warning enumerating every failed line by name, or `None` when all
    /// lines went through.
    pub fn failure_message(&self) -> Option<String> {
        if self.failed_items.is_empty() {
            return None;
        }
        Some(format!(
            "{} item(s) could not be added to the basket because they are no longer available:\n{}",
            self.failed_items.len(),
            self.failed_items.join(",\n")
        ))
    }

    /// Count-only confirmation, or `None` when nothing succeeded.
    pub fn success_message(&self) -> Option<String> {
        if self.succeeded == 0 {
            return None;
        }
        Some(format!(
            "{} item(s) from the order were added to the basket.",
            self.succeeded
        ))
    }
}

impl BasketService {
    /// Copy the lines of a historical order into the basket.
    ///
    /// Lines are submitted strictly one after the other so a failure is
    /// attributed to exactly one display name and the snapshot only needs a
    /// single refresh at the end. A failed line never aborts the batch.
    pub async fn copy_lines(
        &self,
        user: &UserNo,
        lines: &[CopyLine],
    ) -> Result<BulkCopyResult, BasketError> {
        if lines.is_empty() {
            return Err(BasketError::NothingToCopy);
        }

        let mut result = BulkCopyResult {
            succeeded: 0,
            failed_items: Vec::new(),
        };

        for line in lines {
            let write = BasketWrite {
                user_no: user.clone(),
                material_id: line.material_id,
                quantity_delta: line.quantity,
            };
            match self.gateway().create(&write).await {
                Ok(()) => result.succeeded += 1,
                Err(err) => {
                    tracing::warn!(
                        user = %user,
                        item = %line.display_name,
                        error = %err,
                        "bulk copy line rejected"
                    );
                    result.failed_items.push(line.display_name.clone());
                }
            }
        }

        // One trailing refresh; a read failure here does not invalidate the
        // copy outcome, the snapshot just stays at its previous state.
        if let Err(err) = self.refresh_snapshot(user).await {
            tracing::error!(user = %user, error = %err, "basket refresh after bulk copy failed");
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::test_support::RecordingGateway;
    use std::sync::Arc;

    fn line(name: &str, quantity: i64) -> CopyLine {
        CopyLine {
            material_id: MaterialId::new(),
            quantity,
            display_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn empty_input_performs_no_submissions_and_no_refresh() {
        let gateway = Arc::new(RecordingGateway::new());
        let service = BasketService::new(gateway.clone());
        let user = UserNo::from("0000123");

        let err = service.copy_lines(&user, &[]).await.unwrap_err();
        assert!(matches!(err, BasketError::NothingToCopy));
        assert_eq!(gateway.write_count(), 0);
        assert_eq!(gateway.query_count(), 0);
    }

    #[tokio::test]
    async fn partial_failure_preserves_input_order_of_failures() {
        let gateway = Arc::new(RecordingGateway::new());
        let service = BasketService::new(gateway.clone());
        let user = UserNo::from("0000123");

        let lines = vec![
            line("Gloves", 10),
            line("Syringes", 5),
            line("Bandages", 20),
            line("Swabs", 50),
        ];
        gateway.reject(lines[1].material_id);
        gateway.reject(lines[3].material_id);

        let result = service.copy_lines(&user, &lines).await.unwrap();

        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed_items, vec!["Syringes", "Swabs"]);
        assert_eq!(result.succeeded + result.failed_items.len(), lines.len());
        // One trailing refresh, no matter how many lines.
        assert_eq!(gateway.query_count(), 1);
    }

    #[tokio::test]
    async fn all_lines_succeed() {
        let gateway = Arc::new(RecordingGateway::new());
        let service = BasketService::new(gateway.clone());
        let user = UserNo::from("0000123");

        let lines = vec![line("Gloves", 10), line("Swabs", 50)];
        let result = service.copy_lines(&user, &lines).await.unwrap();

        assert_eq!(result.succeeded, 2);
        assert!(result.failed_items.is_empty());
        assert_eq!(gateway.write_count(), 2);
    }

    #[test]
    fn messages_enumerate_failures_and_count_successes() {
        let result = BulkCopyResult {
            succeeded: 3,
            failed_items: vec!["Gloves".to_string(), "Swabs".to_string()],
        };

        let failure = result.failure_message().unwrap();
        assert!(failure.contains("Gloves"));
        assert!(failure.contains("Swabs"));
        assert!(failure.contains("2 item(s)"));

        let success = result.success_message().unwrap();
        assert!(success.contains("3 item(s)"));

        let clean = BulkCopyResult {
            succeeded: 0,
            failed_items: Vec::new(),
        };
        assert!(clean.failure_message().is_none());
        assert!(clean.success_message().is_none());
    }
}
