use serde_json::Value;

/// Failure of a call against the remote webshop service.
///
/// The service reports failures as OData-style error documents. Callers show
/// the user the most specific message the document carries; `body` keeps the
/// raw response so nothing is lost between the call site and the reporting
/// site.
#[derive(Debug, Clone, thiserror::Error)]
#[error("remote call failed: {}", self.describe())]
pub struct RemoteError {
    pub status: Option<u16>,
    /// Raw response body, when one was received.
    pub body: Option<String>,
    /// Transport-level message, when no body exists.
    pub message: Option<String>,
}

impl RemoteError {
    pub fn from_body(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: Some(body.into()),
            message: None,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: Some(message.into()),
        }
    }

    fn describe(&self) -> String {
        if let Some(msg) = &self.message {
            return msg.clone();
        }
        match self.status {
            Some(status) => format!("status {}", status),
            None => "unknown error".to_string(),
        }
    }

    /// Best-effort extraction of a message fit for the user.
    ///
    /// Parse order is fixed: the nested detail message first, then the
    /// top-level message, then the transport message, then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(body) = &self.body {
            if let Ok(doc) = serde_json::from_str::<Value>(body) {
                if let Some(detail) = doc["error"]["innererror"]["errordetails"][0]["message"]
                    .as_str()
                    .filter(|m| !m.is_empty())
                {
                    return detail.to_string();
                }
                if let Some(top) = doc["error"]["message"]["value"]
                    .as_str()
                    .filter(|m| !m.is_empty())
                {
                    return top.to_string();
                }
            }
        }
        if let Some(msg) = self.message.as_ref().filter(|m| !m.is_empty()) {
            return msg.clone();
        }
        fallback.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_nested_detail_message() {
        let body = r#"{
            "error": {
                "message": { "value": "Request failed" },
                "innererror": {
                    "errordetails": [
                        { "message": "Material 4711 is no longer available" }
                    ]
                }
            }
        }"#;
        let err = RemoteError::from_body(400, body);
        assert_eq!(
            err.user_message("fallback"),
            "Material 4711 is no longer available"
        );
    }

    #[test]
    fn falls_back_to_top_level_message() {
        let body = r#"{ "error": { "message": { "value": "Basket is locked" } } }"#;
        let err = RemoteError::from_body(409, body);
        assert_eq!(err.user_message("fallback"), "Basket is locked");
    }

    #[test]
    fn unparseable_body_uses_fallback() {
        let err = RemoteError::from_body(500, "<html>gateway timeout</html>");
        assert_eq!(err.user_message("Please try again"), "Please try again");
    }

    #[test]
    fn transport_message_beats_fallback() {
        let err = RemoteError::transport("connection reset");
        assert_eq!(err.user_message("fallback"), "connection reset");
    }

    #[test]
    fn empty_detail_array_is_skipped() {
        let body = r#"{
            "error": {
                "message": { "value": "Top level" },
                "innererror": { "errordetails": [] }
            }
        }"#;
        let err = RemoteError::from_body(400, body);
        assert_eq!(err.user_message("fallback"), "Top level");
    }
}
