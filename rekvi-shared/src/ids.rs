use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Webshop user number as issued by the backend ("0000123" style, zero
/// padding preserved).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserNo(pub String);

impl UserNo {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserNo {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserNo {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Opaque material key owned by the remote catalog. The backend hands these
/// out as GUIDs; we never derive or interpret them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub Uuid);

impl MaterialId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MaterialId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_no_keeps_zero_padding() {
        let user = UserNo::from("0000123");
        assert_eq!(user.to_string(), "0000123");

        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, "\"0000123\"");
    }
}
