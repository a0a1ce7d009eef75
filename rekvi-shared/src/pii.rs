use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps contact details (phone, email) so that `Debug`/`Display` output from
/// log macros never leaks the value. Serialization passes the inner value
/// through untouched: API responses need the real data, logs do not.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Masked<T>(pub T);

impl<T> Masked<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn inner(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("«masked»")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("«masked»")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_masked() {
        let phone = Masked::new("12345678".to_string());
        assert_eq!(format!("{:?}", phone), "«masked»");
        assert_eq!(phone.inner(), "12345678");
    }

    #[test]
    fn serialization_passes_through() {
        let email = Masked::new("a@b.dk".to_string());
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"a@b.dk\"");
    }
}
