//! Request-scoped session state.
//!
//! The workflow never owns its state: every handler borrows a
//! [`SessionStore`] for the duration of one request. Values are
//! JSON-representable so any backing store (cookie, cache, database) can
//! hold them; [`MemorySession`] is the in-process implementation.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Session keys used by the workflow.
pub mod keys {
    pub const INPUT_METHOD: &str = "input_method";
    pub const FAILURES: &str = "failures";
    pub const CENSORED: &str = "censored";
    pub const RESULTS_MLE: &str = "results_mle";
    pub const RESULTS_RR: &str = "results_rr";
    pub const CHOSEN_METHOD: &str = "chosen_method";
    pub const RELIABILITY_LEVEL: &str = "reliability_level";
    /// Transient, consumed by the entry stage.
    pub const PRE_FILLED_FAILURES: &str = "pre_filled_failures";
    /// Transient, consumed by the entry stage.
    pub const ORIGINAL_DATETIMES: &str = "original_datetimes";
    pub const STAGE: &str = "stage";
    /// Stages already visited, for back navigation.
    pub const REACHED: &str = "reached";
}

/// Key/value session storage.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<&Value>;

    fn set(&mut self, key: &str, value: Value);

    fn remove(&mut self, key: &str);

    /// Reads and clears `key`.
    fn take(&mut self, key: &str) -> Option<Value>;

    fn clear(&mut self);

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Deserializes the value at `key`.
    ///
    /// A missing key is `Ok(None)`; a value of the wrong shape is an
    /// [`AnalysisError::Session`](crate::error::AnalysisError::Session).
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key) {
            Some(v) => Ok(Some(T::deserialize(v)?)),
            None => Ok(None),
        }
    }

    fn set_as<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let v = serde_json::to_value(value)?;
        self.set(key, v);
        Ok(())
    }

    fn take_as<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.take(key) {
            Some(v) => Ok(Some(serde_json::from_value(v)?)),
            None => Ok(None),
        }
    }
}

/// In-memory session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySession {
    values: HashMap<String, Value>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn take(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::InputMethod;
    use crate::error::AnalysisError;
    use serde_json::json;

    #[test]
    fn test_basic_operations() {
        let mut s = MemorySession::new();
        assert!(s.is_empty());
        s.set(keys::FAILURES, json!([100.0, 200.0]));
        assert!(s.contains(keys::FAILURES));
        assert_eq!(s.get(keys::FAILURES), Some(&json!([100.0, 200.0])));

        s.remove(keys::FAILURES);
        assert!(!s.contains(keys::FAILURES));

        s.set("a", json!(1));
        s.set("b", json!(2));
        assert_eq!(s.len(), 2);
        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn test_take_reads_once() {
        let mut s = MemorySession::new();
        s.set(keys::PRE_FILLED_FAILURES, json!([500.0]));
        assert_eq!(s.take(keys::PRE_FILLED_FAILURES), Some(json!([500.0])));
        assert_eq!(s.take(keys::PRE_FILLED_FAILURES), None);
    }

    #[test]
    fn test_typed_helpers() {
        let mut s = MemorySession::new();
        s.set_as(keys::INPUT_METHOD, &InputMethod::Censored).expect("serialize");
        assert_eq!(s.get(keys::INPUT_METHOD), Some(&json!("censored")));
        let m: Option<InputMethod> = s.get_as(keys::INPUT_METHOD).expect("deserialize");
        assert_eq!(m, Some(InputMethod::Censored));

        let missing: Option<Vec<f64>> = s.take_as(keys::CENSORED).expect("missing is fine");
        assert!(missing.is_none());
    }

    #[test]
    fn test_wrong_shape_is_session_error() {
        let mut s = MemorySession::new();
        s.set(keys::FAILURES, json!("not a list"));
        let err = s.get_as::<Vec<f64>>(keys::FAILURES).expect_err("wrong shape");
        assert!(matches!(err, AnalysisError::Session(_)));
    }
}
