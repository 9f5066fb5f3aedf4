use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::CatalogError;

/// A numeric capacity granted by a plan.
///
/// Source data encodes limits as a number, the string `"unlimited"`, or
/// `null`/absent. [`Limit::from_raw`] folds all of those into this one type so
/// nothing downstream inspects the raw encoding.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Limit {
    Bounded(u64),
    Unlimited,
    Disabled,
}

impl Limit {
    /// Normalize a raw catalog value. `None` means the key was absent.
    ///
    /// Absent and `null` both mean the capacity is not granted.
    pub fn from_raw(name: &str, raw: Option<&Value>) -> Result<Self, CatalogError> {
        match raw {
            None | Some(Value::Null) => Ok(Limit::Disabled),
            Some(Value::Number(n)) => n.as_u64().map(Limit::Bounded).ok_or_else(|| {
                CatalogError::InvalidLimit {
                    name: name.to_string(),
                    raw: n.to_string(),
                }
            }),
            Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("unlimited") => {
                Ok(Limit::Unlimited)
            }
            Some(other) => Err(CatalogError::InvalidLimit {
                name: name.to_string(),
                raw: other.to_string(),
            }),
        }
    }

    /// Admission of one more unit on top of `current_usage`.
    pub fn check(self, current_usage: u64) -> LimitCheck {
        match self {
            Limit::Bounded(n) => LimitCheck {
                allowed: current_usage < n,
                remaining: Limit::Bounded(n.saturating_sub(current_usage)),
            },
            Limit::Unlimited => LimitCheck {
                allowed: true,
                remaining: Limit::Unlimited,
            },
            Limit::Disabled => LimitCheck {
                allowed: false,
                remaining: Limit::Disabled,
            },
        }
    }
}

impl core::fmt::Display for Limit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Limit::Bounded(n) => write!(f, "{n}"),
            Limit::Unlimited => f.write_str("unlimited"),
            Limit::Disabled => f.write_str("disabled"),
        }
    }
}

/// Outcome of [`Limit::check`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct LimitCheck {
    pub allowed: bool,
    pub remaining: Limit,
}
