//! Order status state machine.
//!
//! Orders start in [`OrderStatus::New`]. Allowed moves:
//!
//! | From | To |
//! |---|---|
//! | `new` | `in-process`, `canceled` |
//! | `in-process` | `finished` |
//! | `finished` | none |
//! | `canceled` | none |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Freshly created, not yet picked up.
    New,
    /// Being prepared or delivered.
    InProcess,
    /// Delivered. Terminal.
    Finished,
    /// Abandoned before processing. Terminal.
    Canceled,
}

/// A status change the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid status transition from '{from}' to '{to}'")]
pub struct InvalidTransition {
    /// Status the order was in.
    pub from: OrderStatus,
    /// Status that was requested.
    pub to: OrderStatus,
}

/// A stored status outside the known enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported order status: '{value}'")]
pub struct UnsupportedOrderStatus {
    /// Raw stored value.
    pub value: String,
}

impl OrderStatus {
    /// Every known status.
    pub const ALL: [Self; 4] = [Self::New, Self::InProcess, Self::Finished, Self::Canceled];

    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProcess => "in-process",
            Self::Finished => "finished",
            Self::Canceled => "canceled",
        }
    }

    /// Statuses reachable from `self` in one step.
    #[must_use]
    pub const fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::New => &[Self::InProcess, Self::Canceled],
            Self::InProcess => &[Self::Finished],
            Self::Finished | Self::Canceled => &[],
        }
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }

    /// Whether `target` is reachable from `self` in one step.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// Validate a move to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] carrying the rejected pair.
    ///
    /// # Examples
    /// ```
    /// use market_backend::domain::OrderStatus;
    ///
    /// assert_eq!(
    ///     OrderStatus::New.transition_to(OrderStatus::Canceled),
    ///     Ok(OrderStatus::Canceled)
    /// );
    /// assert!(OrderStatus::New.transition_to(OrderStatus::Finished).is_err());
    /// ```
    pub fn transition_to(self, target: Self) -> Result<Self, InvalidTransition> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(InvalidTransition {
                from: self,
                to: target,
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnsupportedOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnsupportedOrderStatus {
                value: s.to_owned(),
            })
    }
}
