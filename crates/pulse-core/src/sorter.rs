//! Column sort for the user table.
//!
//! One key at a time: re-sorting the ascending key flips it to descending,
//! anything else starts ascending. Text compares case-insensitively, numbers
//! and booleans natively. Rows missing the column go last in both directions.
//! The sort is stable, so equal rows keep their previous relative order.

use std::cmp::Ordering;

use contracts::{SortDirection, SortState, UserRecord};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl SortValue {
    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(Self::Flag(flag)),
            Value::Number(number) => number.as_f64().map(Self::Number),
            Value::String(text) => Some(Self::Text(text.to_lowercase())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Flag(_) => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Flag(a), Self::Flag(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Direction the next sort on `key` uses given the current state.
pub fn next_direction(current: Option<&SortState>, key: &str) -> SortDirection {
    match current {
        Some(state) if state.key == key && state.direction == SortDirection::Asc => {
            SortDirection::Desc
        }
        _ => SortDirection::Asc,
    }
}

/// Orders two rows for `key`, keeping absent values last for either direction.
pub fn compare_rows(a: &UserRecord, b: &UserRecord, key: &str, direction: SortDirection) -> Ordering {
    let left = a.column(key).and_then(SortValue::from_json);
    let right = b.column(key).and_then(SortValue::from_json);
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => {
            let ordering = left.compare(&right);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

/// Sorts `users` in place and replaces `state` with the new single-key state.
pub fn sort_users(users: &mut [UserRecord], key: &str, state: &mut Option<SortState>) -> SortState {
    let direction = next_direction(state.as_ref(), key);
    users.sort_by(|a, b| compare_rows(a, b, key, direction));

    let next = SortState {
        key: key.to_string(),
        direction,
    };
    *state = Some(next.clone());
    next
}
