//! Canonical participant pair.

use serde::{Deserialize, Serialize};

use pinpost_core::types::id::UserId;

/// Two distinct participants stored in ascending order.
///
/// The ordering makes `(a, b)` and `(b, a)` the same lookup key, which is
/// what keeps at most one conversation per pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantPair([UserId; 2]);

impl ParticipantPair {
    /// Canonicalize two user ids. Returns `None` when both are the same user.
    pub fn new(a: UserId, b: UserId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self([a, b])),
            std::cmp::Ordering::Greater => Some(Self([b, a])),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The lower id.
    pub fn first(&self) -> UserId {
        self.0[0]
    }

    /// The higher id.
    pub fn second(&self) -> UserId {
        self.0[1]
    }

    /// Whether `user_id` is one of the two participants.
    pub fn contains(&self, user_id: UserId) -> bool {
        self.0.contains(&user_id)
    }

    /// The participant that is not `user_id`, if `user_id` is in the pair.
    pub fn other(&self, user_id: UserId) -> Option<UserId> {
        if self.0[0] == user_id {
            Some(self.0[1])
        } else if self.0[1] == user_id {
            Some(self.0[0])
        } else {
            None
        }
    }

    /// Both ids in canonical order.
    pub fn as_array(&self) -> [UserId; 2] {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_independent() {
        let a = UserId::new();
        let b = UserId::new();
        assert_eq!(ParticipantPair::new(a, b), ParticipantPair::new(b, a));
    }

    #[test]
    fn test_rejects_same_user() {
        let a = UserId::new();
        assert!(ParticipantPair::new(a, a).is_none());
    }

    #[test]
    fn test_other() {
        let a = UserId::new();
        let b = UserId::new();
        let pair = ParticipantPair::new(a, b).expect("distinct users");
        assert_eq!(pair.other(a), Some(b));
        assert_eq!(pair.other(b), Some(a));
        assert_eq!(pair.other(UserId::new()), None);
    }
}
