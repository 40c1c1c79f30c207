//! Callback payloads attached to inline buttons.
//!
//! Wire form is `verb:id`. Telegram caps callback data at
//! [`CALLBACK_DATA_MAX_BYTES`], so tokens carry ids only; a proposed name for
//! `approveName` is held by the service until the admin decides. Parsing is
//! exact; anything unexpected yields `None`.

use std::fmt;

use crate::domain::{MemberId, MessageId};

/// Telegram's limit on `callback_data`, in bytes.
pub const CALLBACK_DATA_MAX_BYTES: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionToken {
    Approve(MemberId),
    Reject(MemberId),
    ApproveName(MemberId),
    RejectName(MemberId),
    Select(MemberId),
    Reply(MessageId),
    Delete(MemberId),
}

impl ActionToken {
    pub fn encode(&self) -> String {
        match self {
            ActionToken::Approve(id) => format!("approve:{id}"),
            ActionToken::Reject(id) => format!("reject:{id}"),
            ActionToken::ApproveName(id) => format!("approveName:{id}"),
            ActionToken::RejectName(id) => format!("rejectName:{id}"),
            ActionToken::Select(id) => format!("select:{id}"),
            ActionToken::Reply(id) => format!("reply:{id}"),
            ActionToken::Delete(id) => format!("delete:{id}"),
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        fn member(s: &str) -> Option<MemberId> {
            s.parse::<i64>().ok().map(MemberId)
        }

        let parts: Vec<&str> = data.split(':').collect();

        match parts.as_slice() {
            ["approve", id] => member(id).map(ActionToken::Approve),
            ["reject", id] => member(id).map(ActionToken::Reject),
            ["approveName", id] => member(id).map(ActionToken::ApproveName),
            ["rejectName", id] => member(id).map(ActionToken::RejectName),
            ["select", id] => member(id).map(ActionToken::Select),
            ["delete", id] => member(id).map(ActionToken::Delete),
            ["reply", id] => id.parse::<i64>().ok().map(|n| ActionToken::Reply(MessageId(n))),
            _ => None,
        }
    }

    /// Whether only the configured admin may press this button.
    pub fn is_admin_only(&self) -> bool {
        !matches!(self, ActionToken::Select(_) | ActionToken::Reply(_))
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_simple_tokens() {
        assert_eq!(
            ActionToken::parse("approve:1125355606"),
            Some(ActionToken::Approve(MemberId(1125355606)))
        );
        assert_eq!(
            ActionToken::parse("reply:17"),
            Some(ActionToken::Reply(MessageId(17)))
        );
        assert_eq!(
            ActionToken::parse("delete:5"),
            Some(ActionToken::Delete(MemberId(5)))
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        for bad in [
            "",
            "approve",
            "approve:",
            "approve:abc",
            "approve:1:2",
            "unknown:1",
            "approveName:1:Ivan:Kovalenko",
            "approveName:x",
            "askuser:x:0",
        ] {
            assert_eq!(ActionToken::parse(bad), None, "{bad:?} should not parse");
        }
    }

    #[test]
    fn every_token_fits_telegram_callback_limit() {
        let id = MemberId(i64::MIN);
        for t in [
            ActionToken::Approve(id),
            ActionToken::Reject(id),
            ActionToken::ApproveName(id),
            ActionToken::RejectName(id),
            ActionToken::Select(id),
            ActionToken::Delete(id),
            ActionToken::Reply(MessageId(i64::MIN)),
        ] {
            assert!(t.encode().len() <= CALLBACK_DATA_MAX_BYTES, "{t} too long");
        }
    }

    #[test]
    fn admin_only_verbs() {
        assert!(ActionToken::Approve(MemberId(1)).is_admin_only());
        assert!(ActionToken::Delete(MemberId(1)).is_admin_only());
        assert!(ActionToken::RejectName(MemberId(1)).is_admin_only());
        assert!(ActionToken::ApproveName(MemberId(1)).is_admin_only());
        assert!(!ActionToken::Select(MemberId(1)).is_admin_only());
        assert!(!ActionToken::Reply(MessageId(1)).is_admin_only());
    }

    proptest! {
        #[test]
        fn member_tokens_roundtrip(id in any::<i64>()) {
            for t in [
                ActionToken::Approve(MemberId(id)),
                ActionToken::ApproveName(MemberId(id)),
                ActionToken::Delete(MemberId(id)),
            ] {
                prop_assert_eq!(ActionToken::parse(&t.encode()), Some(t));
            }
        }
    }
}
