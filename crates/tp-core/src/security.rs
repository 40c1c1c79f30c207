use crate::domain::MemberId;

// ============== Authorization ==============

/// The relay has exactly one admin, injected via config and compared per request.
pub fn is_admin(actor: MemberId, admin_id: MemberId) -> bool {
    actor == admin_id
}

/// The admin may not remove their own directory entry.
pub fn can_delete(actor: MemberId, target: MemberId, admin_id: MemberId) -> bool {
    is_admin(actor, admin_id) && target != admin_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_configured_admin_is_admin() {
        let admin = MemberId(42);
        assert!(is_admin(MemberId(42), admin));
        assert!(!is_admin(MemberId(43), admin));
    }

    #[test]
    fn admin_cannot_delete_self() {
        let admin = MemberId(42);
        assert!(can_delete(admin, MemberId(7), admin));
        assert!(!can_delete(admin, admin, admin));
        assert!(!can_delete(MemberId(7), MemberId(8), admin));
    }
}
