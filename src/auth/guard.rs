use uuid::Uuid;

use super::flags::PermissionFlag;
use super::token::TokenClaims;

/// Why a permission check denied an authenticated caller. Both map to HTTP
/// 403 at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DenyReason {
    #[error("Insufficient permission")]
    InsufficientPermission,
    #[error("Not resource owner or administrator")]
    NotOwnerOrAdmin,
}

/// Outcome of evaluating a permission check against validated claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Convert to a `Result` so handlers can bail with `?`.
    pub fn require(self) -> Result<(), DenyReason> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason),
        }
    }
}

/// One declarative authorization requirement. Routes list their guards in
/// evaluation order; the list itself is the route's policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Caller must hold every one of these flags.
    Flags(PermissionFlag),
    /// Caller must be this user, or hold `ADMIN`.
    SameIdentityOrAdmin(Uuid),
}

/// Evaluates authorization checks against validated claims.
///
/// Pure and stateless: decisions depend only on the claims and the check,
/// never on clocks or storage, so repeated evaluation always agrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionEvaluator;

impl PermissionEvaluator {
    /// Allow only when the caller's mask contains every required bit.
    pub fn require_flags(&self, claims: &TokenClaims, required: PermissionFlag) -> Decision {
        if claims.flags().contains(required) {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::InsufficientPermission)
        }
    }

    /// Allow the subject itself, or any caller holding `ADMIN`.
    pub fn require_same_identity_or_admin(&self, claims: &TokenClaims, target: Uuid) -> Decision {
        if claims.sub == target || claims.flags().contains(PermissionFlag::ADMIN) {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::NotOwnerOrAdmin)
        }
    }

    /// Run guards left to right, stopping at the first denial. An empty
    /// list allows.
    pub fn evaluate(&self, claims: &TokenClaims, guards: &[Guard]) -> Decision {
        for guard in guards {
            let decision = match *guard {
                Guard::Flags(required) => self.require_flags(claims, required),
                Guard::SameIdentityOrAdmin(target) => {
                    self.require_same_identity_or_admin(claims, target)
                }
            };
            if let Decision::Deny(reason) = decision {
                return Decision::Deny(reason);
            }
        }
        Decision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::claims;

    #[test]
    fn missing_required_bit_denies() {
        let evaluator = PermissionEvaluator;
        // FREE | PAID held, ADMIN required.
        let claims = claims(Uuid::new_v4(), 3);

        assert_eq!(
            evaluator.require_flags(&claims, PermissionFlag::ADMIN),
            Decision::Deny(DenyReason::InsufficientPermission)
        );
    }

    #[test]
    fn superset_mask_allows() {
        let evaluator = PermissionEvaluator;
        let claims = claims(Uuid::new_v4(), 7);

        assert!(evaluator.require_flags(&claims, PermissionFlag::ADMIN).is_allowed());
        assert!(evaluator
            .require_flags(&claims, PermissionFlag::FREE | PermissionFlag::PAID)
            .is_allowed());
    }

    #[test]
    fn all_required_bits_must_be_present() {
        let evaluator = PermissionEvaluator;
        let claims = claims(Uuid::new_v4(), PermissionFlag::PAID.bits());

        assert_eq!(
            evaluator.require_flags(&claims, PermissionFlag::FREE | PermissionFlag::PAID),
            Decision::Deny(DenyReason::InsufficientPermission)
        );
    }

    #[test]
    fn unknown_bits_in_mask_do_not_satisfy_defined_flags() {
        let evaluator = PermissionEvaluator;
        let claims = claims(Uuid::new_v4(), 8);

        assert_eq!(
            evaluator.require_flags(&claims, PermissionFlag::FREE),
            Decision::Deny(DenyReason::InsufficientPermission)
        );
    }

    #[test]
    fn same_identity_allows_even_with_empty_mask() {
        let evaluator = PermissionEvaluator;
        let user_id = Uuid::new_v4();
        let claims = claims(user_id, 0);

        assert!(evaluator
            .require_same_identity_or_admin(&claims, user_id)
            .is_allowed());
    }

    #[test]
    fn admin_may_act_on_any_identity() {
        let evaluator = PermissionEvaluator;
        let claims = claims(Uuid::new_v4(), PermissionFlag::ADMIN.bits());

        assert!(evaluator
            .require_same_identity_or_admin(&claims, Uuid::new_v4())
            .is_allowed());
    }

    #[test]
    fn non_admin_targeting_another_identity_is_denied() {
        let evaluator = PermissionEvaluator;
        let claims = claims(Uuid::new_v4(), PermissionFlag::FREE.bits());

        assert_eq!(
            evaluator.require_same_identity_or_admin(&claims, Uuid::new_v4()),
            Decision::Deny(DenyReason::NotOwnerOrAdmin)
        );
    }

    #[test]
    fn evaluate_stops_at_first_denial() {
        let evaluator = PermissionEvaluator;
        let claims = claims(Uuid::new_v4(), PermissionFlag::FREE.bits());
        // Ownership fails first even though the flag check would also fail;
        // the reported reason proves order.
        let guards = [
            Guard::SameIdentityOrAdmin(Uuid::new_v4()),
            Guard::Flags(PermissionFlag::ADMIN),
        ];

        assert_eq!(
            evaluator.evaluate(&claims, &guards),
            Decision::Deny(DenyReason::NotOwnerOrAdmin)
        );

        let reordered = [
            Guard::Flags(PermissionFlag::ADMIN),
            Guard::SameIdentityOrAdmin(Uuid::new_v4()),
        ];
        assert_eq!(
            evaluator.evaluate(&claims, &reordered),
            Decision::Deny(DenyReason::InsufficientPermission)
        );
    }

    #[test]
    fn evaluate_allows_when_every_guard_passes() {
        let evaluator = PermissionEvaluator;
        let user_id = Uuid::new_v4();
        let claims = claims(user_id, 3);
        let guards = [
            Guard::SameIdentityOrAdmin(user_id),
            Guard::Flags(PermissionFlag::PAID),
        ];

        assert!(evaluator.evaluate(&claims, &guards).is_allowed());
    }

    #[test]
    fn empty_guard_list_allows() {
        let evaluator = PermissionEvaluator;
        let claims = claims(Uuid::new_v4(), 0);

        assert!(evaluator.evaluate(&claims, &[]).is_allowed());
    }

    #[test]
    fn decisions_are_stable_across_repeated_evaluation() {
        let evaluator = PermissionEvaluator;
        let claims = claims(Uuid::new_v4(), PermissionFlag::FREE.bits());

        let first = evaluator.require_flags(&claims, PermissionFlag::PAID);
        for _ in 0..3 {
            assert_eq!(evaluator.require_flags(&claims, PermissionFlag::PAID), first);
        }
    }
}
