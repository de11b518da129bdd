// ABOUTME: Resource-level permission evaluation with household-aware access rules
// ABOUTME: Models the orphaned-recipe exemption as an explicit ownership policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Permission evaluation for recipe access.
//!
//! Disclosure rules depend on resource-ownership state, so the ownership
//! decision is an explicit [`OwnershipPolicy`] rather than an inline branch:
//! orphaned resources (no owner) are disclosable to any authenticated caller,
//! owned resources go through [`can_access_resource`].

use uuid::Uuid;

/// Action being attempted against a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    View,
    Edit,
    Delete,
}

/// Authorization strategy selected by resource-ownership state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipPolicy {
    /// No owning user: disclosable to any authenticated caller
    Unowned,
    /// Owned by a user: the permission evaluator decides
    Owned(Uuid),
}

impl OwnershipPolicy {
    /// Select the policy for a resource's owner field
    #[must_use]
    pub fn of(owner: Option<Uuid>) -> Self {
        owner.map_or(Self::Unowned, Self::Owned)
    }

    /// Evaluate whether `actor` may perform `action` under this policy
    #[must_use]
    pub fn allows(
        &self,
        action: ResourceAction,
        actor: Uuid,
        household_user_ids: Option<&[Uuid]>,
        is_server_admin: bool,
    ) -> bool {
        match self {
            Self::Unowned => true,
            Self::Owned(owner) => {
                can_access_resource(action, actor, *owner, household_user_ids, is_server_admin)
            }
        }
    }
}

/// Decide whether `actor` may perform `action` on a resource owned by `owner`.
///
/// Grants when the actor is the owner, when the actor is a server admin, or
/// (for `View`) when both actor and owner belong to the same household.
/// Household membership does not extend to `Edit` or `Delete`.
#[must_use]
pub fn can_access_resource(
    action: ResourceAction,
    actor: Uuid,
    owner: Uuid,
    household_user_ids: Option<&[Uuid]>,
    is_server_admin: bool,
) -> bool {
    if actor == owner || is_server_admin {
        return true;
    }

    match action {
        ResourceAction::View => household_user_ids
            .is_some_and(|members| members.contains(&actor) && members.contains(&owner)),
        ResourceAction::Edit | ResourceAction::Delete => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_owner_can_view_and_edit() {
        let owner = Uuid::new_v4();
        assert!(can_access_resource(
            ResourceAction::View,
            owner,
            owner,
            None,
            false
        ));
        assert!(can_access_resource(
            ResourceAction::Edit,
            owner,
            owner,
            None,
            false
        ));
    }

    #[test]
    fn test_admin_overrides_ownership() {
        let users = ids(2);
        assert!(can_access_resource(
            ResourceAction::Delete,
            users[0],
            users[1],
            None,
            true
        ));
    }

    #[test]
    fn test_household_member_can_view_but_not_edit() {
        let users = ids(2);
        let household = users.clone();
        assert!(can_access_resource(
            ResourceAction::View,
            users[0],
            users[1],
            Some(&household),
            false
        ));
        assert!(!can_access_resource(
            ResourceAction::Edit,
            users[0],
            users[1],
            Some(&household),
            false
        ));
    }

    #[test]
    fn test_stranger_denied() {
        let users = ids(3);
        // Household containing only the owner does not help the actor
        let household = vec![users[1], users[2]];
        assert!(!can_access_resource(
            ResourceAction::View,
            users[0],
            users[1],
            Some(&household),
            false
        ));
        assert!(!can_access_resource(
            ResourceAction::View,
            users[0],
            users[1],
            None,
            false
        ));
    }

    #[test]
    fn test_unowned_policy_always_allows() {
        let actor = Uuid::new_v4();
        let policy = OwnershipPolicy::of(None);
        assert_eq!(policy, OwnershipPolicy::Unowned);
        assert!(policy.allows(ResourceAction::View, actor, None, false));
    }

    #[test]
    fn test_owned_policy_delegates_to_evaluator() {
        let users = ids(2);
        let policy = OwnershipPolicy::of(Some(users[1]));
        assert!(!policy.allows(ResourceAction::View, users[0], None, false));
        assert!(policy.allows(ResourceAction::View, users[0], None, true));
    }
}
