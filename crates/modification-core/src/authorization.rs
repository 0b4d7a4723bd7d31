//! Role policy for proxied submissions
//!
//! The acting principal set is the whole chain. Roles held by any identity
//! in the chain count toward the requirement, so a delegate holding one role
//! and the user it proxies for holding another together satisfy a
//! configuration that needs both.
//!
//! These functions take role sets directly and never look at ambient
//! authentication state. Callers fetch the roles per submission.

use crate::types::RoleSet;

/// Union of all roles held across the chain
pub fn combined_roles<'a, I>(held: I) -> RoleSet
where
    I: IntoIterator<Item = &'a RoleSet>,
{
    held.into_iter().flatten().cloned().collect()
}

/// Check whether the combined roles cover every required role
///
/// An empty requirement is always satisfied. Role names match exactly.
pub fn is_authorized<'a, I>(held: I, required: &RoleSet) -> bool
where
    I: IntoIterator<Item = &'a RoleSet>,
{
    if required.is_empty() {
        return true;
    }
    combined_roles(held).is_superset(required)
}

/// Required roles no identity in the chain holds
///
/// For server-side diagnostics only; never returned to callers.
pub fn missing_roles<'a, I>(held: I, required: &RoleSet) -> RoleSet
where
    I: IntoIterator<Item = &'a RoleSet>,
{
    let combined = combined_roles(held);
    required.difference(&combined).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(names: &[&str]) -> RoleSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_identity_with_role() {
        let held = vec![roles(&["ADMIN", "USER"])];
        assert!(is_authorized(&held, &roles(&["ADMIN"])));
    }

    #[test]
    fn test_single_identity_without_role() {
        let held = vec![roles(&["USER"])];
        assert!(!is_authorized(&held, &roles(&["ADMIN"])));
    }

    #[test]
    fn test_union_across_chain() {
        let held = vec![roles(&["PROXY"]), roles(&["ADMIN"])];
        assert!(is_authorized(&held, &roles(&["PROXY", "ADMIN"])));
    }

    #[test]
    fn test_strict_subset_denied() {
        let held = vec![roles(&["A"]), roles(&["B"])];
        assert!(!is_authorized(&held, &roles(&["A", "B", "C"])));
        assert_eq!(missing_roles(&held, &roles(&["A", "B", "C"])), roles(&["C"]));
    }

    #[test]
    fn test_empty_requirement() {
        let held: Vec<RoleSet> = vec![RoleSet::new()];
        assert!(is_authorized(&held, &RoleSet::new()));
    }

    #[test]
    fn test_role_names_are_case_sensitive() {
        let held = vec![roles(&["admin"])];
        assert!(!is_authorized(&held, &roles(&["ADMIN"])));
    }
}
