//! Property-Based Tests for chain resolution and role policy
//!
//! 1. Resolution fails whenever subject and issuer counts disagree
//! 2. Resolution preserves chain order 1:1
//! 3. Authorization holds exactly when the role union covers the requirement

use modification_core::{is_authorized, missing_roles, resolve, ChainError, ProxyChain, RoleSet};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn role_set() -> impl Strategy<Value = RoleSet> {
    prop::collection::btree_set("[A-E]", 0..4)
}

// =============================================================================
// Chain resolution
// =============================================================================

proptest! {
    #[test]
    fn prop_count_mismatch_is_malformed(
        subjects in prop::collection::vec(name(), 0..6),
        issuers in prop::collection::vec(name(), 0..6),
    ) {
        prop_assume!(subjects.len() != issuers.len());

        let expected = ChainError::LengthMismatch {
            subjects: subjects.len(),
            issuers: issuers.len(),
        };
        let chain = ProxyChain::from_parts(subjects, issuers);

        prop_assert_eq!(resolve(&chain), Err(expected));
    }

    #[test]
    fn prop_resolution_preserves_order(
        pairs in prop::collection::vec((name(), name()), 1..8),
    ) {
        let chain = pairs
            .iter()
            .fold(ProxyChain::new(), |chain, (s, i)| chain.with(s.clone(), i.clone()));

        let resolved = resolve(&chain).expect("well-formed chain should resolve");

        prop_assert_eq!(resolved.len(), pairs.len());
        for (identity, (subject, issuer)) in resolved.iter().zip(&pairs) {
            prop_assert_eq!(identity.subject_dn(), subject.as_str());
            prop_assert_eq!(identity.issuer_dn(), issuer.as_str());
        }
        prop_assert_eq!(resolved.frontline().subject_dn(), pairs[0].0.as_str());
    }

    #[test]
    fn prop_header_encoding_resolves_identically(
        pairs in prop::collection::vec((name(), name()), 1..6),
    ) {
        let chain = pairs
            .iter()
            .fold(ProxyChain::new(), |chain, (s, i)| chain.with(s.clone(), i.clone()));
        let (entities, issuers) = chain.to_headers();

        let parsed = ProxyChain::from_headers(&entities, &issuers).unwrap();

        prop_assert_eq!(resolve(&parsed), resolve(&chain));
    }
}

// =============================================================================
// Role policy
// =============================================================================

proptest! {
    #[test]
    fn prop_authorized_iff_union_covers_requirement(
        held in prop::collection::vec(role_set(), 1..4),
        required in role_set(),
    ) {
        let union: RoleSet = held.iter().flatten().cloned().collect();

        prop_assert_eq!(is_authorized(&held, &required), required.is_subset(&union));
        prop_assert_eq!(
            is_authorized(&held, &required),
            missing_roles(&held, &required).is_empty()
        );
    }

    #[test]
    fn prop_strict_subset_is_denied(
        required in prop::collection::btree_set("[A-E]", 1..5),
        drop_index in 0usize..5,
    ) {
        let dropped = required.iter().nth(drop_index % required.len()).cloned().unwrap();
        let held: RoleSet = required.iter().filter(|r| **r != dropped).cloned().collect();

        prop_assert!(!is_authorized(&[held], &required));
    }

    #[test]
    fn prop_adding_proxied_identities_never_revokes(
        held in prop::collection::vec(role_set(), 1..4),
        extra in role_set(),
        required in role_set(),
    ) {
        let before = is_authorized(&held, &required);
        let mut extended = held.clone();
        extended.push(extra);

        prop_assert!(!before || is_authorized(&extended, &required));
    }
}
