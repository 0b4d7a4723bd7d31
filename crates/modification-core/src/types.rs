//! Common types used across modification submissions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Set of role names, ordered for stable listings and logs
pub type RoleSet = BTreeSet<String>;

/// A single subject/issuer pair as supplied by the transport
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProxiedIdentity {
    /// Subject distinguished name (or plain principal name)
    pub subject_dn: String,

    /// Issuer distinguished name vouching for the subject
    pub issuer_dn: String,
}

impl ProxiedIdentity {
    /// Create a new proxied identity
    pub fn new(subject_dn: impl Into<String>, issuer_dn: impl Into<String>) -> Self {
        Self {
            subject_dn: subject_dn.into(),
            issuer_dn: issuer_dn.into(),
        }
    }
}

/// Raw proxy chain, front-to-back
///
/// Subjects and issuers are kept as two parallel lists exactly as they
/// arrive, so a count mismatch stays representable until resolution
/// rejects it. Position 0 is the directly authenticated caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyChain {
    subjects: Vec<String>,
    issuers: Vec<String>,
}

impl ProxyChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain from parallel subject and issuer lists
    pub fn from_parts(subjects: Vec<String>, issuers: Vec<String>) -> Self {
        Self { subjects, issuers }
    }

    /// Create a chain holding only the frontline caller
    pub fn single(subject_dn: impl Into<String>, issuer_dn: impl Into<String>) -> Self {
        Self::new().with(subject_dn, issuer_dn)
    }

    /// Append a proxied identity (builder pattern)
    pub fn with(mut self, subject_dn: impl Into<String>, issuer_dn: impl Into<String>) -> Self {
        self.push(ProxiedIdentity::new(subject_dn, issuer_dn));
        self
    }

    /// Append a proxied identity
    pub fn push(&mut self, identity: ProxiedIdentity) {
        self.subjects.push(identity.subject_dn);
        self.issuers.push(identity.issuer_dn);
    }

    /// Subjects in chain order
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    /// Issuers in chain order
    pub fn issuers(&self) -> &[String] {
        &self.issuers
    }

    /// Check if both halves of the chain are empty
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty() && self.issuers.is_empty()
    }
}

impl FromIterator<ProxiedIdentity> for ProxyChain {
    fn from_iter<I: IntoIterator<Item = ProxiedIdentity>>(iter: I) -> Self {
        let mut chain = Self::new();
        for identity in iter {
            chain.push(identity);
        }
        chain
    }
}

/// A structurally verified identity taken from a proxy chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrincipalIdentity {
    subject_dn: String,
    issuer_dn: String,
}

impl PrincipalIdentity {
    pub(crate) fn new(subject_dn: String, issuer_dn: String) -> Self {
        Self {
            subject_dn,
            issuer_dn,
        }
    }

    pub fn subject_dn(&self) -> &str {
        &self.subject_dn
    }

    pub fn issuer_dn(&self) -> &str {
        &self.issuer_dn
    }
}

impl fmt::Display for PrincipalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}><{}>", self.subject_dn, self.issuer_dn)
    }
}

/// Ordered principal identities resolved from one proxy chain
///
/// Only [`crate::chain::resolve`] builds this, so a value always holds at
/// least the frontline caller and preserves the original chain order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPrincipalSet {
    identities: Vec<PrincipalIdentity>,
}

impl ResolvedPrincipalSet {
    pub(crate) fn new(identities: Vec<PrincipalIdentity>) -> Self {
        debug_assert!(!identities.is_empty());
        Self { identities }
    }

    /// The directly authenticated caller
    pub fn frontline(&self) -> &PrincipalIdentity {
        &self.identities[0]
    }

    /// Identities the frontline caller is proxying for, in order
    pub fn proxied(&self) -> &[PrincipalIdentity] {
        &self.identities[1..]
    }

    /// All identities in chain order
    pub fn identities(&self) -> &[PrincipalIdentity] {
        &self.identities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PrincipalIdentity> {
        self.identities.iter()
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Always false for a resolved set
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl fmt::Display for ResolvedPrincipalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, identity) in self.identities.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", identity)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ResolvedPrincipalSet {
    type Item = &'a PrincipalIdentity;
    type IntoIter = std::slice::Iter<'a, PrincipalIdentity>;

    fn into_iter(self) -> Self::IntoIter {
        self.identities.iter()
    }
}

/// Stages of a single submission, in the order they are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionStage {
    Received,
    Resolved,
    LookedUp,
    TypeValidated,
    Authorized,
    Executed,
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionStage::Received => "received",
            SubmissionStage::Resolved => "resolved",
            SubmissionStage::LookedUp => "looked-up",
            SubmissionStage::TypeValidated => "type-validated",
            SubmissionStage::Authorized => "authorized",
            SubmissionStage::Executed => "executed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_builder_keeps_order() {
        let chain = ProxyChain::single("cn=gateway", "cn=ca1")
            .with("cn=alice", "cn=ca2")
            .with("cn=bob", "cn=ca3");

        assert_eq!(chain.subjects(), &["cn=gateway", "cn=alice", "cn=bob"]);
        assert_eq!(chain.issuers(), &["cn=ca1", "cn=ca2", "cn=ca3"]);
        assert!(!chain.is_empty());
    }

    #[test]
    fn test_chain_from_iterator() {
        let chain: ProxyChain = vec![
            ProxiedIdentity::new("alice", "CA1"),
            ProxiedIdentity::new("bob", "CA2"),
        ]
        .into_iter()
        .collect();

        assert_eq!(chain.subjects(), &["alice", "bob"]);
        assert_eq!(chain.issuers(), &["CA1", "CA2"]);
    }

    #[test]
    fn test_stage_ordering() {
        assert!(SubmissionStage::Received < SubmissionStage::Resolved);
        assert!(SubmissionStage::TypeValidated < SubmissionStage::Authorized);
        assert_eq!(SubmissionStage::LookedUp.to_string(), "looked-up");
    }
}
