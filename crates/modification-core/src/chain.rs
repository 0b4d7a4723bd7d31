//! Identity chain resolution
//!
//! Turns a raw [`ProxyChain`] into a [`ResolvedPrincipalSet`]. Resolution is
//! purely structural: subject and issuer counts must agree and every entry
//! must be a usable name. No trust store is consulted here.
//!
//! Entry rules:
//! - surrounding whitespace is trimmed
//! - blank entries are rejected
//! - `<`, `>` and control characters are rejected
//! - entries containing `=` are treated as X.500 DNs and every
//!   comma-separated RDN must be `attr=value` (commas may be escaped with `\`)

use crate::error::{ChainError, ChainField};
use crate::types::{PrincipalIdentity, ProxyChain, ResolvedPrincipalSet};

/// Resolve a proxy chain into an ordered principal set
///
/// # Returns
/// * `Ok(ResolvedPrincipalSet)` with one identity per chain position, front first
/// * `Err(ChainError)` if the chain is empty, the counts disagree, or any
///   entry is blank or unparseable
pub fn resolve(chain: &ProxyChain) -> Result<ResolvedPrincipalSet, ChainError> {
    let subjects = chain.subjects();
    let issuers = chain.issuers();

    if subjects.len() != issuers.len() {
        return Err(ChainError::LengthMismatch {
            subjects: subjects.len(),
            issuers: issuers.len(),
        });
    }

    if subjects.is_empty() {
        return Err(ChainError::Empty);
    }

    let identities = subjects
        .iter()
        .zip(issuers)
        .enumerate()
        .map(|(index, (subject, issuer))| {
            let subject = normalize_entry(subject, ChainField::Subject, index)?;
            let issuer = normalize_entry(issuer, ChainField::Issuer, index)?;
            Ok(PrincipalIdentity::new(subject, issuer))
        })
        .collect::<Result<Vec<_>, ChainError>>()?;

    Ok(ResolvedPrincipalSet::new(identities))
}

fn normalize_entry(raw: &str, field: ChainField, index: usize) -> Result<String, ChainError> {
    let entry = raw.trim();
    if entry.is_empty() {
        return Err(ChainError::EmptyEntry { field, index });
    }

    let unparseable = |reason: String| ChainError::Unparseable {
        field,
        index,
        reason,
    };

    if let Some(c) = entry.chars().find(|c| matches!(c, '<' | '>') || c.is_control()) {
        return Err(unparseable(format!("illegal character {:?}", c)));
    }

    if entry.contains('=') {
        for rdn in split_rdns(entry) {
            let rdn = rdn.trim();
            match rdn.split_once('=') {
                Some((attr, value)) if !attr.trim().is_empty() && !value.trim().is_empty() => {}
                _ => return Err(unparseable(format!("malformed RDN '{}'", rdn))),
            }
        }
    }

    Ok(entry.to_string())
}

/// Split a DN on commas not preceded by a backslash
fn split_rdns(dn: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in dn.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            ',' if !escaped => {
                parts.push(&dn[start..i]);
                start = i + 1;
            }
            _ => escaped = false,
        }
    }
    parts.push(&dn[start..]);
    parts
}

impl ProxyChain {
    /// Parse the proxied entities/issuers header pair
    ///
    /// Each header is a run of `<dn>` groups, one issuer group per subject
    /// group, front-to-back. Whitespace between groups is ignored. Only the
    /// bracket syntax is checked here; counts and entries are checked by
    /// [`resolve`].
    pub fn from_headers(entities: &str, issuers: &str) -> Result<Self, ChainError> {
        let subjects = parse_header(entities, ChainField::Subject)?;
        let issuers = parse_header(issuers, ChainField::Issuer)?;
        Ok(Self::from_parts(subjects, issuers))
    }

    /// Render the chain back into `(entities, issuers)` header values
    pub fn to_headers(&self) -> (String, String) {
        let render = |entries: &[String]| {
            entries
                .iter()
                .map(|e| format!("<{}>", e))
                .collect::<String>()
        };
        (render(self.subjects()), render(self.issuers()))
    }
}

fn parse_header(value: &str, field: ChainField) -> Result<Vec<String>, ChainError> {
    let mut entries = Vec::new();
    let mut rest = value.trim();

    while !rest.is_empty() {
        let Some(body) = rest.strip_prefix('<') else {
            return Err(ChainError::InvalidHeader {
                field,
                reason: format!("expected '<' before group {}", entries.len()),
            });
        };

        let Some(end) = body.find('>') else {
            return Err(ChainError::InvalidHeader {
                field,
                reason: format!("unterminated group {}", entries.len()),
            });
        };

        let entry = &body[..end];
        if entry.contains('<') {
            return Err(ChainError::InvalidHeader {
                field,
                reason: format!("nested '<' in group {}", entries.len()),
            });
        }

        entries.push(entry.to_string());
        rest = body[end + 1..].trim_start();
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_single_caller() {
        let set = resolve(&ProxyChain::single("alice", "CA1")).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.frontline().subject_dn(), "alice");
        assert_eq!(set.frontline().issuer_dn(), "CA1");
        assert!(set.proxied().is_empty());
    }

    #[test]
    fn test_resolve_preserves_order() {
        let chain = ProxyChain::single("cn=gateway, o=example", "cn=ca1")
            .with("cn=alice", "cn=ca2")
            .with("cn=bob", "cn=ca3");

        let set = resolve(&chain).unwrap();
        let subjects: Vec<&str> = set.iter().map(|p| p.subject_dn()).collect();

        assert_eq!(subjects, vec!["cn=gateway, o=example", "cn=alice", "cn=bob"]);
        assert_eq!(set.proxied().len(), 2);
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        let set = resolve(&ProxyChain::single("  alice ", "\tCA1")).unwrap();
        assert_eq!(set.frontline().subject_dn(), "alice");
        assert_eq!(set.frontline().issuer_dn(), "CA1");
    }

    #[test]
    fn test_resolve_length_mismatch() {
        let chain = ProxyChain::from_parts(vec!["alice".into(), "bob".into()], vec!["CA1".into()]);

        assert_eq!(
            resolve(&chain),
            Err(ChainError::LengthMismatch {
                subjects: 2,
                issuers: 1
            })
        );
    }

    #[test]
    fn test_resolve_empty_chain() {
        assert_eq!(resolve(&ProxyChain::new()), Err(ChainError::Empty));
    }

    #[test]
    fn test_resolve_blank_entry() {
        let chain = ProxyChain::single("alice", "CA1").with("bob", "   ");

        assert_eq!(
            resolve(&chain),
            Err(ChainError::EmptyEntry {
                field: ChainField::Issuer,
                index: 1
            })
        );
    }

    #[test]
    fn test_resolve_rejects_brackets_and_controls() {
        let bracket = ProxyChain::single("ali<ce", "CA1");
        let control = ProxyChain::single("alice", "CA\n1");

        assert!(matches!(
            resolve(&bracket),
            Err(ChainError::Unparseable { field: ChainField::Subject, index: 0, .. })
        ));
        assert!(matches!(
            resolve(&control),
            Err(ChainError::Unparseable { field: ChainField::Issuer, index: 0, .. })
        ));
    }

    #[test]
    fn test_resolve_rejects_malformed_dn() {
        let chain = ProxyChain::single("cn=alice,,o=example", "cn=ca1");
        assert!(matches!(resolve(&chain), Err(ChainError::Unparseable { .. })));

        let chain = ProxyChain::single("cn=", "cn=ca1");
        assert!(matches!(resolve(&chain), Err(ChainError::Unparseable { .. })));
    }

    #[test]
    fn test_resolve_accepts_escaped_comma() {
        let chain = ProxyChain::single(r"cn=Smith\, John,o=example", "cn=ca1");
        assert!(resolve(&chain).is_ok());
    }

    #[test]
    fn test_parse_headers() {
        let chain = ProxyChain::from_headers(
            "<cn=gateway><cn=alice, o=example>",
            "<cn=ca1> <cn=ca2>",
        )
        .unwrap();

        assert_eq!(chain.subjects(), &["cn=gateway", "cn=alice, o=example"]);
        assert_eq!(chain.issuers(), &["cn=ca1", "cn=ca2"]);
    }

    #[test]
    fn test_parse_headers_mismatch_is_caught_by_resolve() {
        let chain = ProxyChain::from_headers("<a><b>", "<CA1>").unwrap();
        assert!(matches!(resolve(&chain), Err(ChainError::LengthMismatch { .. })));
    }

    #[test]
    fn test_parse_headers_invalid() {
        assert!(matches!(
            ProxyChain::from_headers("alice", "<CA1>"),
            Err(ChainError::InvalidHeader { field: ChainField::Subject, .. })
        ));
        assert!(matches!(
            ProxyChain::from_headers("<alice>", "<CA1"),
            Err(ChainError::InvalidHeader { field: ChainField::Issuer, .. })
        ));
        assert!(matches!(
            ProxyChain::from_headers("<ali<ce>", "<CA1>"),
            Err(ChainError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_headers_round_trip() {
        let chain = ProxyChain::single("cn=alice", "cn=ca1").with("cn=bob", "cn=ca2");
        let (entities, issuers) = chain.to_headers();

        assert_eq!(entities, "<cn=alice><cn=bob>");
        assert_eq!(ProxyChain::from_headers(&entities, &issuers).unwrap(), chain);
    }

    #[test]
    fn test_split_rdns() {
        assert_eq!(split_rdns("cn=a,o=b"), vec!["cn=a", "o=b"]);
        assert_eq!(split_rdns(r"cn=a\,b,o=c"), vec![r"cn=a\,b", "o=c"]);
    }
}
