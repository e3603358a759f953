//! Permission requirements: `"A | B"` means "A or B is sufficient".

use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthzError;
use crate::permissions::Permission;
use crate::subject::SubjectPermissionSet;

/// Separator between alternative tokens in the textual form.
pub const DELIMITER: char = '|';

/// Empty-expression policy.
///
/// `false`: an expression must name at least one token. Parsing or building
/// an empty one fails with [`AuthzError::MalformedExpression`], so a
/// requirement can never silently degrade into "allow everyone". Were an empty
/// expression ever evaluated, it would not be satisfied (empty intersection).
pub const ALLOW_EMPTY_EXPRESSION: bool = false;

/// A requirement satisfied when the subject holds at least one listed token.
///
/// Tokens keep their declaration order for display, but equality and hashing
/// are by token *set*: `"A | B"`, `"B|A"` and `" A | A | B "` are the same
/// requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionExpression {
    tokens: Vec<Permission>,
    index: HashSet<Permission>,
}

impl PermissionExpression {
    /// Parse the textual form.
    ///
    /// Tokens are trimmed and blank segments are skipped. Tokens are not
    /// checked against any catalog here; see
    /// [`PermissionCatalog::check`](crate::PermissionCatalog::check).
    pub fn parse(raw: &str) -> Result<Self, AuthzError> {
        let tokens = raw
            .split(DELIMITER)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| Permission::new(t.to_owned()));

        Self::from_tokens(tokens).map_err(|_| {
            AuthzError::malformed(format!("'{}' contains no permission tokens", raw.trim()))
        })
    }

    /// Build from already separated tokens. Duplicates collapse.
    pub fn from_tokens(tokens: impl IntoIterator<Item = Permission>) -> Result<Self, AuthzError> {
        let mut ordered = Vec::new();
        let mut index = HashSet::new();
        for token in tokens {
            if index.insert(token.clone()) {
                ordered.push(token);
            }
        }

        if ordered.is_empty() && !ALLOW_EMPTY_EXPRESSION {
            return Err(AuthzError::malformed("expression contains no permission tokens"));
        }

        Ok(Self {
            tokens: ordered,
            index,
        })
    }

    /// Tokens in declaration order, without duplicates.
    pub fn tokens(&self) -> &[Permission] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains(token)
    }

    /// True iff the expression's tokens and the granted tokens intersect.
    ///
    /// Scans the smaller side and probes the other by hash, so cost is
    /// `O(min(|expression|, |granted|))`.
    pub fn satisfies(&self, granted: &SubjectPermissionSet) -> bool {
        if self.index.len() <= granted.len() {
            self.tokens.iter().any(|token| granted.contains(token))
        } else {
            granted.iter().any(|token| self.index.contains(token))
        }
    }
}

impl PartialEq for PermissionExpression {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for PermissionExpression {}

impl Hash for PermissionExpression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sorted: Vec<&Permission> = self.tokens.iter().collect();
        sorted.sort();
        sorted.hash(state);
    }
}

impl core::fmt::Display for PermissionExpression {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                write!(f, " {DELIMITER} ")?;
            }
            f.write_str(token.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for PermissionExpression {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PermissionExpression {
    type Error = AuthzError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PermissionExpression> for String {
    fn from(value: PermissionExpression) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::admin;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;

    fn granted(tokens: &[&str]) -> SubjectPermissionSet {
        tokens
            .iter()
            .map(|t| Permission::new(t.to_string()))
            .collect()
    }

    fn hash_of(expr: &PermissionExpression) -> u64 {
        let mut h = DefaultHasher::new();
        expr.hash(&mut h);
        h.finish()
    }

    #[test]
    fn one_matching_alternative_is_enough() {
        let expr = PermissionExpression::parse("USER_CREATE | USER_SELECT").unwrap();
        assert!(expr.satisfies(&granted(&["USER_SELECT"])));
    }

    #[test]
    fn empty_grant_never_satisfies() {
        let expr = PermissionExpression::parse("USER_CREATE | USER_SELECT").unwrap();
        assert!(!expr.satisfies(&SubjectPermissionSet::empty()));
    }

    #[test]
    fn unrelated_grants_do_not_satisfy() {
        let expr = PermissionExpression::parse(admin::USER_PAGE).unwrap();
        assert!(!expr.satisfies(&granted(&["ROLE_SELECT", "PERMISSION_SELECT"])));
    }

    #[test]
    fn whitespace_and_order_do_not_change_meaning() {
        let a = PermissionExpression::parse(" A | B ").unwrap();
        let b = PermissionExpression::parse("A|B").unwrap();
        let c = PermissionExpression::parse("B | A | A").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(hash_of(&a), hash_of(&c));
    }

    #[test]
    fn duplicates_collapse_but_order_is_kept() {
        let expr = PermissionExpression::parse("B | A | B").unwrap();
        assert_eq!(expr.len(), 2);
        assert_eq!(expr.to_string(), "B | A");
    }

    #[test]
    fn tokens_are_case_sensitive() {
        let expr = PermissionExpression::parse("USER_SELECT").unwrap();
        assert!(!expr.satisfies(&granted(&["user_select"])));
    }

    #[test]
    fn empty_expressions_are_rejected() {
        assert!(!ALLOW_EMPTY_EXPRESSION);
        for raw in ["", "   ", "|", " | | "] {
            let err = PermissionExpression::parse(raw).unwrap_err();
            assert!(matches!(err, AuthzError::MalformedExpression(_)), "{raw:?}");
        }
        assert!(PermissionExpression::from_tokens(Vec::new()).is_err());
    }

    #[test]
    fn blank_segments_are_skipped() {
        let expr = PermissionExpression::parse("A || B |").unwrap();
        assert_eq!(expr, PermissionExpression::parse("A | B").unwrap());
    }

    #[test]
    fn serde_uses_the_textual_form() {
        let expr: PermissionExpression = serde_json::from_str("\"ROLE_CREATE|ROLE_SELECT\"").unwrap();
        assert_eq!(serde_json::to_string(&expr).unwrap(), "\"ROLE_CREATE | ROLE_SELECT\"");
        assert!(serde_json::from_str::<PermissionExpression>("\" | \"").is_err());
    }

    fn token() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["A", "B", "C", "D", "E", "F", "G", "H"]).prop_map(str::to_string)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: satisfies(E, S) iff tokens(E) ∩ tokens(S) ≠ ∅.
        #[test]
        fn satisfies_is_set_intersection(
            required in prop::collection::vec(token(), 1..6),
            held in prop::collection::vec(token(), 0..8),
        ) {
            let expr = PermissionExpression::parse(&required.join(" | ")).unwrap();
            let set: SubjectPermissionSet = held.iter().cloned().map(Permission::new).collect();

            let expected = required.iter().any(|r| held.contains(r));
            prop_assert_eq!(expr.satisfies(&set), expected);
        }

        /// Property: parsing the display form yields the same expression.
        #[test]
        fn display_then_parse_is_idempotent(
            required in prop::collection::vec(token(), 1..6),
            pad in "[ \t]{0,3}",
        ) {
            let raw = required.join(format!("{pad}|{pad}").as_str());
            let once = PermissionExpression::parse(&raw).unwrap();
            let twice = PermissionExpression::parse(&once.to_string()).unwrap();
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(once.to_string(), twice.to_string());
        }

        /// Property: an empty subject satisfies nothing.
        #[test]
        fn empty_subject_is_fail_closed(required in prop::collection::vec(token(), 1..6)) {
            let expr = PermissionExpression::parse(&required.join("|")).unwrap();
            prop_assert!(!expr.satisfies(&SubjectPermissionSet::empty()));
        }
    }
}
