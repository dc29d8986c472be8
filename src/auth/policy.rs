/// Role requirement attached to a route.
///
/// The decision rule is pure set intersection: an empty requirement admits
/// any authenticated caller, a non-empty one admits callers holding at
/// least one of the listed roles. Role names compare exact and
/// case-sensitive; no hierarchy or implication between roles.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy {
    required: Vec<String>,
}

impl AuthorizationPolicy {
    /// Policy that only requires a valid token, no particular role.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Policy requiring a single role.
    pub fn require(role: &str) -> Self {
        Self {
            required: vec![role.to_string()],
        }
    }

    /// Policy satisfied by any one of the given roles.
    pub fn require_any<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// The roles this policy accepts. Empty means authenticated-only.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Whether a caller holding `held` satisfies this policy.
    pub fn permits(&self, held: &[String]) -> bool {
        self.required.is_empty() || self.required.iter().any(|r| held.contains(r))
    }
}
