use std::fmt;

/// Rejection of an unknown flex configuration keyword.
///
/// Raised at the string boundary (`FromStr` on the flex enums) so malformed
/// configuration never reaches the solver. The error lists the accepted
/// keywords for the property it was parsed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordError {
    pub value: String,
    pub expected: &'static [&'static str],
}

impl KeywordError {
    pub(crate) fn new(value: impl Into<String>, expected: &'static [&'static str]) -> Self {
        Self { value: value.into(), expected }
    }
}

impl fmt::Display for KeywordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown flex keyword {:?}; expected one of: {}",
            self.value,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for KeywordError {}
