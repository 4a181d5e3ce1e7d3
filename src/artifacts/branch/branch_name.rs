//! Branch name validation.

use crate::errors::DitError;

/// Substrings that may not appear anywhere in a branch name.
const FORBIDDEN_SEQUENCES: &[&str] = &["..", "~", "^", ":", "?", "*", "[", "]", "@{", "\\"];

/// A branch name that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: &str) -> anyhow::Result<Self> {
        let valid = !name.is_empty()
            && !name.starts_with('-')
            && !name.ends_with('.')
            && !name.ends_with(".lock")
            && !FORBIDDEN_SEQUENCES
                .iter()
                .any(|sequence| name.contains(sequence));

        if !valid {
            anyhow::bail!(DitError::InvalidName(name.to_string()));
        }
        Ok(BranchName(name.to_string()))
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;

    proptest! {
        #[test]
        fn alphanumeric_names_are_valid(name in "[a-zA-Z0-9_]+") {
            assert!(BranchName::try_parse(&name).is_ok());
        }

        #[test]
        fn hierarchical_names_are_valid(prefix in "[a-z0-9]+", suffix in "[a-z0-9]+") {
            assert!(BranchName::try_parse(&format!("{prefix}/{suffix}")).is_ok());
        }

        #[test]
        fn consecutive_dots_are_invalid(prefix in "[a-z0-9]+", suffix in "[a-z0-9]+") {
            assert!(BranchName::try_parse(&format!("{prefix}..{suffix}")).is_err());
        }

        #[test]
        fn forbidden_characters_are_invalid(
            prefix in "[a-z0-9]+",
            suffix in "[a-z0-9]+",
            forbidden in r"[~\^:\?\*\[\]\\]",
        ) {
            assert!(BranchName::try_parse(&format!("{prefix}{forbidden}{suffix}")).is_err());
        }

        #[test]
        fn lock_suffix_is_invalid(prefix in "[a-z0-9]+") {
            assert!(BranchName::try_parse(&format!("{prefix}.lock")).is_err());
        }
    }

    #[test]
    fn leading_dash_and_trailing_dot_are_invalid() {
        assert!(BranchName::try_parse("-feature").is_err());
        assert!(BranchName::try_parse("feature.").is_err());
        assert!(BranchName::try_parse("release@{1}").is_err());
        assert!(BranchName::try_parse("").is_err());
    }

    #[test]
    fn ordinary_names_are_valid() {
        assert!(BranchName::try_parse("master").is_ok());
        assert!(BranchName::try_parse("feature/login-form").is_ok());
        assert!(BranchName::try_parse("hotfix-1.2").is_ok());
    }
}
