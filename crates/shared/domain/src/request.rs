use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of packages the verification agent should re-verify.
///
/// Sent as the payload of the verification broadcast. The agent looks up the declared
/// domains of each package elsewhere and reports results back through the ownership
/// registry. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    package_names: BTreeSet<String>,
}

impl VerificationRequest {
    #[must_use]
    pub const fn new(package_names: BTreeSet<String>) -> Self {
        Self { package_names }
    }

    #[must_use]
    pub const fn package_names(&self) -> &BTreeSet<String> {
        &self.package_names
    }

    #[must_use]
    pub fn contains(&self, package: &str) -> bool {
        self.package_names.contains(package)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.package_names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.package_names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.package_names.iter().map(String::as_str)
    }

    pub fn into_package_names(self) -> BTreeSet<String> {
        self.package_names
    }
}

impl TryFrom<Option<BTreeSet<String>>> for VerificationRequest {
    type Error = DomainError;

    fn try_from(package_names: Option<BTreeSet<String>>) -> Result<Self, DomainError> {
        package_names.map(Self::new).ok_or_else(|| DomainError::NullPackageSet {
            message: "package_names".into(),
            context: None,
        })
    }
}

impl<S: Into<String>> FromIterator<S> for VerificationRequest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_set_is_rejected() {
        let err = VerificationRequest::try_from(None).unwrap_err();
        assert!(matches!(err, DomainError::NullPackageSet { .. }));
    }

    #[test]
    fn duplicates_collapse() {
        let request: VerificationRequest =
            ["com.example.mail", "com.example.maps", "com.example.mail"].into_iter().collect();
        assert_eq!(request.len(), 2);
        assert!(request.contains("com.example.maps"));
        assert_eq!(request.iter().collect::<Vec<_>>(), ["com.example.mail", "com.example.maps"]);
    }

    #[test]
    fn empty_set_is_allowed() {
        let request = VerificationRequest::try_from(Some(BTreeSet::new())).unwrap();
        assert!(request.is_empty());
    }
}
