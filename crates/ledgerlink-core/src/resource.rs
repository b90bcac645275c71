use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Accounting entity types exposed by the platform.
///
/// The variant name doubles as the wire-level resource type string used in
/// query statements (`SELECT * FROM Class ...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Class,
    Account,
    Customer,
    Vendor,
    Item,
    Invoice,
}

impl ResourceKind {
    pub const ALL: [Self; 6] = [
        Self::Class,
        Self::Account,
        Self::Customer,
        Self::Vendor,
        Self::Item,
        Self::Invoice,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::Account => "Account",
            Self::Customer => "Customer",
            Self::Vendor => "Vendor",
            Self::Item => "Item",
            Self::Invoice => "Invoice",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "class" => Ok(Self::Class),
            "account" => Ok(Self::Account),
            "customer" => Ok(Self::Customer),
            "vendor" => Ok(Self::Vendor),
            "item" => Ok(Self::Item),
            "invoice" => Ok(Self::Invoice),
            other => Err(ValidationError::InvalidResource {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitive_names() {
        let parsed = "Class".parse::<ResourceKind>().expect("must parse");
        assert_eq!(parsed, ResourceKind::Class);
        assert_eq!(parsed.as_str(), "Class");
    }

    #[test]
    fn rejects_unknown_resource() {
        let err = "journal".parse::<ResourceKind>().expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidResource { .. }));
    }
}
