use thiserror::Error;

/// Validation and contract errors exposed by `ledgerlink-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("column name cannot be empty")]
    EmptyColumnName,
    #[error("column name must start with an ASCII letter: '{name}'")]
    ColumnInvalidStart { name: String },
    #[error("column name '{name}' contains invalid character '{ch}' at index {index}")]
    ColumnInvalidChar { name: String, ch: char, index: usize },

    #[error("projection must name at least one column")]
    EmptyProjection,
    #[error("IN filter requires at least one value")]
    EmptyValueList,
    #[error("page limit must be greater than zero")]
    ZeroPageLimit,

    #[error("attribute mapping must contain at least one attribute")]
    EmptyAttributes,
    #[error("attribute name cannot be empty")]
    EmptyAttributeName,
    #[error("entity payload must be a JSON object")]
    EntityNotObject,

    #[error(
        "invalid resource '{value}', expected one of class, account, customer, vendor, item, invoice"
    )]
    InvalidResource { value: String },
}
