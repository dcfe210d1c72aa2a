// Validator Port

use crate::domain::validation::{validate_fields, Validate, ValidationErrors};

/// Structural validation of incoming requests.
///
/// Stateless and side-effect free: the same request always yields the same
/// ordered list of violations.
pub trait Validator: Send + Sync {
    fn validate(&self, request: &dyn Validate) -> Result<(), ValidationErrors>;
}

/// Evaluates the rules each request type declares for its fields
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleValidator;

impl Validator for RuleValidator {
    fn validate(&self, request: &dyn Validate) -> Result<(), ValidationErrors> {
        validate_fields(&request.fields())
    }
}
