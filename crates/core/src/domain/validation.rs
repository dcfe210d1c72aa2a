// Declarative request validation
//
// Request types declare their fields and the rules bound to each one; the
// evaluator walks them in declaration order and collects every violation.

use serde::Serialize;
use std::fmt;

/// A single validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "param", rename_all = "snake_case")]
pub enum Rule {
    /// Value must be present (and, for text, not blank)
    Required,
    /// Minimum length (trimmed characters for text, elements for sequences)
    MinLength(usize),
    /// Maximum length (trimmed characters for text, elements for sequences)
    MaxLength(usize),
    /// Integer must be strictly greater than the bound
    #[serde(rename = "gt")]
    GreaterThan(i64),
}

impl Rule {
    /// Stable tag reported to callers
    pub fn tag(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::MinLength(_) => "min_length",
            Rule::MaxLength(_) => "max_length",
            Rule::GreaterThan(_) => "gt",
        }
    }

    fn accepts(&self, value: &FieldValue<'_>) -> bool {
        match (self, value) {
            (Rule::Required, FieldValue::Text(text)) => {
                text.is_some_and(|s| !s.trim().is_empty())
            }
            (Rule::Required, FieldValue::Integer(n)) => n.is_some(),
            // An empty sequence is present; emptiness is MinLength's concern.
            (Rule::Required, FieldValue::Integers(items)) => items.is_some(),

            (Rule::MinLength(min), FieldValue::Text(Some(s))) => trimmed_len(s) >= *min,
            (Rule::MinLength(min), FieldValue::Integers(Some(items))) => items.len() >= *min,
            (Rule::MaxLength(max), FieldValue::Text(Some(s))) => trimmed_len(s) <= *max,
            (Rule::MaxLength(max), FieldValue::Integers(Some(items))) => items.len() <= *max,

            (Rule::GreaterThan(bound), FieldValue::Integer(Some(n))) => n > bound,

            // Absent values are only rejected by Required; rules that do not
            // apply to a value shape are ignored.
            _ => true,
        }
    }

    fn accepts_element(&self, element: i64) -> bool {
        self.accepts(&FieldValue::Integer(Some(element)))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "is required"),
            Rule::MinLength(n) => write!(f, "length must be at least {}", n),
            Rule::MaxLength(n) => write!(f, "length must be at most {}", n),
            Rule::GreaterThan(n) => write!(f, "must be greater than {}", n),
        }
    }
}

fn trimmed_len(s: &str) -> usize {
    s.trim().chars().count()
}

/// Borrowed view of a field value
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Integer(Option<i64>),
    Integers(Option<&'a [i64]>),
}

impl FieldValue<'_> {
    fn context(&self) -> String {
        match self {
            FieldValue::Text(Some(s)) => (*s).to_string(),
            FieldValue::Integer(Some(n)) => n.to_string(),
            FieldValue::Integers(Some(items)) => format!("{:?}", items),
            FieldValue::Text(None) | FieldValue::Integer(None) | FieldValue::Integers(None) => {
                "<absent>".to_string()
            }
        }
    }
}

/// Field declaration: a named value plus the rules bound to it
#[derive(Debug, Clone)]
pub struct Field<'a> {
    name: &'static str,
    value: FieldValue<'a>,
    rules: Vec<Rule>,
    each: Vec<Rule>,
}

impl<'a> Field<'a> {
    pub fn text(name: &'static str, value: &'a str) -> Self {
        Self::new(name, FieldValue::Text(Some(value)))
    }

    pub fn integer(name: &'static str, value: i64) -> Self {
        Self::new(name, FieldValue::Integer(Some(value)))
    }

    pub fn integers(name: &'static str, value: Option<&'a [i64]>) -> Self {
        Self::new(name, FieldValue::Integers(value))
    }

    pub fn new(name: &'static str, value: FieldValue<'a>) -> Self {
        Self {
            name,
            value,
            rules: Vec::new(),
            each: Vec::new(),
        }
    }

    /// Bind a rule to the field itself
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Bind a rule to every element of a sequence field
    pub fn each(mut self, rule: Rule) -> Self {
        self.each.push(rule);
        self
    }

    /// Evaluate this field, appending violations in element order.
    ///
    /// The first failing field-level rule stops evaluation of the field;
    /// element rules run only once the sequence itself is acceptable, and
    /// every element is checked.
    fn check(&self, out: &mut Vec<Violation>) {
        if let Some(rule) = self.rules.iter().find(|rule| !rule.accepts(&self.value)) {
            out.push(Violation {
                field: self.name.to_string(),
                rule: *rule,
                value: self.value.context(),
            });
            return;
        }

        let FieldValue::Integers(Some(items)) = self.value else {
            return;
        };

        for (index, element) in items.iter().enumerate() {
            if let Some(rule) = self.each.iter().find(|rule| !rule.accepts_element(*element)) {
                out.push(Violation {
                    field: format!("{}[{}]", self.name, index),
                    rule: *rule,
                    value: element.to_string(),
                });
            }
        }
    }
}

/// Implemented by request types that carry declarative rules
pub trait Validate {
    /// Fields in declaration order
    fn fields(&self) -> Vec<Field<'_>>;
}

/// One violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Field path, with `[index]` for sequence elements
    pub field: String,
    pub rule: Rule,
    /// Offending value rendered for diagnostics
    pub value: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.field, self.rule, self.rule.tag())
    }
}

/// Ordered, non-empty list of violations from a single validation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Evaluate every declared field; all-or-nothing result
pub fn validate_fields(fields: &[Field<'_>]) -> Result<(), ValidationErrors> {
    let mut violations = Vec::new();
    for field in fields {
        field.check(&mut violations);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}
