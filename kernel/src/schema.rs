use error_stack::Report;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{KernelError, Violation};

const NOT_BLANK_MESSAGE: &str = "This value should not be blank.";
const NOT_NULL_MESSAGE: &str = "This value should not be null.";
const CHOICE_MESSAGE: &str = "The value you selected is not a valid choice.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    /// Reference to another resource, named by its resource name.
    Reference(&'static str),
    DateTime,
}

impl FieldKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Integer => "int",
            FieldKind::Reference(resource) => *resource,
            FieldKind::DateTime => "DateTimeInterface",
        }
    }

    fn accepts(&self, value: &FieldValue<'_>) -> bool {
        matches!(
            (self, value),
            (_, FieldValue::Null)
                | (FieldKind::Text, FieldValue::Text(_))
                | (FieldKind::Integer, FieldValue::Integer(_))
                | (FieldKind::Reference(_), FieldValue::Reference(_))
                | (FieldKind::DateTime, FieldValue::DateTime(_))
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Rejects null and the empty string.
    NotBlank,
    NotNull,
    /// Inclusive integer bounds.
    Range { min: i64, max: i64 },
    Choice(&'static [&'static str]),
}

impl Constraint {
    fn check_null(&self) -> Option<String> {
        match self {
            Constraint::NotBlank => Some(NOT_BLANK_MESSAGE.to_string()),
            Constraint::NotNull => Some(NOT_NULL_MESSAGE.to_string()),
            Constraint::Range { .. } | Constraint::Choice(_) => None,
        }
    }

    fn check(&self, value: &FieldValue<'_>) -> Option<String> {
        match (self, value) {
            (Constraint::NotBlank, FieldValue::Text(text)) if text.is_empty() => {
                Some(NOT_BLANK_MESSAGE.to_string())
            }
            (Constraint::Range { min, max }, FieldValue::Integer(value))
                if value < min || value > max =>
            {
                Some(format!("This value should be between {min} and {max}."))
            }
            (Constraint::Choice(choices), FieldValue::Text(text))
                if !choices.iter().any(|choice| choice == text) =>
            {
                Some(CHOICE_MESSAGE.to_string())
            }
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct FieldSchema {
    name: &'static str,
    kind: FieldKind,
    nullable: bool,
    constraints: &'static [Constraint],
}

impl FieldSchema {
    pub const fn new(
        name: &'static str,
        kind: FieldKind,
        nullable: bool,
        constraints: &'static [Constraint],
    ) -> Self {
        Self {
            name,
            kind,
            nullable,
            constraints,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Raised when a submitted value cannot be read as this field's kind.
    pub fn type_violation(&self) -> Violation {
        Violation::new(
            self.name,
            format!("This value should be of type {}.", self.kind.type_name()),
        )
    }

    fn check(&self, value: FieldValue<'_>) -> Vec<Violation> {
        if let FieldValue::Null = value {
            let mut messages = self
                .constraints
                .iter()
                .filter_map(Constraint::check_null)
                .collect::<Vec<_>>();
            if messages.is_empty() && !self.nullable {
                messages.push(NOT_NULL_MESSAGE.to_string());
            }
            return messages
                .into_iter()
                .map(|message| Violation::new(self.name, message))
                .collect();
        }
        if !self.kind.accepts(&value) {
            return vec![self.type_violation()];
        }
        self.constraints
            .iter()
            .filter_map(|constraint| constraint.check(&value))
            .map(|message| Violation::new(self.name, message))
            .collect()
    }
}

/// Field-level description of a resource, independent of how it is stored.
#[derive(Debug)]
pub struct ResourceSchema {
    resource: &'static str,
    fields: &'static [FieldSchema],
}

impl ResourceSchema {
    pub const fn new(resource: &'static str, fields: &'static [FieldSchema]) -> Self {
        Self { resource, fields }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn fields(&self) -> &'static [FieldSchema] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Checks every field of `target` and reports all violations at once.
    ///
    /// A field listed in [`Inspect::mistyped`] reports its type violation in place of
    /// the constraint checks.
    pub fn validate<T: Inspect + ?Sized>(
        &self,
        target: &T,
    ) -> error_stack::Result<(), KernelError> {
        let mistyped = target.mistyped();
        self.reject(self.fields.iter().flat_map(|field| {
            let found = mistyped
                .iter()
                .filter(|violation| violation.property_path() == field.name)
                .cloned()
                .collect::<Vec<_>>();
            if found.is_empty() {
                field.check(target.field(field.name))
            } else {
                found
            }
        }))
    }

    /// Fails with every given violation, or succeeds when there are none.
    pub fn reject(
        &self,
        violations: impl IntoIterator<Item = Violation>,
    ) -> error_stack::Result<(), KernelError> {
        let mut violations = violations.into_iter();
        let Some(first) = violations.next() else {
            return Ok(());
        };
        let report = violations.fold(
            Report::new(KernelError::Validation).attach_printable(first),
            |report, violation| report.attach_printable(violation),
        );
        Err(report.attach_printable(format!("{} failed validation", self.resource)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Null,
    Text(&'a str),
    Integer(i64),
    Reference(&'a Uuid),
    DateTime(&'a OffsetDateTime),
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Text)
    }
}

impl<'a> From<Option<i64>> for FieldValue<'a> {
    fn from(value: Option<i64>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Integer)
    }
}

impl<'a> From<Option<&'a Uuid>> for FieldValue<'a> {
    fn from(value: Option<&'a Uuid>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Reference)
    }
}

impl<'a> From<Option<&'a OffsetDateTime>> for FieldValue<'a> {
    fn from(value: Option<&'a OffsetDateTime>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::DateTime)
    }
}

/// Exposes field values by name so a [`ResourceSchema`] can validate them.
pub trait Inspect {
    fn field(&self, name: &str) -> FieldValue<'_>;

    /// Submitted values that could not be read as their field's kind.
    fn mistyped(&self) -> &[Violation] {
        &[]
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::{Constraint, FieldKind, FieldSchema, FieldValue, Inspect, ResourceSchema};
    use crate::{KernelError, Violation};

    static FIELDS: [FieldSchema; 3] = [
        FieldSchema::new("name", FieldKind::Text, false, &[Constraint::NotBlank]),
        FieldSchema::new(
            "score",
            FieldKind::Integer,
            false,
            &[Constraint::Range { min: 1, max: 3 }],
        ),
        FieldSchema::new(
            "grade",
            FieldKind::Text,
            true,
            &[Constraint::Choice(&["x", "y"])],
        ),
    ];

    static SCHEMA: ResourceSchema = ResourceSchema::new("Sample", &FIELDS);

    struct Sample(HashMap<&'static str, FieldValue<'static>>, Vec<Violation>);

    impl Inspect for Sample {
        fn field(&self, name: &str) -> FieldValue<'_> {
            self.0.get(name).copied().unwrap_or(FieldValue::Null)
        }

        fn mistyped(&self) -> &[Violation] {
            &self.1
        }
    }

    fn sample(values: &[(&'static str, FieldValue<'static>)]) -> Sample {
        Sample(values.iter().copied().collect(), Vec::new())
    }

    fn messages(sample: &Sample) -> Vec<(String, String)> {
        let report = SCHEMA.validate(sample).unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Validation));
        Violation::collect(&report)
            .into_iter()
            .map(|v| (v.property_path().to_string(), v.message().to_string()))
            .collect()
    }

    #[test]
    fn accepts_valid_values() {
        let valid = sample(&[
            ("name", FieldValue::Text("ok")),
            ("score", FieldValue::Integer(2)),
        ]);
        assert!(SCHEMA.validate(&valid).is_ok());
    }

    #[test]
    fn reports_every_violation_in_field_order() {
        let invalid = sample(&[
            ("name", FieldValue::Text("")),
            ("score", FieldValue::Integer(9)),
            ("grade", FieldValue::Text("z")),
        ]);
        assert_eq!(
            messages(&invalid),
            vec![
                ("name".into(), "This value should not be blank.".into()),
                ("score".into(), "This value should be between 1 and 3.".into()),
                (
                    "grade".into(),
                    "The value you selected is not a valid choice.".into()
                ),
            ]
        );
    }

    #[test]
    fn null_in_non_nullable_field_without_constraint_is_rejected() {
        let invalid = sample(&[("name", FieldValue::Text("ok"))]);
        assert_eq!(
            messages(&invalid),
            vec![("score".into(), "This value should not be null.".into())]
        );
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let invalid = sample(&[
            ("name", FieldValue::Integer(1)),
            ("score", FieldValue::Integer(1)),
        ]);
        assert_eq!(
            messages(&invalid),
            vec![("name".into(), "This value should be of type string.".into())]
        );
    }

    #[test]
    fn mistyped_fields_join_constraint_violations() {
        let mut invalid = sample(&[("name", FieldValue::Text(""))]);
        invalid.1.push(FIELDS[1].type_violation());
        assert_eq!(
            messages(&invalid),
            vec![
                ("name".into(), "This value should not be blank.".into()),
                ("score".into(), "This value should be of type int.".into()),
            ]
        );
    }
}
