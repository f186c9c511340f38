use std::fmt::Display;

use error_stack::{Context, Report};

#[derive(Debug)]
pub enum KernelError {
    Validation,
    NotFound,
    InvalidRequest,
    Concurrency,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Validation => write!(f, "Constraint violation"),
            KernelError::NotFound => write!(f, "Resource not found"),
            KernelError::InvalidRequest => write!(f, "Invalid request"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

/// A single failed constraint, attached to a [`KernelError::Validation`] report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    property_path: String,
    message: String,
}

impl Violation {
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
        }
    }

    pub fn property_path(&self) -> &str {
        &self.property_path
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Violations attached to `report`, in the order they were attached.
    pub fn collect(report: &Report<KernelError>) -> Vec<&Violation> {
        let mut violations = report
            .frames()
            .filter_map(|frame| frame.downcast_ref::<Violation>())
            .collect::<Vec<_>>();
        violations.reverse();
        violations
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.property_path, self.message)
    }
}

pub trait ViolationReport {
    fn violation(property_path: &str, message: impl Into<String>) -> Self;
}

impl ViolationReport for Report<KernelError> {
    fn violation(property_path: &str, message: impl Into<String>) -> Self {
        Report::new(KernelError::Validation)
            .attach_printable(Violation::new(property_path, message))
    }
}
