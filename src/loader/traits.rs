//! Executable unit contracts
//!
//! Core traits for the units a locator resolves to: renderable UI
//! components and callable services, plus the `Resolver` seam that turns a
//! locator string into a concrete implementation. Concrete resolvers
//! (registry-backed, filesystem-based, remote-fetch-based) are
//! interchangeable behind the `Resolver` trait without touching loader or
//! discovery logic.

use crate::loader::error::ResolveResult;
use crate::registry::types::{ExecutionContext, ExecutionResult};
use serde_json::Value;
use std::sync::Arc;

/// A renderable UI unit
pub trait Component: Send + Sync {
    /// Render the component with the supplied props
    fn render(&self, props: &Value) -> RenderOutput;

    /// Self-describing metadata, when the implementation carries any
    ///
    /// Implementations without metadata still resolve and render; the
    /// module validator reports the absence as a warning, not an error.
    fn metadata(&self) -> Option<ComponentMetadata> {
        None
    }
}

/// Rendered output of a component
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub markup: String,
    /// Set when the output is an error notice rather than real content
    pub is_error: bool,
}

impl RenderOutput {
    pub fn content(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            is_error: false,
        }
    }

    pub fn error_notice(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            is_error: true,
        }
    }
}

/// Self-describing component metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMetadata {
    pub name: String,
    pub description: String,
}

/// A callable service implementation
#[async_trait::async_trait]
pub trait Service: Send + Sync {
    /// Service metadata for diagnostics and tooling
    fn metadata(&self) -> ServiceMetadata;

    /// Check caller-supplied input against the service's input contract
    fn validate(&self, input: &Value) -> InputValidation;

    /// Execute the service
    ///
    /// Failure is reported in-band through the returned result; a service
    /// returning `Err`-like conditions any other way (including panicking)
    /// is contained by the registry's execution pipeline.
    async fn execute(&self, input: &Value, context: &ExecutionContext) -> ExecutionResult;
}

/// Service metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceMetadata {
    pub name: String,
    pub description: String,
    /// Set on fallback stand-ins substituted for failed resolutions
    pub is_error_placeholder: bool,
}

impl ServiceMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            is_error_placeholder: false,
        }
    }
}

/// Outcome of input validation against a service's input contract
#[derive(Debug, Clone, PartialEq)]
pub struct InputValidation {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl InputValidation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<FieldError>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

/// A per-field validation failure
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Resolves a locator string to a concrete implementation
///
/// Resolution failures are reported as errors here; the loader decides
/// whether to substitute a fallback stand-in or surface the failure (the
/// discovery scan needs the raw error to record a module as failed).
#[async_trait::async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve_component(&self, locator: &str) -> ResolveResult<Arc<dyn Component>>;
    async fn resolve_service(&self, locator: &str) -> ResolveResult<Arc<dyn Service>>;
}
