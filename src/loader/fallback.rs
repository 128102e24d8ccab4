//! Fallback stand-ins for failed resolutions
//!
//! One missing or broken plugin must never crash the host application.
//! When resolution fails, the loader substitutes one of these stand-ins:
//! a component that renders a visible error notice, or a service whose
//! every execution reports `SERVICE_LOAD_ERROR` in-band.

use crate::loader::traits::{
    Component, FieldError, InputValidation, RenderOutput, Service, ServiceMetadata,
};
use crate::registry::types::{ErrorCode, ExecutionContext, ExecutionResult};
use serde_json::Value;

/// Component stand-in that renders a visible error notice
#[derive(Debug)]
pub struct FallbackComponent {
    locator: String,
    reason: String,
}

impl FallbackComponent {
    pub fn new(locator: &str, reason: &str) -> Self {
        Self {
            locator: locator.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl Component for FallbackComponent {
    fn render(&self, _props: &Value) -> RenderOutput {
        RenderOutput::error_notice(format!(
            "Component '{}' failed to load: {}",
            self.locator, self.reason
        ))
    }
}

/// Service stand-in whose execution always fails with SERVICE_LOAD_ERROR
#[derive(Debug)]
pub struct FallbackService {
    locator: String,
    reason: String,
}

impl FallbackService {
    pub fn new(locator: &str, reason: &str) -> Self {
        Self {
            locator: locator.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Service for FallbackService {
    fn metadata(&self) -> ServiceMetadata {
        ServiceMetadata {
            name: format!("error-placeholder:{}", self.locator),
            description: format!("Placeholder for service that failed to load: {}", self.reason),
            is_error_placeholder: true,
        }
    }

    fn validate(&self, _input: &Value) -> InputValidation {
        InputValidation::invalid(vec![FieldError::new(
            "service",
            format!("Service '{}' is unavailable", self.locator),
        )])
    }

    async fn execute(&self, _input: &Value, _context: &ExecutionContext) -> ExecutionResult {
        ExecutionResult::failed(
            ErrorCode::ServiceLoadError,
            format!("Service '{}' failed to load: {}", self.locator, self.reason),
            false,
        )
    }
}
