//! Type definitions for the feature registry
//!
//! This module contains the core data structures used throughout the
//! runtime for feature declarations, execution context and the uniform
//! in-band execution result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// A declared feature: the unit of pluggable behaviour
///
/// The `feature_id` is the sole join key used by the loader, validator and
/// registry. A declaration with `is_active = false` is logically deleted:
/// it is never returned by lookups or executed, but its stored row is
/// retained for audit history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDeclaration {
    pub feature_id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub is_active: bool,

    /// Structural description of accepted input
    pub input_schema: Value,
    /// Structural description of produced output
    pub output_schema: Value,

    /// Locator of the renderable UI unit, if any
    pub component_locator: Option<String>,
    /// Locator of the callable service, if any
    pub service_locator: Option<String>,

    pub category: String,
    pub tags: Vec<String>,

    pub config: FeatureConfig,
    pub dependencies: Vec<String>,
    pub requirements: Vec<String>,

    pub created_by: String,
    pub updated_at: DateTime<Utc>,
}

impl FeatureDeclaration {
    /// Minimal active declaration with empty schemas and no implementations
    pub fn new(feature_id: &str, name: &str) -> Self {
        Self {
            feature_id: feature_id.to_string(),
            name: name.to_string(),
            description: String::new(),
            version: "1.0.0".to_string(),
            is_active: true,
            input_schema: Value::Null,
            output_schema: Value::Null,
            component_locator: None,
            service_locator: None,
            category: String::new(),
            tags: Vec::new(),
            config: FeatureConfig::default(),
            dependencies: Vec::new(),
            requirements: Vec::new(),
            created_by: String::new(),
            updated_at: Utc::now(),
        }
    }
}

/// Policy flags declared on a feature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Failures inside this feature must not affect its siblings
    pub isolated: bool,
    /// The feature holds no state between executions
    pub stateless: bool,
    /// The feature may be replaced at runtime
    pub pluggable: bool,
}

/// Filters for listing feature declarations
///
/// Absent filters match everything; filters combine conjunctively.
#[derive(Debug, Clone, Default)]
pub struct FeatureFilter {
    /// Exact category match
    pub category: Option<String>,
    /// Declaration must carry every listed tag
    pub tags: Vec<String>,
    /// Case-insensitive substring match against name or description
    pub search: Option<String>,
}

impl FeatureFilter {
    pub fn matches(&self, declaration: &FeatureDeclaration) -> bool {
        if let Some(category) = &self.category {
            if &declaration.category != category {
                return false;
            }
        }
        if !self.tags.iter().all(|tag| declaration.tags.contains(tag)) {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_name = declaration.name.to_lowercase().contains(&needle);
            let in_description = declaration.description.to_lowercase().contains(&needle);
            if !in_name && !in_description {
                return false;
            }
        }
        true
    }
}

/// Ambient identity threaded through executions and event dispatch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub feature_id: Option<String>,
    pub tenant_id: Option<String>,
    pub user_id: Option<String>,
}

impl ExecutionContext {
    pub fn for_feature(feature_id: &str) -> Self {
        Self {
            feature_id: Some(feature_id.to_string()),
            ..Default::default()
        }
    }
}

/// Stable error codes carried by in-band execution errors
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::AsRefStr,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    FeatureNotFound,
    ServiceNotFound,
    ModuleNotFound,
    ServiceLoadError,
    ValidationError,
    ExecutionError,
    ExecutionTimeout,
}

/// A structured, in-band execution error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionError {
    pub code: ErrorCode,
    pub message: String,
    /// Whether the caller can reasonably retry after correcting the input
    pub recoverable: bool,
}

impl ExecutionError {
    pub fn new(code: ErrorCode, message: impl Into<String>, recoverable: bool) -> Self {
        Self {
            code,
            message: message.into(),
            recoverable,
        }
    }
}

/// The uniform outcome of any feature execution
///
/// Failure is always represented in-band; nothing on the execution path
/// returns `Err` across the registry boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub data: Option<Value>,
    pub errors: Vec<ExecutionError>,
    /// Elapsed wall-clock time of the `execute` call, when one was made
    pub execution_time: Option<Duration>,
}

impl ExecutionResult {
    /// Successful result carrying a payload
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            errors: Vec::new(),
            execution_time: None,
        }
    }

    /// Failed result with a single structured error
    pub fn failed(code: ErrorCode, message: impl Into<String>, recoverable: bool) -> Self {
        Self {
            success: false,
            data: None,
            errors: vec![ExecutionError::new(code, message, recoverable)],
            execution_time: None,
        }
    }

    /// Failed result carrying multiple errors
    pub fn failed_with(errors: Vec<ExecutionError>) -> Self {
        Self {
            success: false,
            data: None,
            errors,
            execution_time: None,
        }
    }

    /// Attach elapsed execution time
    pub fn with_execution_time(mut self, elapsed: Duration) -> Self {
        self.execution_time = Some(elapsed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn declaration(category: &str, tags: &[&str], name: &str, description: &str) -> FeatureDeclaration {
        let mut decl = FeatureDeclaration::new("f1", name);
        decl.category = category.to_string();
        decl.tags = tags.iter().map(|t| t.to_string()).collect();
        decl.description = description.to_string();
        decl
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let decl = declaration("crm", &["import"], "Bulk import", "Imports candidates");
        assert!(FeatureFilter::default().matches(&decl));
    }

    #[test]
    fn test_category_filter() {
        let decl = declaration("crm", &[], "Bulk import", "");
        let filter = FeatureFilter {
            category: Some("crm".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&decl));

        let filter = FeatureFilter {
            category: Some("analytics".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&decl));
    }

    #[test]
    fn test_tag_filter_requires_all_tags() {
        let decl = declaration("crm", &["import", "bulk"], "Bulk import", "");
        let filter = FeatureFilter {
            tags: vec!["import".to_string(), "bulk".to_string()],
            ..Default::default()
        };
        assert!(filter.matches(&decl));

        let filter = FeatureFilter {
            tags: vec!["import".to_string(), "export".to_string()],
            ..Default::default()
        };
        assert!(!filter.matches(&decl));
    }

    #[test]
    fn test_search_filter_matches_name_or_description() {
        let decl = declaration("crm", &[], "Bulk Import", "Imports candidate records");
        let filter = FeatureFilter {
            search: Some("bulk".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&decl));

        let filter = FeatureFilter {
            search: Some("candidate".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&decl));

        let filter = FeatureFilter {
            search: Some("payroll".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&decl));
    }

    #[test]
    fn test_error_code_wire_form() {
        assert_eq!(ErrorCode::ServiceLoadError.as_ref(), "SERVICE_LOAD_ERROR");
        assert_eq!(ErrorCode::FeatureNotFound.to_string(), "FEATURE_NOT_FOUND");

        let serialized = serde_json::to_string(&ErrorCode::ExecutionTimeout).unwrap();
        assert_eq!(serialized, "\"EXECUTION_TIMEOUT\"");
    }

    #[test]
    fn test_execution_result_constructors() {
        let result = ExecutionResult::ok(json!({"count": 3}));
        assert!(result.success);
        assert!(result.errors.is_empty());

        let result = ExecutionResult::failed(ErrorCode::FeatureNotFound, "no such feature", true);
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorCode::FeatureNotFound);
        assert!(result.errors[0].recoverable);
    }

    #[test]
    fn test_execution_result_serde_round_trip() {
        let result = ExecutionResult::ok(json!({"rows": 10}))
            .with_execution_time(Duration::from_millis(42));
        let encoded = serde_json::to_string(&result).unwrap();
        let decoded: ExecutionResult = serde_json::from_str(&encoded).unwrap();
        assert_eq!(result, decoded);
    }
}
