//! Type definitions for the module subsystem
//!
//! Modules are coarser-grained than features: deployable units with their
//! own manifest, read from an externally-owned "system modules" table and
//! materialized into the in-memory module registry by discovery.

use serde::{Deserialize, Serialize};

/// Default load order assigned when a declaration does not specify one
pub const DEFAULT_LOAD_ORDER: i32 = 100;

/// Default version assigned when a declaration does not specify one
pub const DEFAULT_MODULE_VERSION: &str = "1.0.0";

/// A module declaration row as read from the backing store
///
/// Optional fields mirror columns the external table allows to be null;
/// discovery fills in the defaults when synthesizing the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    pub module_id: String,
    pub name: String,
    pub version: Option<String>,
    pub description: String,
    pub category: String,
    pub author: String,
    pub dependencies: Vec<String>,
    pub entry_point: Option<String>,
    pub permissions: Vec<String>,
    pub supported_tiers: Vec<String>,
    pub load_order: Option<i32>,
    pub auto_load: Option<bool>,
    pub unloadable: bool,
    pub min_runtime_version: Option<String>,
    pub is_active: bool,
}

impl ModuleDeclaration {
    /// Minimal active declaration for a module id
    pub fn new(module_id: &str, name: &str) -> Self {
        Self {
            module_id: module_id.to_string(),
            name: name.to_string(),
            version: None,
            description: String::new(),
            category: String::new(),
            author: String::new(),
            dependencies: Vec::new(),
            entry_point: None,
            permissions: Vec::new(),
            supported_tiers: Vec::new(),
            load_order: None,
            auto_load: None,
            unloadable: true,
            min_runtime_version: None,
            is_active: true,
        }
    }
}

/// The synthesized manifest of a registered module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleManifest {
    pub module_id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub category: String,
    pub author: String,
    pub dependencies: Vec<String>,
    pub entry_point: String,
    pub permissions: Vec<String>,
    pub supported_tiers: Vec<String>,
    pub load_order: i32,
    pub auto_load: bool,
    pub unloadable: bool,
    pub min_runtime_version: Option<String>,
}

impl ModuleManifest {
    /// Synthesize a manifest from a declaration, defaulting absent fields
    ///
    /// Defaults: version `1.0.0`, empty dependency list left as declared,
    /// canonical entry point `modules/<id>/index`, load order 100, and
    /// auto-load mirroring the declaration's active flag.
    pub fn from_declaration(declaration: &ModuleDeclaration) -> Self {
        Self {
            module_id: declaration.module_id.clone(),
            name: declaration.name.clone(),
            version: declaration
                .version
                .clone()
                .unwrap_or_else(|| DEFAULT_MODULE_VERSION.to_string()),
            description: declaration.description.clone(),
            category: declaration.category.clone(),
            author: declaration.author.clone(),
            dependencies: declaration.dependencies.clone(),
            entry_point: declaration
                .entry_point
                .clone()
                .unwrap_or_else(|| format!("modules/{}/index", declaration.module_id)),
            permissions: declaration.permissions.clone(),
            supported_tiers: declaration.supported_tiers.clone(),
            load_order: declaration.load_order.unwrap_or(DEFAULT_LOAD_ORDER),
            auto_load: declaration.auto_load.unwrap_or(declaration.is_active),
            unloadable: declaration.unloadable,
            min_runtime_version: declaration.min_runtime_version.clone(),
        }
    }
}

/// A per-module failure recorded during discovery
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleFailure {
    pub module_id: String,
    pub error: String,
}

/// Outcome of a discovery scan
///
/// `registered` and `failed` partition the set of active declarations:
/// every scanned module appears in exactly one of the two lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveryOutcome {
    pub registered: Vec<String>,
    pub failed: Vec<ModuleFailure>,
}

/// Outcome of validating a registered module
///
/// Hard errors set `is_valid` to false and must block activation;
/// warnings surface in tooling but do not.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_defaults_for_sparse_declaration() {
        let declaration = ModuleDeclaration::new("candidates", "Candidate Pipeline");
        let manifest = ModuleManifest::from_declaration(&declaration);

        assert_eq!(manifest.version, "1.0.0");
        assert_eq!(manifest.entry_point, "modules/candidates/index");
        assert_eq!(manifest.load_order, DEFAULT_LOAD_ORDER);
        assert!(manifest.auto_load); // mirrors is_active
        assert!(manifest.dependencies.is_empty());
    }

    #[test]
    fn test_manifest_keeps_declared_fields() {
        let mut declaration = ModuleDeclaration::new("billing", "Billing");
        declaration.version = Some("2.3.1".to_string());
        declaration.entry_point = Some("modules/billing/Main".to_string());
        declaration.load_order = Some(5);
        declaration.auto_load = Some(false);
        declaration.dependencies = vec!["candidates".to_string()];

        let manifest = ModuleManifest::from_declaration(&declaration);
        assert_eq!(manifest.version, "2.3.1");
        assert_eq!(manifest.entry_point, "modules/billing/Main");
        assert_eq!(manifest.load_order, 5);
        assert!(!manifest.auto_load);
        assert_eq!(manifest.dependencies, vec!["candidates"]);
    }

    #[test]
    fn test_auto_load_mirrors_inactive_flag() {
        let mut declaration = ModuleDeclaration::new("legacy", "Legacy");
        declaration.is_active = false;

        let manifest = ModuleManifest::from_declaration(&declaration);
        assert!(!manifest.auto_load);
    }
}
