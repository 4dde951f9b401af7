//! Static method table
//!
//! The gateway exposes a closed set of methods, each with a version string
//! and an input/output schema description. The table is fixed at startup.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

/// Declared version plus schema description for one method
#[derive(Debug, Clone, Serialize)]
pub struct MethodSpec {
    pub version: &'static str,
    pub input: serde_json::Value,
    pub output: serde_json::Value,
}

/// The closed method table
pub struct MethodRegistry {
    methods: BTreeMap<&'static str, MethodSpec>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        let mut methods = BTreeMap::new();
        methods.insert(
            "myth.parse",
            MethodSpec {
                version: "v0",
                input: json!({ "doc": "str", "language": "str | None", "ocr": "bool | None" }),
                output: json!({ "entities": "list", "motifs": "list", "relations": "list" }),
            },
        );
        methods.insert(
            "geo.link",
            MethodSpec {
                version: "v0",
                input: json!({ "places": "list[str]", "context": "dict | None" }),
                output: json!({ "locations": "list", "uncertainty": "list" }),
            },
        );
        methods.insert(
            "time.align",
            MethodSpec {
                version: "v0",
                input: json!({ "phrases": "list[str]" }),
                output: json!({ "intervals": "list", "distributions": "list" }),
            },
        );
        methods.insert(
            "events.query",
            MethodSpec {
                version: "v0",
                input: json!({ "filters": "dict" }),
                output: json!({ "events": "list" }),
            },
        );
        methods.insert(
            "hypothesis.test",
            MethodSpec {
                version: "v0",
                input: json!({ "narratives": "list", "events": "list" }),
                output: json!({ "ecr": "float", "p_value": "float", "effect_size": "float" }),
            },
        );
        methods.insert(
            "viz.render",
            MethodSpec {
                version: "v0",
                input: json!({ "config": "dict" }),
                output: json!({ "artifact": "dict" }),
            },
        );
        Self { methods }
    }

    pub fn get(&self, method: &str) -> Option<&MethodSpec> {
        self.methods.get(method)
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Capability list, in stable order
    pub fn capabilities(&self) -> Vec<&'static str> {
        self.methods.keys().copied().collect()
    }

    /// The full capability manifest
    pub fn manifest(&self) -> serde_json::Value {
        json!({
            "agent": {
                "id": "geomyth.gateway",
                "name": "Geomyth Gateway",
                "version": geomyth_common::VERSION,
                "capabilities": self.capabilities(),
            },
            "methods": &self.methods,
        })
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}
