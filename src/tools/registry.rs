use crate::types::{AppError, Result, ToolDefinition};
use crate::utils::toml_config::UmrahConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn execute(&self, args: Value) -> Result<Value>;
}

/// Deserialize tool arguments, reporting which tool rejected them.
pub fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| AppError::InvalidInput(format!("Invalid arguments for {}: {}", tool, e)))
}

#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    disabled: HashSet<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry that honours `[tools.<name>].enabled`.
    pub fn with_config(config: &UmrahConfig) -> Self {
        let disabled = config
            .tools
            .iter()
            .filter(|(_, tool)| !tool.enabled)
            .map(|(name, _)| name.clone())
            .collect();

        Self {
            tools: HashMap::new(),
            disabled,
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn set_enabled(&mut self, name: &str, enabled: bool) {
        if enabled {
            self.disabled.remove(name);
        } else {
            self.disabled.insert(name.to_string());
        }
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.tools.contains_key(name) && !self.disabled.contains(name)
    }

    /// Definitions of every enabled tool, sorted by name.
    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .values()
            .filter(|tool| !self.disabled.contains(tool.name()))
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    pub fn get_tool_definitions_for(&self, names: &[&str]) -> Vec<ToolDefinition> {
        self.get_tool_definitions()
            .into_iter()
            .filter(|d| names.contains(&d.name.as_str()))
            .collect()
    }

    /// A registry holding only the enabled tools among `names`.
    pub fn subset(&self, names: &[String]) -> ToolRegistry {
        let tools = names
            .iter()
            .filter(|name| self.is_enabled(name))
            .filter_map(|name| self.tools.get(name).map(|t| (name.clone(), Arc::clone(t))))
            .collect();

        ToolRegistry {
            tools,
            disabled: HashSet::new(),
        }
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<Value> {
        match self.tools.get(name) {
            Some(_) if self.disabled.contains(name) => Err(AppError::InvalidInput(format!(
                "Tool is disabled: {}",
                name
            ))),
            Some(tool) => tool.execute(args).await,
            None => Err(AppError::NotFound(format!("Tool not found: {}", name))),
        }
    }

    /// Names of all registered tools, sorted.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether a tool is registered and enabled.
    pub fn has_tool(&self, name: &str) -> bool {
        self.is_enabled(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::toml_config::ToolConfig;
    use serde_json::json;

    struct Constant(&'static str);

    #[async_trait]
    impl Tool for Constant {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Returns its own name"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        async fn execute(&self, _args: Value) -> Result<Value> {
            Ok(json!(self.0))
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Constant("get_city_code")));
        registry.register(Arc::new(Constant("search_hotels")));
        registry.register(Arc::new(Constant("get_visa_info")));
        registry
    }

    #[test]
    fn test_definitions_are_sorted() {
        let names: Vec<String> = registry()
            .get_tool_definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["get_city_code", "get_visa_info", "search_hotels"]);
    }

    #[test]
    fn test_subset_keeps_only_named_tools() {
        let subset = registry().subset(&["search_hotels".to_string(), "missing".to_string()]);
        assert_eq!(subset.tool_names(), vec!["search_hotels"]);
        assert!(!subset.has_tool("get_visa_info"));
    }

    #[tokio::test]
    async fn test_disabled_tools_are_hidden() {
        let mut config = UmrahConfig::default();
        config.tools.insert(
            "search_hotels".to_string(),
            ToolConfig {
                enabled: false,
                ..Default::default()
            },
        );

        let mut registry = ToolRegistry::with_config(&config);
        registry.register(Arc::new(Constant("search_hotels")));
        registry.register(Arc::new(Constant("get_city_code")));

        assert!(!registry.has_tool("search_hotels"));
        assert_eq!(registry.get_tool_definitions().len(), 1);
        assert!(registry.subset(&["search_hotels".to_string()]).is_empty());
        assert!(matches!(
            registry.execute("search_hotels", json!({})).await,
            Err(AppError::InvalidInput(_))
        ));

        registry.set_enabled("search_hotels", true);
        assert_eq!(
            registry.execute("search_hotels", json!({})).await.unwrap(),
            json!("search_hotels")
        );
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let result = registry().execute("currency_converter", json!({})).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
