use std::collections::HashMap;

/// Identity and metadata of a monitored container.
///
/// # Examples
///
/// ```
/// # use creo_wavefront::info::ContainerReference;
/// let reference = ContainerReference::new("/docker/abc123").with_alias("web-1");
/// assert_eq!(reference.display_name(), "web-1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ContainerReference {
    /// Raw container name, e.g. the cgroup path.
    pub name: String,
    /// Alternative names; the first one is preferred for display.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Namespace the container belongs to. Empty if none.
    #[serde(default)]
    pub namespace: String,
    /// Arbitrary user labels attached to the container.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl ContainerReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Returns the name used to identify the container in emitted metrics.
    ///
    /// This is the first alias if one exists, otherwise the raw name.
    pub fn display_name(&self) -> &str {
        self.aliases.first().map_or(self.name.as_str(), String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_without_alias() {
        let reference = ContainerReference::new("c1");
        assert_eq!(reference.display_name(), "c1");
    }

    #[test]
    fn test_display_name_uses_first_alias() {
        let reference = ContainerReference::new("/docker/0123abcd")
            .with_alias("web-1")
            .with_alias("web");
        assert_eq!(reference.display_name(), "web-1");
    }

    #[test]
    fn test_deserialize_minimal() {
        let reference: ContainerReference = serde_json::from_str(r#"{"name":"c1"}"#).unwrap();
        assert_eq!(reference, ContainerReference::new("c1"));
    }

    #[test]
    fn test_deserialize_full() {
        let data = r#"{
            "name": "/kubepods/pod1/abc",
            "aliases": ["nginx"],
            "namespace": "prod",
            "labels": {"app": "frontend"}
        }"#;
        let reference: ContainerReference = serde_json::from_str(data).unwrap();
        assert_eq!(reference.display_name(), "nginx");
        assert_eq!(reference.namespace, "prod");
        assert_eq!(reference.labels.get("app").map(String::as_str), Some("frontend"));
    }
}
