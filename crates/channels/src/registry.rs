use {super::plugin::ChannelPlugin, std::collections::HashMap, std::sync::Arc};

/// Registry of all loaded channel plugins.
///
/// Injected into the channel manager rather than living as a process-wide
/// singleton, so tests can substitute fakes.
pub struct ChannelRegistry {
    plugins: HashMap<String, Arc<dyn ChannelPlugin>>,
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    pub fn register(&mut self, plugin: Arc<dyn ChannelPlugin>) {
        self.plugins.insert(plugin.id().to_string(), plugin);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn ChannelPlugin>> {
        self.plugins.get(id).cloned()
    }

    #[must_use]
    pub fn all(&self) -> Vec<Arc<dyn ChannelPlugin>> {
        self.plugins.values().cloned().collect()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.plugins.keys().map(|s| s.as_str()).collect()
    }
}
