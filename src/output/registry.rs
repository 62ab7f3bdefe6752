//! Name to handle lookup for serializers and loggers.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

use super::{
    BillSerializer, LorthSerializer, Logger, NullLogger, NullSerializer, Serializer,
};
use crate::config::{BillConfig, OutputConfig};
use crate::{Error, Result};

static NULL_SERIALIZER: Lazy<Arc<dyn Serializer>> = Lazy::new(|| Arc::new(NullSerializer));
static NULL_LOGGER: Lazy<Arc<dyn Logger>> = Lazy::new(|| Arc::new(NullLogger));

/// Registry of named serializers and loggers.
///
/// The registry is an ordinary value owned by whoever assembles the
/// pipeline. Lookups of unknown names return the null objects.
///
/// # Thread Safety
///
/// Registration and lookup take `&self` and may run concurrently.
#[derive(Default)]
pub struct LogRegistry {
    serializers: RwLock<AHashMap<String, Arc<dyn Serializer>>>,
    loggers: RwLock<AHashMap<String, Arc<dyn Logger>>>,
}

impl LogRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in serializers and the null logger.
    pub fn with_builtins(bill: BillConfig) -> Self {
        let registry = Self::new();
        registry.register_serializer(Arc::new(BillSerializer::new(bill)));
        registry.register_serializer(Arc::new(LorthSerializer));
        registry.register_serializer(NULL_SERIALIZER.clone());
        registry.register_logger(NULL_LOGGER.clone());
        registry
    }

    /// Register a serializer under its name.
    ///
    /// Returns `false` and keeps the existing entry if the name is taken.
    pub fn register_serializer(&self, serializer: Arc<dyn Serializer>) -> bool {
        let mut serializers = self.serializers.write();
        if serializers.contains_key(serializer.name()) {
            return false;
        }
        serializers.insert(serializer.name().to_string(), serializer);
        true
    }

    /// Register a logger under its name.
    ///
    /// Returns `false` and keeps the existing entry if the name is taken.
    pub fn register_logger(&self, logger: Arc<dyn Logger>) -> bool {
        let mut loggers = self.loggers.write();
        if loggers.contains_key(logger.name()) {
            return false;
        }
        loggers.insert(logger.name().to_string(), logger);
        true
    }

    /// Look up a serializer, falling back to the null serializer.
    pub fn serializer(&self, name: &str) -> Arc<dyn Serializer> {
        match self.serializers.read().get(name) {
            Some(serializer) => Arc::clone(serializer),
            None => {
                log::error!("unknown serializer {:?}, using null serializer", name);
                NULL_SERIALIZER.clone()
            }
        }
    }

    /// Look up a logger, falling back to the null logger.
    pub fn logger(&self, name: &str) -> Arc<dyn Logger> {
        match self.loggers.read().get(name) {
            Some(logger) => Arc::clone(logger),
            None => {
                log::error!("unknown logger {:?}, using null logger", name);
                NULL_LOGGER.clone()
            }
        }
    }

    /// Look up the serializer and logger named by `config`.
    ///
    /// Unlike the single lookups this fails on unknown names instead of
    /// falling back to null objects.
    pub fn resolve(&self, config: &OutputConfig) -> Result<(Arc<dyn Serializer>, Arc<dyn Logger>)> {
        let serializer = self
            .serializers
            .read()
            .get(&config.serializer)
            .cloned()
            .ok_or_else(|| Error::Config(format!("unknown serializer: {}", config.serializer)))?;
        let logger = self
            .loggers
            .read()
            .get(&config.logger)
            .cloned()
            .ok_or_else(|| Error::Config(format!("unknown logger: {}", config.logger)))?;
        Ok((serializer, logger))
    }

    pub fn contains_serializer(&self, name: &str) -> bool {
        self.serializers.read().contains_key(name)
    }

    pub fn contains_logger(&self, name: &str) -> bool {
        self.loggers.read().contains_key(name)
    }

    /// Registered serializer names, sorted.
    pub fn serializer_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.serializers.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tree;
    use parking_lot::Mutex;

    struct Collect {
        trees: Mutex<Vec<Tree>>,
    }

    impl Logger for Collect {
        fn name(&self) -> &str {
            "collect"
        }

        fn log(&self, tree: Tree) {
            self.trees.lock().push(tree);
        }
    }

    #[test]
    fn test_builtins() {
        let registry = LogRegistry::with_builtins(BillConfig::default());
        assert_eq!(registry.serializer_names(), vec!["bill", "lorth", "null"]);
        assert!(registry.serializer("bill").is_binary());
        assert_eq!(registry.serializer("lorth").name(), "lorth");
        assert!(registry.contains_logger("null"));
    }

    #[test]
    fn test_unknown_names_fall_back_to_null() {
        let registry = LogRegistry::new();
        assert!(!registry.contains_serializer("csv"));
        assert_eq!(registry.serializer("csv").name(), "null");
        assert_eq!(registry.logger("pipe").name(), "null");
    }

    #[test]
    fn test_register_logger() {
        let registry = LogRegistry::new();
        let collect = Arc::new(Collect {
            trees: Mutex::new(Vec::new()),
        });
        assert!(registry.register_logger(collect.clone()));
        assert!(!registry.register_logger(collect.clone()));

        let logger = registry.logger("collect");
        logger.log(Tree::new("$").unwrap().with_text("a"));
        logger.log(Tree::new("$").unwrap().with_text("b"));
        assert_eq!(collect.trees.lock().len(), 2);
    }

    #[test]
    fn test_resolve_config() {
        let registry = LogRegistry::with_builtins(BillConfig::default());
        let config = OutputConfig::from_yaml_str("{serializer: lorth, logger: collect}").unwrap();
        assert!(matches!(registry.resolve(&config), Err(Error::Config(_))));

        let collect = Arc::new(Collect {
            trees: Mutex::new(Vec::new()),
        });
        registry.register_logger(collect.clone());
        let (serializer, logger) = registry.resolve(&config).unwrap();
        assert_eq!(serializer.name(), "lorth");
        assert_eq!(logger.name(), "collect");

        let (serializer, logger) = registry.resolve(&OutputConfig::default()).unwrap();
        assert_eq!(serializer.name(), "bill");
        assert_eq!(logger.name(), "null");
    }

    #[test]
    fn test_duplicate_serializer_keeps_first() {
        let registry = LogRegistry::new();
        assert!(registry.register_serializer(Arc::new(BillSerializer::default())));
        let no_root = BillSerializer::new(BillConfig {
            no_root_node: true,
            ..BillConfig::default()
        });
        assert!(!registry.register_serializer(Arc::new(no_root)));
        assert_eq!(registry.serializer_names(), vec!["bill"]);
    }

    #[test]
    fn test_concurrent_lookup() {
        let registry = Arc::new(LogRegistry::with_builtins(BillConfig::default()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.serializer("lorth").name().to_string())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "lorth");
        }
    }
}
