//! Named logger hierarchy
//!
//! Loggers are addressed by dotted names (`"__main__.ibd"`). Asking for a
//! name creates any missing ancestors, so every logger's parent is the
//! logger one dot-segment up, and top-level names hang off the root.

use super::log_level::LogLevel;
use super::logger::Logger;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Name of the root logger
pub const ROOT_LOGGER_NAME: &str = "root";

/// Default name for an application's top-level logger
pub const MAIN_LOGGER_NAME: &str = "__main__";

pub struct LoggerRegistry {
    root: Arc<Logger>,
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    /// A fresh hierarchy whose root has threshold WARNING
    pub fn new() -> Self {
        let root = Logger::new(ROOT_LOGGER_NAME);
        root.set_level(LogLevel::WARN);
        Self {
            root: Arc::new(root),
            loggers: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide hierarchy
    pub fn global() -> &'static LoggerRegistry {
        static GLOBAL: OnceLock<LoggerRegistry> = OnceLock::new();
        GLOBAL.get_or_init(LoggerRegistry::new)
    }

    pub fn root(&self) -> Arc<Logger> {
        Arc::clone(&self.root)
    }

    /// Get or create the logger called `name`
    ///
    /// An empty name or `"root"` returns the root logger.
    pub fn get(&self, name: &str) -> Arc<Logger> {
        if name.is_empty() || name == ROOT_LOGGER_NAME {
            return self.root();
        }

        if let Some(logger) = self.loggers.read().get(name) {
            return Arc::clone(logger);
        }

        let mut loggers = self.loggers.write();
        self.get_or_create(&mut loggers, name)
    }

    fn get_or_create(&self, loggers: &mut HashMap<String, Arc<Logger>>, name: &str) -> Arc<Logger> {
        if let Some(logger) = loggers.get(name) {
            return Arc::clone(logger);
        }

        let parent = match name.rsplit_once('.') {
            Some((parent, _)) if !parent.is_empty() => self.get_or_create(loggers, parent),
            _ => self.root(),
        };

        let logger = Arc::new(Logger::with_parent(name, Some(parent)));
        loggers.insert(name.to_string(), Arc::clone(&logger));
        logger
    }

    pub fn contains(&self, name: &str) -> bool {
        name == ROOT_LOGGER_NAME || self.loggers.read().contains_key(name)
    }

    /// Names of all non-root loggers, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Hierarchical name of `module_name` under `root_name`
///
/// ```
/// use verbose_logger_system::resolve_child_name;
///
/// assert_eq!(resolve_child_name("ibd", "__main__"), "__main__.ibd");
/// ```
pub fn resolve_child_name(module_name: &str, root_name: &str) -> String {
    match (root_name.is_empty(), module_name.is_empty()) {
        (true, _) => module_name.to_string(),
        (false, true) => root_name.to_string(),
        (false, false) => format!("{}.{}", root_name, module_name),
    }
}

/// Get or create a logger in the global hierarchy
pub fn create_logger(name: &str) -> Arc<Logger> {
    LoggerRegistry::global().get(name)
}

/// Logger for `module_name`, a child of `main_name`, in the global hierarchy
pub fn get_logger(module_name: &str, main_name: &str) -> Arc<Logger> {
    create_logger(&resolve_child_name(module_name, main_name))
}
