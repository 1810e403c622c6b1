//! Parser warnings routed through the `log` facade.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the schema and parser components to report configuration that is
//! accepted but ignored (an unknown rule, an impossible root block).

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about ignored configuration (emits once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("Parser", "forced root block 'li' is not valid inside 'body'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .map(|mut guard| guard.get_or_insert_with(HashSet::new).insert(key))
        .unwrap_or(true);

    if should_emit {
        log::warn!(target: "quokka", "[Quokka {component}] {message}");
    }
}

/// Clear all recorded warnings (call when reconfiguring a parser)
pub fn clear_warnings() {
    if let Ok(mut guard) = WARNED.lock()
        && let Some(set) = guard.as_mut()
    {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded(key: &str) -> bool {
        WARNED
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|set| set.contains(key))
    }

    // One test so the shared set is not cleared by a concurrent case.
    #[test]
    fn test_warn_once_records_until_cleared() {
        warn_once("Test", "recorded once");
        assert!(recorded("[Test] recorded once"));

        clear_warnings();
        assert!(!recorded("[Test] recorded once"));

        warn_once("Test", "recorded once");
        assert!(recorded("[Test] recorded once"));
    }
}
