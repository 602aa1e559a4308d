//! Entry-point heuristics (§4.6).
//!
//! A definition assumed reachable without explicit caller evidence: program
//! entry points, FFI exports, exported symbols, test functions, and a set
//! of framework-callback naming conventions (HTTP handlers, event
//! handlers, lifecycle methods) that real call graphs can't see through
//! reflection or registration tables.

use crate::models::Definition;

const HTTP_SUFFIXES: &[&str] = &[
    "Handler", "handler", "Endpoint", "endpoint", "Controller", "controller",
];
const HTTP_PREFIXES: &[&str] = &[
    "Get", "Post", "Put", "Delete", "Patch", "Head", "Options",
];
const HTTP_EXACT: &[&str] = &["ServeHTTP", "Handle", "serve"];

const EVENT_PREFIXES: &[&str] = &["On", "on", "Handle", "handle"];
const EVENT_SUFFIXES: &[&str] = &["Callback", "callback", "Listener", "listener", "Observer", "observer"];

const LIFECYCLE_NAMES: &[&str] = &[
    "Setup", "Teardown", "__init__", "__del__", "__enter__", "__exit__",
    "setUp", "tearDown", "componentDidMount", "componentWillUnmount", "useEffect",
    "Initialize", "Start", "Stop", "Connect", "Disconnect", "Dispose",
];

const GO_TEST_PREFIXES: &[&str] = &["Test", "test", "Benchmark", "Example", "Fuzz"];

pub fn is_entry_point(def: &Definition) -> bool {
    let name = def.name.as_str();

    if matches!(name, "main" | "init" | "Main") {
        return true;
    }
    if def.is_ffi {
        return true;
    }
    if def.exported {
        return true;
    }
    if GO_TEST_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return true;
    }
    if is_http_handler(name) {
        return true;
    }
    if is_event_handler(name) {
        return true;
    }
    if LIFECYCLE_NAMES.contains(&name) {
        return true;
    }

    false
}

fn is_http_handler(name: &str) -> bool {
    if HTTP_EXACT.contains(&name) {
        return true;
    }
    if HTTP_SUFFIXES.iter().any(|s| name.ends_with(s)) {
        return true;
    }
    HTTP_PREFIXES
        .iter()
        .any(|p| name.len() > p.len() && name.starts_with(p))
}

fn is_event_handler(name: &str) -> bool {
    if EVENT_SUFFIXES.iter().any(|s| name.ends_with(s)) {
        return true;
    }
    EVENT_PREFIXES
        .iter()
        .any(|p| name.len() > p.len() && name.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Definition, DefinitionKind, Visibility};
    use std::path::PathBuf;

    fn def(name: &str) -> Definition {
        Definition::new(
            name,
            DefinitionKind::Function,
            PathBuf::from("a.go"),
            1,
            2,
            Visibility::Private,
            false,
        )
    }

    #[test]
    fn test_main_init_are_entry_points() {
        assert!(is_entry_point(&def("main")));
        assert!(is_entry_point(&def("init")));
        assert!(is_entry_point(&def("Main")));
    }

    #[test]
    fn test_ffi_is_entry_point() {
        let mut d = def("api_call");
        d.is_ffi = true;
        assert!(is_entry_point(&d));
    }

    #[test]
    fn test_exported_is_entry_point() {
        let mut d = def("DoThing");
        d.exported = true;
        assert!(is_entry_point(&d));
    }

    #[test]
    fn test_go_test_prefixes() {
        assert!(is_entry_point(&def("TestFoo")));
        assert!(is_entry_point(&def("BenchmarkFoo")));
        assert!(is_entry_point(&def("FuzzFoo")));
    }

    #[test]
    fn test_http_handler_heuristics() {
        assert!(is_entry_point(&def("UserHandler")));
        assert!(is_entry_point(&def("GetUser")));
        assert!(is_entry_point(&def("ServeHTTP")));
        // bare prefix with no trailing chars doesn't count
        assert!(!is_entry_point(&def("Get")));
    }

    #[test]
    fn test_event_handler_heuristics() {
        assert!(is_entry_point(&def("onClick")));
        assert!(is_entry_point(&def("clickCallback")));
        assert!(!is_entry_point(&def("on")));
    }

    #[test]
    fn test_lifecycle_names() {
        assert!(is_entry_point(&def("__init__")));
        assert!(is_entry_point(&def("useEffect")));
        assert!(is_entry_point(&def("Dispose")));
    }

    #[test]
    fn test_ordinary_private_function_is_not_entry_point() {
        assert!(!is_entry_point(&def("helperFn")));
    }
}
