//! End-to-end resolution behaviour of the endpoint router.

use std::sync::Arc;

use mini_router::cli::CliInvocation;
use mini_router::http::HttpRequestInfo;
use mini_router::routing::{
    RerouteRule, RerouteTable, RouteErrorKind, Router, Signature, Supertype, TypeDescriptor,
    TypeOracle,
};

mod common;
use common::{echo_method, registry, CountingOracle};

fn get(path: &str) -> HttpRequestInfo {
    HttpRequestInfo {
        method: "GET".into(),
        path: path.into(),
    }
}

fn slash_router(oracle: Arc<dyn TypeOracle>) -> Router {
    let mut router = Router::start_http("App", oracle);
    router.set_splitter("/").unwrap();
    router.set_max_sub_dir(2);
    router
}

#[test]
fn test_compact_resolves_nested_type() {
    let oracle = registry(vec![TypeDescriptor::new("App::foo::bar")
        .method(echo_method("GET_", Signature::new().optional("x")))]);

    let mut router = Router::start_http("App", oracle);
    router.prepare(&get("/foo.bar/baz"), None, None).unwrap();
    let route = router.get_route(true).unwrap();

    assert_eq!(route.type_name(), "App::foo::bar");
    assert_eq!(route.action_name(), "");
    assert_eq!(route.exec_params(), ["baz".to_string()]);
    assert_eq!(route.call(), "GET_(baz)");
}

#[test]
fn test_compact_falls_back_to_action() {
    let oracle = registry(vec![TypeDescriptor::new("App::foo")
        .method(echo_method("GET_bar", Signature::new().required("x")))]);

    let mut router = Router::start_http("App", oracle);
    router.prepare(&get("foo.bar/baz"), None, None).unwrap();
    let route = router.get_route(true).unwrap();

    assert_eq!(route.type_name(), "App::foo");
    assert_eq!(route.action_name(), "bar");
    assert_eq!(route.exec_params(), ["baz".to_string()]);
    assert_eq!(router.class_path().as_deref(), Some("foo"));
}

#[test]
fn test_compact_fallback_is_single_step() {
    let oracle = registry(vec![TypeDescriptor::new("App::foo")
        .method(echo_method("GET_bar", Signature::new().variadic("rest")))]);

    let mut router = Router::start_http("App", oracle);
    let err = router.prepare(&get("foo.bar.baz"), None, None).unwrap_err();
    assert_eq!(err.kind(), RouteErrorKind::NotFound);
    assert_eq!(err.subject(), "Class");
}

#[test]
fn test_incremental_consumes_action_segment() {
    let oracle = registry(vec![TypeDescriptor::new("App::foo")
        .method(echo_method("GET_bar", Signature::new().required("x")))
        .method(echo_method("GET_", Signature::new().variadic("rest")))]);

    let mut router = slash_router(oracle);
    router.prepare(&get("foo/bar/baz"), None, None).unwrap();
    let route = router.get_route(true).unwrap();

    assert_eq!(route.type_name(), "App::foo");
    assert_eq!(route.action_name(), "bar");
    assert_eq!(route.exec_params(), ["baz".to_string()]);
}

#[test]
fn test_incremental_falls_back_to_bare_handler() {
    let oracle = registry(vec![TypeDescriptor::new("App::foo")
        .method(echo_method("GET_", Signature::new().variadic("rest")))]);

    let mut router = slash_router(oracle);
    router.prepare(&get("foo/bar/baz"), None, None).unwrap();
    let route = router.get_route(true).unwrap();

    assert_eq!(route.action_name(), "");
    assert_eq!(route.exec_params(), ["bar".to_string(), "baz".to_string()]);
    assert_eq!(route.call(), "GET_(bar,baz)");
}

#[test]
fn test_incremental_search_is_bounded() {
    let oracle = Arc::new(CountingOracle::new(registry(vec![TypeDescriptor::new(
        "App::a::b::c::d",
    )
    .method(echo_method("GET_", Signature::new()))])));

    let mut router = slash_router(oracle.clone());
    let err = router.prepare(&get("a/b/c/d/e"), None, None).unwrap_err();

    assert_eq!(err.kind(), RouteErrorKind::NotFound);
    assert_eq!(err.subject(), "Class");
    assert_eq!(oracle.lookups(), 3);
}

#[test]
fn test_arity_checks() {
    let oracle = registry(vec![TypeDescriptor::new("App::pair")
        .method(echo_method("GET_", Signature::new().required("a").required("b")))
        .method(echo_method("GET_one", Signature::new().optional("a")))]);

    let mut router = Router::start_http("App", oracle.clone());
    router.prepare(&get("pair/1"), None, None).unwrap();
    let err = router.get_route(true).unwrap_err();
    assert_eq!(err.kind(), RouteErrorKind::NotFound);
    assert_eq!(err.subject(), "Params missing: 1");

    let mut router = Router::start_http("App", oracle.clone());
    router.prepare(&get("pair.one/1/2"), None, None).unwrap();
    let err = router.get_route(true).unwrap_err();
    assert_eq!(err.kind(), RouteErrorKind::NotFound);
    assert_eq!(err.subject(), "Too many params");

    let route = router.get_route(false).unwrap();
    assert_eq!(route.exec_params().len(), 2);
}

#[test]
fn test_verb_whitelist() {
    let oracle = registry(vec![TypeDescriptor::new("App::foo")
        .method(echo_method("GET_", Signature::new()))
        .method(echo_method("POST_", Signature::new()))]);

    let mut router = Router::start_http("App", oracle);
    router
        .set_allowed_verbs(Some(vec!["POST".into()]))
        .unwrap();
    router.prepare(&get("foo"), None, None).unwrap();

    let err = router.get_route(true).unwrap_err();
    assert_eq!(err.kind(), RouteErrorKind::MethodNotAllowed);
    assert_eq!(err.subject(), "GET");
    assert_eq!(router.list_allowed_verbs_for_action(""), Some(vec!["POST".to_string()]));
}

#[test]
fn test_prepare_twice_fails() {
    let oracle = registry(vec![
        TypeDescriptor::new("App::foo").method(echo_method("GET_", Signature::new()))
    ]);

    let mut router = Router::start_http("App", oracle);
    router.prepare(&get("foo"), None, None).unwrap();
    let err = router.prepare(&get("foo"), None, None).unwrap_err();
    assert_eq!(err.kind(), RouteErrorKind::Execution);

    // The first resolution survives.
    assert_eq!(router.type_name(), Some("App::foo"));
}

#[test]
fn test_constraint_violation() {
    let oracle = registry(vec![
        TypeDescriptor::new("App::plain").method(echo_method("GET_", Signature::new())),
        TypeDescriptor::new("App::ok")
            .supertype("Endpoint")
            .method(echo_method("GET_", Signature::new())),
    ]);

    let mut router = Router::start_http("App", oracle.clone());
    router.set_parent_constraint(Supertype("Endpoint".into()));
    let err = router.prepare(&get("plain"), None, None).unwrap_err();
    assert_eq!(err.kind(), RouteErrorKind::Forbidden);

    let mut router = Router::start_http("App", oracle);
    router.set_parent_constraint(Supertype("Endpoint".into()));
    router.prepare(&get("ok"), None, None).unwrap();
    assert!(router.get_route(true).is_ok());
}

#[test]
fn test_list_routes_is_idempotent() {
    let oracle = registry(vec![TypeDescriptor::new("App::users")
        .method(echo_method("GET_", Signature::new()))
        .method(echo_method("POST_create", Signature::new().required("name")))
        .method(echo_method("GET_show", Signature::new().required("id").optional("fmt")))
        .method(echo_method("GET_hidden", Signature::new()).into_private())]);

    let mut router = Router::start_http("App", oracle);
    router.prepare(&get("users"), None, None).unwrap();

    let first = router.list_routes().unwrap();
    let second = router.list_routes().unwrap();
    assert_eq!(first, second);

    let summary: Vec<(&str, &str)> = first
        .iter()
        .map(|r| (r.verb.as_str(), r.path.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![("GET", "users"), ("GET", "users.show"), ("POST", "users.create")]
    );
    assert_eq!(first[1].url_params, vec!["{id}".to_string(), "{fmt?}".to_string()]);
}

#[test]
fn test_reroute_rewrites_before_discovery() {
    let oracle = registry(vec![TypeDescriptor::new("App::current")
        .method(echo_method("GET_", Signature::new().variadic("rest")))]);

    let mut router = Router::start_http("App", oracle);
    router.set_reroute(RerouteTable::new(vec![RerouteRule {
        from: "legacy".into(),
        to: "current".into(),
        verb: None,
        rewrite_verb: None,
    }]));
    router.prepare(&get("legacy/7"), None, None).unwrap();
    let route = router.get_route(true).unwrap();

    assert_eq!(route.type_name(), "App::current");
    assert_eq!(route.exec_params(), ["7".to_string()]);
}

#[test]
fn test_mode_mismatch() {
    let oracle = registry(vec![
        TypeDescriptor::new("App::foo").method(echo_method("GET_", Signature::new()))
    ]);

    let mut router = Router::start_http("App", oracle.clone());
    let err = router
        .prepare(&CliInvocation::new("foo"), None, None)
        .unwrap_err();
    assert_eq!(err.kind(), RouteErrorKind::Execution);

    let mut router = Router::start_cli("App", oracle);
    let err = router.prepare(&get("foo"), None, None).unwrap_err();
    assert_eq!(err.kind(), RouteErrorKind::Execution);
}

#[test]
fn test_empty_path_uses_default() {
    let oracle = registry(vec![
        TypeDescriptor::new("App::index").method(echo_method("GET_", Signature::new()))
    ]);

    let mut router = Router::start_http("App", oracle);
    router.prepare(&get("/"), None, None).unwrap();
    assert_eq!(router.get_route(true).unwrap().call(), "GET_()");
}

#[test]
fn test_compact_falls_back_to_main_namespace_type() {
    let oracle = registry(vec![TypeDescriptor::new("App")
        .method(echo_method("GET_foo", Signature::new().optional("x")))]);

    let mut router = Router::start_http("App", oracle);
    router.prepare(&get("foo/1"), None, None).unwrap();
    let route = router.get_route(true).unwrap();

    assert_eq!(route.type_name(), "App");
    assert_eq!(route.action_name(), "foo");
    assert_eq!(route.path(), "foo");
    assert_eq!(route.exec_params(), ["1".to_string()]);
    assert_eq!(router.list_routes().unwrap()[0].path, "foo");
}

#[test]
fn test_compact_without_main_namespace_has_no_fallback() {
    let oracle = registry(vec![
        TypeDescriptor::new("App").method(echo_method("GET_foo", Signature::new()))
    ]);

    let mut router = Router::start_http("", oracle);
    let err = router.prepare(&get("foo"), None, None).unwrap_err();
    assert_eq!(err.kind(), RouteErrorKind::NotFound);
    assert_eq!(err.subject(), "Class");
}

#[test]
fn test_incremental_constraint_violation() {
    let oracle = registry(vec![
        TypeDescriptor::new("App::plain::deep")
            .method(echo_method("GET_run", Signature::new().variadic("rest"))),
        TypeDescriptor::new("App::ok")
            .supertype("Endpoint")
            .method(echo_method("GET_run", Signature::new().variadic("rest"))),
    ]);

    let mut router = slash_router(oracle.clone());
    router.set_parent_constraint(Supertype("Endpoint".into()));
    let err = router.prepare(&get("plain/deep/run/1"), None, None).unwrap_err();
    assert_eq!(err.kind(), RouteErrorKind::Forbidden);
    assert_eq!(err.subject(), "Class");

    let mut router = slash_router(oracle);
    router.set_parent_constraint(Supertype("Endpoint".into()));
    router.prepare(&get("ok/run/1"), None, None).unwrap();
    let route = router.get_route(true).unwrap();
    assert_eq!(route.action_name(), "run");
    assert_eq!(route.exec_params(), ["1".to_string()]);
}
