// crates/dirconf-document/tests/resolution.rs
// ============================================================================
// Module: Path Resolution Tests
// Description: Expression expansion and value reads over nested documents.
// ============================================================================
//! ## Overview
//! Covers document-order expansion, ancestor short-circuiting on unknown and
//! null values, resolution errors, and tri-state value reads.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use dirconf_document::ConfigDocument;
use dirconf_document::DocumentBuilder;
use dirconf_document::UndeclaredAttributes;
use dirconf_validators::AttributeValue;
use dirconf_validators::Document;
use dirconf_validators::Path;
use dirconf_validators::PathExpression;
use dirconf_validators::PathStep;
use dirconf_validators::ResolveError;
use support::TestResult;
use support::ensure;
use support::rendered;

fn servers() -> ConfigDocument {
    DocumentBuilder::new()
        .attribute("type", "ldap")
        .attribute(
            "servers",
            AttributeValue::list([
                AttributeValue::object([
                    ("host", "a.example.com".into()),
                    ("port", AttributeValue::number(389)),
                ]),
                AttributeValue::Null,
                AttributeValue::object([
                    ("host", AttributeValue::Unknown),
                    ("port", AttributeValue::number(636)),
                ]),
            ]),
        )
        .attribute("labels", AttributeValue::map([("zone", "eu".into()), ("env", "prod".into())]))
        .attribute("roles", AttributeValue::set(["admin".into(), "reader".into()]))
        .unknown("pending")
        .null("tls")
        .build()
}

fn resolve(doc: &ConfigDocument, text: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let paths = doc.resolve(&PathExpression::parse(text)?)?;
    Ok(rendered(&paths))
}

#[test]
fn top_level_attribute_resolves_to_itself() -> TestResult {
    ensure(resolve(&servers(), "type")? == ["type"], "single path")
}

#[test]
fn any_element_expands_in_stored_order() -> TestResult {
    let paths = resolve(&servers(), "servers[*].host")?;
    ensure(
        paths == ["servers[0].host", "servers[1]", "servers[2].host"],
        format!("unexpected paths: {paths:?}"),
    )
}

#[test]
fn map_values_expand_in_key_order() -> TestResult {
    let paths = resolve(&servers(), "labels[*]")?;
    ensure(
        paths == [r#"labels["env"]"#, r#"labels["zone"]"#],
        format!("unexpected paths: {paths:?}"),
    )
}

#[test]
fn sets_expand_like_lists() -> TestResult {
    ensure(resolve(&servers(), "roles[*]")? == ["roles[0]", "roles[1]"], "set expansion")
}

#[test]
fn unknown_and_null_ancestors_yield_themselves() -> TestResult {
    ensure(resolve(&servers(), "pending.child[*]")? == ["pending"], "unknown ancestor")?;
    ensure(resolve(&servers(), "tls.ca_file")? == ["tls"], "null ancestor")
}

#[test]
fn fixed_index_and_key_select_one_or_nothing() -> TestResult {
    let doc = servers();
    ensure(resolve(&doc, "servers[2].port")? == ["servers[2].port"], "in range index")?;
    ensure(resolve(&doc, "servers[7].port")?.is_empty(), "out of range index")?;
    ensure(resolve(&doc, r#"labels["env"]"#)? == [r#"labels["env"]"#], "present key")?;
    ensure(resolve(&doc, r#"labels["missing"]"#)?.is_empty(), "missing key")
}

#[test]
fn undeclared_attribute_is_an_error() -> TestResult {
    let result = servers().resolve(&PathExpression::parse("servers[*].weight")?);
    let expected_path: Path = [PathStep::Attribute("servers".to_string()), PathStep::Index(0)]
        .into_iter()
        .collect();
    ensure(
        result
            == Err(ResolveError::UnknownAttribute {
                path: expected_path,
                name: "weight".to_string(),
            }),
        format!("unexpected result: {result:?}"),
    )
}

#[test]
fn undeclared_attributes_can_read_as_null() -> TestResult {
    let doc = servers().with_undeclared(UndeclaredAttributes::Null);
    ensure(doc.undeclared() == UndeclaredAttributes::Null, "policy should stick")?;
    let weights = resolve(&doc, "servers[*].weight")?;
    ensure(
        weights == vec!["servers[0].weight", "servers[1]", "servers[2].weight"],
        format!("unexpected paths: {weights:?}"),
    )?;
    let paths = doc.resolve(&PathExpression::parse("bind_dn")?)?;
    let path = paths.first().ok_or("expected one path")?;
    ensure(paths.len() == 1 && doc.value(path).is_null(), "undeclared attribute reads as null")?;
    ensure(
        matches!(
            resolve(&doc, "type.nested"),
            Err(err) if err.to_string().contains("cannot apply")
        ),
        "scalars stay non-traversable",
    )
}

#[test]
fn stepping_into_scalars_or_wrong_containers_is_an_error() -> TestResult {
    let doc = servers();
    let scalar = doc.resolve(&PathExpression::parse("type[0]")?);
    ensure(
        matches!(
            &scalar,
            Err(ResolveError::NotTraversable { found: "string", step, .. }) if step == "[0]"
        ),
        format!("unexpected result: {scalar:?}"),
    )?;
    let keyed_list = doc.resolve(&PathExpression::parse(r#"servers["a"]"#)?);
    ensure(
        matches!(keyed_list, Err(ResolveError::NotTraversable { found: "list", .. })),
        "key step on a list",
    )?;
    let attribute_on_map = doc.resolve(&PathExpression::parse("labels.env")?);
    ensure(
        matches!(attribute_on_map, Err(ResolveError::NotTraversable { found: "map", .. })),
        "attribute step on a map",
    )
}

#[test]
fn value_reads_follow_paths() -> TestResult {
    let doc = servers();
    let port: Path = [
        PathStep::Attribute("servers".to_string()),
        PathStep::Index(2),
        PathStep::Attribute("port".to_string()),
    ]
    .into_iter()
    .collect();
    ensure(doc.value(&port) == AttributeValue::number(636), "nested number")?;
    let missing: Path = [PathStep::Attribute("servers".to_string()), PathStep::Index(9)]
        .into_iter()
        .collect();
    ensure(doc.value(&missing).is_null(), "missing element reads as null")?;
    let through_unknown: Path =
        [PathStep::Attribute("pending".to_string()), PathStep::Attribute("x".to_string())]
            .into_iter()
            .collect();
    ensure(doc.value(&through_unknown).is_unknown(), "unknown ancestor reads as unknown")
}

#[test]
fn containers_with_unknown_elements_read_as_unknown() -> TestResult {
    let doc = servers();
    let servers_path: Path = std::iter::once(PathStep::Attribute("servers".to_string())).collect();
    ensure(doc.value(&servers_path).is_unknown(), "list holding an unknown host")?;
    let labels_path: Path = std::iter::once(PathStep::Attribute("labels".to_string())).collect();
    ensure(doc.value(&labels_path).is_present(), "fully known map")
}

#[test]
fn resolution_is_deterministic() -> TestResult {
    let doc = servers();
    let expression = PathExpression::parse("servers[*].port")?;
    ensure(doc.resolve(&expression)? == doc.resolve(&expression)?, "same input, same output")
}
