// crates/dirconf-validators/tests/other_validator.rs
// ============================================================================
// Module: Implies Other Validator Tests
// Description: Composite rules gated on a discriminator value.
// ============================================================================
//! ## Overview
//! Covers activation by set membership, scanning across repeated condition
//! matches, and double reporting of nested failures.

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

use dirconf_validators::AttributeValue;
use dirconf_validators::Diagnostics;
use dirconf_validators::Implies;
use dirconf_validators::ImpliesOtherValidator;
use dirconf_validators::PathExpression;
use dirconf_validators::Rule;
use dirconf_validators::ValueImpliesAttributeRequired;
use dirconf_validators::Verdict;
use dirconf_validators::diagnostics::IMPLIED_VALIDATOR_DETAIL;
use dirconf_validators::diagnostics::IMPLIED_VALIDATOR_FAILED;
use dirconf_validators::diagnostics::INVALID_ATTRIBUTE_TYPE;
use dirconf_validators::diagnostics::MISSING_IMPLIED_ATTRIBUTE;
use support::TestResult;
use support::ensure;
use support::mocks::MockDocument;
use support::mocks::p;
use support::mocks::s;
use support::summaries;

fn composite() -> ImpliesOtherValidator {
    ImpliesOtherValidator::new(
        p("type"),
        ["ldap-pass-through"],
        Box::new(Implies::new(p("search_base"), p("search_filter"))),
    )
}

fn run(rule: &dyn Rule, doc: &MockDocument) -> (Verdict, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let verdict = rule.evaluate(doc, &mut diagnostics);
    (verdict, diagnostics)
}

#[test]
fn nested_failure_is_double_reported() -> TestResult {
    let doc = MockDocument::new()
        .attribute("type", s("ldap-pass-through"))
        .attribute("search_base", s("dc=example,dc=com"))
        .attribute("search_filter", AttributeValue::Null);
    let (verdict, diagnostics) = run(&composite(), &doc);
    ensure(verdict == Verdict::Violated, "expected violated")?;
    ensure(
        summaries(&diagnostics)
            == vec![MISSING_IMPLIED_ATTRIBUTE.to_string(), IMPLIED_VALIDATOR_FAILED.to_string()],
        "expected nested diagnostic followed by the contextual one",
    )?;
    let outer = diagnostics.iter().nth(1).ok_or("missing outer diagnostic")?;
    ensure(
        outer.detail == format!("{IMPLIED_VALIDATOR_DETAIL}: {}", composite().description()),
        format!("outer detail should carry the description: {}", outer.detail),
    )?;
    Ok(())
}

#[test]
fn nested_pass_reports_nothing() -> TestResult {
    let doc = MockDocument::new()
        .attribute("type", s("ldap-pass-through"))
        .attribute("search_base", s("dc=example,dc=com"))
        .attribute("search_filter", s("(uid={0})"));
    let (verdict, diagnostics) = run(&composite(), &doc);
    ensure(verdict == Verdict::Satisfied && diagnostics.is_empty(), "expected nested pass")
}

#[test]
fn nested_verdict_is_forwarded_when_silent() -> TestResult {
    let doc = MockDocument::new()
        .attribute("type", s("ldap-pass-through"))
        .attribute("search_base", AttributeValue::Unknown)
        .attribute("search_filter", AttributeValue::Null);
    let (verdict, diagnostics) = run(&composite(), &doc);
    ensure(verdict == Verdict::Deferred && diagnostics.is_empty(), "expected nested deferral")
}

#[test]
fn other_discriminator_value_skips_nested_rule() -> TestResult {
    let doc = MockDocument::new()
        .attribute("type", s("simple"))
        .attribute("search_base", s("dc=example,dc=com"))
        .attribute("search_filter", AttributeValue::Null);
    let (verdict, diagnostics) = run(&composite(), &doc);
    ensure(verdict == Verdict::Vacuous && diagnostics.is_empty(), "expected vacuous pass")
}

#[test]
fn null_condition_is_vacuous() -> TestResult {
    let doc = MockDocument::new()
        .attribute("type", AttributeValue::Null)
        .attribute("search_base", s("dc=example,dc=com"))
        .attribute("search_filter", AttributeValue::Null);
    let (verdict, diagnostics) = run(&composite(), &doc);
    ensure(verdict == Verdict::Vacuous && diagnostics.is_empty(), "expected vacuous pass")?;

    let rule = ImpliesOtherValidator::new(
        PathExpression::parse("mappings[*].kind")?,
        ["dn"],
        Box::new(Implies::new(p("base_dn"), p("scope"))),
    );
    let doc = MockDocument::new()
        .repeated("mappings[*].kind", vec![AttributeValue::Null; 3])
        .attribute("base_dn", s("ou=people"))
        .attribute("scope", AttributeValue::Null);
    let (verdict, diagnostics) = run(&rule, &doc);
    ensure(
        verdict == Verdict::Vacuous && diagnostics.is_empty(),
        "all-null matches must not activate the nested rule",
    )
}

#[test]
fn unknown_discriminator_defers_without_running_nested_rule() -> TestResult {
    let doc = MockDocument::new()
        .attribute("type", AttributeValue::Unknown)
        .attribute("search_base", s("dc=example,dc=com"))
        .attribute("search_filter", AttributeValue::Null);
    let (verdict, diagnostics) = run(&composite(), &doc);
    ensure(verdict == Verdict::Deferred && diagnostics.is_empty(), "expected silent deferral")
}

#[test]
fn scan_continues_past_non_matching_values() -> TestResult {
    let rule = ImpliesOtherValidator::new(
        PathExpression::parse("mappings[*].kind")?,
        ["dn"],
        Box::new(Implies::new(p("base_dn"), p("scope"))),
    );
    let doc = MockDocument::new()
        .repeated("mappings[*].kind", vec![s("attribute"), AttributeValue::Null, s("dn")])
        .attribute("base_dn", s("ou=people"))
        .attribute("scope", AttributeValue::Null);
    let (verdict, diagnostics) = run(&rule, &doc);
    ensure(verdict == Verdict::Violated, "expected the later dn match to activate the rule")?;
    ensure(diagnostics.len() == 2, "expected double reporting")?;
    Ok(())
}

#[test]
fn unknown_after_non_matching_value_defers() -> TestResult {
    let rule = ImpliesOtherValidator::new(
        PathExpression::parse("mappings[*].kind")?,
        ["dn"],
        Box::new(Implies::new(p("base_dn"), p("scope"))),
    );
    let doc = MockDocument::new()
        .repeated("mappings[*].kind", vec![s("attribute"), AttributeValue::Unknown, s("dn")])
        .attribute("base_dn", s("ou=people"))
        .attribute("scope", AttributeValue::Null);
    let (verdict, diagnostics) = run(&rule, &doc);
    ensure(verdict == Verdict::Deferred && diagnostics.is_empty(), "expected silent deferral")
}

#[test]
fn non_string_discriminator_is_type_error() -> TestResult {
    let doc = MockDocument::new()
        .attribute("type", AttributeValue::number(3))
        .attribute("search_base", s("dc=example,dc=com"))
        .attribute("search_filter", AttributeValue::Null);
    let (verdict, diagnostics) = run(&composite(), &doc);
    ensure(verdict == Verdict::Malformed, "expected malformed")?;
    ensure(
        summaries(&diagnostics) == vec![INVALID_ATTRIBUTE_TYPE.to_string()],
        "expected only the type diagnostic",
    )?;
    Ok(())
}

#[test]
fn composites_nest() -> TestResult {
    let inner = ImpliesOtherValidator::new(
        p("mode"),
        ["strict"],
        Box::new(ValueImpliesAttributeRequired::new(p("mode"), "strict", vec![p("ca_file")])),
    );
    let outer = ImpliesOtherValidator::new(p("type"), ["tls"], Box::new(inner));
    let doc = MockDocument::new()
        .attribute("type", s("tls"))
        .attribute("mode", s("strict"))
        .attribute("ca_file", AttributeValue::Null);
    let (verdict, diagnostics) = run(&outer, &doc);
    ensure(verdict == Verdict::Violated, "expected violated")?;
    ensure(
        summaries(&diagnostics)
            == vec![
                MISSING_IMPLIED_ATTRIBUTE.to_string(),
                IMPLIED_VALIDATOR_FAILED.to_string(),
                IMPLIED_VALIDATOR_FAILED.to_string(),
            ],
        "expected each composite level to add context",
    )?;
    Ok(())
}

#[test]
fn pre_existing_errors_do_not_trigger_context() -> TestResult {
    let doc = MockDocument::new()
        .attribute("type", s("ldap-pass-through"))
        .attribute("search_base", s("dc=example,dc=com"))
        .attribute("search_filter", s("(uid={0})"));
    let mut diagnostics = Diagnostics::new();
    diagnostics.error("Earlier", "unrelated failure");
    let verdict = composite().evaluate(&doc, &mut diagnostics);
    ensure(verdict == Verdict::Satisfied, "expected satisfied")?;
    ensure(diagnostics.len() == 1, "expected no new diagnostics")?;
    Ok(())
}

#[test]
fn description_embeds_nested_rule() -> TestResult {
    let description = composite().description();
    ensure(
        description
            == "If type has a value in [\"ldap-pass-through\"], then the following validator must \
                pass: If search_base is configured, then search_filter must also be configured",
        format!("unexpected description: {description}"),
    )
}
