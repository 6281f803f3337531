//! E2E tests for the complyc commands

use serde_json::Value;
use std::process::{Command, Output};

const AS_OF: &str = "2024-03-10T09:30:00Z";

fn complyc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_complyc"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn types(obligations: &Value) -> Vec<String> {
    obligations
        .as_array()
        .expect("array of obligations")
        .iter()
        .map(|o| o["type"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn uae_company_obligations_json() {
    let output = complyc(&[
        "obligations",
        "-e",
        "tests/data/ae_company.json",
        "--turnover",
        "500000",
        "--as-of",
        AS_OF,
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let obligations = json(&output);
    assert_eq!(types(&obligations), ["VAT", "CORPORATE_TAX", "ESR", "UBO"]);

    let vat = &obligations[0];
    assert_eq!(vat["id"], "vat-acme-dubai");
    assert_eq!(vat["country"], "AE");
    assert_eq!(vat["description"], "VAT filing for Acme Trading LLC");
    assert_eq!(vat["frequency"], "MONTHLY");
    assert_eq!(vat["dueDate"], "2024-04-28T00:00:00Z");
    assert_eq!(vat["status"], "PENDING");
    assert_eq!(vat["daysUntilDue"], 48);
    assert_eq!(vat["requiresDocumentation"], true);
    assert_eq!(vat["automationSupported"], false);
}

#[test]
fn uae_company_obligations_table() {
    let output = complyc(&[
        "obligations",
        "-e",
        "tests/data/ae_company.json",
        "-t",
        "500000",
        "--as-of",
        AS_OF,
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("OBLIGATIONS FOR Acme Trading LLC (AE, company)"));
    assert!(stdout.contains("vat-acme-dubai"));
    assert!(stdout.contains("2024-04-28"));
    assert!(stdout.contains("Economic Substance Report"));
}

#[test]
fn uae_individual_without_turnover_only_files_ubo() {
    let output = complyc(&[
        "obligations",
        "-e",
        "tests/data/ae_individual.json",
        "--as-of",
        AS_OF,
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let obligations = json(&output);
    assert_eq!(types(&obligations), ["UBO"]);
    assert_eq!(obligations[0]["id"], "ubo-ind-7");
    assert_eq!(obligations[0]["dueDate"], "2025-12-31T00:00:00Z");
}

#[test]
fn saudi_company_obligations() {
    let output = complyc(&[
        "obligations",
        "-e",
        "tests/data/sa_company.json",
        "--turnover",
        "2000000",
        "--as-of",
        AS_OF,
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let obligations = json(&output);
    assert_eq!(types(&obligations), ["VAT", "ZAKAT", "WHT", "E_INVOICE"]);
    assert_eq!(obligations[0]["dueDate"], "2024-04-15T00:00:00Z");
    assert_eq!(obligations[1]["dueDate"], "2025-01-31T00:00:00Z");
    assert_eq!(obligations[3]["id"], "einv-riyadh-1");
    assert_eq!(obligations[3]["frequency"], "ON_DEMAND");
    assert_eq!(obligations[3]["automationSupported"], true);
}

#[test]
fn egypt_company_obligations() {
    let output = complyc(&[
        "obligations",
        "-e",
        "tests/data/eg_company.json",
        "--turnover",
        "600000",
        "--as-of",
        AS_OF,
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let obligations = json(&output);
    assert_eq!(types(&obligations), ["VAT", "CORPORATE_TAX", "WHT", "E_INVOICE"]);
    assert_eq!(obligations[0]["dueDate"], "2024-05-31T00:00:00Z");
    assert_eq!(obligations[1]["dueDate"], "2025-04-30T00:00:00Z");
}

#[test]
fn entity_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new(env!("CARGO_BIN_EXE_complyc"))
        .args(["obligations", "-e", "-", "--as-of", AS_OF, "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(br#"{"id": "piped", "country": "SA", "legalForm": "LLC"}"#)
        .expect("write stdin");
    let output = child.wait_with_output().expect("Failed to wait on command");
    assert!(output.status.success(), "Command failed: {:?}", output);

    assert_eq!(types(&json(&output)), ["ZAKAT", "WHT", "E_INVOICE"]);
}

#[test]
fn unsupported_country_has_no_obligations() {
    let output = complyc(&[
        "obligations",
        "-e",
        "tests/data/bh_company.json",
        "--turnover",
        "50000",
        "--as-of",
        AS_OF,
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(json(&output), serde_json::json!([]));
}

#[test]
fn custom_registry_replaces_builtin_countries() {
    let bahrain = complyc(&[
        "--registry",
        "tests/data/bahrain_registry.json",
        "obligations",
        "-e",
        "tests/data/bh_company.json",
        "--turnover",
        "50000",
        "--as-of",
        AS_OF,
        "--json",
    ]);
    assert!(bahrain.status.success(), "Command failed: {:?}", bahrain);
    let obligations = json(&bahrain);
    assert_eq!(types(&obligations), ["VAT"]);
    assert_eq!(obligations[0]["dueDate"], "2024-04-30T00:00:00Z");
    assert_eq!(obligations[0]["daysUntilDue"], 50);

    let uae = complyc(&[
        "--registry",
        "tests/data/bahrain_registry.json",
        "obligations",
        "-e",
        "tests/data/ae_company.json",
        "--turnover",
        "500000",
        "--as-of",
        AS_OF,
        "--json",
    ]);
    assert!(uae.status.success(), "Command failed: {:?}", uae);
    assert_eq!(json(&uae), serde_json::json!([]));
}

#[test]
fn invalid_registry_is_rejected() {
    let output = complyc(&[
        "--registry",
        "tests/data/invalid_registry.json",
        "countries",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid due date rule for BH/VAT"), "{}", stderr);
}

#[test]
fn entity_without_country_is_rejected() {
    let output = complyc(&["obligations", "-e", "tests/data/missing_country.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("country is required for entity: nowhere-1"), "{}", stderr);
}

#[test]
fn status_with_overdue_obligation_is_critical() {
    let output = complyc(&[
        "status",
        "-o",
        "tests/data/obligations_overdue.json",
        "--as-of",
        AS_OF,
        "--json",
    ]);
    assert_eq!(output.status.code(), Some(1));

    let status = json(&output);
    assert_eq!(status["total"], 2);
    assert_eq!(status["submitted"], 1);
    assert_eq!(status["pending"], 1);
    assert_eq!(status["overdue"], 1);
    assert_eq!(status["complianceScore"], 50);
    assert_eq!(status["hasOverdue"], true);
    assert_eq!(status["riskLevel"], "CRITICAL");
}

#[test]
fn status_on_track() {
    let output = complyc(&[
        "status",
        "-o",
        "tests/data/obligations_on_track.json",
        "--as-of",
        AS_OF,
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("Compliance score: 50%"));
    assert!(stdout.contains("Risk level: MEDIUM"));
    assert!(stdout.contains("vat-riyadh-1"));
    assert!(stdout.contains("einv-riyadh-1"));
    assert!(!stdout.contains("zakat-riyadh-1"));
}

#[test]
fn countries_listing() {
    let output = complyc(&["countries"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("United Arab Emirates"));
    assert!(stdout.contains("Saudi Arabia"));
    assert!(stdout.contains("Egypt"));
}

#[test]
fn country_detail_json() {
    let output = complyc(&["countries", "eg", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let egypt = json(&output);
    assert_eq!(egypt["code"], "EG");
    assert_eq!(egypt["currency"], "EGP");
    assert_eq!(egypt["economicZones"].as_array().map(Vec::len), Some(5));
    assert_eq!(
        egypt["rules"]["E_INVOICE"]["applicability"]["kind"],
        "transaction_above"
    );
}

#[test]
fn country_detail_table() {
    let output = complyc(&["countries", "AE"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("UNITED ARAB EMIRATES (AE)"));
    assert!(stdout.contains("turnover > 375000"));
    assert!(stdout.contains("Jebel Ali Free Zone"));
}

#[test]
fn unknown_country_detail_fails() {
    let output = complyc(&["countries", "GB"]);
    assert!(!output.status.success());
}

#[test]
fn validate_id_accepts_valid_identifiers() {
    let output = complyc(&["validate-id", "AE", "TRN", "100123456700003"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let output = complyc(&["validate-id", "ae", "license", "A123456B", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(json(&output)["valid"], true);
}

#[test]
fn validate_id_rejects_invalid_identifiers() {
    let output = complyc(&["validate-id", "SA", "CR", "12345"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("10 digits"));

    let output = complyc(&["validate-id", "EG", "PASSPORT", "123456789", "--json"]);
    assert_eq!(output.status.code(), Some(1));
    let result = json(&output);
    assert_eq!(result["valid"], false);
    assert!(result.get("expected").is_none());
}

#[test]
fn schema_for_each_input() {
    let output = complyc(&["schema", "entity"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("legalForm"));

    let output = complyc(&["schema", "obligations"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("daysUntilDue"));

    let output = complyc(&["schema", "registry"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("countries"));
}
