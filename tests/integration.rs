//! Comprehensive integration tests for the payroll engine.
//!
//! This test suite covers the HTTP surface end to end including:
//! - Gross-to-net payslip calculation
//! - Allowance and deduction component evaluation
//! - Progressive income tax bands
//! - Pension cap behavior
//! - Insurance levy
//! - Payroll runs with partial failures
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/reference").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    let d = Decimal::from_str(s).unwrap();
    d.normalize().to_string()
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn post_payslip(router: Router, body: Value) -> (StatusCode, Value) {
    post_json(router, "/payslip", body).await
}

async fn post_payroll_run(router: Router, body: Value) -> (StatusCode, Value) {
    post_json(router, "/payroll-run", body).await
}

fn structure(basic_salary: &str, allowances: Vec<Value>, deductions: Vec<Value>) -> Value {
    json!({
        "id": "struct_001",
        "name": "Staff grade 3",
        "basic_salary": basic_salary,
        "allowances": allowances,
        "deductions": deductions,
        "frequency": "monthly"
    })
}

fn percentage_allowance(id: &str, percent: &str) -> Value {
    json!({
        "id": id,
        "name": id,
        "kind": {"type": "percentage", "percent": percent, "base": "basic_salary"}
    })
}

fn fixed_allowance(id: &str, amount: &str) -> Value {
    json!({
        "id": id,
        "name": id,
        "kind": {"type": "fixed", "amount": amount}
    })
}

fn deduction(id: &str, kind: Value, pre_tax: bool) -> Value {
    json!({
        "id": id,
        "name": id,
        "kind": kind,
        "pre_tax": pre_tax
    })
}

fn payslip_request(employee_id: &str, structure: Value) -> Value {
    json!({
        "employee": {"id": employee_id, "name": "Test Employee"},
        "structure": structure,
        "pay_period": {
            "start_date": "2026-03-01",
            "end_date": "2026-03-31"
        }
    })
}

fn run_request(roster: Vec<Value>) -> Value {
    json!({
        "pay_period": {
            "start_date": "2026-03-01",
            "end_date": "2026-03-31"
        },
        "payment_date": "2026-04-01",
        "roster": roster
    })
}

fn roster_entry(employee_id: &str, structure: Value) -> Value {
    json!({
        "employee": {"id": employee_id},
        "structure": structure
    })
}

/// The reference structure: 5000 basic, 20% housing, 500 transport, 10%
/// pre-tax union dues.
fn reference_structure() -> Value {
    structure(
        "5000",
        vec![
            percentage_allowance("housing", "20"),
            fixed_allowance("transport", "500"),
        ],
        vec![deduction(
            "union",
            json!({"type": "percentage", "percent": "10", "base": "gross_pay"}),
            true,
        )],
    )
}

fn assert_total(result: &Value, field: &str, expected: &str) {
    let actual = result["totals"][field].as_str().unwrap();
    let actual_normalized = normalize_decimal(actual);
    let expected_normalized = normalize_decimal(expected);
    assert_eq!(
        actual_normalized, expected_normalized,
        "Expected {} {}, got {}",
        field, expected_normalized, actual_normalized
    );
}

// =============================================================================
// SECTION 1: Gross-to-Net Payslip Tests
// =============================================================================

#[tokio::test]
async fn test_reference_payslip_round_trip() {
    // 5000 basic + 1000 housing (20%) + 500 transport = 6500 gross
    // Union dues 10% of gross = 650 pre-tax, taxable = 5850
    // Tax: 20% of (5850 - 5100) = 150; pension 5% of 6500 = 325;
    // insurance 2% of 5000 = 100
    // Net: 6500 - (150 + 325 + 100 + 650) = 5275
    let router = create_router_for_test();
    let request = payslip_request("emp_001", reference_structure());

    let (status, result) = post_payslip(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_total(&result, "gross_pay", "6500");
    assert_total(&result, "taxable_income", "5850");
    assert_total(&result, "income_tax", "150");
    assert_total(&result, "pension", "325");
    assert_total(&result, "insurance", "100");
    assert_total(&result, "pre_tax_deductions", "650");
    assert_total(&result, "total_deductions", "1225");
    assert_total(&result, "net_pay", "5275");
}

#[tokio::test]
async fn test_basic_only_payslip() {
    // 5000 basic, no components: taxable 5000 is inside the zero band
    // Pension 5% of 5000 = 250; insurance 2% of 5000 = 100
    // Net: 5000 - 350 = 4650
    let router = create_router_for_test();
    let request = payslip_request("emp_001", structure("5000", vec![], vec![]));

    let (status, result) = post_payslip(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_total(&result, "gross_pay", "5000");
    assert_total(&result, "income_tax", "0");
    assert_total(&result, "pension", "250");
    assert_total(&result, "insurance", "100");
    assert_total(&result, "net_pay", "4650");
}

#[tokio::test]
async fn test_component_lines_sum_to_totals() {
    let router = create_router_for_test();
    let request = payslip_request("emp_001", reference_structure());

    let (status, result) = post_payslip(router, request).await;
    assert_eq!(status, StatusCode::OK);

    let components = result["components"].as_array().unwrap();
    let sum_for = |category: &str| -> Decimal {
        components
            .iter()
            .filter(|c| c["category"] == category)
            .map(|c| Decimal::from_str(c["amount"].as_str().unwrap()).unwrap())
            .sum()
    };

    let basic = Decimal::from_str(result["basic_salary"].as_str().unwrap()).unwrap();
    let gross = Decimal::from_str(result["totals"]["gross_pay"].as_str().unwrap()).unwrap();
    let total_deductions =
        Decimal::from_str(result["totals"]["total_deductions"].as_str().unwrap()).unwrap();
    let net = Decimal::from_str(result["totals"]["net_pay"].as_str().unwrap()).unwrap();

    assert_eq!(basic + sum_for("allowance"), gross);
    assert_eq!(
        sum_for("pre_tax_deduction") + sum_for("post_tax_deduction") + sum_for("statutory"),
        total_deductions
    );
    assert_eq!(gross - total_deductions, net);
}

#[tokio::test]
async fn test_percentage_component_rounds_half_up() {
    // 12.5% of 100.20 = 12.525 which rounds to 12.53
    let router = create_router_for_test();
    let request = payslip_request(
        "emp_001",
        structure("100.20", vec![percentage_allowance("hmo", "12.5")], vec![]),
    );

    let (status, result) = post_payslip(router, request).await;
    assert_eq!(status, StatusCode::OK);

    let components = result["components"].as_array().unwrap();
    let hmo = components
        .iter()
        .find(|c| c["component_id"] == "hmo")
        .unwrap();
    assert_eq!(normalize_decimal(hmo["amount"].as_str().unwrap()), "12.53");
}

#[tokio::test]
async fn test_post_tax_deduction_does_not_reduce_taxable_income() {
    // Post-tax deduction of 650 leaves taxable at the full 6500 gross
    let router = create_router_for_test();
    let request = payslip_request(
        "emp_001",
        structure(
            "5000",
            vec![
                percentage_allowance("housing", "20"),
                fixed_allowance("transport", "500"),
            ],
            vec![deduction(
                "loan",
                json!({"type": "fixed", "amount": "650"}),
                false,
            )],
        ),
    );

    let (status, result) = post_payslip(router, request).await;
    assert_eq!(status, StatusCode::OK);

    // Tax on 6500: 20% of (6500 - 5100) = 280
    assert_total(&result, "taxable_income", "6500");
    assert_total(&result, "income_tax", "280");
    assert_total(&result, "post_tax_deductions", "650");
}

#[tokio::test]
async fn test_negative_net_pay_is_warning_not_error() {
    // 1000 gross with a 2000 post-tax deduction drives net below zero
    let router = create_router_for_test();
    let request = payslip_request(
        "emp_001",
        structure(
            "1000",
            vec![],
            vec![deduction(
                "garnishment",
                json!({"type": "fixed", "amount": "2000"}),
                false,
            )],
        ),
    );

    let (status, result) = post_payslip(router, request).await;
    assert_eq!(status, StatusCode::OK);

    // Pension 50, insurance 20: net = 1000 - 2070 = -1070
    assert_total(&result, "net_pay", "-1070");
    let warnings = result["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["code"], "negative_net_pay");
}

// =============================================================================
// SECTION 2: Income Tax Band Tests
// =============================================================================

#[tokio::test]
async fn test_tax_zero_band_boundary() {
    // 5100 sits at the top of the zero band and pays nothing
    let router = create_router_for_test();
    let request = payslip_request("emp_001", structure("5100", vec![], vec![]));

    let (status, result) = post_payslip(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_total(&result, "income_tax", "0");
}

#[tokio::test]
async fn test_tax_second_band_boundary() {
    // Tax on 7100: 20% of (7100 - 5100) = 400
    let router = create_router_for_test();
    let request = payslip_request("emp_001", structure("7100", vec![], vec![]));

    let (status, result) = post_payslip(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_total(&result, "income_tax", "400");
}

#[tokio::test]
async fn test_tax_third_band_boundary() {
    // Tax on 9200: 400 + 30% of (9200 - 7100) = 1030
    let router = create_router_for_test();
    let request = payslip_request("emp_001", structure("9200", vec![], vec![]));

    let (status, result) = post_payslip(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_total(&result, "income_tax", "1030");
}

#[tokio::test]
async fn test_tax_top_band() {
    // Tax on 10000: 1030 + 37% of (10000 - 9200) = 1326
    let router = create_router_for_test();
    let request = payslip_request("emp_001", structure("10000", vec![], vec![]));

    let (status, result) = post_payslip(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_total(&result, "income_tax", "1326");
}

// =============================================================================
// SECTION 3: Pension Cap Tests
// =============================================================================

#[tokio::test]
async fn test_pension_at_threshold() {
    // 5% of 26840 = 1342, exactly the cap
    let router = create_router_for_test();
    let request = payslip_request("emp_001", structure("26840", vec![], vec![]));

    let (status, result) = post_payslip(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_total(&result, "pension", "1342");
}

#[tokio::test]
async fn test_pension_above_threshold_holds_at_cap() {
    // Income past the threshold contributes nothing further
    let router = create_router_for_test();
    let request = payslip_request("emp_001", structure("26841", vec![], vec![]));

    let (status, result) = post_payslip(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_total(&result, "pension", "1342");
}

#[tokio::test]
async fn test_pension_well_above_threshold() {
    let router = create_router_for_test();
    let request = payslip_request("emp_001", structure("100000", vec![], vec![]));

    let (status, result) = post_payslip(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_total(&result, "pension", "1342");
}

// =============================================================================
// SECTION 4: Insurance Levy Tests
// =============================================================================

#[tokio::test]
async fn test_insurance_is_percentage_of_basic_salary() {
    // Allowances raise gross, but the levy stays 2% of basic
    let router = create_router_for_test();
    let request = payslip_request(
        "emp_001",
        structure("5000", vec![fixed_allowance("bonus", "10000")], vec![]),
    );

    let (status, result) = post_payslip(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_total(&result, "gross_pay", "15000");
    assert_total(&result, "insurance", "100");
}

// =============================================================================
// SECTION 5: Payroll Run Tests
// =============================================================================

#[tokio::test]
async fn test_payroll_run_totals_are_additive() {
    let router = create_router_for_test();
    let request = run_request(vec![
        roster_entry("emp_001", reference_structure()),
        roster_entry("emp_002", reference_structure()),
        roster_entry("emp_003", structure("5000", vec![], vec![])),
    ]);

    let (status, run) = post_payroll_run(router, request).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(run["status"], "completed");
    assert_eq!(run["employee_count"], 3);

    let items = run["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);

    let sum: Decimal = items
        .iter()
        .map(|item| Decimal::from_str(item["totals"]["net_pay"].as_str().unwrap()).unwrap())
        .sum();
    let total = Decimal::from_str(run["total_amount"].as_str().unwrap()).unwrap();
    assert_eq!(sum, total);
    // 5275 + 5275 + 4650
    assert_eq!(normalize_decimal(run["total_amount"].as_str().unwrap()), "15200");
}

#[tokio::test]
async fn test_payroll_run_partial_failure() {
    // One zero-salary entry fails; the others still produce items
    let router = create_router_for_test();
    let request = run_request(vec![
        roster_entry("emp_001", reference_structure()),
        roster_entry("emp_002", structure("0", vec![], vec![])),
        roster_entry("emp_003", reference_structure()),
    ]);

    let (status, run) = post_payroll_run(router, request).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(run["status"], "completed");
    assert_eq!(run["items"].as_array().unwrap().len(), 2);

    let errors = run["item_errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["employee_id"], "emp_002");
    assert_eq!(errors[0]["code"], "invalid_structure");

    // employee_count reflects the items actually produced
    assert_eq!(run["employee_count"], 2);
    assert_eq!(normalize_decimal(run["total_amount"].as_str().unwrap()), "10550");
}

#[tokio::test]
async fn test_payroll_run_empty_roster() {
    let router = create_router_for_test();
    let request = run_request(vec![]);

    let (status, run) = post_payroll_run(router, request).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(run["status"], "completed");
    assert_eq!(run["employee_count"], 0);
    assert_eq!(normalize_decimal(run["total_amount"].as_str().unwrap()), "0");
}

#[tokio::test]
async fn test_payroll_run_items_are_deterministic() {
    // Two identical rosters produce identical monetary results
    let request = run_request(vec![
        roster_entry("emp_001", reference_structure()),
        roster_entry("emp_002", structure("9200", vec![], vec![])),
    ]);

    let (_, first) = post_payroll_run(create_router_for_test(), request.clone()).await;
    let (_, second) = post_payroll_run(create_router_for_test(), request).await;

    assert_eq!(first["total_amount"], second["total_amount"]);

    let net_for = |run: &Value, employee_id: &str| -> String {
        run["items"]
            .as_array()
            .unwrap()
            .iter()
            .find(|item| item["employee_id"] == employee_id)
            .map(|item| item["totals"]["net_pay"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_eq!(net_for(&first, "emp_001"), net_for(&second, "emp_001"));
    assert_eq!(net_for(&first, "emp_002"), net_for(&second, "emp_002"));
}

// =============================================================================
// SECTION 6: Error Cases Tests
// =============================================================================

#[tokio::test]
async fn test_error_malformed_json() {
    let router = create_router_for_test();

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/payslip")
                .header("Content-Type", "application/json")
                .body(Body::from("{invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_error_missing_employee() {
    let router = create_router_for_test();

    let body = json!({
        "structure": reference_structure(),
        "pay_period": {
            "start_date": "2026-03-01",
            "end_date": "2026-03-31"
        }
    });

    let (status, error) = post_payslip(router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].as_str().unwrap().contains("missing field"));
}

#[tokio::test]
async fn test_error_zero_basic_salary() {
    let router = create_router_for_test();
    let request = payslip_request("emp_001", structure("0", vec![], vec![]));

    let (status, error) = post_payslip(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_STRUCTURE");
}

#[tokio::test]
async fn test_error_negative_component_value() {
    let router = create_router_for_test();
    let request = payslip_request(
        "emp_001",
        structure("5000", vec![fixed_allowance("broken", "-100")], vec![]),
    );

    let (status, error) = post_payslip(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_STRUCTURE");
}

#[tokio::test]
async fn test_error_unknown_frequency() {
    let router = create_router_for_test();

    let body = json!({
        "employee": {"id": "emp_001"},
        "structure": {
            "id": "struct_001",
            "name": "Staff grade 3",
            "basic_salary": "5000",
            "allowances": [],
            "deductions": [],
            "frequency": "fortnightly"
        },
        "pay_period": {
            "start_date": "2026-03-01",
            "end_date": "2026-03-31"
        }
    });

    let (status, error) = post_payslip(router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        error["code"].as_str().unwrap() == "VALIDATION_ERROR"
            || error["code"].as_str().unwrap() == "MALFORMED_JSON"
    );
}

#[tokio::test]
async fn test_error_missing_roster() {
    let router = create_router_for_test();

    let body = json!({
        "pay_period": {
            "start_date": "2026-03-01",
            "end_date": "2026-03-31"
        },
        "payment_date": "2026-04-01"
    });

    let (status, error) = post_payroll_run(router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].as_str().unwrap().contains("missing field"));
}

// =============================================================================
// SECTION 7: Response Field Validation Tests
// =============================================================================

#[tokio::test]
async fn test_payslip_contains_all_required_fields() {
    let router = create_router_for_test();
    let request = payslip_request("emp_fields_001", reference_structure());

    let (status, result) = post_payslip(router, request).await;

    assert_eq!(status, StatusCode::OK);

    assert!(result["calculation_id"].is_string());
    assert!(result["computed_at"].is_string());
    assert!(result["engine_version"].is_string());
    assert!(result["employee_id"].is_string());

    assert!(result["pay_period"]["start_date"].is_string());
    assert!(result["pay_period"]["end_date"].is_string());

    // The structure is snapshotted onto the item
    assert_eq!(result["structure"]["id"], "struct_001");

    assert!(result["totals"]["gross_pay"].is_string());
    assert!(result["totals"]["taxable_income"].is_string());
    assert!(result["totals"]["income_tax"].is_string());
    assert!(result["totals"]["pension"].is_string());
    assert!(result["totals"]["insurance"].is_string());
    assert!(result["totals"]["total_deductions"].is_string());
    assert!(result["totals"]["net_pay"].is_string());

    assert!(result["components"].is_array());
    assert!(result["warnings"].is_array());
}

#[tokio::test]
async fn test_component_line_contains_required_fields() {
    let router = create_router_for_test();
    let request = payslip_request("emp_line_001", reference_structure());

    let (status, result) = post_payslip(router, request).await;

    assert_eq!(status, StatusCode::OK);

    let components = result["components"].as_array().unwrap();
    assert!(!components.is_empty());

    for line in components {
        assert!(line["component_id"].is_string());
        assert!(line["name"].is_string());
        assert!(line["category"].is_string());
        assert!(line["amount"].is_string());
    }

    // Statutory amounts appear as component lines too
    let categories: Vec<&str> = components
        .iter()
        .map(|c| c["category"].as_str().unwrap())
        .collect();
    assert!(categories.contains(&"statutory"));
}

#[tokio::test]
async fn test_payroll_run_contains_all_required_fields() {
    let router = create_router_for_test();
    let request = run_request(vec![roster_entry("emp_001", reference_structure())]);

    let (status, run) = post_payroll_run(router, request).await;

    assert_eq!(status, StatusCode::OK);

    assert!(run["id"].is_string());
    assert!(run["created_at"].is_string());
    assert_eq!(run["payment_date"], "2026-04-01");
    assert_eq!(run["status"], "completed");
    assert!(run["roster"].is_array());
    assert!(run["items"].is_array());
    assert!(run["item_errors"].is_array());
    assert!(run["total_amount"].is_string());
    assert!(run["employee_count"].is_number());
}
