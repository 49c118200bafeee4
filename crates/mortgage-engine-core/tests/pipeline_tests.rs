use chrono::{TimeZone, Utc};
use mortgage_engine_core::pipeline::{
    calculate_progress, progress_report, score_engagement, EngagementInput, EngagementSpike,
    PipelineStage,
};
use mortgage_engine_core::records::LoanFile;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn loan_file(overrides: Value) -> LoanFile {
    let mut base = json!({
        "borrower": {
            "full_name": "Dana Reyes",
            "address": "12 Elm St",
            "income": "8,500",
            "esign_documents": [
                { "name": "Initial disclosures", "status": "Signed" },
                { "name": "Intent to proceed", "status": "Signed" }
            ]
        },
        "loan": { "status": "approved" },
        "documents": [
            { "name": "W-2" }, { "name": "Paystub" }, { "name": "Bank statement" }, { "name": "ID" }
        ],
        "underwriting_conditions": [ { "description": "VOE", "status": "Cleared" } ],
        "appraised_value": "415000"
    });
    if let (Some(target), Value::Object(patch)) = (base.as_object_mut(), overrides) {
        for (k, v) in patch {
            target.insert(k, v);
        }
    }
    serde_json::from_value(base).unwrap()
}

#[test]
fn test_fully_complete_approved_file() {
    let report = calculate_progress(&loan_file(json!({})));
    assert_eq!(report.percent, 100);
    assert_eq!(report.stage, PipelineStage::ClearToClose);
}

#[test]
fn test_complete_borrower_without_documents() {
    let report = calculate_progress(&loan_file(json!({ "documents": [] })));
    assert_eq!((report.percent, report.stage), (20, PipelineStage::AwaitingDocuments));
}

#[test]
fn test_string_income_of_zero_is_incomplete() {
    let file = loan_file(json!({
        "borrower": { "full_name": "Dana Reyes", "address": "12 Elm St", "income": "0" }
    }));
    let report = calculate_progress(&file);
    assert_eq!((report.percent, report.stage), (10, PipelineStage::ApplicationStarted));
}

#[test]
fn test_score_never_decreases_along_checklist() {
    let stages = [
        json!({ "borrower": {} }),
        json!({ "documents": [] }),
        json!({ "borrower": { "full_name": "D", "address": "A", "income": 1 } }),
        json!({ "underwriting_conditions": [ { "status": "Open" } ] }),
        json!({ "appraised_value": null }),
        json!({ "loan": { "status": "processing" } }),
        json!({}),
    ];
    let percents: Vec<u8> = stages
        .into_iter()
        .map(|patch| calculate_progress(&loan_file(patch)).percent)
        .collect();
    assert_eq!(percents, vec![10, 20, 40, 60, 70, 90, 100]);
}

#[test]
fn test_progress_envelope_names_blocker() {
    let out = progress_report(&loan_file(json!({ "appraised_value": 0 })));
    assert_eq!(out.result.stage, PipelineStage::AppraisalInProgress);
    assert_eq!(out.warnings, vec!["Appraisal In Progress: no appraised property value yet".to_string()]);

    let json = serde_json::to_value(&out.result).unwrap();
    assert_eq!(json, json!({ "percent": 70, "stage": "Appraisal In Progress" }));
}

#[test]
fn test_engagement_from_json() {
    let input: EngagementInput = serde_json::from_value(json!({
        "now": "2026-03-02T12:00:00Z",
        "events": [
            { "event_type": "uploaded", "timestamp": "2026-03-02T09:00:00Z" },
            { "event_type": "viewed", "timestamp": "2026-03-01T20:00:00Z" },
            { "event_type": "emailed", "timestamp": "2026-02-20T12:00:00Z" }
        ]
    }))
    .unwrap();

    // 35 * 1.4 + 15 * 1.2 + 5 = 72
    let out = score_engagement(&input);
    assert_eq!(out.result.score, 72);
    assert_eq!(out.result.events_counted, 3);
    assert_eq!(input.now, Some(Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()));
}

#[test]
fn test_engagement_spike_from_json() {
    let input: EngagementInput = serde_json::from_value(json!({
        "now": "2026-03-02T12:00:00Z",
        "borrower_name": "Dana Reyes",
        "events": [
            { "event_type": "opened", "timestamp": "2026-03-02T11:10:00Z" },
            { "event_type": "opened", "timestamp": "2026-03-02T11:30:00Z" },
            { "event_type": "opened", "timestamp": "2026-03-02T11:55:00Z" },
            { "event_type": "opened", "timestamp": "2026-03-02T10:00:00Z" }
        ]
    }))
    .unwrap();

    let out = score_engagement(&input);
    let spike = out.result.spike.expect("three opens in the hour");
    assert_eq!(spike.spike, EngagementSpike::RepeatedOpens { opens: 3 });
    assert_eq!(
        spike.message,
        "Borrower Dana Reyes opened the pre-approval email 3 times within the last hour."
    );
}
