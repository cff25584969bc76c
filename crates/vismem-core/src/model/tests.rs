use super::*;
use chrono::{TimeZone, Utc};

fn sample_json() -> &'static str {
    r#"{
        "filename": "dashboard.png",
        "upload_time": "2026-03-01T12:00:00Z",
        "text_content": "Total revenue $42k",
        "image_data": "aGVsbG8="
    }"#
}

#[test]
fn test_screenshot_deserialize_full() {
    let s: Screenshot = serde_json::from_str(sample_json()).unwrap();
    assert_eq!(s.filename, "dashboard.png");
    assert_eq!(s.upload_time, Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
    assert_eq!(s.text_content.as_deref(), Some("Total revenue $42k"));
    assert_eq!(s.image_data.as_deref(), Some("aGVsbG8="));
}

#[test]
fn test_screenshot_optional_fields_default() {
    let s: Screenshot = serde_json::from_str(
        r#"{"filename": "a.png", "upload_time": "2026-03-01T12:00:00Z"}"#,
    )
    .unwrap();
    assert!(s.text_content.is_none());
    assert!(s.image_data.is_none());
}

#[test]
fn test_screenshot_serialize_skips_absent_image_data() {
    let s: Screenshot = serde_json::from_str(
        r#"{"filename": "a.png", "upload_time": "2026-03-01T12:00:00Z"}"#,
    )
    .unwrap();
    let out = serde_json::to_string(&s).unwrap();
    assert!(!out.contains("image_data"));
}

#[test]
fn test_search_result_flattens_screenshot_fields() {
    let r: SearchResult = serde_json::from_str(
        r#"{
            "filename": "login.png",
            "upload_time": "2026-03-01T12:00:00Z",
            "confidence_score": 0.87,
            "visual_description": "a login form with two fields"
        }"#,
    )
    .unwrap();
    assert_eq!(r.filename(), "login.png");
    assert!((r.confidence_score - 0.87).abs() < f32::EPSILON);
    assert_eq!(r.visual_description, "a login form with two fields");
}

#[test]
fn test_search_result_missing_description_defaults_empty() {
    let r: SearchResult = serde_json::from_str(
        r#"{
            "filename": "x.png",
            "upload_time": "2026-03-01T12:00:00Z",
            "confidence_score": 0.5
        }"#,
    )
    .unwrap();
    assert!(r.visual_description.is_empty());
}

#[test]
fn test_upload_file_image_detection() {
    let png = UploadFile {
        name: "shot.png".into(),
        content_type: "image/png".into(),
        bytes: vec![1, 2, 3],
    };
    let txt = UploadFile {
        name: "notes.txt".into(),
        content_type: "text/plain".into(),
        bytes: vec![4, 5],
    };
    assert!(png.is_image());
    assert!(!txt.is_image());
}

#[test]
fn test_validate_query() {
    assert_eq!(validate_query("  login form ").unwrap(), "login form");
    assert!(validate_query("").is_err());
    assert!(validate_query("   ").is_err());
}

#[test]
fn test_operation_status_independence() {
    let mut status = OperationStatus::default();
    assert!(!status.any_in_flight());
    status.searching = true;
    status.uploading = true;
    assert!(status.any_in_flight());
    status.searching = false;
    status.uploading = false;
    status.deleting = Some("a.png".into());
    assert!(status.any_in_flight());
}

#[test]
fn test_notice_severity() {
    assert!(Notice::error("nope").is_error());
    assert!(!Notice::info("all good").is_error());
}
