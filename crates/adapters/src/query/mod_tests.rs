// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn success_response_with_pagination() {
    let response: QueryResponse = serde_json::from_value(json!({
        "success": true,
        "version": "1.4.0",
        "command": "ships",
        "timestamp": "2026-03-01T12:00:00Z",
        "data": [{"name": "Argon Mercury"}],
        "pagination": {"total": 120, "limit": 20, "offset": 40, "hasMore": true}
    }))
    .unwrap();

    assert!(response.success);
    assert_eq!(response.command.as_deref(), Some("ships"));
    assert_eq!(
        response.pagination,
        Some(Pagination {
            total: 120,
            limit: 20,
            offset: 40,
            has_more: true
        })
    );
}

#[test]
fn pagination_accepts_snake_case() {
    let pagination: Pagination =
        serde_json::from_value(json!({"total": 1, "limit": 1, "offset": 0, "has_more": false}))
            .unwrap();
    assert!(!pagination.has_more);
}

#[test]
fn failure_response_error_fields() {
    let response: QueryResponse = serde_json::from_value(json!({
        "success": false,
        "message": "not found",
        "code": 404,
        "type": "SaveNotFound",
        "errors": [{"message": "no such file", "class": "IOException"}],
        "actions": ["Refresh the save list"]
    }))
    .unwrap();

    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("not found"));
    assert_eq!(response.error_type.as_deref(), Some("SaveNotFound"));
    assert_eq!(response.code, Some(ErrorCode::from(404)));
    assert_eq!(response.errors.unwrap()[0].class.as_deref(), Some("IOException"));
    assert_eq!(response.actions.unwrap(), vec!["Refresh the save list"]);
    assert_eq!(response.data, Value::Null);
}

#[test]
fn serialized_response_uses_wire_names() {
    let mut response = QueryResponse::rejected("bad filter");
    response.error_type = Some("FilterError".to_string());
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json,
        json!({"success": false, "data": null, "message": "bad filter", "type": "FilterError"})
    );
}

#[test]
fn failure_response_with_string_code() {
    let response: QueryResponse = serde_json::from_value(json!({
        "success": false,
        "message": "not found",
        "code": "E404"
    }))
    .unwrap();

    assert_eq!(response.message.as_deref(), Some("not found"));
    assert_eq!(response.code, Some(ErrorCode::from("E404")));
    assert_eq!(
        serde_json::to_value(&response).unwrap()["code"],
        json!("E404")
    );
}
