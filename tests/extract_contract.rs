//! Purpose: Lock extractor behavior with corpus + differential coverage.
//! Exports: Integration tests only (no runtime exports).
//! Role: Catch semantic drift between the schema-aware reader and a serde_json baseline.
//! Invariants: Bounded truncation, drop rules, and known divergences stay represented.
//! Notes: The `\uXXXX` placeholder divergence is asserted, not hidden.

use netifctl::core::extract::{
    MAX_INTERFACES, parse_apply_response, parse_interface_list,
};
use serde_json::{Value, json};

fn list_doc(count: usize) -> Vec<u8> {
    let items: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "if_index": i as u32 + 1,
                "name": format!("if{}", i + 1),
                "ipv4": [{"ip": format!("10.0.{}.1", i % 250), "prefix_len": 24}],
                "ipv6": [],
            })
        })
        .collect();
    serde_json::to_vec(&json!({ "items": items })).expect("encode")
}

#[test]
fn decoded_records_match_the_serde_view() {
    let doc = list_doc(5);
    let records = parse_interface_list(&doc);
    let baseline: Value = serde_json::from_slice(&doc).expect("baseline");
    let items = baseline["items"].as_array().expect("items");
    assert_eq!(records.len(), items.len());
    for (record, item) in records.iter().zip(items) {
        assert_eq!(
            u64::from(record.if_index),
            item["if_index"].as_u64().expect("if_index")
        );
        assert_eq!(record.name, item["name"].as_str().expect("name"));
        let ipv4 = item["ipv4"].as_array().expect("ipv4");
        assert_eq!(record.ipv4.len(), ipv4.len());
        assert_eq!(record.ipv4[0].ip, ipv4[0]["ip"].as_str().expect("ip"));
        assert_eq!(
            u64::from(record.ipv4[0].prefix_len),
            ipv4[0]["prefix_len"].as_u64().expect("prefix_len")
        );
    }
}

#[test]
fn oversized_listings_truncate_to_the_bound() {
    let doc = list_doc(MAX_INTERFACES + 10);
    let records = parse_interface_list(&doc);
    assert_eq!(records.len(), MAX_INTERFACES);
    assert_eq!(records[MAX_INTERFACES - 1].if_index, MAX_INTERFACES as u32);
}

#[test]
fn exact_bound_is_not_truncated() {
    let doc = list_doc(MAX_INTERFACES);
    assert_eq!(parse_interface_list(&doc).len(), MAX_INTERFACES);
}

#[test]
fn serde_encoded_escapes_decode_identically() {
    let name = "a\"b\\c\nd\te";
    let doc = serde_json::to_vec(&json!({
        "items": [{"if_index": 1, "name": name, "ipv4": [], "ipv6": []}]
    }))
    .expect("encode");
    let records = parse_interface_list(&doc);
    assert_eq!(records[0].name, name);
}

#[test]
fn unicode_escapes_diverge_by_design() {
    // serde_json decodes \u0041 to 'A'; the schema-aware reader keeps a
    // placeholder instead of reconstructing code points.
    let doc = br#"{"items":[{"if_index":1,"name":"\u0041x","ipv4":[],"ipv6":[]}]}"#;
    let baseline: Value = serde_json::from_slice(doc).expect("baseline");
    assert_eq!(baseline["items"][0]["name"].as_str(), Some("Ax"));
    let records = parse_interface_list(doc);
    assert_eq!(records[0].name, "?x");
}

#[test]
fn whitespace_variants_decode_like_compact_documents() {
    let compact = br#"{"items":[{"if_index":3,"name":"wan0","ipv4":[{"ip":"1.2.3.4","prefix_len":32}],"ipv6":[]}]}"#;
    let spaced = br#"{
        "items": [ {
            "if_index": 3 ,
            "name": "wan0" ,
            "ipv4": [ { "ip": "1.2.3.4" , "prefix_len": 32 } ] ,
            "ipv6": [ ]
        } ]
    }"#;
    assert_eq!(parse_interface_list(compact), parse_interface_list(spaced));
}

#[test]
fn apply_reports_match_the_serde_view() {
    let doc = serde_json::to_vec(&json!({
        "ok": false,
        "results": [
            {"i": 0, "ok": true},
            {"i": 1, "ok": false, "error": {"code": "NotFound", "message": "no such interface"}}
        ]
    }))
    .expect("encode");
    let report = parse_apply_response(&doc);
    let baseline: Value = serde_json::from_slice(&doc).expect("baseline");
    assert_eq!(report.ok, baseline["ok"].as_bool().expect("ok"));
    assert_eq!(
        report.results.len(),
        baseline["results"].as_array().expect("results").len()
    );
    assert!(report.results[0].ok);
    assert_eq!(report.results[1].code.as_deref(), Some("NotFound"));
    assert_eq!(
        report.results[1].message.as_deref(),
        Some("no such interface")
    );
}

#[test]
fn malformed_documents_never_panic() {
    let cases: &[&[u8]] = &[
        b"",
        b"{",
        b"not json at all",
        br#"{"items":"#,
        br#"{"items":[{"#,
        br#"{"items":[{"name":"unterminated"#,
        br#"{"ok":true,"results":["#,
        br#"{"ok":true,"results":[{]}"#,
    ];
    for case in cases {
        let _ = parse_interface_list(case);
        let _ = parse_apply_response(case);
    }
}
