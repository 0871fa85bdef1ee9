//! Purpose: Lock request-builder output against a serde_json baseline.
//! Exports: Integration tests only (no runtime exports).
//! Role: Catch drift between hand-built documents and the wire schema.
//! Invariants: Envelope shape, singleton op list, and key omission stay represented.

use netifctl::core::request::{ABI_VERSION, Operation, build_apply_request};
use serde::Deserialize;

#[derive(Deserialize)]
struct WireRequest {
    abi: u32,
    target: WireTarget,
    ops: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct WireTarget {
    if_index: u32,
}

fn build(if_index: u32, op: &Operation) -> Vec<u8> {
    build_apply_request(if_index, op)
        .expect("build")
        .as_bytes()
        .to_vec()
}

fn decode(bytes: &[u8]) -> WireRequest {
    serde_json::from_slice(bytes).expect("valid json")
}

#[test]
fn every_document_carries_the_envelope_and_one_op() {
    let ops = [
        Operation::AddIp {
            ip: "10.0.0.2".to_string(),
            prefix_len: 24,
        },
        Operation::DelIp {
            ip: "fe80::1".to_string(),
            prefix_len: 64,
        },
        Operation::SetIpv4Static {
            ip: "192.168.1.10".to_string(),
            prefix_len: 24,
            gateway: Some("192.168.1.1".to_string()),
        },
        Operation::SetIpv4Dhcp { enable: true },
    ];
    for op in &ops {
        let wire = decode(&build(9, op));
        assert_eq!(wire.abi, ABI_VERSION);
        assert_eq!(wire.target.if_index, 9);
        assert_eq!(wire.ops.len(), 1, "the client always emits a singleton list");
        assert_eq!(
            wire.ops[0].get("op").and_then(|v| v.as_str()),
            Some(op.op_name())
        );
    }
}

#[test]
fn add_ip_matches_the_documented_bytes() {
    let bytes = build(
        5,
        &Operation::AddIp {
            ip: "10.0.0.2".to_string(),
            prefix_len: 24,
        },
    );
    assert_eq!(
        bytes,
        br#"{"abi":1,"target":{"if_index":5},"ops":[{"op":"add_ip","ip":"10.0.0.2","prefix_len":24}]}"#
    );
}

#[test]
fn gateway_absence_is_key_omission_not_null() {
    let bytes = build(
        2,
        &Operation::SetIpv4Static {
            ip: "192.168.1.10".to_string(),
            prefix_len: 24,
            gateway: None,
        },
    );
    let wire = decode(&bytes);
    assert!(wire.ops[0].get("gateway").is_none());
    let text = String::from_utf8(bytes).expect("utf8");
    assert!(!text.contains("gateway"));
}

#[test]
fn dhcp_enable_is_a_json_boolean() {
    let wire = decode(&build(3, &Operation::SetIpv4Dhcp { enable: false }));
    assert_eq!(wire.ops[0].get("enable").and_then(|v| v.as_bool()), Some(false));
}

#[test]
fn escaped_operands_survive_a_json_round_trip() {
    let op = Operation::AddIp {
        ip: "odd\"name\\x".to_string(),
        prefix_len: 8,
    };
    let wire = decode(&build(1, &op));
    assert_eq!(
        wire.ops[0].get("ip").and_then(|v| v.as_str()),
        Some("odd\"name\\x")
    );
}
