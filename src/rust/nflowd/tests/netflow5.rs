mod common;

use common::*;
use nflowd::accumulator::CollectingAccumulator;
use nflowd::decoder::{DecoderError, FlowDecoder, FLOW_MEASUREMENT};
use nflowd::field_registry::FieldRegistry;
use nflowd::name_cache::{name_cache_actor, InterfaceNames};
use nflowd::template_store::template_store_actor;
use nflowd::type_decoders::FlowValue;
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;

fn v5_packet(count: u16, records: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&5u16.to_be_bytes());
    out.extend_from_slice(&count.to_be_bytes());
    out.extend_from_slice(&60_000u32.to_be_bytes());
    out.extend_from_slice(&1_700_000_000u32.to_be_bytes());
    out.extend_from_slice(&250_000_000u32.to_be_bytes());
    out.extend_from_slice(&9u32.to_be_bytes());
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(&0u16.to_be_bytes());
    for i in 0..records {
        let mut record = [0u8; 48];
        record[0..4].copy_from_slice(&[10, 0, 0, i as u8 + 1]);
        record[4..8].copy_from_slice(&[10, 0, 1, 1]);
        record[12..14].copy_from_slice(&3u16.to_be_bytes());
        record[14..16].copy_from_slice(&0u16.to_be_bytes());
        record[20..24].copy_from_slice(&512u32.to_be_bytes());
        record[38] = 17;
        out.extend_from_slice(&record);
    }
    out
}

#[tokio::test]
async fn every_record_becomes_a_metric() {
    let harness = Harness::new().await;
    harness
        .decoder
        .decode_packet(&packet(v5_packet(2, 2)))
        .await
        .unwrap();
    let metrics = harness.take();
    assert_eq!(metrics.len(), 2);
    assert_eq!(metrics[0].measurement, FLOW_MEASUREMENT);
    assert_eq!(metrics[0].tags["version"], "NetFlowV5");
    assert_eq!(metrics[0].tags["exporter"], "192.0.2.10");
    assert_eq!(metrics[1].fields["src"], FlowValue::from("10.0.0.2"));
    assert_eq!(metrics[1].fields["in_bytes"], FlowValue::Unsigned(512));
    assert_eq!(metrics[1].fields["protocol"], FlowValue::from("udp"));
    assert_eq!(metrics[1].fields["engine_type"], FlowValue::from("RP"));
    assert_eq!(
        metrics[0].timestamp,
        UNIX_EPOCH + Duration::from_secs(1_700_000_000) + Duration::from_millis(250)
    );
}

#[tokio::test]
async fn short_packets_are_rejected() {
    let harness = Harness::new().await;
    let result = harness.decoder.decode_packet(&packet(v5_packet(3, 2))).await;
    assert!(matches!(
        result,
        Err(DecoderError::LengthOverrun {
            declared: 168,
            available: 120
        })
    ));
    assert!(harness.take().is_empty());

    let result = harness
        .decoder
        .decode_packet(&packet(v5_packet(0, 0)[..20].to_vec()))
        .await;
    assert!(matches!(result, Err(DecoderError::TruncatedHeader { .. })));
}

#[tokio::test]
async fn known_interfaces_are_tagged() {
    let cancel = CancellationToken::new();
    let interfaces: InterfaceNames = name_cache_actor("interface", cancel.clone()).await;
    interfaces.write(3, "ge-0/0/1".to_string()).await.unwrap();
    let metrics = Arc::new(CollectingAccumulator::new());
    let decoder = FlowDecoder::new(
        Arc::new(FieldRegistry::new()),
        template_store_actor(cancel.clone()).await,
        metrics.clone(),
    )
    .with_interface_names(interfaces);

    decoder.decode_packet(&packet(v5_packet(1, 1))).await.unwrap();
    let metrics = metrics.take();
    assert_eq!(metrics[0].tags["interface_input_name"], "ge-0/0/1");
    // Index 0 is never looked up
    assert!(!metrics[0].tags.contains_key("interface_output_name"));
    cancel.cancel();
}
