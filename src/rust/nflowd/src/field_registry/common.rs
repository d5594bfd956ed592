//! Elements shared by NetFlow v9 and IPFIX: the v9 field types 1 to 104
//! plus the Cisco ASA extensions that IANA later assigned.

use super::{fields, FieldDef};
use crate::type_decoders::*;

pub(super) static COMMON_FIELDS: &[(u16, &[FieldDef])] = fields! {
    1 => ["in_bytes": decode_uint],
    2 => ["in_packets": decode_uint],
    3 => ["flows": decode_uint],
    4 => ["protocol": decode_l4_proto],
    5 => ["src_tos": decode_hex],
    6 => ["tcp_flags": decode_tcp_flags],
    7 => ["src_port": decode_uint],
    8 => ["src": decode_ip],
    9 => ["src_mask": decode_uint],
    10 => ["in_snmp": decode_uint],
    11 => ["dst_port": decode_uint],
    12 => ["dst": decode_ip],
    13 => ["dst_mask": decode_uint],
    14 => ["out_snmp": decode_uint],
    15 => ["next_hop": decode_ip],
    16 => ["bgp_src_as": decode_uint],
    17 => ["bgp_dst_as": decode_uint],
    18 => ["bgp_next_hop": decode_ip],
    19 => ["out_mcast_packets": decode_uint],
    20 => ["out_mcast_bytes": decode_uint],
    21 => ["last_switched": decode_uint],
    22 => ["first_switched": decode_uint],
    23 => ["out_bytes": decode_uint],
    24 => ["out_packets": decode_uint],
    25 => ["min_packet_len": decode_uint],
    26 => ["max_packet_len": decode_uint],
    27 => ["src": decode_ip],
    28 => ["dst": decode_ip],
    29 => ["src_mask": decode_uint],
    30 => ["dst_mask": decode_uint],
    31 => ["flow_label": decode_hex],
    32 => ["icmp_type": decode_first_byte, "icmp_code": decode_second_byte],
    33 => ["igmp_type": decode_uint],
    34 => ["sampling_interval": decode_uint],
    35 => ["sampling_algo": decode_sample_algo],
    36 => ["flow_active_timeout": decode_uint],
    37 => ["flow_inactive_timeout": decode_uint],
    38 => ["engine_type": decode_engine_type],
    39 => ["engine_id": decode_hex],
    40 => ["total_bytes_exported": decode_uint],
    41 => ["total_messages_exported": decode_uint],
    42 => ["total_flows_exported": decode_uint],
    44 => ["ipv4_src_prefix": decode_ip],
    45 => ["ipv4_dst_prefix": decode_ip],
    46 => ["mpls_top_label_type": decode_mpls_type],
    47 => ["mpls_top_label_ip": decode_ip],
    48 => ["flow_sampler_id": decode_uint],
    49 => ["flow_sampler_mode": decode_sample_algo],
    50 => ["flow_sampler_interval": decode_uint],
    52 => ["min_ttl": decode_uint],
    53 => ["max_ttl": decode_uint],
    54 => ["fragment_id": decode_hex],
    55 => ["dst_tos": decode_hex],
    56 => ["in_src_mac": decode_mac],
    57 => ["out_dst_mac": decode_mac],
    58 => ["vlan_src": decode_uint],
    59 => ["vlan_dst": decode_uint],
    60 => ["ip_version": decode_ip_version],
    61 => ["flow_direction": decode_direction],
    62 => ["next_hop": decode_ip],
    63 => ["bgp_next_hop": decode_ip],
    64 => ["ipv6_extensions": decode_hex],
    70 => ["mpls_label_1": decode_hex],
    71 => ["mpls_label_2": decode_hex],
    72 => ["mpls_label_3": decode_hex],
    73 => ["mpls_label_4": decode_hex],
    74 => ["mpls_label_5": decode_hex],
    75 => ["mpls_label_6": decode_hex],
    76 => ["mpls_label_7": decode_hex],
    77 => ["mpls_label_8": decode_hex],
    78 => ["mpls_label_9": decode_hex],
    79 => ["mpls_label_10": decode_hex],
    80 => ["in_dst_mac": decode_mac],
    81 => ["out_src_mac": decode_mac],
    82 => ["interface": decode_string],
    83 => ["interface_desc": decode_string],
    84 => ["sampler_name": decode_string],
    85 => ["in_total_bytes": decode_uint],
    86 => ["in_total_packets": decode_uint],
    88 => ["fragment_offset": decode_uint],
    89 => ["fwd_status": decode_fwd_status, "fwd_reason": decode_fwd_reason],
    90 => ["mpls_vpn_rd": decode_hex],
    91 => ["mpls_prefix_len": decode_uint],
    92 => ["src_traffic_index": decode_uint],
    93 => ["dst_traffic_index": decode_uint],
    94 => ["app_desc": decode_string],
    95 => ["app_id": decode_hex],
    96 => ["app_name": decode_string],
    98 => ["out_dscp": decode_uint],
    99 => ["replication_factor": decode_uint],
    101 => ["classification_engine_id": decode_uint],
    102 => ["l2_packet_section_offset": decode_uint],
    103 => ["l2_packet_section_size": decode_uint],
    104 => ["l2_packet_section_data": decode_hex],
    148 => ["flow_id": decode_uint],
    152 => ["flow_start_ms": decode_uint],
    153 => ["flow_end_ms": decode_uint],
    176 => ["icmp_type": decode_uint],
    177 => ["icmp_code": decode_uint],
    178 => ["icmp_type": decode_uint],
    179 => ["icmp_code": decode_uint],
    225 => ["xlat_src": decode_ip],
    226 => ["xlat_dst": decode_ip],
    227 => ["xlat_src_port": decode_uint],
    228 => ["xlat_dst_port": decode_uint],
    231 => ["initiator_bytes": decode_uint],
    232 => ["responder_bytes": decode_uint],
    233 => ["fw_event": decode_fw_event],
    281 => ["xlat_src": decode_ip],
    282 => ["xlat_dst": decode_ip],
    323 => ["event_time_ms": decode_uint],
    324 => ["event_time_us": decode_uint],
    325 => ["event_time_ns": decode_uint],
};
