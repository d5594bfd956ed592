//! IANA IPFIX information elements not covered by the shared table.
//! sessionScope (267) and the structured list types (291 to 293) are
//! recognised but produce no output.

use super::{fields, FieldDef};
use crate::type_decoders::*;

pub(super) static IPFIX_FIELDS: &[(u16, &[FieldDef])] = fields! {
    128 => ["bgp_next_as": decode_uint],
    129 => ["bgp_prev_as": decode_uint],
    130 => ["exporter": decode_ip],
    131 => ["exporter": decode_ip],
    132 => ["dropped_bytes": decode_uint],
    133 => ["dropped_packets": decode_uint],
    134 => ["dropped_bytes_total": decode_uint],
    135 => ["dropped_packets_total": decode_uint],
    136 => ["flow_end_reason": decode_flow_end_reason],
    137 => ["common_properties_id": decode_uint],
    138 => ["observation_point_id": decode_uint],
    139 => ["icmp_type": decode_first_byte, "icmp_code": decode_second_byte],
    140 => ["mpls_top_label_ip": decode_ip],
    141 => ["linecard_id": decode_uint],
    142 => ["port_id": decode_uint],
    143 => ["metering_pid": decode_uint],
    144 => ["exporting_pid": decode_uint],
    145 => ["template_id": decode_uint],
    146 => ["wlan_channel": decode_uint],
    147 => ["wlan_ssid": decode_string],
    149 => ["observation_domain_id": decode_uint],
    150 => ["flow_start": decode_uint],
    151 => ["flow_end": decode_uint],
    154 => ["flow_start_us": decode_uint],
    155 => ["flow_end_us": decode_uint],
    156 => ["flow_start_ns": decode_uint],
    157 => ["flow_end_ns": decode_uint],
    158 => ["flow_start_delta_us": decode_uint],
    159 => ["flow_end_delta_us": decode_uint],
    160 => ["system_init_ms": decode_uint],
    161 => ["flow_duration_ms": decode_uint],
    162 => ["flow_duration_us": decode_uint],
    163 => ["flow_count_total": decode_uint],
    164 => ["ignored_packet_total": decode_uint],
    165 => ["ignored_bytes_total": decode_uint],
    166 => ["notsent_flow_count_total": decode_uint],
    167 => ["notsent_packet_total": decode_uint],
    168 => ["notsent_bytes_total": decode_uint],
    169 => ["ipv6_dst_prefix": decode_ip],
    170 => ["ipv6_src_prefix": decode_ip],
    171 => ["out_bytes_total": decode_uint],
    172 => ["out_packets_total": decode_uint],
    173 => ["flow_key_indicator": decode_hex],
    174 => ["out_mcast_packets_total": decode_uint],
    175 => ["out_mcast_bytes_total": decode_uint],
    180 => ["udp_src_port": decode_uint],
    181 => ["udp_dst_port": decode_uint],
    182 => ["tcp_src_port": decode_uint],
    183 => ["tcp_dst_port": decode_uint],
    184 => ["tcp_seq_number": decode_uint],
    185 => ["tcp_ack_number": decode_uint],
    186 => ["tcp_window_size": decode_uint],
    187 => ["tcp_urgent_ptr": decode_uint],
    188 => ["tcp_header_len": decode_uint],
    189 => ["ip_header_len": decode_uint],
    190 => ["ipv4_total_len": decode_uint],
    191 => ["ipv6_payload_len": decode_uint],
    192 => ["ttl": decode_uint],
    193 => ["ipv6_next_header": decode_uint],
    194 => ["mpls_payload_len": decode_uint],
    195 => ["dscp": decode_uint],
    196 => ["precedence": decode_uint],
    197 => ["fragment_flags": decode_fragment_flags],
    198 => ["bytes_sqr_sum": decode_uint],
    199 => ["bytes_sqr_sum_total": decode_uint],
    200 => ["mpls_top_label_ttl": decode_uint],
    201 => ["mpls_stack_len": decode_uint],
    202 => ["mpls_stack_depth": decode_uint],
    203 => ["mpls_top_label_exp": decode_uint],
    204 => ["ip_payload_len": decode_uint],
    205 => ["udp_msg_len": decode_uint],
    206 => ["mcast": decode_uint],
    207 => ["ipv4_inet_header_len": decode_uint],
    208 => ["ipv4_options": decode_ipv4_options],
    209 => ["tcp_options": decode_hex],
    210 => ["padding": decode_hex],
    211 => ["collector": decode_ip],
    212 => ["collector": decode_ip],
    213 => ["export_interface": decode_uint],
    214 => ["export_proto_version": decode_uint],
    215 => ["export_transport_proto": decode_uint],
    216 => ["collector_transport_port": decode_uint],
    217 => ["exporter_transport_port": decode_uint],
    218 => ["tcp_syn_total": decode_uint],
    219 => ["tcp_fin_total": decode_uint],
    220 => ["tcp_rst_total": decode_uint],
    221 => ["tcp_psh_total": decode_uint],
    222 => ["tcp_ack_total": decode_uint],
    223 => ["tcp_urg_total": decode_uint],
    224 => ["ip_total_len": decode_uint],
    229 => ["nat_origin_addr_realm": decode_uint],
    230 => ["nat_event": decode_uint],
    234 => ["in_vrf_id": decode_uint],
    235 => ["out_vrf_id": decode_uint],
    236 => ["vrf_name": decode_string],
    237 => ["out_mpls_top_label_exp": decode_uint],
    238 => ["tcp_window_scale": decode_uint],
    239 => ["biflow_direction": decode_biflow_direction],
    240 => ["eth_header_len": decode_uint],
    241 => ["eth_payload_len": decode_uint],
    242 => ["eth_total_len": decode_uint],
    243 => ["vlan_id": decode_uint],
    244 => ["vlan_priority": decode_uint],
    245 => ["vlan_customer_id": decode_uint],
    246 => ["vlan_customer_priority": decode_uint],
    247 => ["metro_evc_id": decode_string],
    248 => ["metro_evc_type": decode_uint],
    249 => ["pseudo_wire_id": decode_uint],
    250 => ["pseudo_wire_type": decode_hex],
    251 => ["pseudo_wire_ctrl_word": decode_hex],
    252 => ["in_phy_interface": decode_uint],
    253 => ["out_phy_interface": decode_uint],
    254 => ["out_vlan_id": decode_uint],
    255 => ["out_vlan_customer_id": decode_uint],
    256 => ["eth_type": decode_hex],
    257 => ["out_precedence": decode_uint],
    258 => ["collection_time_ms": decode_uint],
    259 => ["export_sctp_stream_id": decode_uint],
    260 => ["max_export_time": decode_uint],
    261 => ["max_flow_end_time": decode_uint],
    262 => ["msg_md5": decode_hex],
    263 => ["msg_scope": decode_uint],
    264 => ["min_export_time": decode_uint],
    265 => ["min_flow_start_time": decode_uint],
    266 => ["opaque_bytes": decode_uint],
    267 => [],
    268 => ["max_flow_end_time_us": decode_uint],
    269 => ["max_flow_end_time_ms": decode_uint],
    270 => ["max_flow_end_time_ns": decode_uint],
    271 => ["min_flow_start_time_us": decode_uint],
    272 => ["min_flow_start_time_ms": decode_uint],
    273 => ["min_flow_start_time_ns": decode_uint],
    274 => ["collector_cert": decode_string],
    275 => ["exporter_cert": decode_string],
    276 => ["data_records_reliability": decode_bool],
    277 => ["observation_point_type": decode_ops_point_type],
    278 => ["connection_new_count": decode_uint],
    279 => ["connection_duration_sum": decode_uint],
    280 => ["connection_transaction_id": decode_uint],
    283 => ["nat_pool_id": decode_uint],
    284 => ["nat_pool_name": decode_string],
    285 => ["anon_stability_class": decode_anon_stability_class, "anon_flags": decode_anon_flags],
    286 => ["anon_technique": decode_anon_technique],
    287 => ["information_element": decode_uint],
    288 => ["p2p": decode_technology],
    289 => ["tunnel": decode_technology],
    290 => ["encryption": decode_technology],
    291 => [],
    292 => [],
    293 => [],
    294 => ["bgp_validity_state": decode_uint],
    295 => ["ipsec_spi": decode_uint],
    296 => ["gre_key": decode_uint],
    297 => ["nat_type": decode_nat_type],
    298 => ["initiator_packets": decode_uint],
    299 => ["responder_packets": decode_uint],
    300 => ["observation_domain_name": decode_string],
    301 => ["observation_seq_id": decode_uint],
    302 => ["selector_id": decode_uint],
    303 => ["information_elem_id": decode_uint],
    304 => ["selector_algo": decode_selector_algorithm],
    305 => ["sampling_packet_interval": decode_uint],
    306 => ["sampling_packet_space": decode_uint],
    307 => ["sampling_time_interval_us": decode_uint],
    308 => ["sampling_time_space_us": decode_uint],
    309 => ["sampling_size": decode_uint],
    310 => ["sampling_population": decode_uint],
    311 => ["sampling_probability": decode_float64],
    312 => ["datalink_frame_size": decode_uint],
    313 => ["ip_header_packet_section": decode_hex],
    314 => ["ip_payload_packet_section": decode_hex],
    315 => ["datalink_frame_section": decode_hex],
    316 => ["mpls_label_stack_section": decode_hex],
    317 => ["mpls_payload_packet_section": decode_hex],
    318 => ["selector_total_packets_observed": decode_uint],
    319 => ["selector_total_packets_selected": decode_uint],
    320 => ["absolute_error": decode_float64],
    321 => ["relative_error": decode_float64],
    322 => ["event_time": decode_uint],
    326 => ["hash_digest": decode_hex],
    327 => ["hash_ip_payload_offset": decode_uint],
    328 => ["hash_ip_payload_size": decode_uint],
    329 => ["hash_out_range_min": decode_uint],
    330 => ["hash_out_range_max": decode_uint],
    331 => ["hash_selected_range_min": decode_uint],
    332 => ["hash_selected_range_max": decode_uint],
    333 => ["hash_digest_out": decode_bool],
    334 => ["hash_init_val": decode_uint],
    335 => ["selector_name": decode_string],
    336 => ["upper_confidence_interval_limit": decode_float64],
    337 => ["lower_confidence_interval_limit": decode_float64],
    338 => ["confidence_level": decode_float64],
    347 => ["virtual_station_interface_id": decode_hex],
    348 => ["virtual_station_interface_name": decode_string],
    349 => ["virtual_station_uuid": decode_hex],
    350 => ["virtual_station_name": decode_string],
    351 => ["l2_segment_id": decode_uint],
    352 => ["l2_bytes": decode_uint],
    353 => ["l2_bytes_total": decode_uint],
    354 => ["in_unicast_packets_total": decode_uint],
    355 => ["in_mcast_packets_total": decode_uint],
    356 => ["in_broadcast_packets_total": decode_uint],
    357 => ["out_unicast_packets_total": decode_uint],
    358 => ["out_broadcast_packets_total": decode_uint],
    359 => ["monitoring_interval_start_ms": decode_uint],
    360 => ["monitoring_interval_end_ms": decode_uint],
    361 => ["port_range_start": decode_uint],
    362 => ["port_range_end": decode_uint],
    363 => ["port_range_step_size": decode_uint],
    364 => ["port_range_ports": decode_uint],
    365 => ["station_mac": decode_mac],
    366 => ["station": decode_ip],
    367 => ["wtp_mac": decode_mac],
    368 => ["in_interface_type": decode_uint],
    369 => ["out_interface_type": decode_uint],
    370 => ["rtp_seq_number": decode_uint],
    371 => ["username": decode_string],
    372 => ["app_category": decode_string],
    373 => ["app_subcategory": decode_hex],
    374 => ["app_group": decode_string],
    375 => ["flows_original_present": decode_uint],
    376 => ["flows_original_initiated": decode_uint],
    377 => ["flows_original_completed": decode_uint],
    378 => ["flow_src_ip_count": decode_uint],
    379 => ["flow_dst_ip_count": decode_uint],
    380 => ["flow_src_ipv4_count": decode_uint],
    381 => ["flow_dst_ipv4_count": decode_uint],
    382 => ["flow_src_ipv6_count": decode_uint],
    383 => ["flow_dst_ipv6_count": decode_uint],
    384 => ["value_dist_method": decode_value_dist_method],
    385 => ["rfc3550_jitter_ms": decode_uint],
    386 => ["rfc3550_jitter_us": decode_uint],
    387 => ["rfc3550_jitter_ns": decode_uint],
    388 => ["vlan_dei": decode_bool],
    389 => ["vlan_customer_dei": decode_uint],
    390 => ["flow_selector_algo": decode_selector_algorithm],
    391 => ["flow_selected_byte_count": decode_uint],
    392 => ["flow_selected_packet_count": decode_uint],
    393 => ["flow_selected_count": decode_uint],
    394 => ["selector_id_flows_observed_total": decode_uint],
    395 => ["selector_id_flows_selected_total": decode_uint],
    396 => ["sampling_flow_interval_count": decode_uint],
    397 => ["sampling_flow_spacing_count": decode_uint],
    398 => ["sampling_flow_interval_ms": decode_uint],
    399 => ["sampling_flow_spacing_ms": decode_uint],
    400 => ["flow_domain_hash_element_id": decode_uint],
    401 => ["transport_byte_count": decode_uint],
    402 => ["transport_packet_count": decode_uint],
    403 => ["exporter_original_ip": decode_ip],
    404 => ["exporter_original_ip": decode_ip],
    405 => ["exporter_original_domain": decode_hex],
    406 => ["intermediate_process_id": decode_hex],
    407 => ["ignored_data_records_total": decode_uint],
    408 => ["datalink_frame_type": decode_data_link_frame_type],
    409 => ["section_offset": decode_uint],
    410 => ["section_exported_bytes": decode_uint],
    411 => ["vlan_service_instance_tag": decode_hex],
    412 => ["vlan_service_instance_id": decode_uint],
    413 => ["vlan_service_instance_priority": decode_uint],
    414 => ["vlan_customer_src_mac": decode_mac],
    415 => ["vlan_customer_dst_mac": decode_mac],
    417 => ["post_layer2_bytes": decode_uint],
    418 => ["post_mcast_layer2_bytes": decode_uint],
    420 => ["post_layer2_bytes_total": decode_uint],
    421 => ["post_mcast_layer2_bytes_total": decode_uint],
    422 => ["min_layer2_total_length": decode_uint],
    423 => ["max_layer2_total_length": decode_uint],
    424 => ["dropped_layer2_bytes": decode_uint],
    425 => ["dropped_layer2_bytes_total": decode_uint],
    426 => ["ignored_layer2_bytes_total": decode_uint],
    427 => ["not_sent_layer2_bytes_total": decode_uint],
    428 => ["layer2_bytes_sumsqr": decode_uint],
    429 => ["layer2_bytes_total_sumsqr": decode_uint],
    430 => ["layer2_frames": decode_uint],
    431 => ["layer2_frames_total": decode_uint],
    432 => ["pseudo_wire_dst": decode_ip],
    433 => ["ignored_layer2_frames_total": decode_uint],
    434 => ["mib_obj_value_int": decode_int],
    435 => ["mib_obj_value_str": decode_string],
    436 => ["mib_obj_value_oid": decode_hex],
    437 => ["mib_obj_value_bits": decode_hex],
    438 => ["mib_obj_value_ip": decode_ip],
    439 => ["mib_obj_value_counter": decode_uint],
    440 => ["mib_obj_value_gauge": decode_uint],
    441 => ["mib_obj_value_time": decode_uint],
    442 => ["mib_obj_value_uint": decode_uint],
    443 => ["mib_obj_value_table": decode_hex],
    444 => ["mib_obj_value_row": decode_hex],
    445 => ["mib_oid": decode_hex],
    446 => ["mib_sub_id": decode_uint],
    447 => ["mib_index_indicator": decode_hex],
    448 => ["mib_capture_time_semantics": decode_capture_time_semantics],
    449 => ["mib_context_engine_id": decode_hex],
    450 => ["mib_context_name": decode_string],
    451 => ["mib_obj_name": decode_string],
    452 => ["mib_obj_desc": decode_string],
    453 => ["mib_obj_syntax": decode_string],
    454 => ["mib_module_name": decode_string],
    455 => ["imsi": decode_string],
    456 => ["msisdn": decode_string],
    457 => ["http_status_code": decode_uint],
    458 => ["src_transport_port_limit": decode_uint],
    459 => ["http_request_method": decode_string],
    460 => ["http_request_host": decode_string],
    461 => ["http_request_target": decode_string],
    462 => ["http_msg_version": decode_string],
    463 => ["nat_instance_id": decode_uint],
    464 => ["internal_addr_realm": decode_hex],
    465 => ["external_addr_realm": decode_hex],
    466 => ["nat_quota_exceeded_event": decode_uint],
    467 => ["nat_threshold_event": decode_uint],
    468 => ["http_user_agent": decode_string],
    469 => ["http_content_type": decode_string],
    470 => ["http_reason_phrase": decode_string],
    471 => ["max_session_entries": decode_uint],
    472 => ["max_bib_entries": decode_uint],
    473 => ["max_entries_per_user": decode_uint],
    474 => ["max_subscribers": decode_uint],
    475 => ["max_fragments_pending_reassembly": decode_uint],
    476 => ["addr_pool_threshold_high": decode_uint],
    477 => ["addr_pool_threshold_low": decode_uint],
    478 => ["addr_port_mapping_threshold_high": decode_uint],
    479 => ["addr_port_mapping_threshold_low": decode_uint],
    480 => ["addr_port_mapping_per_user_threshold_high": decode_uint],
    481 => ["global_addr_mapping_threshold_high": decode_uint],
    482 => ["vpn_identifier": decode_ip],
    483 => ["bgp_community": decode_uint],
    484 => ["bgp_src_community_list": decode_hex],
    485 => ["bgp_dst_community_list": decode_hex],
    486 => ["bgp_extended_community": decode_hex],
    487 => ["bgp_src_extended_community_list": decode_hex],
    488 => ["bgp_dst_extended_community_list": decode_hex],
    489 => ["bgp_large_community": decode_hex],
    490 => ["bgp_src_large_community_list": decode_hex],
    491 => ["bgp_dst_large_community_list": decode_hex],
};
