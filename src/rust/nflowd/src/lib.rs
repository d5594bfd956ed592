//! NetFlow v5, NetFlow v9 and IPFIX collector.
//!
//! Datagrams arrive on a UDP socket, are queued for a single decoder
//! task and come out as metrics handed to an [`accumulator::Accumulator`].
//! Templates and the optional interface/application names live in
//! actor tasks that the decoder talks to over channels.

pub mod accumulator;
pub mod decoder;
pub mod field_registry;
pub mod listener;
pub mod name_cache;
pub mod stats;
pub mod template;
pub mod template_store;
pub mod type_decoders;
