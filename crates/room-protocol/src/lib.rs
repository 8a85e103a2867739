//! room-protocol
//!
//! Wire-level encoding/decoding for the room.
//!
//! This crate turns logical room messages (`room_core::InboundEvent` /
//! `OutboundEvent`) into single-line text frames and back again.
//!
//! - [`text_codec`] : `target,recipient,{json}` frames
//! - [`wire_types`] : JSON body shapes and frame target names

pub mod text_codec;
pub mod wire_types;

pub use text_codec::{
    decode_inbound,
    encode_ack,
    encode_inbound,
    encode_outbound,
    Frame,
    InboundFrame,
    ProtocolError,
};
