// ============================================================
// Layer 2 — ChannelsUseCase
// ============================================================
// Lists the supported CUDA codes so users can pick --cuda without
// reading the source. Pure data; the CLI layer formats it.

use serde::Serialize;

use crate::domain::accelerator::{AcceleratorChannel, ACCELERATOR_CHANNELS};

/// One accelerator table row, shaped for display / JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelRow {
    pub code:      &'static str,
    pub channel:   &'static str,
    pub label:     &'static str,
    pub index_url: String,
    pub default:   bool,
}

impl From<&AcceleratorChannel> for ChannelRow {
    fn from(c: &AcceleratorChannel) -> Self {
        Self {
            code:      c.code,
            channel:   c.channel,
            label:     c.label,
            index_url: c.index_url(),
            default:   c.is_default(),
        }
    }
}

pub struct ChannelsUseCase;

impl ChannelsUseCase {
    pub fn rows(&self) -> Vec<ChannelRow> {
        ACCELERATOR_CHANNELS.iter().map(ChannelRow::from).collect()
    }
}
