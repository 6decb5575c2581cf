//! Electrical connectivity: anchors and net segments.
//!
//! Pads, vias and net points are anchors. Every net line terminates at exactly two
//! anchors and is registered on both of them while it is part of the board. The
//! registry held by each anchor is the only way to walk from an endpoint to the
//! traces attached to it.

use crate::error::ConnectivityError;
use crate::items::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Unique identifier for net segments.
pub type SegmentId = Uuid;

/// Set of net lines attached to an anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetLineAnchor {
    net_lines: HashSet<ItemId>,
}

impl NetLineAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a net line ending at this anchor.
    pub fn register_net_line(&mut self, line: ItemId) -> Result<(), ConnectivityError> {
        if !self.net_lines.insert(line) {
            return Err(ConnectivityError::AlreadyRegistered(line));
        }
        Ok(())
    }

    /// Unregister a net line previously registered on this anchor.
    pub fn unregister_net_line(&mut self, line: ItemId) -> Result<(), ConnectivityError> {
        if !self.net_lines.remove(&line) {
            return Err(ConnectivityError::NotRegistered(line));
        }
        Ok(())
    }

    /// All attached net lines. Iteration order is unspecified.
    pub fn net_lines(&self) -> &HashSet<ItemId> {
        &self.net_lines
    }

    pub fn is_registered(&self, line: ItemId) -> bool {
        self.net_lines.contains(&line)
    }

    /// An anchor is used while at least one net line is attached.
    pub fn is_used(&self) -> bool {
        !self.net_lines.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.net_lines.clear();
    }
}

/// A connected group of traces, vias and net points belonging to one net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetSegment {
    pub id: SegmentId,
    pub net_name: String,
}

impl NetSegment {
    pub fn new(net_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            net_name: net_name.into(),
        }
    }
}
