use serde::Serialize;

use crate::channels::ChannelState;

/// Per-state channel counts for the dashboard's diagnostics pane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total_count: usize,
    pub connected_count: usize,
    pub connecting_count: usize,
    pub stale_count: usize,
    pub disconnected_count: usize,
}

/// Count channels per state.
pub fn summarize(states: &[ChannelState]) -> StatusSummary {
    let mut summary = StatusSummary {
        total_count: states.len(),
        ..StatusSummary::default()
    };

    for state in states {
        match state {
            ChannelState::Connected => summary.connected_count += 1,
            ChannelState::Connecting => summary.connecting_count += 1,
            ChannelState::Stale => summary.stale_count += 1,
            ChannelState::Disconnected => summary.disconnected_count += 1,
        }
    }

    summary
}
