//! Workspace state snapshots
//!
//! A [`SnapshotSet`] is the caller-supplied, read-only view of the workspace
//! that one analysis run observes:
//! - [`ContextSnapshot`]: session, focus, activity, and health state
//! - dimension snapshots keyed by node
//! - topology nodes and the event timeline
//!
//! Snapshots are captured outside this crate (UI state, test harness) and are
//! never mutated once a run has started.

use crate::types::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use ulid::Ulid;

/// Point-in-time capture of the ambient workspace state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSnapshot {
    /// Capture timestamp
    pub captured_at: DateTime<Utc>,
    /// Current session statistics
    pub session: SessionStats,
    /// Focus state
    pub focus: FocusState,
    /// Activity counters for the capture window
    pub activity: ActivityCounters,
    /// Workspace health counters
    pub health: HealthCounters,
}

impl ContextSnapshot {
    /// Capture an empty snapshot at the current instant
    #[must_use]
    pub fn now() -> Self {
        Self {
            captured_at: Utc::now(),
            session: SessionStats::default(),
            focus: FocusState::default(),
            activity: ActivityCounters::default(),
            health: HealthCounters::default(),
        }
    }

    /// With session stats
    #[inline]
    #[must_use]
    pub fn with_session(mut self, session: SessionStats) -> Self {
        self.session = session;
        self
    }

    /// With focus state
    #[inline]
    #[must_use]
    pub fn with_focus(mut self, focus: FocusState) -> Self {
        self.focus = focus;
        self
    }

    /// With activity counters
    #[inline]
    #[must_use]
    pub fn with_activity(mut self, activity: ActivityCounters) -> Self {
        self.activity = activity;
        self
    }

    /// With health counters
    #[inline]
    #[must_use]
    pub fn with_health(mut self, health: HealthCounters) -> Self {
        self.health = health;
        self
    }
}

/// Session-level statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session start timestamp
    pub started_at: DateTime<Utc>,
    /// Seconds of active use this session
    pub active_secs: u64,
    /// Interaction count this session
    pub interactions: u64,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            active_secs: 0,
            interactions: 0,
        }
    }
}

/// Focus state at capture time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FocusState {
    /// Node currently in focus, if any
    pub focused_node: Option<NodeId>,
    /// Focus mode classification
    pub mode: FocusMode,
    /// Seconds of unbroken focus on the current node
    pub streak_secs: u64,
}

/// Focus mode classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FocusMode {
    /// Sustained attention on a single node
    Deep,
    /// Light engagement, frequent switching
    #[default]
    Shallow,
    /// Rapid switching with no anchor node
    Scattered,
    /// No activity
    Idle,
}

/// Activity counters for the capture window
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActivityCounters {
    /// New items captured
    pub captures: u64,
    /// Edits to existing nodes
    pub edits: u64,
    /// Review passes completed
    pub reviews: u64,
    /// Navigation jumps between nodes
    pub navigations: u64,
}

/// Workspace health counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HealthCounters {
    /// Unacknowledged alerts
    pub open_alerts: u64,
    /// Items past their review date
    pub overdue_items: u64,
    /// Nodes with no activity inside the window
    pub stale_nodes: u64,
}

/// Per-node dimension readings
///
/// Dimension values are normalized to [0,1] by the producer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionSnapshot {
    /// Node these readings belong to
    pub node: NodeId,
    /// Dimension name to normalized value
    pub values: BTreeMap<String, f64>,
    /// Aggregate trend across the window
    pub trend: Trend,
    /// Sample timestamp
    pub sampled_at: DateTime<Utc>,
}

impl DimensionSnapshot {
    /// Create an empty snapshot for a node
    #[must_use]
    pub fn new(node: impl Into<NodeId>) -> Self {
        Self {
            node: node.into(),
            values: BTreeMap::new(),
            trend: Trend::Flat,
            sampled_at: Utc::now(),
        }
    }

    /// With a dimension reading
    #[inline]
    #[must_use]
    pub fn with_value(mut self, dimension: impl Into<String>, value: f64) -> Self {
        self.values.insert(dimension.into(), value);
        self
    }

    /// With an aggregate trend
    #[inline]
    #[must_use]
    pub fn with_trend(mut self, trend: Trend) -> Self {
        self.trend = trend;
        self
    }

    /// Reading for a named dimension
    #[inline]
    #[must_use]
    pub fn value(&self, dimension: &str) -> Option<f64> {
        self.values.get(dimension).copied()
    }
}

/// Aggregate trend direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Trend {
    /// Values improving across the window
    Rising,
    /// No significant movement
    #[default]
    Flat,
    /// Values declining across the window
    Falling,
}

/// One node of the workspace topology
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyNode {
    /// Node identifier
    pub id: NodeId,
    /// Human label
    pub label: String,
    /// Sphere (grouping) this node belongs to
    pub sphere: String,
    /// Number of links to other nodes
    pub link_count: usize,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl TopologyNode {
    /// Create a node
    #[must_use]
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, sphere: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            sphere: sphere.into(),
            link_count: 0,
            updated_at: Utc::now(),
        }
    }

    /// With link count
    #[inline]
    #[must_use]
    pub fn with_links(mut self, link_count: usize) -> Self {
        self.link_count = link_count;
        self
    }

    /// With last-update timestamp
    #[inline]
    #[must_use]
    pub fn updated(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = at;
        self
    }
}

/// One event on the workspace timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Event identifier (ULID for time-sortability)
    pub id: Ulid,
    /// When the event occurred
    pub occurred_at: DateTime<Utc>,
    /// Event kind
    pub kind: TimelineEventKind,
    /// Node the event concerns, if any
    pub node: Option<NodeId>,
    /// Free-text annotation
    pub note: Option<String>,
}

impl TimelineEvent {
    /// Create an event occurring now
    #[must_use]
    pub fn new(kind: TimelineEventKind) -> Self {
        Self {
            id: Ulid::new(),
            occurred_at: Utc::now(),
            kind,
            node: None,
            note: None,
        }
    }

    /// With the node the event concerns
    #[inline]
    #[must_use]
    pub fn on_node(mut self, node: impl Into<NodeId>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// With occurrence timestamp
    #[inline]
    #[must_use]
    pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = occurred_at;
        self
    }

    /// With a free-text note
    #[inline]
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Timeline event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineEventKind {
    /// New item captured
    Capture,
    /// Existing node edited
    Edit,
    /// Review pass on a node
    Review,
    /// Focus moved between nodes
    FocusShift,
    /// Alert raised
    Alert,
}

/// The complete read-only state for one analysis run
///
/// Facet validation in the agent layer checks these fields: the context must
/// be present, and dimensions/topology/timeline must be non-empty, for agents
/// that declare they observe them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotSet {
    /// Ambient context snapshot
    pub context: Option<ContextSnapshot>,
    /// Dimension snapshots keyed by node
    pub dimensions: HashMap<NodeId, DimensionSnapshot>,
    /// Topology nodes
    pub topology: Vec<TopologyNode>,
    /// Timeline events, oldest first
    pub timeline: Vec<TimelineEvent>,
}

impl SnapshotSet {
    /// Create an empty snapshot set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a context snapshot
    #[inline]
    #[must_use]
    pub fn with_context(mut self, context: ContextSnapshot) -> Self {
        self.context = Some(context);
        self
    }

    /// With a node's dimension snapshot
    #[must_use]
    pub fn with_dimensions(mut self, snapshot: DimensionSnapshot) -> Self {
        self.dimensions.insert(snapshot.node.clone(), snapshot);
        self
    }

    /// With a topology node
    #[inline]
    #[must_use]
    pub fn with_node(mut self, node: TopologyNode) -> Self {
        self.topology.push(node);
        self
    }

    /// With a timeline event
    #[inline]
    #[must_use]
    pub fn with_event(mut self, event: TimelineEvent) -> Self {
        self.timeline.push(event);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_snapshot_builder() {
        let snapshot = ContextSnapshot::now()
            .with_focus(FocusState {
                focused_node: Some(NodeId::new("inbox")),
                mode: FocusMode::Deep,
                streak_secs: 1800,
            })
            .with_health(HealthCounters {
                open_alerts: 2,
                ..HealthCounters::default()
            });

        assert_eq!(snapshot.focus.mode, FocusMode::Deep);
        assert_eq!(snapshot.health.open_alerts, 2);
    }

    #[test]
    fn dimension_snapshot_values() {
        let snapshot = DimensionSnapshot::new("projects.bureau")
            .with_value("momentum", 0.8)
            .with_value("clarity", 0.4)
            .with_trend(Trend::Falling);

        assert_eq!(snapshot.value("momentum"), Some(0.8));
        assert_eq!(snapshot.value("missing"), None);
        assert_eq!(snapshot.trend, Trend::Falling);
    }

    #[test]
    fn snapshot_set_builder() {
        let set = SnapshotSet::new()
            .with_context(ContextSnapshot::now())
            .with_dimensions(DimensionSnapshot::new("inbox").with_value("load", 0.9))
            .with_node(TopologyNode::new("inbox", "Inbox", "work"))
            .with_event(TimelineEvent::new(TimelineEventKind::Capture).on_node("inbox"));

        assert!(set.context.is_some());
        assert_eq!(set.dimensions.len(), 1);
        assert_eq!(set.topology.len(), 1);
        assert_eq!(set.timeline.len(), 1);
    }

    #[test]
    fn timeline_event_ids_sortable() {
        let first = TimelineEvent::new(TimelineEventKind::Capture);
        let second = TimelineEvent::new(TimelineEventKind::Edit);
        assert!(first.id <= second.id);
    }
}
