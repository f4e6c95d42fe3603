//! Production status machine
//!
//! Every order fragment carries exactly one status. A fragment only moves
//! along the forward edges below, or back one step via an explicit cancel.
//! The master status marks a weaving parent whose rolls are all complete;
//! it is kept as the lineage root and excluded from active work lists.

use serde::{Deserialize, Serialize};

/// Stage of an order fragment in the production pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Received,
    WeavingQueued,
    Weaving,
    WeavingDone,
    WeavingMaster,
    Dyeing,
    Dyed,
    Sewing,
    Sewn,
    Shipped,
}

impl OrderStatus {
    /// All statuses, in pipeline order
    pub const ALL: [OrderStatus; 10] = [
        OrderStatus::Received,
        OrderStatus::WeavingQueued,
        OrderStatus::Weaving,
        OrderStatus::WeavingDone,
        OrderStatus::WeavingMaster,
        OrderStatus::Dyeing,
        OrderStatus::Dyed,
        OrderStatus::Sewing,
        OrderStatus::Sewn,
        OrderStatus::Shipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::WeavingQueued => "weaving_queued",
            OrderStatus::Weaving => "weaving",
            OrderStatus::WeavingDone => "weaving_done",
            OrderStatus::WeavingMaster => "weaving_master",
            OrderStatus::Dyeing => "dyeing",
            OrderStatus::Dyed => "dyed",
            OrderStatus::Sewing => "sewing",
            OrderStatus::Sewn => "sewn",
            OrderStatus::Shipped => "shipped",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "received" => Some(OrderStatus::Received),
            "weaving_queued" => Some(OrderStatus::WeavingQueued),
            "weaving" => Some(OrderStatus::Weaving),
            "weaving_done" => Some(OrderStatus::WeavingDone),
            "weaving_master" => Some(OrderStatus::WeavingMaster),
            "dyeing" => Some(OrderStatus::Dyeing),
            "dyed" => Some(OrderStatus::Dyed),
            "sewing" => Some(OrderStatus::Sewing),
            "sewn" => Some(OrderStatus::Sewn),
            "shipped" => Some(OrderStatus::Shipped),
            _ => None,
        }
    }

    /// Korean display label, as shown on work screens and print-outs
    pub fn label_ko(&self) -> &'static str {
        match self {
            OrderStatus::Received => "발주접수",
            OrderStatus::WeavingQueued => "제직대기",
            OrderStatus::Weaving => "제직중",
            OrderStatus::WeavingDone => "제직완료",
            OrderStatus::WeavingMaster => "제직완료(Master)",
            OrderStatus::Dyeing => "염색중",
            OrderStatus::Dyed => "염색완료",
            OrderStatus::Sewing => "봉제중",
            OrderStatus::Sewn => "봉제완료",
            OrderStatus::Shipped => "출고완료",
        }
    }

    /// Legal forward transitions for a single fragment.
    ///
    /// No stage may be skipped. `Weaving -> WeavingMaster` is the edge
    /// taken by a parent when its final roll completes; child fragments
    /// are created directly at `WeavingDone` and continue from there.
    pub fn can_advance_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Received, WeavingQueued)
                | (WeavingQueued, Weaving)
                | (Weaving, WeavingDone)
                | (Weaving, WeavingMaster)
                | (WeavingDone, Dyeing)
                | (Dyeing, Dyed)
                | (Dyed, Sewing)
                | (Sewing, Sewn)
                | (Sewn, Shipped)
        )
    }

    /// The single-step reverse used by per-stage cancel actions.
    ///
    /// `Received` has nothing to revert to.
    pub fn revert_target(&self) -> Option<OrderStatus> {
        use OrderStatus::*;
        match self {
            Received => None,
            WeavingQueued => Some(Received),
            Weaving => Some(WeavingQueued),
            WeavingDone => Some(Weaving),
            WeavingMaster => Some(Weaving),
            Dyeing => Some(WeavingDone),
            Dyed => Some(Dyeing),
            Sewing => Some(Dyed),
            Sewn => Some(Sewing),
            Shipped => Some(Sewn),
        }
    }

    /// Parent status after a roll completes: the master status once every
    /// roll is done, otherwise still weaving.
    pub fn after_roll_completion(completed_rolls: i32, roll_count: i32) -> OrderStatus {
        if completed_rolls >= roll_count {
            OrderStatus::WeavingMaster
        } else {
            OrderStatus::Weaving
        }
    }

    /// Whether a record in this status holds its assigned machine
    /// exclusively. Only an in-progress weaving run occupies a machine;
    /// queued work and finished rolls do not block it.
    pub fn occupies_machine(&self) -> bool {
        matches!(self, OrderStatus::Weaving)
    }

    pub fn is_master(&self) -> bool {
        matches!(self, OrderStatus::WeavingMaster)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Shipped)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Received => write!(f, "Received"),
            OrderStatus::WeavingQueued => write!(f, "Weaving Queued"),
            OrderStatus::Weaving => write!(f, "Weaving"),
            OrderStatus::WeavingDone => write!(f, "Weaving Done"),
            OrderStatus::WeavingMaster => write!(f, "Weaving Done (Master)"),
            OrderStatus::Dyeing => write!(f, "Dyeing"),
            OrderStatus::Dyed => write!(f, "Dyed"),
            OrderStatus::Sewing => write!(f, "Sewing"),
            OrderStatus::Sewn => write!(f, "Sewn"),
            OrderStatus::Shipped => write!(f, "Shipped"),
        }
    }
}
