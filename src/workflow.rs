use crate::models::ApplicationStatus;

/// Node in the displayable workflow graph.
pub struct WorkflowNode {
    pub id: &'static str,
    pub label: &'static str,
}

/// Directed edge between two workflow nodes.
pub struct WorkflowEdge {
    pub from: &'static str,
    pub to: &'static str,
}

/// The pipeline graph as drawn on the dashboard. Display data only; the
/// transition rules live in `next_possible_statuses`.
pub const WORKFLOW_NODES: [WorkflowNode; 6] = [
    WorkflowNode { id: "applied", label: "Applied" },
    WorkflowNode { id: "phone_screen", label: "Phone Screen" },
    WorkflowNode { id: "technical", label: "Technical Interview" },
    WorkflowNode { id: "onsite", label: "Onsite Interview" },
    WorkflowNode { id: "offer", label: "Offer" },
    WorkflowNode { id: "rejected", label: "Rejected" },
];

pub const WORKFLOW_EDGES: [WorkflowEdge; 8] = [
    WorkflowEdge { from: "applied", to: "phone_screen" },
    WorkflowEdge { from: "phone_screen", to: "technical" },
    WorkflowEdge { from: "technical", to: "onsite" },
    WorkflowEdge { from: "onsite", to: "offer" },
    WorkflowEdge { from: "applied", to: "rejected" },
    WorkflowEdge { from: "phone_screen", to: "rejected" },
    WorkflowEdge { from: "technical", to: "rejected" },
    WorkflowEdge { from: "onsite", to: "rejected" },
];

/// Label for a graph node id, for rendering the pipeline.
pub fn node_label(id: &str) -> &'static str {
    WORKFLOW_NODES
        .iter()
        .find(|node| node.id == id)
        .map(|node| node.label)
        .unwrap_or("?")
}

/// Outgoing edge targets of a graph node, in declaration order.
pub fn outgoing_labels(id: &str) -> Vec<&'static str> {
    WORKFLOW_EDGES
        .iter()
        .filter(|edge| edge.from == id)
        .map(|edge| node_label(edge.to))
        .collect()
}

/// Legal next stages from the given status. Advisory: the store accepts any
/// status on update, this only drives UI hints and CLI warnings.
pub fn next_possible_statuses(current: ApplicationStatus) -> &'static [ApplicationStatus] {
    use ApplicationStatus::*;
    match current {
        Applied => &[PhoneScreen, Rejected],
        PhoneScreen => &[TechnicalInterview, Rejected],
        TechnicalInterview => &[OnsiteInterview, Rejected],
        OnsiteInterview => &[Offer, Rejected],
        Offer => &[Accepted, Declined],
        Rejected | Accepted | Declined => &[],
    }
}

/// Terminal statuses have no outgoing transitions.
pub fn is_terminal(status: ApplicationStatus) -> bool {
    next_possible_statuses(status).is_empty()
}

pub fn can_transition(from: ApplicationStatus, to: ApplicationStatus) -> bool {
    next_possible_statuses(from).contains(&to)
}
