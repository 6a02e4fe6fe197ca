//! Follow-up derivation for completed tasks
//!
//! When a task completes, the mission moves forward:
//! - SCOUT → MONITOR_VICTIM (`monitor_<id>`) + DELIVER_BUOY (`delivery_<id>`)
//! - DELIVER_BUOY → SHINE_TORCH (`torch_<id>`)
//! - MONITOR_VICTIM → RESCUE (`rescue_<id>`)
//! - SHINE_TORCH and RESCUE derive nothing
//!
//! Child ids are built from the parent id so the chain stays traceable.

use crate::domain::{Task, TaskType};

/// One row of the derivation table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowUp {
    pub id_prefix: &'static str,
    pub task_type: TaskType,
    pub priority: f64,
}

/// Follow-ups produced by completing a task of the given type
pub fn follow_ups_for(task_type: TaskType) -> &'static [FollowUp] {
    const SCOUT: &[FollowUp] = &[
        FollowUp {
            id_prefix: "monitor",
            task_type: TaskType::MonitorVictim,
            priority: 1.0,
        },
        FollowUp {
            id_prefix: "delivery",
            task_type: TaskType::DeliverBuoy,
            priority: 0.8,
        },
    ];
    const DELIVER_BUOY: &[FollowUp] = &[FollowUp {
        id_prefix: "torch",
        task_type: TaskType::ShineTorch,
        priority: 0.7,
    }];
    const MONITOR_VICTIM: &[FollowUp] = &[FollowUp {
        id_prefix: "rescue",
        task_type: TaskType::Rescue,
        priority: 0.9,
    }];

    match task_type {
        TaskType::Scout => SCOUT,
        TaskType::DeliverBuoy => DELIVER_BUOY,
        TaskType::MonitorVictim => MONITOR_VICTIM,
        TaskType::ShineTorch | TaskType::Rescue => &[],
    }
}

/// Id of a derived task
pub fn follow_up_id(prefix: &str, parent_id: &str) -> String {
    format!("{}_{}", prefix, parent_id)
}

/// Build the pending follow-up tasks for a completed task
///
/// Children inherit the parent's location and record it as their parent.
pub fn derive_follow_ups(completed: &Task) -> Vec<Task> {
    follow_ups_for(completed.task_type)
        .iter()
        .map(|f| {
            Task::new(
                follow_up_id(f.id_prefix, &completed.id),
                f.task_type,
                completed.location,
                f.priority,
            )
            .with_parent(&completed.id)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Position, TaskStatus};

    fn task(id: &str, task_type: TaskType) -> Task {
        Task::new(id, task_type, Position::new(5.0, 7.0), 0.5)
    }

    #[test]
    fn test_scout_derives_monitor_and_delivery() {
        let children = derive_follow_ups(&task("S1", TaskType::Scout));
        assert_eq!(children.len(), 2);

        assert_eq!(children[0].id, "monitor_S1");
        assert_eq!(children[0].task_type, TaskType::MonitorVictim);
        assert_eq!(children[0].priority, 1.0);

        assert_eq!(children[1].id, "delivery_S1");
        assert_eq!(children[1].task_type, TaskType::DeliverBuoy);
        assert_eq!(children[1].priority, 0.8);

        for child in &children {
            assert_eq!(child.status, TaskStatus::Pending);
            assert!(child.assigned_to.is_none());
            assert_eq!(child.location, Position::new(5.0, 7.0));
            assert_eq!(child.parent.as_deref(), Some("S1"));
        }
    }

    #[test]
    fn test_delivery_derives_torch() {
        let children = derive_follow_ups(&task("delivery_S1", TaskType::DeliverBuoy));
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, "torch_delivery_S1");
        assert_eq!(children[0].task_type, TaskType::ShineTorch);
        assert_eq!(children[0].priority, 0.7);
    }

    #[test]
    fn test_monitor_derives_rescue() {
        let children = derive_follow_ups(&task("monitor_S1", TaskType::MonitorVictim));
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, "rescue_monitor_S1");
        assert_eq!(children[0].task_type, TaskType::Rescue);
        assert_eq!(children[0].priority, 0.9);
    }

    #[test]
    fn test_terminal_types_derive_nothing() {
        assert!(derive_follow_ups(&task("torch_x", TaskType::ShineTorch)).is_empty());
        assert!(derive_follow_ups(&task("rescue_x", TaskType::Rescue)).is_empty());
    }

    #[test]
    fn test_full_chain_reaches_terminal_types() {
        // Walking the table from SCOUT must end in tasks that derive nothing
        let mut frontier = vec![task("S9", TaskType::Scout)];
        let mut seen = Vec::new();
        while let Some(t) = frontier.pop() {
            seen.push(t.task_type);
            frontier.extend(derive_follow_ups(&t));
        }
        assert_eq!(seen.len(), 5);
        for t in TaskType::ALL {
            assert!(seen.contains(&t));
        }
    }
}
