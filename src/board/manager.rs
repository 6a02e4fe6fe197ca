//! TaskBoard - actor that owns the mission's tasks
//!
//! Every operation is a message to a single actor task, so each one
//! (including completion together with its derived follow-ups) is applied as
//! one serialized unit. Events are emitted by the actor after the change.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::BoardConfig;
use crate::domain::{Position, Task, TaskStatus, TaskType};
use crate::error::{CoordError, CoordResponse};
use crate::events::{EventEmitter, MissionEvent};

use super::derivation::derive_follow_ups;
use super::messages::{BoardCommand, BoardStats, Completion};

/// Handle to send commands to the TaskBoard actor
#[derive(Clone)]
pub struct TaskBoard {
    tx: mpsc::Sender<BoardCommand>,
}

impl TaskBoard {
    /// Spawn a new TaskBoard actor
    pub fn spawn(config: &BoardConfig, events: EventEmitter) -> Self {
        debug!(?config, "TaskBoard::spawn: called");
        let (tx, rx) = mpsc::channel(config.channel_buffer);
        let state = BoardState::new(config.enforce_capabilities, events);

        tokio::spawn(actor_loop(state, rx));

        info!(enforce_capabilities = config.enforce_capabilities, "TaskBoard spawned");
        Self { tx }
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> BoardCommand) -> CoordResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| CoordError::ChannelClosed)?;
        reply_rx.await.map_err(|_| CoordError::ChannelClosed)
    }

    /// Admit a new pending task
    pub async fn create_task(
        &self,
        id: &str,
        task_type: TaskType,
        location: Position,
        priority: f64,
    ) -> CoordResponse<Task> {
        debug!(%id, %task_type, %location, priority, "create_task: called");
        self.request(|reply| BoardCommand::CreateTask {
            id: id.to_string(),
            task_type,
            location,
            priority,
            reply,
        })
        .await?
    }

    /// Add a task type to an agent's capability set
    pub async fn register_capability(&self, agent_id: &str, capability: TaskType) -> CoordResponse<()> {
        debug!(%agent_id, %capability, "register_capability: called");
        self.request(|reply| BoardCommand::RegisterCapability {
            agent_id: agent_id.to_string(),
            capability,
            reply,
        })
        .await?
    }

    /// Assign a pending task to an agent
    pub async fn assign_task(&self, task_id: &str, agent_id: &str) -> CoordResponse<Task> {
        debug!(%task_id, %agent_id, "assign_task: called");
        self.request(|reply| BoardCommand::AssignTask {
            task_id: task_id.to_string(),
            agent_id: agent_id.to_string(),
            reply,
        })
        .await?
    }

    /// Complete a task and derive its follow-ups
    pub async fn complete_task(&self, task_id: &str) -> CoordResponse<Completion> {
        debug!(%task_id, "complete_task: called");
        self.request(|reply| BoardCommand::CompleteTask {
            task_id: task_id.to_string(),
            reply,
        })
        .await?
    }

    /// Get a task by id
    pub async fn get_task(&self, id: &str) -> CoordResponse<Option<Task>> {
        debug!(%id, "get_task: called");
        self.request(|reply| BoardCommand::GetTask {
            id: id.to_string(),
            reply,
        })
        .await
    }

    /// Get a task by id, returning an error if it does not exist
    pub async fn get_task_required(&self, id: &str) -> CoordResponse<Task> {
        debug!(%id, "get_task_required: called");
        self.get_task(id)
            .await?
            .ok_or_else(|| CoordError::TaskNotFound(id.to_string()))
    }

    /// List tasks ordered by id, optionally filtered by status
    pub async fn list_tasks(&self, status_filter: Option<TaskStatus>) -> CoordResponse<Vec<Task>> {
        debug!(?status_filter, "list_tasks: called");
        self.request(|reply| BoardCommand::ListTasks { status_filter, reply })
            .await
    }

    /// Pending tasks, highest priority first
    pub async fn pending_tasks(&self) -> CoordResponse<Vec<Task>> {
        debug!("pending_tasks: called");
        let mut tasks = self.list_tasks(Some(TaskStatus::Pending)).await?;
        tasks.sort_by(|a, b| b.priority.total_cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));
        Ok(tasks)
    }

    /// Capabilities registered for an agent, in registration order
    pub async fn capabilities(&self, agent_id: &str) -> CoordResponse<Vec<TaskType>> {
        debug!(%agent_id, "capabilities: called");
        self.request(|reply| BoardCommand::Capabilities {
            agent_id: agent_id.to_string(),
            reply,
        })
        .await
    }

    /// Agents registered for a task type, sorted by id
    pub async fn capable_agents(&self, task_type: TaskType) -> CoordResponse<Vec<String>> {
        debug!(%task_type, "capable_agents: called");
        self.request(|reply| BoardCommand::CapableAgents { task_type, reply })
            .await
    }

    /// Task counts by status
    pub async fn stats(&self) -> CoordResponse<BoardStats> {
        debug!("stats: called");
        self.request(|reply| BoardCommand::Stats { reply }).await
    }

    /// Shutdown the TaskBoard
    pub async fn shutdown(&self) -> CoordResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(BoardCommand::Shutdown)
            .await
            .map_err(|_| CoordError::ChannelClosed)
    }
}

/// State owned by the board actor
pub(crate) struct BoardState {
    tasks: HashMap<String, Task>,
    capabilities: HashMap<String, Vec<TaskType>>,
    enforce_capabilities: bool,
    events: EventEmitter,
}

impl BoardState {
    pub(crate) fn new(enforce_capabilities: bool, events: EventEmitter) -> Self {
        Self {
            tasks: HashMap::new(),
            capabilities: HashMap::new(),
            enforce_capabilities,
            events,
        }
    }

    fn insert(&mut self, task: Task) -> Task {
        self.tasks.insert(task.id.clone(), task.clone());
        self.events.emit(MissionEvent::TaskCreated {
            task_id: task.id.clone(),
            task_type: task.task_type,
            location: task.location,
            priority: task.priority,
        });
        task
    }

    pub(crate) fn create(&mut self, id: String, task_type: TaskType, location: Position, priority: f64) -> CoordResponse<Task> {
        if self.tasks.contains_key(&id) {
            warn!(%id, "Rejecting duplicate task id");
            return Err(CoordError::DuplicateTask(id));
        }
        Ok(self.insert(Task::new(id, task_type, location, priority)))
    }

    pub(crate) fn register_capability(&mut self, agent_id: String, capability: TaskType) {
        // Append only; a repeated registration is kept and is harmless
        self.capabilities.entry(agent_id.clone()).or_default().push(capability);
        self.events
            .emit(MissionEvent::CapabilityRegistered { agent_id, capability });
    }

    pub(crate) fn assign(&mut self, task_id: &str, agent_id: String) -> CoordResponse<Task> {
        let task = self
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| CoordError::TaskNotFound(task_id.to_string()))?;

        if self.enforce_capabilities
            && !self
                .capabilities
                .get(&agent_id)
                .is_some_and(|caps| caps.contains(&task.task_type))
        {
            warn!(%task_id, %agent_id, task_type = %task.task_type, "Agent lacks capability for task");
            return Err(CoordError::CapabilityMismatch {
                agent_id,
                task_type: task.task_type,
            });
        }

        task.assign(agent_id.clone())?;
        let assigned = task.clone();

        self.events.emit(MissionEvent::TaskAssigned {
            task_id: task_id.to_string(),
            agent_id,
        });
        Ok(assigned)
    }

    pub(crate) fn complete(&mut self, task_id: &str) -> CoordResponse<Completion> {
        let task = self
            .tasks
            .get(task_id)
            .ok_or_else(|| CoordError::TaskNotFound(task_id.to_string()))?;

        if !task.status.can_transition_to(TaskStatus::Completed) {
            return Err(CoordError::InvalidTransition {
                task_id: task_id.to_string(),
                from: task.status,
                to: TaskStatus::Completed,
            });
        }

        // Validate the whole derivation before touching the parent
        let derived = derive_follow_ups(task);
        if let Some(clash) = derived.iter().find(|child| self.tasks.contains_key(&child.id)) {
            warn!(%task_id, child_id = %clash.id, "Follow-up id already in use");
            return Err(CoordError::DuplicateTask(clash.id.clone()));
        }

        let task = self
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| CoordError::TaskNotFound(task_id.to_string()))?;
        task.complete()?;
        let completed = task.clone();
        self.events.emit(MissionEvent::TaskCompleted {
            task_id: task_id.to_string(),
        });

        let derived: Vec<Task> = derived.into_iter().map(|child| self.insert(child)).collect();
        if !derived.is_empty() {
            debug!(%task_id, count = derived.len(), "Derived follow-up tasks");
        }

        Ok(Completion {
            task: completed,
            derived,
        })
    }

    pub(crate) fn get(&self, id: &str) -> Option<Task> {
        self.tasks.get(id).cloned()
    }

    pub(crate) fn list(&self, status_filter: Option<TaskStatus>) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|t| status_filter.is_none_or(|s| t.status == s))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.id.cmp(&b.id));
        tasks
    }

    pub(crate) fn capabilities(&self, agent_id: &str) -> Vec<TaskType> {
        self.capabilities.get(agent_id).cloned().unwrap_or_default()
    }

    pub(crate) fn capable_agents(&self, task_type: TaskType) -> Vec<String> {
        let mut agents: Vec<String> = self
            .capabilities
            .iter()
            .filter(|(_, caps)| caps.contains(&task_type))
            .map(|(agent, _)| agent.clone())
            .collect();
        agents.sort();
        agents
    }

    pub(crate) fn stats(&self) -> BoardStats {
        let mut stats = BoardStats {
            total: self.tasks.len(),
            agents: self.capabilities.len(),
            ..Default::default()
        };
        for task in self.tasks.values() {
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::Assigned => stats.assigned += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
        }
        stats
    }
}

/// The actor loop that owns the board state and processes commands
async fn actor_loop(mut state: BoardState, mut rx: mpsc::Receiver<BoardCommand>) {
    debug!("TaskBoard actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            BoardCommand::CreateTask {
                id,
                task_type,
                location,
                priority,
                reply,
            } => {
                debug!(%id, "actor_loop: CreateTask command");
                let _ = reply.send(state.create(id, task_type, location, priority));
            }
            BoardCommand::RegisterCapability {
                agent_id,
                capability,
                reply,
            } => {
                debug!(%agent_id, %capability, "actor_loop: RegisterCapability command");
                state.register_capability(agent_id, capability);
                let _ = reply.send(Ok(()));
            }
            BoardCommand::AssignTask {
                task_id,
                agent_id,
                reply,
            } => {
                debug!(%task_id, %agent_id, "actor_loop: AssignTask command");
                let _ = reply.send(state.assign(&task_id, agent_id));
            }
            BoardCommand::CompleteTask { task_id, reply } => {
                debug!(%task_id, "actor_loop: CompleteTask command");
                let _ = reply.send(state.complete(&task_id));
            }
            BoardCommand::GetTask { id, reply } => {
                let _ = reply.send(state.get(&id));
            }
            BoardCommand::ListTasks { status_filter, reply } => {
                let _ = reply.send(state.list(status_filter));
            }
            BoardCommand::Capabilities { agent_id, reply } => {
                let _ = reply.send(state.capabilities(&agent_id));
            }
            BoardCommand::CapableAgents { task_type, reply } => {
                let _ = reply.send(state.capable_agents(task_type));
            }
            BoardCommand::Stats { reply } => {
                let _ = reply.send(state.stats());
            }
            BoardCommand::Shutdown => {
                info!("TaskBoard shutting down");
                break;
            }
        }
    }

    debug!("TaskBoard actor stopped");
}
