//! Local graph computer - single-process host for vertex programs
//!
//! Runs a vertex program over an in-memory graph through synchronized
//! supersteps. Each superstep follows the sequence:
//! Terminate? → Deliver → Execute → Collect → Route.
//!
//! Vertices are split across `workers` partitions. Every partition gets its
//! own program replica, rebuilt from the serialized configuration, exactly as
//! a distributed engine would ship the program to remote workers.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;

use super::config::ComputerConfig;
use super::error::PregelError;
use super::memory::Memory;
use super::message::{MessageScope, Messenger, VertexMessage};
use super::program::{Configuration, Persist, ResultGraph, VertexProgram};
use super::vertex::{Graph, Vertex, VertexId};

type Outbox<M> = Vec<(MessageScope, M)>;

/// Result of a finished job
#[derive(Debug, Clone)]
pub struct ComputerResult {
    /// Result graph shaped by the program's persist policy
    pub graph: Graph,
    /// Final job memory
    pub memory: Memory,
    /// Number of supersteps executed
    pub supersteps: usize,
}

/// In-process graph computer
#[derive(Debug, Clone, Default)]
pub struct LocalComputer {
    config: ComputerConfig,
}

impl LocalComputer {
    /// Create a computer with default configuration
    pub fn new() -> Self {
        Self::with_config(ComputerConfig::default())
    }

    /// Create a computer with custom configuration
    pub fn with_config(config: ComputerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ComputerConfig {
        &self.config
    }

    /// Store `program` into a fresh configuration and run it
    pub async fn submit_program<P: VertexProgram>(
        &self,
        graph: &mut Graph,
        program: &P,
    ) -> Result<ComputerResult, PregelError> {
        let mut configuration = Configuration::new();
        program.store_state(&mut configuration);
        self.submit::<P>(graph, &configuration).await
    }

    /// Run the program described by `configuration` to completion
    ///
    /// `graph` is only modified when the program prefers
    /// [`ResultGraph::Original`] and the job succeeds. A failed job leaves it
    /// exactly as submitted.
    pub async fn submit<P: VertexProgram>(
        &self,
        graph: &mut Graph,
        configuration: &Configuration,
    ) -> Result<ComputerResult, PregelError> {
        let job_timeout = self.config.job_timeout;

        match timeout(job_timeout, self.run::<P>(graph, configuration)).await {
            Ok(result) => result,
            Err(_) => Err(PregelError::JobTimeout(job_timeout)),
        }
    }

    async fn run<P: VertexProgram>(
        &self,
        graph: &mut Graph,
        configuration: &Configuration,
    ) -> Result<ComputerResult, PregelError> {
        let job_id = uuid::Uuid::new_v4().to_string();
        let blob = configuration.to_json()?;

        let workers = self.config.workers.max(1).min(graph.vertex_count().max(1));
        let replicas = (0..workers)
            .map(|_| load_replica::<P>(&blob))
            .collect::<Result<Vec<_>, _>>()?;
        let master = Arc::clone(&replicas[0]);

        tracing::info!(
            job_id = %job_id,
            program = P::NAME,
            workers,
            vertices = graph.vertex_count(),
            "Starting vertex program job"
        );

        let (mut vertices, edges) = graph.clone().into_parts();
        let topology = Graph::from_parts(BTreeMap::new(), edges);
        let partition: HashMap<VertexId, usize> = vertices
            .keys()
            .enumerate()
            .map(|(i, id)| (id.clone(), i % workers))
            .collect();

        let mut memory = Memory::new(job_id.clone());
        master.setup(&memory);

        let mut inboxes: HashMap<VertexId, Vec<P::Message>> = HashMap::new();
        let mut supersteps = 0;

        loop {
            if master.terminate(&memory) {
                break;
            }

            if memory.iteration() >= self.config.max_supersteps {
                return Err(PregelError::MaxSuperstepsExceeded(memory.iteration()));
            }

            let started = Instant::now();
            let scopes = master.message_scopes(&memory);
            let outboxes = self
                .execute_superstep(&replicas, &partition, &mut vertices, &mut inboxes, &memory)
                .await?;
            inboxes = route_messages(&topology, &vertices, &scopes, outboxes)?;
            supersteps += 1;

            tracing::info!(
                job_id = %job_id,
                superstep = memory.iteration(),
                elapsed_ms = millis(started.elapsed()),
                "Superstep complete"
            );

            memory.advance(started.elapsed());
        }

        let result = finalize(master.as_ref(), graph, vertices, topology);

        tracing::info!(
            job_id = %job_id,
            supersteps,
            vertices = result.vertex_count(),
            "Vertex program job finished"
        );

        Ok(ComputerResult {
            graph: result,
            memory,
            supersteps,
        })
    }

    /// Execute every vertex once, in parallel
    ///
    /// Returns the non-empty outboxes in vertex order. If any vertex fails,
    /// the error of the first failing vertex (by id) is returned. Dropping
    /// the returned future aborts every vertex task still running.
    async fn execute_superstep<P: VertexProgram>(
        &self,
        replicas: &[Arc<P>],
        partition: &HashMap<VertexId, usize>,
        vertices: &mut BTreeMap<VertexId, Vertex>,
        inboxes: &mut HashMap<VertexId, Vec<P::Message>>,
        memory: &Memory,
    ) -> Result<Vec<(VertexId, Outbox<P::Message>)>, PregelError> {
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));
        let memory = Arc::new(memory.clone());
        let vertex_timeout = self.config.vertex_timeout;
        let tracing_enabled = self.config.tracing_enabled;

        let mut tasks = JoinSet::new();

        for (vertex_id, mut vertex) in std::mem::take(vertices) {
            let worker = partition.get(&vertex_id).copied().unwrap_or(0) % replicas.len();
            let program = Arc::clone(&replicas[worker]);
            let messages = inboxes.remove(&vertex_id).unwrap_or_default();
            let sem_clone = Arc::clone(&semaphore);
            let memory = Arc::clone(&memory);

            tasks.spawn(async move {
                // Acquire semaphore permit for parallelism control
                let _permit = match sem_clone.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return (vertex, Err(PregelError::WorkerFailure(e.to_string())), Vec::new());
                    }
                };

                let mut messenger = Messenger::new(vertex_id.clone(), &messages);

                let result = match timeout(
                    vertex_timeout,
                    program.execute(&mut vertex, &mut messenger, &memory),
                )
                .await
                {
                    Ok(result) => result,
                    Err(_) => Err(PregelError::VertexTimeout(vertex_id.clone())),
                };

                if tracing_enabled {
                    tracing::debug!(
                        vertex_id = %vertex_id,
                        worker,
                        superstep = memory.iteration(),
                        ok = result.is_ok(),
                        "Vertex executed"
                    );
                }

                let outbox = messenger.into_outbox();
                (vertex, result, outbox)
            });
        }

        let mut finished = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            finished.push(joined.map_err(|e| PregelError::WorkerFailure(e.to_string()))?);
        }
        finished.sort_by(|a, b| a.0.id().cmp(b.0.id()));

        let mut outboxes = Vec::new();
        let mut failure = None;

        for (vertex, result, outbox) in finished {
            if let Err(e) = result {
                failure.get_or_insert(e);
            }
            if !outbox.is_empty() {
                outboxes.push((vertex.id().clone(), outbox));
            }
            vertices.insert(vertex.id().clone(), vertex);
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(outboxes),
        }
    }
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn load_replica<P: VertexProgram>(blob: &str) -> Result<Arc<P>, PregelError> {
    let configuration = Configuration::from_json(blob)?;
    Ok(Arc::new(P::load_state(&configuration)?))
}

/// Route outgoing messages to next-superstep inboxes
fn route_messages<M: VertexMessage>(
    topology: &Graph,
    vertices: &BTreeMap<VertexId, Vertex>,
    scopes: &HashSet<MessageScope>,
    outboxes: Vec<(VertexId, Outbox<M>)>,
) -> Result<HashMap<VertexId, Vec<M>>, PregelError> {
    let mut inboxes: HashMap<VertexId, Vec<M>> = HashMap::new();

    for (sender, outbox) in outboxes {
        for (scope, message) in outbox {
            if !scopes.contains(&scope) {
                return Err(PregelError::UndeclaredScope {
                    vertex_id: sender.clone(),
                    scope: scope.to_string(),
                });
            }

            match &scope {
                MessageScope::Local { edge_label } => {
                    for edge in topology.out_edges(&sender, edge_label.as_deref()) {
                        inboxes
                            .entry(edge.in_v.clone())
                            .or_default()
                            .push(message.clone());
                    }
                }
                MessageScope::Global { targets } => {
                    for target in targets {
                        if !vertices.contains_key(target) {
                            return Err(PregelError::MessageDeliveryError(format!(
                                "{} sent to unknown vertex {}",
                                sender, target
                            )));
                        }
                        inboxes.entry(target.clone()).or_default().push(message.clone());
                    }
                }
            }
        }
    }

    Ok(inboxes)
}

/// Shape the result graph by the program's preferences
fn finalize<P: VertexProgram>(
    program: &P,
    graph: &mut Graph,
    mut vertices: BTreeMap<VertexId, Vertex>,
    topology: Graph,
) -> Graph {
    let transient: Vec<String> = program
        .vertex_compute_keys()
        .into_iter()
        .filter(|k| k.is_transient())
        .map(|k| k.key().to_string())
        .collect();

    for vertex in vertices.values_mut() {
        for key in &transient {
            vertex.remove_property(key);
        }
    }

    let (_, edges) = topology.into_parts();

    match (program.preferred_result_graph(), program.preferred_persist()) {
        (ResultGraph::Original, Persist::Nothing) => graph.clone(),
        (ResultGraph::Original, _) => {
            *graph = Graph::from_parts(vertices, edges);
            graph.clone()
        }
        (ResultGraph::New, Persist::Nothing) => Graph::new(),
        (ResultGraph::New, Persist::VertexProperties) => Graph::from_parts(vertices, Vec::new()),
        (ResultGraph::New, Persist::Edges) => Graph::from_parts(vertices, edges),
    }
}
