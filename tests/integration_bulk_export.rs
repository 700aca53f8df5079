//! Integration Tests for the Bulk Export Vertex Program
//!
//! These tests run the program through the local computer exactly as a host
//! engine would:
//! - Column order and formatting of exported rows
//! - Termination after a single superstep
//! - Failure handling for missing labels
//! - Result graph shape (new graph, edges kept, input untouched)

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use bulk_export::{
    BulkExportVertexProgram, ComputerConfig, Configuration, Edge, ExportRow, Graph, LocalComputer,
    Path, PathValue, PregelError, TraverserSet, Vertex, VertexId, VertexRef,
    EXPORT_PROPERTIES, HALTED_TRAVERSERS,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn person(id: i64, name: &str, age: i64) -> Path {
    Path::new()
        .extend_labeled("p", VertexRef::new(id, "person"))
        .extend_labeled("name", name)
        .extend_labeled("age", age)
}

/// Two people holding traversers, one software vertex holding none
fn modern_graph() -> Graph {
    let mut graph = Graph::new();
    graph
        .add_vertex(
            Vertex::new("1", "person").with_property(
                HALTED_TRAVERSERS,
                [person(1, "marko", 29), person(1, "marko", 29)]
                    .into_iter()
                    .collect::<TraverserSet>(),
            ),
        )
        .add_vertex(
            Vertex::new("2", "person").with_property(
                HALTED_TRAVERSERS,
                [person(2, "vadas", 27)].into_iter().collect::<TraverserSet>(),
            ),
        )
        .add_vertex(
            Vertex::new("3", "software").with_property("lang", PathValue::from("java")),
        )
        .add_edge(Edge::new("7", "1", "knows", "2"))
        .add_edge(Edge::new("9", "1", "created", "3"));
    graph
}

fn rows(graph: &Graph, id: &str) -> Option<Vec<Vec<String>>> {
    graph
        .vertex(&VertexId::from(id))?
        .rows(EXPORT_PROPERTIES)
        .map(|rows| rows.iter().map(|r| r.as_slice().to_vec()).collect())
}

fn computer() -> LocalComputer {
    LocalComputer::with_config(ComputerConfig::default().with_workers(2).with_parallelism(2))
}

// =============================================================================
// Row Content
// =============================================================================

#[tokio::test]
async fn test_rows_follow_column_order() -> Result<()> {
    init_tracing();

    let program = BulkExportVertexProgram::build()
        .key("name")
        .key_with_format("age", "Age: %s")
        .create()?;

    let mut graph = modern_graph();
    let result = computer().submit_program(&mut graph, &program).await?;

    assert_eq!(result.supersteps, 1);
    assert_eq!(
        rows(&result.graph, "1"),
        Some(vec![
            vec!["marko".to_string(), "Age: 29".to_string()],
            vec!["marko".to_string(), "Age: 29".to_string()],
        ])
    );
    assert_eq!(
        rows(&result.graph, "2"),
        Some(vec![vec!["vadas".to_string(), "Age: 27".to_string()]])
    );
    Ok(())
}

#[tokio::test]
async fn test_vertex_without_traversers_gets_no_rows() -> Result<()> {
    init_tracing();

    let program = BulkExportVertexProgram::build().key("name").create()?;
    let mut graph = modern_graph();
    let result = computer().submit_program(&mut graph, &program).await?;

    let software = result.graph.vertex(&VertexId::from("3")).unwrap();
    assert!(software.property(EXPORT_PROPERTIES).is_none());
    assert_eq!(software.property("lang"), Some(&PathValue::from("java").into()));
    Ok(())
}

#[tokio::test]
async fn test_element_values_render_canonically() -> Result<()> {
    let program = BulkExportVertexProgram::build()
        .key("p")
        .key_with_format("age", "%03d")
        .create()?;

    let mut graph = modern_graph();
    let result = computer().submit_program(&mut graph, &program).await?;

    assert_eq!(
        rows(&result.graph, "2"),
        Some(vec![vec!["v[2]".to_string(), "027".to_string()]])
    );
    Ok(())
}

#[test]
fn test_repeated_runs_are_identical() {
    let program = BulkExportVertexProgram::build()
        .keys(["name", "age", "p"])
        .create()
        .unwrap();

    let run = || {
        let mut graph = modern_graph();
        tokio_test::block_on(computer().submit_program(&mut graph, &program))
            .unwrap()
            .graph
    };

    let first = run();
    for _ in 0..5 {
        assert_eq!(run(), first);
    }
}

// =============================================================================
// Result Graph
// =============================================================================

#[tokio::test]
async fn test_result_is_new_graph_with_edges() -> Result<()> {
    let program = BulkExportVertexProgram::build().key("name").create()?;
    let mut graph = modern_graph();
    let before = graph.clone();

    let result = computer().submit_program(&mut graph, &program).await?;

    assert_eq!(graph, before, "input graph must be untouched");
    assert_eq!(result.graph.vertex_count(), 3);
    assert_eq!(result.graph.edge_count(), 2);
    assert_eq!(result.graph.edges(), before.edges());
    Ok(())
}

#[tokio::test]
async fn test_export_key_is_kept_and_replaced() -> Result<()> {
    let program = BulkExportVertexProgram::build().key("name").create()?;
    let mut graph = modern_graph();
    graph
        .vertex_mut(&VertexId::from("2"))
        .unwrap()
        .set_property(EXPORT_PROPERTIES, vec![ExportRow::from(vec!["stale".to_string()])]);

    let result = computer().submit_program(&mut graph, &program).await?;

    assert_eq!(
        rows(&result.graph, "2"),
        Some(vec![vec!["vadas".to_string()]])
    );
    Ok(())
}

// =============================================================================
// Termination
// =============================================================================

#[tokio::test]
async fn test_empty_plan_runs_no_superstep() -> Result<()> {
    let program = BulkExportVertexProgram::build().create()?;
    let mut graph = modern_graph();

    let result = computer().submit_program(&mut graph, &program).await?;

    assert_eq!(result.supersteps, 0);
    assert!(rows(&result.graph, "1").is_none());
    Ok(())
}

#[tokio::test]
async fn test_configured_plan_works_in_one_superstep() -> Result<()> {
    let program = BulkExportVertexProgram::build().key("name").create()?;

    for workers in [1, 2, 8] {
        let mut graph = Graph::new();
        graph.add_vertex(Vertex::new("1", "person").with_property(
            HALTED_TRAVERSERS,
            [person(1, "marko", 29)].into_iter().collect::<TraverserSet>(),
        ));
        let computer = LocalComputer::with_config(ComputerConfig::default().with_workers(workers));

        let result = computer.submit_program(&mut graph, &program).await?;

        assert_eq!(result.supersteps, 1, "workers = {}", workers);
        assert_eq!(result.memory.iteration(), 1);
        assert_eq!(rows(&result.graph, "1"), Some(vec![vec!["marko".to_string()]]));
    }
    Ok(())
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_missing_label_fails_job() {
    init_tracing();

    let program = BulkExportVertexProgram::build()
        .key("name")
        .key("missing")
        .create()
        .unwrap();
    let mut graph = modern_graph();
    let before = graph.clone();

    let err = computer()
        .submit_program(&mut graph, &program)
        .await
        .unwrap_err();

    assert!(matches!(err, PregelError::VertexError { .. }));
    assert_eq!(err.vertex_id(), Some(&VertexId::from("1")));
    assert_eq!(graph, before);
}

#[tokio::test]
async fn test_malformed_configuration_fails_before_execution() {
    let configuration = Configuration::new()
        .with("vertex_program", "BulkExportVertexProgram")
        .with(EXPORT_PROPERTIES, "name\u{2}\u{1}age");
    let mut graph = modern_graph();

    let err = computer()
        .submit::<BulkExportVertexProgram>(&mut graph, &configuration)
        .await
        .unwrap_err();

    assert!(err.is_load_error());
}

#[tokio::test]
async fn test_hand_written_configuration_runs() -> Result<()> {
    let configuration = Configuration::new().with(EXPORT_PROPERTIES, "name\u{2}%S");
    let mut graph = modern_graph();

    let result = computer()
        .submit::<BulkExportVertexProgram>(&mut graph, &configuration)
        .await?;

    assert_eq!(rows(&result.graph, "2"), Some(vec![vec!["VADAS".to_string()]]));
    Ok(())
}
