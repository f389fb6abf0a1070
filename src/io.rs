use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::warn;
use sprs::io::{read_matrix_market, IoError};
use thiserror::Error;

use crate::graph::Graph;

/// Errors raised while loading a graph file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read graph file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read matrix market file: {0}")]
    MatrixMarket(#[from] IoError),

    /// The first line does not start with the vertex and edge counts.
    #[error("line {line}: expected a header with the vertex and edge counts")]
    MalformedHeader { line: usize },

    /// A neighbor is not a vertex index in `1..=total_vertices`.
    #[error("line {line}: `{token}` is not a vertex index")]
    InvalidToken { line: usize, token: String },

    /// The file ends before every announced vertex has its line.
    #[error("expected {expected} vertex lines, found {found}")]
    MissingLines { expected: usize, found: usize },

    /// An adjacency matrix must be square.
    #[error("adjacency matrix is {rows}x{cols}, expected a square matrix")]
    NotSquare { rows: usize, cols: usize },

    #[error(transparent)]
    Graph(#[from] crate::Error),
}

/// Read an adjacency list file and output Graph struct.
///
/// The first line holds the number of vertices and the number of edges. Then
/// each vertex has one line listing its neighbors as 1-based indices separated
/// by whitespace; an empty line is a vertex without neighbors. Lines starting
/// with `%` are comments. Every vertex weighs 1.
///
/// ```text
/// % a triangle and a pendant vertex
/// 4 4
/// 2 3
/// 1 3
/// 1 2 4
/// 3
/// ```
pub fn read_adjacency_list_as_graph(file_path: &Path) -> Result<Graph, Error> {
    let content = fs::read_to_string(file_path)?;
    parse_adjacency_list(&content)
}

/// Parse the content of an adjacency list file, see [`read_adjacency_list_as_graph`].
pub fn parse_adjacency_list(content: &str) -> Result<Graph, Error> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim_start().starts_with('%'));

    let (header_line, header) = lines.next().ok_or(Error::MalformedHeader { line: 1 })?;
    let mut counts = header.split_whitespace().map(str::parse::<usize>);
    let (total_vertices, total_edges) = match (counts.next(), counts.next()) {
        (Some(Ok(total_vertices)), Some(Ok(total_edges))) => (total_vertices, total_edges),
        _ => return Err(Error::MalformedHeader { line: header_line }),
    };

    let mut adjacency = Vec::with_capacity(total_vertices);
    for (line, text) in lines.take(total_vertices) {
        let neighbors = text
            .split_whitespace()
            .map(|token| match token.parse::<usize>() {
                Ok(index) if (1..=total_vertices).contains(&index) => Ok(index - 1),
                _ => Err(Error::InvalidToken {
                    line,
                    token: token.to_string(),
                }),
            })
            .collect::<Result<Vec<usize>, Error>>()?;
        adjacency.push(neighbors);
    }

    if adjacency.len() < total_vertices {
        return Err(Error::MissingLines {
            expected: total_vertices,
            found: adjacency.len(),
        });
    }

    let graph = Graph::from_adjacency(&adjacency)?;
    if graph.total_edges() != total_edges {
        warn!(
            "header announces {total_edges} edges, adjacency lists hold {}",
            graph.total_edges()
        );
    }

    Ok(graph)
}

/// Read a matrix market file and output Graph struct.
///
/// Only the sparsity pattern matters: values are ignored, the diagonal is
/// dropped and the pattern is made symmetric. Every vertex weighs 1.
pub fn read_matrix_market_as_graph(file_path: &Path) -> Result<Graph, Error> {
    // read the matrix market file as a TriMat, values are thrown away below.
    let tri_matrix = read_matrix_market::<f64, usize, _>(file_path)?;
    if tri_matrix.rows() != tri_matrix.cols() {
        return Err(Error::NotSquare {
            rows: tri_matrix.rows(),
            cols: tri_matrix.cols(),
        });
    }

    let mut adjacency = vec![Vec::new(); tri_matrix.rows()];
    for (&row, &col) in tri_matrix.row_inds().iter().zip(tri_matrix.col_inds()) {
        adjacency[row].push(col);
    }

    Ok(Graph::from_adjacency(&adjacency)?)
}

/// Write the partition array to a file.
pub fn write_partition_data_to_file(partition: &[usize], file_path: &Path) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(file_path)?);
    for (vertex_id, label) in partition.iter().enumerate() {
        writeln!(file, "vertex {} => partition {}", vertex_id, label)?;
    }
    file.flush()
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use tempfile::tempdir;

    use crate::io::{
        parse_adjacency_list, read_adjacency_list_as_graph, read_matrix_market_as_graph,
        write_partition_data_to_file, Error,
    };

    fn create_mock_file(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let file_path = dir.join(filename);
        let mut file = File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file_path
    }

    #[test]
    fn test_read_adjacency_list() -> Result<(), std::io::Error> {
        // Arrange
        let temp_dir = tempdir()?;
        let content = "% a triangle and a pendant vertex\n4 4\n2 3\n1 3\n1 2 4\n3\n";
        let file_path = create_mock_file(temp_dir.path(), "triangle.graph", content);

        // Act
        let graph = read_adjacency_list_as_graph(&file_path).unwrap();

        // Assert
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.total_edges(), 4);
        assert_eq!(graph.neighbors(2), &[0, 1, 3]);
        assert_eq!(graph.neighbors(3), &[2]);
        assert_eq!(graph.total_weight(), 4);

        Ok(())
    }

    #[test]
    fn test_blank_line_is_isolated_vertex() {
        let graph = parse_adjacency_list("3 1 extra tokens\n2\n1\n\n").unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.degree(2), 0);
    }

    #[test]
    fn test_edge_count_mismatch_is_tolerated() {
        // Only one side lists the edge, and the header is off.
        let graph = parse_adjacency_list("2 5\n2\n\n").unwrap();

        assert_eq!(graph.total_edges(), 1);
        assert!(graph.has_edge(1, 0));
    }

    #[test]
    fn test_malformed_files() {
        assert!(matches!(parse_adjacency_list(""), Err(Error::MalformedHeader { line: 1 })));
        assert!(matches!(
            parse_adjacency_list("% comment\n3\n"),
            Err(Error::MalformedHeader { line: 2 })
        ));
        assert!(matches!(
            parse_adjacency_list("2 1\n2\nx\n"),
            Err(Error::InvalidToken { line: 3, token }) if token == "x"
        ));
        assert!(matches!(
            parse_adjacency_list("2 1\n0\n1\n"),
            Err(Error::InvalidToken { line: 2, token }) if token == "0"
        ));
        assert!(matches!(
            parse_adjacency_list("2 1\n3\n1\n"),
            Err(Error::InvalidToken { line: 2, token }) if token == "3"
        ));
        assert!(matches!(
            parse_adjacency_list("3 2\n2\n1 3"),
            Err(Error::MissingLines { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempdir().unwrap();

        let result = read_adjacency_list_as_graph(&temp_dir.path().join("missing.graph"));

        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_read_matrix_market() -> Result<(), std::io::Error> {
        // Arrange
        let temp_dir = tempdir()?;
        let content = "%%MatrixMarket matrix coordinate real general\n%\n4 4 5\n1 1 1.0\n2 1 3.5\n3 2 1.0\n2 3 2.0\n4 3 1.0\n";
        let file_path = create_mock_file(temp_dir.path(), "real_matrix.mtx", content);

        // Act
        let graph = read_matrix_market_as_graph(&file_path).unwrap();

        // Assert
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.total_edges(), 3);
        assert!(!graph.has_edge(0, 0));
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(2), &[1, 3]);

        Ok(())
    }

    #[test]
    fn test_write_partition_data_to_file() -> Result<(), std::io::Error> {
        // Arrange
        let temp_dir = tempdir()?;
        let file_path = temp_dir.path().join("partition.txt");

        // Act
        write_partition_data_to_file(&[1, 2, 2], &file_path)?;

        // Assert
        let content = fs::read_to_string(&file_path)?;
        assert_eq!(content, "vertex 0 => partition 1\nvertex 1 => partition 2\nvertex 2 => partition 2\n");

        Ok(())
    }
}
