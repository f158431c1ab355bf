//! Fixture builders for node state and dataset files.

use blackhole_types::{Node, NodeId, Vec2};
use std::io::Write;
use tempfile::NamedTempFile;

/// A malicious node whose suspicious score is already `score`.
pub fn scored_node(id: u32, score: u32) -> Node {
    let mut node = Node::new(NodeId(id), Vec2::ZERO, Vec2::ZERO, true);
    node.metrics.suspicious_score = score;
    node
}

/// A malicious node with the given forward/drop counters.
pub fn dropping_node(id: u32, forwarded: u64, dropped: u64) -> Node {
    let mut node = Node::new(NodeId(id), Vec2::ZERO, Vec2::ZERO, true);
    node.metrics.packets_forwarded = forwarded;
    node.metrics.packets_dropped = dropped;
    node
}

/// Write `(Node_ID, Node_Type)` rows to a temporary CSV file.
///
/// The file is removed when the returned handle is dropped.
pub fn write_dataset(rows: &[(u32, &str)]) -> NamedTempFile {
    let mut contents = String::from("Node_ID,Node_Type\n");
    for (id, node_type) in rows {
        contents.push_str(&format!("{id},{node_type}\n"));
    }
    write_raw_dataset(&contents)
}

/// Write arbitrary text to a temporary file, for malformed-input tests.
pub fn write_raw_dataset(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp dataset");
    file.write_all(contents.as_bytes())
        .expect("write temp dataset");
    file
}

/// `count` dataset rows with ids starting at 1; every `malicious_every`-th
/// row is typed "Malicious".
pub fn dataset_rows(count: u32, malicious_every: u32) -> Vec<(u32, &'static str)> {
    (1..=count)
        .map(|id| {
            let node_type = if malicious_every > 0 && id % malicious_every == 0 {
                "Malicious"
            } else {
                "Normal"
            };
            (id, node_type)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_rows() {
        let rows = dataset_rows(6, 3);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[2], (3, "Malicious"));
        assert_eq!(rows[5], (6, "Malicious"));
        assert_eq!(rows[0], (1, "Normal"));
    }

    #[test]
    fn test_write_dataset() {
        let file = write_dataset(&[(1, "Normal"), (2, "Black Hole")]);
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "Node_ID,Node_Type\n1,Normal\n2,Black Hole\n");
    }
}
