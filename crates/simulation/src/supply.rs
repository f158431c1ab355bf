//! Initial node supply: procedural placement or a sampled CSV dataset.
//!
//! Dataset files are tabular with at least the columns `Node_ID` and
//! `Node_Type`. Extra columns are ignored.

use crate::config::SimulationConfig;
use crate::DatasetError;
use blackhole_types::{Bounds, Node, NodeId, Vec2};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where the initial node set comes from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSupply {
    /// `nodes.count` nodes placed uniformly; the first
    /// `floor(count * malicious_ratio)` ids are malicious.
    #[default]
    Procedural,
    /// `population` rows sampled without replacement from a CSV file.
    Dataset { path: PathBuf, population: usize },
}

/// One row of the external dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetRecord {
    #[serde(rename = "Node_ID")]
    pub node_id: u32,
    #[serde(rename = "Node_Type")]
    pub node_type: String,
}

impl DatasetRecord {
    /// Whether the type label marks the node as an attacker.
    pub fn is_malicious_hint(&self) -> bool {
        let label = self.node_type.to_ascii_lowercase();
        label.contains("malicious") || label.contains("black hole") || label.contains("blackhole")
    }
}

/// Build `config.nodes.count` nodes at uniform random positions.
pub fn procedural_nodes(config: &SimulationConfig, rng: &mut ChaCha8Rng) -> Vec<Node> {
    let bounds = config.bounds();
    let count = config.nodes.count;
    let malicious = config.malicious_count();

    let nodes: Vec<Node> = (0..count)
        .map(|i| {
            let position = random_position(&bounds, rng);
            let velocity = random_velocity(config.nodes.max_initial_speed, rng);
            Node::new(NodeId(i as u32), position, velocity, i < malicious)
        })
        .collect();

    info!(count, malicious, "Placed procedural nodes");
    nodes
}

/// Read every record of a dataset file.
pub fn load_dataset(path: &Path) -> Result<Vec<DatasetRecord>, DatasetError> {
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: DatasetRecord = result.map_err(|source| DatasetError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        records.push(record);
    }

    debug!(path = %path.display(), rows = records.len(), "Loaded dataset");
    Ok(records)
}

/// Sample `population` records without replacement and turn them into nodes.
///
/// The type label is kept as a hint and decides malicious eligibility; the
/// trust value is re-drawn uniformly from `[0, 1]`.
pub fn sample_dataset_nodes(
    records: &[DatasetRecord],
    population: usize,
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Node>, DatasetError> {
    if records.len() < population {
        return Err(DatasetError::InsufficientRows {
            available: records.len(),
            requested: population,
        });
    }

    let bounds = config.bounds();
    let mut seen = HashSet::with_capacity(population);
    let mut nodes = Vec::with_capacity(population);

    for index in rand::seq::index::sample(rng, records.len(), population).into_vec() {
        let record = &records[index];
        let id = NodeId(record.node_id);
        if !seen.insert(id) {
            return Err(DatasetError::DuplicateId(id));
        }

        let position = random_position(&bounds, rng);
        let velocity = random_velocity(config.nodes.max_initial_speed, rng);
        let trust = rng.gen_range(0.0..=1.0);

        nodes.push(
            Node::new(id, position, velocity, record.is_malicious_hint())
                .with_type_hint(record.node_type.clone())
                .with_trust(trust),
        );
    }

    info!(
        population,
        malicious = nodes.iter().filter(|n| n.is_malicious).count(),
        "Sampled dataset nodes"
    );
    Ok(nodes)
}

/// Load a dataset file and sample it in one go.
pub fn dataset_nodes(
    path: &Path,
    population: usize,
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Node>, DatasetError> {
    let records = load_dataset(path)?;
    sample_dataset_nodes(&records, population, config, rng)
}

fn random_position(bounds: &Bounds, rng: &mut ChaCha8Rng) -> Vec2 {
    Vec2::new(
        rng.gen_range(bounds.min.x..=bounds.max.x),
        rng.gen_range(bounds.min.y..=bounds.max.y),
    )
}

fn random_velocity(max_speed: f64, rng: &mut ChaCha8Rng) -> Vec2 {
    if max_speed <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        rng.gen_range(-max_speed..=max_speed),
        rng.gen_range(-max_speed..=max_speed),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_procedural_first_ids_malicious() {
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let nodes = procedural_nodes(&config, &mut rng);

        assert_eq!(nodes.len(), 50);
        assert_eq!(nodes.iter().filter(|n| n.is_malicious).count(), 10);
        assert!(nodes[..10].iter().all(|n| n.is_malicious));
        assert!(nodes[10..].iter().all(|n| !n.is_malicious));

        let bounds = config.bounds();
        for node in &nodes {
            assert!(bounds.contains(node.position));
            assert!(node.velocity.x.abs() <= 1.0 && node.velocity.y.abs() <= 1.0);
        }
    }

    #[test]
    fn test_malicious_hint() {
        let record = |t: &str| DatasetRecord {
            node_id: 0,
            node_type: t.to_string(),
        };
        assert!(record("Malicious").is_malicious_hint());
        assert!(record("Black Hole").is_malicious_hint());
        assert!(!record("Normal").is_malicious_hint());
    }

    #[test]
    fn test_load_and_sample_dataset() {
        let file = write_csv(
            "Node_ID,Node_Type,Extra\n1,Normal,x\n2,Malicious,y\n3,Normal,z\n4,Normal,w\n",
        );
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let nodes = dataset_nodes(file.path(), 3, &config, &mut rng).unwrap();

        assert_eq!(nodes.len(), 3);
        let ids: HashSet<NodeId> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids.len(), 3, "sampled without replacement");
        for node in &nodes {
            assert!(node.type_hint.is_some());
            assert!((0.0..=1.0).contains(&node.metrics.trust));
            assert_eq!(node.is_malicious, node.id == NodeId(2));
        }
    }

    #[test]
    fn test_missing_dataset_fails() {
        let result = load_dataset(Path::new("/nonexistent/nodes.csv"));
        assert!(matches!(result, Err(DatasetError::Io { .. })));
    }

    #[test]
    fn test_malformed_dataset_fails() {
        let file = write_csv("Node_ID,Node_Type\nnot-a-number,Normal\n");
        let result = load_dataset(file.path());
        assert!(matches!(result, Err(DatasetError::Csv { .. })));
    }

    #[test]
    fn test_missing_column_fails() {
        let file = write_csv("Id,Kind\n1,Normal\n");
        assert!(matches!(
            load_dataset(file.path()),
            Err(DatasetError::Csv { .. })
        ));
    }

    #[test]
    fn test_too_few_rows() {
        let file = write_csv("Node_ID,Node_Type\n1,Normal\n");
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let result = dataset_nodes(file.path(), 2, &config, &mut rng);
        assert!(matches!(
            result,
            Err(DatasetError::InsufficientRows {
                available: 1,
                requested: 2
            })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let records = vec![
            DatasetRecord {
                node_id: 1,
                node_type: "Normal".into(),
            },
            DatasetRecord {
                node_id: 1,
                node_type: "Normal".into(),
            },
        ];
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert!(matches!(
            sample_dataset_nodes(&records, 2, &config, &mut rng),
            Err(DatasetError::DuplicateId(NodeId(1)))
        ));
    }
}
