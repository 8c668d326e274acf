//! Genesis file parsing.

use node_registry::SeedNode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Genesis loading errors.
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("cannot read genesis file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed genesis document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GenesisDocument {
    Wrapped { nodes: Vec<SeedNode> },
    Bare(Vec<SeedNode>),
}

/// Parse a genesis document into its seed entries, in file order.
pub fn parse_genesis(data: &str) -> Result<Vec<SeedNode>, GenesisError> {
    let document: GenesisDocument = serde_json::from_str(data)?;
    Ok(match document {
        GenesisDocument::Wrapped { nodes } => nodes,
        GenesisDocument::Bare(nodes) => nodes,
    })
}

/// Read and parse a genesis file.
pub fn load_genesis_file(path: &Path) -> Result<Vec<SeedNode>, GenesisError> {
    let data = std::fs::read_to_string(path).map_err(|source| GenesisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_genesis(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SEED: &str = r#"[
        {"nodeType": "satellite", "id": "sat-1", "publicKey": "pk1"},
        {"nodeType": "user", "id": "user-1", "macAddr": "macAddr1", "publicKey": "publicKey1"}
    ]"#;

    #[test]
    fn test_parse_both_shapes() {
        let bare = parse_genesis(SEED).unwrap();
        let wrapped = parse_genesis(&format!(r#"{{"nodes": {}}}"#, SEED)).unwrap();

        assert_eq!(bare, wrapped);
        assert_eq!(bare.len(), 2);
        assert_eq!(bare[0].id(), "sat-1");
        assert!(matches!(&bare[1], SeedNode::User { mac_addr, .. } if mac_addr == "macAddr1"));
    }

    #[test]
    fn test_rejects_unknown_node_type() {
        let result = parse_genesis(r#"[{"nodeType": "relay", "id": "r1", "publicKey": "pk"}]"#);
        assert!(matches!(result, Err(GenesisError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let seeds = load_genesis_file(file.path()).unwrap();
        assert_eq!(seeds.len(), 2);

        let missing = load_genesis_file(Path::new("/nonexistent/genesis.json"));
        assert!(matches!(missing, Err(GenesisError::Io { .. })));
    }
}
