use serde::{Deserialize, Serialize};

/// An autobrr indexer definition, as returned by `GET /api/indexer`.
#[derive(Debug, Clone, Deserialize)]
pub struct Indexer {
    pub id: i32,
    pub name: String,
    pub enabled: bool,
}

/// Body for `PATCH /api/indexer/{id}/enabled`.
#[derive(Debug, Serialize)]
pub(crate) struct SetEnabledRequest {
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_indexer_list() {
        let json = r#"[
            {"id": 1, "name": "MyIndexer", "enabled": true, "identifier": "my-indexer"},
            {"id": 2, "name": "Other", "enabled": false}
        ]"#;

        let indexers: Vec<Indexer> = serde_json::from_str(json).unwrap();
        assert_eq!(indexers.len(), 2);
        assert_eq!(indexers[0].name, "MyIndexer");
        assert!(indexers[0].enabled);
        assert!(!indexers[1].enabled);
    }
}
