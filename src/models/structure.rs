// src/models/structure.rs

use std::collections::BTreeMap;

use serde::Serialize;

/// Topics available under one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectTopics {
    #[serde(rename = "Topics")]
    pub topics: Vec<String>,
}

/// Subject display name -> topics, as returned by `GET /api/get-structure`.
pub type Structure = BTreeMap<String, SubjectTopics>;
