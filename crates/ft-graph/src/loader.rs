//! Nav-graph JSON loader (feature = `"json"`).
//!
//! # Format
//!
//! ```json
//! {
//!   "levels": {
//!     "L1": {
//!       "vertices": [[x, y, {"name": "dock_a", "is_charger": true}], ...],
//!       "lanes":    [[0, 1, {}], [1, 2, {"is_bidirectional": false}], ...]
//!     }
//!   }
//! }
//! ```
//!
//! The **first** level in document order is loaded.  A document without
//! `levels` may carry `vertices`/`lanes` at the top level instead.  Vertex
//! attributes are optional: a missing name becomes `V<index>`.  Lanes are
//! bidirectional unless their attributes say `"is_bidirectional": false`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use ft_core::{Point2, VertexId};

use crate::{GraphError, GraphResult, NavGraph, NavGraphBuilder, VertexKind};

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    levels: Option<Map<String, Value>>,
    #[serde(flatten)]
    top: Level,
}

#[derive(Debug, Default, Deserialize)]
struct Level {
    #[serde(default)]
    vertices: Vec<VertexRecord>,
    #[serde(default)]
    lanes: Vec<LaneRecord>,
}

#[derive(Debug, Deserialize)]
struct VertexRecord(f32, f32, #[serde(default)] VertexAttrs);

#[derive(Debug, Default, Deserialize)]
struct VertexAttrs {
    name: Option<String>,
    #[serde(default)]
    is_charger: bool,
}

#[derive(Debug, Deserialize)]
struct LaneRecord(u32, u32, #[serde(default)] LaneAttrs);

#[derive(Debug, Default, Deserialize)]
struct LaneAttrs {
    is_bidirectional: Option<bool>,
}

/// Load a nav graph from a JSON file.
pub fn load_nav_graph(path: &Path) -> GraphResult<NavGraph> {
    let file = File::open(path)?;
    load_nav_graph_reader(BufReader::new(file))
}

/// Load a nav graph from any reader (file, `Cursor`, network stream).
pub fn load_nav_graph_reader<R: Read>(reader: R) -> GraphResult<NavGraph> {
    let doc: Document = serde_json::from_reader(reader)?;

    let level = match doc.levels {
        Some(levels) => {
            let (_, first) = levels
                .into_iter()
                .next()
                .ok_or_else(|| GraphError::Format("`levels` is empty".into()))?;
            serde_json::from_value::<Level>(first)?
        }
        None => doc.top,
    };

    build_level(level)
}

fn build_level(level: Level) -> GraphResult<NavGraph> {
    let mut b = NavGraphBuilder::new();

    for (i, VertexRecord(x, y, attrs)) in level.vertices.into_iter().enumerate() {
        let name = attrs.name.unwrap_or_else(|| format!("V{i}"));
        let kind = if attrs.is_charger { VertexKind::Charger } else { VertexKind::Regular };
        b.add_named_vertex(Point2::new(x, y), name, kind);
    }

    for LaneRecord(from, to, attrs) in level.lanes {
        let (a, c) = (VertexId(from), VertexId(to));
        if attrs.is_bidirectional.unwrap_or(true) {
            b.add_lane(a, c);
        } else {
            b.add_directed_lane(a, c);
        }
    }

    b.build()
}
