use anyhow::{Context, Result};
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::graph_export::GraphData;

pub const VIS_NETWORK_JS: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";
pub const CANVAS_HEIGHT: &str = "600px";
pub const BACKGROUND: &str = "#ffffff";
pub const FONT_COLOR: &str = "black";

/// Serializes a value for embedding inside a `<script>` element.
fn script_json(value: &serde_json::Value) -> Result<String> {
    let text = serde_json::to_string(value)?;
    Ok(text.replace("</", "<\\/"))
}

/// Self-contained interactive page drawing the graph with vis-network.
pub fn render_html(graph: &GraphData) -> Result<String> {
    let nodes = script_json(&serde_json::to_value(&graph.nodes)?)?;
    let edges = script_json(&serde_json::to_value(graph.vis_edges())?)?;
    let options = script_json(&json!({
        "physics": { "enabled": true },
        "nodes": { "font": { "color": FONT_COLOR } },
        "interaction": { "hover": true },
    }))?;

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<script src="{js}"></script>
<style>
  body {{ margin: 0; background: {bg}; }}
  #mynetwork {{ width: 100%; height: {height}; background: {bg}; }}
</style>
</head>
<body>
<div id="mynetwork"></div>
<script>
  var nodes = new vis.DataSet({nodes});
  var edges = new vis.DataSet({edges});
  var container = document.getElementById("mynetwork");
  var network = new vis.Network(container, {{ nodes: nodes, edges: edges }}, {options});
</script>
</body>
</html>
"#,
        js = VIS_NETWORK_JS,
        bg = BACKGROUND,
        height = CANVAS_HEIGHT,
        nodes = nodes,
        edges = edges,
        options = options,
    ))
}

/// Writes the page to disk, creating the parent directory when needed.
pub fn save_graph(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), bytes = html.len(), "Saved graph page");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use index::MentionEdge;

    fn graph() -> GraphData {
        GraphData::from_mentions(&[MentionEdge {
            title: "Obama </script> <b>leaked</b>".to_string(),
            label: "FAKE".to_string(),
            entity: "Barack Obama".to_string(),
            entity_type: "PERSON".to_string(),
        }])
    }

    #[test]
    fn test_page_embeds_nodes_and_physics() {
        let html = render_html(&graph()).unwrap();
        assert!(html.contains("vis-network"));
        assert!(html.contains("\"physics\":{\"enabled\":true}"));
        assert!(html.contains("Barack Obama"));
        assert!(html.contains("#FF6B6B"));
        assert!(html.contains("\"shape\":\"diamond\""));
    }

    #[test]
    fn test_light_canvas_with_dark_labels() {
        let html = render_html(&graph()).unwrap();
        assert!(html.contains("background: #ffffff;"));
        assert!(html.contains("\"font\":{\"color\":\"black\"}"));
    }

    #[test]
    fn test_titles_cannot_close_the_script() {
        let html = render_html(&graph()).unwrap();
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_save_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("graph.html");
        save_graph(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
    }
}
