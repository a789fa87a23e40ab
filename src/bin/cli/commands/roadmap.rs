use std::path::Path;

use anyhow::Result;

use studydeck_lib::roadmap::{layout, render_tree, NodeMastery, RoadmapNode};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    roadmap_path: &Path,
    mastery_path: Option<&Path>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let root: RoadmapNode = app.read_json(roadmap_path)?;
    let mastery: Vec<NodeMastery> = match mastery_path {
        Some(path) => app.read_json(path)?,
        None => Vec::new(),
    };

    match format {
        OutputFormat::Json => {
            let graph = layout(&root, &mastery);
            println!("{}", serde_json::to_string_pretty(&graph)?);
        }
        OutputFormat::Plain => {
            let mut lines = render_tree(&root, &mastery).into_iter();
            if let Some(title) = lines.next() {
                println!("{}", paint(&title, Color::BOLD, use_color));
            }
            for line in lines {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
