//! Plain-text roadmap tree with mastery

use std::collections::HashMap;

use super::models::{NodeMastery, RoadmapNode};

const BRANCH: &str = "\u{251c}\u{2500}\u{2500} ";
const LAST_BRANCH: &str = "\u{2514}\u{2500}\u{2500} ";
const PIPE: &str = "\u{2502}   ";
const SPACE: &str = "    ";

/// Render `root` as box-drawing lines, one per topic
pub fn render_tree(root: &RoadmapNode, mastery: &[NodeMastery]) -> Vec<String> {
    let table: HashMap<&str, &NodeMastery> = mastery
        .iter()
        .map(|m| (m.node_id.as_str(), m))
        .collect();

    let mut lines = vec![describe(root, &table)];
    let mut stack: Vec<(&RoadmapNode, String, bool)> = Vec::new();
    push_children(&mut stack, root, String::new());

    while let Some((node, prefix, is_last)) = stack.pop() {
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        lines.push(format!("{}{}{}", prefix, connector, describe(node, &table)));

        if !node.is_leaf() {
            let child_prefix = format!("{}{}", prefix, if is_last { SPACE } else { PIPE });
            push_children(&mut stack, node, child_prefix);
        }
    }
    lines
}

// Reversed so the first child is popped first
fn push_children<'a>(stack: &mut Vec<(&'a RoadmapNode, String, bool)>, node: &'a RoadmapNode, prefix: String) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate().rev() {
        stack.push((child, prefix.clone(), i + 1 == count));
    }
}

fn describe(node: &RoadmapNode, table: &HashMap<&str, &NodeMastery>) -> String {
    match table.get(node.id.as_str()) {
        Some(m) if m.total_cards > 0 => format!(
            "{} [{:.0}%] ({}/{} cards)",
            node.label, m.percentage, m.mastered_cards, m.total_cards
        ),
        Some(m) => format!("{} [{:.0}%]", node.label, m.percentage),
        None => format!("{} [0%]", node.label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tree() {
        let tree = RoadmapNode::new("rust", "Rust").with_children(vec![
            RoadmapNode::new("own", "Ownership").with_children(vec![RoadmapNode::new("borrow", "Borrowing")]),
            RoadmapNode::new("traits", "Traits"),
        ]);
        let mastery = vec![NodeMastery {
            node_id: "own".to_string(),
            percentage: 40.0,
            total_cards: 10,
            mastered_cards: 4,
        }];

        let lines = render_tree(&tree, &mastery);
        assert_eq!(
            lines,
            vec![
                "Rust [0%]",
                "\u{251c}\u{2500}\u{2500} Ownership [40%] (4/10 cards)",
                "\u{2502}   \u{2514}\u{2500}\u{2500} Borrowing [0%]",
                "\u{2514}\u{2500}\u{2500} Traits [0%]",
            ]
        );
    }

    #[test]
    fn test_render_deep_tree() {
        let mut tree = RoadmapNode::new("n0", "N0");
        for depth in 1..2_000 {
            tree = RoadmapNode::new(format!("n{}", depth), format!("N{}", depth)).with_children(vec![tree]);
        }

        let lines = render_tree(&tree, &[]);
        assert_eq!(lines.len(), 2_000);
        assert_eq!(lines[0], "N1999 [0%]");
        assert!(lines[1_999].ends_with("\u{2514}\u{2500}\u{2500} N0 [0%]"));
    }
}
