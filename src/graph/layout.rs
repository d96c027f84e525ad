use super::node::{Node, Position};
use crate::config::LayoutConfig;

/// Proposes canvas positions for new nodes: right of the rightmost node, nudged down.
///
/// Purely advisory; nothing else depends on where a node lands.
#[derive(Debug, Clone, Default)]
pub struct LayoutHeuristic {
    config: LayoutConfig,
}

impl LayoutHeuristic {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn place(&self, nodes: &[Node]) -> Position {
        if nodes.is_empty() {
            return self.config.default_position;
        }

        let rightmost = nodes
            .iter()
            .map(|n| n.position)
            .filter(Position::is_finite)
            .reduce(|max, p| if p.x > max.x { p } else { max });

        match rightmost {
            Some(anchor) => Position::new(
                anchor.x + self.config.padding,
                anchor.y + self.config.vertical_offset,
            ),
            // No usable coordinates at all: stack below the default spot.
            None => Position::new(
                self.config.default_position.x,
                self.config.default_position.y + nodes.len() as f64 * self.config.stack_step,
            ),
        }
    }
}
