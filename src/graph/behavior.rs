use super::kind::NodeKind;
use super::node::{Node, NodeData};
use super::params::{
    ActionParams, ConditionParams, IndicatorParams, IndicatorType, LogicParams, LogicType,
};
use crate::labels::format::{capitalize, format_number};
use itertools::Itertools;

/// Placeholder rendered for an input that has neither an edge nor a literal.
pub const UNCONNECTED: &str = "?";

/// Per-kind behaviour: handles, numeric fields and display text.
///
/// One implementation exists per `NodeKind`; callers go through `behavior`.
pub trait NodeBehavior: Send + Sync {
    fn kind(&self) -> NodeKind;

    /// Input handles exposed under the node's current configuration.
    fn input_handles(&self, data: &NodeData) -> &'static [&'static str];

    fn output_handles(&self, data: &NodeData) -> Vec<&'static str>;

    /// Fields whose form input must parse as a number.
    fn numeric_fields(&self) -> &'static [&'static str] {
        &[]
    }

    /// Title shown when the user has not set a label.
    fn default_label(&self, data: &NodeData) -> String;

    /// Short text standing for this node's output when it feeds another node's header.
    fn operand(&self, node: &Node, source_handle: &str) -> String;

    /// Builds a dynamic header, pulling the text of each input through `input`.
    fn header(&self, _data: &NodeData, _input: &mut dyn FnMut(&str) -> String) -> Option<String> {
        None
    }
}

struct SourceBehavior;
struct IndicatorBehavior;
struct ConditionBehavior;
struct LogicBehavior;
struct ActionBehavior;

// Indexed by `NodeKind::index`.
static BEHAVIORS: [&dyn NodeBehavior; 5] = [
    &SourceBehavior,
    &IndicatorBehavior,
    &ConditionBehavior,
    &LogicBehavior,
    &ActionBehavior,
];

/// Looks up the behaviour of a node kind.
pub fn behavior(kind: NodeKind) -> &'static dyn NodeBehavior {
    BEHAVIORS[kind.index()]
}

/// Label the canvas shows as the node title: the user label, or the kind's default.
pub fn display_label(node: &Node) -> String {
    match node.data.label() {
        Some(label) => label.to_string(),
        None => behavior(node.kind).default_label(&node.data),
    }
}

impl NodeBehavior for SourceBehavior {
    fn kind(&self) -> NodeKind {
        NodeKind::Source
    }

    fn input_handles(&self, _data: &NodeData) -> &'static [&'static str] {
        &[]
    }

    fn output_handles(&self, _data: &NodeData) -> Vec<&'static str> {
        vec!["open", "high", "low", "close", "volume"]
    }

    fn default_label(&self, _data: &NodeData) -> String {
        "Market Data".to_string()
    }

    fn operand(&self, _node: &Node, source_handle: &str) -> String {
        capitalize(source_handle)
    }
}

const INDICATOR_NUMERIC_FIELDS: &[&str] = &[
    "period",
    "fastPeriod",
    "slowPeriod",
    "signalPeriod",
    "stdDev",
    "kPeriod",
    "dPeriod",
    "slowing",
];

impl NodeBehavior for IndicatorBehavior {
    fn kind(&self) -> NodeKind {
        NodeKind::Indicator
    }

    fn input_handles(&self, _data: &NodeData) -> &'static [&'static str] {
        &["input"]
    }

    fn output_handles(&self, data: &NodeData) -> Vec<&'static str> {
        IndicatorType::from_code(data.text("indicatorType"))
            .outputs()
            .iter()
            .map(|(handle, _)| *handle)
            .collect()
    }

    fn numeric_fields(&self) -> &'static [&'static str] {
        INDICATOR_NUMERIC_FIELDS
    }

    fn default_label(&self, data: &NodeData) -> String {
        IndicatorType::from_code(data.text("indicatorType"))
            .long_name()
            .to_string()
    }

    fn operand(&self, node: &Node, source_handle: &str) -> String {
        let params = IndicatorParams::from_data(&node.data);
        let call = format!(
            "{}({})",
            params.indicator.code(),
            params.arguments.iter().map(|n| format_number(*n)).join(",")
        );
        let outputs = params.indicator.outputs();
        if outputs.len() > 1 {
            let output = outputs
                .iter()
                .find(|(handle, _)| *handle == source_handle)
                .map(|(_, label)| label.to_string())
                .unwrap_or_else(|| capitalize(source_handle));
            format!("{} {}", call, output)
        } else {
            call
        }
    }
}

impl NodeBehavior for ConditionBehavior {
    fn kind(&self) -> NodeKind {
        NodeKind::Condition
    }

    fn input_handles(&self, data: &NodeData) -> &'static [&'static str] {
        if ConditionParams::from_data(data).threshold.is_some() {
            &["a"]
        } else {
            &["a", "b"]
        }
    }

    fn output_handles(&self, _data: &NodeData) -> Vec<&'static str> {
        vec!["result"]
    }

    fn numeric_fields(&self) -> &'static [&'static str] {
        &["threshold"]
    }

    fn default_label(&self, data: &NodeData) -> String {
        ConditionParams::from_data(data)
            .condition
            .description()
            .to_string()
    }

    fn operand(&self, node: &Node, _source_handle: &str) -> String {
        self.default_label(&node.data)
    }

    fn header(&self, data: &NodeData, input: &mut dyn FnMut(&str) -> String) -> Option<String> {
        let params = ConditionParams::from_data(data);
        let left = input("a");
        // A threshold shadows input `b`; its edge, if any, is not consulted.
        let right = match params.threshold {
            Some(threshold) => format_number(threshold),
            None => input("b"),
        };
        Some(format!("{} {} {}", left, params.condition.symbol(), right))
    }
}

impl NodeBehavior for LogicBehavior {
    fn kind(&self) -> NodeKind {
        NodeKind::Logic
    }

    fn input_handles(&self, data: &NodeData) -> &'static [&'static str] {
        if LogicParams::from_data(data).is_single_input() {
            &["in"]
        } else {
            &["in1", "in2"]
        }
    }

    fn output_handles(&self, _data: &NodeData) -> Vec<&'static str> {
        vec!["out"]
    }

    fn default_label(&self, data: &NodeData) -> String {
        LogicParams::from_data(data).logic.code().to_string()
    }

    fn operand(&self, node: &Node, _source_handle: &str) -> String {
        self.default_label(&node.data)
    }

    fn header(&self, data: &NodeData, input: &mut dyn FnMut(&str) -> String) -> Option<String> {
        let logic = LogicParams::from_data(data).logic;
        let header = match logic {
            LogicType::Not => format!("NOT {}", input("in")),
            LogicType::And | LogicType::Or => {
                format!("{} {} {}", input("in1"), logic.code(), input("in2"))
            }
        };
        Some(header)
    }
}

impl NodeBehavior for ActionBehavior {
    fn kind(&self) -> NodeKind {
        NodeKind::Action
    }

    fn input_handles(&self, _data: &NodeData) -> &'static [&'static str] {
        &["trigger"]
    }

    fn output_handles(&self, _data: &NodeData) -> Vec<&'static str> {
        Vec::new()
    }

    fn default_label(&self, data: &NodeData) -> String {
        ActionParams::from_data(data).title()
    }

    fn operand(&self, node: &Node, _source_handle: &str) -> String {
        ActionParams::from_data(&node.data).short_code().to_string()
    }
}
