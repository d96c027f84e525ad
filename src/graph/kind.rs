use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Master macro defining the closed set of node kinds, their wire names and id prefixes.
macro_rules! define_node_kinds {
    ( $( ($variant:ident, $wire:literal, $prefix:literal) ),* $(,)? ) => {
        /// The tag of a strategy node. Serialized under the canvas' `type` names.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum NodeKind {
            $( #[serde(rename = $wire)] $variant, )*
        }

        impl NodeKind {
            pub const ALL: &'static [NodeKind] = &[ $( NodeKind::$variant, )* ];

            /// The `type` string used by the canvas and the persisted document.
            pub fn wire_name(self) -> &'static str {
                match self {
                    $( NodeKind::$variant => $wire, )*
                }
            }

            /// Prefix of ids handed out by the `IdAllocator`.
            pub fn id_prefix(self) -> &'static str {
                match self {
                    $( NodeKind::$variant => $prefix, )*
                }
            }
        }

        impl FromStr for NodeKind {
            type Err = String;

            fn from_str(name: &str) -> Result<Self, Self::Err> {
                match name {
                    $( $wire => Ok(NodeKind::$variant), )*
                    other => Err(format!("unknown node type '{}'", other)),
                }
            }
        }
    };
}

define_node_kinds! {
    (Source, "priceNode", "price"),
    (Indicator, "indicatorNode", "indicator"),
    (Condition, "conditionNode", "condition"),
    (Logic, "logicNode", "logic"),
    (Action, "actionNode", "action"),
}

impl NodeKind {
    /// Position of this kind in the behaviour table.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
