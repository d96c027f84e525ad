//! Typed views over the open configuration map of each node kind.
//!
//! Parsing is lenient like the canvas forms: unknown codes fall back to the
//! first option and missing numbers fall back to the per-indicator defaults.

use super::node::NodeData;

/// Defines a configuration enum backed by the string codes the canvas stores.
macro_rules! wire_enum {
    ( $(#[$meta:meta])* $name:ident { $( $variant:ident => $code:literal ),+ $(,)? } ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            pub fn code(self) -> &'static str {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            /// Parses a stored code; anything unrecognised maps to the first variant.
            pub fn from_code(code: Option<&str>) -> Self {
                match code {
                    $( Some($code) => $name::$variant, )+
                    _ => Self::ALL[0],
                }
            }
        }
    };
}

wire_enum! {
    /// Technical indicator families offered by the node menu.
    IndicatorType {
        Sma => "SMA",
        Ema => "EMA",
        Rsi => "RSI",
        Macd => "MACD",
        Bbands => "BBANDS",
        Stoch => "STOCH",
    }
}

wire_enum! {
    /// Comparison performed by a Condition node.
    ConditionType {
        Gt => "GT",
        Lt => "LT",
        Eq => "EQ",
        CrossAbove => "CROSS_ABOVE",
        CrossBelow => "CROSS_BELOW",
    }
}

wire_enum! {
    LogicType {
        And => "AND",
        Or => "OR",
        Not => "NOT",
    }
}

wire_enum! {
    ActionType {
        Entry => "ENTRY",
        Exit => "EXIT",
    }
}

wire_enum! {
    PositionSide {
        Long => "LONG",
        Short => "SHORT",
    }
}

impl IndicatorType {
    pub fn long_name(self) -> &'static str {
        match self {
            IndicatorType::Sma => "Simple Moving Average",
            IndicatorType::Ema => "Exponential Moving Average",
            IndicatorType::Rsi => "Relative Strength Index",
            IndicatorType::Macd => "MACD",
            IndicatorType::Bbands => "Bollinger Bands",
            IndicatorType::Stoch => "Stochastic Oscillator",
        }
    }

    /// Parameter fields in display order, with the value used when a field is unset.
    pub fn parameters(self) -> &'static [(&'static str, f64)] {
        match self {
            IndicatorType::Sma | IndicatorType::Ema => &[("period", 20.0)],
            IndicatorType::Rsi => &[("period", 14.0)],
            IndicatorType::Macd => &[
                ("fastPeriod", 12.0),
                ("slowPeriod", 26.0),
                ("signalPeriod", 9.0),
            ],
            IndicatorType::Bbands => &[("period", 20.0), ("stdDev", 2.0)],
            IndicatorType::Stoch => &[("kPeriod", 14.0), ("dPeriod", 3.0), ("slowing", 3.0)],
        }
    }

    /// Output handles as `(handle id, label)` pairs.
    pub fn outputs(self) -> &'static [(&'static str, &'static str)] {
        match self {
            IndicatorType::Sma | IndicatorType::Ema => &[("value", "Value")],
            IndicatorType::Rsi => &[("value", "RSI")],
            IndicatorType::Macd => &[
                ("macd", "MACD"),
                ("signal", "Signal"),
                ("histogram", "Hist"),
            ],
            IndicatorType::Bbands => &[
                ("upper", "Upper"),
                ("middle", "Middle"),
                ("lower", "Lower"),
            ],
            IndicatorType::Stoch => &[("%k", "%K"), ("%d", "%D")],
        }
    }
}

impl ConditionType {
    pub fn symbol(self) -> &'static str {
        match self {
            ConditionType::Gt => ">",
            ConditionType::Lt => "<",
            ConditionType::Eq => "=",
            ConditionType::CrossAbove => "↗",
            ConditionType::CrossBelow => "↘",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ConditionType::Gt => "Greater Than",
            ConditionType::Lt => "Less Than",
            ConditionType::Eq => "Equals",
            ConditionType::CrossAbove => "Crosses Above",
            ConditionType::CrossBelow => "Crosses Below",
        }
    }
}

impl ActionType {
    fn title(self) -> &'static str {
        match self {
            ActionType::Entry => "Entry",
            ActionType::Exit => "Exit",
        }
    }
}

impl PositionSide {
    fn title(self) -> &'static str {
        match self {
            PositionSide::Long => "Long",
            PositionSide::Short => "Short",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub indicator: IndicatorType,
    /// Resolved parameter values, aligned with `IndicatorType::parameters`.
    pub arguments: Vec<f64>,
}

impl IndicatorParams {
    pub fn from_data(data: &NodeData) -> Self {
        let indicator = IndicatorType::from_code(data.text("indicatorType"));
        let arguments = indicator
            .parameters()
            .iter()
            .map(|(field, default)| data.number(field).unwrap_or(*default))
            .collect();
        Self {
            indicator,
            arguments,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionParams {
    pub condition: ConditionType,
    /// When set, input `b` is replaced by this literal.
    pub threshold: Option<f64>,
}

impl ConditionParams {
    pub fn from_data(data: &NodeData) -> Self {
        Self {
            condition: ConditionType::from_code(data.text("conditionType")),
            threshold: data.number("threshold"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicParams {
    pub logic: LogicType,
}

impl LogicParams {
    pub fn from_data(data: &NodeData) -> Self {
        Self {
            logic: LogicType::from_code(data.text("logicType")),
        }
    }

    pub fn is_single_input(&self) -> bool {
        self.logic == LogicType::Not
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionParams {
    pub action: ActionType,
    pub side: PositionSide,
}

impl ActionParams {
    pub fn from_data(data: &NodeData) -> Self {
        Self {
            action: ActionType::from_code(data.text("actionType")),
            side: PositionSide::from_code(data.text("positionType")),
        }
    }

    /// `"Entry Long"`, `"Exit Short"`, ...
    pub fn title(&self) -> String {
        format!("{} {}", self.action.title(), self.side.title())
    }

    /// Two-letter code: side initial followed by `E`ntry or e`X`it.
    pub fn short_code(&self) -> &'static str {
        match (self.side, self.action) {
            (PositionSide::Long, ActionType::Entry) => "LE",
            (PositionSide::Long, ActionType::Exit) => "LX",
            (PositionSide::Short, ActionType::Entry) => "SE",
            (PositionSide::Short, ActionType::Exit) => "SX",
        }
    }
}
