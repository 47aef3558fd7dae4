/// Rendered size of a sensor graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GraphSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl GraphSize {
    /// (width, height, base font size)
    pub fn dimensions(&self) -> (u32, u32, u32) {
        match self {
            GraphSize::Small => (400, 300, 9),
            GraphSize::Medium => (800, 350, 13),
            GraphSize::Large => (1500, 500, 13),
        }
    }
}

impl std::str::FromStr for GraphSize {
    type Err = crate::PrtgError;

    fn from_str(input: &str) -> crate::Result<Self> {
        match input.to_uppercase().as_str() {
            "S" | "SMALL" => Ok(GraphSize::Small),
            "M" | "MEDIUM" => Ok(GraphSize::Medium),
            "L" | "LARGE" => Ok(GraphSize::Large),
            _ => Err(crate::PrtgError::ParserError(format!(
                "Cannot convert {:?} to GraphSize",
                input
            ))),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    #[default]
    Svg,
    Png,
}

impl GraphFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            GraphFormat::Svg => "svg",
            GraphFormat::Png => "png",
        }
    }
}

/// What to render with [`crate::Node::save_graph`].
///
/// PRTG graph ids: 0 = live, 1 = last 48 hours, 2 = last 30 days, 3 = last 365 days.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GraphOptions {
    pub graph_id: u32,
    pub size: GraphSize,
    /// Channel ids left out of the graph.
    pub hidden_channels: Vec<i64>,
    pub format: GraphFormat,
}
