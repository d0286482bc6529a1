use serde::{Deserialize, Serialize};
use std::fmt;

/// Named leaf outline carried by every emitted leaf primitive.
///
/// The outline geometry itself belongs to whoever builds meshes from the
/// primitive stream; the core only forwards the choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafType {
    #[default]
    Ovate,
    Linear,
    Cordate,
    Maple,
    Palmate,
    SpikyOak,
    RoundedOak,
    Elliptic,
    Rectangle,
    Triangle,
}

impl LeafType {
    pub const ALL: [LeafType; 10] = [
        LeafType::Ovate,
        LeafType::Linear,
        LeafType::Cordate,
        LeafType::Maple,
        LeafType::Palmate,
        LeafType::SpikyOak,
        LeafType::RoundedOak,
        LeafType::Elliptic,
        LeafType::Rectangle,
        LeafType::Triangle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LeafType::Ovate => "Ovate",
            LeafType::Linear => "Linear",
            LeafType::Cordate => "Cordate",
            LeafType::Maple => "Maple",
            LeafType::Palmate => "Palmate",
            LeafType::SpikyOak => "Spiky Oak",
            LeafType::RoundedOak => "Rounded Oak",
            LeafType::Elliptic => "Elliptic",
            LeafType::Rectangle => "Rectangle",
            LeafType::Triangle => "Triangle",
        }
    }
}

impl fmt::Display for LeafType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
