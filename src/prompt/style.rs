//! Rendering styles

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// The closed set of presentation modes for the 3D conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderingStyle {
    #[default]
    Realistic,
    Sketch,
    Wireframe,
    Minimalist,
    Cozy,
    Blueprint,
}

impl RenderingStyle {
    pub const ALL: [RenderingStyle; 6] = [
        RenderingStyle::Realistic,
        RenderingStyle::Sketch,
        RenderingStyle::Wireframe,
        RenderingStyle::Minimalist,
        RenderingStyle::Cozy,
        RenderingStyle::Blueprint,
    ];

    /// Parse a style name, falling back to `Realistic` for anything unknown
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "realistic" => Self::Realistic,
            "sketch" => Self::Sketch,
            "wireframe" => Self::Wireframe,
            "minimalist" => Self::Minimalist,
            "cozy" => Self::Cozy,
            "blueprint" => Self::Blueprint,
            other => {
                warn!(style = %other, "Unknown rendering style, using realistic");
                Self::Realistic
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Realistic => "realistic",
            Self::Sketch => "sketch",
            Self::Wireframe => "wireframe",
            Self::Minimalist => "minimalist",
            Self::Cozy => "cozy",
            Self::Blueprint => "blueprint",
        }
    }

    /// Human-readable label for pickers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Realistic => "Realistic",
            Self::Sketch => "Sketch",
            Self::Wireframe => "Wireframe",
            Self::Minimalist => "Modern minimalist",
            Self::Cozy => "Warm & cozy",
            Self::Blueprint => "Blueprint",
        }
    }

    /// The style-specific fragment embedded in the conversion prompt
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Realistic => "Fully furnish all rooms with modern, high-quality, realistic furniture \
that matches each room's purpose (sofas and a coffee table in the living room, a bed and \
wardrobe in the bedroom, a dining table in the dining area). Use realistic materials and \
textures with natural lighting, as a professional 3D architectural visualization.",
            Self::Sketch => "Render this as a clean, artistic, hand-drawn architectural sketch \
with charcoal shading. Do not furnish it.",
            Self::Wireframe => "Render this as a clean, monochrome 3D wireframe model on a dark \
background. Show only edges and lines; do not show any surfaces, textures or furniture.",
            Self::Minimalist => "Furnish the rooms in a modern minimalist style with a neutral \
palette of whites, greys and light wood, clean lines, sparse furniture and uncluttered surfaces.",
            Self::Cozy => "Furnish the rooms in a warm, cozy, rustic style with wooden beams and \
floors, soft textiles, plush seating, warm earthy tones and soft warm lighting.",
            Self::Blueprint => "Render this as a technical blueprint: crisp white lines on a deep \
blue background, drawn in 3D, with each room annotated by its name. Do not include any \
furniture or textures.",
        }
    }
}

impl fmt::Display for RenderingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
