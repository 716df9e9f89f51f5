//! Prompt construction for floor plan conversion and upscaling
//!
//! Everything here is pure: the same inputs always produce the same text.

pub mod style;

pub use style::RenderingStyle;

/// Substituted when the user supplied no custom instructions
pub const NO_CUSTOM_INSTRUCTIONS: &str = "No custom instructions provided.";

/// Fixed instruction sent with the upscale pass
pub const UPSCALE_PROMPT: &str = "Upscale this image. Increase its resolution, \
sharpness and fine detail while keeping the composition, colors, lighting and \
style exactly as they are. Do not add, remove or move any element. \
Return only the enhanced image, with no accompanying text.";

/// Build the instruction text for converting `image_count` floor plan
/// images into a 3D rendering in the given style.
pub fn build_prompt(style: RenderingStyle, custom_instructions: &str, image_count: usize) -> String {
    let custom = if custom_instructions.trim().is_empty() {
        NO_CUSTOM_INSTRUCTIONS
    } else {
        custom_instructions
    };

    let subject = if image_count > 1 {
        format!(
            "You are given {} images of the same 2D architectural floor plan \
(for example different floors, sections or views). Combine them into one coherent building.",
            image_count
        )
    } else {
        "You are given one image of a 2D architectural floor plan.".to_string()
    };

    format!(
        "You are an expert architectural visualizer. {subject}
Transform the floor plan into a single high-quality 3D visualization by following these steps.

STEP 1 - ANALYZE THE PLAN
Identify every wall, room, door, window, staircase and fixed element. Ignore and discard \
non-structural markings such as dimension lines, measurements, text labels, hatching, \
grid lines, furniture symbols, watermarks and annotations.

STEP 2 - RECONSTRUCT THE STRUCTURE
Build a structurally consistent 3D shell that matches the layout exactly. Keep wall \
thickness consistent, make sure every room is fully enclosed, and place doors and \
windows in the same positions and proportions as in the plan. Preserve room sizes \
and their relative arrangement.

STEP 3 - APPLY STYLE, MATERIALS AND FURNISHING
Style instruction: {style_fragment}
Custom instructions from the user: {custom}
When the custom instructions and the style instruction disagree on a detail, follow \
the custom instructions.

STEP 4 - RENDER
Render the result from an isometric or bird's-eye perspective with the roof removed, \
so that the entire layout and every room is visible at once.

STEP 5 - SELF-CHECK BEFORE RETURNING
Verify that: the structure accurately matches the floor plan; there are no floating \
walls, gaps or broken geometry; no leftover text, labels or dimensions from the source \
plan remain (except annotations the style instruction explicitly asks for); the image \
has a professional, high resolution; the full layout is visible; and the custom \
instructions have been followed. Fix any problem before returning.

Return only the final image. Do not return any accompanying text.",
        subject = subject,
        style_fragment = style.instruction(),
        custom = custom,
    )
}
