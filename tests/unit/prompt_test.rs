//! Unit tests for prompt construction

use floorplan_render::prompt::{build_prompt, RenderingStyle, NO_CUSTOM_INSTRUCTIONS, UPSCALE_PROMPT};

#[test]
fn test_each_style_includes_only_its_own_fragment() {
    for style in RenderingStyle::ALL {
        let prompt = build_prompt(style, "", 1);

        assert!(prompt.contains(style.instruction()), "{} fragment missing", style);
        for other in RenderingStyle::ALL.iter().filter(|s| **s != style) {
            assert!(
                !prompt.contains(other.instruction()),
                "{} prompt leaks {} fragment",
                style,
                other
            );
        }
    }
}

#[test]
fn test_empty_instructions_use_marker() {
    for style in RenderingStyle::ALL {
        for count in [1, 2, 5] {
            assert!(build_prompt(style, "", count).contains(NO_CUSTOM_INSTRUCTIONS));
        }
    }
}

#[test]
fn test_custom_instructions_are_verbatim() {
    let custom = "Make the kitchen island marble; keep {braces} & \"quotes\"";
    let prompt = build_prompt(RenderingStyle::Minimalist, custom, 1);

    assert!(prompt.contains(custom));
    assert!(!prompt.contains(NO_CUSTOM_INSTRUCTIONS));
}

#[test]
fn test_template_sections() {
    let prompt = build_prompt(RenderingStyle::Blueprint, "X", 2);

    assert!(prompt.contains("ANALYZE"));
    assert!(prompt.contains("consistent"));
    assert!(prompt.contains("isometric"));
    assert!(prompt.contains("SELF-CHECK"));
    assert!(prompt.contains("Return only the final image"));
}

#[test]
fn test_upscale_prompt_preserves_composition() {
    assert!(UPSCALE_PROMPT.contains("resolution"));
    assert!(UPSCALE_PROMPT.contains("composition"));
}
