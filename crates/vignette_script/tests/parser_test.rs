use vignette_core::{Panel, PanelPlan};
use vignette_script::parse_script;

#[test]
fn unstructured_text_becomes_one_panel() {
    let input = "just some prose without any screenplay structure at all";
    let panels = parse_script(input);
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0].description, input);
    assert!(panels[0].dialogue.is_none());
}

#[test]
fn whitespace_only_input_becomes_one_panel() {
    let panels = parse_script("   \n\n  ");
    assert_eq!(panels.len(), 1);
}

#[test]
fn scene_heading_and_action_merge_into_one_panel() {
    let panels = parse_script("EXT. ROOFTOP - DUSK\n\nA cape flutters in the wind.");
    assert_eq!(panels.len(), 1);
    assert!(panels[0].description.contains("EXT. ROOFTOP - DUSK"));
    assert!(panels[0].description.contains("A cape flutters in the wind."));
}

#[test]
fn dialogue_attaches_to_panel_in_progress() {
    let script = "INT. LAB - NIGHT\nMonitors flicker.\n\nDR. VANCE\nIt worked.\nIt finally worked.";
    let panels = parse_script(script);
    assert_eq!(panels.len(), 1);
    assert_eq!(
        panels[0].dialogue.as_deref(),
        Some("DR. VANCE: It worked. It finally worked.")
    );
}

#[test]
fn dialogue_without_prior_panel_synthesizes_speaker_panel() {
    let panels = parse_script("NOVA\nWho's there?");
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0].description, "NOVA speaking.");
    assert_eq!(panels[0].dialogue.as_deref(), Some("NOVA: Who's there?"));
}

#[test]
fn panels_with_dialogue_never_merge() {
    let script = "A quiet street.\n\nNOVA\nHello.\n\nAnother quiet street.\n\nA third street.";
    let panels = parse_script(script);
    // First panel keeps its dialogue; the two silent trailing panels merge.
    assert_eq!(panels.len(), 2);
    assert!(panels[0].has_dialogue());
    assert!(panels[1].description.contains("Another quiet street."));
    assert!(panels[1].description.contains("A third street."));
}

#[test]
fn consecutive_cues_stack_on_the_same_panel() {
    let script = "INT. DINER - DAY\n\nNOVA\nCoffee?\n\nREX\nAlways.";
    let panels = parse_script(script);
    assert_eq!(panels.len(), 1);
    assert_eq!(
        panels[0].dialogue.as_deref(),
        Some("NOVA: Coffee?\nREX: Always.")
    );
}

#[test]
fn plan_cycles_parsed_panels_to_requested_count() {
    let parsed = vec![
        Panel::from_description("one"),
        Panel::from_description("two"),
        Panel::from_description("three"),
    ];
    let plan = PanelPlan::new(&parsed, 2, 4).unwrap();
    assert_eq!(plan.total(), 8);
    for (i, planned) in plan.panels().iter().enumerate() {
        assert_eq!(planned.panel, parsed[i % parsed.len()]);
        assert_eq!(planned.page, i / 4);
        assert_eq!(planned.slot, i % 4);
    }
}

#[test]
fn end_to_end_alley_scene() {
    let script = "EXT. ALLEY - NIGHT\nA figure walks.\n\nNOVA\nHello.";
    let panels = parse_script(script);
    let plan = PanelPlan::new(&panels, 1, 1).unwrap();
    assert_eq!(plan.total(), 1);
    let panel = &plan.panels()[0].panel;
    assert!(panel.description.contains("A figure walks."));
    assert_eq!(panel.dialogue.as_deref(), Some("NOVA: Hello."));
}
