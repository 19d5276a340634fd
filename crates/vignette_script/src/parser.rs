//! Heuristic screenplay-to-panel parser.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use vignette_core::Panel;

static SCENE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(INT\.|EXT\.|INT\./EXT\.|I/E\.)").unwrap());

static TRANSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(FADE IN:?|FADE OUT\.?|FADE TO BLACK\.?|CUT TO:|DISSOLVE TO:)\s*$").unwrap()
});

static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").unwrap());

/// Convert a block of free text into an ordered panel sequence.
///
/// Blocks are separated by blank lines and classified by loose screenplay
/// conventions:
///
/// - `FADE IN:` / `FADE OUT.` and similar transition lines are discarded.
/// - A block starting with a scene-heading marker (`INT.`, `EXT.`) becomes a
///   description-only establishing panel.
/// - A block whose first line is entirely capitalized is read as a character
///   cue: parenthetical notes such as `(CONT'D)` are stripped from the name,
///   and the remaining lines become dialogue attached to the most recent
///   panel (a `"NAME speaking."` panel is synthesized if none exists yet).
///   Dialogue never starts a new panel.
/// - Every other block becomes a description-only panel.
///
/// Adjacent panels that both lack dialogue are then merged, so a continuous
/// scene does not fragment into many near-empty panels. A panel with
/// dialogue never merges with its neighbors.
///
/// If nothing parses into recognizable structure, the entire input is
/// returned as a single panel. The function is pure: same text in, same
/// panel sequence out.
///
/// Note that the character-cue heuristic is exactly that: a short all-caps
/// action line such as `BOOM!` is indistinguishable from a cue. A cue with
/// no following dialogue lines falls back to a description panel, which
/// covers the common cases but is not a guaranteed-correct classifier.
///
/// # Examples
///
/// ```
/// use vignette_script::parse_script;
///
/// let panels = parse_script("EXT. ALLEY - NIGHT\nA figure walks.\n\nNOVA\nHello.");
/// assert_eq!(panels.len(), 1);
/// assert_eq!(panels[0].dialogue.as_deref(), Some("NOVA: Hello."));
/// ```
pub fn parse_script(text: &str) -> Vec<Panel> {
    let mut panels: Vec<Panel> = Vec::new();

    for block in split_blocks(text) {
        let lines: Vec<&str> = block
            .iter()
            .copied()
            .filter(|line| !TRANSITION.is_match(line))
            .collect();
        let Some(first) = lines.first() else {
            continue;
        };

        if SCENE_HEADING.is_match(first) {
            panels.push(Panel::from_description(lines.join(" ")));
        } else if is_character_cue(first) {
            let name = PARENTHETICAL.replace_all(first, "").trim().to_string();
            let dialogue: Vec<&str> = lines[1..]
                .iter()
                .copied()
                .filter(|line| !is_parenthetical_note(line))
                .collect();

            if name.is_empty() || dialogue.is_empty() {
                // All-caps action text, not a cue after all.
                panels.push(Panel::from_description(lines.join(" ")));
                continue;
            }

            let spoken = format!("{}: {}", name, dialogue.join(" "));
            match panels.last_mut() {
                Some(panel) => match &mut panel.dialogue {
                    Some(existing) => {
                        existing.push('\n');
                        existing.push_str(&spoken);
                    }
                    None => panel.dialogue = Some(spoken),
                },
                None => {
                    let mut panel = Panel::from_description(format!("{} speaking.", name));
                    panel.dialogue = Some(spoken);
                    panels.push(panel);
                }
            }
        } else {
            panels.push(Panel::from_description(lines.join(" ")));
        }
    }

    let panels = merge_silent_neighbors(panels);

    if panels.is_empty() {
        debug!("No recognizable screenplay structure; returning input as one panel");
        return vec![Panel::from_description(text)];
    }

    panels
}

/// Split input into blocks of trimmed non-empty lines, separated by blank
/// lines.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Character-cue heuristic: every alphabetic character on the line is
/// uppercase, and there is at least one.
fn is_character_cue(line: &str) -> bool {
    let mut has_alpha = false;
    for c in line.chars() {
        if c.is_alphabetic() {
            has_alpha = true;
            if c.is_lowercase() {
                return false;
            }
        }
    }
    has_alpha
}

/// A dialogue line that is purely a director note, e.g. `(beat)`.
fn is_parenthetical_note(line: &str) -> bool {
    line.starts_with('(') && line.ends_with(')')
}

/// Merge adjacent panels that both lack dialogue by concatenating their
/// descriptions.
fn merge_silent_neighbors(panels: Vec<Panel>) -> Vec<Panel> {
    let mut merged: Vec<Panel> = Vec::new();
    for panel in panels {
        match merged.last_mut() {
            Some(prev) if !prev.has_dialogue() && !panel.has_dialogue() => {
                prev.description.push(' ');
                prev.description.push_str(&panel.description);
            }
            _ => merged.push(panel),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_heading_detected() {
        assert!(SCENE_HEADING.is_match("EXT. ALLEY - NIGHT"));
        assert!(SCENE_HEADING.is_match("INT. LAB - DAY"));
        assert!(!SCENE_HEADING.is_match("INTERIOR DESIGN"));
    }

    #[test]
    fn cue_heuristic_accepts_punctuation() {
        assert!(is_character_cue("NOVA (CONT'D)"));
        assert!(is_character_cue("DR. VANCE"));
        assert!(!is_character_cue("Nova"));
        assert!(!is_character_cue("..."));
    }

    #[test]
    fn transitions_are_discarded() {
        let panels = parse_script("FADE IN:\n\nEXT. ROOF - DAY\nWind howls.\n\nFADE OUT.");
        assert_eq!(panels.len(), 1);
        assert!(!panels[0].description.contains("FADE"));
    }

    #[test]
    fn parenthetical_stripped_from_name() {
        let panels = parse_script("A hallway.\n\nNOVA (CONT'D)\n(whispering)\nIt's here.");
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].dialogue.as_deref(), Some("NOVA: It's here."));
    }

    #[test]
    fn all_caps_action_falls_back_to_description() {
        let panels = parse_script("The door splinters.\n\nBOOM!");
        assert_eq!(panels.len(), 1);
        assert!(panels[0].description.contains("BOOM!"));
    }
}
