use crate::domain::model::{InterpretationMeta, Language, StructuredInterpretation};

struct PrettyLabels {
    themes: &'static str,
    synthesis: &'static str,
    actions: &'static str,
    tone: &'static str,
}

fn labels(lang: Language) -> PrettyLabels {
    match lang {
        Language::Fr => PrettyLabels {
            themes: "Thèmes",
            synthesis: "Synthèse",
            actions: "Actions (7 jours)",
            tone: "Tonalité",
        },
        Language::En => PrettyLabels {
            themes: "Themes",
            synthesis: "Synthesis",
            actions: "Actions (7 days)",
            tone: "Tone",
        },
    }
}

/// Plain-text rendering of a reading. Same input, same bytes.
pub fn render_pretty(
    parsed: &StructuredInterpretation,
    lang: Language,
    meta: Option<&InterpretationMeta>,
) -> String {
    let labels = labels(lang);
    let mut lines = vec![parsed.overview.clone(), String::new()];

    for position in &parsed.positions {
        lines.push(format!(
            "• {} — {}\n  {}: {}\n  + {}\n  ! {}",
            position.label,
            position.card,
            labels.themes,
            position.key_themes.join(", "),
            position.opportunities,
            position.cautions
        ));
    }

    lines.push(String::new());
    lines.push(format!("{}: {}", labels.synthesis, parsed.synthesis));
    let actions: Vec<String> = parsed
        .actions_next_7_days
        .iter()
        .map(|action| format!("- {}", action))
        .collect();
    lines.push(format!("{}: {}", labels.actions, actions.join("\n")));
    lines.push(format!("{}: {}", labels.tone, parsed.tone));

    if let Some(InterpretationMeta {
        mode,
        reason: Some(reason),
    }) = meta
    {
        lines.push(String::new());
        lines.push(format!("[mode: {} — {}]", mode.as_str(), reason));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PositionReading;

    fn sample() -> StructuredInterpretation {
        StructuredInterpretation {
            overview: "Overview.".to_string(),
            positions: vec![PositionReading {
                label: "Past".to_string(),
                card: "Le Mat (0)".to_string(),
                key_themes: vec!["start".to_string(), "faith".to_string()],
                opportunities: "Leap".to_string(),
                cautions: "Look first".to_string(),
            }],
            synthesis: "Go.".to_string(),
            actions_next_7_days: vec!["one".to_string(), "two".to_string()],
            tone: "calm".to_string(),
        }
    }

    #[test]
    fn test_render_layout() {
        let text = render_pretty(&sample(), Language::En, None);
        assert_eq!(
            text,
            "Overview.\n\
             \n\
             • Past — Le Mat (0)\n  Themes: start, faith\n  + Leap\n  ! Look first\n\
             \n\
             Synthesis: Go.\n\
             Actions (7 days): - one\n- two\n\
             Tone: calm"
        );
    }

    #[test]
    fn test_render_is_byte_stable() {
        let meta = InterpretationMeta::demo(Some("missing API key".to_string()));
        let first = render_pretty(&sample(), Language::Fr, Some(&meta));
        let second = render_pretty(&sample(), Language::Fr, Some(&meta));
        assert_eq!(first, second);
        assert!(first.ends_with("\n\n[mode: demo — missing API key]"));
        assert!(first.contains("Synthèse: Go."));
    }

    #[test]
    fn test_meta_without_reason_adds_nothing() {
        let meta = InterpretationMeta::live();
        assert_eq!(
            render_pretty(&sample(), Language::Fr, Some(&meta)),
            render_pretty(&sample(), Language::Fr, None)
        );
    }

    #[test]
    fn test_empty_reading_still_renders_every_section() {
        let text = render_pretty(&StructuredInterpretation::default(), Language::Fr, None);
        assert_eq!(text, "\n\n\nSynthèse: \nActions (7 jours): \nTonalité: ");
    }
}
