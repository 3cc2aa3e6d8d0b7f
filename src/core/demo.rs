use crate::domain::model::{
    CardInput, Language, PositionReading, SpreadSize, StructuredInterpretation,
};

struct CannedText {
    overview: &'static str,
    themes: [&'static str; 2],
    opportunities: &'static str,
    cautions: &'static str,
    synthesis: &'static str,
    actions: [&'static str; 3],
    tone: &'static str,
}

const CANNED_FR: CannedText = CannedText {
    overview: "Lecture illustrative (mode démo).",
    themes: ["exemple", "démo"],
    opportunities: "Piste positive à explorer.",
    cautions: "Point de vigilance.",
    synthesis: "Focus sur l’alignement et des pas réguliers.",
    actions: ["noter une intention", "clarifier un objectif", "petit pas concret"],
    tone: "équilibrée",
};

const CANNED_EN: CannedText = CannedText {
    overview: "Illustrative reading (demo mode).",
    themes: ["example", "demo"],
    opportunities: "Positive angle to explore.",
    cautions: "Point of caution.",
    synthesis: "Focus on alignment and steady steps.",
    actions: ["write one intention", "clarify one goal", "small concrete step"],
    tone: "balanced",
};

fn placeholder_card(lang: Language, position: usize) -> String {
    match lang {
        Language::Fr => format!("Carte {}", position + 1),
        Language::En => format!("Card {}", position + 1),
    }
}

/// Static reading built from the request's card names only. Shared by demo
/// mode and every fallback path, so both always produce the same payload.
pub fn canned_interpretation(
    cards: &[CardInput],
    spread: SpreadSize,
    lang: Language,
) -> StructuredInterpretation {
    let text = match lang {
        Language::Fr => &CANNED_FR,
        Language::En => &CANNED_EN,
    };

    let positions = (0..spread.count())
        .map(|i| {
            let card = cards
                .get(i)
                .map(|c| c.name.trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| placeholder_card(lang, i));
            PositionReading {
                label: spread.label(lang, i),
                card,
                key_themes: text.themes.iter().map(|t| t.to_string()).collect(),
                opportunities: text.opportunities.to_string(),
                cautions: text.cautions.to_string(),
            }
        })
        .collect();

    StructuredInterpretation {
        overview: text.overview.to_string(),
        positions,
        synthesis: text.synthesis.to_string(),
        actions_next_7_days: text.actions.iter().map(|a| a.to_string()).collect(),
        tone: text.tone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(names: &[&str]) -> Vec<CardInput> {
        names
            .iter()
            .map(|name| CardInput {
                name: name.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_positions_follow_spread() {
        let input = cards(&["Le Mat (0)", "La Lune (XVIII)", "Le Monde (XXI)"]);
        let parsed = canned_interpretation(&input, SpreadSize::Three, Language::Fr);

        assert_eq!(parsed.positions.len(), 3);
        assert_eq!(parsed.positions[0].label, "Passé");
        assert_eq!(parsed.positions[1].card, "La Lune (XVIII)");
        assert_eq!(parsed.positions[2].key_themes, vec!["exemple", "démo"]);
        assert_eq!(parsed.tone, "équilibrée");
    }

    #[test]
    fn test_always_fully_populated() {
        for size in SpreadSize::ALL {
            for lang in [Language::Fr, Language::En] {
                let parsed = canned_interpretation(&[], size, lang);
                assert_eq!(parsed.positions.len(), size.count());
                assert!(!parsed.overview.is_empty());
                assert!(!parsed.synthesis.is_empty());
                assert!(!parsed.tone.is_empty());
                assert_eq!(parsed.actions_next_7_days.len(), 3);
            }
        }
    }

    #[test]
    fn test_missing_names_get_placeholders() {
        let input = cards(&["", "  "]);
        let parsed = canned_interpretation(&input, SpreadSize::One, Language::En);
        assert_eq!(parsed.positions[0].card, "Card 1");
        assert_eq!(parsed.overview, "Illustrative reading (demo mode).");
    }

    #[test]
    fn test_deterministic() {
        let input = cards(&["La Force (VIII)"]);
        assert_eq!(
            canned_interpretation(&input, SpreadSize::One, Language::En),
            canned_interpretation(&input, SpreadSize::One, Language::En)
        );
    }
}
