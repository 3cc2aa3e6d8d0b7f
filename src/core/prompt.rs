use crate::domain::model::{CardInput, Language, PromptCard, SpreadSize};
use crate::domain::ports::ModelPrompt;
use crate::utils::error::Result;

pub fn system_instruction(lang: Language) -> &'static str {
    match lang {
        Language::En => "You are a professional tarot reader. Produce a careful, ethical, structured analysis. NEVER give medical/financial/legal advice.",
        Language::Fr => "Tu es un(e) tarologue professionnel(le). Donne une analyse structurée et prudente. NE FOURNIS PAS de conseils médicaux/financiers/juridiques.",
    }
}

const RESPONSE_SHAPE: &str = "Please answer STRICTLY as a JSON object with keys: overview (string), positions (array[{label,card,keyThemes[],opportunities,cautions}]), synthesis (string), actions_7days (array[string]), tone (string).";

pub fn prompt_cards(cards: &[CardInput]) -> Vec<PromptCard> {
    cards.iter().map(PromptCard::from).collect()
}

/// Both meanings of every card are always sent, whatever the orientation.
pub fn build_prompt(
    cards: &[PromptCard],
    question: &str,
    lang: Language,
    spread: SpreadSize,
) -> Result<ModelPrompt> {
    let cards_json = serde_json::to_string(cards)?;
    let question = match question.trim() {
        "" => "(none)",
        q => q,
    };
    let user = format!(
        "Cards: {}; Question: {}; Language: {}; Spread: {}. {}",
        cards_json,
        question,
        lang.code(),
        spread.count(),
        RESPONSE_SHAPE
    );

    Ok(ModelPrompt {
        system: system_instruction(lang).to_string(),
        user,
    })
}
