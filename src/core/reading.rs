//! Rule-based reading: narration of the spread, tone from the drawn cards,
//! one advice block picked from keywords in the question. Pure functions only.

use crate::domain::model::{Draw, Language, Spread};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Sun,
    Star,
    Wheel,
    Tower,
    Death,
    Devil,
    Justice,
}

impl Tone {
    /// Evaluation order, also the order phrases appear in.
    pub const ORDER: [Tone; 7] = [
        Self::Sun,
        Self::Star,
        Self::Wheel,
        Self::Tower,
        Self::Death,
        Self::Devil,
        Self::Justice,
    ];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Sun => &["soleil", "sun"],
            Self::Star => &["étoile", "star"],
            Self::Wheel => &["roue", "wheel"],
            Self::Tower => &["tour", "tower"],
            Self::Death => &["mort", "death"],
            Self::Devil => &["diable", "devil"],
            Self::Justice => &["justice"],
        }
    }

    pub fn phrase(self, lang: Language) -> &'static str {
        match (self, lang) {
            (Self::Sun, Language::Fr) => "fort potentiel de clarté, de réussite et de vitalité",
            (Self::Sun, Language::En) => "strong potential for clarity, success and vitality",
            (Self::Star, Language::Fr) => "bonne protection et regain d’espoir",
            (Self::Star, Language::En) => "good protection and renewed hope",
            (Self::Wheel, Language::Fr) => "période de tournant, cycles qui basculent",
            (Self::Wheel, Language::En) => "a turning point, cycles shifting",
            (Self::Tower, Language::Fr) => {
                "nécessité d’accepter une rupture/libération pour repartir sainement"
            }
            (Self::Tower, Language::En) => "accept a rupture/release to rebuild cleanly",
            (Self::Death, Language::Fr) => "transformation inévitable, mue salutaire",
            (Self::Death, Language::En) => "inevitable transformation, a salutary shedding",
            (Self::Devil, Language::Fr) => "attention aux attachements/peurs matérialistes",
            (Self::Devil, Language::En) => "beware of attachments/material fears",
            (Self::Justice, Language::Fr) => "recherche d’équilibre et de décisions justes",
            (Self::Justice, Language::En) => "seek balance and fair decisions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceDomain {
    Love,
    Work,
    Money,
    Energy,
}

impl AdviceDomain {
    /// First match in this order wins, wherever the keyword sits in the question.
    pub const PRIORITY: [AdviceDomain; 4] = [Self::Love, Self::Work, Self::Money, Self::Energy];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Love => &["amour", "relation", "sentiment", "love", "relationship"],
            Self::Work => &["travail", "carrière", "projet", "work", "career", "project"],
            Self::Money => &["argent", "finance", "money"],
            Self::Energy => &["santé", "energie", "énergie", "health", "energy"],
        }
    }

    pub fn advice(self, lang: Language) -> &'static str {
        match (self, lang) {
            (Self::Love, Language::Fr) => "Conseil amour → Reste honnête sur tes besoins, avance par petits pas cohérents. Si une rupture se profile, cherche l’alignement plutôt que la lutte.",
            (Self::Love, Language::En) => "Love tip → Be honest about your needs; take small consistent steps. If a breakup looms, aim for alignment rather than struggle.",
            (Self::Work, Language::Fr) => "Conseil pro → Clarifie l’objectif, pose un plan simple (3 étapes) et garde une marge d’adaptation si la Roue indique un tournant.",
            (Self::Work, Language::En) => "Work tip → Clarify the goal, draft a simple 3-step plan, keep flexibility if the Wheel signals a turn.",
            (Self::Money, Language::Fr) => "Conseil finances → Privilégie la sobriété sur 4–6 semaines, puis réévalue. Justice invite à des choix rationnels.",
            (Self::Money, Language::En) => "Finance tip → Favour frugality for 4–6 weeks, then reassess. Justice invites rational choices.",
            (Self::Energy, Language::Fr) => "Conseil énergie → Écoute le rythme ; Soleil/Étoile favorisent la récupération, Diable/Tour invitent à lever une habitude qui épuise.",
            (Self::Energy, Language::En) => "Energy tip → Listen to your pace; Sun/Star help recovery, Devil/Tower suggest dropping a draining habit.",
        }
    }
}

/// Rendered reading plus what the rules matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    pub text: String,
    pub tones: Vec<Tone>,
    pub advice: Option<AdviceDomain>,
}

pub fn welcome(lang: Language) -> &'static str {
    match lang {
        Language::Fr => {
            "Bienvenue 👋 Pose ta question. Voici une première lecture basée sur tes cartes :"
        }
        Language::En => "Welcome 👋 Ask your question. Here is a first reading based on your cards:",
    }
}

pub fn disclaimer(lang: Language) -> &'static str {
    match lang {
        Language::Fr => {
            "⚠️ Guidance symbolique — ne remplace pas un avis médical, financier ou juridique."
        }
        Language::En => {
            "⚠️ Symbolic guidance — not a substitute for medical, financial or legal advice."
        }
    }
}

pub fn no_cards_message(lang: Language) -> &'static str {
    match lang {
        Language::Fr => "Aucune carte tirée pour l’instant.",
        Language::En => "No cards drawn yet.",
    }
}

fn orientation_label(reversed: bool, lang: Language) -> &'static str {
    match (reversed, lang) {
        (false, Language::Fr) => "Droite",
        (true, Language::Fr) => "Inversée",
        (false, Language::En) => "Upright",
        (true, Language::En) => "Reversed",
    }
}

/// Spread header followed by one line per position.
pub fn base_reading(spread: &Spread, lang: Language) -> String {
    let mut lines = vec![spread.size().header(lang).to_string()];
    for (label, drawn) in spread.positions(lang) {
        let meaning = drawn.meaning();
        let tail = if meaning.is_empty() {
            ".".to_string()
        } else {
            format!(" : {}.", meaning)
        };
        lines.push(format!(
            "• {} — {} ({}){}",
            label,
            drawn.card.name,
            orientation_label(drawn.reversed, lang),
            tail
        ));
    }
    lines.join("\n")
}

pub fn detect_tones(draw: &Draw) -> Vec<Tone> {
    let names: Vec<String> = draw
        .cards()
        .iter()
        .map(|drawn| drawn.card.name.to_lowercase())
        .collect();

    Tone::ORDER
        .into_iter()
        .filter(|tone| {
            names
                .iter()
                .any(|name| tone.keywords().iter().any(|kw| name.contains(kw)))
        })
        .collect()
}

pub fn tone_sentence(tones: &[Tone], lang: Language) -> Option<String> {
    if tones.is_empty() {
        return None;
    }
    let (title, separator) = match lang {
        Language::Fr => ("Tonalité du tirage → ", " ; "),
        Language::En => ("Reading tone → ", "; "),
    };
    let phrases: Vec<&str> = tones.iter().map(|tone| tone.phrase(lang)).collect();
    Some(format!("{}{}.", title, phrases.join(separator)))
}

/// French and English keywords are both checked whatever the reading language.
pub fn select_advice(question: &str) -> Option<AdviceDomain> {
    let question = question.trim().to_lowercase();
    if question.is_empty() {
        return None;
    }
    AdviceDomain::PRIORITY
        .into_iter()
        .find(|domain| domain.keywords().iter().any(|kw| question.contains(kw)))
}

/// Reading for an optional spread; without cards only the advice tail applies.
pub fn compose(spread: Option<&Spread>, question: &str, lang: Language) -> Reading {
    let (base, tones) = match spread {
        Some(spread) => (base_reading(spread, lang), detect_tones(spread.draw())),
        None => (no_cards_message(lang).to_string(), Vec::new()),
    };
    let advice = select_advice(question);

    let mut sections = vec![base];
    if let Some(sentence) = tone_sentence(&tones, lang) {
        sections.push(sentence);
    }
    if let Some(domain) = advice {
        sections.push(domain.advice(lang).to_string());
    }

    Reading {
        text: sections.join("\n\n"),
        tones,
        advice,
    }
}

pub fn render(spread: &Spread, question: &str, lang: Language) -> String {
    compose(Some(spread), question, lang).text
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Guide,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            ChatRole::Guide => f.write_str(&self.content),
            ChatRole::User => write!(f, "> {}", self.content),
        }
    }
}

/// Free chat: welcome + base reading, then one rule-based reply per question.
#[derive(Debug, Clone)]
pub struct ChatTranscript {
    lang: Language,
    spread: Option<Spread>,
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    pub fn open(spread: Option<Spread>, lang: Language) -> Self {
        let opening = match &spread {
            Some(spread) => base_reading(spread, lang),
            None => no_cards_message(lang).to_string(),
        };
        Self {
            lang,
            spread,
            messages: vec![
                ChatMessage {
                    role: ChatRole::Guide,
                    content: welcome(lang).to_string(),
                },
                ChatMessage {
                    role: ChatRole::Guide,
                    content: opening,
                },
            ],
        }
    }

    /// Blank questions are ignored.
    pub fn ask(&mut self, question: &str) -> Option<&ChatMessage> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }
        let reply = compose(self.spread.as_ref(), question, self.lang).text;
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: question.to_string(),
        });
        self.messages.push(ChatMessage {
            role: ChatRole::Guide,
            content: reply,
        });
        self.messages.last()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
