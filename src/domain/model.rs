use crate::domain::catalog::Catalog;
use crate::utils::error::{Result, TarotError};
use crate::utils::validation::validate_one_of;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Reading language. Anything that is not `en` reads as French.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("en") {
            Self::En
        } else {
            Self::Fr
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
        }
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 設定層級的運作模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Demo,
    Live,
    #[default]
    Auto,
}

impl Mode {
    pub const NAMES: [&'static str; 3] = ["demo", "live", "auto"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Live => "live",
            Self::Auto => "auto",
        }
    }
}

impl FromStr for Mode {
    type Err = TarotError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        validate_one_of("mode", &name, &Self::NAMES)?;
        Ok(match name.as_str() {
            "demo" => Self::Demo,
            "live" => Self::Live,
            _ => Self::Auto,
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path actually produced an interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedMode {
    Demo,
    Live,
}

impl ResolvedMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Live => "live",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub index: usize,
    pub name: String,
    #[serde(rename = "up")]
    pub upright_meaning: String,
    #[serde(rename = "rev")]
    pub reversed_meaning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawnCard {
    #[serde(flatten)]
    pub card: Card,
    pub reversed: bool,
}

impl DrawnCard {
    pub fn upright(card: Card) -> Self {
        Self {
            card,
            reversed: false,
        }
    }

    /// Meaning matching the card's orientation.
    pub fn meaning(&self) -> &str {
        if self.reversed {
            &self.card.reversed_meaning
        } else {
            &self.card.upright_meaning
        }
    }
}

/// Cards picked for one reading, in draw order, without repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Draw {
    cards: Vec<DrawnCard>,
}

impl Draw {
    pub fn new(cards: Vec<DrawnCard>) -> Result<Self> {
        let mut seen = HashSet::new();
        for drawn in &cards {
            if !seen.insert(drawn.card.index) {
                return Err(TarotError::invalid_request(format!(
                    "card {} appears twice in the draw",
                    drawn.card.index
                )));
            }
        }
        Ok(Self { cards })
    }

    /// Draw from explicit `(index, reversed)` picks.
    pub fn from_catalog_indices(catalog: &Catalog, picks: &[(usize, bool)]) -> Result<Self> {
        let cards = picks
            .iter()
            .map(|&(index, reversed)| {
                catalog
                    .get(index)
                    .map(|card| DrawnCard {
                        card: card.clone(),
                        reversed,
                    })
                    .ok_or_else(|| {
                        TarotError::invalid_request(format!("unknown card index {}", index))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(cards)
    }

    pub fn cards(&self) -> &[DrawnCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Spread sizes offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpreadSize {
    One,
    Three,
    Five,
}

const LABELS_1_FR: [&str; 1] = ["Message clé"];
const LABELS_1_EN: [&str; 1] = ["Key message"];
const LABELS_3_FR: [&str; 3] = ["Passé", "Présent", "Futur"];
const LABELS_3_EN: [&str; 3] = ["Past", "Present", "Future"];
const LABELS_5_FR: [&str; 5] = ["Contexte", "Défi", "Conseil", "Influences", "Issue probable"];
const LABELS_5_EN: [&str; 5] = ["Context", "Challenge", "Advice", "Influences", "Likely outcome"];

impl SpreadSize {
    pub const ALL: [SpreadSize; 3] = [Self::One, Self::Three, Self::Five];

    pub fn count(self) -> usize {
        match self {
            Self::One => 1,
            Self::Three => 3,
            Self::Five => 5,
        }
    }

    /// Clamp an arbitrary count to [1, 5], then round down to a supported size.
    pub fn clamp(count: usize) -> Self {
        match count {
            0..=2 => Self::One,
            3 | 4 => Self::Three,
            _ => Self::Five,
        }
    }

    pub fn labels(self, lang: Language) -> &'static [&'static str] {
        match (self, lang) {
            (Self::One, Language::Fr) => &LABELS_1_FR,
            (Self::One, Language::En) => &LABELS_1_EN,
            (Self::Three, Language::Fr) => &LABELS_3_FR,
            (Self::Three, Language::En) => &LABELS_3_EN,
            (Self::Five, Language::Fr) => &LABELS_5_FR,
            (Self::Five, Language::En) => &LABELS_5_EN,
        }
    }

    /// Positional label, `Carte n` / `Card n` past the end of the table.
    pub fn label(self, lang: Language, position: usize) -> String {
        match self.labels(lang).get(position) {
            Some(label) => (*label).to_string(),
            None => match lang {
                Language::Fr => format!("Carte {}", position + 1),
                Language::En => format!("Card {}", position + 1),
            },
        }
    }

    pub fn header(self, lang: Language) -> &'static str {
        match (self, lang) {
            (Self::One, Language::Fr) => "Message :",
            (Self::One, Language::En) => "Message:",
            (Self::Three, Language::Fr) => "Passé — Présent — Futur :",
            (Self::Three, Language::En) => "Past — Present — Future:",
            (Self::Five, Language::Fr) => "Lecture en croix simple :",
            (Self::Five, Language::En) => "Simple cross reading:",
        }
    }
}

impl TryFrom<usize> for SpreadSize {
    type Error = TarotError;

    fn try_from(count: usize) -> Result<Self> {
        match count {
            1 => Ok(Self::One),
            3 => Ok(Self::Three),
            5 => Ok(Self::Five),
            other => Err(TarotError::invalid_request(format!(
                "spread size must be 1, 3 or 5 (got {})",
                other
            ))),
        }
    }
}

impl Serialize for SpreadSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.count() as u64)
    }
}

/// A draw laid out on a spread: one label per card, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spread {
    size: SpreadSize,
    draw: Draw,
}

impl Spread {
    pub fn new(size: SpreadSize, draw: Draw) -> Result<Self> {
        if draw.len() != size.count() {
            return Err(TarotError::invalid_request(format!(
                "spread of {} needs {} cards, got {}",
                size.count(),
                size.count(),
                draw.len()
            )));
        }
        Ok(Self { size, draw })
    }

    pub fn size(&self) -> SpreadSize {
        self.size
    }

    pub fn draw(&self) -> &Draw {
        &self.draw
    }

    pub fn positions(&self, lang: Language) -> Vec<(String, &DrawnCard)> {
        self.draw
            .cards()
            .iter()
            .enumerate()
            .map(|(i, drawn)| (self.size.label(lang, i), drawn))
            .collect()
    }
}

/// Reads a client field, falling back to its default on `null` or a wrong type.
pub fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Card as sent by the client in premium and feedback requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardInput {
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub up: String,
    #[serde(deserialize_with = "lenient")]
    pub rev: String,
}

impl From<&DrawnCard> for CardInput {
    fn from(drawn: &DrawnCard) -> Self {
        Self {
            name: drawn.card.name.clone(),
            up: drawn.card.upright_meaning.clone(),
            rev: drawn.card.reversed_meaning.clone(),
        }
    }
}

/// Card shape handed to the model: both meanings, whatever the orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptCard {
    pub name: String,
    pub upright: String,
    pub reversed: String,
}

impl From<&CardInput> for PromptCard {
    fn from(card: &CardInput) -> Self {
        Self {
            name: card.name.clone(),
            upright: card.up.clone(),
            reversed: card.rev.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReadingRequest {
    #[serde(deserialize_with = "lenient")]
    pub cards: Vec<CardInput>,
    #[serde(deserialize_with = "lenient")]
    pub question: String,
    #[serde(deserialize_with = "lenient")]
    pub lang: Language,
    #[serde(deserialize_with = "lenient")]
    pub consent: bool,
}

impl ReadingRequest {
    pub fn spread_size(&self) -> SpreadSize {
        SpreadSize::clamp(self.cards.len())
    }

    /// Cards that fit the spread; extra cards are dropped.
    pub fn spread_cards(&self) -> &[CardInput] {
        let take = self.spread_size().count().min(self.cards.len());
        &self.cards[..take]
    }

    /// Submitted cards that do not fit the 1, 3 or 5 card spread.
    pub fn dropped_cards(&self) -> usize {
        self.cards.len() - self.spread_cards().len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionReading {
    pub label: String,
    pub card: String,
    #[serde(rename = "keyThemes", alias = "key_themes")]
    pub key_themes: Vec<String>,
    pub opportunities: String,
    pub cautions: String,
}

/// Premium reading, always fully populated after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredInterpretation {
    pub overview: String,
    pub positions: Vec<PositionReading>,
    pub synthesis: String,
    #[serde(rename = "actions_7days", alias = "actionsNext7Days")]
    pub actions_next_7_days: Vec<String>,
    pub tone: String,
}

impl StructuredInterpretation {
    /// Unparsable model output is kept as the overview.
    pub fn from_raw_text(raw: &str) -> Self {
        Self {
            overview: raw.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationMeta {
    pub mode: ResolvedMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl InterpretationMeta {
    pub fn live() -> Self {
        Self {
            mode: ResolvedMode::Live,
            reason: None,
        }
    }

    pub fn demo(reason: Option<String>) -> Self {
        Self {
            mode: ResolvedMode::Demo,
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    pub parsed: StructuredInterpretation,
    pub pretty: String,
    pub meta: InterpretationMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    /// Only `"up"` counts as an up-vote.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("up") => Self::Up,
            _ => Self::Down,
        }
    }

    pub fn score(self) -> i8 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

/// Thumbs up/down on a premium reading. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedbackRequest {
    #[serde(deserialize_with = "lenient")]
    pub vote: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub question: String,
    #[serde(deserialize_with = "lenient")]
    pub lang: Language,
    pub cards: serde_json::Value,
}

/// One line of `premium_feedback.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub ts: DateTime<Utc>,
    pub vote: i8,
    pub lang: Language,
    pub question: String,
    pub cards: serde_json::Value,
}

/// One line of `premium_logs.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub ts: DateTime<Utc>,
    pub lang: Language,
    pub question: String,
    pub cards: Vec<PromptCard>,
    pub model: String,
    pub parsed: StructuredInterpretation,
}
