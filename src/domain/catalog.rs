use crate::domain::model::Card;
use std::sync::Arc;

/// Major Arcana (Rider–Waite–Smith, French names): name, upright, reversed.
const MAJOR_ARCANA: [(&str, &str, &str); 22] = [
    ("Le Mat (0)", "Nouveaux départs, foi", "Imprudence, naïveté"),
    ("Le Magicien (I)", "Volonté, ressources", "Manipulation, illusions"),
    ("La Papesse (II)", "Intuition, mystère", "Secrets, blocage"),
    ("L’Impératrice (III)", "Abondance, soin", "Dépendance, stagnation"),
    ("L’Empereur (IV)", "Structure, autorité", "Rigidité, domination"),
    ("Le Pape (V)", "Tradition, guidance", "Dogmatisme, rébellion"),
    ("Les Amoureux (VI)", "Choix, harmonie", "Dissonance, doute"),
    ("Le Chariot (VII)", "Volonté, progrès", "Dispersion, indécision"),
    ("La Force (VIII)", "Courage, maîtrise", "Insécurité, impulsivité"),
    ("L’Hermite (IX)", "Recherche, sagesse", "Isolement, fuite"),
    ("La Roue de Fortune (X)", "Cycles, tournant", "Résistance au changement"),
    ("La Justice (XI)", "Équité, vérité", "Injustice, déséquilibre"),
    ("Le Pendu (XII)", "Lâcher-prise, regard neuf", "Blocage, stagnation"),
    ("La Mort (XIII)", "Transformation", "Attachement, peur"),
    ("Tempérance (XIV)", "Modération, alchimie", "Excès, impatience"),
    ("Le Diable (XV)", "Attachements, matérialisme", "Libération"),
    ("La Tour (XVI)", "Révélation, rupture", "Retard du nécessaire"),
    ("L’Étoile (XVII)", "Espoir, inspiration", "Doute"),
    ("La Lune (XVIII)", "Rêves, intuition", "Confusion, peur"),
    ("Le Soleil (XIX)", "Joie, clarté", "Arrogance"),
    ("Le Jugement (XX)", "Réveil, bilan", "Auto-critique, hésitation"),
    ("Le Monde (XXI)", "Accomplissement, unité", "Boucle inachevée"),
];

/// Read-only card table, built once at startup and shared.
#[derive(Debug, Clone)]
pub struct Catalog {
    cards: Vec<Card>,
}

impl Catalog {
    pub fn major_arcana() -> Self {
        let cards = MAJOR_ARCANA
            .iter()
            .enumerate()
            .map(|(index, (name, upright, reversed))| Card {
                index,
                name: (*name).to_string(),
                upright_meaning: (*upright).to_string(),
                reversed_meaning: (*reversed).to_string(),
            })
            .collect();
        Self { cards }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::major_arcana())
    }

    /// Custom tables are only used by tests.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.iter().find(|card| card.index == index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::major_arcana()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_major_arcana_has_22_distinct_indices() {
        let catalog = Catalog::major_arcana();
        assert_eq!(catalog.len(), 22);

        let indices: HashSet<usize> = catalog.cards().iter().map(|c| c.index).collect();
        assert_eq!(indices.len(), 22);
        assert!(indices.iter().all(|i| *i < 22));
    }

    #[test]
    fn test_get_by_index() {
        let catalog = Catalog::major_arcana();
        let sun = catalog.get(19).unwrap();
        assert_eq!(sun.name, "Le Soleil (XIX)");
        assert_eq!(sun.upright_meaning, "Joie, clarté");
        assert_eq!(sun.reversed_meaning, "Arrogance");
        assert!(catalog.get(22).is_none());
    }
}
