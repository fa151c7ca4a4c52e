use serde::Deserialize;

/// One credit card attached to the account, as listed by the portal's
/// card dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Card {
    /// Opaque key the card-switch endpoint expects.
    #[serde(rename = "cardIdentifyKey")]
    pub identify_key: String,
    #[serde(rename = "cardName")]
    pub display_name: String,
}

/// The account's cards in the portal's listing order. Built once per session
/// after login and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDirectory {
    cards: Vec<Card>,
}

impl CardDirectory {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn display_name(&self, identify_key: &str) -> Option<&str> {
        self.cards
            .iter()
            .find(|c| c.identify_key == identify_key)
            .map(|c| c.display_name.as_str())
    }
}
