use serde::{Deserialize, Serialize};

/// Intent labels that show the conversation is already anchored on a
/// concrete product (price, measurements, size, stock, the item itself).
const ANCHORING_INTENT_HINTS: &[&str] = &[
    "price", "precio", "measure", "medida", "size", "talla", "product", "producto", "stock",
    "disponib", "color",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub text: String,
}

impl ConversationTurn {
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            text: text.into(),
        }
    }
}

/// Read-only view of the conversation state that the interpreters consult.
/// Owned by the caller; nothing in this crate mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversationSnapshot {
    pub product_interest: Option<String>,
    pub requested_size: Option<String>,
    pub referenced_item: Option<String>,
    pub last_intent: Option<String>,
    pub recent_turns: Vec<ConversationTurn>,
}

impl ConversationSnapshot {
    /// True when prior turns already tie the user to a product: an explicit
    /// product, a requested size, a referenced item, or a last intent about
    /// price, measurements or similar.
    #[must_use]
    pub fn has_anchored_interest(&self) -> bool {
        if [
            &self.product_interest,
            &self.requested_size,
            &self.referenced_item,
        ]
        .into_iter()
        .any(|field| non_blank(field.as_deref()).is_some())
        {
            return true;
        }
        self.last_intent.as_deref().is_some_and(|intent| {
            let intent = intent.to_lowercase();
            ANCHORING_INTENT_HINTS
                .iter()
                .any(|hint| intent.contains(hint))
        })
    }

    /// First of product interest, requested size, referenced item.
    #[must_use]
    pub fn product_hint(&self) -> Option<String> {
        non_blank(self.product_interest.as_deref())
            .or_else(|| non_blank(self.requested_size.as_deref()))
            .or_else(|| non_blank(self.referenced_item.as_deref()))
            .map(ToString::to_string)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
