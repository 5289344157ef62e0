//! Citizen cards, identified by their card number

use crate::core::entity::RecordId;
use crate::impl_resource;

impl_resource!(
    CitizenCard,
    "citizen_card",
    "/citizen-cards",
    card_number: String,
    {
        /// Owning member; absent while the card is unbound
        member_id: Option<RecordId>,
        holder_name: Option<String>,
        card_type: Option<String>,
        status: Option<String>,
    }
);

impl CitizenCard {
    pub fn is_bound(&self) -> bool {
        self.member_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Resource;
    use serde_json::json;

    #[test]
    fn test_card_identity_and_binding() {
        let card: CitizenCard = serde_json::from_value(json!({
            "cardNumber": "A123456789",
            "memberId": null,
            "cardType": "一般卡"
        }))
        .unwrap();

        assert_eq!(card.id(), "A123456789");
        assert!(!card.is_bound());
        assert_eq!(
            CitizenCard::item_path("/citizen-cards", &card.id()),
            "/citizen-cards/A123456789"
        );
    }
}
