//! Member accounts

use crate::core::entity::RecordId;
use crate::impl_resource;

impl_resource!(
    /// A registered member as seen by the admin console
    Member,
    "member",
    "/members",
    member_id: RecordId,
    {
        email: String,
        phone: Option<String>,
        /// `admin` or `user`
        role: Option<String>,
        is_verified: bool,
        is_active: bool,
        status: Option<String>,
    }
);

impl Member {
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Resource;
    use serde_json::json;

    #[test]
    fn test_member_from_wire() {
        let member: Member = serde_json::from_value(json!({
            "memberId": 3,
            "email": "someone@example.com",
            "role": "admin",
            "isVerified": true,
            "nickname": "kiki"
        }))
        .unwrap();

        assert_eq!(member.id(), RecordId::from(3));
        assert!(member.is_verified);
        assert!(!member.is_active);
        assert!(member.has_role("admin"));
        assert_eq!(member.extra_field("nickname"), Some(&json!("kiki")));

        let back = serde_json::to_value(&member).unwrap();
        assert_eq!(back["nickname"], json!("kiki"));
        assert_eq!(back["isVerified"], json!(true));
    }
}
