use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    Monthly,
    Quarterly,
    Yearly,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Blocked => "blocked",
        }
    }
}

impl SubscriptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionType::Monthly => "monthly",
            SubscriptionType::Quarterly => "quarterly",
            SubscriptionType::Yearly => "yearly",
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(anyhow::anyhow!("unknown role '{other}'")),
        }
    }
}

impl FromStr for AccountStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "blocked" => Ok(AccountStatus::Blocked),
            other => Err(anyhow::anyhow!("unknown account status '{other}'")),
        }
    }
}

impl FromStr for SubscriptionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(SubscriptionType::Monthly),
            "quarterly" => Ok(SubscriptionType::Quarterly),
            "yearly" => Ok(SubscriptionType::Yearly),
            other => Err(anyhow::anyhow!("unknown subscription type '{other}'")),
        }
    }
}

/// A persisted user account. `password_hash` never leaves the server;
/// use [`PublicAccount`] for anything sent to a client.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
    pub subscription: Subscription,
    /// Lifetime counter. Never reset automatically.
    pub download_count: i32,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscription {
    pub is_subscribed: bool,
    pub subscription_type: Option<SubscriptionType>,
    pub subscription_expiry: Option<DateTime<Utc>>,
}

/// Fields supplied at signup. The hash is computed before this is built.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl Account {
    pub fn is_blocked(&self) -> bool {
        self.status == AccountStatus::Blocked
    }
}

/// Client-facing projection of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub is_subscribed: bool,
    pub subscription_type: Option<SubscriptionType>,
    pub subscription_expiry: Option<DateTime<Utc>>,
    pub download_count: i32,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for PublicAccount {
    fn from(account: &Account) -> Self {
        PublicAccount {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            role: account.role,
            status: account.status,
            is_subscribed: account.subscription.is_subscribed,
            subscription_type: account.subscription.subscription_type,
            subscription_expiry: account.subscription.subscription_expiry,
            download_count: account.download_count,
            last_login: account.last_login,
            created_at: account.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_string_round_trip() {
        for role in [Role::User, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        for status in [AccountStatus::Active, AccountStatus::Blocked] {
            assert_eq!(status.as_str().parse::<AccountStatus>().unwrap(), status);
        }
        assert!("superuser".parse::<Role>().is_err());
        assert!("weekly".parse::<SubscriptionType>().is_err());
    }

    #[test]
    fn test_public_projection_omits_hash() {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            role: Role::User,
            status: AccountStatus::Active,
            subscription: Subscription::default(),
            download_count: 1,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(PublicAccount::from(&account)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
        assert_eq!(json["downloadCount"], 1);
        assert_eq!(json["isSubscribed"], false);
    }
}
