//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Visibility status for products and categories.
///
/// Stored as a `SMALLINT` in the database (1 = active, 0 = hidden).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    #[default]
    Active,
    Hidden,
}

impl PublishStatus {
    /// Database representation (1 = active, 0 = hidden).
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::Active => 1,
            Self::Hidden => 0,
        }
    }

    /// Decode the database representation. Any non-zero value is active.
    #[must_use]
    pub const fn from_i16(value: i16) -> Self {
        if value == 0 { Self::Hidden } else { Self::Active }
    }
}

/// Order lifecycle status.
///
/// Orders are created as `Pending` and are immutable thereafter in the
/// current scope; the remaining states exist for the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Shipped => write!(f, "shipped"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular storefront customer.
    #[default]
    Customer,
    /// Full access to the admin panel.
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// User account status.
///
/// Stored as a `SMALLINT` in the database (1 = active, 0 = disabled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Disabled,
}

impl AccountStatus {
    /// Database representation (1 = active, 0 = disabled).
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::Active => 1,
            Self::Disabled => 0,
        }
    }

    /// Decode the database representation. Any non-zero value is active.
    #[must_use]
    pub const fn from_i16(value: i16) -> Self {
        if value == 0 { Self::Disabled } else { Self::Active }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_status_roundtrip() {
        assert_eq!(PublishStatus::from_i16(PublishStatus::Active.as_i16()), PublishStatus::Active);
        assert_eq!(PublishStatus::from_i16(PublishStatus::Hidden.as_i16()), PublishStatus::Hidden);
        // Legacy rows sometimes carry other non-zero values
        assert_eq!(PublishStatus::from_i16(2), PublishStatus::Active);
    }

    #[test]
    fn test_order_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Cancelled,
        ] {
            let parsed: OrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("unknown".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_user_role_roundtrip() {
        assert_eq!("customer".parse::<UserRole>().unwrap(), UserRole::Customer);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserRole::Customer).unwrap(),
            "\"customer\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
