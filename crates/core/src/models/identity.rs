use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two booking-capable roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Trainer,
    Trainee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Trainer => "trainer",
            Role::Trainee => "trainee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trainer" => Ok(Role::Trainer),
            "trainee" => Ok(Role::Trainee),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Identity of whoever issued a request, supplied by the auth context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn trainer(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Trainer,
        }
    }

    pub fn trainee(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Trainee,
        }
    }

    pub fn is_trainer(&self) -> bool {
        self.role == Role::Trainer
    }
}

/// Which side of a booking a listing is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Trainer(Uuid),
    Trainee(Uuid),
}

impl Party {
    pub fn id(&self) -> Uuid {
        match self {
            Party::Trainer(id) | Party::Trainee(id) => *id,
        }
    }
}

impl From<Caller> for Party {
    fn from(caller: Caller) -> Self {
        match caller.role {
            Role::Trainer => Party::Trainer(caller.user_id),
            Role::Trainee => Party::Trainee(caller.user_id),
        }
    }
}
