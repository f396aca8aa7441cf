use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{PajakError, Result};

/// Roles recognised by the reporting operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Tax Manager")]
    TaxManager,
    #[serde(rename = "Accounts Manager")]
    AccountsManager,
    #[serde(rename = "System Manager")]
    SystemManager,
    #[serde(rename = "Tax User")]
    TaxUser,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TaxManager => "Tax Manager",
            Self::AccountsManager => "Accounts Manager",
            Self::SystemManager => "System Manager",
            Self::TaxUser => "Tax User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mutating operations subject to a role check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GenerateFiling,
    SubmitFiling,
    CancelFiling,
    GeneratePayment,
    GenerateAdjustment,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GenerateFiling => "generate filing",
            Self::SubmitFiling => "submit filing",
            Self::CancelFiling => "cancel filing",
            Self::GeneratePayment => "generate payment",
            Self::GenerateAdjustment => "generate adjustment",
        }
    }

    /// Roles allowed to perform this action.
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Self::GenerateFiling
            | Self::SubmitFiling
            | Self::CancelFiling
            | Self::GenerateAdjustment => &[Role::TaxManager, Role::SystemManager],
            Self::GeneratePayment => &[
                Role::AccountsManager,
                Role::TaxManager,
                Role::SystemManager,
            ],
        }
    }
}

/// The user on whose behalf an operation runs, with roles already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user: String,
    pub roles: Vec<Role>,
}

impl Caller {
    pub fn new(user: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            user: user.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn can(&self, action: Action) -> bool {
        action.allowed_roles().iter().any(|r| self.has_role(*r))
    }
}

/// Fail with [`PajakError::Forbidden`] unless `caller` may perform `action`.
pub fn authorize(caller: &Caller, action: Action) -> Result<()> {
    if caller.can(action) {
        return Ok(());
    }
    tracing::warn!(user = %caller.user, action = action.name(), "operation rejected");
    Err(PajakError::Forbidden {
        user: caller.user.clone(),
        action: action.name(),
    })
}
