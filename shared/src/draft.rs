//! The serializable organization draft and the typed field addressing used
//! to edit it.

use std::{fmt, str::FromStr};

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// Postal address, used by the organization and by every branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Street line.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub pincode: String,
}

impl Address {
    fn set(&mut self, field: AddressField, value: String) {
        match field {
            AddressField::Street => self.street = value,
            AddressField::City => self.city = value,
            AddressField::State => self.state = value,
            AddressField::Pincode => self.pincode = value,
        }
    }
}

/// Tenant owner account created together with the organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerInfo {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Contact phone.
    pub phone: String,
}

/// How often a subscription is billed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    /// Every month.
    #[default]
    Monthly,
    /// Every twelve months.
    Yearly,
}

impl BillingCycle {
    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }

    /// Expiry of a subscription starting on `today`. Month arithmetic clamps
    /// to the last day of the target month (Jan 31 + 1 month = Feb 28/29).
    pub fn expiry_from(self, today: NaiveDate) -> NaiveDate {
        let months = match self {
            BillingCycle::Monthly => Months::new(1),
            BillingCycle::Yearly => Months::new(12),
        };
        today.checked_add_months(months).unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            other => Err(FormError::InvalidValue {
                field: "subscription.billingCycle".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Plan and billing picked for the new organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriptionChoice {
    /// Catalog id, empty until a plan is picked.
    pub plan_id: String,
    /// Billing cycle.
    pub billing_cycle: BillingCycle,
    /// Set whenever the cycle is chosen; left out of the payload until then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

/// A physical gym location. Logos are tracked next to the draft, never in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BranchDraft {
    /// Branch name.
    pub name: String,
    /// Branch phone.
    pub phone: String,
    /// Branch address.
    pub address: Address,
    /// Floors, at least one.
    pub floor_count: u32,
}

impl Default for BranchDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            address: Address::default(),
            floor_count: 1,
        }
    }
}

impl BranchDraft {
    fn apply(&mut self, update: BranchUpdate) {
        match update {
            BranchUpdate::Name(value) => self.name = value,
            BranchUpdate::Phone(value) => self.phone = value,
            BranchUpdate::Address(field, value) => self.address.set(field, value),
            BranchUpdate::FloorCount(count) => self.floor_count = count.max(1),
        }
    }
}

/// Everything the `data` part of the create request carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftOrganization {
    /// Gym name.
    pub gym_name: String,
    /// Public contact email.
    pub contact_email: String,
    /// Public contact phone.
    pub contact_phone: String,
    /// Registered address.
    pub address: Address,
    /// Internal notes.
    pub notes: String,
    /// Owner account.
    pub owner: OwnerInfo,
    /// Plan and billing.
    pub subscription: SubscriptionChoice,
    /// The always-present first branch.
    pub main_branch: BranchDraft,
    /// Additional branches, bounded by the plan.
    pub branches: Vec<BranchDraft>,
}

/// What an applied update did beyond writing its own field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Applied {
    Field,
    BranchesCleared,
}

impl DraftOrganization {
    pub(crate) fn apply(&mut self, update: FieldUpdate, today: NaiveDate) -> Applied {
        match update {
            FieldUpdate::Organization(field, value) => match field {
                OrganizationField::GymName => self.gym_name = value,
                OrganizationField::ContactEmail => self.contact_email = value,
                OrganizationField::ContactPhone => self.contact_phone = value,
                OrganizationField::Notes => self.notes = value,
            },
            FieldUpdate::Address(field, value) => self.address.set(field, value),
            FieldUpdate::Owner(field, value) => match field {
                OwnerField::Name => self.owner.name = value,
                OwnerField::Email => self.owner.email = value,
                OwnerField::Password => self.owner.password = value,
                OwnerField::Phone => self.owner.phone = value,
            },
            FieldUpdate::PlanId(plan_id) => {
                self.subscription.plan_id = plan_id;
                self.branches.clear();
                return Applied::BranchesCleared;
            },
            FieldUpdate::BillingCycle(cycle) => {
                self.subscription.billing_cycle = cycle;
                self.subscription.expiry_date = Some(cycle.expiry_from(today));
            },
            FieldUpdate::MainBranch(update) => self.main_branch.apply(update),
            FieldUpdate::Branch {
                index,
                update,
            } => {
                if let Some(branch) = self.branches.get_mut(index) {
                    branch.apply(update);
                }
            },
        }
        Applied::Field
    }
}

/// Top-level text fields of the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrganizationField {
    /// `gymName`
    GymName,
    /// `contactEmail`
    ContactEmail,
    /// `contactPhone`
    ContactPhone,
    /// `notes`
    Notes,
}

/// Fields of an [`Address`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    /// `street`
    Street,
    /// `city`
    City,
    /// `state`
    State,
    /// `pincode`
    Pincode,
}

/// Fields of [`OwnerInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerField {
    /// `owner.name`
    Name,
    /// `owner.email`
    Email,
    /// `owner.password`
    Password,
    /// `owner.phone`
    Phone,
}

/// Fields of a [`BranchDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchField {
    /// `name`
    Name,
    /// `phone`
    Phone,
    /// `address.*`
    Address(AddressField),
    /// `floorCount`
    FloorCount,
}

/// Address of one editable scalar in the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    /// A top-level text field.
    Organization(OrganizationField),
    /// The organization address.
    Address(AddressField),
    /// The owner account.
    Owner(OwnerField),
    /// `subscription.planId`
    PlanId,
    /// `subscription.billingCycle`
    BillingCycle,
    /// `mainBranch.*`
    MainBranch(BranchField),
    /// `branches.<index>.*`
    Branch {
        /// Position in `branches`.
        index: usize,
        /// Field of that branch.
        field: BranchField,
    },
}

/// A single edit, carrying a value of the right type for its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Sets a top-level text field.
    Organization(OrganizationField, String),
    /// Sets an organization address field.
    Address(AddressField, String),
    /// Sets an owner field.
    Owner(OwnerField, String),
    /// Picks a plan. Clears the additional branches.
    PlanId(String),
    /// Picks a cycle and recomputes the expiry.
    BillingCycle(BillingCycle),
    /// Edits the main branch.
    MainBranch(BranchUpdate),
    /// Edits an additional branch; ignored when `index` is out of range.
    Branch {
        /// Position in `branches`.
        index: usize,
        /// The edit.
        update: BranchUpdate,
    },
}

/// An edit to one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchUpdate {
    /// Sets the name.
    Name(String),
    /// Sets the phone.
    Phone(String),
    /// Sets an address field.
    Address(AddressField, String),
    /// Sets the floor count, raised to at least one.
    FloorCount(u32),
}

impl OrganizationField {
    fn key(self) -> &'static str {
        match self {
            OrganizationField::GymName => "gymName",
            OrganizationField::ContactEmail => "contactEmail",
            OrganizationField::ContactPhone => "contactPhone",
            OrganizationField::Notes => "notes",
        }
    }
}

impl AddressField {
    fn key(self) -> &'static str {
        match self {
            AddressField::Street => "street",
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::Pincode => "pincode",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "street" => AddressField::Street,
            "city" => AddressField::City,
            "state" => AddressField::State,
            "pincode" => AddressField::Pincode,
            _ => return None,
        })
    }
}

impl OwnerField {
    fn key(self) -> &'static str {
        match self {
            OwnerField::Name => "name",
            OwnerField::Email => "email",
            OwnerField::Password => "password",
            OwnerField::Phone => "phone",
        }
    }
}

impl BranchField {
    fn parse(segments: &[&str]) -> Option<Self> {
        Some(match segments {
            ["name"] => BranchField::Name,
            ["phone"] => BranchField::Phone,
            ["floorCount"] => BranchField::FloorCount,
            ["address", key] => BranchField::Address(AddressField::from_key(key)?),
            _ => return None,
        })
    }

    fn with_value(self, path: &FieldPath, raw: &str) -> Result<BranchUpdate, FormError> {
        Ok(match self {
            BranchField::Name => BranchUpdate::Name(raw.to_string()),
            BranchField::Phone => BranchUpdate::Phone(raw.to_string()),
            BranchField::Address(field) => BranchUpdate::Address(field, raw.to_string()),
            BranchField::FloorCount => {
                let count = raw.trim().parse::<u32>().map_err(|_| FormError::InvalidValue {
                    field: path.to_string(),
                    value: raw.to_string(),
                })?;
                BranchUpdate::FloorCount(count)
            },
        })
    }
}

impl fmt::Display for BranchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchField::Name => f.write_str("name"),
            BranchField::Phone => f.write_str("phone"),
            BranchField::FloorCount => f.write_str("floorCount"),
            BranchField::Address(field) => write!(f, "address.{}", field.key()),
        }
    }
}

impl FieldPath {
    /// Parses the dotted form used by form inputs, e.g. `owner.email` or
    /// `branches.2.address.city`.
    pub fn parse(path: &str) -> Result<Self, FormError> {
        let segments: Vec<&str> = path.split('.').collect();
        let parsed = match segments.as_slice() {
            ["gymName"] => Some(FieldPath::Organization(OrganizationField::GymName)),
            ["contactEmail"] => Some(FieldPath::Organization(OrganizationField::ContactEmail)),
            ["contactPhone"] => Some(FieldPath::Organization(OrganizationField::ContactPhone)),
            ["notes"] => Some(FieldPath::Organization(OrganizationField::Notes)),
            ["address", key] => AddressField::from_key(key).map(FieldPath::Address),
            ["owner", "name"] => Some(FieldPath::Owner(OwnerField::Name)),
            ["owner", "email"] => Some(FieldPath::Owner(OwnerField::Email)),
            ["owner", "password"] => Some(FieldPath::Owner(OwnerField::Password)),
            ["owner", "phone"] => Some(FieldPath::Owner(OwnerField::Phone)),
            ["subscription", "planId"] => Some(FieldPath::PlanId),
            ["subscription", "billingCycle"] => Some(FieldPath::BillingCycle),
            ["mainBranch", rest @ ..] => BranchField::parse(rest).map(FieldPath::MainBranch),
            ["branches", index, rest @ ..] => match (index.parse::<usize>(), BranchField::parse(rest)) {
                (Ok(index), Some(field)) => Some(FieldPath::Branch {
                    index,
                    field,
                }),
                _ => None,
            },
            _ => None,
        };
        parsed.ok_or_else(|| FormError::UnknownField(path.to_string()))
    }

    /// Pairs the path with a raw input value, converting it to the field's
    /// type.
    pub fn with_value(self, raw: &str) -> Result<FieldUpdate, FormError> {
        Ok(match self {
            FieldPath::Organization(field) => FieldUpdate::Organization(field, raw.to_string()),
            FieldPath::Address(field) => FieldUpdate::Address(field, raw.to_string()),
            FieldPath::Owner(field) => FieldUpdate::Owner(field, raw.to_string()),
            FieldPath::PlanId => FieldUpdate::PlanId(raw.to_string()),
            FieldPath::BillingCycle => FieldUpdate::BillingCycle(raw.parse()?),
            FieldPath::MainBranch(field) => FieldUpdate::MainBranch(field.with_value(&self, raw)?),
            FieldPath::Branch {
                index,
                field,
            } => FieldUpdate::Branch {
                index,
                update: field.with_value(&self, raw)?,
            },
        })
    }
}

impl FromStr for FieldPath {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Organization(field) => f.write_str(field.key()),
            FieldPath::Address(field) => write!(f, "address.{}", field.key()),
            FieldPath::Owner(field) => write!(f, "owner.{}", field.key()),
            FieldPath::PlanId => f.write_str("subscription.planId"),
            FieldPath::BillingCycle => f.write_str("subscription.billingCycle"),
            FieldPath::MainBranch(field) => write!(f, "mainBranch.{field}"),
            FieldPath::Branch {
                index,
                field,
            } => write!(f, "branches.{index}.{field}"),
        }
    }
}

impl FieldUpdate {
    /// Parses `path` and converts `raw` in one step.
    pub fn from_path(path: &str, raw: &str) -> Result<Self, FormError> {
        FieldPath::parse(path)?.with_value(raw)
    }
}
