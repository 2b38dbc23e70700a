use std::fmt;

use serde::{Deserialize, Serialize};

/// Permission bits a role can carry. The discriminant is the bit position in
/// the stored mask, so variants may be appended but never reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "can_onboard")]
    Onboard = 0,
    #[serde(rename = "can_offboard")]
    Offboard = 1,
    #[serde(rename = "can_edit_employee")]
    EditEmployee = 2,
    #[serde(rename = "can_view_payroll")]
    Payroll = 3,
    #[serde(rename = "can_manage_reference_data")]
    ManageReferenceData = 4,
    #[serde(rename = "can_administer")]
    AdministerUsers = 5,
    #[serde(rename = "can_view_logs")]
    ViewLogs = 6,
    #[serde(rename = "can_administer_settings")]
    AdministerSettings = 7,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::Onboard,
        Capability::Offboard,
        Capability::EditEmployee,
        Capability::Payroll,
        Capability::ManageReferenceData,
        Capability::AdministerUsers,
        Capability::ViewLogs,
        Capability::AdministerSettings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Onboard => "can_onboard",
            Capability::Offboard => "can_offboard",
            Capability::EditEmployee => "can_edit_employee",
            Capability::Payroll => "can_view_payroll",
            Capability::ManageReferenceData => "can_manage_reference_data",
            Capability::AdministerUsers => "can_administer",
            Capability::ViewLogs => "can_view_logs",
            Capability::AdministerSettings => "can_administer_settings",
        }
    }

    fn bit(self) -> i64 {
        1_i64 << (self as u32)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Capability {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Capability::ALL
            .into_iter()
            .find(|capability| capability.as_str() == value)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet(i64);

impl CapabilitySet {
    const KNOWN: i64 = (1_i64 << Capability::ALL.len()) - 1;

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self(Self::KNOWN)
    }

    /// Bits without a matching `Capability` are dropped.
    pub fn from_bits(bits: i64) -> Self {
        Self(bits & Self::KNOWN)
    }

    pub fn bits(self) -> i64 {
        self.0
    }

    pub fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn insert(&mut self, capability: Capability) {
        self.0 |= capability.bit();
    }

    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL
            .into_iter()
            .filter(move |capability| self.contains(*capability))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = CapabilitySet::empty();
        for capability in iter {
            set.insert(capability);
        }
        set
    }
}

impl Serialize for CapabilitySet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for CapabilitySet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let capabilities = Vec::<Capability>::deserialize(deserializer)?;
        Ok(capabilities.into_iter().collect())
    }
}

/// Type-level capability requirement for extractors.
pub trait RequiredCapability {
    fn required() -> Capability;
}

macro_rules! capability_marker {
    ($($marker:ident => $capability:ident),* $(,)?) => {
        $(
            pub struct $marker;

            impl RequiredCapability for $marker {
                fn required() -> Capability {
                    Capability::$capability
                }
            }
        )*
    };
}

capability_marker! {
    CanOnboard => Onboard,
    CanOffboard => Offboard,
    CanEditEmployee => EditEmployee,
    CanViewPayroll => Payroll,
    CanManageReferenceData => ManageReferenceData,
    CanAdministerUsers => AdministerUsers,
    CanViewLogs => ViewLogs,
    CanAdministerSettings => AdministerSettings,
}
