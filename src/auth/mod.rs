mod authenticator;
pub mod bootstrap;
mod capability;
mod capability_layer;
mod guard;
pub mod password;
pub mod session;

pub use authenticator::{Authenticator, IssuedSession};
pub use capability::{
    CanAdministerSettings, CanAdministerUsers, CanEditEmployee, CanManageReferenceData,
    CanOffboard, CanOnboard, CanViewLogs, CanViewPayroll, Capability, CapabilitySet,
    RequiredCapability,
};
pub use capability_layer::{
    RequireCapability, RequireCapabilityLayer, SESSION_COOKIE, session_token,
};
pub use guard::{Actor, AuthorizationGuard, Denial};
pub use session::SessionCredential;
