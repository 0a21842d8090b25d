pub mod claims;
pub mod role;

pub use claims::{Claims, decode_claims};
pub use role::{
    ResolvedSession, Role, RoleResolver, RoleState, has_any_role, resolve_role, role_from_token,
};
