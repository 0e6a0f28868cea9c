mod permission_grant;

pub use permission_grant::PermissionGrant;
