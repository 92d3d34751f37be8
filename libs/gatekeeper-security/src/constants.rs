/// User id used in authorization checks when the request carries no identity.
pub const ANONYMOUS_USER_ID: &str = "Anonymous";
