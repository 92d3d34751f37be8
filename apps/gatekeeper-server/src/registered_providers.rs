// Links every provider crate so its inventory registrations survive linking.
// New plugins must be added here to become selectable by name.

use basic_authn_plugin as _;
use simple_rbac_authz_plugin as _;
use static_authn_plugin as _;
