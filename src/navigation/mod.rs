//! Navigation module: route table, auth and routing ports, and the gate
//!
//! Every route change the component performs goes through
//! [`NavigationGate`], whatever produced it (voice, typing or a lookup).

mod gate;
mod ports;
mod routes;

pub use gate::{NavigationDenied, NavigationGate};
pub use ports::{AuthState, HistoryNavigator, Navigator, StaticAuth, User};
pub use routes::{RouteDescriptor, RouteTable, SITE_ROUTES};
