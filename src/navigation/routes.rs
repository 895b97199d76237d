//! Site navigation table

/// A page the storefront can route to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    /// Private routes need a signed-in user
    pub requires_auth: bool,
}

/// Routes exposed in the site navigation bar
pub const SITE_ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor {
        path: "/",
        name: "Home",
        requires_auth: false,
    },
    RouteDescriptor {
        path: "/all-books",
        name: "All Books",
        requires_auth: false,
    },
    RouteDescriptor {
        path: "/add-book",
        name: "Add Book",
        requires_auth: true,
    },
    RouteDescriptor {
        path: "/borrowed-books",
        name: "Borrowed Books",
        requires_auth: true,
    },
    RouteDescriptor {
        path: "/profile",
        name: "Profile",
        requires_auth: true,
    },
];

/// Lookup over a fixed set of route descriptors
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [RouteDescriptor],
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(SITE_ROUTES)
    }
}

impl RouteTable {
    pub const fn new(routes: &'static [RouteDescriptor]) -> Self {
        Self { routes }
    }

    /// Find the descriptor for a path; query string and fragment are ignored
    pub fn find(&self, path: &str) -> Option<&'static RouteDescriptor> {
        let bare = path
            .split(|c: char| c == '?' || c == '#')
            .next()
            .unwrap_or(path);
        self.routes.iter().find(|route| route.path == bare)
    }

    /// Whether navigating to `path` requires a signed-in user.
    /// Paths missing from the table are public.
    pub fn requires_auth(&self, path: &str) -> bool {
        self.find(path).is_some_and(|route| route.requires_auth)
    }
}
