//! Routes and sidebar navigation

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Landing,
    Auth,
    Dashboard,
    Bookshelf,
    AddBook,
    Journal,
    Recommender,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Landing,
        Route::Auth,
        Route::Dashboard,
        Route::Bookshelf,
        Route::AddBook,
        Route::Journal,
        Route::Recommender,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Auth => "/auth",
            Self::Dashboard => "/dashboard",
            Self::Bookshelf => "/bookshelf",
            Self::AddBook => "/add-book",
            Self::Journal => "/journal",
            Self::Recommender => "/recommender",
        }
    }

    /// Unknown paths yield `None`
    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Everything except the landing and auth pages needs a session
    pub fn requires_auth(self) -> bool {
        !matches!(self, Self::Landing | Self::Auth)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where a request for `route` actually lands
pub fn resolve(route: Route, signed_in: bool) -> Route {
    match (route, signed_in) {
        (Route::Landing | Route::Auth, true) => Route::Dashboard,
        (r, false) if r.requires_auth() => Route::Auth,
        (r, _) => r,
    }
}

/// Icon keys for navigation items; rendering is up to the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    LayoutDashboard,
    BookOpen,
    BookPlus,
    Sparkles,
    PenLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub route: Route,
    pub icon: Icon,
}

/// Sidebar entries in display order
pub const NAV_ITEMS: [NavItem; 5] = [
    NavItem {
        title: "Dashboard",
        route: Route::Dashboard,
        icon: Icon::LayoutDashboard,
    },
    NavItem {
        title: "My Bookshelf",
        route: Route::Bookshelf,
        icon: Icon::BookOpen,
    },
    NavItem {
        title: "Add Book",
        route: Route::AddBook,
        icon: Icon::BookPlus,
    },
    NavItem {
        title: "AI Recommender",
        route: Route::Recommender,
        icon: Icon::Sparkles,
    },
    NavItem {
        title: "Journal",
        route: Route::Journal,
        icon: Icon::PenLine,
    },
];
