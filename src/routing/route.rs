// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Who may enter a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteAccess {
    /// Anyone
    Public,
    /// Signed-out users only; signed-in users are sent onward
    GuestOnly,
    /// Signed-in users only
    Protected,
}

/// Application views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    Attack,
    Results,
    History,
    ModelInfo,
}

impl Route {
    /// Every route, in menu order
    pub const ALL: [Route; 7] = [
        Route::Landing,
        Route::Login,
        Route::Register,
        Route::Attack,
        Route::Results,
        Route::History,
        Route::ModelInfo,
    ];

    /// Unauthenticated entry point
    pub const LOGIN: Route = Route::Login;

    /// Main authenticated view
    pub const HOME: Route = Route::Attack;

    /// Path of this route
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Attack => "/attack",
            Route::Results => "/results",
            Route::History => "/history",
            Route::ModelInfo => "/model-info",
        }
    }

    /// Access class of this route
    pub fn access(self) -> RouteAccess {
        match self {
            Route::Landing => RouteAccess::Public,
            Route::Login | Route::Register => RouteAccess::GuestOnly,
            Route::Attack | Route::Results | Route::History | Route::ModelInfo => {
                RouteAccess::Protected
            }
        }
    }

    /// Whether a session is required
    pub fn is_protected(self) -> bool {
        self.access() == RouteAccess::Protected
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let path = s.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        Route::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .ok_or_else(|| Error::UnknownRoute(s.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paths() {
        for route in Route::ALL {
            assert_eq!(route.path().parse::<Route>().unwrap(), route);
        }
        assert_eq!("/attack/".parse::<Route>().unwrap(), Route::Attack);
        assert_eq!("/results?x=1".parse::<Route>().unwrap(), Route::Results);
        assert_eq!("".parse::<Route>().unwrap(), Route::Landing);
    }

    #[test]
    fn test_unknown_path() {
        let err = "/admin".parse::<Route>().unwrap_err();
        assert!(matches!(err, Error::UnknownRoute(p) if p == "/admin"));
    }

    #[test]
    fn test_access_classes() {
        assert_eq!(Route::Landing.access(), RouteAccess::Public);
        assert_eq!(Route::Register.access(), RouteAccess::GuestOnly);
        assert!(Route::History.is_protected());
        assert!(!Route::Login.is_protected());
    }
}
