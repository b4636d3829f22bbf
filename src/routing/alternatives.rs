//! Multi-route facade: one request, three independent searches at fixed
//! safety factors.

use rayon::prelude::*;

use crate::{model::StreetGraph, overlay::RiskOverlay};

use super::{astar::astar, route::Route, route::reconstruct};

/// The three presentation profiles the renderer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteProfile {
    Safest,
    Balanced,
    Shortest,
}

impl RouteProfile {
    pub const ALL: [Self; 3] = [Self::Safest, Self::Balanced, Self::Shortest];

    #[must_use]
    pub fn safety_factor(self) -> f64 {
        match self {
            Self::Safest => 0.9,
            Self::Balanced => 0.5,
            Self::Shortest => 0.1,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Safest => "Safest Route",
            Self::Balanced => "Balanced Route",
            Self::Shortest => "Shortest Route",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Safest => "#00ff00",
            Self::Balanced => "#ffaa00",
            Self::Shortest => "#ff0000",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Safest => "Prioritizes low-crime areas",
            Self::Balanced => "Balance between safety and distance",
            Self::Shortest => "Fastest path, may go through risky areas",
        }
    }
}

/// One route per profile for a single start/goal request.
#[derive(Debug, Clone)]
pub struct RouteAlternatives {
    pub safest: Route,
    pub balanced: Route,
    pub shortest: Route,
}

impl RouteAlternatives {
    #[must_use]
    pub fn get(&self, profile: RouteProfile) -> &Route {
        match profile {
            RouteProfile::Safest => &self.safest,
            RouteProfile::Balanced => &self.balanced,
            RouteProfile::Shortest => &self.shortest,
        }
    }
}

/// Runs the three profile searches for one request. The searches are
/// independent and order-insensitive, so they run in parallel.
///
/// Returns `None` when any profile finds no route: a request either gets
/// the full alternatives set or nothing.
#[must_use]
pub fn calculate_routes(
    graph: &StreetGraph,
    overlay: &RiskOverlay,
    start: &str,
    goal: &str,
) -> Option<RouteAlternatives> {
    let results: Vec<Option<Route>> = RouteProfile::ALL
        .par_iter()
        .map(|profile| {
            astar(graph, overlay, start, goal, profile.safety_factor())
                .map(|tree| reconstruct(&tree, graph))
        })
        .collect();

    let Ok([safest, balanced, shortest]) = <[Option<Route>; 3]>::try_from(results) else {
        return None;
    };

    Some(RouteAlternatives {
        safest: safest?,
        balanced: balanced?,
        shortest: shortest?,
    })
}
