//! Route configuration: verb-qualified path templates per logical operation.
//!
//! A [`RouteTable`] is an insertion-ordered list of (service, operation,
//! template) entries. Operation names carry their HTTP verb as a prefix
//! (`GET_`, `POST_`, `PUT_`); templates are `/`-delimited with `:name`
//! segments standing in for path parameters. Resolution scans the table in
//! insertion order and the first match wins, which makes lookup behavior
//! reproducible even when templates overlap; overlaps are reported once,
//! with a warning, at the moment the second template is inserted.

use http::Method;

/// One verb-qualified path template for a logical API operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    service: String,
    operation: String,
    template: String,
}

impl Route {
    /// Service the operation belongs to (e.g. `SUMMONER`).
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Verb-prefixed operation name (e.g. `GET_BY_PUUID`).
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Path template with `:name` parameter segments.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Verb prefix of the operation name.
    fn verb(&self) -> &str {
        self.operation.split('_').next().unwrap_or(&self.operation)
    }
}

/// Insertion-ordered route configuration.
///
/// Insertion order *is* the resolution order: when two templates can match
/// the same concrete path under the same verb, the earlier insertion wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in Riot API route table.
    pub fn riot_api() -> Self {
        let mut table = Self::new();
        for &(service, operation, template) in RIOT_ROUTES {
            table.insert(service, operation, template);
        }
        table
    }

    /// Append a route, preserving insertion order.
    ///
    /// Emits a `tracing` warning if the new template can match the same
    /// concrete path as an already-inserted template under the same verb;
    /// the earlier insertion keeps winning at resolution time.
    pub fn insert(
        &mut self,
        service: impl Into<String>,
        operation: impl Into<String>,
        template: impl Into<String>,
    ) {
        let route = Route {
            service: service.into(),
            operation: operation.into(),
            template: template.into(),
        };
        for existing in &self.routes {
            if routes_overlap(existing, &route) {
                tracing::warn!(
                    existing_service = existing.service.as_str(),
                    existing_operation = existing.operation.as_str(),
                    existing_template = existing.template.as_str(),
                    new_service = route.service.as_str(),
                    new_operation = route.operation.as_str(),
                    new_template = route.template.as_str(),
                    "overlapping route templates; the earlier insertion wins"
                );
            }
        }
        self.routes.push(route);
    }

    /// Number of routes in the table.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check whether the table holds no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in insertion (resolution) order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve a concrete path + verb to (service, operation).
    ///
    /// First match in insertion order wins; `None` if nothing matches.
    pub fn resolve_path(&self, path: &str, method: &Method) -> Option<(&str, &str)> {
        let verb = method.as_str().to_uppercase();
        self.routes
            .iter()
            .find(|route| {
                route.operation.starts_with(&verb) && segments_match(path, &route.template)
            })
            .map(|route| (route.service.as_str(), route.operation.as_str()))
    }
}

/// Check whether a concrete path matches a template.
///
/// Both sides are split on `/` after trimming leading/trailing slashes;
/// segment counts must be equal, and each template segment either starts
/// with `:` (matches anything) or must equal the path segment exactly.
/// An empty path and an empty template both yield one empty segment and
/// match trivially.
fn segments_match(path: &str, template: &str) -> bool {
    let path_segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let template_segments: Vec<&str> = template.trim_matches('/').split('/').collect();

    if path_segments.len() != template_segments.len() {
        return false;
    }

    template_segments
        .iter()
        .zip(&path_segments)
        .all(|(template_segment, path_segment)| {
            template_segment.starts_with(':') || template_segment == path_segment
        })
}

/// Check whether two routes could both match some concrete path: same verb,
/// same segment count, and every position compatible (a parameter on either
/// side, or identical literals).
fn routes_overlap(a: &Route, b: &Route) -> bool {
    if a.verb() != b.verb() {
        return false;
    }

    let a_segments: Vec<&str> = a.template.trim_matches('/').split('/').collect();
    let b_segments: Vec<&str> = b.template.trim_matches('/').split('/').collect();

    if a_segments.len() != b_segments.len() {
        return false;
    }

    a_segments.iter().zip(&b_segments).all(|(left, right)| {
        left.starts_with(':') || right.starts_with(':') || left == right
    })
}

/// The Riot API endpoints, grouped by service. Operation names are prefixed
/// with the HTTP verb they apply to.
const RIOT_ROUTES: &[(&str, &str, &str)] = &[
    ("ACCOUNT", "GET_BY_PUUID", "/riot/account/v1/accounts/by-puuid/:puuid"),
    ("ACCOUNT", "GET_BY_RIOT_ID", "/riot/account/v1/accounts/by-riot-id/:gameName/:tagLine"),
    ("ACCOUNT", "GET_BY_ACCESS_TOKEN", "/riot/account/v1/accounts/me"),
    (
        "ACCOUNT",
        "GET_ACTIVE_SHARD_FOR_PLAYER",
        "/riot/account/v1/active-shards/by-game/:game/by-puuid/:puuid",
    ),
    (
        "ACCOUNT",
        "GET_ACTIVE_REGION_FOR_PLAYER",
        "/riot/account/v1/region/by-game/:game/by-puuid/:puuid",
    ),
    (
        "CHAMPION_MASTERY",
        "GET_ALL_CHAMPIONS",
        "/lol/champion-mastery/v4/champion-masteries/by-puuid/:encryptedPUUID",
    ),
    (
        "CHAMPION_MASTERY",
        "GET_CHAMPION_MASTERY",
        "/lol/champion-mastery/v4/champion-masteries/by-puuid/:encryptedPUUID/by-champion/:championId",
    ),
    (
        "CHAMPION_MASTERY",
        "GET_TOP_CHAMPIONS",
        "/lol/champion-mastery/v4/champion-masteries/by-puuid/:encryptedPUUID/top",
    ),
    (
        "CHAMPION_MASTERY",
        "GET_CHAMPION_MASTERY_SCORE",
        "/lol/champion-mastery/v4/scores/by-puuid/:encryptedPUUID",
    ),
    ("CHAMPION", "GET_CHAMPION_ROTATIONS", "/lol/platform/v3/champion-rotations"),
    ("CLASH", "GET_PLAYERS_BY_PUUID", "/lol/clash/v1/players/by-puuid/:puuid"),
    ("CLASH", "GET_TEAM", "/lol/clash/v1/teams/:teamId"),
    ("CLASH", "GET_TOURNAMENTS", "/lol/clash/v1/tournaments"),
    ("CLASH", "GET_TOURNAMENT", "/lol/clash/v1/tournaments/:tournamentId"),
    ("CLASH", "GET_TOURNAMENT_TEAM", "/lol/clash/v1/tournaments/by-team/:teamId"),
    ("LEAGUE_EXP", "GET_LEAGUE_ENTRIES", "/lol/league-exp/v4/entries/:queue/:tier/:division"),
    ("LEAGUE", "GET_CHALLENGER_BY_QUEUE", "/lol/league/v4/challengerleagues/by-queue/:queue"),
    ("LEAGUE", "GET_ENTRIES_BY_PUUID", "/lol/league/v4/entries/by-puuid/:puuid"),
    ("LEAGUE", "GET_ALL_ENTRIES", "/lol/league/v4/entries/:queue/:tier/:division"),
    ("LEAGUE", "GET_GRANDMASTER_BY_QUEUE", "/lol/league/v4/grandmasterleagues/by-queue/:queue"),
    ("LEAGUE", "GET_LEAGUE_BY_ID", "/lol/league/v4/leagues/:leagueId"),
    ("LEAGUE", "GET_MASTER_BY_QUEUE", "/lol/league/v4/masterleagues/by-queue/:queue"),
    ("LOL_CHALLENGES", "GET_CONFIG", "/lol/challenges/v1/challenges/config"),
    ("LOL_CHALLENGES", "GET_PERCENTILES", "/lol/challenges/v1/challenges/percentiles"),
    ("LOL_CHALLENGES", "GET_CONFIG_BY_ID", "/lol/challenges/v1/challenges/:challengeId/config"),
    (
        "LOL_CHALLENGES",
        "GET_LEADERBOARD_BY_ID",
        "/lol/challenges/v1/challenges/:challengeId/leaderboards/by-level/:level",
    ),
    (
        "LOL_CHALLENGES",
        "GET_PERCENTILES_BY_ID",
        "/lol/challenges/v1/challenges/:challengeId/percentiles",
    ),
    ("LOL_CHALLENGES", "GET_PLAYER_DATA_BY_PUUID", "/lol/challenges/v1/player-data/:puuid"),
    ("LOL_RSO_MATCH", "GET_MATCH_IDS_BY_ACCESS_TOKEN", "/lol/rso-match/v1/matches/ids"),
    ("LOL_RSO_MATCH", "GET_MATCH_BY_ID", "/lol/rso-match/v1/matches/:matchId"),
    ("LOL_RSO_MATCH", "GET_MATCH_TIMELINE_BY_ID", "/lol/rso-match/v1/matches/:matchId/timeline"),
    ("LOL_STATUS", "GET_PLATFORM_DATA", "/lol/status/v4/platform-data"),
    ("LOR_DECK", "GET_DECKS_FOR_PLAYER", "/lor/deck/v1/decks/me"),
    ("LOR_DECK", "POST_CREATE_DECK_FOR_PLAYER", "/lor/deck/v1/decks/me"),
    ("LOR_INVENTORY", "GET_CARDS_OWNED_BY_PLAYER", "/lor/inventory/v1/cards/me"),
    ("LOR_MATCH", "GET_MATCH_IDS_BY_PUUID", "/lor/match/v1/matches/by-puuid/:puuid/ids"),
    ("LOR_MATCH", "GET_MATCH_BY_ID", "/lor/match/v1/matches/:matchId"),
    ("LOR_RANKED", "GET_MASTER_TIER", "/lor/ranked/v1/leaderboards"),
    ("LOR_STATUS_V1", "GET_PLATFORM_DATA", "/lor/status/v1/platform-data"),
    ("MATCH_V5", "GET_IDS_BY_PUUID", "/lol/match/v5/matches/by-puuid/:puuid/ids"),
    ("MATCH_V5", "GET_MATCH_BY_ID", "/lol/match/v5/matches/:matchId"),
    ("MATCH_V5", "GET_MATCH_TIMELINE_BY_ID", "/lol/match/v5/matches/:matchId/timeline"),
    ("RIFTBOUND_CONTENT", "GET_RIFTBOUND_CONTENT", "/riftbound-content/v1/contents"),
    (
        "SPECTATOR_TFT_V5",
        "GET_GAME_BY_PUUID",
        "/lol/spectator/tft/v5/active-games/by-puuid/:puuid",
    ),
    ("SPECTATOR_TFT_V5", "GET_FEATURED_GAMES", "/lol/spectator/tft/v5/featured-games"),
    ("SPECTATOR", "GET_GAME_BY_PUUID", "/lol/spectator/v5/active-games/by-summoner/:puuid"),
    ("SPECTATOR", "GET_FEATURED_GAMES", "/lol/spectator/v5/featured-games"),
    ("SUMMONER", "GET_BY_ACCESS_TOKEN", "/lol/summoner/v4/summoners/me"),
    ("SUMMONER", "GET_BY_PUUID", "/lol/summoner/v4/summoners/by-puuid/:puuid"),
    ("TFT_LEAGUE", "GET_BY_PUUID", "/tft/league/v1/by-puuid/:puuid"),
    ("TFT_LEAGUE", "GET_CHALLENGER", "/tft/league/v1/challenger"),
    ("TFT_LEAGUE", "GET_ALL_ENTRIES", "/tft/league/v1/entries/:tier/:division"),
    ("TFT_LEAGUE", "GET_GRANDMASTER", "/tft/league/v1/grandmaster"),
    ("TFT_LEAGUE", "GET_MASTER", "/tft/league/v1/master"),
    (
        "TFT_LEAGUE",
        "GET_TOP_RATED_LADDER_BY_QUEUE",
        "/tft/league/v1/rated-ladders/:queue/top",
    ),
    ("TFT_LEAGUE", "GET_LEAGUE_BY_ID", "/tft/league/v1/leagues/:leagueId"),
    ("TFT_MATCH", "GET_MATCH_IDS_BY_PUUID", "/tft/match/v1/matches/by-puuid/:puuid/ids"),
    ("TFT_MATCH", "GET_MATCH_BY_ID", "/tft/match/v1/matches/:matchId"),
    ("TFT_STATUS_V1", "GET_PLATFORM_DATA", "/tft/status/v1/platform-data"),
    ("TFT_SUMMONER", "GET_BY_PUUID", "/tft/summoner/v1/summoners/by-puuid/:puuid"),
    ("TFT_SUMMONER", "GET_BY_ACCESS_TOKEN", "/tft/summoner/v1/summoners/me"),
    ("TOURNAMENT_STUB_V5", "POST_CREATE_CODES", "/lol/tournament-stub/v5/codes"),
    (
        "TOURNAMENT_STUB_V5",
        "GET_TOURNAMENT_BY_CODE",
        "/lol/tournament-stub/v5/codes/:tournamentCode",
    ),
    (
        "TOURNAMENT_STUB_V5",
        "GET_LOBBY_EVENTS_BY_TOURNAMENT_CODE",
        "/lol/tournament-stub/v5/lobby-events/by-code/:tournamentCode",
    ),
    ("TOURNAMENT_STUB_V5", "POST_CREATE_PROVIDER", "/lol/tournament-stub/v5/providers"),
    ("TOURNAMENT_STUB_V5", "POST_CREATE_TOURNAMENT", "/lol/tournament-stub/v5/tournaments"),
    ("TOURNAMENT_V5", "POST_CREATE_CODES", "/lol/tournament/v5/codes"),
    ("TOURNAMENT_V5", "GET_TOURNAMENT_BY_CODE", "/lol/tournament/v5/codes/:tournamentCode"),
    ("TOURNAMENT_V5", "PUT_TOURNAMENT_CODE", "/lol/tournament/v5/codes/:tournamentCode"),
    (
        "TOURNAMENT_V5",
        "GET_TOURNAMENT_GAME_DETAILS",
        "/lol/tournament/v5/games/by-code/:tournamentCode",
    ),
    (
        "TOURNAMENT_V5",
        "GET_LOBBY_EVENTS_BY_TOURNAMENT_CODE",
        "/lol/tournament/v5/lobby-events/by-code/:tournamentCode",
    ),
    ("TOURNAMENT_V5", "POST_CREATE_PROVIDER", "/lol/tournament/v5/providers"),
    ("TOURNAMENT_V5", "POST_CREATE_TOURNAMENT", "/lol/tournament/v5/tournaments"),
    ("VAL_CONSOLE_MATCH", "GET_MATCH_BY_ID", "/val/match/console/v1/matches/:matchId"),
    (
        "VAL_CONSOLE_MATCH",
        "GET_MATCHLIST_BY_PUUID",
        "/val/match/console/v1/matchlists/by-puuid/:puuid",
    ),
    (
        "VAL_CONSOLE_MATCH",
        "GET_RECENT_MATCHES_BY_QUEUE",
        "/val/match/console/v1/recent-matches/by-queue/:queue",
    ),
    (
        "VAL_CONSOLE_RANKED",
        "GET_LEADERBOARD_BY_QUEUE",
        "/val/console/ranked/v1/leaderboards/by-act/:actId",
    ),
    ("VAL_CONTENT", "GET_CONTENT", "/val/content/v1/contents"),
    ("VAL_MATCH", "GET_MATCH_BY_ID", "/val/match/v1/matches/:matchId"),
    ("VAL_MATCH", "GET_MATCHLIST_BY_PUUID", "/val/match/v1/matchlists/by-puuid/:puuid"),
    (
        "VAL_MATCH",
        "GET_RECENT_MATCHES_BY_QUEUE",
        "/val/match/v1/recent-matches/by-queue/:queue",
    ),
    ("VAL_RANKED", "GET_LEADERBOARD_BY_QUEUE", "/val/ranked/v1/leaderboards/by-act/:actId"),
    ("VAL_STATUS_V1", "GET_PLATFORM_DATA", "/val/status/v1/platform-data"),
];
