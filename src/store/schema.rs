/// Tournament schema. Every statement is idempotent.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS seasons (
    id INTEGER PRIMARY KEY,
    year INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS teams (
    id INTEGER PRIMARY KEY,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    code TEXT NOT NULL CHECK (code IN ('red', 'blue')),
    name TEXT NOT NULL,
    UNIQUE (season_id, code)
);

CREATE TABLE IF NOT EXISTS game_modes (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    min_players_per_side INTEGER NOT NULL,
    max_players_per_side INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS scoring_modes (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    per_hole_result INTEGER NOT NULL,
    rules_json TEXT
);

CREATE TABLE IF NOT EXISTS hcp_policies (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    rules_json TEXT
);

CREATE TABLE IF NOT EXISTS courses (
    id INTEGER PRIMARY KEY,
    legacy_id TEXT UNIQUE,
    name TEXT NOT NULL,
    name_key TEXT UNIQUE,
    city TEXT,
    rating REAL,
    slope REAL
);

CREATE TABLE IF NOT EXISTS holes (
    id INTEGER PRIMARY KEY,
    course_id INTEGER NOT NULL REFERENCES courses(id),
    hole_number INTEGER NOT NULL CHECK (hole_number > 0),
    par INTEGER,
    stroke_index INTEGER,
    photo_url TEXT,
    UNIQUE (course_id, hole_number)
);

CREATE TABLE IF NOT EXISTS round_schedule (
    id INTEGER PRIMARY KEY,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    day_number INTEGER NOT NULL,
    course_id INTEGER REFERENCES courses(id),
    default_game_mode_id INTEGER REFERENCES game_modes(id),
    default_scoring_mode_id INTEGER REFERENCES scoring_modes(id),
    default_hcp_policy_id INTEGER REFERENCES hcp_policies(id),
    UNIQUE (season_id, day_number)
);

CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY,
    legacy_id TEXT UNIQUE,
    first_name TEXT,
    last_name TEXT,
    full_name TEXT NOT NULL,
    name_key TEXT UNIQUE,
    hcp_current REAL,
    size_label TEXT,
    phone TEXT,
    photo_url TEXT
);

CREATE TABLE IF NOT EXISTS player_season (
    id INTEGER PRIMARY KEY,
    player_id INTEGER NOT NULL REFERENCES players(id),
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    team_id INTEGER REFERENCES teams(id),
    UNIQUE (player_id, season_id)
);

CREATE TABLE IF NOT EXISTS matches (
    id INTEGER PRIMARY KEY,
    legacy_id TEXT UNIQUE,
    season_id INTEGER REFERENCES seasons(id),
    round_id INTEGER REFERENCES round_schedule(id),
    course_id INTEGER REFERENCES courses(id),
    stage TEXT,
    status TEXT NOT NULL DEFAULT 'not_started'
        CHECK (status IN ('not_started', 'in_progress', 'finished')),
    result_text TEXT,
    winner_side TEXT,
    game_mode_id INTEGER REFERENCES game_modes(id),
    scoring_mode_id INTEGER REFERENCES scoring_modes(id),
    hcp_policy_id INTEGER REFERENCES hcp_policies(id)
);

CREATE TABLE IF NOT EXISTS match_participants (
    id INTEGER PRIMARY KEY,
    match_id INTEGER NOT NULL REFERENCES matches(id),
    side TEXT NOT NULL CHECK (side IN ('red', 'blue')),
    player_id INTEGER REFERENCES players(id),
    order_in_side INTEGER,
    hcp_at_match REAL
);

CREATE INDEX IF NOT EXISTS match_participants_match_side
    ON match_participants (match_id, side);

CREATE TABLE IF NOT EXISTS scores (
    id INTEGER PRIMARY KEY,
    match_id INTEGER NOT NULL REFERENCES matches(id),
    hole_id INTEGER NOT NULL REFERENCES holes(id),
    red_score INTEGER,
    blue_score INTEGER,
    red_net INTEGER,
    blue_net INTEGER,
    winner_side TEXT,
    client_id TEXT UNIQUE,
    UNIQUE (match_id, hole_id)
);

CREATE TABLE IF NOT EXISTS tournament_points (
    id INTEGER PRIMARY KEY,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    side TEXT NOT NULL CHECK (side IN ('red', 'blue')),
    points REAL NOT NULL,
    UNIQUE (season_id, side)
);
"#;

/// Tables reported by `Store::table_counts`
pub const ENTITY_TABLES: [&str; 7] = [
    "players",
    "courses",
    "holes",
    "matches",
    "match_participants",
    "scores",
    "round_schedule",
];
