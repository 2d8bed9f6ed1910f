//! v002 -- Comments, likes and the append-only logs.

use rusqlite::Connection;

const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Comments
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS comments (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    idea_id      INTEGER NOT NULL,
    user_id      INTEGER,                     -- kept even for anonymous comments
    author_name  TEXT NOT NULL,
    content      TEXT NOT NULL CHECK (length(trim(content)) > 0),
    is_anonymous INTEGER NOT NULL DEFAULT 0,  -- boolean 0/1
    created_at   TEXT NOT NULL,

    FOREIGN KEY (idea_id) REFERENCES ideas(id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_idea ON comments(idea_id, created_at DESC);

-- ----------------------------------------------------------------
-- Likes: exactly one identity key per row, one like per key per idea
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS likes (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    idea_id    INTEGER NOT NULL,
    user_id    INTEGER,
    ip_address TEXT,
    created_at TEXT NOT NULL,

    CHECK ((user_id IS NULL) <> (ip_address IS NULL)),
    FOREIGN KEY (idea_id) REFERENCES ideas(id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_user
    ON likes(idea_id, user_id) WHERE user_id IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_ip
    ON likes(idea_id, ip_address) WHERE ip_address IS NOT NULL;

-- ----------------------------------------------------------------
-- Activity log (append-only)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS activity_logs (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    activity_type TEXT NOT NULL,
    user_id       INTEGER,
    idea_id       INTEGER,
    comment_id    INTEGER,
    metadata      TEXT,                       -- JSON
    created_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_activity_created ON activity_logs(created_at DESC);

-- ----------------------------------------------------------------
-- Progress log (append-only)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS progress_logs (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    idea_id      INTEGER NOT NULL,
    old_progress INTEGER NOT NULL,
    new_progress INTEGER NOT NULL,
    notes        TEXT,
    user_id      INTEGER,
    created_at   TEXT NOT NULL,

    FOREIGN KEY (idea_id) REFERENCES ideas(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_progress_idea ON progress_logs(idea_id, created_at DESC);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
