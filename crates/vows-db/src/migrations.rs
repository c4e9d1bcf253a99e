use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            role        TEXT NOT NULL DEFAULT 'guest'
                        CHECK (role IN ('admin', 'guest')),
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS invitation (
            id              TEXT PRIMARY KEY,
            couple_groom    TEXT NOT NULL,
            couple_bride    TEXT NOT NULL,
            groom_father    TEXT,
            groom_mother    TEXT,
            bride_father    TEXT,
            bride_mother    TEXT,
            hero_line1      TEXT NOT NULL,
            hero_line2      TEXT NOT NULL,
            hero_line3      TEXT NOT NULL,
            intro_text      TEXT,
            hero_video_url  TEXT,
            wedding_at      TEXT NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS venue (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            address     TEXT NOT NULL,
            lat         REAL NOT NULL,
            lng         REAL NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS media_assets (
            id          TEXT PRIMARY KEY,
            kind        TEXT NOT NULL CHECK (kind IN ('image', 'video', 'text')),
            url         TEXT,
            title       TEXT,
            content     TEXT,
            author_name TEXT,
            author_role TEXT NOT NULL DEFAULT 'groom'
                        CHECK (author_role IN ('groom', 'bride')),
            likes_count INTEGER NOT NULL DEFAULT 0,
            sort_order  INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_media_sort
            ON media_assets(sort_order, created_at);

        CREATE TABLE IF NOT EXISTS media_likes (
            id          TEXT PRIMARY KEY,
            media_id    TEXT NOT NULL REFERENCES media_assets(id) ON DELETE CASCADE,
            actor_id    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(media_id, actor_id)
        );

        CREATE INDEX IF NOT EXISTS idx_likes_media
            ON media_likes(media_id);

        CREATE TABLE IF NOT EXISTS comments (
            id              TEXT PRIMARY KEY,
            media_id        TEXT NOT NULL REFERENCES media_assets(id) ON DELETE CASCADE,
            writer          TEXT NOT NULL,
            content         TEXT NOT NULL,
            commenter_id    TEXT NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_comments_media
            ON comments(media_id, created_at);

        CREATE TABLE IF NOT EXISTS messages (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            target          TEXT NOT NULL CHECK (target IN ('groom', 'bride')),
            writer          TEXT NOT NULL,
            password_hash   TEXT NOT NULL,
            content         TEXT NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_messages_target
            ON messages(target, created_at);

        CREATE TABLE IF NOT EXISTS files (
            id          TEXT PRIMARY KEY,
            uploader_id TEXT NOT NULL,
            size        INTEGER NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Seed the invitation and venue singletons so the page always renders
        INSERT OR IGNORE INTO invitation (
            id, couple_groom, couple_bride,
            hero_line1, hero_line2, hero_line3, intro_text, wedding_at
        ) VALUES (
            '00000000-0000-0000-0000-000000000001',
            'Groom', 'Bride',
            'Facing each other, at last.',
            'December 5th, 2026 — the day we meet halfway',
            'Six years together, and a new beginning',
            'On the day two lives become one, come celebrate with us.',
            '2026-12-05T14:00:00+09:00'
        );

        INSERT OR IGNORE INTO venue (id, name, address, lat, lng)
            VALUES (
                '00000000-0000-0000-0000-000000000001',
                'Skyview Hotel & Wedding',
                '317 Haean-daero, Masanhappo-gu, Changwon',
                35.1897, 128.5664
            );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
