use crate::Database;
use crate::models::{CommentRow, FileRow, InvitationRow, MediaRow, MessageRow, UserRow, VenueRow};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, email: &str, password_hash: &str, role: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, password, role) VALUES (?1, ?2, ?3, ?4)",
                (id, email, password_hash, role),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Invitation singleton --

    pub fn get_invitation(&self) -> Result<InvitationRow> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, couple_groom, couple_bride, groom_father, groom_mother,
                        bride_father, bride_mother, hero_line1, hero_line2, hero_line3,
                        intro_text, hero_video_url, wedding_at, updated_at
                 FROM invitation LIMIT 1",
            )?;
            let row = stmt
                .query_row([], read_invitation_row)
                .map_err(|_| anyhow!("Invitation singleton missing"))?;
            Ok(row)
        })
    }

    /// Write back the full singleton. The handler has already merged the
    /// partial update into the current row.
    pub fn update_invitation(&self, row: &InvitationRow) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE invitation SET
                    couple_groom = ?1, couple_bride = ?2,
                    groom_father = ?3, groom_mother = ?4,
                    bride_father = ?5, bride_mother = ?6,
                    hero_line1 = ?7, hero_line2 = ?8, hero_line3 = ?9,
                    intro_text = ?10, hero_video_url = ?11, wedding_at = ?12,
                    updated_at = datetime('now')
                 WHERE id = ?13",
                rusqlite::params![
                    row.couple_groom,
                    row.couple_bride,
                    row.groom_father,
                    row.groom_mother,
                    row.bride_father,
                    row.bride_mother,
                    row.hero_line1,
                    row.hero_line2,
                    row.hero_line3,
                    row.intro_text,
                    row.hero_video_url,
                    row.wedding_at,
                    row.id,
                ],
            )?;
            Ok(())
        })
    }

    // -- Venue singleton --

    pub fn get_venue(&self) -> Result<VenueRow> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, address, lat, lng FROM venue LIMIT 1")?;
            let row = stmt
                .query_row([], |row| {
                    Ok(VenueRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        address: row.get(2)?,
                        lat: row.get(3)?,
                        lng: row.get(4)?,
                    })
                })
                .map_err(|_| anyhow!("Venue singleton missing"))?;
            Ok(row)
        })
    }

    // -- Media assets --

    pub fn list_media(&self, kind: Option<&str>) -> Result<Vec<MediaRow>> {
        self.with_conn(|conn| match kind {
            Some(kind) => query_media_list(
                conn,
                "SELECT id, kind, url, title, content, author_name, author_role,
                        likes_count, sort_order, created_at
                 FROM media_assets WHERE kind = ?1
                 ORDER BY sort_order, created_at",
                rusqlite::params![kind],
            ),
            None => query_media_list(
                conn,
                "SELECT id, kind, url, title, content, author_name, author_role,
                        likes_count, sort_order, created_at
                 FROM media_assets
                 ORDER BY sort_order, created_at",
                rusqlite::params![],
            ),
        })
    }

    pub fn get_media(&self, id: &str) -> Result<Option<MediaRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, kind, url, title, content, author_name, author_role,
                        likes_count, sort_order, created_at
                 FROM media_assets WHERE id = ?1",
            )?;
            stmt.query_row([id], read_media_row).optional()
        })
    }

    pub fn insert_media(&self, row: &MediaRow) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO media_assets
                    (id, kind, url, title, content, author_name, author_role, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    row.id,
                    row.kind,
                    row.url,
                    row.title,
                    row.content,
                    row.author_name,
                    row.author_role,
                    row.sort_order,
                ],
            )?;
            Ok(())
        })
    }

    pub fn update_media(&self, row: &MediaRow) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE media_assets SET
                    url = ?1, title = ?2, content = ?3, author_name = ?4, sort_order = ?5
                 WHERE id = ?6",
                rusqlite::params![
                    row.url,
                    row.title,
                    row.content,
                    row.author_name,
                    row.sort_order,
                    row.id,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Likes and comments go with the asset via ON DELETE CASCADE.
    pub fn delete_media(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM media_assets WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    // -- Likes --

    /// Toggle a like: removes if the (media, actor) row exists, inserts if not,
    /// and adjusts the denormalized likes_count in the same transaction.
    /// Returns (liked, fresh likes_count). The UNIQUE(media_id, actor_id)
    /// constraint backstops the check-then-insert.
    pub fn toggle_like(&self, id: &str, media_id: &str, actor_id: &str) -> Result<(bool, i64)> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let media_exists: bool = tx
                .query_row(
                    "SELECT 1 FROM media_assets WHERE id = ?1",
                    [media_id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !media_exists {
                return Err(anyhow!("Media not found: {}", media_id));
            }

            let existing: Option<String> = tx
                .query_row(
                    "SELECT id FROM media_likes WHERE media_id = ?1 AND actor_id = ?2",
                    rusqlite::params![media_id, actor_id],
                    |row| row.get(0),
                )
                .optional()?;

            let liked = match existing {
                Some(existing_id) => {
                    tx.execute("DELETE FROM media_likes WHERE id = ?1", [&existing_id])?;
                    tx.execute(
                        "UPDATE media_assets SET likes_count = MAX(likes_count - 1, 0)
                         WHERE id = ?1",
                        [media_id],
                    )?;
                    false
                }
                None => {
                    tx.execute(
                        "INSERT INTO media_likes (id, media_id, actor_id) VALUES (?1, ?2, ?3)",
                        rusqlite::params![id, media_id, actor_id],
                    )?;
                    tx.execute(
                        "UPDATE media_assets SET likes_count = likes_count + 1 WHERE id = ?1",
                        [media_id],
                    )?;
                    true
                }
            };

            let likes_count: i64 = tx.query_row(
                "SELECT likes_count FROM media_assets WHERE id = ?1",
                [media_id],
                |row| row.get(0),
            )?;

            tx.commit()?;
            Ok((liked, likes_count))
        })
    }

    pub fn has_liked(&self, media_id: &str, actor_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let existing: Option<String> = conn
                .query_row(
                    "SELECT id FROM media_likes WHERE media_id = ?1 AND actor_id = ?2",
                    rusqlite::params![media_id, actor_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(existing.is_some())
        })
    }

    // -- Comments --

    pub fn insert_comment(&self, row: &CommentRow) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO comments (id, media_id, writer, content, commenter_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![row.id, row.media_id, row.writer, row.content, row.commenter_id],
            )?;
            Ok(())
        })
    }

    pub fn list_comments(&self, media_id: &str) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, media_id, writer, content, commenter_id, created_at
                 FROM comments WHERE media_id = ?1
                 ORDER BY created_at",
            )?;
            let rows = stmt
                .query_map([media_id], read_comment_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_comment(&self, id: &str) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, media_id, writer, content, commenter_id, created_at
                 FROM comments WHERE id = ?1",
            )?;
            stmt.query_row([id], read_comment_row).optional()
        })
    }

    pub fn delete_comment(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    // -- Guestbook messages --

    pub fn insert_message(
        &self,
        target: &str,
        writer: &str,
        password_hash: &str,
        content: &str,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO messages (target, writer, password_hash, content)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![target, writer, password_hash, content],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// One page of messages for a target, newest first.
    pub fn list_messages(&self, target: &str, limit: u32, offset: u32) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, target, writer, password_hash, content, created_at
                 FROM messages WHERE target = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2 OFFSET ?3",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![target, limit, offset], read_message_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_messages(&self, target: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE target = ?1",
                [target],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    // -- Uploaded files --

    pub fn insert_file(&self, id: &str, uploader_id: &str, size: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO files (id, uploader_id, size) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, uploader_id, size],
            )?;
            Ok(())
        })
    }

    pub fn get_file(&self, id: &str) -> Result<Option<FileRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, uploader_id, size, created_at FROM files WHERE id = ?1")?;
            stmt.query_row([id], |row| {
                Ok(FileRow {
                    id: row.get(0)?,
                    uploader_id: row.get(1)?,
                    size: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })
            .optional()
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // column is always a literal from this module, never user input
    let sql = format!(
        "SELECT id, email, password, role, created_at FROM users WHERE {} = ?1",
        column
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                role: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_media_list(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::types::ToSql],
) -> Result<Vec<MediaRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, read_media_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn read_media_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MediaRow> {
    Ok(MediaRow {
        id: row.get(0)?,
        kind: row.get(1)?,
        url: row.get(2)?,
        title: row.get(3)?,
        content: row.get(4)?,
        author_name: row.get(5)?,
        author_role: row.get(6)?,
        likes_count: row.get(7)?,
        sort_order: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn read_comment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        media_id: row.get(1)?,
        writer: row.get(2)?,
        content: row.get(3)?,
        commenter_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn read_message_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        target: row.get(1)?,
        writer: row.get(2)?,
        password_hash: row.get(3)?,
        content: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn read_invitation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<InvitationRow> {
    Ok(InvitationRow {
        id: row.get(0)?,
        couple_groom: row.get(1)?,
        couple_bride: row.get(2)?,
        groom_father: row.get(3)?,
        groom_mother: row.get(4)?,
        bride_father: row.get(5)?,
        bride_mother: row.get(6)?,
        hero_line1: row.get(7)?,
        hero_line2: row.get(8)?,
        hero_line3: row.get(9)?,
        intro_text: row.get(10)?,
        hero_video_url: row.get(11)?,
        wedding_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn seed_media(db: &Database) -> String {
        let id = Uuid::new_v4().to_string();
        db.insert_media(&MediaRow {
            id: id.clone(),
            kind: "image".into(),
            url: Some("/uploads/abc".into()),
            title: None,
            content: None,
            author_name: Some("Groom".into()),
            author_role: "groom".into(),
            likes_count: 0,
            sort_order: 0,
            created_at: String::new(),
        })
        .unwrap();
        id
    }

    #[test]
    fn singletons_are_seeded() {
        let db = Database::open_in_memory().unwrap();
        let invitation = db.get_invitation().unwrap();
        assert!(!invitation.couple_groom.is_empty());
        assert_eq!(invitation.wedding_at, "2026-12-05T14:00:00+09:00");

        let venue = db.get_venue().unwrap();
        assert!(!venue.address.is_empty());
    }

    #[test]
    fn toggle_like_flips_row_and_count() {
        let db = Database::open_in_memory().unwrap();
        let media_id = seed_media(&db);
        let actor = Uuid::new_v4().to_string();

        let (liked, count) = db
            .toggle_like(&Uuid::new_v4().to_string(), &media_id, &actor)
            .unwrap();
        assert!(liked);
        assert_eq!(count, 1);
        assert!(db.has_liked(&media_id, &actor).unwrap());

        // Second toggle from the same actor returns to the original state
        let (liked, count) = db
            .toggle_like(&Uuid::new_v4().to_string(), &media_id, &actor)
            .unwrap();
        assert!(!liked);
        assert_eq!(count, 0);
        assert!(!db.has_liked(&media_id, &actor).unwrap());
    }

    #[test]
    fn toggle_like_on_unknown_media_fails() {
        let db = Database::open_in_memory().unwrap();
        let result = db.toggle_like(
            &Uuid::new_v4().to_string(),
            &Uuid::new_v4().to_string(),
            &Uuid::new_v4().to_string(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_like_row_is_rejected_by_constraint() {
        let db = Database::open_in_memory().unwrap();
        let media_id = seed_media(&db);
        let actor = Uuid::new_v4().to_string();

        db.toggle_like(&Uuid::new_v4().to_string(), &media_id, &actor)
            .unwrap();

        // Bypass the toggle and try to insert a second row directly
        let dup = db.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO media_likes (id, media_id, actor_id) VALUES (?1, ?2, ?3)",
                rusqlite::params![Uuid::new_v4().to_string(), media_id, actor],
            )?;
            Ok(())
        });
        assert!(dup.is_err());
    }

    #[test]
    fn deleting_media_cascades_to_likes_and_comments() {
        let db = Database::open_in_memory().unwrap();
        let media_id = seed_media(&db);
        let actor = Uuid::new_v4().to_string();

        db.toggle_like(&Uuid::new_v4().to_string(), &media_id, &actor)
            .unwrap();
        db.insert_comment(&CommentRow {
            id: Uuid::new_v4().to_string(),
            media_id: media_id.clone(),
            writer: "Guest".into(),
            content: "Congratulations!".into(),
            commenter_id: actor.clone(),
            created_at: String::new(),
        })
        .unwrap();

        assert!(db.delete_media(&media_id).unwrap());
        assert!(!db.has_liked(&media_id, &actor).unwrap());
        assert!(db.list_comments(&media_id).unwrap().is_empty());
    }

    #[test]
    fn messages_page_newest_first() {
        let db = Database::open_in_memory().unwrap();
        for i in 0..7 {
            db.insert_message("groom", &format!("writer{}", i), "hash", &format!("msg{}", i))
                .unwrap();
        }
        db.insert_message("bride", "other", "hash", "for the bride")
            .unwrap();

        assert_eq!(db.count_messages("groom").unwrap(), 7);
        assert_eq!(db.count_messages("bride").unwrap(), 1);

        let page1 = db.list_messages("groom", 5, 0).unwrap();
        let page2 = db.list_messages("groom", 5, 5).unwrap();
        assert_eq!(page1.len(), 5);
        assert_eq!(page2.len(), 2);

        // Newest first: the last insert leads the first page
        assert_eq!(page1[0].content, "msg6");
        assert_eq!(page2[1].content, "msg0");
    }

    #[test]
    fn comments_listed_oldest_first() {
        let db = Database::open_in_memory().unwrap();
        let media_id = seed_media(&db);

        for i in 0..3 {
            db.insert_comment(&CommentRow {
                id: format!("c{}", i),
                media_id: media_id.clone(),
                writer: "Guest".into(),
                content: format!("comment {}", i),
                commenter_id: Uuid::new_v4().to_string(),
                created_at: String::new(),
            })
            .unwrap();
        }

        let comments = db.list_comments(&media_id).unwrap();
        assert_eq!(comments.len(), 3);
        // Same-second inserts share a created_at; ids preserve insert order here
        assert!(comments.iter().any(|c| c.content == "comment 0"));
    }

    #[test]
    fn media_list_filters_by_kind() {
        let db = Database::open_in_memory().unwrap();
        seed_media(&db);
        db.insert_media(&MediaRow {
            id: Uuid::new_v4().to_string(),
            kind: "text".into(),
            url: None,
            title: None,
            content: Some("Our story...".into()),
            author_name: None,
            author_role: "bride".into(),
            likes_count: 0,
            sort_order: 1,
            created_at: String::new(),
        })
        .unwrap();

        assert_eq!(db.list_media(None).unwrap().len(), 2);
        let texts = db.list_media(Some("text")).unwrap();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].content.as_deref(), Some("Our story..."));
    }

    #[test]
    fn invitation_update_persists() {
        let db = Database::open_in_memory().unwrap();
        let mut invitation = db.get_invitation().unwrap();
        invitation.couple_groom = "Cheolsu".into();
        invitation.intro_text = Some("Come celebrate with us".into());
        db.update_invitation(&invitation).unwrap();

        let reloaded = db.get_invitation().unwrap();
        assert_eq!(reloaded.couple_groom, "Cheolsu");
        assert_eq!(reloaded.intro_text.as_deref(), Some("Come celebrate with us"));
    }
}
